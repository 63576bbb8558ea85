use serde::{Deserialize, Serialize};
use crate::models::scan::{FacingMode, ScanConfig};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub backend_url: String,
    pub environment: String,
    pub enable_logging: bool,
    pub network_timeout_seconds: u32,
    pub scanner: ScannerConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            backend_url: "http://localhost:8080".to_string(),
            environment: "development".to_string(),
            enable_logging: true,
            network_timeout_seconds: 15,
            scanner: ScannerConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScannerConfig {
    pub facing_mode: FacingMode,
    pub fps: u32,
    pub qrbox: u32,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        let scan = ScanConfig::default();
        Self {
            facing_mode: FacingMode::Environment,
            fps: scan.fps,
            qrbox: scan.qrbox,
        }
    }
}

impl ScannerConfig {
    pub fn scan_config(&self) -> ScanConfig {
        ScanConfig {
            fps: self.fps,
            qrbox: self.qrbox,
        }
    }
}

impl AppConfig {
    /// Carga la configuración desde variables de entorno en tiempo de compilación
    pub fn from_env() -> Self {
        Self::from_values(|key| match key {
            "BACKEND_URL" => option_env!("BACKEND_URL"),
            "ENVIRONMENT" => option_env!("ENVIRONMENT"),
            "ENABLE_LOGGING" => option_env!("ENABLE_LOGGING"),
            "NETWORK_TIMEOUT_SECONDS" => option_env!("NETWORK_TIMEOUT_SECONDS"),
            "SCANNER_FPS" => option_env!("SCANNER_FPS"),
            "SCANNER_QRBOX" => option_env!("SCANNER_QRBOX"),
            "SCANNER_FACING_MODE" => option_env!("SCANNER_FACING_MODE"),
            _ => None,
        })
    }

    /// Construye la configuración a partir de un lookup clave → valor.
    /// Valores ausentes o inválidos caen al default.
    pub fn from_values<'a, F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<&'a str>,
    {
        let defaults = Self::default();
        let parse_u32 = |key: &str, fallback: u32| {
            lookup(key)
                .and_then(|v| v.trim().parse::<u32>().ok())
                .filter(|v| *v > 0)
                .unwrap_or(fallback)
        };

        Self {
            backend_url: lookup("BACKEND_URL")
                .map(|url| url.trim().trim_end_matches('/').to_string())
                .filter(|url| !url.is_empty())
                .unwrap_or(defaults.backend_url),
            environment: lookup("ENVIRONMENT")
                .map(|s| s.to_string())
                .unwrap_or(defaults.environment),
            enable_logging: lookup("ENABLE_LOGGING")
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(defaults.enable_logging),
            network_timeout_seconds: parse_u32(
                "NETWORK_TIMEOUT_SECONDS",
                defaults.network_timeout_seconds,
            ),
            scanner: ScannerConfig {
                facing_mode: lookup("SCANNER_FACING_MODE")
                    .and_then(FacingMode::parse)
                    .unwrap_or(defaults.scanner.facing_mode),
                fps: parse_u32("SCANNER_FPS", defaults.scanner.fps),
                qrbox: parse_u32("SCANNER_QRBOX", defaults.scanner.qrbox),
            },
        }
    }

    pub fn log_level(&self) -> log::Level {
        if self.enable_logging {
            log::Level::Info
        } else {
            log::Level::Warn
        }
    }
}

// Configuración global estática
lazy_static::lazy_static! {
    pub static ref CONFIG: AppConfig = AppConfig::from_env();
}
