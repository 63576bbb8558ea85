use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Un código decodificado. Se crea una sola vez por activación de la cámara.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScanEvent {
    pub payload: String,
    pub timestamp: DateTime<Utc>,
}

impl ScanEvent {
    pub fn new(payload: impl Into<String>) -> Self {
        Self {
            payload: payload.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Cámara preferida (`facingMode` de getUserMedia)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FacingMode {
    /// Cámara trasera
    Environment,
    /// Cámara frontal
    User,
}

impl FacingMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            FacingMode::Environment => "environment",
            FacingMode::User => "user",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "environment" | "rear" | "back" => Some(FacingMode::Environment),
            "user" | "front" => Some(FacingMode::User),
            _ => None,
        }
    }
}

impl Default for FacingMode {
    fn default() -> Self {
        FacingMode::Environment
    }
}

/// Muestreo de frames y tamaño de la zona de detección
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScanConfig {
    pub fps: u32,
    /// Lado del recuadro de detección en píxeles
    pub qrbox: u32,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self { fps: 10, qrbox: 250 }
    }
}

/// Estado de la cámara visto por el controlador
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ScannerLifecycleState {
    #[default]
    Idle,
    Starting,
    Active,
    Stopping,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_facing_mode_aliases() {
        assert_eq!(FacingMode::parse("environment"), Some(FacingMode::Environment));
        assert_eq!(FacingMode::parse(" Rear "), Some(FacingMode::Environment));
        assert_eq!(FacingMode::parse("front"), Some(FacingMode::User));
        assert_eq!(FacingMode::parse("sideways"), None);
    }
}
