// ============================================================================
// ERRORES - Taxonomía de errores del flujo escanear → mostrar
// ============================================================================
// Los fallos de cámara y de red se convierten en señales (FetchResult /
// ScanState) en su origen; nada llega a las vistas como pánico.
// ============================================================================

use std::fmt;

/// Tipo de error visible para el usuario
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// Permiso de cámara denegado o sin cámara
    CameraAccess,
    /// No hay token guardado
    Unauthenticated,
    /// Respuesta HTTP no exitosa
    ServerError,
    /// Sin respuesta (red caída, timeout, CORS)
    NetworkError,
    /// 2xx con un cuerpo que no es un TripRecord
    MalformedResponse,
}

impl ErrorKind {
    /// Texto genérico para cuando no hay mensaje más concreto
    pub fn generic_message(&self) -> &'static str {
        match self {
            ErrorKind::CameraAccess => {
                "Failed to start the scanner. Please check your camera permissions."
            }
            ErrorKind::Unauthenticated => "No token found. Please log in again.",
            ErrorKind::ServerError => "An error occurred while fetching data.",
            ErrorKind::NetworkError => "Unable to reach the server. Check your connection.",
            ErrorKind::MalformedResponse => "Unexpected response from server.",
        }
    }

    /// Solo se recupera volviendo al login
    pub fn requires_login(&self) -> bool {
        matches!(self, ErrorKind::Unauthenticated)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::CameraAccess => "CameraAccessError",
            ErrorKind::Unauthenticated => "Unauthenticated",
            ErrorKind::ServerError => "ServerError",
            ErrorKind::NetworkError => "NetworkError",
            ErrorKind::MalformedResponse => "MalformedResponse",
        };
        f.write_str(name)
    }
}

/// Fallo al adquirir la cámara. Fatal para el ciclo de escaneo actual.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CameraAccessError {
    #[error("camera permission denied: {0}")]
    PermissionDenied(String),

    #[error("no camera available: {0}")]
    NoCamera(String),

    #[error("camera failed to start: {0}")]
    Other(String),
}

impl CameraAccessError {
    /// Clasifica el mensaje que devuelve el navegador / html5-qrcode
    /// (`NotAllowedError: Permission denied`, `NotFoundError: ...`).
    pub fn from_browser_message(message: &str) -> Self {
        let lower = message.to_ascii_lowercase();
        if lower.contains("notallowederror")
            || lower.contains("permission")
            || lower.contains("securityerror")
        {
            CameraAccessError::PermissionDenied(message.to_string())
        } else if lower.contains("notfounderror")
            || lower.contains("overconstrainederror")
            || lower.contains("no camera")
            || lower.contains("camera not found")
        {
            CameraAccessError::NoCamera(message.to_string())
        } else {
            CameraAccessError::Other(message.to_string())
        }
    }

    pub fn user_message(&self) -> &'static str {
        match self {
            CameraAccessError::NoCamera(_) => "No camera was found on this device.",
            _ => ErrorKind::CameraAccess.generic_message(),
        }
    }
}

/// Error al liberar la cámara. Se registra, nunca bloquea la limpieza.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("camera stop failed: {0}")]
pub struct CameraStopError(pub String);

/// Error de transporte HTTP (no hubo respuesta)
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("request could not be built: {0}")]
    Request(String),

    #[error("{0}")]
    Network(String),

    #[error("request timed out after {0}s")]
    Timeout(u32),
}

/// Error de acceso al sessionStorage
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum StorageError {
    #[error("could not write session storage: {0}")]
    Write(String),
}

/// Rechazo de `CameraDecoderSession::start`
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum StartError {
    #[error("a camera session is already active")]
    AlreadyActive,

    #[error(transparent)]
    Camera(#[from] CameraAccessError),
}

/// Rechazo de `ScanController::rearm`
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RearmError {
    #[error("scanner is not mounted")]
    NotMounted,

    #[error("a fetch is still pending")]
    FetchPending,

    #[error("camera is still active")]
    CameraActive,
}

/// Error del formulario de login
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum LoginError {
    #[error("{0}")]
    Rejected(String),

    #[error("Invalid email or password")]
    Unreachable,

    #[error("Unexpected response from server.")]
    Malformed,

    #[error("could not store token: {0}")]
    Storage(#[from] StorageError),
}
