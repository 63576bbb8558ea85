use crate::error::ErrorKind;
use crate::models::trip::TripRecord;

/// Fallo tipado de un fetch, con el mensaje a mostrar
#[derive(Clone, Debug, PartialEq)]
pub struct FetchFailure {
    pub kind: ErrorKind,
    pub message: String,
}

impl FetchFailure {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Resultado de consultar el backend para un ScanEvent
#[derive(Clone, Debug, PartialEq)]
pub enum FetchResult {
    Pending,
    Success(TripRecord),
    Failure(FetchFailure),
}

impl FetchResult {
    pub fn failure(kind: ErrorKind, message: impl Into<String>) -> Self {
        FetchResult::Failure(FetchFailure::new(kind, message))
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, FetchResult::Pending)
    }

    pub fn error_kind(&self) -> Option<ErrorKind> {
        match self {
            FetchResult::Failure(failure) => Some(failure.kind),
            _ => None,
        }
    }
}
