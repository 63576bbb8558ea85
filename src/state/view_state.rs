// ============================================================================
// VIEW STATE - Reducción pura de las señales de escaneo a lo que se renderiza
// ============================================================================
// AwaitingScan → Pending (decodificado, fetch en vuelo) → Resolved
// Desde Resolved / CameraUnavailable / Idle se puede volver a escanear.
// ============================================================================

use crate::models::fetch::{FetchFailure, FetchResult};
use crate::models::scan::{ScanEvent, ScannerLifecycleState};
use crate::models::trip::TripRecord;
use crate::state::scan_state::ScanSnapshot;

#[derive(Clone, Debug, PartialEq)]
pub enum Resolution {
    Success(TripRecord),
    Failure(FetchFailure),
}

#[derive(Clone, Debug, PartialEq)]
pub enum ViewState {
    /// Cámara apagada, sin resultado que mostrar
    Idle,
    /// Esperando el permiso de cámara
    Starting,
    /// Cámara activa, sin código todavía
    AwaitingScan,
    /// Código leído, consulta en curso
    Pending { scan: ScanEvent },
    Resolved { scan: ScanEvent, resolution: Resolution },
    CameraUnavailable { message: String },
}

impl ViewState {
    pub fn derive(snapshot: &ScanSnapshot) -> Self {
        if let Some(error) = &snapshot.camera_error {
            return ViewState::CameraUnavailable {
                message: error.user_message().to_string(),
            };
        }

        match (&snapshot.scan, &snapshot.fetch) {
            (Some(scan), Some(FetchResult::Success(record))) => ViewState::Resolved {
                scan: scan.clone(),
                resolution: Resolution::Success(record.clone()),
            },
            (Some(scan), Some(FetchResult::Failure(failure))) => ViewState::Resolved {
                scan: scan.clone(),
                resolution: Resolution::Failure(failure.clone()),
            },
            (Some(scan), _) => ViewState::Pending { scan: scan.clone() },
            (None, _) => match snapshot.lifecycle {
                ScannerLifecycleState::Starting => ViewState::Starting,
                ScannerLifecycleState::Active => ViewState::AwaitingScan,
                ScannerLifecycleState::Idle | ScannerLifecycleState::Stopping => ViewState::Idle,
            },
        }
    }

    /// Se muestra el botón de volver a escanear
    pub fn can_rearm(&self) -> bool {
        matches!(
            self,
            ViewState::Idle | ViewState::Resolved { .. } | ViewState::CameraUnavailable { .. }
        )
    }

    pub fn scan(&self) -> Option<&ScanEvent> {
        match self {
            ViewState::Pending { scan } | ViewState::Resolved { scan, .. } => Some(scan),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ViewState::Idle => "Idle",
            ViewState::Starting => "Starting",
            ViewState::AwaitingScan => "AwaitingScan",
            ViewState::Pending { .. } => "Pending",
            ViewState::Resolved { resolution: Resolution::Success(_), .. } => "Resolved(Success)",
            ViewState::Resolved { resolution: Resolution::Failure(_), .. } => "Resolved(Failure)",
            ViewState::CameraUnavailable { .. } => "CameraUnavailable",
        }
    }
}
