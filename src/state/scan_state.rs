// ============================================================================
// SCAN STATE - Señales del ciclo de escaneo (las escribe solo el ScanController)
// ============================================================================

use crate::error::CameraAccessError;
use crate::models::fetch::FetchResult;
use crate::models::scan::{ScanEvent, ScannerLifecycleState};
use crate::state::reactivity::ReactiveState;
use crate::state::view_state::ViewState;

/// Foto del ciclo actual
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ScanSnapshot {
    pub lifecycle: ScannerLifecycleState,
    pub scan: Option<ScanEvent>,
    pub fetch: Option<FetchResult>,
    pub camera_error: Option<CameraAccessError>,
}

impl ScanSnapshot {
    pub fn fetch_pending(&self) -> bool {
        self.fetch.as_ref().map_or(false, FetchResult::is_pending)
    }

    pub fn view(&self) -> ViewState {
        ViewState::derive(self)
    }
}

/// Estado de escaneo
#[derive(Clone)]
pub struct ScanState {
    inner: ReactiveState<ScanSnapshot>,
}

impl ScanState {
    pub fn new() -> Self {
        Self {
            inner: ReactiveState::new(ScanSnapshot::default()),
        }
    }

    pub fn snapshot(&self) -> ScanSnapshot {
        self.inner.get()
    }

    pub fn view(&self) -> ViewState {
        self.inner.get().view()
    }

    pub fn update<F>(&self, updater: F)
    where
        F: FnOnce(&mut ScanSnapshot),
    {
        self.inner.update(updater);
    }

    /// Vuelve al estado inicial (nuevo montaje o nuevo ciclo)
    pub fn reset(&self) {
        self.inner.set(ScanSnapshot::default());
    }

    pub fn subscribe<F>(&self, callback: F)
    where
        F: Fn() + 'static,
    {
        self.inner.subscribe(callback);
    }
}

impl Default for ScanState {
    fn default() -> Self {
        Self::new()
    }
}
