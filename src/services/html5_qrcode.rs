// ============================================================================
// HTML5-QRCODE CAMERA - CameraDevice del navegador
// ============================================================================
// Envuelve Html5Qrcode.start/stop (promesas) en open/close awaitables. Los
// callbacks por frame se reenvían al FrameSink y viven hasta que stop()
// resuelve. Si stop() falla el escáner sigue corriendo: se conserva para
// reintentar la liberación en el próximo close/open.
// ============================================================================

use std::cell::RefCell;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use crate::error::{CameraAccessError, CameraStopError};
use crate::models::scan::{FacingMode, ScanConfig};
use crate::services::camera_session::{CameraDevice, FrameSink};
use crate::utils::qrcode_ffi::{self, Html5Qrcode};

type FrameCallback = Closure<dyn FnMut(String, JsValue)>;

/// Escáner arrancado que hay que parar antes de soltarlo
#[allow(async_fn_in_trait)]
pub trait RunningScanner {
    async fn stop(&self) -> Result<(), CameraStopError>;
    fn clear(&self);
}

/// Hueco del escáner activo. Solo se vacía cuando stop() tuvo éxito.
pub struct ScannerSlot<S> {
    active: RefCell<Option<S>>,
}

impl<S: RunningScanner> ScannerSlot<S> {
    pub fn new() -> Self {
        Self {
            active: RefCell::new(None),
        }
    }

    pub fn install(&self, scanner: S) {
        *self.active.borrow_mut() = Some(scanner);
    }

    pub fn take(&self) -> Option<S> {
        self.active.borrow_mut().take()
    }

    pub fn is_held(&self) -> bool {
        self.active.borrow().is_some()
    }

    /// Para y suelta el escáner. Con error, vuelve al hueco tal cual.
    pub async fn release(&self) -> Result<(), CameraStopError> {
        let Some(scanner) = self.take() else {
            return Ok(());
        };
        if let Err(e) = scanner.stop().await {
            log::warn!("⚠️ [CAMERA] stop falló, el escáner se conserva: {}", e);
            self.install(scanner);
            return Err(e);
        }
        scanner.clear();
        Ok(())
    }
}

impl<S: RunningScanner> Default for ScannerSlot<S> {
    fn default() -> Self {
        Self::new()
    }
}

struct ActiveScanner {
    scanner: Html5Qrcode,
    _on_decoded: FrameCallback,
    _on_miss: FrameCallback,
}

impl RunningScanner for ActiveScanner {
    async fn stop(&self) -> Result<(), CameraStopError> {
        let to_stop_error = |e: JsValue| CameraStopError(qrcode_ffi::js_error_message(&e));
        let promise = self.scanner.stop().map_err(to_stop_error)?;
        JsFuture::from(promise).await.map_err(to_stop_error)?;
        Ok(())
    }

    fn clear(&self) {
        if let Err(e) = self.scanner.clear() {
            log::debug!("📷 [CAMERA] clear falló: {}", qrcode_ffi::js_error_message(&e));
        }
    }
}

/// Cámara + decodificador html5-qrcode montado sobre `#<element_id>`
pub struct Html5QrcodeCamera {
    element_id: String,
    active: ScannerSlot<ActiveScanner>,
}

impl Html5QrcodeCamera {
    pub fn new(element_id: impl Into<String>) -> Self {
        Self {
            element_id: element_id.into(),
            active: ScannerSlot::new(),
        }
    }
}

impl CameraDevice for Html5QrcodeCamera {
    async fn open(
        &self,
        facing: FacingMode,
        config: &ScanConfig,
        frames: FrameSink,
    ) -> Result<(), CameraAccessError> {
        let to_camera_error =
            |e: JsValue| CameraAccessError::from_browser_message(&qrcode_ffi::js_error_message(&e));

        if self.active.is_held() {
            log::warn!("⚠️ [CAMERA] Escáner anterior sin liberar, reintentando stop");
            self.active
                .release()
                .await
                .map_err(|e| CameraAccessError::Other(e.0))?;
        }

        let scanner = Html5Qrcode::new(&self.element_id).map_err(to_camera_error)?;
        let camera_config = qrcode_ffi::camera_config(facing).map_err(to_camera_error)?;
        let scan_config = qrcode_ffi::scan_config(config).map_err(to_camera_error)?;

        let on_decoded = {
            let frames = frames.clone();
            Closure::wrap(Box::new(move |text: String, _result: JsValue| {
                frames.decoded(&text);
            }) as Box<dyn FnMut(String, JsValue)>)
        };
        let on_miss = Closure::wrap(Box::new(move |reason: String, _error: JsValue| {
            frames.missed(&reason);
        }) as Box<dyn FnMut(String, JsValue)>);

        let promise = scanner
            .start(
                &camera_config,
                &scan_config,
                on_decoded.as_ref().unchecked_ref(),
                on_miss.as_ref().unchecked_ref(),
            )
            .map_err(to_camera_error)?;

        // Los closures se guardan antes del await: el primer frame puede
        // llegar antes de que la promesa resuelva
        self.active.install(ActiveScanner {
            scanner,
            _on_decoded: on_decoded,
            _on_miss: on_miss,
        });

        if let Err(e) = JsFuture::from(promise).await {
            let error = to_camera_error(e);
            if let Some(active) = self.active.take() {
                active.clear();
            }
            return Err(error);
        }
        Ok(())
    }

    async fn close(&self) -> Result<(), CameraStopError> {
        self.active.release().await
    }
}
