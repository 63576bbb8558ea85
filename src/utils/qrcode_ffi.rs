// ============================================================================
// QR SCANNER FFI - Bindings a html5-qrcode (cargado con <script> en index.html)
// ============================================================================
// Wrappers para la clase JS Html5Qrcode - Sin estado, sin lógica
// ============================================================================

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use js_sys::{Object, Reflect};
use crate::models::scan::{FacingMode, ScanConfig};

#[wasm_bindgen]
extern "C" {
    #[derive(Clone, Debug)]
    pub type Html5Qrcode;

    #[wasm_bindgen(constructor, catch)]
    pub fn new(element_id: &str) -> Result<Html5Qrcode, JsValue>;

    /// `start(cameraConfig, config, onSuccess, onError) -> Promise<null>`
    #[wasm_bindgen(method, catch)]
    pub fn start(
        this: &Html5Qrcode,
        camera_config: &JsValue,
        config: &JsValue,
        on_decoded: &js_sys::Function,
        on_frame_error: &js_sys::Function,
    ) -> Result<js_sys::Promise, JsValue>;

    /// `stop() -> Promise<void>`
    #[wasm_bindgen(method, catch)]
    pub fn stop(this: &Html5Qrcode) -> Result<js_sys::Promise, JsValue>;

    #[wasm_bindgen(method, catch)]
    pub fn clear(this: &Html5Qrcode) -> Result<(), JsValue>;
}

/// `{ facingMode: "environment" }`
pub fn camera_config(facing: FacingMode) -> Result<JsValue, JsValue> {
    let obj = Object::new();
    Reflect::set(&obj, &"facingMode".into(), &facing.as_str().into())?;
    Ok(obj.into())
}

/// `{ fps: 10, qrbox: 250 }`
pub fn scan_config(config: &ScanConfig) -> Result<JsValue, JsValue> {
    let obj = Object::new();
    Reflect::set(&obj, &"fps".into(), &JsValue::from(config.fps))?;
    Reflect::set(&obj, &"qrbox".into(), &JsValue::from(config.qrbox))?;
    Ok(obj.into())
}

/// Texto legible de un error JS (string, Error o cualquier otra cosa)
pub fn js_error_message(err: &JsValue) -> String {
    if let Some(s) = err.as_string() {
        return s;
    }
    if let Some(e) = err.dyn_ref::<js_sys::Error>() {
        let name: String = e.name().into();
        let message: String = e.message().into();
        return format!("{}: {}", name, message);
    }
    format!("{:?}", err)
}
