// ============================================================================
// SCANNER VIEW - Página de escaneo QR (html5-qrcode sobre #reader)
// ============================================================================
// `#reader` pertenece a la librería de cámara: se crea una vez por página y
// los cambios de estado solo repintan `#scan-panel`.
// ============================================================================

use std::rc::Rc;
use wasm_bindgen::prelude::*;
use web_sys::Element;
use crate::dom::{get_element_by_id, on_click, replace_children, ElementBuilder};
use crate::state::view_state::{Resolution, ViewState};
use crate::utils::constants::{READER_ELEMENT_ID, SCAN_PANEL_ELEMENT_ID};
use crate::utils::format::format_local_time;
use crate::views::trip_details::render_trip_record;

/// Acciones del usuario en la página de escaneo
#[derive(Clone)]
pub struct ScanActions {
    pub on_scan: Rc<dyn Fn()>,
    pub on_back_to_login: Rc<dyn Fn()>,
}

/// Texto del botón y si está deshabilitado. `None`: sin botón.
pub fn scan_button(view: &ViewState) -> Option<(&'static str, bool)> {
    match view {
        ViewState::Starting | ViewState::AwaitingScan => Some(("Scanning...", true)),
        ViewState::Pending { .. } => None,
        ViewState::Idle | ViewState::CameraUnavailable { .. } => Some(("Scan QR Code", false)),
        ViewState::Resolved { .. } => Some(("Scan QR Code", !view.can_rearm())),
    }
}

/// Mensaje de error visible y si solo se arregla volviendo al login
pub fn error_banner(view: &ViewState) -> Option<(String, bool)> {
    match view {
        ViewState::CameraUnavailable { message } => Some((message.clone(), false)),
        ViewState::Resolved {
            resolution: Resolution::Failure(failure),
            ..
        } => Some((failure.message.clone(), failure.kind.requires_login())),
        _ => None,
    }
}

/// Renderizar página completa
pub fn render_scan_page(view: &ViewState, actions: &ScanActions) -> Result<Element, JsValue> {
    let title = ElementBuilder::new("h1")?.text("QR Code Scanner").build();

    let reader = ElementBuilder::new("div")?
        .id(READER_ELEMENT_ID)
        .class("reader")
        .build();

    let panel = ElementBuilder::new("div")?
        .id(SCAN_PANEL_ELEMENT_ID)
        .class("scan-panel")
        .child(render_scan_panel(view, actions)?)?
        .build();

    Ok(ElementBuilder::new("div")?
        .class("scan-page")
        .children([title, reader, panel])?
        .build())
}

/// Actualización incremental del panel
pub fn update_scan_panel(view: &ViewState, actions: &ScanActions) -> Result<(), JsValue> {
    let panel = get_element_by_id(SCAN_PANEL_ELEMENT_ID)
        .ok_or_else(|| JsValue::from_str("Scan panel not found, needs full render"))?;
    replace_children(&panel, &render_scan_panel(view, actions)?)
}

fn render_scan_panel(view: &ViewState, actions: &ScanActions) -> Result<Element, JsValue> {
    log::debug!("🎨 [SCAN] Pintando panel: {}", view.name());
    let content = ElementBuilder::new("div")?.class("scan-panel-content").build();

    if let Some((message, requires_login)) = error_banner(view) {
        let banner = ElementBuilder::new("div")?
            .class("error-banner visible")
            .text(&message)
            .build();
        if requires_login {
            let back = ElementBuilder::new("button")?
                .class("btn-secondary")
                .text("Back to login")
                .build();
            let on_back = actions.on_back_to_login.clone();
            on_click(&back, move |_| on_back())?;
            banner.append_child(&back)?;
        }
        content.append_child(&banner)?;
    }

    if let Some((label, disabled)) = scan_button(view) {
        let button = ElementBuilder::new("button")?
            .class("btn-primary btn-scan")
            .flag("disabled", disabled)?
            .text(label)
            .build();
        if !disabled {
            let on_scan = actions.on_scan.clone();
            on_click(&button, move |_| on_scan())?;
        }
        content.append_child(&button)?;
    }

    if let Some(scan) = view.scan() {
        let heading = ElementBuilder::new("h2")?.text("Scanned Data").build();
        let payload = ElementBuilder::new("pre")?.class("scanned-payload").text(&scan.payload).build();
        let when = ElementBuilder::new("small")?
            .class("scanned-at")
            .text(&format_local_time(&scan.timestamp))
            .build();
        let block = ElementBuilder::new("div")?
            .class("scanned-data")
            .children([heading, payload, when])?
            .build();
        content.append_child(&block)?;
    }

    match view {
        ViewState::Pending { .. } => {
            let loading = ElementBuilder::new("p")?
                .class("loading")
                .text("Chargement des données...")
                .build();
            content.append_child(&loading)?;
        }
        ViewState::Resolved {
            resolution: Resolution::Success(record),
            ..
        } => {
            let details = render_trip_record(record)?;
            content.append_child(&details)?;
        }
        _ => {}
    }

    Ok(content)
}
