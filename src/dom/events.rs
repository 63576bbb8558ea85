// ============================================================================
// EVENT HANDLING - Sistema de eventos
// ============================================================================
// Listeners sobre elementos del DOM: cuando el elemento se destruye (p.ej. con
// set_inner_html("")) el navegador limpia los listeners, así que
// closure.forget() es seguro aquí. No usar para listeners en window/document.
// ============================================================================

use wasm_bindgen::prelude::*;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{Element, MouseEvent, SubmitEvent};

/// Helper para crear click handler simple
pub fn on_click<F>(element: &Element, handler: F) -> Result<(), JsValue>
where
    F: FnMut(MouseEvent) + 'static,
{
    let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(MouseEvent)>);
    element.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

/// Submit de formulario con preventDefault ya aplicado
pub fn on_submit<F>(form: &Element, mut handler: F) -> Result<(), JsValue>
where
    F: FnMut() + 'static,
{
    let closure = Closure::wrap(Box::new(move |event: SubmitEvent| {
        event.prevent_default();
        handler();
    }) as Box<dyn FnMut(SubmitEvent)>);
    form.add_event_listener_with_callback("submit", closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}
