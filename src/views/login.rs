// ============================================================================
// LOGIN VIEW - Formulario caserne_id + password (Rust puro)
// ============================================================================

use std::rc::Rc;
use wasm_bindgen::prelude::*;
use web_sys::Element;
use crate::dom::{get_element_by_id, input_value, on_submit, set_disabled, ElementBuilder};
use crate::state::app_state::AppState;

const ERROR_ID: &str = "login-error";
const SUBMIT_ID: &str = "login-submit";
const CASERNE_INPUT_ID: &str = "caserne-id";
const PASSWORD_INPUT_ID: &str = "password";

/// Renderizar vista de login. `on_login(caserne_id, password)`.
pub fn render_login(
    state: &AppState,
    on_login: Rc<dyn Fn(String, String)>,
) -> Result<Element, JsValue> {
    log::info!("🎬 [LOGIN] render_login()");

    let title = ElementBuilder::new("h2")?.text("Login").build();

    let error = ElementBuilder::new("div")?
        .id(ERROR_ID)
        .class("error-banner")
        .build();

    let caserne = ElementBuilder::new("input")?
        .id(CASERNE_INPUT_ID)
        .class("form-input")
        .attr("type", "text")?
        .attr("placeholder", "Enter ID")?
        .attr("autocomplete", "username")?
        .flag("required", true)?
        .build();

    let password = ElementBuilder::new("input")?
        .id(PASSWORD_INPUT_ID)
        .class("form-input")
        .attr("type", "password")?
        .attr("placeholder", "Password")?
        .attr("autocomplete", "current-password")?
        .flag("required", true)?
        .build();

    let submit = ElementBuilder::new("button")?
        .id(SUBMIT_ID)
        .class("btn-primary")
        .attr("type", "submit")?
        .text("Log In")
        .build();

    let form = ElementBuilder::new("form")?
        .class("login-form")
        .children([caserne, password, submit])?
        .build();

    {
        let state = state.clone();
        on_submit(&form, move || {
            if *state.login_pending.borrow() {
                return;
            }
            on_login(input_value(CASERNE_INPUT_ID), input_value(PASSWORD_INPUT_ID));
        })?;
    }

    let container = ElementBuilder::new("div")?
        .class("login-container")
        .children([title, error, form])?
        .build();

    let screen = ElementBuilder::new("div")?
        .class("login-screen")
        .child(container)?
        .build();

    paint_status(&screen, state);
    Ok(screen)
}

/// Actualización incremental: banner de error y botón
pub fn update_login_status(state: &AppState) -> Result<(), JsValue> {
    let screen = get_element_by_id(ERROR_ID)
        .and_then(|el| el.closest(".login-screen").ok().flatten())
        .ok_or_else(|| JsValue::from_str("Login view not mounted, needs full render"))?;
    paint_status(&screen, state);
    Ok(())
}

fn paint_status(screen: &Element, state: &AppState) {
    let pending = *state.login_pending.borrow();
    let error = state.login_error.borrow().clone();

    if let Ok(Some(banner)) = screen.query_selector(&format!("#{}", ERROR_ID)) {
        match error {
            Some(message) => {
                banner.set_text_content(Some(&message));
                banner.set_class_name("error-banner visible");
            }
            None => {
                banner.set_text_content(None);
                banner.set_class_name("error-banner");
            }
        }
    }

    if let Ok(Some(button)) = screen.query_selector(&format!("#{}", SUBMIT_ID)) {
        set_disabled(&button, pending);
        button.set_text_content(Some(if pending { "Connexion..." } else { "Log In" }));
    }
}
