// ============================================================================
// TRIP SCANNER - FRONTEND MVVM (RUST PURO)
// ============================================================================
// Arquitectura:
// - Views: Funciones que renderizan DOM (sin lógica)
// - ViewModels: ScanController (cámara → fetch → estado)
// - Services: Cámara, HTTP, credenciales
// - State: State Management con Rc<RefCell>
// - Models: Estructuras compartidas con backend
// ============================================================================

pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod state;
pub mod utils;
pub mod viewmodels;
mod app;
mod dom;
mod views;

#[cfg(test)]
mod testing;

use std::cell::RefCell;
use wasm_bindgen::prelude::*;
use crate::app::App;
use crate::config::CONFIG;
use crate::state::app_state::UpdateType;

// Variable estática global para mantener la instancia de App
thread_local! {
    static APP: RefCell<Option<App>> = RefCell::new(None);
}

#[wasm_bindgen(start)]
pub fn main() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::new(CONFIG.log_level()));
    log::info!(
        "🚀 Trip Scanner - Rust Puro + MVVM ({}, backend {})",
        CONFIG.environment,
        CONFIG.backend_url
    );

    let mut app = App::new()?;
    app.render()?;

    APP.with(|app_cell| {
        *app_cell.borrow_mut() = Some(app);
    });

    Ok(())
}

/// Re-render según el estado (pantalla nueva → completo, si no incremental)
pub fn rerender_app() {
    rerender_app_with_type(UpdateType::FullRender);
}

/// Función pública para actualizar la app con tipo específico
pub fn rerender_app_with_type(update_type: UpdateType) {
    APP.with(|app_cell| {
        let Ok(mut slot) = app_cell.try_borrow_mut() else {
            log::warn!("⚠️ [UPDATE] App ocupada, update {:?} descartado", update_type);
            return;
        };
        let Some(app) = slot.as_mut() else {
            log::warn!("⚠️ [UPDATE] App no está inicializada");
            return;
        };

        let result = match update_type {
            UpdateType::FullRender => app.refresh(),
            UpdateType::Incremental(update) => match app.update_incremental(update) {
                Ok(()) => Ok(()),
                Err(e) if app.rendered_route().is_some_and(|r| !r.rebuilds_on_failed_update()) => {
                    log::warn!("⚠️ [UPDATE] Incremental {:?} falló ({:?}), DOM intacto", update, e);
                    Ok(())
                }
                Err(e) => {
                    log::debug!("🔄 [UPDATE] Incremental falló ({:?}), re-render completo", e);
                    app.render()
                }
            },
        };
        if let Err(e) = result {
            log::error!("❌ [UPDATE] Error actualizando la vista: {:?}", e);
        }
    });
}
