// ============================================================================
// APP - Aplicación principal: rutas login / escáner
// ============================================================================

use std::rc::Rc;
use gloo_timers::callback::Timeout;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::Element;
use crate::config::CONFIG;
use crate::dom::{get_element_by_id, replace_children};
use crate::services::{
    ApiClient, AuthService, BrowserAuthService, CameraDecoderSession, CredentialStore,
    DataFetcher, GlooTransport, Html5QrcodeCamera, SessionStorageCredentials,
};
use crate::state::app_state::{AppState, IncrementalUpdate, Route, UpdateType};
use crate::utils::constants::{APP_ROOT_ELEMENT_ID, READER_ELEMENT_ID};
use crate::viewmodels::{BrowserScanController, ScanController};
use crate::views::{render_login, render_scan_page, update_login_status, update_scan_panel, ScanActions};

/// Aplicación principal
pub struct App {
    state: AppState,
    controller: Rc<BrowserScanController>,
    auth: Rc<BrowserAuthService>,
    root: Element,
    rendered_route: Option<Route>,
}

impl App {
    /// Crear nueva aplicación
    pub fn new() -> Result<Self, JsValue> {
        let root = get_element_by_id(APP_ROOT_ELEMENT_ID)
            .ok_or_else(|| JsValue::from_str("No #app element found"))?;

        let credentials = SessionStorageCredentials::new();
        let has_token = credentials.load().is_some();
        log::info!(
            "🔑 [APP] Token {}",
            if has_token { "encontrado en sessionStorage" } else { "ausente, mostrando login" }
        );
        let state = AppState::new(Route::initial(has_token));

        let transport = GlooTransport::new(CONFIG.network_timeout_seconds);
        let controller = Rc::new(ScanController::new(
            CameraDecoderSession::new(Html5QrcodeCamera::new(READER_ELEMENT_ID)),
            DataFetcher::new(
                ApiClient::new(CONFIG.backend_url.clone(), transport.clone()),
                credentials.clone(),
            ),
            CONFIG.scanner.facing_mode,
            CONFIG.scanner.scan_config(),
        ));
        let auth = Rc::new(AuthService::new(
            ApiClient::new(CONFIG.backend_url.clone(), transport),
            credentials,
        ));

        // Batchear updates con Timeout(0): nunca re-renderizar dentro de otro render
        state.subscribe_to_changes(|| {
            Timeout::new(0, crate::rerender_app).forget();
        });
        controller.state().subscribe(|| {
            Timeout::new(0, || {
                crate::rerender_app_with_type(UpdateType::Incremental(IncrementalUpdate::ScanPanel));
            })
            .forget();
        });

        Ok(Self {
            state,
            controller,
            auth,
            root,
            rendered_route: None,
        })
    }

    /// Renderizar la pantalla actual. Entrar/salir del escáner monta/desmonta
    /// la cámara.
    pub fn render(&mut self) -> Result<(), JsValue> {
        let route = self.state.route();
        log::info!("🎬 [APP] render() → {:?}", route);

        let scanner_live = self.rendered_route == Some(Route::Scan) || self.controller.is_mounted();
        if scanner_live && route != Route::Scan {
            let controller = self.controller.clone();
            spawn_local(async move { controller.unmount().await });
        }

        let view = match route {
            Route::Login => render_login(&self.state, self.login_action())?,
            Route::Scan => render_scan_page(&self.controller.state().view(), &self.scan_actions())?,
        };
        replace_children(&self.root, &view)?;

        // #reader ya está en el DOM: html5-qrcode lo necesita al arrancar
        if route == Route::Scan && self.rendered_route != Some(Route::Scan) {
            let controller = self.controller.clone();
            spawn_local(async move { controller.mount().await });
        }

        self.rendered_route = Some(route);
        Ok(())
    }

    pub fn rendered_route(&self) -> Option<Route> {
        self.rendered_route
    }

    /// Cambio de pantalla → render completo; si no, solo el estado del login
    pub fn refresh(&mut self) -> Result<(), JsValue> {
        let route = self.state.route();
        if self.rendered_route != Some(route) {
            return self.render();
        }
        match route {
            Route::Login => self.update_incremental(IncrementalUpdate::LoginStatus),
            Route::Scan => Ok(()),
        }
    }

    /// Actualización incremental del DOM (solo elementos específicos)
    pub fn update_incremental(&self, update: IncrementalUpdate) -> Result<(), JsValue> {
        match update {
            IncrementalUpdate::LoginStatus => update_login_status(&self.state),
            IncrementalUpdate::ScanPanel => {
                if self.rendered_route != Some(Route::Scan) {
                    return Ok(());
                }
                update_scan_panel(&self.controller.state().view(), &self.scan_actions())
            }
        }
    }

    fn login_action(&self) -> Rc<dyn Fn(String, String)> {
        let state = self.state.clone();
        let auth = self.auth.clone();
        Rc::new(move |caserne_id: String, password: String| {
            state.set_login_pending(true);
            let state = state.clone();
            let auth = auth.clone();
            spawn_local(async move {
                match auth.login(&caserne_id, &password).await {
                    Ok(()) => state.navigate(Route::Scan),
                    Err(e) => state.set_login_error(Some(e.to_string())),
                }
            });
        })
    }

    fn scan_actions(&self) -> ScanActions {
        let controller = self.controller.clone();
        let state = self.state.clone();
        ScanActions {
            on_scan: Rc::new(move || {
                let controller = controller.clone();
                spawn_local(async move {
                    if let Err(e) = controller.rearm().await {
                        log::warn!("⚠️ [APP] Escanear de nuevo rechazado: {}", e);
                    }
                });
            }),
            on_back_to_login: Rc::new(move || state.navigate(Route::Login)),
        }
    }
}
