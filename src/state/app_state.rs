// ============================================================================
// APP STATE - Estado global de la aplicación
// ============================================================================

use std::cell::RefCell;
use std::rc::Rc;

/// Tipo de actualización del DOM
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UpdateType {
    /// Actualización incremental (solo elementos específicos)
    Incremental(IncrementalUpdate),
    /// Re-render completo (cambio de pantalla)
    FullRender,
}

/// Tipo de actualización incremental específica
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IncrementalUpdate {
    /// Banner de error + botón del formulario de login
    LoginStatus,
    /// Panel de estado del escáner (`#scan-panel`), sin tocar `#reader`
    ScanPanel,
}

/// Pantalla visible
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Route {
    Login,
    Scan,
}

impl Route {
    /// Con token guardado se entra directo al escáner
    pub fn initial(has_token: bool) -> Self {
        if has_token {
            Route::Scan
        } else {
            Route::Login
        }
    }

    /// Si un update incremental falla, ¿se puede rehacer la pantalla entera?
    /// En el escáner no: `#reader` es de html5-qrcode mientras la cámara vive.
    pub fn rebuilds_on_failed_update(self) -> bool {
        !matches!(self, Route::Scan)
    }
}

/// Estado global de la aplicación
#[derive(Clone)]
pub struct AppState {
    pub route: Rc<RefCell<Route>>,

    // Login form
    pub login_pending: Rc<RefCell<bool>>,
    pub login_error: Rc<RefCell<Option<String>>>,

    // Reactivity: Callbacks para notificar cambios
    pub change_subscribers: Rc<RefCell<Vec<Rc<dyn Fn()>>>>,
}

impl AppState {
    pub fn new(route: Route) -> Self {
        Self {
            route: Rc::new(RefCell::new(route)),
            login_pending: Rc::new(RefCell::new(false)),
            login_error: Rc::new(RefCell::new(None)),
            change_subscribers: Rc::new(RefCell::new(Vec::new())),
        }
    }

    pub fn route(&self) -> Route {
        *self.route.borrow()
    }

    /// Cambiar de pantalla. Limpia el formulario de login.
    pub fn navigate(&self, route: Route) {
        if self.route() == route {
            return;
        }
        log::info!("🧭 [APP] Navegando a {:?}", route);
        *self.route.borrow_mut() = route;
        *self.login_pending.borrow_mut() = false;
        *self.login_error.borrow_mut() = None;
        self.notify_subscribers();
    }

    pub fn set_login_pending(&self, pending: bool) {
        *self.login_pending.borrow_mut() = pending;
        self.notify_subscribers();
    }

    pub fn set_login_error(&self, error: Option<String>) {
        *self.login_pending.borrow_mut() = false;
        *self.login_error.borrow_mut() = error;
        self.notify_subscribers();
    }

    /// Suscribirse a cambios de pantalla / formulario
    pub fn subscribe_to_changes<F>(&self, callback: F)
    where
        F: Fn() + 'static,
    {
        self.change_subscribers.borrow_mut().push(Rc::new(callback));
    }

    fn notify_subscribers(&self) {
        let subscribers: Vec<Rc<dyn Fn()>> = self.change_subscribers.borrow().clone();
        for callback in subscribers {
            callback();
        }
    }
}
