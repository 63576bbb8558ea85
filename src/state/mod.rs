// ============================================================================
// STATE MODULE - State Management con Rc<RefCell> + notificaciones
// ============================================================================

pub mod reactivity;
pub mod scan_state;
pub mod view_state;
pub mod app_state;

pub use reactivity::*;
pub use scan_state::*;
pub use view_state::*;
pub use app_state::*;
