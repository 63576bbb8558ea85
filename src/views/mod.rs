pub mod login;
pub mod scanner;
pub mod trip_details;

pub use login::{render_login, update_login_status};
pub use scanner::{render_scan_page, update_scan_panel, ScanActions};
