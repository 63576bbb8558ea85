pub mod scan_controller;

pub use scan_controller::{BrowserScanController, ScanController};
