pub mod auth;
pub mod fetch;
pub mod scan;
pub mod trip;

pub use auth::{ApiMessage, LoginRequest, LoginResponse, ScanQrCodeRequest};
pub use fetch::{FetchFailure, FetchResult};
pub use scan::{FacingMode, ScanConfig, ScanEvent, ScannerLifecycleState};
pub use trip::{CargoItem, Driver, Trip, TripRecord, Vehicle};
