// Utils compartidos

pub mod constants;
pub mod format;
pub mod qrcode_ffi;

pub use constants::*;
pub use format::*;
