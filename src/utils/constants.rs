/// Clave del token en sessionStorage
pub const STORAGE_KEY_TOKEN: &str = "token";

pub const LOGIN_PATH: &str = "/api/login";
pub const SCAN_QR_CODE_PATH: &str = "/api/app/scanQrCode";

/// Contenedor que html5-qrcode usa para el vídeo
pub const READER_ELEMENT_ID: &str = "reader";
pub const SCAN_PANEL_ELEMENT_ID: &str = "scan-panel";
pub const APP_ROOT_ELEMENT_ID: &str = "app";
