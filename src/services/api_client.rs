// ============================================================================
// API CLIENT - SOLO COMUNICACIÓN HTTP (Stateless)
// ============================================================================
// NO tiene lógica de negocio, solo arma requests y devuelve la respuesta cruda
// ============================================================================

use crate::error::TransportError;
use crate::models::auth::{LoginRequest, ScanQrCodeRequest};
use crate::services::http_transport::{HttpResponse, HttpTransport};
use crate::utils::constants::{LOGIN_PATH, SCAN_QR_CODE_PATH};

/// Cliente API - SOLO comunicación HTTP (stateless)
#[derive(Clone, Debug)]
pub struct ApiClient<T> {
    base_url: String,
    transport: T,
}

impl<T: HttpTransport> ApiClient<T> {
    pub fn new(base_url: impl Into<String>, transport: T) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            transport,
        }
    }

    /// `POST /api/login`
    pub async fn login(&self, request: &LoginRequest) -> Result<HttpResponse, TransportError> {
        let url = format!("{}{}", self.base_url, LOGIN_PATH);
        let body = serde_json::to_string(request)
            .map_err(|e| TransportError::Request(format!("Serialization error: {}", e)))?;

        log::info!("🔐 Login para caserne: {}", request.caserne_id);
        self.transport.post_json(&url, None, body).await
    }

    /// `POST /api/app/scanQrCode` con `Authorization: Bearer <token>`
    pub async fn scan_qr_code(
        &self,
        token: &str,
        qrcode: &str,
    ) -> Result<HttpResponse, TransportError> {
        let url = format!("{}{}", self.base_url, SCAN_QR_CODE_PATH);
        let body = serde_json::to_string(&ScanQrCodeRequest {
            qrcode: qrcode.to_string(),
        })
        .map_err(|e| TransportError::Request(format!("Serialization error: {}", e)))?;

        log::info!("📱 Consultando código escaneado: {}", qrcode);
        self.transport.post_json(&url, Some(token), body).await
    }
}
