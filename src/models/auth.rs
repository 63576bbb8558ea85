use serde::{Deserialize, Serialize};

/// Body de `POST /api/login`
#[derive(Clone, PartialEq, Serialize, Deserialize, Debug)]
pub struct LoginRequest {
    pub caserne_id: String,
    pub password: String,
}

#[derive(Clone, PartialEq, Serialize, Deserialize, Debug)]
pub struct LoginResponse {
    pub token: String,
}

/// Cuerpo de error JSON del backend (`{"message": "..."}`)
#[derive(Clone, PartialEq, Serialize, Deserialize, Debug)]
pub struct ApiMessage {
    #[serde(default)]
    pub message: Option<String>,
}

impl ApiMessage {
    /// Extrae `message` si el cuerpo es JSON con ese campo no vacío
    pub fn extract(body: &str) -> Option<String> {
        serde_json::from_str::<ApiMessage>(body)
            .ok()
            .and_then(|m| m.message)
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty())
    }
}

/// Body de `POST /api/app/scanQrCode`
#[derive(Clone, PartialEq, Serialize, Deserialize, Debug)]
pub struct ScanQrCodeRequest {
    pub qrcode: String,
}
