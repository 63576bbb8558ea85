// ============================================================================
// AUTH SERVICE - Login con caserne_id + password, guarda el token
// ============================================================================

use crate::error::LoginError;
use crate::models::auth::{ApiMessage, LoginRequest, LoginResponse};
use crate::services::api_client::ApiClient;
use crate::services::credential_store::CredentialStore;
use crate::services::http_transport::HttpTransport;

const LOGIN_FAILED: &str = "Login failed";

/// Login del navegador: gloo-net + sessionStorage
pub type BrowserAuthService = AuthService<
    crate::services::http_transport::GlooTransport,
    crate::services::credential_store::SessionStorageCredentials,
>;

pub struct AuthService<T, C> {
    api: ApiClient<T>,
    credentials: C,
}

impl<T: HttpTransport, C: CredentialStore> AuthService<T, C> {
    pub fn new(api: ApiClient<T>, credentials: C) -> Self {
        Self { api, credentials }
    }

    /// Perform login and persist the token for the browser session
    pub async fn login(&self, caserne_id: &str, password: &str) -> Result<(), LoginError> {
        let request = LoginRequest {
            caserne_id: caserne_id.trim().to_string(),
            password: password.to_string(),
        };

        let response = match self.api.login(&request).await {
            Ok(response) => response,
            Err(e) => {
                log::error!("❌ [AUTH] Error de red en login: {}", e);
                return Err(LoginError::Unreachable);
            }
        };

        if !response.ok() {
            let message =
                ApiMessage::extract(&response.body).unwrap_or_else(|| LOGIN_FAILED.to_string());
            log::warn!("🔒 [AUTH] Login rechazado (HTTP {}): {}", response.status, message);
            return Err(LoginError::Rejected(message));
        }

        let token = match serde_json::from_str::<LoginResponse>(&response.body) {
            Ok(body) if !body.token.is_empty() => body.token,
            Ok(_) => {
                log::error!("❌ [AUTH] Respuesta de login sin token");
                return Err(LoginError::Malformed);
            }
            Err(e) => {
                log::error!("❌ [AUTH] Respuesta de login inválida ({}): {}", e, response.body);
                return Err(LoginError::Malformed);
            }
        };

        self.credentials.save(&token)?;
        log::info!("✅ [AUTH] Login correcto para caserne {}", request.caserne_id);
        Ok(())
    }
}
