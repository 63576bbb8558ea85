// ============================================================================
// DATA FETCHER - Un request autenticado por ScanEvent → FetchResult
// ============================================================================
// Sin token no hay request (y no hay await). Sin reintentos.
// ============================================================================

use crate::error::{ErrorKind, TransportError};
use crate::models::auth::ApiMessage;
use crate::models::fetch::FetchResult;
use crate::models::trip::TripRecord;
use crate::services::api_client::ApiClient;
use crate::services::credential_store::CredentialStore;
use crate::services::http_transport::{HttpResponse, HttpTransport};

pub struct DataFetcher<T, C> {
    api: ApiClient<T>,
    credentials: C,
}

impl<T: HttpTransport, C: CredentialStore> DataFetcher<T, C> {
    pub fn new(api: ApiClient<T>, credentials: C) -> Self {
        Self { api, credentials }
    }

    /// Consulta el backend con el token del CredentialStore
    pub async fn fetch(&self, payload: &str) -> FetchResult {
        let token = self.credentials.load();
        self.fetch_with_token(payload, token.as_deref()).await
    }

    pub async fn fetch_with_token(&self, payload: &str, token: Option<&str>) -> FetchResult {
        let Some(token) = token else {
            log::warn!("🔒 [FETCH] Sin token, no se envía la petición");
            return FetchResult::failure(
                ErrorKind::Unauthenticated,
                ErrorKind::Unauthenticated.generic_message(),
            );
        };

        match self.api.scan_qr_code(token, payload).await {
            Ok(response) => map_response(response),
            Err(e) => map_transport_error(e),
        }
    }
}

fn map_transport_error(error: TransportError) -> FetchResult {
    log::error!("❌ [FETCH] Error de red: {}", error);
    FetchResult::failure(ErrorKind::NetworkError, ErrorKind::NetworkError.generic_message())
}

fn map_response(response: HttpResponse) -> FetchResult {
    if !response.ok() {
        let detail = ApiMessage::extract(&response.body).or_else(|| {
            let text = response.body.trim();
            (!text.is_empty()).then(|| text.to_string())
        });
        log::error!(
            "❌ [FETCH] HTTP {}: {}",
            response.status,
            detail.as_deref().unwrap_or("<sin cuerpo>")
        );
        let message = match detail {
            Some(detail) => format!("Server error: {}", detail),
            None => ErrorKind::ServerError.generic_message().to_string(),
        };
        return FetchResult::failure(ErrorKind::ServerError, message);
    }

    match TripRecord::parse(&response.body) {
        Ok(record) => {
            log::info!(
                "✅ [FETCH] Datos recibidos: camion={} trajet={} pieces={} chauffeur={}",
                record.vehicle.is_some(),
                record.trip.is_some(),
                record.cargo.len(),
                record.driver.is_some()
            );
            FetchResult::Success(record)
        }
        Err(e) => {
            log::error!("❌ [FETCH] Respuesta inválida ({}). Cuerpo: {}", e, response.body);
            FetchResult::failure(
                ErrorKind::MalformedResponse,
                ErrorKind::MalformedResponse.generic_message(),
            )
        }
    }
}
