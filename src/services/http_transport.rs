// ============================================================================
// HTTP TRANSPORT - POST JSON con Bearer opcional y timeout
// ============================================================================

use futures::future::{select, Either};
use futures::pin_mut;
use gloo_net::http::Request;
use gloo_timers::future::TimeoutFuture;
use crate::error::TransportError;

/// Respuesta HTTP cruda (status + cuerpo como texto)
#[derive(Clone, Debug, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[allow(async_fn_in_trait)]
pub trait HttpTransport {
    /// Un solo intento, sin reintentos
    async fn post_json(
        &self,
        url: &str,
        bearer: Option<&str>,
        body: String,
    ) -> Result<HttpResponse, TransportError>;
}

/// Transporte del navegador (fetch vía gloo-net)
#[derive(Clone, Debug)]
pub struct GlooTransport {
    timeout_seconds: u32,
}

impl GlooTransport {
    pub fn new(timeout_seconds: u32) -> Self {
        Self { timeout_seconds }
    }
}

impl HttpTransport for GlooTransport {
    async fn post_json(
        &self,
        url: &str,
        bearer: Option<&str>,
        body: String,
    ) -> Result<HttpResponse, TransportError> {
        let controller = web_sys::AbortController::new()
            .map_err(|e| TransportError::Request(format!("{:?}", e)))?;
        let signal = controller.signal();

        let mut builder = Request::post(url)
            .header("Content-Type", "application/json")
            .abort_signal(Some(&signal));
        if let Some(token) = bearer {
            builder = builder.header("Authorization", &format!("Bearer {}", token));
        }
        let request = builder
            .body(body)
            .map_err(|e| TransportError::Request(e.to_string()))?;

        let exchange = async move {
            let response = request
                .send()
                .await
                .map_err(|e| TransportError::Network(e.to_string()))?;
            let status = response.status();
            let body = response.text().await.unwrap_or_else(|e| {
                log::warn!("⚠️ [HTTP] No se pudo leer el cuerpo ({}): {}", status, e);
                String::new()
            });
            Ok::<_, TransportError>(HttpResponse { status, body })
        };
        let deadline = TimeoutFuture::new(self.timeout_seconds.saturating_mul(1000));

        pin_mut!(exchange, deadline);
        match select(exchange, deadline).await {
            Either::Left((result, _)) => result,
            Either::Right(((), _)) => {
                controller.abort();
                log::warn!("⏱️ [HTTP] Timeout después de {}s: {}", self.timeout_seconds, url);
                Err(TransportError::Timeout(self.timeout_seconds))
            }
        }
    }
}
