// ============================================================================
// TESTING - Dobles de cámara y transporte para los tests nativos
// ============================================================================

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;
use futures::channel::oneshot;
use crate::error::{CameraAccessError, CameraStopError, TransportError};
use crate::models::scan::{FacingMode, ScanConfig};
use crate::services::camera_session::{CameraDevice, FrameSink};
use crate::services::http_transport::{HttpResponse, HttpTransport};

pub const TRIP_JSON: &str = r#"{
    "camion": {"num_carte_grise": "AB-123-CD", "num_ctrl_tech": "CT-998", "date_ctrl_tech": "2024-05-02"},
    "trajet": {"depart": "Lyon", "destination": "Marseille",
               "date_heure_depart": "2024-06-01T08:30:00Z",
               "date_heure_arrivee_prevue": "2024-06-01T12:00:00Z"},
    "pieces": [{"nom": "Palette", "num_ref": "P-1", "quantity": 4}],
    "chauffeur": {"nom": "Martin", "prenom": "Luc", "numero_permis": "PERM-42"}
}"#;

// --- Transporte --------------------------------------------------------------

#[derive(Clone, Debug, PartialEq)]
pub struct RecordedRequest {
    pub url: String,
    pub bearer: Option<String>,
    pub body: String,
}

type Reply = Result<HttpResponse, TransportError>;

enum QueuedReply {
    Ready(Reply),
    Gated(oneshot::Receiver<Reply>),
}

#[derive(Default)]
struct TransportInner {
    requests: RefCell<Vec<RecordedRequest>>,
    replies: RefCell<VecDeque<QueuedReply>>,
}

#[derive(Clone, Default)]
pub struct FakeTransport {
    inner: Rc<TransportInner>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, status: u16, body: &str) {
        self.inner.replies.borrow_mut().push_back(QueuedReply::Ready(Ok(HttpResponse {
            status,
            body: body.to_string(),
        })));
    }

    pub fn fail(&self, error: TransportError) {
        self.inner
            .replies
            .borrow_mut()
            .push_back(QueuedReply::Ready(Err(error)));
    }

    /// La próxima respuesta queda pendiente hasta que el test la envíe
    pub fn hold(&self) -> oneshot::Sender<Reply> {
        let (tx, rx) = oneshot::channel();
        self.inner.replies.borrow_mut().push_back(QueuedReply::Gated(rx));
        tx
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.inner.requests.borrow().clone()
    }

    pub fn request_count(&self) -> usize {
        self.inner.requests.borrow().len()
    }
}

impl HttpTransport for FakeTransport {
    async fn post_json(
        &self,
        url: &str,
        bearer: Option<&str>,
        body: String,
    ) -> Result<HttpResponse, TransportError> {
        self.inner.requests.borrow_mut().push(RecordedRequest {
            url: url.to_string(),
            bearer: bearer.map(|b| b.to_string()),
            body,
        });
        let reply = self.inner.replies.borrow_mut().pop_front();
        match reply {
            Some(QueuedReply::Ready(reply)) => reply,
            Some(QueuedReply::Gated(rx)) => rx
                .await
                .unwrap_or_else(|_| Err(TransportError::Network("reply dropped".to_string()))),
            None => Err(TransportError::Network("no reply queued".to_string())),
        }
    }
}

// --- Cámara ------------------------------------------------------------------

#[derive(Default)]
struct CameraInner {
    opens: Cell<u32>,
    closes: Cell<u32>,
    live_handles: Cell<u32>,
    last_facing: Cell<Option<FacingMode>>,
    sink: RefCell<Option<FrameSink>>,
    deny: RefCell<Option<CameraAccessError>>,
    close_error: RefCell<Option<String>>,
    grant: RefCell<Option<oneshot::Receiver<()>>>,
    release: RefCell<Option<oneshot::Receiver<()>>>,
}

#[derive(Clone, Default)]
pub struct FakeCamera {
    inner: Rc<CameraInner>,
}

impl FakeCamera {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open_count(&self) -> u32 {
        self.inner.opens.get()
    }

    pub fn close_count(&self) -> u32 {
        self.inner.closes.get()
    }

    /// Handles concedidos y no liberados
    pub fn live_handles(&self) -> u32 {
        self.inner.live_handles.get()
    }

    pub fn last_facing(&self) -> Option<FacingMode> {
        self.inner.last_facing.get()
    }

    /// El próximo open falla con este error
    pub fn deny_with(&self, error: CameraAccessError) {
        *self.inner.deny.borrow_mut() = Some(error);
    }

    pub fn fail_close_with(&self, message: &str) {
        *self.inner.close_error.borrow_mut() = Some(message.to_string());
    }

    /// El próximo open espera hasta que el test conceda el permiso
    pub fn hold_grant(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        *self.inner.grant.borrow_mut() = Some(rx);
        tx
    }

    /// El próximo close queda en vuelo hasta que el test libere la cámara
    pub fn hold_close(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        *self.inner.release.borrow_mut() = Some(rx);
        tx
    }

    pub fn decode(&self, text: &str) {
        let sink = self.inner.sink.borrow().clone();
        if let Some(sink) = sink {
            sink.decoded(text);
        }
    }

    pub fn miss(&self, reason: &str) {
        let sink = self.inner.sink.borrow().clone();
        if let Some(sink) = sink {
            sink.missed(reason);
        }
    }
}

impl CameraDevice for FakeCamera {
    async fn open(
        &self,
        facing: FacingMode,
        _config: &ScanConfig,
        frames: FrameSink,
    ) -> Result<(), CameraAccessError> {
        self.inner.opens.set(self.inner.opens.get() + 1);
        self.inner.last_facing.set(Some(facing));

        let grant = self.inner.grant.borrow_mut().take();
        if let Some(grant) = grant {
            let _ = grant.await;
        }
        let denied = self.inner.deny.borrow_mut().take();
        if let Some(error) = denied {
            return Err(error);
        }

        self.inner.live_handles.set(self.inner.live_handles.get() + 1);
        *self.inner.sink.borrow_mut() = Some(frames);
        Ok(())
    }

    async fn close(&self) -> Result<(), CameraStopError> {
        self.inner.closes.set(self.inner.closes.get() + 1);
        let release = self.inner.release.borrow_mut().take();
        if let Some(release) = release {
            let _ = release.await;
        }

        self.inner
            .live_handles
            .set(self.inner.live_handles.get().saturating_sub(1));
        self.inner.sink.borrow_mut().take();

        match self.inner.close_error.borrow().clone() {
            Some(message) => Err(CameraStopError(message)),
            None => Ok(()),
        }
    }
}
