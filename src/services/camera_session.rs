// ============================================================================
// CAMERA DECODER SESSION - Ciclo de vida de la cámara + eventos de decodificación
// ============================================================================
// Uninitialized → Starting → Running → Stopping → Stopped
//
// El dispositivo (html5-qrcode en el navegador) entrega cada frame al
// FrameSink. El sink deja pasar UN solo ScanEvent por activación; los frames
// sin código se registran en trace y se descartan. La sesión NO se detiene
// sola al decodificar: eso lo hace el ScanController.
// ============================================================================

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use futures::channel::{mpsc, oneshot};
use futures::StreamExt;
use crate::error::{CameraAccessError, CameraStopError, StartError};
use crate::models::scan::{FacingMode, ScanConfig, ScanEvent};

/// Hardware de cámara + decodificador
#[allow(async_fn_in_trait)]
pub trait CameraDevice {
    /// Pide la cámara y arranca el muestreo. Resuelve cuando hay permiso.
    async fn open(
        &self,
        facing: FacingMode,
        config: &ScanConfig,
        frames: FrameSink,
    ) -> Result<(), CameraAccessError>;

    /// Libera la cámara
    async fn close(&self) -> Result<(), CameraStopError>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    Uninitialized,
    Starting,
    Running,
    Stopping,
    Stopped,
}

/// Punto de entrada de los resultados por frame
#[derive(Clone)]
pub struct FrameSink {
    tx: mpsc::UnboundedSender<ScanEvent>,
    emitted: Rc<Cell<bool>>,
}

impl FrameSink {
    fn new(tx: mpsc::UnboundedSender<ScanEvent>) -> Self {
        Self {
            tx,
            emitted: Rc::new(Cell::new(false)),
        }
    }

    /// Frame con código. Solo el primero de la activación se emite.
    pub fn decoded(&self, text: &str) {
        if self.tx.is_closed() {
            log::debug!("📷 [CAMERA] Decodificación tras stop ignorada");
            return;
        }
        if self.emitted.replace(true) {
            log::debug!("📷 [CAMERA] Decodificación extra en la misma activación ignorada");
            return;
        }
        log::info!("📱 [CAMERA] Código detectado: {}", text);
        if self.tx.unbounded_send(ScanEvent::new(text)).is_err() {
            log::debug!("📷 [CAMERA] Nadie escucha el evento de escaneo");
        }
    }

    /// Frame sin código: ruido esperado, nunca se muestra
    pub fn missed(&self, reason: &str) {
        log::trace!("📷 [CAMERA] Frame sin código: {}", reason);
    }

    fn close(&self) {
        self.tx.close_channel();
    }
}

/// Suscripción a los ScanEvent de una activación
pub struct DecodeEvents {
    rx: mpsc::UnboundedReceiver<ScanEvent>,
}

impl DecodeEvents {
    /// `None` cuando la sesión se detuvo sin decodificar
    pub async fn next(&mut self) -> Option<ScanEvent> {
        self.rx.next().await
    }
}

pub struct CameraDecoderSession<D> {
    device: D,
    state: Cell<SessionState>,
    sink: RefCell<Option<FrameSink>>,
    stop_waiters: RefCell<Vec<oneshot::Sender<()>>>,
}

impl<D: CameraDevice> CameraDecoderSession<D> {
    pub fn new(device: D) -> Self {
        Self {
            device,
            state: Cell::new(SessionState::Uninitialized),
            sink: RefCell::new(None),
            stop_waiters: RefCell::new(Vec::new()),
        }
    }

    pub fn state(&self) -> SessionState {
        self.state.get()
    }

    pub fn is_active(&self) -> bool {
        matches!(
            self.state.get(),
            SessionState::Starting | SessionState::Running | SessionState::Stopping
        )
    }

    /// Pide la cámara. Un segundo start con la sesión activa se rechaza sin
    /// tocar el dispositivo.
    pub async fn start(
        &self,
        facing: FacingMode,
        config: &ScanConfig,
    ) -> Result<DecodeEvents, StartError> {
        if self.is_active() {
            log::warn!("⚠️ [CAMERA] start ignorado, sesión en estado {:?}", self.state.get());
            return Err(StartError::AlreadyActive);
        }

        self.state.set(SessionState::Starting);
        let (tx, rx) = mpsc::unbounded();
        let sink = FrameSink::new(tx);
        *self.sink.borrow_mut() = Some(sink.clone());

        log::info!(
            "📷 [CAMERA] Iniciando cámara ({}, {} fps, qrbox {})",
            facing.as_str(),
            config.fps,
            config.qrbox
        );

        match self.device.open(facing, config, sink).await {
            Ok(()) => {
                self.state.set(SessionState::Running);
                log::info!("✅ [CAMERA] Cámara activa");
                Ok(DecodeEvents { rx })
            }
            Err(e) => {
                log::error!("❌ [CAMERA] No se pudo iniciar la cámara: {}", e);
                if let Some(sink) = self.sink.borrow_mut().take() {
                    sink.close();
                }
                self.state.set(SessionState::Stopped);
                Err(StartError::Camera(e))
            }
        }
    }

    /// Resuelve cuando no hay un stop en curso
    pub async fn settled(&self) {
        if self.state.get() != SessionState::Stopping {
            return;
        }
        let (tx, rx) = oneshot::channel();
        self.stop_waiters.borrow_mut().push(tx);
        log::debug!("⏳ [CAMERA] Esperando a que termine el stop en curso");
        let _ = rx.await;
    }

    /// Libera la cámara. Idempotente; un fallo del dispositivo se registra y
    /// la sesión termina igualmente en Stopped.
    pub async fn stop(&self) {
        if self.state.get() != SessionState::Running {
            log::debug!("📷 [CAMERA] stop sin sesión activa ({:?}), no-op", self.state.get());
            return;
        }

        self.state.set(SessionState::Stopping);
        if let Some(sink) = self.sink.borrow_mut().take() {
            sink.close();
        }

        match self.device.close().await {
            Ok(()) => log::info!("🛑 [CAMERA] Cámara detenida"),
            Err(e) => log::warn!("⚠️ [CAMERA] Error deteniendo la cámara: {}", e),
        }
        self.state.set(SessionState::Stopped);

        let waiters: Vec<_> = self.stop_waiters.borrow_mut().drain(..).collect();
        for waiter in waiters {
            let _ = waiter.send(());
        }
    }
}
