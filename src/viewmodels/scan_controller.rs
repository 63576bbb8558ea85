// ============================================================================
// SCAN CONTROLLER - Ciclo de escaneo atado al montaje de la vista
// ============================================================================
// mount → start → (decodificación) → stop → fetch → resultado
// unmount → stop siempre, aunque haya un fetch en vuelo
//
// Cada ciclo captura la generación actual; unmount la incrementa. Lo que
// llegue de una generación vieja se descarta sin tocar el ScanState.
// ============================================================================

use std::cell::Cell;
use crate::error::{RearmError, StartError};
use crate::models::fetch::FetchResult;
use crate::models::scan::{FacingMode, ScanConfig, ScannerLifecycleState};
use crate::services::camera_session::{CameraDecoderSession, CameraDevice, SessionState};
use crate::services::credential_store::CredentialStore;
use crate::services::data_fetcher::DataFetcher;
use crate::services::http_transport::HttpTransport;
use crate::state::scan_state::{ScanSnapshot, ScanState};

/// Controlador del navegador: html5-qrcode + gloo-net + sessionStorage
pub type BrowserScanController = ScanController<
    crate::services::html5_qrcode::Html5QrcodeCamera,
    crate::services::http_transport::GlooTransport,
    crate::services::credential_store::SessionStorageCredentials,
>;

/// ViewModel del escáner. Único escritor del ScanState.
pub struct ScanController<D, T, C> {
    session: CameraDecoderSession<D>,
    fetcher: DataFetcher<T, C>,
    facing: FacingMode,
    config: ScanConfig,
    state: ScanState,
    generation: Cell<u64>,
    mounted: Cell<bool>,
}

impl<D, T, C> ScanController<D, T, C>
where
    D: CameraDevice,
    T: HttpTransport,
    C: CredentialStore,
{
    pub fn new(
        session: CameraDecoderSession<D>,
        fetcher: DataFetcher<T, C>,
        facing: FacingMode,
        config: ScanConfig,
    ) -> Self {
        Self {
            session,
            fetcher,
            facing,
            config,
            state: ScanState::new(),
            generation: Cell::new(0),
            mounted: Cell::new(false),
        }
    }

    pub fn state(&self) -> &ScanState {
        &self.state
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted.get()
    }

    /// La vista aparece: arranca un ciclo. Resuelve cuando el ciclo termina.
    pub async fn mount(&self) {
        if self.mounted.replace(true) {
            log::debug!("📷 [SCAN] mount repetido ignorado");
            return;
        }
        log::info!("📷 [SCAN] Vista montada");
        self.state.reset();
        self.run_cycle().await;
    }

    /// La vista desaparece. Libera la cámara en todos los caminos y
    /// deja sin efecto cualquier resultado pendiente.
    pub async fn unmount(&self) {
        self.generation.set(self.generation.get() + 1);
        self.mounted.set(false);
        log::info!("📷 [SCAN] Vista desmontada, liberando cámara");
        self.session.stop().await;
    }

    /// "Escanear de nuevo". Solo con la vista montada, la cámara parada y
    /// sin fetch pendiente.
    pub async fn rearm(&self) -> Result<(), RearmError> {
        self.check_rearm()?;
        log::info!("🔁 [SCAN] Nuevo ciclo de escaneo");
        self.run_cycle().await;
        Ok(())
    }

    pub fn check_rearm(&self) -> Result<(), RearmError> {
        if !self.mounted.get() {
            return Err(RearmError::NotMounted);
        }
        let snapshot = self.state.snapshot();
        if snapshot.fetch_pending() {
            return Err(RearmError::FetchPending);
        }
        if self.session.is_active() || snapshot.lifecycle != ScannerLifecycleState::Idle {
            return Err(RearmError::CameraActive);
        }
        Ok(())
    }

    fn is_stale(&self, generation: u64) -> bool {
        self.generation.get() != generation
    }

    /// Aplica el cambio solo si el ciclo sigue vigente
    fn apply<F>(&self, generation: u64, updater: F) -> bool
    where
        F: FnOnce(&mut ScanSnapshot),
    {
        if self.is_stale(generation) {
            log::debug!("🗑️ [SCAN] Resultado de un ciclo anterior descartado");
            return false;
        }
        self.state.update(updater);
        true
    }

    async fn run_cycle(&self) {
        let generation = self.generation.get();

        // remontaje con el stop del ciclo anterior en vuelo: se arranca al terminar
        let waits_for_stop = self.session.state() == SessionState::Stopping;
        if !waits_for_stop && self.session.is_active() {
            log::warn!("⚠️ [SCAN] Ya hay una sesión de cámara activa, start ignorado");
            return;
        }

        self.apply(generation, |s| {
            *s = ScanSnapshot {
                lifecycle: ScannerLifecycleState::Starting,
                ..ScanSnapshot::default()
            };
        });

        if waits_for_stop {
            log::info!("⏳ [SCAN] Cámara liberándose, arranque diferido");
            self.session.settled().await;
            if self.is_stale(generation) {
                return;
            }
        }

        let mut events = match self.session.start(self.facing, &self.config).await {
            Ok(events) => events,
            Err(StartError::AlreadyActive) => {
                log::warn!("⚠️ [SCAN] Sesión activa, ciclo abandonado");
                return;
            }
            Err(StartError::Camera(error)) => {
                self.apply(generation, |s| {
                    s.lifecycle = ScannerLifecycleState::Idle;
                    s.camera_error = Some(error);
                });
                return;
            }
        };

        if self.is_stale(generation) {
            log::warn!("⚠️ [SCAN] Permiso de cámara llegó tras desmontar, liberando");
            self.session.stop().await;
            return;
        }
        self.apply(generation, |s| s.lifecycle = ScannerLifecycleState::Active);

        let Some(event) = events.next().await else {
            log::debug!("📷 [SCAN] Sesión detenida sin decodificación");
            return;
        };
        if self.is_stale(generation) {
            self.session.stop().await;
            return;
        }

        let payload = event.payload.clone();
        self.apply(generation, |s| {
            s.scan = Some(event);
            s.fetch = Some(FetchResult::Pending);
            s.lifecycle = ScannerLifecycleState::Stopping;
        });

        // stop antes del fetch: una sola decodificación por activación
        self.session.stop().await;
        if !self.apply(generation, |s| s.lifecycle = ScannerLifecycleState::Idle) {
            return;
        }

        let result = self.fetcher.fetch(&payload).await;
        if let Some(kind) = result.error_kind() {
            log::warn!("⚠️ [SCAN] Fetch terminó con {}", kind);
        }
        self.apply(generation, |s| s.fetch = Some(result));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;
    use futures::executor::LocalPool;
    use futures::task::LocalSpawnExt;
    use crate::error::{CameraAccessError, ErrorKind};
    use crate::models::fetch::FetchFailure;
    use crate::services::api_client::ApiClient;
    use crate::services::credential_store::MemoryCredentials;
    use crate::services::http_transport::HttpResponse;
    use crate::state::view_state::{Resolution, ViewState};
    use crate::testing::{FakeCamera, FakeTransport, TRIP_JSON};

    type TestController = ScanController<FakeCamera, FakeTransport, MemoryCredentials>;

    struct Harness {
        pool: LocalPool,
        camera: FakeCamera,
        transport: FakeTransport,
        controller: Rc<TestController>,
        views: Rc<RefCell<Vec<ViewState>>>,
    }

    impl Harness {
        fn new(credentials: MemoryCredentials) -> Self {
            let camera = FakeCamera::new();
            let transport = FakeTransport::new();
            let controller = Rc::new(ScanController::new(
                CameraDecoderSession::new(camera.clone()),
                DataFetcher::new(ApiClient::new("http://api.test", transport.clone()), credentials),
                FacingMode::Environment,
                ScanConfig::default(),
            ));

            let views = Rc::new(RefCell::new(Vec::new()));
            {
                let views = views.clone();
                let state = controller.state().clone();
                controller
                    .state()
                    .subscribe(move || views.borrow_mut().push(state.view()));
            }

            Self {
                pool: LocalPool::new(),
                camera,
                transport,
                controller,
                views,
            }
        }

        fn with_token() -> Self {
            Self::new(MemoryCredentials::with_token("tok-123"))
        }

        fn mount(&mut self) {
            let controller = self.controller.clone();
            self.pool
                .spawner()
                .spawn_local(async move { controller.mount().await })
                .unwrap();
            self.pool.run_until_stalled();
        }

        fn unmount(&mut self) {
            let controller = self.controller.clone();
            self.pool
                .spawner()
                .spawn_local(async move { controller.unmount().await })
                .unwrap();
            self.pool.run_until_stalled();
        }

        fn rearm(&mut self) -> Rc<RefCell<Option<Result<(), RearmError>>>> {
            let outcome = Rc::new(RefCell::new(None));
            let controller = self.controller.clone();
            let slot = outcome.clone();
            self.pool
                .spawner()
                .spawn_local(async move {
                    let result = controller.rearm().await;
                    *slot.borrow_mut() = Some(result);
                })
                .unwrap();
            self.pool.run_until_stalled();
            outcome
        }

        fn decode(&mut self, text: &str) {
            self.camera.decode(text);
            self.pool.run_until_stalled();
        }

        fn view(&self) -> ViewState {
            self.controller.state().view()
        }

        fn seen(&self) -> Vec<&'static str> {
            self.views.borrow().iter().map(ViewState::name).collect()
        }
    }

    #[test]
    fn mount_goes_through_starting_to_awaiting_scan() {
        let mut h = Harness::with_token();
        let grant = h.camera.hold_grant();
        h.mount();
        assert_eq!(h.view(), ViewState::Starting);

        grant.send(()).unwrap();
        h.pool.run_until_stalled();
        assert_eq!(h.view(), ViewState::AwaitingScan);
        assert_eq!(h.camera.live_handles(), 1);
        assert_eq!(h.camera.last_facing(), Some(FacingMode::Environment));
    }

    #[test]
    fn successful_scan_resolves_with_all_entities() {
        let mut h = Harness::with_token();
        h.transport.respond(200, TRIP_JSON);
        h.mount();
        h.decode("TRK-001");

        match h.view() {
            ViewState::Resolved {
                scan,
                resolution: Resolution::Success(record),
            } => {
                assert_eq!(scan.payload, "TRK-001");
                assert!(record.vehicle.is_some());
                assert!(record.trip.is_some());
                assert_eq!(record.cargo.len(), 1);
                assert!(record.driver.is_some());
            }
            other => panic!("unexpected view {:?}", other),
        }
        assert_eq!(
            h.seen(),
            vec!["Idle", "Starting", "AwaitingScan", "Pending", "Pending", "Resolved(Success)"]
        );

        let requests = h.transport.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].url, "http://api.test/api/app/scanQrCode");
        assert_eq!(requests[0].bearer.as_deref(), Some("tok-123"));
        assert_eq!(requests[0].body, r#"{"qrcode":"TRK-001"}"#);
        assert_eq!(h.camera.live_handles(), 0);
    }

    #[test]
    fn camera_is_released_before_the_request_goes_out() {
        let mut h = Harness::with_token();
        let reply = h.transport.hold();
        h.mount();
        h.decode("TRK-001");

        assert_eq!(h.transport.request_count(), 1);
        assert_eq!(h.camera.close_count(), 1);
        assert_eq!(h.camera.live_handles(), 0);
        assert!(matches!(h.view(), ViewState::Pending { .. }));
        assert_eq!(h.controller.check_rearm(), Err(RearmError::FetchPending));

        reply
            .send(Ok(HttpResponse {
                status: 200,
                body: TRIP_JSON.to_string(),
            }))
            .unwrap();
        h.pool.run_until_stalled();
        assert_eq!(h.view().name(), "Resolved(Success)");
    }

    #[test]
    fn missing_token_fails_without_request() {
        let mut h = Harness::new(MemoryCredentials::new());
        h.mount();
        h.decode("TRK-001");

        match h.view() {
            ViewState::Resolved {
                resolution: Resolution::Failure(failure),
                ..
            } => assert_eq!(
                failure,
                FetchFailure::new(ErrorKind::Unauthenticated, "No token found. Please log in again.")
            ),
            other => panic!("unexpected view {:?}", other),
        }
        assert_eq!(h.transport.request_count(), 0);
    }

    #[test]
    fn server_error_message_is_shown() {
        let mut h = Harness::with_token();
        h.transport.respond(500, "db unavailable");
        h.mount();
        h.decode("TRK-001");

        let snapshot = h.controller.state().snapshot();
        assert_eq!(
            snapshot.fetch,
            Some(FetchResult::failure(ErrorKind::ServerError, "Server error: db unavailable"))
        );
    }

    #[test]
    fn camera_denied_never_reaches_awaiting_scan() {
        let mut h = Harness::with_token();
        h.camera
            .deny_with(CameraAccessError::PermissionDenied("NotAllowedError".to_string()));
        h.mount();

        assert!(matches!(h.view(), ViewState::CameraUnavailable { .. }));
        assert!(!h.seen().contains(&"AwaitingScan"));
        assert_eq!(h.camera.live_handles(), 0);

        // no hay sink: nada puede producir un ScanEvent
        h.decode("TRK-001");
        assert!(h.controller.state().snapshot().scan.is_none());
        assert_eq!(h.transport.request_count(), 0);

        // reintento con permiso concedido
        let outcome = h.rearm();
        assert_eq!(*outcome.borrow(), None);
        assert_eq!(h.view(), ViewState::AwaitingScan);
    }

    #[test]
    fn no_second_scan_event_until_rearm() {
        let mut h = Harness::with_token();
        h.transport.respond(200, TRIP_JSON);
        h.transport.respond(200, TRIP_JSON);
        h.mount();

        h.decode("TRK-001");
        h.decode("TRK-002");
        assert_eq!(h.transport.request_count(), 1);
        assert_eq!(h.view().scan().map(|s| s.payload.clone()), Some("TRK-001".to_string()));

        let outcome = h.rearm();
        assert_eq!(h.view(), ViewState::AwaitingScan);
        assert_eq!(h.camera.open_count(), 2);

        h.decode("TRK-002");
        assert_eq!(*outcome.borrow(), Some(Ok(())));
        assert_eq!(h.transport.request_count(), 2);
        assert_eq!(h.view().scan().map(|s| s.payload.clone()), Some("TRK-002".to_string()));
    }

    #[test]
    fn rearm_is_rejected_while_scanning_or_unmounted() {
        let mut h = Harness::with_token();
        assert_eq!(h.controller.check_rearm(), Err(RearmError::NotMounted));

        h.mount();
        assert_eq!(h.controller.check_rearm(), Err(RearmError::CameraActive));
        let outcome = h.rearm();
        assert_eq!(*outcome.borrow(), Some(Err(RearmError::CameraActive)));
        assert_eq!(h.camera.open_count(), 1);
    }

    #[test]
    fn second_mount_does_not_open_another_handle() {
        let mut h = Harness::with_token();
        h.mount();
        h.mount();
        assert_eq!(h.camera.open_count(), 1);
        assert_eq!(h.camera.live_handles(), 1);
    }

    #[test]
    fn unmount_during_fetch_leaves_state_untouched() {
        let mut h = Harness::with_token();
        let reply = h.transport.hold();
        h.mount();
        h.decode("TRK-001");
        assert!(matches!(h.view(), ViewState::Pending { .. }));

        h.unmount();
        assert_eq!(h.camera.live_handles(), 0);
        let before = h.controller.state().snapshot();
        let notifications = h.views.borrow().len();

        reply
            .send(Ok(HttpResponse {
                status: 200,
                body: TRIP_JSON.to_string(),
            }))
            .unwrap();
        h.pool.run_until_stalled();

        assert_eq!(h.controller.state().snapshot(), before);
        assert_eq!(h.views.borrow().len(), notifications);
        assert_eq!(h.transport.request_count(), 1);
    }

    #[test]
    fn unmount_while_scanning_releases_camera() {
        let mut h = Harness::with_token();
        h.mount();
        assert_eq!(h.camera.live_handles(), 1);

        h.unmount();
        assert_eq!(h.camera.live_handles(), 0);
        assert!(!h.controller.is_mounted());
        assert_eq!(h.transport.request_count(), 0);
    }

    #[test]
    fn late_camera_grant_after_unmount_is_released() {
        let mut h = Harness::with_token();
        let grant = h.camera.hold_grant();
        h.mount();
        h.unmount();
        let notifications = h.views.borrow().len();

        grant.send(()).unwrap();
        h.pool.run_until_stalled();

        assert_eq!(h.camera.open_count(), 1);
        assert_eq!(h.camera.close_count(), 1);
        assert_eq!(h.camera.live_handles(), 0);
        assert_eq!(h.views.borrow().len(), notifications);
    }

    #[test]
    fn camera_stop_failure_does_not_block_the_fetch() {
        let mut h = Harness::with_token();
        h.camera.fail_close_with("hardware busy");
        h.transport.respond(200, TRIP_JSON);
        h.mount();
        h.decode("TRK-001");

        assert_eq!(h.view().name(), "Resolved(Success)");
        assert_eq!(h.transport.request_count(), 1);
    }

    #[test]
    fn no_request_while_the_camera_is_still_stopping() {
        let mut h = Harness::with_token();
        h.transport.respond(200, TRIP_JSON);
        let release = h.camera.hold_close();
        h.mount();
        h.decode("TRK-001");

        assert!(matches!(h.view(), ViewState::Pending { .. }));
        assert_eq!(h.camera.live_handles(), 1);
        assert_eq!(h.transport.request_count(), 0);

        // el canal ya está cerrado: un segundo código no cuenta
        h.decode("TRK-002");
        assert_eq!(h.transport.request_count(), 0);

        release.send(()).unwrap();
        h.pool.run_until_stalled();
        assert_eq!(h.camera.live_handles(), 0);
        let requests = h.transport.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].body, r#"{"qrcode":"TRK-001"}"#);
        assert_eq!(h.view().name(), "Resolved(Success)");
    }

    #[test]
    fn unmount_while_the_camera_is_stopping_sends_nothing() {
        let mut h = Harness::with_token();
        h.transport.respond(200, TRIP_JSON);
        let release = h.camera.hold_close();
        h.mount();
        h.decode("TRK-001");

        h.unmount();
        let before = h.controller.state().snapshot();
        let notifications = h.views.borrow().len();

        release.send(()).unwrap();
        h.pool.run_until_stalled();

        assert_eq!(h.transport.request_count(), 0);
        assert_eq!(h.camera.live_handles(), 0);
        assert_eq!(h.controller.state().snapshot(), before);
        assert_eq!(h.views.borrow().len(), notifications);
    }

    #[test]
    fn remount_during_stop_starts_once_the_camera_is_released() {
        let mut h = Harness::with_token();
        let release = h.camera.hold_close();
        h.mount();
        h.decode("TRK-001");
        h.unmount();

        h.mount();
        assert_eq!(h.view(), ViewState::Starting);
        assert_eq!(h.camera.open_count(), 1);

        release.send(()).unwrap();
        h.pool.run_until_stalled();

        assert_eq!(h.view(), ViewState::AwaitingScan);
        assert_eq!(h.camera.open_count(), 2);
        assert_eq!(h.camera.live_handles(), 1);
        assert_eq!(h.transport.request_count(), 0);
    }
}
