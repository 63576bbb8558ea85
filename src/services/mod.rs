pub mod credential_store;
pub mod http_transport;
pub mod api_client;
pub mod data_fetcher;
pub mod camera_session;
pub mod html5_qrcode;
pub mod auth_service;

pub use credential_store::{CredentialStore, MemoryCredentials, SessionStorageCredentials};
pub use http_transport::{GlooTransport, HttpResponse, HttpTransport};
pub use api_client::ApiClient;
pub use data_fetcher::DataFetcher;
pub use camera_session::{CameraDecoderSession, CameraDevice, DecodeEvents, FrameSink, SessionState};
pub use html5_qrcode::Html5QrcodeCamera;
pub use auth_service::{AuthService, BrowserAuthService};
