use std::sync::Arc;

use tokio::sync::Mutex;

use crate::config::Config;
use crate::export::ExportBridge;
use crate::session::WizardSession;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// The one wizard session this service hosts. Handlers lock it per call and
    /// release it before any slow export work.
    pub session: Arc<Mutex<WizardSession>>,
    pub export: Arc<ExportBridge>,
    pub config: Config,
}
