mod config;
mod errors;
mod export;
mod form;
mod models;
mod persistence;
mod preview;
mod routes;
mod session;
mod state;
mod wizard;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{Config, StorageBackend};
use crate::export::{ExportBridge, HttpRasterizer, LopdfEncoder, Rasterizer, UnconfiguredRasterizer};
use crate::persistence::{DocumentStore, InMemoryStore, PersistenceAdapter, RedisStore};
use crate::routes::build_router;
use crate::session::WizardSession;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Vitae API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize document storage
    let store: Arc<dyn DocumentStore> = match &config.storage {
        StorageBackend::Memory => {
            info!("Using in-memory document storage");
            Arc::new(InMemoryStore::new())
        }
        StorageBackend::Redis { url } => {
            let client = redis::Client::open(url.as_str())?;
            info!("Redis client initialized");
            Arc::new(RedisStore::new(client))
        }
    };

    // Initialize export collaborators
    let rasterizer: Arc<dyn Rasterizer> = match &config.rasterizer_url {
        Some(url) => {
            info!("Rasterizer endpoint: {url}");
            Arc::new(HttpRasterizer::new(url.clone())?)
        }
        None => {
            warn!("RASTERIZER_URL is not set; PDF export will fail");
            Arc::new(UnconfiguredRasterizer)
        }
    };
    let export = Arc::new(ExportBridge::new(rasterizer, Arc::new(LopdfEncoder)));

    // Restore the stored document (or start blank)
    let persistence = PersistenceAdapter::new(
        store,
        config.storage_key.clone(),
        Duration::from_millis(config.save_debounce_ms),
    );
    info!("Document storage key: '{}'", persistence.key());
    let mut session = WizardSession::new(persistence, config.wizard_steps);
    session.load(false).await?;
    info!("Wizard session ready ({} steps)", config.wizard_steps);

    // Build app state
    let state = AppState {
        session: Arc::new(Mutex::new(session)),
        export,
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
