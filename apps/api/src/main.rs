mod config;
mod db;
mod errors;
mod models;
mod repository;
mod resumes;
mod routes;
mod state;
mod storage;

use anyhow::Result;
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::repository::ResumeRepository;
use crate::routes::build_router;
use crate::state::AppState;
use crate::storage::ObjectStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (aborts on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Intake API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize MongoDB
    let database = db::connect(&config.mongodb_url, &config.mongodb_database).await?;
    let resumes = ResumeRepository::new(&database);

    // Initialize the GCS object store client. A missing credential file is
    // fatal here, before the listener ever binds.
    let storage = ObjectStore::connect(&config.gcs_bucket).await?;
    info!(
        "Object store client initialized (bucket: {})",
        config.gcs_bucket
    );

    // Build app state
    let state = AppState {
        resumes,
        storage,
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
