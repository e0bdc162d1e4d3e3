//! Libris Server - Library Borrowing REST API

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use libris_server::{
    api,
    config::AppConfig,
    repository::{LibraryStore, MemoryStore, PgStore},
    services::identity::JwtVerifier,
    AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("failed to load configuration")?;

    init_tracing(&config);

    tracing::info!("Starting Libris Server v{}", env!("CARGO_PKG_VERSION"));

    let store = connect_store(&config).await?;
    tracing::info!(backend = store.backend_name(), "store ready");

    let addr = SocketAddr::new(
        config.server.host.parse().context("invalid server host")?,
        config.server.port,
    );

    let verifier = Arc::new(JwtVerifier::new(&config.auth));
    let state = AppState::new(config, store, verifier);
    let app = api::create_router(state);

    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn init_tracing(config: &AppConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("libris_server={},tower_http=debug", config.logging.level).into()
    });

    let registry = tracing_subscriber::registry().with(filter);
    if config.logging.format == "json" {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

async fn connect_store(config: &AppConfig) -> anyhow::Result<Arc<dyn LibraryStore>> {
    if config.uses_memory_store() {
        tracing::warn!("Using in-memory store; data will not survive a restart");
        return Ok(Arc::new(MemoryStore::new()));
    }

    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .connect(&config.database.url)
        .await
        .context("failed to connect to database")?;

    tracing::info!("Connected to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("failed to run database migrations")?;

    tracing::info!("Database migrations completed");

    Ok(Arc::new(PgStore::new(pool)))
}
