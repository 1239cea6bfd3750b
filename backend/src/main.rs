//! Service entry-point: loads configuration, prepares the document store and
//! serves the REST API.

mod server;

use std::io;
use std::sync::Arc;

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use server::{ServerConfig, create_server};
use workforce::domain::ports::DocumentStore;
use workforce::inbound::http::health::HealthState;
use workforce::outbound::memory::InMemoryDocumentStore;
use workforce::outbound::persistence::{
    DbPool, DieselDocumentStore, PoolConfig, run_pending_migrations,
};
use workforce::settings::AppSettings;

/// Application bootstrap.
#[actix_web::main]
async fn main() -> io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load()
        .map_err(|err| io::Error::other(format!("failed to load configuration: {err}")))?;
    let store = build_store(&settings).await?;
    let config = ServerConfig::new(settings.bind_addr(), store);
    #[cfg(feature = "metrics")]
    let config = config.with_metrics(Some(server::make_metrics()?));

    let bind_addr = config.bind_addr();
    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state.clone(), config)?;
    info!(%bind_addr, "server listening");

    let result = server.await;
    health_state.mark_unhealthy();
    result
}

/// Select the document store backend.
///
/// A configured database gets its migrations applied before the pool is
/// opened; otherwise documents live in process memory.
async fn build_store(settings: &AppSettings) -> io::Result<Arc<dyn DocumentStore>> {
    let Some(database_url) = settings.database_url() else {
        warn!("no database configured; documents are kept in memory only");
        return Ok(Arc::new(InMemoryDocumentStore::new()));
    };

    let migration_url = database_url.to_owned();
    tokio::task::spawn_blocking(move || run_pending_migrations(&migration_url))
        .await
        .map_err(|err| io::Error::other(format!("migration task failed: {err}")))?
        .map_err(|err| io::Error::other(err.to_string()))?;

    let pool = DbPool::new(
        PoolConfig::new(database_url)
            .with_max_size(settings.pool_max_size())
            .with_connection_timeout(settings.connection_timeout()),
    )
    .await
    .map_err(|err| io::Error::other(format!("failed to open connection pool: {err}")))?;
    Ok(Arc::new(DieselDocumentStore::new(pool)))
}
