//! tourney-feed server entry point.
//!
//! Starts the Axum HTTP server with REST and WebSocket endpoints and the
//! background refresh task.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use tourney_feed::api;
use tourney_feed::app_state::AppState;
use tourney_feed::config::{LogFormat, StorageBackend, TrackerConfig};
use tourney_feed::domain::EventBus;
use tourney_feed::fetch::{HttpFetcher, SourceCatalog};
use tourney_feed::persistence::{ArtifactStore, FileStore, MemoryStore, PostgresStore};
use tourney_feed::pipeline::{Classifier, FreshnessPolicy};
use tourney_feed::service::{IngestOptions, IngestService, spawn_refresher};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = TrackerConfig::from_env().context("invalid configuration")?;

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match config.log_format {
        LogFormat::Json => tracing_subscriber::fmt().json().with_env_filter(filter).init(),
        LogFormat::Text => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }
    tracing::info!(addr = %config.listen_addr, "starting tourney-feed");

    // Build persistence layer
    let store = open_store(&config).await?;

    // Build fetch layer
    let catalog = SourceCatalog::load(&config.sources_file)
        .with_context(|| format!("loading {}", config.sources_file.display()))?;
    tracing::info!(tournaments = catalog.len(), "source catalog loaded");
    let fetcher = HttpFetcher::new(config.fetch_timeout()).context("building http client")?;

    // Build service layer
    let classifier = Classifier::new(config.boat_name_source.extractor(), config.feed_utc_offset);
    let event_bus = EventBus::new(config.event_bus_capacity);
    let ingest_service = Arc::new(IngestService::new(
        store,
        Arc::new(fetcher),
        Arc::new(catalog),
        classifier,
        event_bus,
        IngestOptions {
            fetch_timeout: config.fetch_timeout(),
            participant_policy: FreshnessPolicy::Ttl(config.participant_ttl_secs),
        },
    ));
    let _refresher = spawn_refresher(Arc::clone(&ingest_service), config.refresh_interval());

    // Build router
    let app = api::build_app(AppState::new(ingest_service), config.request_timeout());

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("binding {}", config.listen_addr))?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app).await?;

    Ok(())
}

async fn open_store(config: &TrackerConfig) -> anyhow::Result<Arc<dyn ArtifactStore>> {
    let store: Arc<dyn ArtifactStore> = match config.storage_backend {
        StorageBackend::File => {
            tracing::info!(dir = %config.data_dir.display(), "using file store");
            Arc::new(FileStore::new(config.data_dir.clone()))
        }
        StorageBackend::Memory => {
            tracing::warn!("using in-memory store, data is lost on restart");
            Arc::new(MemoryStore::new())
        }
        StorageBackend::Postgres => {
            let url = config
                .database_url
                .as_deref()
                .context("DATABASE_URL is required for the postgres backend")?;
            let store = PostgresStore::connect(
                url,
                config.database_max_connections,
                Duration::from_secs(config.database_connect_timeout_secs),
            )
            .await
            .context("connecting to PostgreSQL")?;
            tracing::info!("using PostgreSQL store");
            Arc::new(store)
        }
    };
    Ok(store)
}
