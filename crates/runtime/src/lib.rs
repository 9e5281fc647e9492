use std::time::Duration;

use anyhow::{Context, Result};
use carefinder_auth::{FileStorage, SessionStore};
use carefinder_catalog::{Catalog, SearchService};
use carefinder_config::AppConfig;
use tracing::info;

pub mod telemetry {
    use anyhow::Result;
    use tracing::Level;
    use tracing_subscriber::{fmt::SubscriberBuilder, EnvFilter};

    pub fn init_tracing() -> Result<()> {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        let subscriber = SubscriberBuilder::default()
            .with_max_level(Level::TRACE)
            .with_env_filter(env_filter)
            .finish();

        tracing::subscriber::set_global_default(subscriber)
            .map_err(|error| anyhow::anyhow!("failed to set tracing subscriber: {error}"))
    }
}

/// Everything the server and CLI need, built from configuration.
///
/// `session` owns the session scope; keep this value alive for as long as
/// any handle taken from it is in use.
pub struct BackendServices {
    pub catalog: Catalog,
    pub search: SearchService,
    pub session: SessionStore,
}

impl BackendServices {
    pub async fn initialise(config: &AppConfig) -> Result<Self> {
        let catalog = match &config.search.catalog_path {
            Some(path) => Catalog::from_json_file(path)
                .with_context(|| format!("failed to load provider catalog from {}", path.display()))?,
            None => Catalog::builtin(),
        };
        info!(providers = catalog.len(), "provider catalog ready");

        let search = SearchService::new(
            catalog.clone(),
            Duration::from_millis(config.search.latency_ms),
        );

        let storage = FileStorage::new(&config.session.storage_dir);
        let session = SessionStore::new(storage, &config.session);
        info!(
            storage_dir = %config.session.storage_dir.display(),
            namespace = %session.namespace(),
            state = ?session.state(),
            "session store ready"
        );

        Ok(Self {
            catalog,
            search,
            session,
        })
    }
}

pub async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::warn!(?error, "failed to listen for shutdown signal");
    }
    info!("shutdown signal received");
}
