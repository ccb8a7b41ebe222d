use std::sync::Arc;

use tokio::sync::mpsc;

use crate::config::AppConfig;
use crate::core::api::{ApiError, CatalogSource, PokeApiClient};
use crate::core::loader::{load_catalog, LoaderOptions};

use super::events::AppEvent;

/// Centralized handle to the backend.
///
/// Created once at startup and passed by reference to views that spawn
/// fetches.
pub struct Services {
    pub source: Arc<dyn CatalogSource>,
    pub config: AppConfig,
    pub event_tx: mpsc::UnboundedSender<AppEvent>,
}

impl Services {
    /// Build the HTTP client from config.
    pub fn init(
        config: AppConfig,
        event_tx: mpsc::UnboundedSender<AppEvent>,
    ) -> Result<Self, ApiError> {
        let client = PokeApiClient::new(&config.api)?;
        log::info!("Catalog source: {}", client.base_url());
        Ok(Self::with_source(Arc::new(client), config, event_tx))
    }

    pub fn with_source(
        source: Arc<dyn CatalogSource>,
        config: AppConfig,
        event_tx: mpsc::UnboundedSender<AppEvent>,
    ) -> Self {
        Self {
            source,
            config,
            event_tx,
        }
    }

    /// Run the loader on the runtime, forwarding progress and the outcome
    /// into the event channel.
    pub fn spawn_catalog_load(&self) {
        let source = Arc::clone(&self.source);
        let options = LoaderOptions::from(&self.config.api);
        let tx = self.event_tx.clone();

        tokio::spawn(async move {
            let progress_tx = tx.clone();
            let result = load_catalog(source.as_ref(), &options, move |progress| {
                let _ = progress_tx.send(AppEvent::LoadProgress(progress));
            })
            .await;

            let event = match result {
                Ok(report) => {
                    if report.skipped > 0 {
                        log::warn!(
                            "{} of {} catalog entries could not be fetched",
                            report.skipped,
                            report.requested
                        );
                    }
                    AppEvent::CatalogLoaded(report)
                }
                Err(e) => {
                    log::error!("Catalog load failed: {e}");
                    AppEvent::CatalogFailed(e.to_string())
                }
            };
            let _ = tx.send(event);
        });
    }
}
