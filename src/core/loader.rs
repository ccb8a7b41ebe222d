//! Catalog loader.
//!
//! Fetches the index once, then the entries in fixed-size batches. Each batch
//! fans out with `join_all` and must fully settle before the next one starts,
//! so at most `batch_size` requests are in flight. Failed items are skipped
//! and never retried; only an index failure aborts the load.

use futures::future::join_all;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::ApiConfig;
use crate::core::api::{ApiError, CatalogSource};
use crate::core::catalog::Entry;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Failed to fetch catalog index: {0}")]
    Index(#[source] ApiError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoaderOptions {
    pub universe_size: u32,
    pub batch_size: usize,
}

impl From<&ApiConfig> for LoaderOptions {
    fn from(config: &ApiConfig) -> Self {
        Self {
            universe_size: config.universe_size,
            batch_size: config.batch_size,
        }
    }
}

/// Snapshot reported after every completed batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadProgress {
    pub batches_done: usize,
    pub batches_total: usize,
    /// Entries fetched successfully so far.
    pub loaded: usize,
    /// 0..=100, never decreasing across a load.
    pub percent: u8,
}

#[derive(Debug, Clone)]
pub struct LoadReport {
    /// Sorted ascending by identifier.
    pub entries: Vec<Entry>,
    /// Index references returned by the API.
    pub requested: usize,
    /// Items whose detail fetch failed.
    pub skipped: usize,
}

/// round(min(done, total) × batch / universe × 100), clamped to 100.
pub fn progress_percent(
    batches_done: usize,
    batches_total: usize,
    batch_size: usize,
    universe: usize,
) -> u8 {
    if universe == 0 {
        return 100;
    }
    let covered = batches_done.min(batches_total) * batch_size;
    let percent = (covered as f64 / universe as f64 * 100.0).round();
    percent.min(100.0) as u8
}

/// Load the whole catalog, calling `on_progress` once per batch.
pub async fn load_catalog<F>(
    source: &dyn CatalogSource,
    options: &LoaderOptions,
    mut on_progress: F,
) -> Result<LoadReport, LoadError>
where
    F: FnMut(LoadProgress),
{
    info!(
        universe = options.universe_size,
        batch_size = options.batch_size,
        "Loading catalog index"
    );

    let index = source
        .fetch_index(options.universe_size)
        .await
        .map_err(LoadError::Index)?;

    let requested = index.len();
    let batch_size = options.batch_size.max(1);
    let batches_total = requested.div_ceil(batch_size);

    let mut entries: Vec<Entry> = Vec::with_capacity(requested);
    let mut skipped = 0;

    for (batch_index, batch) in index.chunks(batch_size).enumerate() {
        let results = join_all(batch.iter().map(|reference| source.fetch_entry(reference))).await;

        for (reference, result) in batch.iter().zip(results) {
            match result {
                Ok(entry) => entries.push(entry),
                Err(e) => {
                    warn!(name = %reference.name, error = %e, "Skipping catalog entry");
                    skipped += 1;
                }
            }
        }

        let progress = LoadProgress {
            batches_done: batch_index + 1,
            batches_total,
            loaded: entries.len(),
            percent: progress_percent(batch_index + 1, batches_total, batch_size, requested),
        };
        debug!(?progress, "Batch complete");
        on_progress(progress);
    }

    if batches_total == 0 {
        on_progress(LoadProgress {
            batches_done: 0,
            batches_total: 0,
            loaded: 0,
            percent: 100,
        });
    }

    entries.sort_by_key(|e| e.id);

    info!(loaded = entries.len(), skipped, "Catalog loaded");
    Ok(LoadReport {
        entries,
        requested,
        skipped,
    })
}
