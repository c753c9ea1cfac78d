use chrono::Utc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::Mutex;
use tracing::{error, info, warn};

use crate::client::RankingSource;
use crate::core::ranking::{rank, Ranking, Snapshot};
use crate::error::{FreshError, FreshResult};
use crate::storage::SnapshotCache;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// A new snapshot was installed.
    Updated { generation: u64, items: usize },
    /// The fetch succeeded but a newer snapshot was already in the cache.
    Superseded { generation: u64 },
    /// The fetch failed, the previous snapshot stays in place.
    Failed,
    /// Another refresh was still running.
    Skipped,
}

/// Fetches, ranks and installs the ranking into the cache.
///
/// Refreshes never overlap: a tick firing while the previous one is still
/// running is skipped.
pub struct Refresher<S> {
    source: S,
    cache: SnapshotCache,
    generation: AtomicU64,
    in_flight: Mutex<()>,
}

impl<S: RankingSource> Refresher<S> {
    pub fn new(source: S, cache: SnapshotCache) -> Self {
        Refresher {
            source,
            cache,
            generation: AtomicU64::new(0),
            in_flight: Mutex::new(()),
        }
    }

    pub fn cache(&self) -> &SnapshotCache {
        &self.cache
    }

    /// Startup fetch. There is nothing to fall back on yet, so errors are
    /// returned to the caller instead of being absorbed.
    pub async fn initialize(&self) -> FreshResult<()> {
        let _guard = self.in_flight.lock().await;
        self.refresh().await?;

        if let Some(snapshot) = self.cache.read() {
            info!(
                "Initial ranking loaded with {} items.",
                snapshot.ranking.len()
            );
            for line in listing(&snapshot.ranking) {
                info!("{line}");
            }
        }
        Ok(())
    }

    /// One scheduled refresh. Failures are logged and leave the cache untouched.
    pub async fn tick(&self) -> TickOutcome {
        let Ok(_guard) = self.in_flight.try_lock() else {
            warn!("Previous ranking refresh still in flight, skipping this tick.");
            return TickOutcome::Skipped;
        };

        match self.refresh().await {
            Ok(outcome) => outcome,
            Err(e) => {
                let error = FreshError::Source(format!(
                    "Could not refresh ranking, keeping previous snapshot. {e}"
                ));
                error!("{error}");
                TickOutcome::Failed
            }
        }
    }

    async fn refresh(&self) -> FreshResult<TickOutcome> {
        // Taken before fetching so that a slow fetch can never override a later one.
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let items = self.source.fetch_ranking().await?;

        let snapshot = Snapshot {
            timestamp: Utc::now(),
            generation,
            ranking: rank(&items),
        };
        let count = snapshot.ranking.len();

        if self.cache.write(snapshot) {
            info!(generation, items = count, "Ranking updated.");
            Ok(TickOutcome::Updated {
                generation,
                items: count,
            })
        } else {
            warn!(generation, "Newer ranking already cached, dropping this one.");
            Ok(TickOutcome::Superseded { generation })
        }
    }
}

/// One `score name` line per item, in ranked order.
fn listing(ranking: &Ranking) -> Vec<String> {
    ranking
        .iter()
        .map(|item| format!("{} {}", item.score, item.name))
        .collect()
}
