use std::future::Future;
use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;

use crate::client::RankingSource;
use crate::config::Settings;
use crate::error::FreshResult;
use crate::refresh::Refresher;
use crate::scheduler::{JobProcess, Scheduler};
use crate::server::create_router;
use crate::storage::SnapshotCache;

/// A populated cache with its refresh job running.
pub struct Service<S> {
    cache: SnapshotCache,
    scheduler: Scheduler<S>,
}

impl<S: RankingSource + 'static> Service<S> {
    /// Loads the first ranking, then schedules the refreshes.
    /// Fails when the first fetch fails.
    pub async fn start(settings: &Settings, source: S) -> FreshResult<Self> {
        let cache = SnapshotCache::new();
        let refresher = Arc::new(Refresher::new(source, cache.clone()));

        info!("Loading initial ranking.");
        refresher.initialize().await?;

        let scheduler = Scheduler::new(refresher).await?;
        scheduler
            .add_job(JobProcess::RefreshRanking(settings.refresh_interval()))
            .await?;

        info!(
            "Starting scheduler, refreshing every {}s.",
            settings.refresh_interval_sec
        );
        scheduler.start().await?;

        Ok(Service { cache, scheduler })
    }

    pub fn cache(&self) -> &SnapshotCache {
        &self.cache
    }

    pub fn refresher(&self) -> &Arc<Refresher<S>> {
        self.scheduler.refresher()
    }

    /// Serves HTTP until `shutdown` resolves, then stops the refresh job.
    pub async fn serve<F>(mut self, listener: TcpListener, shutdown: F) -> FreshResult<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let app = create_router(self.cache.clone());

        info!("Server listening on {}", listener.local_addr()?);
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await?;

        info!("Stopping scheduler.");
        self.scheduler.shutdown().await
    }
}

/// Startup fetch, bind, then serve until `shutdown` resolves.
/// The listener is only bound once the cache holds a ranking.
pub async fn run<S, F>(settings: Settings, source: S, shutdown: F) -> FreshResult<()>
where
    S: RankingSource + 'static,
    F: Future<Output = ()> + Send + 'static,
{
    let service = Service::start(&settings, source).await?;
    let listener = TcpListener::bind(settings.socket_addr()).await?;
    service.serve(listener, shutdown).await
}
