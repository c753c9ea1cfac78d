use tokio_cron_scheduler::{Job, JobScheduler};

use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

use crate::client::RankingSource;
use crate::error::FreshResult;
use crate::refresh::Refresher;

pub struct Scheduler<S> {
    scheduler: JobScheduler,
    refresher: Arc<Refresher<S>>,
}

pub enum JobProcess {
    RefreshRanking(Duration),
}

impl<S: RankingSource + 'static> Scheduler<S> {
    pub async fn new(refresher: Arc<Refresher<S>>) -> FreshResult<Self> {
        let scheduler = JobScheduler::new().await?;
        Ok(Scheduler {
            scheduler,
            refresher,
        })
    }

    pub async fn add_job(&self, job_process: JobProcess) -> FreshResult<uuid::Uuid> {
        let job = match job_process {
            JobProcess::RefreshRanking(interval) => {
                refresh_ranking_job(interval, self.refresher.clone()).await?
            }
        };
        Ok(self.scheduler.add(job).await?)
    }

    pub async fn start(&self) -> FreshResult<()> {
        Ok(self.scheduler.start().await?)
    }

    /// Stops firing jobs. A refresh already running is left to complete.
    pub async fn shutdown(&mut self) -> FreshResult<()> {
        Ok(self.scheduler.shutdown().await?)
    }

    pub fn refresher(&self) -> &Arc<Refresher<S>> {
        &self.refresher
    }
}

//////////////////
// Jobs definition
//////////////////

async fn refresh_ranking_job<S: RankingSource + 'static>(
    interval: Duration,
    refresher: Arc<Refresher<S>>,
) -> FreshResult<Job> {
    let job = Job::new_repeated_async(interval, move |uuid, mut l| {
        let refresher = refresher.clone();
        Box::pin(async move {
            refresher.tick().await;

            // Query the next execution time for this job
            let next_tick = l.next_tick_for_job(uuid).await;
            match next_tick {
                Ok(Some(ts)) => info!("Next ranking refresh at {:?}", ts),
                _ => error!("Could not get next tick for ranking refresh job"),
            }
        })
    })?;
    Ok(job)
}
