//! Test server harness and fake ranking sources.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::Mutex;

use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use top_three_fresh::app::Service;
use top_three_fresh::client::RankingSource;
use top_three_fresh::config::Settings;
use top_three_fresh::core::ranking::Item;
use top_three_fresh::error::{FreshError, FreshResult};
use top_three_fresh::refresh::{Refresher, TickOutcome};
use top_three_fresh::storage::SnapshotCache;

/// Hands out the scripted responses in order, then fails.
pub struct ScriptedSource {
    responses: Mutex<VecDeque<FreshResult<Vec<Item>>>>,
}

impl ScriptedSource {
    pub fn new(responses: Vec<FreshResult<Vec<Item>>>) -> Self {
        ScriptedSource {
            responses: Mutex::new(responses.into()),
        }
    }
}

impl RankingSource for ScriptedSource {
    async fn fetch_ranking(&self) -> FreshResult<Vec<Item>> {
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(FreshError::Source("script exhausted".to_string())))
    }
}

pub fn upstream_down() -> FreshResult<Vec<Item>> {
    Err(FreshError::Http("503 Service Unavailable".to_string()))
}

/// Settings keeping the scheduled refresh out of the way of the test.
pub fn test_settings() -> Settings {
    Settings {
        port: 0,
        refresh_interval_sec: 3600,
        ..Settings::default()
    }
}

pub struct TestServer {
    pub addr: SocketAddr,
    cache: SnapshotCache,
    refresher: std::sync::Arc<Refresher<ScriptedSource>>,
    server_handle: JoinHandle<FreshResult<()>>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl TestServer {
    pub async fn start(source: ScriptedSource) -> FreshResult<Self> {
        let service = Service::start(&test_settings(), source).await?;
        let cache = service.cache().clone();
        let refresher = service.refresher().clone();

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let server_handle = tokio::spawn(service.serve(listener, async move {
            let _ = shutdown_rx.await;
        }));

        Ok(TestServer {
            addr,
            cache,
            refresher,
            server_handle,
            shutdown_tx: Some(shutdown_tx),
        })
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub fn cache(&self) -> &SnapshotCache {
        &self.cache
    }

    /// Runs one refresh right away instead of waiting for the schedule.
    pub async fn tick(&self) -> TickOutcome {
        self.refresher.tick().await
    }

    pub async fn shutdown(mut self) -> FreshResult<()> {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        self.server_handle
            .await
            .map_err(|e| FreshError::Source(e.to_string()))?
    }
}
