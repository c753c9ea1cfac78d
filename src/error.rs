use thiserror::Error;
use tokio_cron_scheduler::JobSchedulerError;

/// Custom Error and Result types to unify errors from all sources.
pub type FreshResult<T> = Result<T, FreshError>;

#[derive(Debug, Error)]
pub enum FreshError {
    #[error("HTTP Error: {0}")]
    Http(String),
    #[error("Source Error: {0}")]
    Source(String),
    #[error("Scheduler Error: {0}")]
    Scheduler(String),
    #[error("Config Error: {0}")]
    Config(String),
    #[error("Serialization Error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for FreshError {
    fn from(error: reqwest::Error) -> Self {
        FreshError::Http(error.to_string())
    }
}

impl From<JobSchedulerError> for FreshError {
    fn from(error: JobSchedulerError) -> Self {
        FreshError::Scheduler(error.to_string())
    }
}

impl From<figment::Error> for FreshError {
    fn from(error: figment::Error) -> Self {
        FreshError::Config(error.to_string())
    }
}
