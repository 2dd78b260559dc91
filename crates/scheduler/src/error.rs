use thiserror::Error;

#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("no tokio runtime available: {0}")]
    NoRuntime(#[from] tokio::runtime::TryCurrentError),
}
