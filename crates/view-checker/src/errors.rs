use idcheck_scheduler::SchedulerError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CheckerError {
    #[error("invalid interval: {0}")]
    InvalidInterval(String),
    #[error("no root provider configured")]
    MissingRootProvider,
    #[error("no report sink configured")]
    MissingReportSink,
    #[error("scheduler unavailable: {0}")]
    Scheduler(#[from] SchedulerError),
}

impl CheckerError {
    pub fn invalid_interval(msg: impl Into<String>) -> Self {
        Self::InvalidInterval(msg.into())
    }
}
