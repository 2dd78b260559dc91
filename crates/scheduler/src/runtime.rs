use std::time::Duration;

use tokio::runtime::Handle;
use tracing::{trace, warn};

use crate::api::{Scheduler, Task};
use crate::error::SchedulerError;
use crate::metrics;

/// Scheduler backed by a tokio runtime: each continuation becomes a task that
/// sleeps for the requested delay and then runs on the blocking pool, so a
/// long synchronous pass never occupies an async worker.
#[derive(Clone, Debug)]
pub struct TokioScheduler {
    handle: Handle,
}

impl TokioScheduler {
    pub fn new(handle: Handle) -> Self {
        Self { handle }
    }

    /// Binds to the runtime the caller is running on.
    pub fn current() -> Result<Self, SchedulerError> {
        Ok(Self::new(Handle::try_current()?))
    }
}

impl Scheduler for TokioScheduler {
    fn schedule(&self, delay: Duration, task: Task) {
        metrics::record_scheduled();
        trace!(
            delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
            "continuation armed"
        );
        self.handle.spawn(async move {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            metrics::record_fired();
            if let Err(err) = tokio::task::spawn_blocking(task).await {
                warn!(error = %err, "scheduled continuation failed");
            }
        });
    }
}
