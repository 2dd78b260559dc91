//! The recurring check loop.
//!
//! `Idle -> start -> Armed(0) -> Fired -> Armed(interval) -> Fired -> ...`
//! until [`IdentifierChecker::stop`] is called. An armed continuation owns
//! the checker, so a started checker keeps running after the host drops its
//! handle.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use idcheck_core_types::{CheckerId, ViewNode};
use idcheck_scheduler::{Scheduler, TokioScheduler};
use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::classifier::Classifier;
use crate::errors::CheckerError;
use crate::metrics::CheckerStats;
use crate::model::PassSummary;
use crate::policy::CheckerConfig;
use crate::ports::{ReportSink, RootProvider, TracingSink};
use crate::traversal::TraversalEngine;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum LoopState {
    Idle,
    Running,
    Stopped,
}

pub struct IdentifierChecker<N> {
    id: CheckerId,
    interval: Duration,
    root_provider: Arc<dyn RootProvider<N>>,
    scheduler: Arc<dyn Scheduler>,
    engine: Mutex<TraversalEngine<N>>,
    state: Mutex<LoopState>,
    shutdown: CancellationToken,
}

impl<N: ViewNode> IdentifierChecker<N> {
    pub fn builder(config: CheckerConfig) -> CheckerBuilder<N> {
        CheckerBuilder::new(config)
    }

    pub fn id(&self) -> &CheckerId {
        &self.id
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Arms the first pass with no delay. Calling it again is a no-op.
    pub fn start(self: &Arc<Self>) {
        {
            let mut state = self.state.lock();
            if *state != LoopState::Idle {
                debug!(checker = %self.id, state = ?*state, "start ignored");
                return;
            }
            *state = LoopState::Running;
        }
        info!(
            checker = %self.id,
            interval_ms = u64::try_from(self.interval.as_millis()).unwrap_or(u64::MAX),
            "identifier checker started"
        );
        self.arm(Duration::ZERO);
    }

    /// Prevents any further pass. A continuation already handed to the
    /// scheduler still fires but returns without checking or re-arming, which
    /// releases its hold on the checker.
    pub fn stop(&self) {
        let mut state = self.state.lock();
        if *state == LoopState::Stopped {
            return;
        }
        *state = LoopState::Stopped;
        self.shutdown.cancel();
        info!(checker = %self.id, stats = ?self.engine.lock().stats(), "identifier checker stopped");
    }

    pub fn is_running(&self) -> bool {
        *self.state.lock() == LoopState::Running
    }

    /// Token cancelled by [`IdentifierChecker::stop`], for hosts that tie other work to the loop.
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// Runs one pass right now, outside the schedule.
    pub fn check_now(&self) -> PassSummary {
        let root = self.root_provider.root();
        self.engine.lock().run_pass(root.as_ref())
    }

    pub fn stats(&self) -> CheckerStats {
        self.engine.lock().stats()
    }

    pub fn reset_seen(&self) {
        self.engine.lock().reset_seen();
    }

    /// Drops seen-set entries for nodes the host has released.
    pub fn purge_released(&self) -> usize {
        self.engine.lock().purge_released()
    }

    fn arm(self: &Arc<Self>, delay: Duration) {
        let checker = Arc::clone(self);
        self.scheduler
            .schedule(delay, Box::new(move || checker.fire()));
    }

    fn fire(self: &Arc<Self>) {
        if self.shutdown.is_cancelled() {
            debug!(checker = %self.id, "pass skipped after stop");
            return;
        }

        let summary = self.check_now();
        if summary.had_root {
            debug!(
                checker = %self.id,
                visited = summary.visited,
                reported = summary.reported,
                pruned = summary.pruned,
                "pass complete"
            );
        } else {
            debug!(checker = %self.id, "no root available; pass skipped");
        }

        if !self.shutdown.is_cancelled() {
            self.arm(self.interval);
        }
    }
}

impl<N> fmt::Debug for IdentifierChecker<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdentifierChecker")
            .field("id", &self.id)
            .field("interval", &self.interval)
            .field("state", &*self.state.lock())
            .finish()
    }
}

/// Wires a checker's collaborators. Only the root provider is mandatory: the
/// sink defaults to [`TracingSink`] and the scheduler to a [`TokioScheduler`]
/// on the current runtime.
pub struct CheckerBuilder<N> {
    config: CheckerConfig,
    root_provider: Option<Arc<dyn RootProvider<N>>>,
    sink: Option<Arc<dyn ReportSink<N>>>,
    scheduler: Option<Arc<dyn Scheduler>>,
}

impl<N: ViewNode> CheckerBuilder<N> {
    pub fn new(config: CheckerConfig) -> Self {
        Self {
            config,
            root_provider: None,
            sink: None,
            scheduler: None,
        }
    }

    pub fn root_provider(mut self, provider: impl RootProvider<N> + 'static) -> Self {
        self.root_provider = Some(Arc::new(provider));
        self
    }

    pub fn report_sink(mut self, sink: impl ReportSink<N> + 'static) -> Self {
        self.sink = Some(Arc::new(sink));
        self
    }

    pub fn scheduler(mut self, scheduler: Arc<dyn Scheduler>) -> Self {
        self.scheduler = Some(scheduler);
        self
    }

    pub fn build(mut self) -> Result<Arc<IdentifierChecker<N>>, CheckerError>
    where
        N: fmt::Debug,
    {
        let sink = self
            .sink
            .take()
            .unwrap_or_else(|| Arc::new(TracingSink) as Arc<dyn ReportSink<N>>);
        self.build_with_sink(sink)
    }

    /// Like [`CheckerBuilder::build`], for node types without a `Debug` rendering;
    /// a report sink must have been supplied.
    pub fn build_without_default_sink(
        mut self,
    ) -> Result<Arc<IdentifierChecker<N>>, CheckerError> {
        let sink = self.sink.take().ok_or(CheckerError::MissingReportSink)?;
        self.build_with_sink(sink)
    }

    fn build_with_sink(
        self,
        sink: Arc<dyn ReportSink<N>>,
    ) -> Result<Arc<IdentifierChecker<N>>, CheckerError> {
        let root_provider = self.root_provider.ok_or(CheckerError::MissingRootProvider)?;
        let scheduler: Arc<dyn Scheduler> = match self.scheduler {
            Some(scheduler) => scheduler,
            None => Arc::new(TokioScheduler::current()?),
        };
        let engine = TraversalEngine::new(
            Classifier::new(self.config.rules()),
            sink,
            self.config.traversal.clone(),
        );

        Ok(Arc::new(IdentifierChecker {
            id: CheckerId::new(),
            interval: self.config.interval.as_duration(),
            root_provider,
            scheduler,
            engine: Mutex::new(engine),
            state: Mutex::new(LoopState::Idle),
            shutdown: CancellationToken::new(),
        }))
    }
}
