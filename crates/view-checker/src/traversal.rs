use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;

use idcheck_core_types::ViewNode;
use tracing::{debug, trace};

use crate::classifier::{has_identifier, Classifier};
use crate::metrics::CheckerStats;
use crate::model::{PassSummary, VisitedKey};
use crate::policy::TraversalOptions;
use crate::ports::ReportSink;
use crate::seen::SeenSet;

/// Walks a tree depth-first, pre-order, reporting each unidentified checkable
/// node once for as long as the engine lives.
///
/// The walk uses an explicit stack and a snapshot of every child list, so
/// deep trees cannot exhaust the call stack and a host mutating a node's
/// children mid-pass cannot invalidate the iteration.
pub struct TraversalEngine<N> {
    classifier: Classifier,
    seen: SeenSet<N>,
    sink: Arc<dyn ReportSink<N>>,
    options: TraversalOptions,
    stats: CheckerStats,
}

impl<N: ViewNode> TraversalEngine<N> {
    pub fn new(
        classifier: Classifier,
        sink: Arc<dyn ReportSink<N>>,
        options: TraversalOptions,
    ) -> Self {
        Self {
            classifier,
            seen: SeenSet::new(),
            sink,
            options,
            stats: CheckerStats::default(),
        }
    }

    pub fn seen(&self) -> &SeenSet<N> {
        &self.seen
    }

    pub fn stats(&self) -> CheckerStats {
        CheckerStats {
            seen_entries: self.seen.len() as u64,
            ..self.stats
        }
    }

    /// Forget every reported node; they will be reported again if still unidentified.
    pub fn reset_seen(&mut self) {
        debug!(entries = self.seen.len(), "seen set reset");
        self.seen.clear();
    }

    pub fn purge_released(&mut self) -> usize {
        self.seen.purge_released()
    }

    /// One full pass from `root`. A missing root is a no-op pass.
    pub fn run_pass(&mut self, root: Option<&Arc<N>>) -> PassSummary {
        let started = Instant::now();
        let summary = match root {
            Some(root) => self.walk(root),
            None => PassSummary::empty(),
        };
        self.stats.record_pass(&summary, started.elapsed());
        summary
    }

    fn walk(&mut self, root: &Arc<N>) -> PassSummary {
        let mut summary = PassSummary {
            had_root: true,
            ..PassSummary::default()
        };
        let mut visited: Option<HashSet<VisitedKey<N>>> =
            self.options.guard_cycles.then(HashSet::new);
        let mut stack = vec![Arc::clone(root)];

        while let Some(node) = stack.pop() {
            if let Some(visited) = visited.as_mut() {
                if !visited.insert(VisitedKey(Arc::clone(&node))) {
                    summary.revisits += 1;
                    continue;
                }
            }
            if !node.is_attached() {
                trace!(node = ?Arc::as_ptr(&node), "skipping detached node");
                summary.detached += 1;
                continue;
            }
            summary.visited += 1;

            if self.classifier.is_checkable(&*node) {
                summary.checkable += 1;
                if !has_identifier(&*node) {
                    summary.unidentified += 1;
                    if !self.seen.contains(&node) {
                        self.sink.report(&node);
                        self.seen.insert(&node);
                        summary.reported += 1;
                    }
                }
            }

            if self.classifier.is_traversable(&*node) {
                // Reversed so the first child is popped first.
                stack.extend(node.children().into_iter().rev());
            } else {
                summary.pruned += 1;
            }
        }

        summary
    }
}

impl<N> std::fmt::Debug for TraversalEngine<N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TraversalEngine")
            .field("classifier", &self.classifier)
            .field("seen", &self.seen)
            .field("options", &self.options)
            .field("stats", &self.stats)
            .finish()
    }
}
