//! Periodic accessibility-identifier checks over a host view tree.
//!
//! The host exposes its tree through [`ViewNode`], hands the checker a root
//! provider, a report sink and a [`Scheduler`], and calls
//! [`IdentifierChecker::start`]. Every checkable node without an identifier
//! is reported once per node lifetime.

pub mod checker;
pub mod classifier;
pub mod errors;
pub mod metrics;
pub mod model;
pub mod policy;
pub mod ports;
pub mod seen;
pub mod traversal;

#[cfg(test)]
mod testing;

pub use checker::{CheckerBuilder, IdentifierChecker};
pub use classifier::Classifier;
pub use errors::CheckerError;
pub use idcheck_core_types::{CheckerId, ViewClass, ViewNode};
pub use idcheck_scheduler::{ManualScheduler, Scheduler, Task, TokioScheduler};
pub use metrics::CheckerStats;
pub use model::{PassSummary, WeakNodeRef};
pub use policy::{CheckerConfig, ClassificationRules, Interval, TraversalOptions};
pub use ports::{ReportSink, RootProvider, TracingSink};
pub use seen::SeenSet;
pub use traversal::TraversalEngine;
