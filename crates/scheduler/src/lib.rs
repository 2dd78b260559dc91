pub mod api;
pub mod error;
pub mod manual;
pub mod metrics;
pub mod runtime;

pub use api::{Scheduler, Task};
pub use error::SchedulerError;
pub use manual::ManualScheduler;
pub use runtime::TokioScheduler;
