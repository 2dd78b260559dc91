use std::time::Duration;

/// Continuation handed to a [`Scheduler`]; runs at most once.
pub type Task = Box<dyn FnOnce() + Send + 'static>;

/// Runs a continuation after approximately `delay` has elapsed.
///
/// Implementations decide the time base and the execution context. The
/// checker loop never assumes more than "eventually, after roughly `delay`".
pub trait Scheduler: Send + Sync {
    fn schedule(&self, delay: Duration, task: Task);
}

impl<F> Scheduler for F
where
    F: Fn(Duration, Task) + Send + Sync,
{
    fn schedule(&self, delay: Duration, task: Task) {
        self(delay, task)
    }
}
