use std::time::Duration;

use parking_lot::Mutex;

use crate::api::{Scheduler, Task};

#[derive(Default)]
struct ManualState {
    delays: Vec<Duration>,
    pending: Option<Task>,
}

/// Scheduler that never runs anything on its own.
///
/// It records every requested delay and keeps the most recently armed
/// continuation until [`ManualScheduler::fire`] is called. Suitable for unit
/// tests and for hosts that drive passes from their own event loop.
#[derive(Default)]
pub struct ManualScheduler {
    state: Mutex<ManualState>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every delay requested so far, in call order.
    pub fn delays(&self) -> Vec<Duration> {
        self.state.lock().delays.clone()
    }

    pub fn last_delay(&self) -> Option<Duration> {
        self.state.lock().delays.last().copied()
    }

    pub fn has_pending(&self) -> bool {
        self.state.lock().pending.is_some()
    }

    /// Runs the pending continuation, if any. Returns whether one ran.
    pub fn fire(&self) -> bool {
        // The continuation usually re-arms, so the lock must be released first.
        let task = self.state.lock().pending.take();
        match task {
            Some(task) => {
                task();
                true
            }
            None => false,
        }
    }

    /// Fires up to `times` continuations, stopping early once nothing is armed.
    pub fn fire_times(&self, times: usize) -> usize {
        (0..times).take_while(|_| self.fire()).count()
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&self, delay: Duration, task: Task) {
        let mut state = self.state.lock();
        state.delays.push(delay);
        state.pending = Some(task);
    }
}

impl std::fmt::Debug for ManualScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("ManualScheduler")
            .field("delays", &state.delays)
            .field("pending", &state.pending.is_some())
            .finish()
    }
}
