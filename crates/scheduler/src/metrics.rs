use once_cell::sync::Lazy;
use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Default)]
struct Counters {
    scheduled: AtomicU64,
    fired: AtomicU64,
}

static COUNTERS: Lazy<Counters> = Lazy::new(Counters::default);

fn increment(counter: &AtomicU64) {
    counter.fetch_add(1, Ordering::Relaxed);
}

pub fn record_scheduled() {
    increment(&COUNTERS.scheduled);
}

pub fn record_fired() {
    increment(&COUNTERS.fired);
}

#[derive(Clone, Debug, Default)]
pub struct SchedulerMetricsSnapshot {
    pub scheduled: u64,
    pub fired: u64,
}

pub fn snapshot() -> SchedulerMetricsSnapshot {
    SchedulerMetricsSnapshot {
        scheduled: COUNTERS.scheduled.load(Ordering::Relaxed),
        fired: COUNTERS.fired.load(Ordering::Relaxed),
    }
}
