//! Running totals for a checker, surfaced by hosts that want a health line
//! without wiring an external metrics backend.

use std::time::Duration;

use serde::Serialize;

use crate::model::PassSummary;

#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Serialize)]
pub struct CheckerStats {
    pub passes: u64,
    /// Passes where the root provider returned nothing.
    pub empty_passes: u64,
    pub nodes_visited: u64,
    pub reported: u64,
    pub seen_entries: u64,
    pub last_pass_micros: u64,
}

impl CheckerStats {
    pub fn record_pass(&mut self, summary: &PassSummary, elapsed: Duration) {
        self.passes += 1;
        if !summary.had_root {
            self.empty_passes += 1;
        }
        self.nodes_visited += summary.visited as u64;
        self.reported += summary.reported as u64;
        self.last_pass_micros = duration_to_micros(elapsed);
    }

    pub fn avg_nodes_per_pass(&self) -> f64 {
        let productive = self.passes - self.empty_passes;
        if productive == 0 {
            0.0
        } else {
            self.nodes_visited as f64 / productive as f64
        }
    }
}

fn duration_to_micros(duration: Duration) -> u64 {
    let micros = duration.as_micros();
    if micros > u128::from(u64::MAX) {
        u64::MAX
    } else {
        micros as u64
    }
}
