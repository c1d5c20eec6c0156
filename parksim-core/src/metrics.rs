use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Accumulated timing and activity counters for a simulation run.
#[derive(Default, Clone, Debug, Serialize, Deserialize)]
pub struct SimMetrics {
    pub total_ticks: u64,
    pub total_time: Duration,
    pub action_time: Duration,
    /// Rating, valuation, histories and guest generation combined
    pub park_update_time: Duration,
    /// Time spent in observers (console, replay log, etc.)
    pub observer_time: Duration,
    pub actions_committed: u64,
    pub actions_rejected: u64,
    pub guests_generated: u64,
}

impl SimMetrics {
    pub fn tick_avg_ms(&self) -> f64 {
        if self.total_ticks == 0 {
            0.0
        } else {
            self.total_time.as_secs_f64() * 1000.0 / self.total_ticks as f64
        }
    }

    pub fn ticks_per_second(&self) -> f64 {
        if self.total_time.as_secs_f64() == 0.0 {
            0.0
        } else {
            self.total_ticks as f64 / self.total_time.as_secs_f64()
        }
    }

    /// Share of submitted actions that were rejected, 0.0 when none ran.
    pub fn rejection_rate(&self) -> f64 {
        let submitted = self.actions_committed + self.actions_rejected;
        if submitted == 0 {
            0.0
        } else {
            self.actions_rejected as f64 / submitted as f64
        }
    }
}
