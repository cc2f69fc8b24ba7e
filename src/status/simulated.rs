//! In-process stand-in for a remote job.
//!
//! [`SimulatedJob`] reports linear progress over a fixed duration, then
//! settles on the outcome chosen by its [`OutcomePicker`]. It runs on the
//! tokio clock, so tests with a paused runtime can drive it deterministically.

use std::time::Duration;

use rand::Rng;
use tokio::time::Instant;

use super::snapshot::{JobStatus, StatusSnapshot};
use super::source::StatusSource;

/// How a simulated job decides its final status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutcomePicker {
    /// Always finish with this status.
    Fixed(JobStatus),
    /// Finish with `completed` or `error`, each with probability one half.
    Random,
}

impl OutcomePicker {
    pub fn pick(&self) -> JobStatus {
        match self {
            OutcomePicker::Fixed(status) => status.clone(),
            OutcomePicker::Random => {
                if rand::rng().random_bool(0.5) {
                    JobStatus::Completed
                } else {
                    JobStatus::Error
                }
            }
        }
    }
}

/// A job that finishes `duration` after it was created.
#[derive(Debug, Clone)]
pub struct SimulatedJob {
    // Tokio clock reading taken when the job started.
    started: Instant,
    // Total run time; also reported as `expectedTime`.
    duration: Duration,
    // Status reported once `duration` has elapsed.
    outcome: JobStatus,
}

impl SimulatedJob {
    /// Starts the job clock now. The outcome is decided once, up front.
    pub fn start(duration: Duration, picker: &OutcomePicker) -> Self {
        Self {
            started: Instant::now(),
            duration,
            outcome: picker.pick(),
        }
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn outcome(&self) -> &JobStatus {
        &self.outcome
    }

    /// Status as of `now`; split out so callers need not go through the trait.
    pub fn snapshot_at(&self, now: Instant) -> StatusSnapshot {
        let elapsed = now.saturating_duration_since(self.started);
        let expected_ms = self.duration.as_secs_f64() * 1000.0;

        if elapsed >= self.duration {
            return StatusSnapshot::new(self.outcome.clone(), 100.0, expected_ms);
        }

        // elapsed < duration here, so the divisor is non-zero.
        let percent = elapsed.as_nanos() * 100 / self.duration.as_nanos();
        StatusSnapshot::new(JobStatus::Pending, percent as f64, expected_ms)
    }
}

impl StatusSource for SimulatedJob {
    async fn fetch_status(&self) -> StatusSnapshot {
        self.snapshot_at(Instant::now())
    }
}
