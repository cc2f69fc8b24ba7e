//! Status snapshot reported by a job on every poll.
//!
//! The wire shape is `{status, progress, expectedTime}` with `expectedTime` in
//! milliseconds. Deserialization is lenient: missing fields take defaults,
//! `progress` is clamped to `[0, 100]` and a negative or non-numeric
//! `expectedTime` becomes zero, so the interval strategy always receives
//! in-range inputs.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Job status as reported by the source.
///
/// Anything other than `completed` or `error` is non-terminal. Unknown strings
/// are preserved in [`JobStatus::Other`] so they can still be logged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum JobStatus {
    Pending,
    Completed,
    Error,
    Other(String),
}

impl JobStatus {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "pending" => JobStatus::Pending,
            "completed" => JobStatus::Completed,
            "error" => JobStatus::Error,
            other => JobStatus::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            JobStatus::Pending => "pending",
            JobStatus::Completed => "completed",
            JobStatus::Error => "error",
            JobStatus::Other(s) => s,
        }
    }

    /// `true` for the two statuses that end polling.
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Error)
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for JobStatus {
    fn from(raw: String) -> Self {
        JobStatus::parse(&raw)
    }
}

impl From<JobStatus> for String {
    fn from(status: JobStatus) -> Self {
        status.as_str().to_string()
    }
}

/// One point-in-time status report. Produced fresh on every poll.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "WireSnapshot", into = "WireSnapshot")]
pub struct StatusSnapshot {
    pub status: JobStatus,
    /// Percentage in `[0, 100]`.
    pub progress: f64,
    /// The source's estimate of total job duration.
    pub expected_time: Duration,
}

impl StatusSnapshot {
    /// Builds a snapshot, clamping `progress` and `expected_time_ms` into range.
    pub fn new(status: JobStatus, progress: f64, expected_time_ms: f64) -> Self {
        Self {
            status,
            progress: clamp_progress(progress),
            expected_time: millis_to_duration(expected_time_ms),
        }
    }

    /// The snapshot a source reports when it could not reach the job.
    pub fn degraded() -> Self {
        Self {
            status: JobStatus::Error,
            progress: 0.0,
            expected_time: Duration::ZERO,
        }
    }

    pub fn expected_time_ms(&self) -> u64 {
        u64::try_from(self.expected_time.as_millis()).unwrap_or(u64::MAX)
    }
}

/// NaN maps to 0; everything else is clamped to `[0, 100]`.
pub(crate) fn clamp_progress(progress: f64) -> f64 {
    if progress.is_nan() {
        0.0
    } else {
        progress.clamp(0.0, 100.0)
    }
}

fn millis_to_duration(ms: f64) -> Duration {
    if !ms.is_finite() || ms <= 0.0 {
        return Duration::ZERO;
    }
    Duration::try_from_secs_f64(ms / 1000.0).unwrap_or(Duration::MAX)
}

// JSON body as the source sends it. Numbers arrive as arbitrary JSON values so
// that a string or null never fails the whole snapshot.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireSnapshot {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    progress: Option<Value>,
    #[serde(default)]
    expected_time: Option<Value>,
}

fn lenient_number(value: Option<&Value>) -> f64 {
    match value {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    }
}

impl From<WireSnapshot> for StatusSnapshot {
    fn from(wire: WireSnapshot) -> Self {
        let status = wire
            .status
            .map(JobStatus::from)
            .unwrap_or(JobStatus::Pending);
        StatusSnapshot::new(
            status,
            lenient_number(wire.progress.as_ref()),
            lenient_number(wire.expected_time.as_ref()),
        )
    }
}

impl From<StatusSnapshot> for WireSnapshot {
    fn from(snapshot: StatusSnapshot) -> Self {
        let expected_time = snapshot.expected_time_ms();
        WireSnapshot {
            status: Some(snapshot.status.into()),
            progress: serde_json::Number::from_f64(snapshot.progress).map(Value::Number),
            expected_time: Some(Value::from(expected_time)),
        }
    }
}
