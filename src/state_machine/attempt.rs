use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::status::{JobStatus, StatusSnapshot};

/// Final result of a poll loop. Only these two values ever end polling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TerminalStatus {
    Completed,
    Error,
}

impl TerminalStatus {
    /// `None` for any non-terminal status.
    pub fn from_status(status: &JobStatus) -> Option<Self> {
        match status {
            JobStatus::Completed => Some(TerminalStatus::Completed),
            JobStatus::Error => Some(TerminalStatus::Error),
            JobStatus::Pending | JobStatus::Other(_) => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TerminalStatus::Completed => "completed",
            TerminalStatus::Error => "error",
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, TerminalStatus::Completed)
    }
}

impl fmt::Display for TerminalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One loop iteration: what was fetched and how long the loop will wait.
///
/// Exists only for diagnostics; the loop keeps no history of these.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PollAttempt {
    /// 0-based, strictly increasing.
    pub index: u64,
    pub snapshot: StatusSnapshot,
    /// `None` on the attempt that observed a terminal status.
    pub wait: Option<Duration>,
    pub observed_at: DateTime<Utc>,
}

impl PollAttempt {
    pub fn new(index: u64, snapshot: StatusSnapshot, wait: Option<Duration>) -> Self {
        Self {
            index,
            snapshot,
            wait,
            observed_at: Utc::now(),
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.snapshot.status.is_terminal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_from_status() {
        assert_eq!(
            TerminalStatus::from_status(&JobStatus::Completed),
            Some(TerminalStatus::Completed)
        );
        assert_eq!(
            TerminalStatus::from_status(&JobStatus::Error),
            Some(TerminalStatus::Error)
        );
        assert_eq!(TerminalStatus::from_status(&JobStatus::Pending), None);
        assert_eq!(
            TerminalStatus::from_status(&JobStatus::Other("running".into())),
            None
        );
    }

    #[test]
    fn terminal_display_matches_wire_strings() {
        assert_eq!(TerminalStatus::Completed.to_string(), "completed");
        assert_eq!(TerminalStatus::Error.to_string(), "error");
        assert_eq!(
            serde_json::to_string(&TerminalStatus::Error).unwrap(),
            r#""error""#
        );
    }

    #[test]
    fn attempt_serializes_for_diagnostics() {
        let attempt = PollAttempt::new(
            3,
            StatusSnapshot::new(JobStatus::Pending, 40.0, 60_000.0),
            Some(Duration::from_millis(2500)),
        );
        assert!(!attempt.is_terminal());
        let json = serde_json::to_value(&attempt).unwrap();
        assert_eq!(json["index"], 3);
        assert_eq!(json["snapshot"]["expectedTime"], 60_000);
        assert!(json["observed_at"].is_string());
    }
}
