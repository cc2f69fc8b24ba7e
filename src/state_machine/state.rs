use std::fmt;
use std::time::Duration;

use super::attempt::TerminalStatus;
use crate::status::StatusSnapshot;
use crate::strategy::AdaptivePollingStrategy;

/// States of the poll loop.
///
/// A loop flows: POLLING → WAITING → POLLING → … → TERMINAL
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollState {
    Polling,
    Waiting(Duration),
    Terminal(TerminalStatus),
}

impl fmt::Display for PollState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PollState::Polling => write!(f, "POLLING"),
            PollState::Waiting(wait) => write!(f, "WAITING({}ms)", wait.as_millis()),
            PollState::Terminal(status) => write!(f, "TERMINAL({status})"),
        }
    }
}

/// The result of feeding a snapshot to the machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Suspend for this long, then poll again.
    Wait(Duration),
    /// Polling is over.
    Finish(TerminalStatus),
}

impl Transition {
    pub fn wait(&self) -> Option<Duration> {
        match self {
            Transition::Wait(d) => Some(*d),
            Transition::Finish(_) => None,
        }
    }
}

/// Owns the attempt counter and decides, snapshot by snapshot, whether to
/// stop or how long to wait. Performs no I/O and never sleeps itself.
#[derive(Debug, Clone)]
pub struct PollMachine {
    state: PollState,
    attempt: u64,
    strategy: AdaptivePollingStrategy,
}

impl PollMachine {
    pub fn new(strategy: AdaptivePollingStrategy) -> Self {
        Self {
            state: PollState::Polling,
            attempt: 0,
            strategy,
        }
    }

    pub fn state(&self) -> PollState {
        self.state
    }

    /// Index of the current attempt (0-based).
    pub fn attempt(&self) -> u64 {
        self.attempt
    }

    /// Evaluate a freshly fetched snapshot.
    ///
    /// - A `completed` or `error` status moves to `Terminal` and is final.
    /// - Anything else moves to `Waiting` with the strategy's interval.
    /// - Once terminal, further snapshots are ignored and the same
    ///   `Finish` is returned.
    pub fn observe(&mut self, snapshot: &StatusSnapshot) -> Transition {
        match self.state {
            PollState::Terminal(status) => return Transition::Finish(status),
            // Observing while still waiting means the wait was cut short.
            PollState::Waiting(_) => self.resume(),
            PollState::Polling => {}
        }

        if let Some(status) = TerminalStatus::from_status(&snapshot.status) {
            self.state = PollState::Terminal(status);
            return Transition::Finish(status);
        }

        let wait =
            self.strategy
                .compute_interval(self.attempt, snapshot.progress, snapshot.expected_time);
        self.state = PollState::Waiting(wait);
        Transition::Wait(wait)
    }

    /// The wait has elapsed: advance the attempt counter and poll again.
    /// No-op unless the machine is `Waiting`.
    pub fn resume(&mut self) {
        if let PollState::Waiting(_) = self.state {
            self.attempt += 1;
            self.state = PollState::Polling;
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self.state, PollState::Terminal(_))
    }
}
