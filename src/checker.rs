use std::time::Duration;

use tokio::time::{sleep, timeout};
use tracing::info;

use crate::error::PollerError;
use crate::state_machine::{PollAttempt, PollMachine, TerminalStatus, Transition};
use crate::status::StatusSource;
use crate::strategy::AdaptivePollingStrategy;

/// Polls a [`StatusSource`] until the job reports a terminal status.
///
/// Fetches are strictly sequential: fetch, decide, wait, fetch again. There is
/// no attempt limit; wrap the loop with [`StatusChecker::run_with_deadline`]
/// when a bound is needed. Dropping the returned future abandons the loop
/// with no further requests.
pub struct StatusChecker<S> {
    // Where snapshots come from; never fails.
    source: S,
    // Picks the wait between fetches.
    strategy: AdaptivePollingStrategy,
}

impl<S: StatusSource> StatusChecker<S> {
    pub fn new(source: S, strategy: AdaptivePollingStrategy) -> Self {
        Self { source, strategy }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Poll until the job completes or fails.
    pub async fn run(&self) -> TerminalStatus {
        self.run_with_observer(|_| {}).await
    }

    /// Same as [`run`](Self::run), calling `observer` once per attempt before
    /// any wait begins.
    pub async fn run_with_observer<F>(&self, mut observer: F) -> TerminalStatus
    where
        F: FnMut(&PollAttempt),
    {
        let mut machine = PollMachine::new(self.strategy);

        loop {
            let snapshot = self.source.fetch_status().await;
            let transition = machine.observe(&snapshot);
            let attempt = PollAttempt::new(machine.attempt(), snapshot, transition.wait());
            log_attempt(&attempt);
            observer(&attempt);

            match transition {
                Transition::Finish(status) => {
                    info!(attempts = attempt.index + 1, %status, "job reached terminal status");
                    return status;
                }
                Transition::Wait(wait) => {
                    sleep(wait).await;
                    machine.resume();
                }
            }
        }
    }

    /// Runs the loop but gives up once `deadline` has elapsed.
    pub async fn run_with_deadline<F>(
        &self,
        deadline: Duration,
        observer: F,
    ) -> Result<TerminalStatus, PollerError>
    where
        F: FnMut(&PollAttempt),
    {
        timeout(deadline, self.run_with_observer(observer))
            .await
            .map_err(|_| PollerError::DeadlineExceeded {
                elapsed_ms: u64::try_from(deadline.as_millis()).unwrap_or(u64::MAX),
            })
    }
}

fn log_attempt(attempt: &PollAttempt) {
    let snap = &attempt.snapshot;
    info!(
        attempt = attempt.index + 1,
        status = %snap.status,
        progress = snap.progress,
        expected_time_ms = snap.expected_time_ms(),
        wait_ms = wait_millis(attempt.wait),
        "polled job status"
    );
}

// Absent on the terminal attempt; saturates instead of truncating.
fn wait_millis(wait: Option<Duration>) -> Option<u64> {
    wait.map(|w| u64::try_from(w.as_millis()).unwrap_or(u64::MAX))
}
