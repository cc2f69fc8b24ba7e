//! Adaptive status polling for long-running remote jobs.
//!
//! A [`StatusChecker`] repeatedly asks a [`StatusSource`] for the job's
//! `{status, progress, expectedTime}` and waits between requests for as long
//! as the [`AdaptivePollingStrategy`] decides: exponential backoff while
//! progress is low, decaying toward a short floor as the job nears completion.

pub mod checker;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod state_machine;
pub mod status;
pub mod strategy;
pub mod ui;

pub use checker::StatusChecker;
pub use config::PollerConfig;
pub use error::PollerError;
pub use state_machine::{PollAttempt, PollMachine, PollState, TerminalStatus, Transition};
pub use status::{
    HttpStatusSource, JobStatus, OutcomePicker, SimulatedJob, StatusSnapshot, StatusSource,
};
pub use strategy::{AdaptivePollingStrategy, IntervalBounds, Phase, StrategyConfig};
