mod attempt;
mod state;

pub use attempt::{PollAttempt, TerminalStatus};
pub use state::{PollMachine, PollState, Transition};
