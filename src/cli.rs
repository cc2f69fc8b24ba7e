//! Command-line interface built on clap.
//!
//! Subcommands: `watch` (poll an HTTP endpoint), `simulate` (poll an
//! in-process job) and `interval` (print a single strategy decision).

use clap::{Parser, Subcommand, ValueEnum};

use crate::status::{JobStatus, OutcomePicker};

/// Watch a long-running job until it completes or fails.
#[derive(Debug, Parser)]
#[command(name = "statuspoll", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Progress percentage at which polling switches from backoff to decay.
    #[arg(long, global = true)]
    pub transition: Option<f64>,

    /// Give up after this many seconds.
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Verbose logging.
    #[arg(long, short, global = true, default_value_t = false)]
    pub verbose: bool,

    /// Do not draw a progress bar.
    #[arg(long, short, global = true, default_value_t = false)]
    pub quiet: bool,
}

/// Final status a simulated job settles on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutcomeArg {
    Completed,
    Error,
    /// Completed or error with equal odds.
    Random,
}

impl From<OutcomeArg> for OutcomePicker {
    fn from(arg: OutcomeArg) -> Self {
        match arg {
            OutcomeArg::Completed => OutcomePicker::Fixed(JobStatus::Completed),
            OutcomeArg::Error => OutcomePicker::Fixed(JobStatus::Error),
            OutcomeArg::Random => OutcomePicker::Random,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Poll a JSON status endpoint until the job is terminal.
    Watch {
        /// Status URL. Defaults to the configured `status_url`.
        url: Option<String>,
    },

    /// Poll a simulated job running in this process.
    Simulate {
        /// How long the simulated job takes.
        #[arg(long, default_value_t = 60)]
        duration_secs: u64,

        /// Status the job ends with.
        #[arg(long, value_enum, default_value_t = OutcomeArg::Random)]
        outcome: OutcomeArg,
    },

    /// Print the wait the strategy would choose.
    Interval {
        /// Job's expected total duration in milliseconds.
        #[arg(long)]
        expected_ms: u64,

        /// Reported progress percentage.
        #[arg(long)]
        progress: f64,

        /// 0-based attempt number.
        #[arg(long, default_value_t = 0)]
        attempt: u64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_parses_watch_subcommand() {
        let cli = Cli::parse_from(["statuspoll", "watch", "http://localhost:5001/status"]);
        match cli.command {
            Command::Watch { url } => {
                assert_eq!(url.unwrap(), "http://localhost:5001/status");
            }
            _ => panic!("expected Watch command"),
        }
    }

    #[test]
    fn cli_parses_global_flags() {
        let cli = Cli::parse_from([
            "statuspoll",
            "--transition",
            "75",
            "--timeout",
            "600",
            "--verbose",
            "--quiet",
            "watch",
        ]);
        assert_eq!(cli.transition, Some(75.0));
        assert_eq!(cli.timeout, Some(600));
        assert!(cli.verbose);
        assert!(cli.quiet);
    }

    #[test]
    fn cli_parses_simulate_defaults() {
        let cli = Cli::parse_from(["statuspoll", "simulate"]);
        match cli.command {
            Command::Simulate {
                duration_secs,
                outcome,
            } => {
                assert_eq!(duration_secs, 60);
                assert_eq!(outcome, OutcomeArg::Random);
            }
            _ => panic!("expected Simulate command"),
        }
    }

    #[test]
    fn cli_parses_interval_subcommand() {
        let cli = Cli::parse_from([
            "statuspoll",
            "interval",
            "--expected-ms",
            "90000",
            "--progress",
            "80",
        ]);
        match cli.command {
            Command::Interval {
                expected_ms,
                progress,
                attempt,
            } => {
                assert_eq!(expected_ms, 90_000);
                assert_eq!(progress, 80.0);
                assert_eq!(attempt, 0);
            }
            _ => panic!("expected Interval command"),
        }
    }

    #[test]
    fn outcome_arg_maps_to_picker() {
        assert_eq!(
            OutcomePicker::from(OutcomeArg::Error),
            OutcomePicker::Fixed(JobStatus::Error)
        );
        assert_eq!(OutcomePicker::from(OutcomeArg::Random), OutcomePicker::Random);
    }

    #[test]
    fn cli_verify() {
        Cli::command().debug_assert();
    }
}
