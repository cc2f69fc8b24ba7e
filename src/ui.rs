//! Terminal output for a poll run: progress bar and coloured outcome.
//!
//! Uses `indicatif` for the bar and `console` for styling. [`PollProgress`]
//! is fed one [`PollAttempt`] per loop iteration.

use console::Style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::state_machine::{PollAttempt, TerminalStatus};

/// Progress bar tracking the job's reported percentage.
pub struct PollProgress {
    // indicatif bar; position is the job's reported percentage.
    pb: ProgressBar,
    // Green style for a completed job.
    green: Style,
    // Red style for a failed job or an abandoned run.
    red: Style,
    // Dimmed style for the attempt/next-poll hint.
    dim: Style,
}

impl PollProgress {
    /// Starts a visible bar labelled with `target`.
    pub fn start(target: &str) -> Self {
        let pb = ProgressBar::new(100);
        if let Ok(style) = ProgressStyle::default_bar()
            .template("{spinner:.cyan} [{bar:30.cyan/blue}] {pos:>3}% {msg}")
        {
            pb.set_style(style.progress_chars("=> "));
        }
        pb.set_message(format!("polling {target}"));
        pb.enable_steady_tick(std::time::Duration::from_millis(100));
        Self::with_bar(pb)
    }

    /// A bar that draws nothing (`--quiet`, non-interactive runs).
    pub fn hidden() -> Self {
        Self::with_bar(ProgressBar::hidden())
    }

    fn with_bar(pb: ProgressBar) -> Self {
        Self {
            pb,
            green: Style::new().green().bold(),
            red: Style::new().red().bold(),
            dim: Style::new().dim(),
        }
    }

    pub fn update(&self, attempt: &PollAttempt) {
        let snap = &attempt.snapshot;
        self.pb.set_position(snap.progress.round() as u64);
        let msg = match attempt.wait {
            Some(wait) => format!(
                "{} {}",
                snap.status,
                self.dim.apply_to(format!(
                    "(attempt {}, next poll in {:.1}s)",
                    attempt.index + 1,
                    wait.as_secs_f64()
                ))
            ),
            None => snap.status.to_string(),
        };
        self.pb.set_message(msg);
    }

    pub fn position(&self) -> u64 {
        self.pb.position()
    }

    /// Clears the bar and prints the outcome: green tick or red cross.
    pub fn finish(&self, status: TerminalStatus) {
        self.pb.finish_and_clear();
        match status {
            TerminalStatus::Completed => {
                println!("  {} Job completed", self.green.apply_to("✓"));
            }
            TerminalStatus::Error => {
                println!("  {} Job failed", self.red.apply_to("✗"));
            }
        }
    }

    pub fn abandon(&self, reason: &str) {
        self.pb.abandon();
        eprintln!("  {} {reason}", self.red.apply_to("✗"));
    }
}
