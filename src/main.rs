use std::process::ExitCode;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use statuspoll::cli::{Cli, Command};
use statuspoll::logging::init_logging;
use statuspoll::ui::PollProgress;
use statuspoll::{
    HttpStatusSource, OutcomePicker, PollAttempt, PollerConfig, SimulatedJob, StatusChecker,
    StatusSource,
};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = PollerConfig::load()?.with_overrides(cli.transition, cli.timeout);
    config.validate()?;

    match cli.command {
        Command::Watch { url } => {
            if let Some(url) = url {
                config.status_url = url;
            }
            let source = HttpStatusSource::with_timeouts(
                &config.status_url,
                config.connect_timeout(),
                config.request_timeout(),
            )?;
            let label = source.url().to_string();
            poll(source, &config, cli.quiet, &label).await
        }
        Command::Simulate {
            duration_secs,
            outcome,
        } => {
            let job = SimulatedJob::start(
                Duration::from_secs(duration_secs),
                &OutcomePicker::from(outcome),
            );
            poll(job, &config, cli.quiet, "simulated job").await
        }
        Command::Interval {
            expected_ms,
            progress,
            attempt,
        } => {
            let strategy = config.strategy();
            let expected = Duration::from_millis(expected_ms);
            let bounds = strategy.bounds(expected);
            let wait = strategy.compute_interval(attempt, progress, expected);
            println!("phase: {}", strategy.phase(progress));
            println!("base:  {}ms", bounds.base.as_millis());
            println!("max:   {}ms", bounds.max.as_millis());
            println!("wait:  {}ms", wait.as_millis());
            Ok(ExitCode::SUCCESS)
        }
    }
}

async fn poll<S: StatusSource>(
    source: S,
    config: &PollerConfig,
    quiet: bool,
    label: &str,
) -> Result<ExitCode> {
    let checker = StatusChecker::new(source, config.strategy());
    let progress = if quiet {
        PollProgress::hidden()
    } else {
        PollProgress::start(label)
    };
    let observer = |attempt: &PollAttempt| progress.update(attempt);

    let result = match config.deadline() {
        Some(deadline) => checker.run_with_deadline(deadline, observer).await,
        None => Ok(checker.run_with_observer(observer).await),
    };

    match result {
        Ok(status) => {
            if quiet {
                println!("{status}");
            } else {
                progress.finish(status);
            }
            Ok(if status.is_success() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        Err(e) => {
            progress.abandon(&e.to_string());
            Err(e.into())
        }
    }
}
