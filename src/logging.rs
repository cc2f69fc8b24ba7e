//! Logging init: structured `tracing` output on stderr.

use tracing_subscriber::EnvFilter;

/// Installs the global subscriber. `RUST_LOG` wins over the built-in filter;
/// `verbose` lowers the default to `debug`.
pub fn init_logging(verbose: bool) {
    let default_filter = if verbose {
        "debug"
    } else {
        "warn,statuspoll=info"
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    // A second init (e.g. from tests) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
