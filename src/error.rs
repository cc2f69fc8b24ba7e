use thiserror::Error;

/// Errors raised at the edges of the poller (configuration, client setup,
/// caller-imposed deadlines). The poll loop itself never fails.
#[derive(Debug, Error)]
pub enum PollerError {
    #[error("Config error: {0}")]
    Config(String),

    #[error("Invalid status URL `{url}`: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Job did not reach a terminal status within {elapsed_ms}ms")]
    DeadlineExceeded { elapsed_ms: u64 },

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}
