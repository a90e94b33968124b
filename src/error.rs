//! Error taxonomy.
//!
//! Three failure classes with distinct blast radii: [`ConfigError`] is fatal
//! and can only happen before the loop starts, [`FetchError`] aborts the
//! current reconciliation pass, and [`PublishError`] aborts a single
//! repository's publish attempt within a pass. Telegram rate limiting is not
//! represented here at all - it is resolved inside the publisher by
//! suspending and retrying.

use thiserror::Error;

/// Startup configuration failure. Terminates the process.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    #[error("invalid value {value:?} for {var}: {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

/// Failure while listing repositories from GitHub.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("GitHub request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("GitHub returned status {0}")]
    Status(reqwest::StatusCode),

    #[error("failed to decode repository list: {0}")]
    Decode(#[source] reqwest::Error),
}

/// Non-rate-limit failure while sending a channel message.
#[derive(Debug, Error)]
pub enum PublishError {
    #[error("Telegram request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Telegram returned status {status}: {description}")]
    Api {
        status: reqwest::StatusCode,
        description: String,
    },
}
