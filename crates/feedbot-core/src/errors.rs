use std::path::PathBuf;

/// Core error type for the bot.
///
/// Adapter crates map their specific errors into this type so the router and
/// relay can pick the user-facing recovery for each failure kind.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    /// The bot (platform side) or the author (admin check) lacks authority.
    #[error("permission denied: {0}")]
    Permission(String),

    /// The platform refused the payload (too large or malformed).
    #[error("delivery rejected: {0}")]
    DeliveryRejected(String),

    #[error("usage error: {0}")]
    Usage(String),

    #[error("persistence error: {path}: {reason}")]
    Persistence { path: PathBuf, reason: String },

    #[error("external error: {0}")]
    External(String),
}

pub type Result<T> = std::result::Result<T, Error>;
