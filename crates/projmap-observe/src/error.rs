use thiserror::Error;

#[derive(Debug, Error)]
pub enum ObserveError {
    #[error("unknown log format '{0}' (expected: text|json|journald)")]
    UnknownFormat(String),

    #[error("journald output requires linux and the `journald` feature")]
    JournaldUnavailable,

    #[error("invalid log filter '{filter}': {reason}")]
    InvalidFilter { filter: String, reason: String },

    #[error("a global subscriber is already installed")]
    AlreadyInitialized,

    #[error("failed to install subscriber: {0}")]
    Install(String),
}
