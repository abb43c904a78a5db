use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BusError {
    #[error("no responders available for subject {subject}")]
    NoResponders { subject: String },

    #[error("deadline exceeded")]
    DeadlineExceeded,

    #[error("request canceled")]
    Canceled,

    #[error("transport error: {0}")]
    Transport(String),

    #[error("failed to connect to bus: {0}")]
    Connect(String),

    #[error("invalid bus config: {0}")]
    InvalidConfig(String),
}
