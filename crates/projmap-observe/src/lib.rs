//! Process-wide `tracing` setup for projmap binaries.
//!
//! Library crates only emit events; binaries call [`init_logging`] once at startup.

mod config;
pub use config::LogConfig;

mod error;
pub use error::ObserveError;

mod format;
pub use format::LogFormat;

mod init;
pub use init::init_logging;
