use std::io::IsTerminal;

use crate::{error::ObserveError, format::LogFormat};

/// Logging setup, usually read from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    pub format: LogFormat,
    /// `EnvFilter` directives, e.g. `info` or `info,projmap_resolver=debug`.
    pub filter: String,
    pub with_targets: bool,
    pub ansi: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::Text,
            filter: "info".to_string(),
            with_targets: true,
            ansi: std::io::stdout().is_terminal(),
        }
    }
}

impl LogConfig {
    /// Read `LOG_FORMAT`, `LOG_LEVEL` and `DEBUG` from the process environment.
    pub fn from_env() -> Result<Self, ObserveError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`LogConfig::from_env`] with a custom variable source.
    ///
    /// Any non-empty `DEBUG` forces the `debug` filter regardless of `LOG_LEVEL`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ObserveError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let mut cfg = Self::default();
        if let Some(format) = var("LOG_FORMAT") {
            cfg.format = format.parse()?;
        }
        if let Some(filter) = var("LOG_LEVEL") {
            cfg.filter = filter;
        }
        if var("DEBUG").is_some() {
            cfg.filter = "debug".to_string();
        }
        Ok(cfg)
    }

    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = filter.into();
        self
    }
}
