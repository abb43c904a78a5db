use std::time::Duration;

use crate::error::BusError;

/// In-cluster address of the NATS service.
pub const DEFAULT_BUS_URL: &str = "nats://nats:4222";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusConfig {
    /// Server URL, e.g. `nats://localhost:4222`.
    pub url: String,
    /// Connection name reported to the server.
    pub name: Option<String>,
    /// Upper bound for establishing the connection.
    pub connect_timeout_ms: u64,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_BUS_URL.to_string(),
            name: None,
            connect_timeout_ms: 5_000,
        }
    }
}

impl BusConfig {
    /// Read `NATS_URL` from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`BusConfig::from_env`] with a custom variable source.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();
        if let Some(url) = lookup("NATS_URL").filter(|v| !v.trim().is_empty()) {
            cfg.url = url.trim().to_string();
        }
        cfg
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    pub fn validate(&self) -> Result<(), BusError> {
        if self.url.trim().is_empty() {
            return Err(BusError::InvalidConfig("url cannot be empty".into()));
        }
        if self.connect_timeout_ms == 0 {
            return Err(BusError::InvalidConfig(
                "connect_timeout_ms must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}
