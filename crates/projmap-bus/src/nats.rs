use async_nats::{Client, ConnectOptions, RequestErrorKind};
use async_trait::async_trait;
use bytes::Bytes;
use tracing::{debug, info, instrument};

use crate::{config::BusConfig, error::BusError, transport::RequestReply};

/// NATS-backed [`RequestReply`].
///
/// Cloning is cheap; clones share the underlying connection.
#[derive(Clone)]
pub struct NatsBus {
    client: Client,
}

impl NatsBus {
    /// Open a connection as described by `cfg`.
    ///
    /// Reconnect and drain behaviour are left to the client defaults.
    #[instrument(level = "debug", skip(cfg), fields(url = %cfg.url))]
    pub async fn connect(cfg: &BusConfig) -> Result<Self, BusError> {
        cfg.validate()?;

        let mut opts = ConnectOptions::new().connection_timeout(cfg.connect_timeout());
        if let Some(name) = &cfg.name {
            opts = opts.name(name);
        }
        let client = opts
            .connect(cfg.url.as_str())
            .await
            .map_err(|e| BusError::Connect(e.to_string()))?;

        info!(url = %cfg.url, "connected to bus");
        Ok(Self { client })
    }

    /// Wrap a connection owned elsewhere.
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl RequestReply for NatsBus {
    async fn request(&self, subject: &str, payload: Bytes) -> Result<Bytes, BusError> {
        let message = self
            .client
            .request(subject.to_string(), payload)
            .await
            .map_err(|e| {
                debug!(subject, error = %e, "bus request failed");
                map_request_error(e.kind(), subject, e.to_string())
            })?;
        Ok(message.payload)
    }
}

fn map_request_error(kind: RequestErrorKind, subject: &str, msg: String) -> BusError {
    match kind {
        RequestErrorKind::NoResponders => BusError::NoResponders {
            subject: subject.to_string(),
        },
        RequestErrorKind::TimedOut => BusError::DeadlineExceeded,
        _ => BusError::Transport(msg),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_responders_keeps_subject() {
        let err = map_request_error(
            RequestErrorKind::NoResponders,
            "lfx.projects-api.slug_to_uid",
            "no responders".into(),
        );
        assert_eq!(
            err,
            BusError::NoResponders {
                subject: "lfx.projects-api.slug_to_uid".into()
            }
        );
    }

    #[test]
    fn timed_out_is_deadline_exceeded() {
        let err = map_request_error(RequestErrorKind::TimedOut, "s", "timed out".into());
        assert_eq!(err, BusError::DeadlineExceeded);
    }

    #[test]
    fn other_failures_keep_message() {
        let err = map_request_error(RequestErrorKind::Other, "s", "connection closed".into());
        assert_eq!(err, BusError::Transport("connection closed".into()));
    }
}
