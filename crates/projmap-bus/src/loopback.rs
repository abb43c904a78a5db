//! In-process [`RequestReply`] implementation.
//!
//! Responders are registered per subject and answer synchronously with a [`Reply`],
//! which can also simulate a slow, silent, or failing remote side.
//! Every request is recorded so tests can assert on what went over the wire.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, PoisonError, RwLock},
    time::Duration,
};

use async_trait::async_trait;
use bytes::Bytes;
use tracing::trace;

use crate::{error::BusError, transport::RequestReply};

/// What a loopback responder does with a request.
#[derive(Debug, Clone)]
pub enum Reply {
    /// Answer immediately.
    Payload(Bytes),
    /// Answer after the given delay.
    Delayed(Duration, Bytes),
    /// Never answer.
    Silent,
    /// Fail at the transport level.
    Fail(BusError),
}

impl Reply {
    pub fn text(s: impl Into<String>) -> Self {
        Reply::Payload(Bytes::from(s.into()))
    }
}

type Responder = Arc<dyn Fn(&Bytes) -> Reply + Send + Sync>;

/// A request observed by the loopback bus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub subject: String,
    pub payload: Bytes,
}

#[derive(Clone, Default)]
pub struct LoopbackBus {
    responders: Arc<RwLock<HashMap<String, Responder>>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl LoopbackBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the responder for `subject`.
    pub fn respond<F>(&self, subject: impl Into<String>, responder: F) -> &Self
    where
        F: Fn(&Bytes) -> Reply + Send + Sync + 'static,
    {
        let subject = subject.into();
        trace!(%subject, "loopback responder registered");
        self.responders
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(subject, Arc::new(responder));
        self
    }

    /// Register a responder that answers every request on `subject` the same way.
    pub fn respond_always(&self, subject: impl Into<String>, reply: Reply) -> &Self {
        self.respond(subject, move |_| reply.clone())
    }

    /// Answer from a fixed table, replying with an empty payload for unknown keys.
    pub fn respond_from_table<I, K, V>(&self, subject: impl Into<String>, table: I) -> &Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let table: HashMap<String, String> = table
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        self.respond(subject, move |payload| {
            let key = String::from_utf8_lossy(payload);
            Reply::text(table.get(&*key).cloned().unwrap_or_default())
        })
    }

    /// Drop the responder for `subject`; later requests get `NoResponders`.
    pub fn unregister(&self, subject: &str) -> bool {
        self.responders
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(subject)
            .is_some()
    }

    /// All requests seen so far, in arrival order.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn responder(&self, subject: &str) -> Option<Responder> {
        self.responders
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(subject)
            .cloned()
    }
}

#[async_trait]
impl RequestReply for LoopbackBus {
    async fn request(&self, subject: &str, payload: Bytes) -> Result<Bytes, BusError> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(RecordedRequest {
                subject: subject.to_string(),
                payload: payload.clone(),
            });

        let responder = self.responder(subject).ok_or_else(|| BusError::NoResponders {
            subject: subject.to_string(),
        })?;

        match responder(&payload) {
            Reply::Payload(body) => Ok(body),
            Reply::Delayed(delay, body) => {
                tokio::time::sleep(delay).await;
                Ok(body)
            }
            Reply::Silent => std::future::pending().await,
            Reply::Fail(err) => Err(err),
        }
    }
}
