//! Request/reply transport used to reach the projects API.
//!
//! [`RequestReply`] is the only seam consumers depend on:
//! - `NatsBus` (feature `nats`) talks to a real NATS server;
//! - `LoopbackBus` (feature `loopback`) answers in-process, for tests and local runs.

mod error;
pub use error::BusError;

mod config;
pub use config::{BusConfig, DEFAULT_BUS_URL};

mod transport;
pub use transport::RequestReply;

#[cfg(feature = "nats")]
mod nats;
#[cfg(feature = "nats")]
pub use nats::NatsBus;

#[cfg(any(test, feature = "loopback"))]
pub mod loopback;
#[cfg(any(test, feature = "loopback"))]
pub use loopback::{LoopbackBus, Reply};

pub use bytes::Bytes;
