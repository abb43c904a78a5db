use projmap_bus::BusError;
use thiserror::Error;

use crate::lookup::Lookup;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// The request never got a reply: timeout, cancellation, no responder, or transport failure.
    #[error("failed to request project {} for {} {key}: {source}", .lookup.target_label(), .lookup.key_label())]
    RequestFailed {
        lookup: Lookup,
        key: String,
        #[source]
        source: BusError,
    },

    /// A reply arrived but held nothing after trimming.
    #[error("empty project {} response for {} {key}", .lookup.target_label(), .lookup.key_label())]
    EmptyResponse { lookup: Lookup, key: String },
}

impl ResolveError {
    /// The identifier that was being resolved.
    pub fn key(&self) -> &str {
        match self {
            ResolveError::RequestFailed { key, .. } | ResolveError::EmptyResponse { key, .. } => key,
        }
    }

    pub fn lookup(&self) -> Lookup {
        match self {
            ResolveError::RequestFailed { lookup, .. }
            | ResolveError::EmptyResponse { lookup, .. } => *lookup,
        }
    }
}
