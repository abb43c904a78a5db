//! Slug <-> UID resolution against the projects API.
//!
//! Each lookup is one bounded request/reply on the bus:
//! - the caller's [`CancellationToken`](tokio_util::sync::CancellationToken) is narrowed to a child scope that lives only for the call;
//! - the call is capped at [`LOOKUP_TIMEOUT`];
//! - the reply is trimmed, and an empty reply is an error, never a value.
//!
//! Nothing is cached or retried here.

mod error;
pub use error::ResolveError;

mod lookup;
pub use lookup::Lookup;

mod resolver;
pub use resolver::{LOOKUP_TIMEOUT, ProjectLookup, ProjectResolver};

pub use projmap_model::{ProjectUid, ROOT_SLUG, Slug};
