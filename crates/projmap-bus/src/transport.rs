use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::BusError;

/// Single request, single reply.
///
/// Implementations must not retry and must not impose a deadline shorter than the caller's;
/// bounding the call is the caller's job.
#[async_trait]
pub trait RequestReply: Send + Sync + 'static {
    /// Publish `payload` on `subject` and wait for the first reply.
    async fn request(&self, subject: &str, payload: Bytes) -> Result<Bytes, BusError>;
}

#[async_trait]
impl<T> RequestReply for Arc<T>
where
    T: RequestReply + ?Sized,
{
    async fn request(&self, subject: &str, payload: Bytes) -> Result<Bytes, BusError> {
        (**self).request(subject, payload).await
    }
}
