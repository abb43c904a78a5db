use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use bytes::Bytes;
use projmap_bus::{BusError, RequestReply};
use projmap_model::{LOOKUP_TIMEOUT_MS, ProjectUid, ROOT_SLUG, Slug};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::{error::ResolveError, lookup::Lookup};

/// Fixed bound for one lookup; callers wanting less cancel their own token earlier.
pub const LOOKUP_TIMEOUT: Duration = Duration::from_millis(LOOKUP_TIMEOUT_MS);

/// Identifier lookups as seen by consumers.
///
/// Lets the sync service depend on lookups without knowing which bus sits underneath.
#[async_trait]
pub trait ProjectLookup: Send + Sync + 'static {
    /// Resolve a project slug to its UID.
    async fn uid_by_slug(
        &self,
        ctx: &CancellationToken,
        slug: &str,
    ) -> Result<ProjectUid, ResolveError>;

    /// Resolve a project UID to its slug.
    async fn slug_by_uid(&self, ctx: &CancellationToken, uid: &str) -> Result<Slug, ResolveError>;

    /// Resolve the UID of the root project.
    async fn root_uid(&self, ctx: &CancellationToken) -> Result<ProjectUid, ResolveError> {
        self.uid_by_slug(ctx, ROOT_SLUG).await
    }
}

/// Bus-backed identifier resolver.
///
/// Holds nothing but the shared bus handle, so it is cheap to clone and safe to call concurrently.
pub struct ProjectResolver<B: ?Sized> {
    bus: Arc<B>,
}

impl<B: ?Sized> Clone for ProjectResolver<B> {
    fn clone(&self) -> Self {
        Self {
            bus: Arc::clone(&self.bus),
        }
    }
}

impl<B> ProjectResolver<B>
where
    B: RequestReply + ?Sized,
{
    pub fn new(bus: Arc<B>) -> Self {
        Self { bus }
    }

    /// Resolve a project slug (e.g. `kubernetes`) to its UID.
    ///
    /// The slug is sent as-is; only the reply is normalized.
    pub async fn uid_by_slug(
        &self,
        ctx: &CancellationToken,
        slug: &str,
    ) -> Result<ProjectUid, ResolveError> {
        debug!(slug, "requesting project UID via bus");

        let reply = self.call(ctx, Lookup::UidBySlug, slug).await?;
        let uid = ProjectUid::from_reply(&reply).ok_or_else(|| ResolveError::EmptyResponse {
            lookup: Lookup::UidBySlug,
            key: slug.to_string(),
        })?;

        debug!(slug, project_uid = %uid, "successfully retrieved project UID");
        Ok(uid)
    }

    /// Resolve a project UID to its slug, e.g. to check a parent project against an allowlist.
    pub async fn slug_by_uid(
        &self,
        ctx: &CancellationToken,
        uid: &str,
    ) -> Result<Slug, ResolveError> {
        debug!(project_uid = uid, "requesting project slug via bus");

        let reply = self.call(ctx, Lookup::SlugByUid, uid).await?;
        let slug = Slug::from_reply(&reply).ok_or_else(|| ResolveError::EmptyResponse {
            lookup: Lookup::SlugByUid,
            key: uid.to_string(),
        })?;

        debug!(project_uid = uid, slug = %slug, "successfully retrieved project slug");
        Ok(slug)
    }

    /// Resolve the UID of the `ROOT` project.
    pub async fn root_uid(&self, ctx: &CancellationToken) -> Result<ProjectUid, ResolveError> {
        self.uid_by_slug(ctx, ROOT_SLUG).await
    }

    /// One bounded request/reply.
    ///
    /// The child scope is cancelled on every exit path, which detaches it from `ctx`.
    async fn call(
        &self,
        ctx: &CancellationToken,
        lookup: Lookup,
        key: &str,
    ) -> Result<Bytes, ResolveError> {
        let scope = ctx.child_token();
        let _release = scope.clone().drop_guard();

        let payload = Bytes::copy_from_slice(key.as_bytes());
        let request = tokio::time::timeout(
            LOOKUP_TIMEOUT,
            self.bus.request(lookup.subject(), payload),
        );

        let outcome = tokio::select! {
            biased;
            _ = scope.cancelled() => Err(BusError::Canceled),
            res = request => res.unwrap_or(Err(BusError::DeadlineExceeded)),
        };

        outcome.map_err(|source| {
            debug!(subject = lookup.subject(), key, error = %source, "identifier lookup failed");
            ResolveError::RequestFailed {
                lookup,
                key: key.to_string(),
                source,
            }
        })
    }
}

#[async_trait]
impl<B> ProjectLookup for ProjectResolver<B>
where
    B: RequestReply + ?Sized,
{
    async fn uid_by_slug(
        &self,
        ctx: &CancellationToken,
        slug: &str,
    ) -> Result<ProjectUid, ResolveError> {
        ProjectResolver::uid_by_slug(self, ctx, slug).await
    }

    async fn slug_by_uid(&self, ctx: &CancellationToken, uid: &str) -> Result<Slug, ResolveError> {
        ProjectResolver::slug_by_uid(self, ctx, uid).await
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use projmap_bus::{LoopbackBus, Reply, loopback::RecordedRequest};
    use projmap_model::subjects;
    use tokio::time::Instant;

    use super::*;

    const NIL_UID: &str = "00000000-0000-0000-0000-000000000000";

    fn resolver() -> (LoopbackBus, ProjectResolver<LoopbackBus>) {
        let bus = LoopbackBus::new();
        let resolver = ProjectResolver::new(Arc::new(bus.clone()));
        (bus, resolver)
    }

    #[tokio::test]
    async fn uid_by_slug_trims_newline() {
        let (bus, resolver) = resolver();
        bus.respond_always(subjects::SLUG_TO_UID, Reply::text("a1b2c3d4-...\n"));

        let uid = resolver
            .uid_by_slug(&CancellationToken::new(), "kubernetes")
            .await
            .unwrap();
        assert_eq!(uid.as_str(), "a1b2c3d4-...");
    }

    #[tokio::test]
    async fn slug_is_sent_verbatim() {
        let (bus, resolver) = resolver();
        bus.respond_always(subjects::SLUG_TO_UID, Reply::text("uid"));

        resolver
            .uid_by_slug(&CancellationToken::new(), " Linux ")
            .await
            .unwrap();
        assert_eq!(
            bus.requests(),
            vec![RecordedRequest {
                subject: subjects::SLUG_TO_UID.to_string(),
                payload: Bytes::from_static(b" Linux "),
            }]
        );
    }

    #[tokio::test]
    async fn padded_replies_are_trimmed_both_ways() {
        let (bus, resolver) = resolver();
        bus.respond_always(subjects::SLUG_TO_UID, Reply::text("  uid-42  "));
        bus.respond_always(subjects::UID_TO_SLUG, Reply::text("\t linux \r\n"));
        let ctx = CancellationToken::new();

        assert_eq!(resolver.uid_by_slug(&ctx, "linux").await.unwrap().as_str(), "uid-42");
        assert_eq!(resolver.slug_by_uid(&ctx, "uid-42").await.unwrap().as_str(), "linux");
    }

    #[tokio::test]
    async fn empty_reply_is_an_error() {
        let (bus, resolver) = resolver();
        bus.respond_always(subjects::SLUG_TO_UID, Reply::text(""));

        let err = resolver
            .uid_by_slug(&CancellationToken::new(), "ghost-project")
            .await
            .unwrap_err();
        assert_eq!(
            err,
            ResolveError::EmptyResponse {
                lookup: Lookup::UidBySlug,
                key: "ghost-project".into(),
            }
        );
    }

    #[tokio::test]
    async fn whitespace_reply_is_an_error_for_slug_lookup() {
        let (bus, resolver) = resolver();
        bus.respond_always(subjects::UID_TO_SLUG, Reply::text("   "));

        let err = resolver
            .slug_by_uid(&CancellationToken::new(), "uid-7")
            .await
            .unwrap_err();
        assert!(matches!(err, ResolveError::EmptyResponse { .. }));
        assert_eq!(err.key(), "uid-7");
        assert_eq!(err.lookup(), Lookup::SlugByUid);
    }

    #[tokio::test(start_paused = true)]
    async fn unanswered_request_hits_deadline() {
        let (bus, resolver) = resolver();
        bus.respond_always(subjects::UID_TO_SLUG, Reply::Silent);

        let started = Instant::now();
        let err = resolver
            .slug_by_uid(&CancellationToken::new(), NIL_UID)
            .await
            .unwrap_err();

        assert_eq!(
            err,
            ResolveError::RequestFailed {
                lookup: Lookup::SlugByUid,
                key: NIL_UID.into(),
                source: BusError::DeadlineExceeded,
            }
        );
        assert!(started.elapsed() >= LOOKUP_TIMEOUT);
    }

    #[tokio::test(start_paused = true)]
    async fn reply_just_inside_deadline_succeeds() {
        let (bus, resolver) = resolver();
        bus.respond_always(
            subjects::SLUG_TO_UID,
            Reply::Delayed(
                LOOKUP_TIMEOUT - Duration::from_millis(10),
                Bytes::from_static(b"uid"),
            ),
        );

        let uid = resolver
            .uid_by_slug(&CancellationToken::new(), "slow")
            .await
            .unwrap();
        assert_eq!(uid.as_str(), "uid");
    }

    #[tokio::test]
    async fn transport_error_is_wrapped() {
        let (bus, resolver) = resolver();
        bus.respond_always(
            subjects::SLUG_TO_UID,
            Reply::Fail(BusError::Transport("connection reset".into())),
        );

        let err = resolver
            .uid_by_slug(&CancellationToken::new(), "kubernetes")
            .await
            .unwrap_err();
        assert_eq!(
            err,
            ResolveError::RequestFailed {
                lookup: Lookup::UidBySlug,
                key: "kubernetes".into(),
                source: BusError::Transport("connection reset".into()),
            }
        );
    }

    #[tokio::test]
    async fn missing_responder_is_request_failure() {
        let (_bus, resolver) = resolver();

        let err = resolver
            .uid_by_slug(&CancellationToken::new(), "kubernetes")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ResolveError::RequestFailed {
                source: BusError::NoResponders { .. },
                ..
            }
        ));
    }

    #[tokio::test]
    async fn cancelled_parent_fails_without_waiting() {
        let (bus, resolver) = resolver();
        bus.respond_always(subjects::SLUG_TO_UID, Reply::Silent);
        let ctx = CancellationToken::new();
        ctx.cancel();

        let err = resolver.uid_by_slug(&ctx, "kubernetes").await.unwrap_err();
        assert!(matches!(
            err,
            ResolveError::RequestFailed {
                source: BusError::Canceled,
                ..
            }
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn parent_cancelled_mid_call_wins_over_timeout() {
        let (bus, resolver) = resolver();
        bus.respond_always(subjects::UID_TO_SLUG, Reply::Silent);
        let ctx = CancellationToken::new();

        let canceller = ctx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(1)).await;
            canceller.cancel();
        });

        let started = Instant::now();
        let err = resolver.slug_by_uid(&ctx, "uid-1").await.unwrap_err();
        assert!(matches!(
            err,
            ResolveError::RequestFailed {
                source: BusError::Canceled,
                ..
            }
        ));
        assert!(started.elapsed() < LOOKUP_TIMEOUT);
    }

    #[tokio::test]
    async fn parent_scope_survives_the_call() {
        let (bus, resolver) = resolver();
        bus.respond_always(subjects::SLUG_TO_UID, Reply::text("uid"));
        let ctx = CancellationToken::new();

        resolver.uid_by_slug(&ctx, "a").await.unwrap();
        let _ = resolver.slug_by_uid(&ctx, "uid").await;

        assert!(!ctx.is_cancelled());
        resolver.uid_by_slug(&ctx, "b").await.unwrap();
    }

    #[tokio::test]
    async fn root_uid_asks_for_root_slug() {
        let (bus, resolver) = resolver();
        bus.respond_from_table(subjects::SLUG_TO_UID, [("ROOT", "root-uid-123")]);

        let uid = resolver.root_uid(&CancellationToken::new()).await.unwrap();
        assert_eq!(uid.as_str(), "root-uid-123");
        assert_eq!(bus.requests()[0].payload, Bytes::from_static(b"ROOT"));
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_lookups_do_not_interfere() {
        let (bus, resolver) = resolver();
        bus.respond(subjects::SLUG_TO_UID, |payload| match payload.as_ref() {
            b"slow" => Reply::Delayed(Duration::from_secs(2), Bytes::from_static(b"uid-slow")),
            b"fast" => Reply::text("uid-fast"),
            _ => Reply::text(""),
        });
        bus.respond(subjects::UID_TO_SLUG, |payload| {
            let slug = format!("slug-of-{}", String::from_utf8_lossy(payload));
            Reply::Delayed(Duration::from_secs(1), Bytes::from(slug))
        });
        let ctx = CancellationToken::new();

        let (slow, fast, slug, missing) = tokio::join!(
            resolver.uid_by_slug(&ctx, "slow"),
            resolver.uid_by_slug(&ctx, "fast"),
            resolver.slug_by_uid(&ctx, "uid-9"),
            resolver.uid_by_slug(&ctx, "missing"),
        );

        assert_eq!(slow.unwrap().as_str(), "uid-slow");
        assert_eq!(fast.unwrap().as_str(), "uid-fast");
        assert_eq!(slug.unwrap().as_str(), "slug-of-uid-9");
        assert_eq!(missing.unwrap_err().key(), "missing");
    }

    #[tokio::test]
    async fn works_behind_trait_object() {
        let (bus, resolver) = resolver();
        bus.respond_from_table(subjects::SLUG_TO_UID, [("ROOT", "root-uid-123")]);
        bus.respond_from_table(subjects::UID_TO_SLUG, [("root-uid-123", "ROOT")]);

        let lookup: Arc<dyn ProjectLookup> = Arc::new(resolver);
        let ctx = CancellationToken::new();

        let uid = lookup.root_uid(&ctx).await.unwrap();
        let slug = lookup.slug_by_uid(&ctx, uid.as_str()).await.unwrap();
        assert!(slug.is_root());
    }

    #[tokio::test]
    async fn dyn_bus_is_accepted() {
        let bus = LoopbackBus::new();
        bus.respond_always(subjects::SLUG_TO_UID, Reply::text("x"));
        let shared: Arc<dyn RequestReply> = Arc::new(bus);

        let resolver = ProjectResolver::new(shared);
        let uid = resolver.uid_by_slug(&CancellationToken::new(), "k").await.unwrap();
        assert_eq!(uid.as_str(), "x");
    }
}
