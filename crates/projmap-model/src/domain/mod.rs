mod slug;
pub use slug::Slug;

mod project_uid;
pub use project_uid::ProjectUid;

/// Slug of the top-level project every other project descends from.
pub const ROOT_SLUG: &str = "ROOT";

/// Timeout value in milliseconds.
pub type TimeoutMs = u64;

/// Upper bound for a single identifier lookup round-trip.
pub const LOOKUP_TIMEOUT_MS: TimeoutMs = 5_000;

/// Decode a reply payload into trimmed text, `None` when nothing is left.
///
/// Invalid UTF-8 sequences are replaced rather than rejected; the payload is opaque.
pub(crate) fn trimmed_text(raw: &[u8]) -> Option<String> {
    let text = String::from_utf8_lossy(raw);
    let text = text.trim();
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}
