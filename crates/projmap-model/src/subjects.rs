//! Bus subjects served by the projects API.

/// Request carries a project slug, reply carries the project UID.
pub const SLUG_TO_UID: &str = "lfx.projects-api.slug_to_uid";

/// Request carries a project UID, reply carries the project slug.
pub const UID_TO_SLUG: &str = "lfx.projects-api.get_slug";
