use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

use super::trimmed_text;

/// Human-readable project identifier (e.g. `kubernetes`).
///
/// Always non-empty and free of surrounding whitespace. Uniqueness is owned by the projects API.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Slug(String);

impl Slug {
    /// Build a slug from a raw bus reply.
    pub fn from_reply(payload: &[u8]) -> Option<Self> {
        trimmed_text(payload).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }

    /// Returns `true` for the root project slug.
    pub fn is_root(&self) -> bool {
        self.0 == super::ROOT_SLUG
    }
}

impl TryFrom<&str> for Slug {
    type Error = ModelError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::from_reply(value.as_bytes()).ok_or(ModelError::Empty("slug"))
    }
}

impl TryFrom<String> for Slug {
    type Error = ModelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::try_from(value.as_str())
    }
}

impl From<Slug> for String {
    fn from(slug: Slug) -> Self {
        slug.0
    }
}

impl AsRef<str> for Slug {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
