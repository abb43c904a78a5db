use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

use super::trimmed_text;

/// Stable internal project identifier.
///
/// Opaque: no shape (UUID or otherwise) is enforced, only that it is non-empty and trimmed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProjectUid(String);

impl ProjectUid {
    /// Build a UID from a raw bus reply.
    pub fn from_reply(payload: &[u8]) -> Option<Self> {
        trimmed_text(payload).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl TryFrom<&str> for ProjectUid {
    type Error = ModelError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::from_reply(value.as_bytes()).ok_or(ModelError::Empty("project uid"))
    }
}

impl TryFrom<String> for ProjectUid {
    type Error = ModelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::try_from(value.as_str())
    }
}

impl From<ProjectUid> for String {
    fn from(uid: ProjectUid) -> Self {
        uid.0
    }
}

impl AsRef<str> for ProjectUid {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProjectUid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
