use std::fmt;

use projmap_model::subjects;

/// Direction of an identifier lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lookup {
    /// Slug in, UID out.
    UidBySlug,
    /// UID in, slug out.
    SlugByUid,
}

impl Lookup {
    #[inline]
    pub fn subject(&self) -> &'static str {
        match self {
            Lookup::UidBySlug => subjects::SLUG_TO_UID,
            Lookup::SlugByUid => subjects::UID_TO_SLUG,
        }
    }

    /// What the request carries.
    #[inline]
    pub fn key_label(&self) -> &'static str {
        match self {
            Lookup::UidBySlug => "slug",
            Lookup::SlugByUid => "UID",
        }
    }

    /// What the reply carries.
    #[inline]
    pub fn target_label(&self) -> &'static str {
        match self {
            Lookup::UidBySlug => "UID",
            Lookup::SlugByUid => "slug",
        }
    }
}

impl fmt::Display for Lookup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.key_label(), self.target_label())
    }
}
