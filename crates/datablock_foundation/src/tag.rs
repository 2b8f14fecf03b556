//! Identity tags: opaque tokens naming an object independently of its
//! display name.

use std::fmt;
use std::sync::Arc;

use uuid::Uuid;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Opaque identity token stamped onto a scene object.
///
/// A tag is assigned once when a handle first wraps an object and never
/// mutated afterwards; display names may change or be reused, the tag may
/// not. Cheap to clone.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct IdentityTag(Arc<str>);

impl IdentityTag {
    /// Mints a fresh, unique tag.
    #[must_use]
    pub fn mint() -> Self {
        Self(Uuid::new_v4().to_string().into())
    }

    /// Returns the tag's token text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for IdentityTag {
    fn from(value: &str) -> Self {
        Self(value.into())
    }
}

impl From<String> for IdentityTag {
    fn from(value: String) -> Self {
        Self(value.into())
    }
}

impl fmt::Debug for IdentityTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "IdentityTag({})", self.0)
    }
}

impl fmt::Display for IdentityTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
