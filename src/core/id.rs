//! Opaque identifiers for server-issued records

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a catalog, booking, partner, or user record.
///
/// The backend mints these; the client treats them as opaque strings and only
/// compares them for equality. Older catalog rows can carry blank parent
/// references, so [`EntityId::is_blank`] and [`EntityId::filter_valid`]
/// normalize those to "absent" instead of letting them pass as real ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    /// Wrap a raw identifier string
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The raw identifier string
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// An empty or whitespace-only identifier cannot refer to anything
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }

    /// Collapse blank identifiers into `None`
    ///
    /// Used wherever a parent reference read off a record may be malformed:
    /// a blank id degrades to "no parent" rather than erroring.
    pub fn filter_valid(id: Option<&EntityId>) -> Option<&EntityId> {
        id.filter(|id| !id.is_blank())
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntityId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for EntityId {
    fn from(id: String) -> Self {
        Self(id)
    }
}
