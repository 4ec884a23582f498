//! Document references.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable handle addressing one document: `collection/id`.
///
/// Equality and hashing are by value, so two handles for the same document
/// always compare equal. Ids are free-form (client ids are e-mail
/// addresses), so no identifier validation is applied.
#[derive(Clone, Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DocRef {
    collection: String,
    id: String,
}

impl DocRef {
    pub fn new(collection: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            id: id.into(),
        }
    }

    /// Parse `collection/id`. The id may itself contain `/`-free text only.
    pub fn parse(s: &str) -> Option<Self> {
        let (collection, id) = s.split_once('/')?;
        if collection.is_empty() || id.is_empty() || id.contains('/') {
            return None;
        }
        Some(Self::new(collection, id))
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}

impl fmt::Display for DocRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.collection, self.id)
    }
}
