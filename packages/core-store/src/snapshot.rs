//! Immutable document snapshots.

use std::sync::Arc;

use crate::{DocRef, FieldPath, Value};

/// A delivered view of one document at one version.
///
/// Snapshots are cheap to clone (the tree is shared) and never change
/// after delivery; a newer state of the document arrives as a new
/// snapshot with a higher version.
#[derive(Clone, Debug, PartialEq)]
pub struct Snapshot {
    doc: DocRef,
    version: u64,
    data: Option<Arc<Value>>,
}

impl Snapshot {
    pub fn new(doc: DocRef, version: u64, data: Value) -> Self {
        Self {
            doc,
            version,
            data: Some(Arc::new(data)),
        }
    }

    /// Snapshot of a document that does not exist (yet, or any more).
    pub fn missing(doc: DocRef, version: u64) -> Self {
        Self {
            doc,
            version,
            data: None,
        }
    }

    pub fn doc(&self) -> &DocRef {
        &self.doc
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn exists(&self) -> bool {
        self.data.is_some()
    }

    pub fn data(&self) -> Option<&Value> {
        self.data.as_deref()
    }

    /// Read a field. Absent documents have no fields.
    pub fn get(&self, path: &FieldPath) -> Option<&Value> {
        self.data.as_deref()?.get(path)
    }

    /// Read a field, treating an explicit `Null` as absent.
    pub fn field(&self, path: &FieldPath) -> Option<&Value> {
        self.get(path).filter(|v| !v.is_null())
    }
}
