//! Store traits: snapshot subscription, field writes, collection edits.
//!
//! A remote document store is push-based for reads and async for
//! writes. Readers never pull; they hold a `watch::Receiver<Snapshot>`
//! and look at whatever snapshot was delivered last.
//!
//! ```rust,ignore
//! use docbind_core_store::{DocumentStore, DocRef, field, Value};
//!
//! async fn enable(store: &dyn DocumentStore, doc: &DocRef) -> Result<(), Error> {
//!     store.write_field(doc, &field!("enabled"), Value::Bool(true)).await
//! }
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::watch;

use crate::{DocRef, Error, FieldPath, Snapshot, Value};

/// Push delivery of document snapshots.
///
/// Subscribing to a document that does not exist yields a receiver whose
/// current snapshot reports `exists() == false`; it updates once the
/// document is created.
pub trait SnapshotSource: Send + Sync {
    fn subscribe(&self, doc: &DocRef) -> watch::Receiver<Snapshot>;
}

/// Asynchronous point updates.
///
/// The returned future resolving and the corresponding snapshot being
/// delivered are separate events; callers must not assume one implies
/// the other has already happened.
///
/// # Object Safety
///
/// This trait is object-safe: you can use `Arc<dyn DocumentWriter>`.
#[async_trait]
pub trait DocumentWriter: Send + Sync {
    /// Write one field of an existing document.
    async fn write_field(&self, doc: &DocRef, field: &FieldPath, value: Value)
        -> Result<(), Error>;
}

/// Whole-document operations on a collection.
#[async_trait]
pub trait CollectionStore: Send + Sync {
    /// Create a document; fails with `AlreadyExists` if present.
    async fn create_document(&self, doc: &DocRef, data: Value) -> Result<(), Error>;

    /// Delete a document; deleting a missing document is not an error.
    async fn delete_document(&self, doc: &DocRef) -> Result<(), Error>;

    /// Current document handles of a collection, in id order.
    fn list_documents(&self, collection: &str) -> Vec<DocRef>;
}

/// Combined subscribe/write access, which is all a binding needs.
pub trait DocumentStore: SnapshotSource + DocumentWriter {}
impl<T: SnapshotSource + DocumentWriter> DocumentStore for T {}

// Blanket implementations for shared handles

impl<T: SnapshotSource + ?Sized> SnapshotSource for Arc<T> {
    fn subscribe(&self, doc: &DocRef) -> watch::Receiver<Snapshot> {
        self.as_ref().subscribe(doc)
    }
}

#[async_trait]
impl<T: DocumentWriter + ?Sized> DocumentWriter for Arc<T> {
    async fn write_field(
        &self,
        doc: &DocRef,
        field: &FieldPath,
        value: Value,
    ) -> Result<(), Error> {
        self.as_ref().write_field(doc, field, value).await
    }
}

#[async_trait]
impl<T: CollectionStore + ?Sized> CollectionStore for Arc<T> {
    async fn create_document(&self, doc: &DocRef, data: Value) -> Result<(), Error> {
        self.as_ref().create_document(doc, data).await
    }

    async fn delete_document(&self, doc: &DocRef) -> Result<(), Error> {
        self.as_ref().delete_document(doc).await
    }

    fn list_documents(&self, collection: &str) -> Vec<DocRef> {
        self.as_ref().list_documents(collection)
    }
}
