//! Core document store types for docbind.
//!
//! This layer names things that every other crate talks about:
//! - `FieldPath`: dotted or structured locator of one field
//! - `Value`: the field tree of a document
//! - `DocRef`: stable handle of one document
//! - `Snapshot`: immutable, versioned view of a document
//! - Store traits: push snapshots, async field writes, collection edits
//!
//! # Example
//!
//! ```rust
//! use docbind_core_store::{field, DocRef, Snapshot, Value};
//!
//! let mut data = Value::map();
//! data.set(&field!("enabled"), Value::Bool(false)).unwrap();
//!
//! let snap = Snapshot::new(DocRef::new("clients", "alice"), 1, data);
//! assert_eq!(snap.get(&field!("enabled")), Some(&Value::Bool(false)));
//! ```

mod convert;
mod error;
mod path;
mod reference;
mod snapshot;
mod traits;
mod value;

pub use convert::{from_value, json_to_value, to_value, value_to_json};
pub use error::Error;
pub use path::{FieldPath, PathError};
pub use reference::DocRef;
pub use snapshot::Snapshot;
pub use traits::{CollectionStore, DocumentStore, DocumentWriter, SnapshotSource};
pub use value::Value;

// Receivers of snapshot subscriptions are tokio watch channels.
pub use tokio::sync::watch;
