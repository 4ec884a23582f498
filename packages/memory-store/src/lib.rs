//! In-memory remote document store for docbind.
//!
//! `MemoryStore` implements the `docbind-core-store` traits the way a
//! hosted document database behaves from a client's point of view:
//! snapshots are pushed to subscribers, field writes are asynchronous and
//! may fail. For tests, writes can be parked behind a `WriteGate` and
//! failures can be queued with `fail_next_write`.
//!
//! # Example
//!
//! ```rust
//! use docbind_memory_store::MemoryStore;
//! use docbind_core_store::{field, DocRef, SnapshotSource, Value};
//! use serde_json::json;
//!
//! let store = MemoryStore::from_json(json!({
//!     "clients": {"alice": {"enabled": false}}
//! })).unwrap();
//!
//! let rx = store.subscribe(&DocRef::new("clients", "alice"));
//! assert_eq!(rx.borrow().get(&field!("enabled")), Some(&Value::Bool(false)));
//! ```

mod gate;
mod in_memory;
mod load;

pub use gate::WriteGate;
pub use in_memory::{AppliedWrite, MemoryStore};
pub use load::{document, LoadError};
