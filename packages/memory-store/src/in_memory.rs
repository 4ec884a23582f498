//! In-memory remote document store.

use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::sync::watch;

use docbind_core_store::{
    CollectionStore, DocRef, DocumentWriter, Error, FieldPath, Snapshot, SnapshotSource, Value,
};

use crate::gate::{FaultPlan, WriteGate};

/// One document and its subscribers.
struct Slot {
    version: u64,
    data: Option<Value>,
    tx: watch::Sender<Snapshot>,
}

impl Slot {
    fn new(doc: &DocRef) -> Self {
        let (tx, _rx) = watch::channel(Snapshot::missing(doc.clone(), 0));
        Self {
            version: 0,
            data: None,
            tx,
        }
    }

    fn publish(&mut self, doc: &DocRef) {
        self.version += 1;
        let snapshot = match &self.data {
            Some(data) => Snapshot::new(doc.clone(), self.version, data.clone()),
            None => Snapshot::missing(doc.clone(), self.version),
        };
        self.tx.send_replace(snapshot);
    }
}

/// A field write the store has applied, in application order.
#[derive(Clone, Debug, PartialEq)]
pub struct AppliedWrite {
    pub doc: DocRef,
    pub field: FieldPath,
    pub value: Value,
}

/// An in-memory document store with push snapshots.
///
/// Every mutation bumps the document's version and pushes a new snapshot
/// to all subscribers before the mutating call returns. Out-of-band edits
/// (another client, a backend process) are made with `set_field`, which
/// bypasses the write gate and fault plan.
///
/// # Example
///
/// ```rust
/// use docbind_memory_store::MemoryStore;
/// use docbind_core_store::{field, DocRef, SnapshotSource, Value};
///
/// let store = MemoryStore::new();
/// let doc = DocRef::new("clients", "alice");
/// store.insert(&doc, Value::map());
/// store.set_field(&doc, &field!("enabled"), Value::Bool(true)).unwrap();
///
/// let rx = store.subscribe(&doc);
/// assert_eq!(rx.borrow().get(&field!("enabled")), Some(&Value::Bool(true)));
/// ```
pub struct MemoryStore {
    docs: Mutex<BTreeMap<DocRef, Slot>>,
    applied: Mutex<Vec<AppliedWrite>>,
    gate: Mutex<Option<WriteGate>>,
    faults: FaultPlan,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            docs: Mutex::new(BTreeMap::new()),
            applied: Mutex::new(Vec::new()),
            gate: Mutex::new(None),
            faults: FaultPlan::default(),
        }
    }

    /// Create a store holding the given documents.
    pub fn with_documents(docs: impl IntoIterator<Item = (DocRef, Value)>) -> Self {
        let store = Self::new();
        for (doc, data) in docs {
            store.insert(&doc, data);
        }
        store
    }

    fn lock_docs(&self) -> Result<std::sync::MutexGuard<'_, BTreeMap<DocRef, Slot>>, Error> {
        self.docs.lock().map_err(|_| Error::Other {
            message: "lock poisoned".into(),
        })
    }

    /// Create or replace a whole document.
    pub fn insert(&self, doc: &DocRef, data: Value) {
        if let Ok(mut docs) = self.docs.lock() {
            let slot = docs.entry(doc.clone()).or_insert_with(|| Slot::new(doc));
            slot.data = Some(data);
            slot.publish(doc);
        }
    }

    /// Latest snapshot of a document.
    pub fn snapshot(&self, doc: &DocRef) -> Snapshot {
        self.subscribe(doc).borrow().clone()
    }

    /// Out-of-band field update, as made by another client.
    pub fn set_field(&self, doc: &DocRef, field: &FieldPath, value: Value) -> Result<(), Error> {
        let mut docs = self.lock_docs()?;
        let slot = docs
            .get_mut(doc)
            .filter(|slot| slot.data.is_some())
            .ok_or_else(|| Error::NotFound { doc: doc.clone() })?;
        if let Some(data) = slot.data.as_mut() {
            data.set(field, value)?;
        }
        slot.publish(doc);
        Ok(())
    }

    /// Out-of-band field removal.
    pub fn remove_field(&self, doc: &DocRef, field: &FieldPath) -> Result<Option<Value>, Error> {
        let mut docs = self.lock_docs()?;
        let slot = docs
            .get_mut(doc)
            .ok_or_else(|| Error::NotFound { doc: doc.clone() })?;
        let removed = slot.data.as_mut().and_then(|data| data.remove(field));
        slot.publish(doc);
        Ok(removed)
    }

    /// Park all subsequent writes until released through the returned gate.
    pub fn hold_writes(&self) -> WriteGate {
        let gate = WriteGate::new();
        if let Ok(mut slot) = self.gate.lock() {
            if let Some(previous) = slot.replace(gate.clone()) {
                previous.open();
            }
        }
        gate
    }

    /// Fail the next write (field write or document create/delete) with `error`.
    pub fn fail_next_write(&self, error: Error) {
        self.faults.push(error);
    }

    /// Field writes applied through `DocumentWriter`, oldest first.
    pub fn applied_writes(&self) -> Vec<AppliedWrite> {
        self.applied
            .lock()
            .map(|applied| applied.clone())
            .unwrap_or_default()
    }

    /// All existing documents with their data.
    pub fn documents(&self) -> Vec<(DocRef, Value)> {
        self.docs
            .lock()
            .map(|docs| {
                docs.iter()
                    .filter_map(|(doc, slot)| Some((doc.clone(), slot.data.clone()?)))
                    .collect()
            })
            .unwrap_or_default()
    }

    async fn admit(&self) -> Result<(), Error> {
        let gate = self.gate.lock().ok().and_then(|gate| gate.clone());
        if let Some(gate) = gate {
            gate.pass().await;
        }
        match self.faults.take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SnapshotSource for MemoryStore {
    fn subscribe(&self, doc: &DocRef) -> watch::Receiver<Snapshot> {
        match self.docs.lock() {
            Ok(mut docs) => docs
                .entry(doc.clone())
                .or_insert_with(|| Slot::new(doc))
                .tx
                .subscribe(),
            // A poisoned table can still hand out a receiver that never updates.
            Err(_) => watch::channel(Snapshot::missing(doc.clone(), 0)).1,
        }
    }
}

#[async_trait]
impl DocumentWriter for MemoryStore {
    async fn write_field(
        &self,
        doc: &DocRef,
        field: &FieldPath,
        value: Value,
    ) -> Result<(), Error> {
        self.admit().await?;

        tracing::debug!(%doc, %field, "applying field write");
        self.set_field(doc, field, value.clone())?;

        if let Ok(mut applied) = self.applied.lock() {
            applied.push(AppliedWrite {
                doc: doc.clone(),
                field: field.clone(),
                value,
            });
        }
        Ok(())
    }
}

#[async_trait]
impl CollectionStore for MemoryStore {
    async fn create_document(&self, doc: &DocRef, data: Value) -> Result<(), Error> {
        self.admit().await?;

        let mut docs = self.lock_docs()?;
        let slot = docs.entry(doc.clone()).or_insert_with(|| Slot::new(doc));
        if slot.data.is_some() {
            return Err(Error::AlreadyExists { doc: doc.clone() });
        }
        tracing::debug!(%doc, "creating document");
        slot.data = Some(data);
        slot.publish(doc);
        Ok(())
    }

    async fn delete_document(&self, doc: &DocRef) -> Result<(), Error> {
        self.admit().await?;

        let mut docs = self.lock_docs()?;
        if let Some(slot) = docs.get_mut(doc) {
            if slot.data.take().is_some() {
                tracing::debug!(%doc, "deleted document");
                slot.publish(doc);
            }
        }
        Ok(())
    }

    fn list_documents(&self, collection: &str) -> Vec<DocRef> {
        self.documents()
            .into_iter()
            .map(|(doc, _)| doc)
            .filter(|doc| doc.collection() == collection)
            .collect()
    }
}
