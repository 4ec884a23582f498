//! Async glue between a binding and a live document store.

use std::sync::Arc;

use docbind_core_store::{watch, DocRef, DocumentStore, Error, Snapshot};

use crate::binding::{Binding, Event, FieldWrite, Step};

/// A binding mounted on one document of a store.
///
/// The driver owns the subscription. Snapshots reach the binding when the
/// caller asks (`refresh`, `changed`) and continuously while a write is in
/// flight, so a remote echo that races the write is seen, and suppressed,
/// by the binding rather than silently dropped.
///
/// # Example
///
/// ```rust,ignore
/// let mut toggle = Mounted::mount(store, doc, Toggle::switch(field!("enabled"))).await;
/// toggle.gesture(ToggleGesture::Click).await;
/// assert!(toggle.view().checked);
/// ```
pub struct Mounted<B: Binding> {
    store: Arc<dyn DocumentStore>,
    doc: DocRef,
    snapshots: watch::Receiver<Snapshot>,
    binding: B,
}

impl<B: Binding> Mounted<B> {
    /// Subscribe to `doc`, show its current snapshot, and perform any
    /// write the binding asks for on mount (such as a default write-back).
    pub async fn mount(store: Arc<dyn DocumentStore>, doc: DocRef, binding: B) -> Self {
        let snapshots = store.subscribe(&doc);
        tracing::debug!(%doc, policy = ?B::POLICY, "mounting binding");
        let mut mounted = Self {
            store,
            doc,
            snapshots,
            binding,
        };
        let step = mounted.apply_latest();
        mounted.drive(step).await;
        mounted
    }

    pub fn doc(&self) -> &DocRef {
        &self.doc
    }

    pub fn binding(&self) -> &B {
        &self.binding
    }

    pub fn binding_mut(&mut self) -> &mut B {
        &mut self.binding
    }

    pub fn view(&self) -> B::View {
        self.binding.view()
    }

    /// Feed a gesture and perform the write it triggers, if any.
    ///
    /// Returns the final step: the settle step when a write was made,
    /// otherwise the gesture's own step.
    pub async fn gesture(&mut self, gesture: B::Gesture) -> Step {
        let step = self.binding.handle(Event::Gesture(gesture));
        self.drive(step).await
    }

    /// Apply a pending snapshot, if one has arrived.
    pub async fn refresh(&mut self) -> Option<Step> {
        if !self.snapshots.has_changed().unwrap_or(false) {
            return None;
        }
        let step = self.apply_latest();
        Some(self.drive(step).await)
    }

    /// Wait for the next snapshot and apply it. `None` once the store has
    /// dropped the subscription.
    pub async fn changed(&mut self) -> Option<Step> {
        self.snapshots.changed().await.ok()?;
        let step = self.apply_latest();
        Some(self.drive(step).await)
    }

    fn apply_latest(&mut self) -> Step {
        let snapshot = self.snapshots.borrow_and_update().clone();
        self.binding.handle(Event::Remote(snapshot))
    }

    /// Perform the step's writes and settle them, repeating while the
    /// binding asks for more.
    async fn drive(&mut self, mut step: Step) -> Step {
        while step.has_writes() {
            let writes = std::mem::take(&mut step.writes);
            let outcome = self.write(writes).await;
            step = self.binding.handle(Event::Settled(outcome));

            if self.snapshots.has_changed().unwrap_or(false) {
                let next = self.apply_latest();
                if next.has_writes() {
                    step = next;
                }
            }
        }
        step
    }

    async fn write(&mut self, writes: Vec<FieldWrite>) -> Result<(), Error> {
        let store = self.store.clone();
        let doc = self.doc.clone();
        let write = async move {
            for FieldWrite { path, value } in writes {
                store.write_field(&doc, &path, value).await?;
            }
            Ok::<(), Error>(())
        };
        tokio::pin!(write);

        let mut open = true;
        loop {
            tokio::select! {
                outcome = &mut write => return outcome,
                changed = self.snapshots.changed(), if open => {
                    match changed {
                        Ok(()) => {
                            let _ = self.apply_latest();
                        }
                        Err(_) => open = false,
                    }
                }
            }
        }
    }
}
