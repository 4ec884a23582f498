//! The binding contract shared by every control.
//!
//! A binding is a state machine fed with three kinds of events: remote
//! snapshots, user gestures, and the outcome of its own write. Each event
//! yields a `Step` describing where the machine ended up and which field
//! writes, if any, the caller should now perform. Nothing here touches a
//! store; see `Mounted` for the async glue.

use docbind_core_store::{Error, FieldPath, Snapshot, Value};

use crate::runner::ActionRunner;

/// Phase of a binding's state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Display mirrors the remote value.
    Viewing,
    /// A local buffer is displayed; remote updates are suppressed.
    Editing,
    /// The buffer is being written; remote updates are suppressed.
    Submitting,
}

/// What happened during a transition.
#[derive(Clone, Debug, PartialEq)]
pub enum Notice {
    /// Display recomputed from a new remote value.
    Resynced,
    /// A remote value was recorded but not displayed.
    Suppressed,
    /// Nothing to do.
    Idle,
    /// An edit session started.
    Editing,
    /// The buffer changed locally.
    Changed,
    /// A gesture arrived while a write is in flight and was ignored.
    Busy,
    /// The buffer failed validation; nothing was written.
    Invalid,
    /// The buffer equals the remote value; nothing was written.
    Unchanged,
    /// The buffer was discarded.
    Reverted,
    /// A write of the buffer was issued.
    Committed,
    /// A computed default is being written back for an absent field.
    Healing,
    /// The write succeeded.
    Saved,
    /// The write failed.
    WriteFailed(Error),
}

/// One field write a step asks for.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldWrite {
    pub path: FieldPath,
    pub value: Value,
}

/// Result of handling one event.
#[derive(Clone, Debug, PartialEq)]
#[must_use]
pub struct Step {
    pub phase: Phase,
    pub notice: Notice,
    /// Writes to perform, in order, as a single action. Empty for most steps.
    pub writes: Vec<FieldWrite>,
}

impl Step {
    pub fn new(phase: Phase, notice: Notice) -> Self {
        Self {
            phase,
            notice,
            writes: Vec::new(),
        }
    }

    pub fn with_writes(mut self, writes: Vec<FieldWrite>) -> Self {
        self.writes = writes;
        self
    }

    pub fn has_writes(&self) -> bool {
        !self.writes.is_empty()
    }
}

/// Inputs to a binding.
#[derive(Clone, Debug)]
pub enum Event<G> {
    Remote(Snapshot),
    Gesture(G),
    Settled(Result<(), Error>),
}

/// Gesture classes that can turn a local value into a write.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Trigger {
    /// The value was changed (clicked, picked, typed).
    Change,
    /// A drag ended.
    Release,
    /// The confirm key was pressed.
    Confirm,
}

/// When a control's local value becomes a write.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CommitPolicy {
    /// Two-valued controls: every change is written, display stays remote.
    Immediate,
    /// Drag controls: positions are local until release.
    OnRelease,
    /// Text: edits are buffered until confirmed.
    OnConfirm,
    /// Transformed fields: every change is written, with derived defaults.
    OnChange,
}

impl CommitPolicy {
    pub fn commits_on(self, trigger: Trigger) -> bool {
        match self {
            CommitPolicy::Immediate | CommitPolicy::OnChange => trigger == Trigger::Change,
            CommitPolicy::OnRelease => trigger == Trigger::Release,
            CommitPolicy::OnConfirm => trigger == Trigger::Confirm,
        }
    }
}

/// A control bound to a remote field.
pub trait Binding {
    type Gesture;
    type View;

    const POLICY: CommitPolicy;

    fn observe(&mut self, snapshot: &Snapshot) -> Step;

    fn gesture(&mut self, gesture: Self::Gesture) -> Step;

    fn settle(&mut self, outcome: Result<(), Error>) -> Step;

    fn phase(&self) -> Phase;

    fn view(&self) -> Self::View;

    fn runner(&self) -> &ActionRunner;

    fn clear_error(&mut self);

    fn handle(&mut self, event: Event<Self::Gesture>) -> Step {
        match event {
            Event::Remote(snapshot) => self.observe(&snapshot),
            Event::Gesture(gesture) => self.gesture(gesture),
            Event::Settled(outcome) => self.settle(outcome),
        }
    }
}
