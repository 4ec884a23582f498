//! The field binding state machine.
//!
//! `FieldBinding` is the engine every widget adapter wraps. It records the
//! latest remote value on every snapshot, whatever its phase, and derives
//! the display on demand: from the remote value while viewing, from the
//! local buffer otherwise. Both invariants follow from that split: a
//! viewing binding cannot show a stale remote value, and a snapshot can
//! never overwrite a buffer.

use docbind_core_store::{Error, FieldPath, Snapshot, Value};

use crate::binding::{Notice, Phase, Step};
use crate::locator::Locator;
use crate::runner::ActionRunner;
use crate::transform::ValueTransform;

/// How a failed write is unwound.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Origin {
    /// Back to editing with the buffer kept, so the user can retry.
    Buffered,
    /// Back to viewing; the control has no edit state to return to.
    Direct,
}

#[derive(Clone, Debug)]
enum State<D> {
    Viewing,
    Editing(D),
    Submitting { buffer: D, origin: Origin },
}

pub struct FieldBinding<T: ValueTransform, L = FieldPath> {
    locator: L,
    transform: T,
    remote: Option<Value>,
    state: State<T::Display>,
    runner: ActionRunner,
}

impl<T: ValueTransform, L: Locator> FieldBinding<T, L> {
    pub fn new(locator: L, transform: T) -> Self {
        Self {
            locator,
            transform,
            remote: None,
            state: State::Viewing,
            runner: ActionRunner::new(),
        }
    }

    pub fn locator(&self) -> &L {
        &self.locator
    }

    pub fn transform(&self) -> &T {
        &self.transform
    }

    pub fn transform_mut(&mut self) -> &mut T {
        &mut self.transform
    }

    pub fn runner(&self) -> &ActionRunner {
        &self.runner
    }

    pub fn clear_error(&mut self) {
        self.runner.clear_error();
    }

    pub fn phase(&self) -> Phase {
        match self.state {
            State::Viewing => Phase::Viewing,
            State::Editing(_) => Phase::Editing,
            State::Submitting { .. } => Phase::Submitting,
        }
    }

    /// Latest stored value, recorded even while suppressed.
    pub fn remote(&self) -> Option<&Value> {
        self.remote.as_ref()
    }

    /// The latest stored value as it would be displayed.
    pub fn remote_display(&self) -> T::Display {
        self.transform.to_display(self.remote.as_ref())
    }

    /// Local buffer while editing or submitting.
    pub fn buffer(&self) -> Option<&T::Display> {
        match &self.state {
            State::Viewing => None,
            State::Editing(buffer) | State::Submitting { buffer, .. } => Some(buffer),
        }
    }

    pub fn display(&self) -> T::Display {
        match self.buffer() {
            Some(buffer) => buffer.clone(),
            None => self.remote_display(),
        }
    }

    /// Buffer differs from what the remote value displays as.
    pub fn is_dirty(&self) -> bool {
        self.buffer()
            .is_some_and(|buffer| *buffer != self.remote_display())
    }

    fn step(&self, notice: Notice) -> Step {
        Step::new(self.phase(), notice)
    }

    pub fn observe(&mut self, snapshot: &Snapshot) -> Step {
        self.remote = self.locator.read(snapshot);
        match self.state {
            State::Viewing => self.step(Notice::Resynced),
            _ => {
                tracing::trace!(
                    field = %self.locator,
                    version = snapshot.version(),
                    "remote update suppressed"
                );
                self.step(Notice::Suppressed)
            }
        }
    }

    /// Start an edit session seeded from the current display.
    pub fn begin_edit(&mut self) -> Step {
        match self.state {
            State::Viewing => {
                self.state = State::Editing(self.remote_display());
                self.step(Notice::Editing)
            }
            State::Editing(_) => self.step(Notice::Idle),
            State::Submitting { .. } => self.step(Notice::Busy),
        }
    }

    /// Replace the buffer, starting an edit session if needed.
    pub fn change(&mut self, value: T::Display) -> Step {
        match &mut self.state {
            State::Submitting { .. } => self.step(Notice::Busy),
            State::Editing(buffer) => {
                *buffer = value;
                self.step(Notice::Changed)
            }
            State::Viewing => {
                self.state = State::Editing(value);
                self.step(Notice::Changed)
            }
        }
    }

    /// Write the buffer if `valid` and different from the remote value.
    pub fn commit(&mut self, valid: bool) -> Step {
        let buffer = match &self.state {
            State::Editing(buffer) => buffer.clone(),
            State::Viewing => return self.step(Notice::Idle),
            State::Submitting { .. } => return self.step(Notice::Busy),
        };
        if !valid {
            return self.step(Notice::Invalid);
        }
        if buffer == self.remote_display() {
            return self.step(Notice::Unchanged);
        }
        self.submit(buffer, Origin::Buffered, Notice::Committed)
    }

    /// Write `value` straight away, without an edit session.
    ///
    /// Used by controls that have no editing phase. A value equal to the
    /// remote one leaves the binding viewing with no write.
    pub fn commit_now(&mut self, value: T::Display) -> Step {
        self.commit_direct(value, Notice::Committed)
    }

    /// Write back a computed default for an absent field.
    pub fn heal(&mut self, value: T::Display) -> Step {
        self.commit_direct(value, Notice::Healing)
    }

    fn commit_direct(&mut self, value: T::Display, notice: Notice) -> Step {
        if let State::Submitting { .. } = self.state {
            return self.step(Notice::Busy);
        }
        // A heal writes the displayed default, so only user values are
        // compared with the display.
        let step = if notice != Notice::Healing && value == self.remote_display() {
            self.step(Notice::Unchanged)
        } else {
            self.submit(value, Origin::Direct, notice)
        };
        if step.notice == Notice::Unchanged {
            self.state = State::Viewing;
            return self.step(Notice::Unchanged);
        }
        step
    }

    fn submit(&mut self, buffer: T::Display, origin: Origin, notice: Notice) -> Step {
        let next = self.transform.to_stored(&buffer);
        let writes = self.locator.writes(&next, self.remote.as_ref());
        if writes.is_empty() {
            return self.step(Notice::Unchanged);
        }
        if !self.runner.begin() {
            return self.step(Notice::Busy);
        }

        tracing::debug!(field = %self.locator, writes = writes.len(), ?notice, "committing");
        self.state = State::Submitting { buffer, origin };
        self.step(notice).with_writes(writes)
    }

    /// Discard the buffer and show the current remote value.
    pub fn revert(&mut self) -> Step {
        match self.state {
            State::Editing(_) => {
                self.state = State::Viewing;
                self.step(Notice::Reverted)
            }
            State::Viewing => self.step(Notice::Idle),
            State::Submitting { .. } => self.step(Notice::Busy),
        }
    }

    /// Feed the outcome of the write issued by the last committing step.
    pub fn settle(&mut self, outcome: Result<(), Error>) -> Step {
        let (buffer, origin) = match std::mem::replace(&mut self.state, State::Viewing) {
            State::Submitting { buffer, origin } => (buffer, origin),
            other => {
                self.state = other;
                return self.step(Notice::Idle);
            }
        };

        match outcome {
            Ok(()) => {
                self.runner.settle(Ok(()));
                tracing::debug!(field = %self.locator, "write settled");
                self.step(Notice::Saved)
            }
            Err(error) => {
                self.runner.settle(Err(error.clone()));
                if origin == Origin::Buffered {
                    self.state = State::Editing(buffer);
                }
                self.step(Notice::WriteFailed(error))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::Text;
    use docbind_core_store::{field, DocRef};

    fn snap(version: u64, name: Option<&str>) -> Snapshot {
        let mut data = Value::map();
        if let Some(name) = name {
            data.set(&field!("name"), Value::from(name)).unwrap();
        }
        Snapshot::new(DocRef::new("clients", "alice"), version, data)
    }

    fn binding(name: &str) -> FieldBinding<Text> {
        let mut binding = FieldBinding::new(field!("name"), Text);
        let _ = binding.observe(&snap(1, Some(name)));
        binding
    }

    #[test]
    fn viewing_tracks_remote() {
        let mut b = binding("Alice");
        assert_eq!(b.display(), "Alice");
        for (v, name) in [(2, "Bob"), (3, "Carol"), (4, "")] {
            let step = b.observe(&snap(v, Some(name)));
            assert_eq!(step.notice, Notice::Resynced);
            assert_eq!(b.display(), name);
        }
        let _ = b.observe(&snap(5, None));
        assert_eq!(b.display(), "");
    }

    #[test]
    fn editing_suppresses_remote() {
        let mut b = binding("Alice");
        assert_eq!(b.begin_edit().phase, Phase::Editing);
        assert_eq!(b.buffer().map(String::as_str), Some("Alice"));

        let _ = b.change("Bob".into());
        let step = b.observe(&snap(2, Some("Carol")));
        assert_eq!(step.notice, Notice::Suppressed);
        assert_eq!(b.display(), "Bob");
        assert_eq!(b.remote(), Some(&Value::from("Carol")));
        assert!(b.is_dirty());
    }

    #[test]
    fn commit_issues_write_and_suppresses_until_settled() {
        let mut b = binding("Alice");
        let _ = b.change("Bob".into());
        let step = b.commit(true);
        assert_eq!(step.phase, Phase::Submitting);
        assert_eq!(step.notice, Notice::Committed);
        assert_eq!(step.writes[0].value, Value::from("Bob"));
        assert!(b.runner().is_running());

        assert_eq!(b.observe(&snap(2, Some("Carol"))).notice, Notice::Suppressed);
        assert_eq!(b.display(), "Bob");
        assert_eq!(b.change("Dave".into()).notice, Notice::Busy);
        assert_eq!(b.revert().notice, Notice::Busy);

        let _ = b.observe(&snap(3, Some("Bob")));
        let step = b.settle(Ok(()));
        assert_eq!(step.phase, Phase::Viewing);
        assert_eq!(step.notice, Notice::Saved);
        assert_eq!(b.display(), "Bob");
    }

    #[test]
    fn commit_guard() {
        let mut b = binding("Alice");
        let _ = b.begin_edit();
        let step = b.commit(true);
        assert_eq!(step.notice, Notice::Unchanged);
        assert_eq!(step.phase, Phase::Editing);
        assert!(!step.has_writes());

        let _ = b.change(String::new());
        let step = b.commit(false);
        assert_eq!(step.notice, Notice::Invalid);
        assert!(!step.has_writes());
        assert!(!b.runner().is_running());
    }

    #[test]
    fn revert_restores_remote() {
        let mut b = binding("Alice");
        assert_eq!(b.revert().notice, Notice::Idle);
        assert_eq!(b.display(), "Alice");

        let _ = b.change(String::new());
        let step = b.revert();
        assert_eq!(step.phase, Phase::Viewing);
        assert_eq!(step.notice, Notice::Reverted);
        assert_eq!(b.display(), "Alice");
        assert_eq!(b.revert().notice, Notice::Idle);
    }

    #[test]
    fn failed_write_returns_to_editing() {
        let mut b = binding("Alice");
        let _ = b.change("Bob".into());
        let _ = b.commit(true);
        let step = b.settle(Err(Error::rejected("denied")));
        assert_eq!(step.phase, Phase::Editing);
        assert_eq!(step.notice, Notice::WriteFailed(Error::rejected("denied")));
        assert_eq!(b.display(), "Bob");
        assert_eq!(b.runner().error(), Some(&Error::rejected("denied")));

        // Retry succeeds and clears the slot.
        assert!(b.commit(true).has_writes());
        let _ = b.settle(Ok(()));
        assert_eq!(b.runner().error(), None);
    }

    #[test]
    fn direct_commits_skip_editing() {
        let mut b = binding("Alice");
        let step = b.commit_now("Alice".into());
        assert_eq!(step.notice, Notice::Unchanged);
        assert_eq!(step.phase, Phase::Viewing);

        let step = b.commit_now("Bob".into());
        assert_eq!(step.phase, Phase::Submitting);
        assert_eq!(b.commit_now("Carol".into()).notice, Notice::Busy);

        let step = b.settle(Err(Error::transport("offline")));
        assert_eq!(step.phase, Phase::Viewing);
        assert_eq!(b.display(), "Alice");
    }

    #[test]
    fn numeric_remote_shown_as_text_is_unchanged() {
        let mut data = Value::map();
        data.set(&field!("zip"), Value::Integer(5)).unwrap();
        let mut b = FieldBinding::new(field!("zip"), Text);
        let _ = b.observe(&Snapshot::new(DocRef::new("clients", "alice"), 1, data));

        let _ = b.begin_edit();
        assert!(!b.is_dirty());
        let step = b.commit(true);
        assert_eq!(step.notice, Notice::Unchanged);
        assert!(!step.has_writes());
        assert!(!b.runner().is_running());

        assert_eq!(b.commit_now("5".into()).notice, Notice::Unchanged);
        assert_eq!(b.phase(), Phase::Viewing);
    }

    #[test]
    fn heal_writes_even_when_display_matches() {
        let mut b = FieldBinding::new(field!("name"), Text);
        let _ = b.observe(&snap(1, None));
        let step = b.heal(String::new());
        assert_eq!(step.notice, Notice::Healing);
        assert_eq!(step.writes[0].value, Value::from(""));
    }

    #[test]
    fn stray_settle_is_ignored() {
        let mut b = binding("Alice");
        assert_eq!(b.settle(Ok(())).notice, Notice::Idle);
        let _ = b.begin_edit();
        assert_eq!(b.settle(Ok(())).phase, Phase::Editing);
    }
}
