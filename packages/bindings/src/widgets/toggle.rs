//! Switch and checkbox controls.

use docbind_core_store::{Error, FieldPath, Snapshot};

use super::{change, error_text};
use crate::binding::{Binding, CommitPolicy, Notice, Phase, Step};
use crate::field::FieldBinding;
use crate::runner::ActionRunner;
use crate::transform::Boolean;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToggleKind {
    Switch,
    Checkbox,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToggleGesture {
    /// Flip the displayed state.
    Click,
    /// Set an explicit state.
    Set(bool),
}

#[derive(Clone, Debug, PartialEq)]
pub struct ToggleView {
    pub kind: ToggleKind,
    pub checked: bool,
    pub disabled: bool,
    pub error: Option<String>,
}

/// Immediate-commit boolean control.
///
/// The checked state always shows the remote value. A click writes the
/// new value and disables the control until the write settles; a
/// concurrent external change simply becomes the next displayed value.
pub struct Toggle {
    kind: ToggleKind,
    binding: FieldBinding<Boolean>,
}

impl Toggle {
    pub fn new(kind: ToggleKind, path: FieldPath) -> Self {
        Self {
            kind,
            binding: FieldBinding::new(path, Boolean),
        }
    }

    pub fn switch(path: FieldPath) -> Self {
        Self::new(ToggleKind::Switch, path)
    }

    pub fn checkbox(path: FieldPath) -> Self {
        Self::new(ToggleKind::Checkbox, path)
    }

    pub fn checked(&self) -> bool {
        self.binding.remote_display()
    }
}

impl Binding for Toggle {
    type Gesture = ToggleGesture;
    type View = ToggleView;

    const POLICY: CommitPolicy = CommitPolicy::Immediate;

    fn observe(&mut self, snapshot: &Snapshot) -> Step {
        let step = self.binding.observe(snapshot);
        if step.notice == Notice::Suppressed {
            // The display is the remote value even mid-write.
            return Step::new(step.phase, Notice::Resynced);
        }
        step
    }

    fn gesture(&mut self, gesture: ToggleGesture) -> Step {
        if self.binding.runner().is_running() {
            return Step::new(self.phase(), Notice::Busy);
        }
        let next = match gesture {
            ToggleGesture::Click => !self.checked(),
            ToggleGesture::Set(value) => value,
        };
        change(Self::POLICY, &mut self.binding, next)
    }

    fn settle(&mut self, outcome: Result<(), Error>) -> Step {
        self.binding.settle(outcome)
    }

    fn phase(&self) -> Phase {
        self.binding.phase()
    }

    fn view(&self) -> ToggleView {
        ToggleView {
            kind: self.kind,
            checked: self.checked(),
            disabled: self.binding.runner().is_running(),
            error: error_text(&self.binding),
        }
    }

    fn runner(&self) -> &ActionRunner {
        self.binding.runner()
    }

    fn clear_error(&mut self) {
        self.binding.clear_error();
    }
}
