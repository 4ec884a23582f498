//! Edit-and-commit text field.

use docbind_core_store::{Error, FieldPath, Snapshot};

use super::{change, error_text, finish};
use crate::binding::{Binding, CommitPolicy, Notice, Phase, Step, Trigger};
use crate::config::KeyMap;
use crate::field::FieldBinding;
use crate::policy::{AcceptAll, FieldPolicy};
use crate::runner::ActionRunner;
use crate::transform::Text;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TextGesture {
    Focus,
    Input(String),
    /// A key press, named as in `KeyMap`.
    Key(String),
    Blur,
}

/// End adornment of a text field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Indicator {
    /// The shown value is the stored value.
    Clean,
    /// The shown value has not been saved.
    Dirty,
    Submitting,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TextView {
    pub value: String,
    pub disabled: bool,
    /// Validation failure of the shown value. Write failures go to `error`.
    pub invalid: bool,
    pub helper_text: Option<String>,
    pub indicator: Indicator,
    pub error: Option<String>,
}

/// Text field with explicit confirm and cancel.
///
/// Focus or typing starts an edit session. The confirm key writes the
/// buffer when the policy accepts it and it differs from the stored value;
/// the cancel key, or losing focus before confirming, discards it.
pub struct TextField<P = AcceptAll> {
    binding: FieldBinding<Text>,
    policy: P,
    keys: KeyMap,
}

impl TextField<AcceptAll> {
    pub fn new(path: FieldPath) -> Self {
        Self::with_policy(path, AcceptAll)
    }
}

impl<P: FieldPolicy> TextField<P> {
    pub fn with_policy(path: FieldPath, policy: P) -> Self {
        Self {
            binding: FieldBinding::new(path, Text),
            policy,
            keys: KeyMap::default(),
        }
    }

    pub fn with_keys(mut self, keys: KeyMap) -> Self {
        self.keys = keys;
        self
    }

    pub fn value(&self) -> String {
        self.binding.display()
    }

    pub fn indicator(&self) -> Indicator {
        match self.phase() {
            Phase::Submitting => Indicator::Submitting,
            _ if self.binding.is_dirty() => Indicator::Dirty,
            _ => Indicator::Clean,
        }
    }

    fn key(&mut self, key: &str) -> Step {
        if key == self.keys.confirm {
            let valid = match self.binding.buffer() {
                Some(buffer) => self.policy.validate(buffer),
                None => true,
            };
            finish(Self::POLICY, &mut self.binding, Trigger::Confirm, valid)
        } else if key == self.keys.cancel {
            self.binding.revert()
        } else {
            Step::new(self.phase(), Notice::Idle)
        }
    }
}

impl<P: FieldPolicy> Binding for TextField<P> {
    type Gesture = TextGesture;
    type View = TextView;

    const POLICY: CommitPolicy = CommitPolicy::OnConfirm;

    fn observe(&mut self, snapshot: &Snapshot) -> Step {
        self.binding.observe(snapshot)
    }

    fn gesture(&mut self, gesture: TextGesture) -> Step {
        match gesture {
            TextGesture::Focus => self.binding.begin_edit(),
            TextGesture::Input(text) => change(Self::POLICY, &mut self.binding, text),
            TextGesture::Key(key) => self.key(&key),
            TextGesture::Blur => match self.phase() {
                Phase::Editing => self.binding.revert(),
                phase => Step::new(phase, Notice::Idle),
            },
        }
    }

    fn settle(&mut self, outcome: Result<(), Error>) -> Step {
        self.binding.settle(outcome)
    }

    fn phase(&self) -> Phase {
        self.binding.phase()
    }

    fn view(&self) -> TextView {
        let value = self.value();
        let valid = self.policy.validate(&value);
        TextView {
            helper_text: self.policy.describe(&value, valid),
            invalid: !valid,
            value,
            disabled: self.binding.runner().is_running(),
            indicator: self.indicator(),
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
