//! Hour-of-day picker.

use chrono::{NaiveDateTime, NaiveTime, Timelike};

use docbind_core_store::{Error, FieldPath, Snapshot};

use super::{change, error_text};
use crate::binding::{Binding, CommitPolicy, Notice, Phase, Step};
use crate::config::BindingDefaults;
use crate::field::FieldBinding;
use crate::runner::ActionRunner;
use crate::transform::HourOfDay;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimeGesture {
    /// A time was picked; `None` when the picker was cleared.
    Pick(Option<NaiveTime>),
}

#[derive(Clone, Debug, PartialEq)]
pub struct TimeFieldView {
    pub value: NaiveDateTime,
    pub disabled: bool,
    pub error: Option<String>,
}

/// Time picker over a stored hour. Picks are written at once; only the
/// hour is kept.
pub struct TimeField {
    binding: FieldBinding<HourOfDay>,
}

impl TimeField {
    pub fn new(path: FieldPath, defaults: &BindingDefaults) -> Self {
        Self {
            binding: FieldBinding::new(
                path,
                HourOfDay {
                    reference: defaults.reference_time,
                },
            ),
        }
    }

    pub fn value(&self) -> NaiveDateTime {
        self.binding.display()
    }
}

impl Binding for TimeField {
    type Gesture = TimeGesture;
    type View = TimeFieldView;

    const POLICY: CommitPolicy = CommitPolicy::OnChange;

    fn observe(&mut self, snapshot: &Snapshot) -> Step {
        self.binding.observe(snapshot)
    }

    fn gesture(&mut self, gesture: TimeGesture) -> Step {
        let TimeGesture::Pick(picked) = gesture;
        match picked {
            Some(time) => {
                let value = self.binding.transform().at_hour(time.hour());
                change(Self::POLICY, &mut self.binding, value)
            }
            None => Step::new(self.phase(), Notice::Idle),
        }
    }

    fn settle(&mut self, outcome: Result<(), Error>) -> Step {
        self.binding.settle(outcome)
    }

    fn phase(&self) -> Phase {
        self.binding.phase()
    }

    fn view(&self) -> TimeFieldView {
        TimeFieldView {
            value: self.value(),
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
