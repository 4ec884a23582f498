//! Time window field with a self-healing default.

use chrono::NaiveTime;

use docbind_core_store::{Error, FieldPath, Snapshot};

use super::{change, error_text};
use crate::binding::{Binding, CommitPolicy, Notice, Phase, Step};
use crate::config::BindingDefaults;
use crate::error::ConfigError;
use crate::field::FieldBinding;
use crate::runner::ActionRunner;
use crate::transform::{truncate_to_minute, MinutesWindow, TimeWindow};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimeRangeGesture {
    /// New window; a cleared side takes its default.
    Change {
        start: Option<NaiveTime>,
        end: Option<NaiveTime>,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub struct TimeRangeView {
    pub window: TimeWindow,
    pub disabled: bool,
    pub error: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Heal {
    /// No default written back yet.
    Pending,
    /// A write-back is in flight.
    InFlight,
    /// A write-back succeeded; never heal again.
    Done,
}

/// Window of the day stored as `[startMinutes, endMinutes]`.
///
/// When the field is absent the default window is shown and written back
/// once, so the document converges to a populated schema. A failed
/// write-back is retried on the next snapshot that still lacks the field.
pub struct TimeRangeField {
    binding: FieldBinding<MinutesWindow>,
    heal: Heal,
}

impl TimeRangeField {
    pub fn new(path: FieldPath, defaults: &BindingDefaults) -> Result<Self, ConfigError> {
        Ok(Self::with_window(path, defaults.alert_window()?))
    }

    pub fn with_window(path: FieldPath, defaults: TimeWindow) -> Self {
        Self {
            binding: FieldBinding::new(path, MinutesWindow { defaults }),
            heal: Heal::Pending,
        }
    }

    pub fn window(&self) -> TimeWindow {
        self.binding.display()
    }

    fn defaults(&self) -> TimeWindow {
        self.binding.transform().defaults
    }
}

impl Binding for TimeRangeField {
    type Gesture = TimeRangeGesture;
    type View = TimeRangeView;

    const POLICY: CommitPolicy = CommitPolicy::OnChange;

    fn observe(&mut self, snapshot: &Snapshot) -> Step {
        let step = self.binding.observe(snapshot);
        let absent = snapshot.exists() && self.binding.remote().is_none();
        if step.phase != Phase::Viewing || !absent || self.heal != Heal::Pending {
            return step;
        }

        let step = self.binding.heal(self.defaults());
        if step.has_writes() {
            tracing::debug!(field = %self.binding.locator(), "writing back default window");
            self.heal = Heal::InFlight;
        }
        step
    }

    fn gesture(&mut self, gesture: TimeRangeGesture) -> Step {
        let TimeRangeGesture::Change { start, end } = gesture;
        let defaults = self.defaults();
        let window = TimeWindow {
            start: start.map(truncate_to_minute).unwrap_or(defaults.start),
            end: end.map(truncate_to_minute).unwrap_or(defaults.end),
        };
        change(Self::POLICY, &mut self.binding, window)
    }

    fn settle(&mut self, outcome: Result<(), Error>) -> Step {
        let healed = outcome.is_ok();
        let step = self.binding.settle(outcome);
        if self.heal == Heal::InFlight {
            self.heal = if healed { Heal::Done } else { Heal::Pending };
        } else if healed && step.notice == Notice::Saved {
            // A user write also populates the field.
            self.heal = Heal::Done;
        }
        step
    }

    fn phase(&self) -> Phase {
        self.binding.phase()
    }

    fn view(&self) -> TimeRangeView {
        TimeRangeView {
            window: self.window(),
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
