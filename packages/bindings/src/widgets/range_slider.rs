//! Dual-thumb range slider.

use docbind_core_store::{Error, FieldPath, Snapshot, Value};

use super::{change, error_text, release};
use crate::binding::{Binding, CommitPolicy, Phase, Step};
use crate::error::ConfigError;
use crate::field::FieldBinding;
use crate::locator::SplitRange;
use crate::runner::ActionRunner;
use crate::transform::ValueTransform;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Thumb {
    Start,
    End,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RangeGesture {
    Drag { thumb: Thumb, index: f64 },
    Release,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RangeSliderView {
    pub start: f64,
    pub end: f64,
    pub min: f64,
    pub max: f64,
    pub dragging: bool,
    pub disabled: bool,
    pub error: Option<String>,
}

/// `[start, end]` pairs over a split range.
///
/// A missing end sits at `max`. A missing start, and any start when no
/// start path is configured, sits at `aux_start`.
#[derive(Clone, Copy, Debug)]
struct RangePair {
    min: f64,
    max: f64,
    aux_start: f64,
}

impl ValueTransform for RangePair {
    type Display = [f64; 2];

    fn to_display(&self, stored: Option<&Value>) -> [f64; 2] {
        let items = stored.and_then(Value::as_array).unwrap_or(&[]);
        let side = |index: usize| items.get(index).and_then(Value::as_f64);
        [
            side(0).unwrap_or(self.aux_start),
            side(1).unwrap_or(self.max),
        ]
    }

    fn to_stored(&self, display: &[f64; 2]) -> Value {
        Value::Array(vec![Value::number(display[0]), Value::number(display[1])])
    }
}

/// Drag-and-commit slider over a start/end pair.
///
/// The dragged thumb is clamped against the held one so that the thumbs
/// stay at least `min_distance` apart. On release, only the sides that
/// changed are written, as one action.
pub struct RangeSlider {
    binding: FieldBinding<RangePair, SplitRange>,
    min_distance: f64,
}

impl RangeSlider {
    /// Range over `end` and, optionally, a persisted `start`.
    pub fn new(
        start: Option<FieldPath>,
        end: FieldPath,
        min: f64,
        max: f64,
        min_distance: f64,
    ) -> Result<Self, ConfigError> {
        if !(min.is_finite() && max.is_finite() && min_distance.is_finite())
            || min > max
            || min_distance < 0.0
        {
            return Err(ConfigError::InvalidBounds {
                message: format!(
                    "min {} max {} min_distance {} do not describe a range",
                    min, max, min_distance
                ),
            });
        }
        if max - min < min_distance {
            return Err(ConfigError::RangeTooNarrow {
                min,
                max,
                min_distance,
            });
        }
        Ok(Self {
            binding: FieldBinding::new(
                SplitRange { start, end },
                RangePair {
                    min,
                    max,
                    aux_start: min,
                },
            ),
            min_distance,
        })
    }

    /// The displayed `[start, end]` pair.
    pub fn pair(&self) -> [f64; 2] {
        self.binding.display()
    }

    fn drag(&mut self, thumb: Thumb, index: f64) -> Step {
        let bounds = *self.binding.transform();
        let index = index.clamp(bounds.min, bounds.max);
        let [start, end] = self.pair();
        let distance = self.min_distance;
        // The held thumb only moves when the track bound leaves no room.
        let next = match thumb {
            Thumb::Start => {
                let start = index.min(end - distance).max(bounds.min);
                [start, end.max(start + distance)]
            }
            Thumb::End => {
                let end = index.max(start + distance).min(bounds.max);
                [start.min(end - distance), end]
            }
        };
        change(Self::POLICY, &mut self.binding, next)
    }

    fn release(&mut self) -> Step {
        if self.binding.locator().start.is_none() {
            if let Some([start, _]) = self.binding.buffer().copied() {
                self.binding.transform_mut().aux_start = start;
            }
        }
        release(Self::POLICY, &mut self.binding)
    }
}

impl Binding for RangeSlider {
    type Gesture = RangeGesture;
    type View = RangeSliderView;

    const POLICY: CommitPolicy = CommitPolicy::OnRelease;

    fn observe(&mut self, snapshot: &Snapshot) -> Step {
        self.binding.observe(snapshot)
    }

    fn gesture(&mut self, gesture: RangeGesture) -> Step {
        match gesture {
            RangeGesture::Drag { thumb, index } => self.drag(thumb, index),
            RangeGesture::Release => self.release(),
        }
    }

    fn settle(&mut self, outcome: Result<(), Error>) -> Step {
        self.binding.settle(outcome)
    }

    fn phase(&self) -> Phase {
        self.binding.phase()
    }

    fn view(&self) -> RangeSliderView {
        let [start, end] = self.pair();
        let bounds = self.binding.transform();
        RangeSliderView {
            start,
            end,
            min: bounds.min,
            max: bounds.max,
            dragging: self.phase() == Phase::Editing,
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
