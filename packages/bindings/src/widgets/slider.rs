//! Single-thumb slider.

use docbind_core_store::{Error, FieldPath, Snapshot};

use super::{change, error_text, release};
use crate::binding::{Binding, CommitPolicy, Phase, Step};
use crate::error::ConfigError;
use crate::field::FieldBinding;
use crate::runner::ActionRunner;
use crate::transform::{ScaleFn, Scaled};

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SliderGesture {
    /// The thumb moved to `index`; nothing is written.
    Drag(f64),
    /// The thumb was let go; the current index is committed.
    Release,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SliderView {
    pub index: f64,
    /// `index` in stored units.
    pub value: f64,
    pub min: f64,
    pub max: f64,
    pub dragging: bool,
    pub disabled: bool,
    pub error: Option<String>,
}

/// Drag-and-commit slider over a numeric field.
///
/// A drag is an edit session: the thumb follows the pointer and remote
/// updates are recorded but not shown until the drag ends. On release
/// the index is scaled and written; the last user interaction wins over
/// any remote change that landed mid-drag.
pub struct Slider {
    binding: FieldBinding<Scaled>,
}

impl Slider {
    pub fn new(path: FieldPath, min: f64, max: f64) -> Result<Self, ConfigError> {
        if !(min.is_finite() && max.is_finite()) || min > max {
            return Err(ConfigError::InvalidBounds {
                message: format!("min {} must not exceed max {}", min, max),
            });
        }
        Ok(Self {
            binding: FieldBinding::new(path, Scaled::linear(min, max)),
        })
    }

    /// Store `scale(index)` instead of the index; `invert` maps stored
    /// values back to an index.
    pub fn with_scale(mut self, scale: ScaleFn, invert: ScaleFn) -> Self {
        let transform = self.binding.transform().clone().with_scale(scale, invert);
        *self.binding.transform_mut() = transform;
        self
    }

    pub fn index(&self) -> f64 {
        self.binding.display()
    }
}

impl Binding for Slider {
    type Gesture = SliderGesture;
    type View = SliderView;

    const POLICY: CommitPolicy = CommitPolicy::OnRelease;

    fn observe(&mut self, snapshot: &Snapshot) -> Step {
        self.binding.observe(snapshot)
    }

    fn gesture(&mut self, gesture: SliderGesture) -> Step {
        match gesture {
            SliderGesture::Drag(index) => {
                let index = self.binding.transform().clamp(index);
                change(Self::POLICY, &mut self.binding, index)
            }
            SliderGesture::Release => release(Self::POLICY, &mut self.binding),
        }
    }

    fn settle(&mut self, outcome: Result<(), Error>) -> Step {
        self.binding.settle(outcome)
    }

    fn phase(&self) -> Phase {
        self.binding.phase()
    }

    fn view(&self) -> SliderView {
        let transform = self.binding.transform();
        let index = self.index();
        SliderView {
            index,
            value: transform.scale(index),
            min: transform.min,
            max: transform.max,
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::Notice;
    use docbind_core_store::{field, DocRef, Value};
    use std::sync::Arc;

    fn snap(version: u64, volume: i64) -> Snapshot {
        let mut data = Value::map();
        data.set(&field!("volume"), Value::Integer(volume)).unwrap();
        Snapshot::new(DocRef::new("clients", "alice"), version, data)
    }

    #[test]
    fn drag_is_local_until_release() {
        let mut slider = Slider::new(field!("volume"), 0.0, 10.0).unwrap();
        let _ = slider.observe(&snap(1, 3));

        let step = slider.gesture(SliderGesture::Drag(7.0));
        assert!(!step.has_writes());
        assert_eq!(slider.view().index, 7.0);
        assert!(slider.view().dragging);

        let step = slider.gesture(SliderGesture::Release);
        assert_eq!(step.phase, Phase::Submitting);
        assert_eq!(step.writes[0].value, Value::Integer(7));
        assert!(slider.view().disabled);
    }

    #[test]
    fn remote_updates_suppressed_during_drag() {
        let mut slider = Slider::new(field!("volume"), 0.0, 10.0).unwrap();
        let _ = slider.observe(&snap(1, 3));
        let _ = slider.gesture(SliderGesture::Drag(6.0));

        assert_eq!(slider.observe(&snap(2, 9)).notice, Notice::Suppressed);
        assert_eq!(slider.index(), 6.0);

        // The release still writes the dragged position.
        let step = slider.gesture(SliderGesture::Release);
        assert_eq!(step.writes[0].value, Value::Integer(6));
    }

    #[test]
    fn release_at_remote_value_writes_nothing() {
        let mut slider = Slider::new(field!("volume"), 0.0, 10.0).unwrap();
        let _ = slider.observe(&snap(1, 3));
        let _ = slider.gesture(SliderGesture::Drag(8.0));
        let _ = slider.gesture(SliderGesture::Drag(3.0));

        let step = slider.gesture(SliderGesture::Release);
        assert_eq!(step.notice, Notice::Unchanged);
        assert_eq!(step.phase, Phase::Viewing);
        assert!(!step.has_writes());
    }

    #[test]
    fn float_remote_released_at_same_value_writes_nothing() {
        let mut data = Value::map();
        data.set(&field!("volume"), Value::Float(10.0)).unwrap();
        let mut slider = Slider::new(field!("volume"), 0.0, 100.0).unwrap();
        let _ = slider.observe(&Snapshot::new(DocRef::new("clients", "alice"), 1, data));

        let _ = slider.gesture(SliderGesture::Drag(20.0));
        let _ = slider.gesture(SliderGesture::Drag(10.0));
        let step = slider.gesture(SliderGesture::Release);
        assert_eq!(step.notice, Notice::Unchanged);
        assert_eq!(step.phase, Phase::Viewing);
        assert!(!step.has_writes());
    }

    #[test]
    fn drag_is_clamped_to_bounds() {
        let mut slider = Slider::new(field!("volume"), 0.0, 10.0).unwrap();
        let _ = slider.observe(&snap(1, 3));
        let _ = slider.gesture(SliderGesture::Drag(42.0));
        assert_eq!(slider.index(), 10.0);
        let _ = slider.gesture(SliderGesture::Drag(-1.0));
        assert_eq!(slider.index(), 0.0);
    }

    #[test]
    fn scaled_values_are_stored() {
        let mut slider = Slider::new(field!("volume"), 0.0, 4.0)
            .unwrap()
            .with_scale(Arc::new(|i| i * 25.0), Arc::new(|v| v / 25.0));
        let _ = slider.observe(&snap(1, 50));
        assert_eq!(slider.index(), 2.0);
        assert_eq!(slider.view().value, 50.0);

        let _ = slider.gesture(SliderGesture::Drag(3.0));
        let step = slider.gesture(SliderGesture::Release);
        assert_eq!(step.writes[0].value, Value::Integer(75));
    }

    #[test]
    fn bad_bounds_are_rejected() {
        assert!(matches!(
            Slider::new(field!("volume"), 5.0, 1.0),
            Err(ConfigError::InvalidBounds { .. })
        ));
    }

    #[test]
    fn failed_write_keeps_dragged_value() {
        let mut slider = Slider::new(field!("volume"), 0.0, 10.0).unwrap();
        let _ = slider.observe(&snap(1, 3));
        let _ = slider.gesture(SliderGesture::Drag(5.0));
        let _ = slider.gesture(SliderGesture::Release);

        let step = slider.settle(Err(Error::transport("offline")));
        assert_eq!(step.phase, Phase::Editing);
        assert_eq!(slider.index(), 5.0);
        assert!(slider.view().error.is_some());

        // Releasing again retries.
        assert!(slider.gesture(SliderGesture::Release).has_writes());
    }
}
