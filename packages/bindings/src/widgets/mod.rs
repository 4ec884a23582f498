//! Widget adapters.
//!
//! Each adapter wraps a `FieldBinding` with the commit policy of its
//! control family, turns gestures into binding operations, and renders
//! the binding into a plain view model.

mod range_slider;
mod select;
mod slider;
mod text_field;
mod time_field;
mod time_range;
mod toggle;

pub use range_slider::{RangeGesture, RangeSlider, RangeSliderView, Thumb};
pub use select::{environment_zone, SelectGesture, SelectView, Selector, ZoneOption};
pub use slider::{Slider, SliderGesture, SliderView};
pub use text_field::{Indicator, TextField, TextGesture, TextView};
pub use time_field::{TimeField, TimeFieldView, TimeGesture};
pub use time_range::{TimeRangeField, TimeRangeGesture, TimeRangeView};
pub use toggle::{Toggle, ToggleGesture, ToggleKind, ToggleView};

use crate::binding::{CommitPolicy, Notice, Phase, Step, Trigger};
use crate::field::FieldBinding;
use crate::locator::Locator;
use crate::transform::ValueTransform;

/// A value the user picked, typed or dragged to. Policies that commit on
/// change write it at once; the others keep it as the edit buffer.
fn change<T: ValueTransform, L: Locator>(
    policy: CommitPolicy,
    binding: &mut FieldBinding<T, L>,
    value: T::Display,
) -> Step {
    if policy.commits_on(Trigger::Change) {
        binding.commit_now(value)
    } else {
        binding.change(value)
    }
}

/// Commit the buffer if `policy` commits on `trigger`.
fn finish<T: ValueTransform, L: Locator>(
    policy: CommitPolicy,
    binding: &mut FieldBinding<T, L>,
    trigger: Trigger,
    valid: bool,
) -> Step {
    if !policy.commits_on(trigger) {
        return Step::new(binding.phase(), Notice::Idle);
    }
    binding.commit(valid)
}

/// End a drag: commit the dragged value, or drop back to viewing if it
/// matches the remote value.
fn release<T: ValueTransform, L: Locator>(
    policy: CommitPolicy,
    binding: &mut FieldBinding<T, L>,
) -> Step {
    let step = finish(policy, binding, Trigger::Release, true);
    if step.notice == Notice::Unchanged {
        let _ = binding.revert();
        return Step::new(Phase::Viewing, Notice::Unchanged);
    }
    step
}

fn error_text<T: ValueTransform, L: Locator>(binding: &FieldBinding<T, L>) -> Option<String> {
    binding.runner().error().map(ToString::to_string)
}
