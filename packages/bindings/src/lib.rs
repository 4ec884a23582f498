//! Optimistic field bindings for docbind.
//!
//! Console controls read their value from a remote document that can
//! change under them at any time, and write back asynchronously. This
//! crate keeps each control's displayed value consistent with the
//! document without losing edits, flickering, or double-submitting:
//!
//! - `ActionRunner`: one in-flight write and its last error
//! - `ValueTransform`: stored value to displayed value and back
//! - `FieldPolicy`: validation and helper text for text input
//! - `FieldBinding`: the Viewing / Editing / Submitting state machine
//! - Widget adapters: toggle, checkbox, slider, range slider, text field,
//!   time field, time range, selector
//! - `Mounted`: drives a binding against a live `DocumentStore`
//!
//! # Example
//!
//! ```rust
//! use docbind_bindings::{Binding, Phase, Toggle, ToggleGesture};
//! use docbind_core_store::{field, DocRef, Snapshot, Value};
//!
//! let mut data = Value::map();
//! data.set(&field!("enabled"), Value::Bool(false)).unwrap();
//! let snapshot = Snapshot::new(DocRef::new("clients", "alice"), 1, data);
//!
//! let mut toggle = Toggle::switch(field!("enabled"));
//! let _ = toggle.observe(&snapshot);
//!
//! let step = toggle.gesture(ToggleGesture::Click);
//! assert_eq!(step.phase, Phase::Submitting);
//! assert_eq!(step.writes[0].value, Value::Bool(true));
//! ```

mod binding;
mod config;
mod driver;
mod error;
mod field;
mod locator;
mod policy;
mod runner;
mod transform;
mod widgets;

pub use binding::{Binding, CommitPolicy, Event, FieldWrite, Notice, Phase, Step, Trigger};
pub use config::{
    BindingDefaults, KeyMap, DEFAULT_ALERT_END_MINUTES, DEFAULT_ALERT_START_MINUTES,
    FALLBACK_ZONE,
};
pub use driver::Mounted;
pub use error::ConfigError;
pub use field::FieldBinding;
pub use locator::{Locator, SplitRange};
pub use policy::{AcceptAll, EmailAddress, FieldPolicy, IntegerText, NonEmpty, PhoneNumber, Rules};
pub use runner::ActionRunner;
pub use transform::{
    minutes_from_midnight, time_from_minutes, truncate_to_minute, Boolean, HourOfDay,
    MinutesWindow, OptionKey, ScaleFn, Scaled, SelectOption, Text, TimeWindow, ValueTransform,
};
pub use widgets::{
    environment_zone, Indicator, RangeGesture, RangeSlider, RangeSliderView, SelectGesture,
    SelectView, Selector, Slider, SliderGesture, SliderView, TextField, TextGesture, TextView,
    Thumb, TimeField, TimeFieldView, TimeGesture, TimeRangeField, TimeRangeGesture, TimeRangeView,
    Toggle, ToggleGesture, ToggleKind, ToggleView, ZoneOption,
};
