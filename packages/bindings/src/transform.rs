//! Value transforms between stored and displayed representations.
//!
//! A transform is total in the read direction: any stored value, including
//! an absent one, maps to something displayable. Writes go the other way
//! through `to_stored`.

use std::fmt;
use std::sync::Arc;

use chrono::{NaiveDateTime, NaiveTime, Timelike};

use docbind_core_store::Value;

/// Bidirectional mapping between a stored field and its displayed form.
pub trait ValueTransform {
    type Display: Clone + PartialEq + fmt::Debug;

    fn to_display(&self, stored: Option<&Value>) -> Self::Display;

    fn to_stored(&self, display: &Self::Display) -> Value;
}

/// Boolean fields. Absent or non-boolean values display as `false`.
#[derive(Clone, Copy, Debug, Default)]
pub struct Boolean;

impl ValueTransform for Boolean {
    type Display = bool;

    fn to_display(&self, stored: Option<&Value>) -> bool {
        stored.and_then(Value::as_bool).unwrap_or(false)
    }

    fn to_stored(&self, display: &bool) -> Value {
        Value::Bool(*display)
    }
}

/// String fields. Numbers display in their decimal form.
#[derive(Clone, Copy, Debug, Default)]
pub struct Text;

impl ValueTransform for Text {
    type Display = String;

    fn to_display(&self, stored: Option<&Value>) -> String {
        match stored {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Integer(i)) => i.to_string(),
            Some(Value::Float(f)) => f.to_string(),
            _ => String::new(),
        }
    }

    fn to_stored(&self, display: &String) -> Value {
        Value::String(display.clone())
    }
}

/// Mapping from a slider index to a stored quantity.
pub type ScaleFn = Arc<dyn Fn(f64) -> f64 + Send + Sync>;

/// Slider positions: the index is displayed, `scale(index)` is stored.
///
/// Stored values are mapped back with `invert`; without a scale pair the
/// index is stored as is. Displayed indices are clamped to `[min, max]`
/// and an absent field sits at `min`.
#[derive(Clone)]
pub struct Scaled {
    pub min: f64,
    pub max: f64,
    scale: Option<ScaleFn>,
    invert: Option<ScaleFn>,
}

impl Scaled {
    pub fn linear(min: f64, max: f64) -> Self {
        Self {
            min,
            max,
            scale: None,
            invert: None,
        }
    }

    pub fn with_scale(mut self, scale: ScaleFn, invert: ScaleFn) -> Self {
        self.scale = Some(scale);
        self.invert = Some(invert);
        self
    }

    pub fn clamp(&self, index: f64) -> f64 {
        index.clamp(self.min, self.max)
    }

    /// The stored quantity an index stands for.
    pub fn scale(&self, index: f64) -> f64 {
        match &self.scale {
            Some(scale) => scale(index),
            None => index,
        }
    }
}

impl fmt::Debug for Scaled {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scaled")
            .field("min", &self.min)
            .field("max", &self.max)
            .field("scaled", &self.scale.is_some())
            .finish()
    }
}

impl ValueTransform for Scaled {
    type Display = f64;

    fn to_display(&self, stored: Option<&Value>) -> f64 {
        let index = match (stored.and_then(Value::as_f64), &self.invert) {
            (Some(value), Some(invert)) => invert(value),
            (Some(value), None) => value,
            (None, _) => self.min,
        };
        self.clamp(index)
    }

    fn to_stored(&self, display: &f64) -> Value {
        Value::number(self.scale(*display))
    }
}

/// Hour-of-day fields shown as a date-time on a fixed reference date.
///
/// Only the hour is meaningful; minutes and date come from `reference`.
/// Absent or out-of-range hours display as the reference itself.
#[derive(Clone, Copy, Debug)]
pub struct HourOfDay {
    pub reference: NaiveDateTime,
}

impl HourOfDay {
    pub fn at_hour(&self, hour: u32) -> NaiveDateTime {
        self.reference.with_hour(hour).unwrap_or(self.reference)
    }
}

impl ValueTransform for HourOfDay {
    type Display = NaiveDateTime;

    fn to_display(&self, stored: Option<&Value>) -> NaiveDateTime {
        match stored.and_then(Value::as_i64) {
            Some(hour) if (0..24).contains(&hour) => self.at_hour(hour as u32),
            _ => self.reference,
        }
    }

    fn to_stored(&self, display: &NaiveDateTime) -> Value {
        Value::Integer(display.hour() as i64)
    }
}

/// A daily time window, as shown by a time-range field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl TimeWindow {
    /// Window from minute offsets; `None` if either is not a minute of the day.
    pub fn from_minutes(start: u32, end: u32) -> Option<Self> {
        Some(Self {
            start: time_from_minutes(start as i64)?,
            end: time_from_minutes(end as i64)?,
        })
    }

    pub fn minutes(&self) -> (u32, u32) {
        (minutes_from_midnight(self.start), minutes_from_midnight(self.end))
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - {}",
            self.start.format("%H:%M"),
            self.end.format("%H:%M")
        )
    }
}

pub fn time_from_minutes(minutes: i64) -> Option<NaiveTime> {
    if !(0..24 * 60).contains(&minutes) {
        return None;
    }
    NaiveTime::from_hms_opt((minutes / 60) as u32, (minutes % 60) as u32, 0)
}

pub fn minutes_from_midnight(time: NaiveTime) -> u32 {
    time.hour() * 60 + time.minute()
}

/// Drop seconds and below.
pub fn truncate_to_minute(time: NaiveTime) -> NaiveTime {
    time.with_second(0)
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(time)
}

/// Time windows stored as `[startMinutes, endMinutes]` from midnight.
///
/// Each missing or unusable element falls back to the matching side of
/// `defaults`. Zero is a valid offset (midnight), not a missing one.
#[derive(Clone, Copy, Debug)]
pub struct MinutesWindow {
    pub defaults: TimeWindow,
}

impl ValueTransform for MinutesWindow {
    type Display = TimeWindow;

    fn to_display(&self, stored: Option<&Value>) -> TimeWindow {
        let items = stored.and_then(Value::as_array).unwrap_or(&[]);
        let side = |index: usize, fallback: NaiveTime| {
            items
                .get(index)
                .and_then(Value::as_i64)
                .and_then(time_from_minutes)
                .unwrap_or(fallback)
        };
        TimeWindow {
            start: side(0, self.defaults.start),
            end: side(1, self.defaults.end),
        }
    }

    fn to_stored(&self, display: &TimeWindow) -> Value {
        let (start, end) = display.minutes();
        Value::Array(vec![Value::from(start), Value::from(end)])
    }
}

/// Options of an enumerated selector, addressed by a stable string key.
pub trait SelectOption: Clone + PartialEq + fmt::Debug {
    fn key(&self) -> &str;

    /// The option for `key`. Keys outside the catalog yield a synthesized
    /// option rather than failing.
    fn from_key(key: &str) -> Self;
}

/// Selector fields stored as the option key.
///
/// Unset fields display the option for `fallback`.
#[derive(Clone, Debug)]
pub struct OptionKey<O> {
    pub fallback: String,
    _option: std::marker::PhantomData<fn() -> O>,
}

impl<O> OptionKey<O> {
    pub fn new(fallback: impl Into<String>) -> Self {
        Self {
            fallback: fallback.into(),
            _option: std::marker::PhantomData,
        }
    }
}

impl<O: SelectOption> ValueTransform for OptionKey<O> {
    type Display = O;

    fn to_display(&self, stored: Option<&Value>) -> O {
        match stored.and_then(Value::as_str) {
            Some(key) if !key.is_empty() => O::from_key(key),
            _ => O::from_key(&self.fallback),
        }
    }

    fn to_stored(&self, display: &O) -> Value {
        Value::from(display.key())
    }
}
