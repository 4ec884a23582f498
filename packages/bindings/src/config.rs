//! Defaults shared by the bindings of one console.

use std::{fs, path};

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::transform::TimeWindow;

pub const DEFAULT_ALERT_START_MINUTES: u32 = 8 * 60;
pub const DEFAULT_ALERT_END_MINUTES: u32 = 22 * 60;
pub const FALLBACK_ZONE: &str = "UTC";

/// Keys that confirm or cancel a text edit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyMap {
    pub confirm: String,
    pub cancel: String,
}

impl Default for KeyMap {
    fn default() -> Self {
        Self {
            confirm: "Enter".to_string(),
            cancel: "Escape".to_string(),
        }
    }
}

/// Binding defaults, usually embedded in a larger console config.
///
/// Every field is optional in JSON:
///
/// ```json
/// {
///   "reference_time": "2022-04-17T06:00:00",
///   "alert_start_minutes": 480,
///   "alert_end_minutes": 1320,
///   "default_zone": "America/New_York",
///   "keys": { "confirm": "Enter", "cancel": "Escape" }
/// }
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BindingDefaults {
    /// Date and minutes shown by hour-of-day fields.
    pub reference_time: NaiveDateTime,
    pub alert_start_minutes: u32,
    pub alert_end_minutes: u32,
    /// Selector fallback when `TZ` is unset.
    pub default_zone: Option<String>,
    pub keys: KeyMap,
}

impl Default for BindingDefaults {
    fn default() -> Self {
        Self {
            reference_time: reference_time(),
            alert_start_minutes: DEFAULT_ALERT_START_MINUTES,
            alert_end_minutes: DEFAULT_ALERT_END_MINUTES,
            default_zone: None,
            keys: KeyMap::default(),
        }
    }
}

fn reference_time() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2022, 4, 17)
        .and_then(|date| date.and_hms_opt(6, 0, 0))
        .unwrap_or_default()
}

impl BindingDefaults {
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let defaults: Self = serde_json::from_str(text)?;
        defaults.alert_window()?;
        Ok(defaults)
    }

    pub fn load(file: &path::Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(file).map_err(|error| ConfigError::Parse {
            message: format!("{}: {}", file.display(), error),
        })?;
        Self::from_json(&text)
    }

    /// The default alert window for time-range fields.
    pub fn alert_window(&self) -> Result<TimeWindow, ConfigError> {
        for minutes in [self.alert_start_minutes, self.alert_end_minutes] {
            if minutes >= 24 * 60 {
                return Err(ConfigError::InvalidMinutes { minutes });
            }
        }
        TimeWindow::from_minutes(self.alert_start_minutes, self.alert_end_minutes).ok_or(
            ConfigError::InvalidMinutes {
                minutes: self.alert_start_minutes,
            },
        )
    }
}
