//! Enumerated selector, with a time-zone catalog.

use std::env;

use docbind_core_store::{Error, FieldPath, Snapshot};

use super::{change, error_text};
use crate::binding::{Binding, CommitPolicy, Phase, Step};
use crate::config::{BindingDefaults, FALLBACK_ZONE};
use crate::field::FieldBinding;
use crate::runner::ActionRunner;
use crate::transform::{OptionKey, SelectOption};

/// Common zones: key, label, UTC offset in minutes (standard time).
const COMMON_ZONES: &[(&str, &str, i32)] = &[
    ("Pacific/Midway", "Midway Island, Samoa", -660),
    ("Pacific/Honolulu", "Hawaii", -600),
    ("America/Juneau", "Alaska", -540),
    ("America/Los_Angeles", "Pacific Time", -480),
    ("America/Boise", "Mountain Time", -420),
    ("America/Phoenix", "Arizona", -420),
    ("America/Chicago", "Central Time", -360),
    ("America/Mexico_City", "Mexico City", -360),
    ("America/New_York", "Eastern Time", -300),
    ("America/Halifax", "Atlantic Time", -240),
    ("America/Sao_Paulo", "Brasilia", -180),
    ("Atlantic/Azores", "Azores", -60),
    ("UTC", "Coordinated Universal Time", 0),
    ("Europe/London", "Edinburgh, London", 0),
    ("Europe/Paris", "Brussels, Copenhagen, Madrid, Paris", 60),
    ("Europe/Berlin", "Amsterdam, Berlin, Rome, Stockholm, Vienna", 60),
    ("Europe/Athens", "Athens, Bucharest", 120),
    ("Africa/Cairo", "Cairo", 120),
    ("Europe/Moscow", "Moscow, St. Petersburg", 180),
    ("Asia/Dubai", "Abu Dhabi, Muscat", 240),
    ("Asia/Karachi", "Islamabad, Karachi", 300),
    ("Asia/Kolkata", "Chennai, Kolkata, Mumbai, New Delhi", 330),
    ("Asia/Dhaka", "Dhaka", 360),
    ("Asia/Bangkok", "Bangkok, Hanoi, Jakarta", 420),
    ("Asia/Shanghai", "Beijing, Shanghai", 480),
    ("Asia/Singapore", "Singapore", 480),
    ("Asia/Tokyo", "Osaka, Sapporo, Tokyo", 540),
    ("Australia/Adelaide", "Adelaide", 570),
    ("Australia/Sydney", "Canberra, Melbourne, Sydney", 600),
    ("Pacific/Noumea", "New Caledonia", 660),
    ("Pacific/Auckland", "Auckland, Wellington", 720),
];

/// A time zone option.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ZoneOption {
    pub key: String,
    pub label: String,
    /// Standard-time offset from UTC; unknown for zones outside the catalog.
    pub offset_minutes: Option<i32>,
}

impl ZoneOption {
    pub fn catalog() -> Vec<ZoneOption> {
        COMMON_ZONES
            .iter()
            .map(|(key, label, offset)| ZoneOption {
                key: key.to_string(),
                label: label.to_string(),
                offset_minutes: Some(*offset),
            })
            .collect()
    }

    /// Label with its offset, e.g. `(GMT-5:00) Eastern Time`.
    pub fn display_label(&self) -> String {
        match self.offset_minutes {
            Some(offset) => {
                let sign = if offset < 0 { '-' } else { '+' };
                let offset = offset.abs();
                format!(
                    "(GMT{}{}:{:02}) {}",
                    sign,
                    offset / 60,
                    offset % 60,
                    self.label
                )
            }
            None => self.label.clone(),
        }
    }
}

impl SelectOption for ZoneOption {
    fn key(&self) -> &str {
        &self.key
    }

    fn from_key(key: &str) -> Self {
        COMMON_ZONES
            .iter()
            .find(|(k, _, _)| *k == key)
            .map(|(key, label, offset)| ZoneOption {
                key: key.to_string(),
                label: label.to_string(),
                offset_minutes: Some(*offset),
            })
            .unwrap_or_else(|| ZoneOption {
                key: key.to_string(),
                label: key.to_string(),
                offset_minutes: None,
            })
    }
}

/// Zone used for unset selector fields: `TZ` if set, else `configured`,
/// else UTC.
pub fn environment_zone(configured: Option<&str>) -> String {
    resolve_zone(env::var("TZ").ok(), configured)
}

fn resolve_zone(tz: Option<String>, configured: Option<&str>) -> String {
    // POSIX allows a leading colon on zone names.
    let tz = tz.map(|tz| tz.trim_start_matches(':').to_string());
    tz.filter(|tz| !tz.is_empty())
        .or_else(|| configured.filter(|c| !c.is_empty()).map(str::to_string))
        .unwrap_or_else(|| FALLBACK_ZONE.to_string())
}

#[derive(Clone, Debug, PartialEq)]
pub enum SelectGesture<O> {
    Select(O),
}

#[derive(Clone, Debug, PartialEq)]
pub struct SelectView<O> {
    pub selected: O,
    /// The field is unset and `selected` is the fallback.
    pub fallback: bool,
    pub disabled: bool,
    pub error: Option<String>,
}

/// Selector over a stored option key. Selections are written at once;
/// an unset field shows the fallback option and is left unset.
pub struct Selector<O: SelectOption> {
    binding: FieldBinding<OptionKey<O>>,
}

impl<O: SelectOption> Selector<O> {
    pub fn new(path: FieldPath, fallback: impl Into<String>) -> Self {
        Self {
            binding: FieldBinding::new(path, OptionKey::new(fallback)),
        }
    }

    pub fn selected(&self) -> O {
        self.binding.display()
    }
}

impl Selector<ZoneOption> {
    /// Zone selector falling back to the environment's zone.
    pub fn zones(path: FieldPath, defaults: &BindingDefaults) -> Self {
        Self::new(path, environment_zone(defaults.default_zone.as_deref()))
    }
}

impl<O: SelectOption> Binding for Selector<O> {
    type Gesture = SelectGesture<O>;
    type View = SelectView<O>;

    const POLICY: CommitPolicy = CommitPolicy::OnChange;

    fn observe(&mut self, snapshot: &Snapshot) -> Step {
        self.binding.observe(snapshot)
    }

    fn gesture(&mut self, gesture: SelectGesture<O>) -> Step {
        let SelectGesture::Select(option) = gesture;
        change(Self::POLICY, &mut self.binding, option)
    }

    fn settle(&mut self, outcome: Result<(), Error>) -> Step {
        self.binding.settle(outcome)
    }

    fn phase(&self) -> Phase {
        self.binding.phase()
    }

    fn view(&self) -> SelectView<O> {
        SelectView {
            selected: self.selected(),
            fallback: self.binding.remote().is_none(),
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

    fn snap(version: u64, zone: Option<&str>) -> Snapshot {
        let mut data = Value::map();
        if let Some(zone) = zone {
            data.set(&field!("timezone"), Value::from(zone)).unwrap();
        }
        Snapshot::new(DocRef::new("clients", "alice"), version, data)
    }

    #[test]
    fn unset_field_shows_fallback_without_writing() {
        let mut select: Selector<ZoneOption> = Selector::new(field!("timezone"), "Europe/Paris");
        let step = select.observe(&snap(1, None));
        assert!(!step.has_writes());
        let view = select.view();
        assert!(view.fallback);
        assert_eq!(view.selected.key, "Europe/Paris");
        assert_eq!(view.selected.offset_minutes, Some(60));
    }

    #[test]
    fn stored_key_is_looked_up() {
        let mut select: Selector<ZoneOption> = Selector::new(field!("timezone"), "UTC");
        let _ = select.observe(&snap(1, Some("America/New_York")));
        assert_eq!(select.selected().label, "Eastern Time");
        assert!(!select.view().fallback);

        let _ = select.observe(&snap(2, Some("Antarctica/Troll")));
        let selected = select.selected();
        assert_eq!(selected.label, "Antarctica/Troll");
        assert_eq!(selected.offset_minutes, None);
    }

    #[test]
    fn selecting_commits_key() {
        let mut select: Selector<ZoneOption> = Selector::new(field!("timezone"), "UTC");
        let _ = select.observe(&snap(1, Some("UTC")));

        let step = select.gesture(SelectGesture::Select(ZoneOption::from_key("Asia/Tokyo")));
        assert_eq!(step.writes[0].value, Value::from("Asia/Tokyo"));
        assert_eq!(select.selected().key, "Asia/Tokyo");
        assert_eq!(
            select
                .gesture(SelectGesture::Select(ZoneOption::from_key("UTC")))
                .notice,
            Notice::Busy
        );

        let _ = select.settle(Err(Error::rejected("denied")));
        assert_eq!(select.selected().key, "UTC");
    }

    #[test]
    fn zone_resolution_order() {
        assert_eq!(resolve_zone(Some("Asia/Tokyo".into()), Some("UTC")), "Asia/Tokyo");
        assert_eq!(resolve_zone(Some(":Europe/Paris".into()), None), "Europe/Paris");
        assert_eq!(resolve_zone(Some(String::new()), Some("Europe/Berlin")), "Europe/Berlin");
        assert_eq!(resolve_zone(None, None), "UTC");
    }

    #[test]
    fn labels_and_catalog() {
        let eastern = ZoneOption::from_key("America/New_York");
        assert_eq!(eastern.display_label(), "(GMT-5:00) Eastern Time");
        let kolkata = ZoneOption::from_key("Asia/Kolkata");
        assert_eq!(
            kolkata.display_label(),
            "(GMT+5:30) Chennai, Kolkata, Mumbai, New Delhi"
        );
        let catalog = ZoneOption::catalog();
        assert!(catalog.iter().any(|zone| zone.key == "UTC"));
        assert!(catalog.iter().all(|zone| ZoneOption::from_key(&zone.key) == *zone));
    }
}
