//! Backend liveness from its heartbeat field.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use docbind_core_store::{field, from_value, Snapshot};

/// The `heartbeat` field of the health monitor document.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Heartbeat {
    pub seconds: i64,
    #[serde(default)]
    pub nanoseconds: u32,
}

impl Heartbeat {
    pub fn at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.seconds, self.nanoseconds)
    }
}

/// Liveness of the backend as seen from its last heartbeat.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HeartbeatStatus {
    Online,
    Offline,
}

impl HeartbeatStatus {
    pub fn label(self) -> &'static str {
        match self {
            HeartbeatStatus::Online => "Online",
            HeartbeatStatus::Offline => "Offline",
        }
    }
}

/// Classifies the health monitor document.
///
/// The backend stamps `heartbeat.seconds` (Unix seconds) periodically; it
/// is offline once the stamp is older than `window`, or absent.
#[derive(Clone, Copy, Debug)]
pub struct HeartbeatMonitor {
    window: Duration,
}

impl HeartbeatMonitor {
    pub fn new(window: Duration) -> Self {
        Self { window }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Time of the last heartbeat, if the document carries one.
    pub fn last_beat(&self, snapshot: &Snapshot) -> Option<DateTime<Utc>> {
        let stored = snapshot.field(&field!("heartbeat"))?.clone();
        from_value::<Heartbeat>(stored).ok()?.at()
    }

    pub fn status(&self, snapshot: &Snapshot, now: DateTime<Utc>) -> HeartbeatStatus {
        match self.last_beat(snapshot) {
            Some(beat) if now - beat <= self.window => HeartbeatStatus::Online,
            _ => HeartbeatStatus::Offline,
        }
    }
}
