//! Backend restart request with a cooldown.

use std::time::{Duration, Instant};

use chrono::NaiveDate;

use docbind_bindings::ActionRunner;
use docbind_core_store::{field, to_value, DocRef, DocumentWriter, Error, Value};

use crate::cooldown::Cooldown;
use crate::heartbeat::Heartbeat;

/// Heartbeat written on restart: 2022-02-01T00:00:00Z, far enough in the
/// past that the backend reads as offline until it beats again.
fn stale_heartbeat() -> Heartbeat {
    let seconds = NaiveDate::from_ymd_opt(2022, 2, 1)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|time| time.and_utc().timestamp())
        .unwrap_or_default();
    Heartbeat {
        seconds,
        nanoseconds: 0,
    }
}

/// Requests a backend restart through the health monitor document.
///
/// A restart resets the heartbeat to a stale stamp and raises the `reset`
/// flag; the backend picks the flag up and restarts. The button stays
/// disabled while the request is in flight and for the cooldown window
/// after it was pressed, whether or not the request succeeded.
pub struct BackendRestart {
    health: DocRef,
    runner: ActionRunner,
    cooldown: Cooldown,
}

impl BackendRestart {
    pub fn new(health: DocRef, cooldown: Duration) -> Self {
        Self {
            health,
            runner: ActionRunner::new(),
            cooldown: Cooldown::new(cooldown),
        }
    }

    pub fn runner(&self) -> &ActionRunner {
        &self.runner
    }

    pub fn is_disabled(&self, now: Instant) -> bool {
        self.runner.is_running() || self.cooldown.is_active(now)
    }

    pub fn remaining(&self, now: Instant) -> Duration {
        self.cooldown.remaining(now)
    }

    /// Press the restart button. Returns `true` when the request was
    /// written; `false` when disabled or when the write failed.
    pub async fn trigger(&mut self, store: &dyn DocumentWriter, now: Instant) -> bool {
        if self.is_disabled(now) {
            tracing::debug!(doc = %self.health, "restart ignored while disabled");
            return false;
        }

        tracing::info!(doc = %self.health, "restarting backend");
        self.cooldown.trigger(now);
        let health = self.health.clone();
        self.runner
            .run(async move {
                let heartbeat = to_value(&stale_heartbeat())?;
                store
                    .write_field(&health, &field!("heartbeat"), heartbeat)
                    .await?;
                store
                    .write_field(&health, &field!("reset"), Value::Bool(true))
                    .await?;
                Ok::<(), Error>(())
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stale_heartbeat_is_february_2022() {
        let stamp = to_value(&stale_heartbeat()).unwrap();
        assert_eq!(
            stamp.get(&field!("seconds")),
            Some(&Value::Integer(1_643_673_600))
        );
    }

    #[test]
    fn fresh_restart_is_enabled() {
        let restart = BackendRestart::new(
            DocRef::new("config", "healthMonitor"),
            Duration::from_secs(10),
        );
        assert!(!restart.is_disabled(Instant::now()));
        assert_eq!(restart.remaining(Instant::now()), Duration::ZERO);
    }
}
