//! Fixed-window cooldown for destructive actions.

use std::time::{Duration, Instant};

/// Disables an action for `window` after it was triggered.
///
/// Independent of any write: the window starts when the action is
/// triggered, whatever the write's outcome.
#[derive(Clone, Copy, Debug)]
pub struct Cooldown {
    window: Duration,
    until: Option<Instant>,
}

impl Cooldown {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            until: None,
        }
    }

    pub fn trigger(&mut self, now: Instant) {
        self.until = Some(now + self.window);
    }

    pub fn is_active(&self, now: Instant) -> bool {
        self.until.is_some_and(|until| now < until)
    }

    pub fn remaining(&self, now: Instant) -> Duration {
        self.until
            .map(|until| until.saturating_duration_since(now))
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_expires() {
        let start = Instant::now();
        let mut cooldown = Cooldown::new(Duration::from_secs(10));
        assert!(!cooldown.is_active(start));

        cooldown.trigger(start);
        assert!(cooldown.is_active(start + Duration::from_secs(9)));
        assert_eq!(
            cooldown.remaining(start + Duration::from_secs(4)),
            Duration::from_secs(6)
        );
        assert!(!cooldown.is_active(start + Duration::from_secs(10)));
        assert_eq!(
            cooldown.remaining(start + Duration::from_secs(30)),
            Duration::ZERO
        );
    }

    #[test]
    fn retrigger_extends() {
        let start = Instant::now();
        let mut cooldown = Cooldown::new(Duration::from_secs(10));
        cooldown.trigger(start);
        cooldown.trigger(start + Duration::from_secs(8));
        assert!(cooldown.is_active(start + Duration::from_secs(15)));
    }
}
