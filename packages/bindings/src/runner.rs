//! Single-write action runner.
//!
//! Each binding owns one `ActionRunner`. It tracks whether the binding's
//! write is in flight and keeps the last failure. Failures are recorded,
//! logged and reported as `false`, never propagated.

use std::future::Future;

use docbind_core_store::Error;

#[derive(Debug, Default)]
pub struct ActionRunner {
    running: bool,
    error: Option<Error>,
}

impl ActionRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Failure of the last write, until cleared or superseded by a success.
    pub fn error(&self) -> Option<&Error> {
        self.error.as_ref()
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    /// Mark a write as started. Returns `false` if one is already in flight.
    pub fn begin(&mut self) -> bool {
        if self.running {
            return false;
        }
        self.running = true;
        true
    }

    /// Record the outcome of the in-flight write. Returns `true` on success.
    pub fn settle(&mut self, outcome: Result<(), Error>) -> bool {
        self.running = false;
        match outcome {
            Ok(()) => {
                self.error = None;
                true
            }
            Err(error) => {
                tracing::warn!(%error, "write failed");
                self.error = Some(error);
                false
            }
        }
    }

    /// Run `write` to completion as this runner's action.
    ///
    /// Returns `false` without polling `write` if another action is in
    /// flight, or when `write` fails.
    pub async fn run<F>(&mut self, write: F) -> bool
    where
        F: Future<Output = Result<(), Error>>,
    {
        if !self.begin() {
            return false;
        }
        let outcome = write.await;
        self.settle(outcome)
    }
}
