//! Write gating and fault injection for the in-memory store.
//!
//! A real backend resolves writes after an unpredictable delay and
//! sometimes rejects them. Tests need to pin those interleavings down, so
//! the memory store can park writes until released and fail writes on
//! demand.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use tokio::sync::Semaphore;

use docbind_core_store::Error;

/// Handle that releases parked writes.
///
/// Obtained from `MemoryStore::hold_writes`. Each `release` lets that many
/// parked (or future) writes proceed; `open` lets everything through and
/// stops gating.
#[derive(Clone, Debug)]
pub struct WriteGate {
    permits: Arc<Semaphore>,
    parked: Arc<AtomicUsize>,
}

impl WriteGate {
    pub(crate) fn new() -> Self {
        Self {
            permits: Arc::new(Semaphore::new(0)),
            parked: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Let `n` writes proceed.
    pub fn release(&self, n: usize) {
        self.permits.add_permits(n);
    }

    /// Stop gating; all parked and future writes proceed.
    pub fn open(&self) {
        self.permits.close();
    }

    /// Number of writes currently waiting at the gate.
    pub fn parked(&self) -> usize {
        self.parked.load(Ordering::SeqCst)
    }

    /// Yield until at least `n` writes are parked.
    pub async fn wait_parked(&self, n: usize) {
        while self.parked() < n {
            tokio::task::yield_now().await;
        }
    }

    pub(crate) async fn pass(&self) {
        self.parked.fetch_add(1, Ordering::SeqCst);
        // A closed semaphore means the gate was opened.
        if let Ok(permit) = self.permits.acquire().await {
            permit.forget();
        }
        self.parked.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Queue of failures handed to the next writes, in order.
#[derive(Debug, Default)]
pub(crate) struct FaultPlan {
    queued: Mutex<VecDeque<Error>>,
}

impl FaultPlan {
    pub(crate) fn push(&self, error: Error) {
        if let Ok(mut queued) = self.queued.lock() {
            queued.push_back(error);
        }
    }

    pub(crate) fn take(&self) -> Option<Error> {
        self.queued.lock().ok()?.pop_front()
    }
}
