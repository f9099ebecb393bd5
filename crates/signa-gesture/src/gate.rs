//! Processing gate - at most one frame in flight
//!
//! Frames arriving while the previous one is still being classified are
//! dropped, not queued.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

#[derive(Debug, Default)]
pub struct ProcessingGate {
    busy: AtomicBool,
    admitted: AtomicU64,
    dropped: AtomicU64,
}

impl ProcessingGate {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Claim the gate. `None` means a frame is already in flight and this
    /// one should be dropped.
    pub fn try_enter(self: &Arc<Self>) -> Option<GateGuard> {
        if self
            .busy
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_ok()
        {
            self.admitted.fetch_add(1, Ordering::Relaxed);
            Some(GateGuard {
                gate: Arc::clone(self),
            })
        } else {
            self.dropped.fetch_add(1, Ordering::Relaxed);
            None
        }
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    pub fn admitted(&self) -> u64 {
        self.admitted.load(Ordering::Relaxed)
    }

    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}

/// Held for the duration of one frame; releases the gate on drop, including
/// on early return or panic unwinding
#[derive(Debug)]
pub struct GateGuard {
    gate: Arc<ProcessingGate>,
}

impl Drop for GateGuard {
    fn drop(&mut self) {
        self.gate.busy.store(false, Ordering::Release);
    }
}
