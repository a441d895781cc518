// NoiseWatch: Cycle Coordination
//
// Two-flag handshake between the cadence timer callback and the monitor
// loop.  The timer only ever stores `requested = true`; the monitor claims a
// cycle when a request is pending and none is running, clearing the request
// before doing any work.  Ticks that arrive while a request is still pending
// coalesce into that one request.

use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Debug, Default)]
pub struct CycleCoordinator {
    requested: AtomicBool,
    in_progress: AtomicBool,
}

impl CycleCoordinator {
    pub const fn new() -> Self {
        Self {
            requested: AtomicBool::new(false),
            in_progress: AtomicBool::new(false),
        }
    }

    /// Ask for a cycle.  Never blocks; safe from the timer callback.
    pub fn request(&self) {
        self.requested.store(true, Ordering::Release);
    }

    pub fn is_requested(&self) -> bool {
        self.requested.load(Ordering::Acquire)
    }

    pub fn is_in_progress(&self) -> bool {
        self.in_progress.load(Ordering::Acquire)
    }

    /// Claim a cycle if one is requested and none is running.
    ///
    /// The returned guard releases the in-progress marker when dropped, so an
    /// early return on a driver error still re-arms the loop.
    pub fn try_begin(&self) -> Option<CycleGuard<'_>> {
        if !self.is_requested() {
            return None;
        }
        // CAS: at most one consumer wins the claim.
        if self
            .in_progress
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return None;
        }
        // Consume the request; back out if another claim already took it.
        if !self.requested.swap(false, Ordering::AcqRel) {
            self.in_progress.store(false, Ordering::Release);
            return None;
        }
        Some(CycleGuard { owner: self })
    }
}

/// Marks a cycle as running for as long as it lives.
#[must_use = "dropping the guard ends the cycle immediately"]
#[derive(Debug)]
pub struct CycleGuard<'a> {
    owner: &'a CycleCoordinator,
}

impl Drop for CycleGuard<'_> {
    fn drop(&mut self) {
        self.owner.in_progress.store(false, Ordering::Release);
    }
}
