//! Single-slot handoff between the lexical and syntax stages.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// Single-producer/single-consumer FIFO of capacity one.
///
/// Neither `try_produce` nor `try_consume` blocks. Stages that find nothing
/// to do park in `wait_vacant`/`wait_occupied`, which re-check their
/// condition under the slot lock so a `wake` is never lost.
#[derive(Debug)]
pub struct HandoffChannel<T> {
    slot: Mutex<Option<T>>,
    changed: Condvar,
    closed: AtomicBool,
    consumed: AtomicU64,
}

impl<T> Default for HandoffChannel<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> HandoffChannel<T> {
    pub fn new() -> Self {
        Self {
            slot: Mutex::new(None),
            changed: Condvar::new(),
            closed: AtomicBool::new(false),
            consumed: AtomicU64::new(0),
        }
    }

    /// Place `item` in the slot, or hand it back if the slot is full.
    pub fn try_produce(&self, item: T) -> Result<(), T> {
        let mut slot = self.lock();
        if slot.is_some() {
            return Err(item);
        }
        *slot = Some(item);
        drop(slot);
        self.changed.notify_all();
        Ok(())
    }

    pub fn try_consume(&self) -> Option<T> {
        let mut slot = self.lock();
        let item = slot.take();
        if item.is_some() {
            // Counted under the lock: a producer that sees the slot vacant
            // also sees the count.
            self.consumed.fetch_add(1, Ordering::Relaxed);
            drop(slot);
            self.changed.notify_all();
        }
        item
    }

    /// Items taken by `try_consume` so far.
    pub fn consumed(&self) -> u64 {
        self.consumed.load(Ordering::Relaxed)
    }

    /// Drop the buffered item, if any. Producer side, during a rollback.
    pub fn discard(&self) -> Option<T> {
        let item = self.lock().take();
        self.changed.notify_all();
        item
    }

    pub fn is_occupied(&self) -> bool {
        self.lock().is_some()
    }

    /// Park until the slot is vacant or `ready()` holds. Returns whether the
    /// slot was vacant on wakeup.
    pub fn wait_vacant(&self, timeout: Duration, ready: impl Fn() -> bool) -> bool {
        let guard = self.wait_while(timeout, |occupied| occupied && !ready());
        guard.is_none()
    }

    /// Park until the slot is occupied and `blocked()` does not hold. Returns
    /// whether the slot was occupied on wakeup.
    pub fn wait_occupied(&self, timeout: Duration, blocked: impl Fn() -> bool) -> bool {
        let guard = self.wait_while(timeout, |occupied| !occupied || blocked());
        guard.is_some()
    }

    /// Wake parked stages so they re-check conditions outside the slot.
    pub fn wake(&self) {
        // Taking the lock orders this wakeup after any in-progress condition check.
        drop(self.lock());
        self.changed.notify_all();
    }

    /// Wake both sides permanently; waits return immediately from now on.
    pub fn close(&self) {
        self.closed.store(true, Ordering::Release);
        self.wake();
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    fn wait_while(
        &self,
        timeout: Duration,
        keep_waiting: impl Fn(bool) -> bool,
    ) -> MutexGuard<'_, Option<T>> {
        let guard = self.lock();
        let (guard, _) = self
            .changed
            .wait_timeout_while(guard, timeout, |slot| {
                keep_waiting(slot.is_some()) && !self.is_closed()
            })
            .unwrap_or_else(PoisonError::into_inner);
        guard
    }

    fn lock(&self) -> MutexGuard<'_, Option<T>> {
        // A panicking stage aborts the pipeline; the slot itself stays consistent.
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Idle strategy: a bounded number of spin hints, then timed parking.
#[derive(Debug)]
pub(crate) struct Backoff {
    spins: u32,
    spin_limit: u32,
    idle_wait: Duration,
}

impl Backoff {
    pub(crate) fn new(spin_limit: u32, idle_wait: Duration) -> Self {
        Self {
            spins: 0,
            spin_limit,
            idle_wait,
        }
    }

    pub(crate) fn reset(&mut self) {
        self.spins = 0;
    }

    /// Spin while under the limit, otherwise call `park` with the wait budget.
    pub(crate) fn snooze(&mut self, park: impl FnOnce(Duration)) {
        if self.spins < self.spin_limit {
            self.spins += 1;
            std::hint::spin_loop();
        } else {
            park(self.idle_wait);
        }
    }
}
