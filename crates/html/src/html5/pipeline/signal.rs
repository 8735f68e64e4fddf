//! Rollback request from the syntax stage to the lexical stage.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

/// Raised flag plus the checkpoint to resume from.
///
/// The checkpoint is written before the flag is published (release), and the
/// lexical stage reads it only after observing the flag (acquire). If two
/// requests land before the lexical stage looks, the later checkpoint wins.
#[derive(Debug)]
pub struct RollbackSignal<C> {
    raised: AtomicBool,
    checkpoint: Mutex<Option<C>>,
}

impl<C> Default for RollbackSignal<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> RollbackSignal<C> {
    pub fn new() -> Self {
        Self {
            raised: AtomicBool::new(false),
            checkpoint: Mutex::new(None),
        }
    }

    /// Syntax stage only.
    pub fn request_rollback(&self, checkpoint: C) {
        let mut slot = self.checkpoint.lock().unwrap_or_else(PoisonError::into_inner);
        *slot = Some(checkpoint);
        self.raised.store(true, Ordering::Release);
    }

    /// Lexical stage only: take the pending checkpoint and lower the flag.
    pub fn poll_and_clear(&self) -> Option<C> {
        if !self.raised.load(Ordering::Acquire) {
            return None;
        }
        let mut slot = self.checkpoint.lock().unwrap_or_else(PoisonError::into_inner);
        self.raised.store(false, Ordering::Release);
        slot.take()
    }

    pub fn is_pending(&self) -> bool {
        self.raised.load(Ordering::Acquire)
    }
}
