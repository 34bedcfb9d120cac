//! Counting Semaphore

use std::sync::{Condvar, Mutex, PoisonError};

/// Counting semaphore built on a mutex-protected counter and a condvar.
///
/// `acquire` blocks while the count is zero; `release` adds one unit and
/// wakes a single waiter.
#[derive(Debug, Default)]
pub struct CountingSemaphore {
    count: Mutex<usize>,
    available: Condvar,
}

impl CountingSemaphore {
    /// Create a semaphore holding `initial` units
    pub fn new(initial: usize) -> Self {
        Self {
            count: Mutex::new(initial),
            available: Condvar::new(),
        }
    }

    /// Take one unit, blocking until one is available
    pub fn acquire(&self) {
        let mut count = self.count.lock().unwrap_or_else(PoisonError::into_inner);
        while *count == 0 {
            count = self
                .available
                .wait(count)
                .unwrap_or_else(PoisonError::into_inner);
        }
        *count -= 1;
    }

    /// Take one unit if available without blocking
    pub fn try_acquire(&self) -> bool {
        let mut count = self.count.lock().unwrap_or_else(PoisonError::into_inner);
        if *count == 0 {
            return false;
        }
        *count -= 1;
        true
    }

    /// Return one unit and wake one waiter
    pub fn release(&self) {
        let mut count = self.count.lock().unwrap_or_else(PoisonError::into_inner);
        *count += 1;
        drop(count);
        self.available.notify_one();
    }

    /// Current number of units (a snapshot, may be stale immediately)
    pub fn available(&self) -> usize {
        *self.count.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
