//! One-shot completion latch.
//!
//! Once released the latch stays released: every past, present and future
//! wait is satisfied. Writes made before [`CompletionLatch::release`] are
//! visible to any thread that returns from a successful wait, because both
//! sides go through the same mutex.

use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// Persistent one-shot latch backed by a mutex and condition variable.
#[derive(Debug, Default)]
pub struct CompletionLatch {
    released: Mutex<bool>,
    condvar: Condvar,
}

impl CompletionLatch {
    /// Create a latch in the "not completed" state.
    pub const fn new() -> Self {
        Self {
            released: Mutex::new(false),
            condvar: Condvar::new(),
        }
    }

    /// Release the latch, waking every waiter.
    ///
    /// Returns `false` if the latch had already been released.
    pub fn release(&self) -> bool {
        let mut released = self.lock();
        if *released {
            return false;
        }
        *released = true;
        drop(released);
        self.condvar.notify_all();
        true
    }

    /// Whether the latch has been released.
    pub fn is_released(&self) -> bool {
        *self.lock()
    }

    /// Block until the latch is released.
    pub fn wait(&self) {
        let guard = self.lock();
        let _released = self
            .condvar
            .wait_while(guard, |released| !*released)
            .unwrap_or_else(PoisonError::into_inner);
    }

    /// Block for at most `timeout` waiting for release.
    ///
    /// A zero timeout only tests the current state.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        let guard = self.lock();
        if *guard || timeout.is_zero() {
            return *guard;
        }
        let (guard, _) = self
            .condvar
            .wait_timeout_while(guard, timeout, |released| !*released)
            .unwrap_or_else(PoisonError::into_inner);
        *guard
    }

    // The guarded value is a plain bool that is never left half-written, so a
    // poisoned lock still holds a consistent state.
    fn lock(&self) -> MutexGuard<'_, bool> {
        self.released.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;
    use std::time::Instant;

    #[test]
    fn starts_unreleased() {
        let latch = CompletionLatch::new();
        assert!(!latch.is_released());
        assert!(!latch.wait_timeout(Duration::ZERO));
    }

    #[test]
    fn release_is_one_shot() {
        let latch = CompletionLatch::new();
        assert!(latch.release());
        assert!(!latch.release());
        assert!(latch.is_released());
    }

    #[test]
    fn release_before_wait_satisfies_later_waits() {
        let latch = CompletionLatch::new();
        latch.release();
        latch.wait();
        latch.wait();
        assert!(latch.wait_timeout(Duration::ZERO));
        assert!(latch.wait_timeout(Duration::from_secs(60)));
    }

    #[test]
    fn wait_timeout_expires() {
        let latch = CompletionLatch::new();
        let started = Instant::now();
        assert!(!latch.wait_timeout(Duration::from_millis(50)));
        assert!(started.elapsed() >= Duration::from_millis(50));
    }

    #[test]
    fn release_wakes_all_waiters() {
        let latch = Arc::new(CompletionLatch::new());
        let waiters: Vec<_> = (0..8)
            .map(|_| {
                let latch = Arc::clone(&latch);
                thread::spawn(move || latch.wait_timeout(Duration::from_secs(10)))
            })
            .collect();

        thread::sleep(Duration::from_millis(20));
        latch.release();

        for waiter in waiters {
            assert!(waiter.join().unwrap());
        }
    }

    #[test]
    fn poisoned_lock_still_usable() {
        let latch = Arc::new(CompletionLatch::new());
        let poisoner = Arc::clone(&latch);
        let _ = thread::spawn(move || {
            let _guard = poisoner.released.lock().unwrap();
            panic!("poison the latch");
        })
        .join();

        assert!(latch.released.is_poisoned());
        assert!(!latch.is_released());
        assert!(latch.release());
        assert!(latch.wait_timeout(Duration::ZERO));
    }
}
