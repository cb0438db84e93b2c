//! Completion listeners.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Notified on the action thread once the action has finished.
///
/// The completion latch is released before `completed` runs, so waiters may
/// resume while the listener is still executing. Implementations must not
/// block indefinitely.
pub trait CompletionListener: Send {
    fn completed(&self);
}

impl<F> CompletionListener for F
where
    F: Fn() + Send,
{
    fn completed(&self) {
        self()
    }
}

/// Listener that counts how many times it was notified.
///
/// Clones share the same counter, so one clone can be handed to the action
/// while the driver keeps another.
#[derive(Debug, Clone, Default)]
pub struct CountingListener {
    calls: Arc<AtomicUsize>,
}

impl CountingListener {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of notifications received so far.
    pub fn count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl CompletionListener for CountingListener {
    fn completed(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}
