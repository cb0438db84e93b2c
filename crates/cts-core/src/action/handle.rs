//! Caller-side view of a started action.

use std::fmt;
use std::sync::{Arc, OnceLock};
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use cts_common::{ActionId, Error, SCHEMA_VERSION};

use super::failure::ActionFailure;
use super::latch::CompletionLatch;
use super::report::{ActionReport, ActionStatus};

/// State shared between the action thread and every handle.
///
/// Each cell is written once, by the action thread, before the latch is
/// released.
pub(crate) struct ActionState {
    pub(crate) id: ActionId,
    pub(crate) name: String,
    latch: CompletionLatch,
    started: OnceLock<Instant>,
    started_at: OnceLock<DateTime<Utc>>,
    ended: OnceLock<Instant>,
    failure: OnceLock<ActionFailure>,
}

impl ActionState {
    pub(crate) fn new(id: ActionId, name: String) -> Self {
        Self {
            id,
            name,
            latch: CompletionLatch::new(),
            started: OnceLock::new(),
            started_at: OnceLock::new(),
            ended: OnceLock::new(),
            failure: OnceLock::new(),
        }
    }

    pub(crate) fn mark_started(&self) {
        let _ = self.started_at.set(Utc::now());
        let _ = self.started.set(Instant::now());
    }

    pub(crate) fn mark_ended(&self) {
        let _ = self.ended.set(Instant::now());
    }

    pub(crate) fn record_failure(&self, failure: ActionFailure) {
        let _ = self.failure.set(failure);
    }

    pub(crate) fn complete(&self) -> bool {
        self.latch.release()
    }

    fn elapsed(&self) -> Option<Duration> {
        let started = self.started.get()?;
        let ended = self.ended.get()?;
        Some(ended.saturating_duration_since(*started))
    }
}

/// Cloneable handle to an action that has been started.
///
/// Handles are `Send + Sync`; any number of threads may wait on the same
/// action concurrently.
#[derive(Clone)]
pub struct ActionHandle {
    state: Arc<ActionState>,
}

impl fmt::Debug for ActionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionHandle")
            .field("id", &self.state.id)
            .field("name", &self.state.name)
            .field("completed", &self.is_completed())
            .finish()
    }
}

impl ActionHandle {
    pub(crate) fn new(state: Arc<ActionState>) -> Self {
        Self { state }
    }

    pub fn id(&self) -> &ActionId {
        &self.state.id
    }

    pub fn name(&self) -> &str {
        &self.state.name
    }

    /// Whether the action has finished. Never blocks.
    pub fn is_completed(&self) -> bool {
        self.state.latch.is_released()
    }

    /// Block until the action has finished.
    ///
    /// Returns immediately if it already has, no matter how many times this
    /// has been called before.
    pub fn wait_for_completion(&self) {
        self.state.latch.wait();
    }

    /// Block for at most `timeout`; `true` if the action finished in time.
    ///
    /// `Duration::ZERO` checks the current state without waiting.
    pub fn wait_for_completion_timeout(&self, timeout: Duration) -> bool {
        self.state.latch.wait_timeout(timeout)
    }

    /// Millisecond form of [`Self::wait_for_completion_timeout`]. A value
    /// less than or equal to zero means not to wait at all.
    pub fn wait_for_completion_millis(&self, timeout_ms: i64) -> bool {
        let timeout = u64::try_from(timeout_ms)
            .map(Duration::from_millis)
            .unwrap_or(Duration::ZERO);
        self.wait_for_completion_timeout(timeout)
    }

    /// Time the action body took to run, once it has finished.
    pub fn elapsed(&self) -> Option<Duration> {
        self.state.elapsed()
    }

    /// Time the action body took to run, in milliseconds.
    ///
    /// Only meaningful after completion has been observed; before that it
    /// is `0`.
    pub fn elapsed_time_ms(&self) -> u64 {
        self.elapsed()
            .map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
            .unwrap_or(0)
    }

    /// The failure raised by the body, or `None` if it completed normally
    /// (or has not completed yet).
    pub fn failure(&self) -> Option<ActionFailure> {
        self.state.failure.get().cloned()
    }

    /// Wall-clock time at which the body started.
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.state.started_at.get().copied()
    }

    /// Summary of the finished action.
    pub fn report(&self) -> cts_common::Result<ActionReport> {
        let started_at = match (self.is_completed(), self.started_at()) {
            (true, Some(started_at)) => started_at,
            _ => {
                return Err(Error::NotCompleted {
                    action: self.state.id.to_string(),
                })
            }
        };

        let failure = self.failure();
        let status = match &failure {
            None => ActionStatus::Succeeded,
            Some(f) if f.is_panic() => ActionStatus::Panicked,
            Some(_) => ActionStatus::Failed,
        };

        Ok(ActionReport {
            schema_version: SCHEMA_VERSION.to_string(),
            action_id: self.state.id.clone(),
            name: self.state.name.clone(),
            status,
            started_at,
            elapsed_ms: self.elapsed_time_ms(),
            failure: failure.map(|f| f.to_string()),
        })
    }
}

/// Wait for every action against one shared deadline.
///
/// Returns `true` only if all of them finished before `timeout` elapsed.
pub fn wait_all(handles: &[ActionHandle], timeout: Duration) -> bool {
    let deadline = Instant::now().checked_add(timeout);
    handles.iter().all(|handle| {
        let remaining = match deadline {
            Some(deadline) => deadline.saturating_duration_since(Instant::now()),
            None => timeout,
        };
        handle.wait_for_completion_timeout(remaining)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(name: &str) -> Arc<ActionState> {
        Arc::new(ActionState::new(ActionId::new(), name.to_string()))
    }

    #[test]
    fn fresh_handle_reports_nothing() {
        let handle = ActionHandle::new(state("idle"));
        assert!(!handle.is_completed());
        assert!(!handle.wait_for_completion_timeout(Duration::ZERO));
        assert!(handle.elapsed().is_none());
        assert_eq!(handle.elapsed_time_ms(), 0);
        assert!(handle.failure().is_none());
        assert!(handle.started_at().is_none());
        match handle.report() {
            Err(Error::NotCompleted { action }) => assert_eq!(&action, &handle.id().0),
            other => panic!("expected NotCompleted, got {:?}", other),
        }
    }

    #[test]
    fn non_positive_millis_do_not_wait() {
        let handle = ActionHandle::new(state("idle"));
        let started = Instant::now();
        assert!(!handle.wait_for_completion_millis(0));
        assert!(!handle.wait_for_completion_millis(-500));
        assert!(started.elapsed() < Duration::from_millis(200));
    }

    #[test]
    fn completed_state_is_visible_through_clones() {
        let shared = state("manual");
        let handle = ActionHandle::new(Arc::clone(&shared));
        let clone = handle.clone();

        shared.mark_started();
        shared.record_failure(ActionFailure::Panicked("boom".to_string()));
        shared.mark_ended();
        assert!(shared.complete());
        assert!(!shared.complete());

        assert!(clone.wait_for_completion_millis(1));
        let report = clone.report().unwrap();
        assert_eq!(report.status, ActionStatus::Panicked);
        assert_eq!(report.name, "manual");
        assert_eq!(report.failure.as_deref(), Some("action body panicked: boom"));
        assert!(handle.elapsed().is_some());
    }

    #[test]
    fn failure_is_set_once() {
        let shared = state("twice");
        shared.record_failure(ActionFailure::Panicked("first".to_string()));
        shared.record_failure(ActionFailure::Panicked("second".to_string()));
        let handle = ActionHandle::new(shared);
        assert_eq!(
            handle.failure().map(|f| f.to_string()).as_deref(),
            Some("action body panicked: first")
        );
    }

    #[test]
    fn wait_all_empty_is_true() {
        assert!(wait_all(&[], Duration::ZERO));
    }

    #[test]
    fn wait_all_false_when_one_pending() {
        let done = state("done");
        done.mark_started();
        done.mark_ended();
        done.complete();
        let handles = [ActionHandle::new(done), ActionHandle::new(state("pending"))];
        assert!(!wait_all(&handles, Duration::from_millis(20)));
    }
}
