//! Failures captured from action bodies.

use std::any::Any;
use std::error::Error as StdError;
use std::sync::Arc;
use thiserror::Error;

/// Error type returned by an action body.
pub type BodyError = Box<dyn StdError + Send + Sync + 'static>;

/// A failure raised on the action thread and kept for later inspection.
///
/// Cloning is cheap; every clone refers to the same underlying error.
#[derive(Debug, Clone, Error)]
pub enum ActionFailure {
    /// The body returned an error.
    #[error("{0}")]
    Error(Arc<dyn StdError + Send + Sync + 'static>),

    /// The body panicked.
    #[error("action body panicked: {0}")]
    Panicked(String),
}

impl ActionFailure {
    pub(crate) fn from_error(err: BodyError) -> Self {
        ActionFailure::Error(Arc::from(err))
    }

    pub(crate) fn from_panic(payload: &(dyn Any + Send)) -> Self {
        ActionFailure::Panicked(panic_message(payload))
    }

    /// Whether the failure came from a panic rather than a returned error.
    pub fn is_panic(&self) -> bool {
        matches!(self, ActionFailure::Panicked(_))
    }

    /// The error returned by the body, if the failure was not a panic.
    pub fn error(&self) -> Option<&(dyn StdError + Send + Sync + 'static)> {
        match self {
            ActionFailure::Error(err) => Some(err.as_ref()),
            ActionFailure::Panicked(_) => None,
        }
    }

    /// Downcast the returned error to a concrete type.
    pub fn downcast_ref<T: StdError + 'static>(&self) -> Option<&T> {
        self.error().and_then(|err| err.downcast_ref::<T>())
    }
}

/// Best-effort text of a panic payload.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&'static str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Error)]
    #[error("receive timed out after {0} ms")]
    struct ReceiveTimeout(u64);

    #[test]
    fn error_failure_keeps_concrete_type() {
        let failure = ActionFailure::from_error(Box::new(ReceiveTimeout(250)));
        assert!(!failure.is_panic());
        assert_eq!(failure.to_string(), "receive timed out after 250 ms");
        assert_eq!(failure.downcast_ref::<ReceiveTimeout>().map(|e| e.0), Some(250));
        assert!(failure.downcast_ref::<std::io::Error>().is_none());
    }

    #[test]
    fn string_errors_convert() {
        let failure = ActionFailure::from_error("provider closed the session".into());
        assert_eq!(failure.to_string(), "provider closed the session");
    }

    #[test]
    fn clones_share_the_error() {
        let failure = ActionFailure::from_error(Box::new(ReceiveTimeout(1)));
        let clone = failure.clone();
        match (&failure, &clone) {
            (ActionFailure::Error(a), ActionFailure::Error(b)) => assert!(Arc::ptr_eq(a, b)),
            _ => panic!("expected error failures"),
        }
    }

    #[test]
    fn panic_payloads() {
        let static_str: Box<dyn Any + Send> = Box::new("boom");
        let owned: Box<dyn Any + Send> = Box::new(String::from("owned boom"));
        let other: Box<dyn Any + Send> = Box::new(42_u32);

        let failure = ActionFailure::from_panic(static_str.as_ref());
        assert!(failure.is_panic());
        assert!(failure.error().is_none());
        assert_eq!(failure.to_string(), "action body panicked: boom");
        assert_eq!(panic_message(owned.as_ref()), "owned boom");
        assert_eq!(panic_message(other.as_ref()), "non-string panic payload");
    }
}
