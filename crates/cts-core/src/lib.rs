//! Threaded action harness for JMS provider conformance tests.
//!
//! A test driver wraps a piece of test logic in a [`ThreadedAction`], starts
//! it on its own OS thread and keeps the returned [`ActionHandle`]. The
//! handle is used to wait (with or without a bound) for the action to finish
//! and then to inspect how long it ran and whether it failed.
//!
//! ```no_run
//! use std::time::Duration;
//! use cts_core::{ThreadedAction, CountingListener};
//!
//! let listener = CountingListener::new();
//! let handle = ThreadedAction::with_listener(
//!     || -> Result<(), std::io::Error> {
//!         std::thread::sleep(Duration::from_millis(50));
//!         Ok(())
//!     },
//!     listener.clone(),
//! )
//! .start()?;
//!
//! assert!(handle.wait_for_completion_timeout(Duration::from_secs(5)));
//! assert!(handle.failure().is_none());
//! # Ok::<(), cts_common::Error>(())
//! ```

pub mod action;
pub mod logging;

pub use action::{
    wait_all, ActionBody, ActionFailure, ActionHandle, ActionOptions, ActionReport, ActionStatus,
    BodyError, CompletionLatch, CompletionListener, CountingListener, ThreadedAction,
};
