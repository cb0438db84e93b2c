//! Threaded action execution.

pub mod failure;
pub mod handle;
pub mod latch;
pub mod listener;
pub mod report;
pub mod threaded;

pub use failure::{ActionFailure, BodyError};
pub use handle::{wait_all, ActionHandle};
pub use latch::CompletionLatch;
pub use listener::{CompletionListener, CountingListener};
pub use report::{ActionReport, ActionStatus};
pub use threaded::{ActionBody, ActionOptions, ThreadedAction};
