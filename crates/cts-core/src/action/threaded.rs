//! Running an action body on its own thread.
//!
//! A [`ThreadedAction`] bundles the body, an optional completion listener and
//! spawn options. Starting it consumes it, so an action runs at most once;
//! what remains is the [`ActionHandle`] used to wait on and inspect it.
//!
//! The worker thread always follows the same sequence:
//!
//! 1. record the start time
//! 2. run the body, catching both returned errors and panics
//! 3. record the end time
//! 4. store any failure
//! 5. release the completion latch
//! 6. notify the listener, if any
//!
//! Waiters are woken at step 5, so they may observe completion while the
//! listener is still running.

use std::io;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread;

use cts_common::{ActionId, Error, Result};
use cts_config::harness::{HarnessConfig, DEFAULT_THREAD_NAME_PREFIX};
use tracing::{debug, trace, warn};

use super::failure::{panic_message, ActionFailure, BodyError};
use super::handle::{ActionHandle, ActionState};
use super::listener::CompletionListener;

/// The work performed by an action.
///
/// Any `FnMut() -> Result<(), E>` closure whose error converts into a
/// [`BodyError`] is an action body.
pub trait ActionBody: Send {
    fn run_protected(&mut self) -> std::result::Result<(), BodyError>;
}

impl<F, E> ActionBody for F
where
    F: FnMut() -> std::result::Result<(), E> + Send,
    E: Into<BodyError>,
{
    fn run_protected(&mut self) -> std::result::Result<(), BodyError> {
        self().map_err(Into::into)
    }
}

/// How worker threads are spawned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionOptions {
    /// Unnamed actions run on threads named `<prefix>-<short id>`.
    pub thread_name_prefix: String,
    pub stack_size: Option<usize>,
}

impl Default for ActionOptions {
    fn default() -> Self {
        Self {
            thread_name_prefix: DEFAULT_THREAD_NAME_PREFIX.to_string(),
            stack_size: None,
        }
    }
}

impl ActionOptions {
    pub fn from_config(config: &HarnessConfig) -> Self {
        Self {
            thread_name_prefix: config.thread_name_prefix.clone(),
            stack_size: config.thread_stack_size,
        }
    }
}

/// An action that has not been started yet.
pub struct ThreadedAction {
    id: ActionId,
    name: Option<String>,
    body: Box<dyn ActionBody>,
    listener: Option<Box<dyn CompletionListener>>,
    options: ActionOptions,
}

impl ThreadedAction {
    /// Construct an action without a completion listener.
    pub fn new(body: impl ActionBody + 'static) -> Self {
        Self {
            id: ActionId::new(),
            name: None,
            body: Box::new(body),
            listener: None,
            options: ActionOptions::default(),
        }
    }

    /// Construct an action whose listener is notified when it finishes.
    pub fn with_listener(
        body: impl ActionBody + 'static,
        listener: impl CompletionListener + 'static,
    ) -> Self {
        let mut action = Self::new(body);
        action.listener = Some(Box::new(listener));
        action
    }

    /// Give the action a name; used for the worker thread and in reports.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_options(mut self, options: ActionOptions) -> Self {
        self.options = options;
        self
    }

    pub fn id(&self) -> &ActionId {
        &self.id
    }

    /// Spawn a worker thread that runs the action and return at once.
    ///
    /// Fails with [`Error::Spawn`] if the thread name contains a NUL byte or
    /// the OS refuses to create the thread; the body is not run in either case.
    pub fn start(self) -> Result<ActionHandle> {
        let options = self.options.clone();
        let (handle, worker) = self.prepare();

        if handle.name().contains('\0') {
            return Err(Error::Spawn {
                action: handle.id().to_string(),
                source: io::Error::new(
                    io::ErrorKind::InvalidInput,
                    "thread name contains a NUL byte",
                ),
            });
        }

        let mut builder = thread::Builder::new().name(handle.name().to_string());
        if let Some(size) = options.stack_size {
            builder = builder.stack_size(size);
        }

        builder
            .spawn(move || worker.execute())
            .map_err(|source| Error::Spawn {
                action: handle.id().to_string(),
                source,
            })?;

        Ok(handle)
    }

    /// Run the action on the current thread.
    ///
    /// The returned handle is already complete.
    pub fn run(self) -> ActionHandle {
        let (handle, worker) = self.prepare();
        worker.execute();
        handle
    }

    fn prepare(self) -> (ActionHandle, Worker) {
        let name = self
            .name
            .unwrap_or_else(|| format!("{}-{}", self.options.thread_name_prefix, self.id.short()));
        let state = Arc::new(ActionState::new(self.id, name));
        let worker = Worker {
            state: Arc::clone(&state),
            body: self.body,
            listener: self.listener,
        };
        (ActionHandle::new(state), worker)
    }
}

struct Worker {
    state: Arc<ActionState>,
    body: Box<dyn ActionBody>,
    listener: Option<Box<dyn CompletionListener>>,
}

impl Worker {
    fn execute(self) {
        let Worker {
            state,
            mut body,
            listener,
        } = self;

        trace!(action_id = %state.id, name = %state.name, "action started");
        state.mark_started();
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| body.run_protected()));
        state.mark_ended();

        let failure = match outcome {
            Ok(Ok(())) => None,
            Ok(Err(err)) => Some(ActionFailure::from_error(err)),
            Err(payload) => Some(ActionFailure::from_panic(payload.as_ref())),
        };
        if let Some(failure) = failure {
            debug!(
                action_id = %state.id,
                name = %state.name,
                error = %failure,
                "action caught failure"
            );
            state.record_failure(failure);
        }

        state.complete();
        trace!(action_id = %state.id, name = %state.name, "action completed");

        if let Some(listener) = listener {
            if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(|| listener.completed())) {
                warn!(
                    action_id = %state.id,
                    panic = %panic_message(payload.as_ref()),
                    "completion listener panicked"
                );
            }
        }
    }
}
