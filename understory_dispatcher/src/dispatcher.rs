// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The [`Dispatcher`] handle and the invocation protocol.

use std::cell::RefCell;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, ThreadId};
use std::time::Duration;

use crossbeam_channel::RecvTimeoutError;

use crate::error::InvokeError;
use crate::priority::Priority;
use crate::queue::{Job, WorkQueue};

thread_local! {
    static CURRENT: RefCell<Option<Dispatcher>> = const { RefCell::new(None) };
}

/// Per-call overrides for [`Dispatcher::invoke_with`].
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use understory_dispatcher::{InvokeOptions, Priority};
///
/// let options = InvokeOptions::new()
///     .timeout(Duration::from_millis(250))
///     .priority(Priority::Input);
/// assert_eq!(options.get_timeout(), Some(Duration::from_millis(250)));
/// ```
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct InvokeOptions {
    timeout: Option<Duration>,
    priority: Priority,
}

impl InvokeOptions {
    /// Options that use the dispatcher's default timeout and
    /// [`Priority::Normal`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the timeout for this call, overriding the dispatcher default.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the priority band the call is queued in.
    #[must_use]
    pub fn priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// Returns the timeout override, if any.
    #[must_use]
    #[inline]
    pub fn get_timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Returns the priority band.
    #[must_use]
    #[inline]
    pub fn get_priority(&self) -> Priority {
        self.priority
    }
}

pub(crate) struct Inner {
    pub(crate) name: Option<String>,
    pub(crate) owner: ThreadId,
    pub(crate) default_timeout: Option<Duration>,
    pub(crate) queue: WorkQueue,
}

/// A handle to an owner thread's work queue.
///
/// Every dispatcher belongs to exactly one thread, the thread that created it
/// with [`DispatcherBuilder::build_for_current_thread`](crate::DispatcherBuilder::build_for_current_thread)
/// (or the thread spawned by [`DispatcherBuilder::spawn`](crate::DispatcherBuilder::spawn)).
/// Handles are cheap to clone and can be sent to any thread.
///
/// [`invoke`](Self::invoke) runs a function on the owner thread and blocks
/// until it has finished:
///
/// - called on the owner thread, the function runs inline;
/// - otherwise it is queued and the caller waits for the result, for at
///   most the configured timeout.
///
/// A panic in the function is resumed on the calling thread with its original
/// payload. With [`try_invoke`](Self::try_invoke), an `Err` returned by the
/// function reaches the caller unchanged.
///
/// # Example
///
/// ```rust
/// use understory_dispatcher::DispatcherBuilder;
///
/// let owner = DispatcherBuilder::new().name("ui").spawn().unwrap();
/// let dispatcher = owner.dispatcher().clone();
///
/// assert!(!dispatcher.check_access());
/// let on_owner = dispatcher.invoke(|| std::thread::current().name().map(String::from));
/// assert_eq!(on_owner, Ok(Some("ui".to_string())));
/// ```
#[derive(Clone)]
pub struct Dispatcher {
    pub(crate) inner: Arc<Inner>,
}

impl Dispatcher {
    pub(crate) fn from_inner(inner: Inner) -> Self {
        Self {
            inner: Arc::new(inner),
        }
    }

    /// Returns the dispatcher owned by the current thread, if any.
    #[must_use]
    pub fn current() -> Option<Self> {
        CURRENT.with(|current| current.borrow().clone())
    }

    pub(crate) fn set_current(dispatcher: Option<Self>) {
        CURRENT.with(|current| *current.borrow_mut() = dispatcher);
    }

    /// Returns the dispatcher's name, if it was given one.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.inner.name.as_deref()
    }

    /// Returns the owner thread's id.
    #[must_use]
    #[inline]
    pub fn owner_thread(&self) -> ThreadId {
        self.inner.owner
    }

    /// Returns the timeout applied to marshaled calls that don't set one.
    ///
    /// `None` means wait indefinitely.
    #[must_use]
    #[inline]
    pub fn default_timeout(&self) -> Option<Duration> {
        self.inner.default_timeout
    }

    /// Returns `true` if the calling thread is the owner thread.
    #[must_use]
    #[inline]
    pub fn check_access(&self) -> bool {
        thread::current().id() == self.inner.owner
    }

    /// Fails with [`InvokeError::WrongThread`] unless called on the owner
    /// thread.
    pub fn verify_access(&self) -> Result<(), InvokeError> {
        if self.check_access() {
            Ok(())
        } else {
            Err(InvokeError::WrongThread)
        }
    }

    /// Returns the number of work items waiting on the owner thread.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.inner.queue.len()
    }

    /// Returns `true` once [`shutdown`](Self::shutdown) has been called.
    #[must_use]
    pub fn has_shut_down(&self) -> bool {
        self.inner.queue.is_shut_down()
    }

    /// Stops the owner loop.
    ///
    /// Work still queued is discarded and its callers see
    /// [`InvokeError::Shutdown`], as does every later marshaled call. Calls
    /// made on the owner thread itself still run inline.
    pub fn shutdown(&self) {
        let discarded = self.inner.queue.shut_down();
        tracing::debug!(dispatcher = ?self.name(), discarded, "dispatcher shut down");
    }

    /// Runs `f` on the owner thread and returns its result.
    ///
    /// Uses the dispatcher's default timeout and [`Priority::Normal`].
    ///
    /// # Errors
    ///
    /// [`InvokeError::Timeout`] if the owner did not service the call in
    /// time, [`InvokeError::Shutdown`] if the dispatcher shut down first.
    ///
    /// # Panics
    ///
    /// If `f` panics, the panic is resumed on the calling thread with the
    /// same payload.
    pub fn invoke<R, F>(&self, f: F) -> Result<R, InvokeError>
    where
        F: FnOnce() -> R + Send + 'static,
        R: Send + 'static,
    {
        self.invoke_with(InvokeOptions::default(), f)
    }

    /// Like [`invoke`](Self::invoke), with per-call options.
    ///
    /// # Errors
    ///
    /// See [`invoke`](Self::invoke).
    pub fn invoke_with<R, F>(&self, options: InvokeOptions, f: F) -> Result<R, InvokeError>
    where
        F: FnOnce() -> R + Send + 'static,
        R: Send + 'static,
    {
        if self.check_access() {
            return Ok(f());
        }

        let (reply_tx, reply_rx) = crossbeam_channel::bounded::<thread::Result<R>>(1);
        let abandoned = Arc::new(AtomicBool::new(false));
        let job = Job {
            work: Box::new(move || {
                let result = panic::catch_unwind(AssertUnwindSafe(f));
                // The caller may have timed out and dropped the receiver.
                let _ = reply_tx.send(result);
            }),
            span: tracing::Span::current(),
            abandoned: Some(Arc::clone(&abandoned)),
        };
        self.enqueue(options.priority, job)?;

        let timeout = options.timeout.or(self.inner.default_timeout);
        let reply = match timeout {
            Some(timeout) => reply_rx.recv_timeout(timeout).map_err(|err| match err {
                RecvTimeoutError::Timeout => {
                    abandoned.store(true, Ordering::Release);
                    tracing::warn!(
                        dispatcher = ?self.name(),
                        ?timeout,
                        "owner thread did not service marshaled call in time"
                    );
                    InvokeError::Timeout { timeout }
                }
                RecvTimeoutError::Disconnected => InvokeError::Shutdown,
            })?,
            None => reply_rx.recv().map_err(|_| InvokeError::Shutdown)?,
        };

        match reply {
            Ok(value) => Ok(value),
            Err(payload) => panic::resume_unwind(payload),
        }
    }

    /// Runs a fallible `f` on the owner thread, returning its own error
    /// unchanged.
    ///
    /// Marshaling failures are converted into `E` through
    /// `From<InvokeError>`, so the caller sees a single error type in which
    /// the function's errors keep their identity.
    ///
    /// # Errors
    ///
    /// Whatever `f` returns, or a converted [`InvokeError`].
    pub fn try_invoke<R, E, F>(&self, f: F) -> Result<R, E>
    where
        F: FnOnce() -> Result<R, E> + Send + 'static,
        R: Send + 'static,
        E: From<InvokeError> + Send + 'static,
    {
        self.try_invoke_with(InvokeOptions::default(), f)
    }

    /// Like [`try_invoke`](Self::try_invoke), with per-call options.
    ///
    /// # Errors
    ///
    /// See [`try_invoke`](Self::try_invoke).
    pub fn try_invoke_with<R, E, F>(&self, options: InvokeOptions, f: F) -> Result<R, E>
    where
        F: FnOnce() -> Result<R, E> + Send + 'static,
        R: Send + 'static,
        E: From<InvokeError> + Send + 'static,
    {
        match self.invoke_with(options, f) {
            Ok(result) => result,
            Err(err) => Err(err.into()),
        }
    }

    /// Queues `f` on the owner thread without waiting for it.
    ///
    /// This always queues, even on the owner thread. A panic in `f` is logged
    /// and does not stop the owner loop.
    ///
    /// # Errors
    ///
    /// [`InvokeError::Shutdown`] if the dispatcher has shut down.
    pub fn begin_invoke<F>(&self, priority: Priority, f: F) -> Result<(), InvokeError>
    where
        F: FnOnce() + Send + 'static,
    {
        let job = Job {
            work: Box::new(move || {
                if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(f)) {
                    tracing::error!(
                        panic = panic_message(payload.as_ref()),
                        "posted work panicked on owner thread"
                    );
                }
            }),
            span: tracing::Span::current(),
            abandoned: None,
        };
        self.enqueue(priority, job)
    }

    fn enqueue(&self, priority: Priority, job: Job) -> Result<(), InvokeError> {
        self.inner.queue.push(priority, job).map_err(|_rejected| {
            tracing::debug!(dispatcher = ?self.name(), "rejected work after shutdown");
            InvokeError::Shutdown
        })?;
        tracing::trace!(dispatcher = ?self.name(), ?priority, "queued work item");
        Ok(())
    }

    /// Runs one dequeued job on the owner thread.
    ///
    /// Returns `false` if the job was skipped because its caller gave up.
    pub(crate) fn run_job(&self, job: Job) -> bool {
        debug_assert!(self.check_access(), "jobs must run on the owner thread");
        if job.is_abandoned() {
            tracing::warn!(dispatcher = ?self.name(), "skipping work abandoned by its caller");
            return false;
        }
        let _guard = job.span.enter();
        (job.work)();
        true
    }
}

impl PartialEq for Dispatcher {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for Dispatcher {}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("name", &self.inner.name)
            .field("owner", &self.inner.owner)
            .field("default_timeout", &self.inner.default_timeout)
            .field("queue", &self.inner.queue)
            .finish()
    }
}

/// Extracts the message from a panic payload, for logging.
pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&'static str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.as_str()
    } else {
        "<non-string panic payload>"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DispatcherBuilder;

    #[test]
    fn options_builder() {
        let options = InvokeOptions::new()
            .timeout(Duration::from_secs(1))
            .priority(Priority::Send);
        assert_eq!(options.get_timeout(), Some(Duration::from_secs(1)));
        assert_eq!(options.get_priority(), Priority::Send);
        assert_eq!(InvokeOptions::new().get_timeout(), None);
    }

    #[test]
    fn owner_thread_access() {
        let event_loop = DispatcherBuilder::new().build_for_current_thread();
        let dispatcher = event_loop.dispatcher().clone();
        assert!(dispatcher.check_access());
        assert_eq!(dispatcher.verify_access(), Ok(()));
        assert_eq!(dispatcher.owner_thread(), thread::current().id());

        let remote = thread::spawn(move || dispatcher.verify_access());
        assert_eq!(remote.join().unwrap(), Err(InvokeError::WrongThread));
    }

    #[test]
    fn invoke_on_owner_runs_inline() {
        let event_loop = DispatcherBuilder::new().build_for_current_thread();
        let dispatcher = event_loop.dispatcher();

        // Nothing pumps the loop here, so queuing would block forever.
        let id = dispatcher.invoke(|| thread::current().id());
        assert_eq!(id, Ok(thread::current().id()));
        assert_eq!(dispatcher.pending(), 0);
    }

    #[test]
    fn current_tracks_the_loop() {
        assert!(Dispatcher::current().is_none());
        {
            let event_loop = DispatcherBuilder::new().build_for_current_thread();
            assert_eq!(Dispatcher::current().as_ref(), Some(event_loop.dispatcher()));
        }
        assert!(Dispatcher::current().is_none());
    }

    #[test]
    fn dispatcher_equality_is_identity() {
        let a = DispatcherBuilder::new().build_for_current_thread();
        let a2 = a.dispatcher().clone();
        assert_eq!(a.dispatcher(), &a2);

        let b = DispatcherBuilder::new().spawn().unwrap();
        assert_ne!(a.dispatcher(), b.dispatcher());
    }

    #[test]
    fn panic_message_extracts_strings() {
        let literal: Box<dyn std::any::Any + Send> = Box::new("static");
        let owned: Box<dyn std::any::Any + Send> = Box::new(String::from("owned"));
        let other: Box<dyn std::any::Any + Send> = Box::new(7_u8);
        assert_eq!(panic_message(literal.as_ref()), "static");
        assert_eq!(panic_message(owned.as_ref()), "owned");
        assert_eq!(panic_message(other.as_ref()), "<non-string panic payload>");
    }

    #[test]
    fn debug_names_the_dispatcher() {
        let event_loop = DispatcherBuilder::new().name("main").build_for_current_thread();
        let debug = format!("{:?}", event_loop.dispatcher());
        assert!(debug.contains("Dispatcher"));
        assert!(debug.contains("main"));
    }
}
