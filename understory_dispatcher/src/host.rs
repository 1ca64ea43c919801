// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hosting a dispatcher: the builder, the owner loop, and a spawned owner
//! thread.

use std::io;
use std::marker::PhantomData;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::dispatcher::{Dispatcher, Inner};
use crate::queue::WorkQueue;

/// Configures and creates a [`Dispatcher`].
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use understory_dispatcher::DispatcherBuilder;
///
/// let event_loop = DispatcherBuilder::new()
///     .name("main")
///     .default_timeout(Duration::from_secs(5))
///     .build_for_current_thread();
///
/// let dispatcher = event_loop.dispatcher();
/// assert!(dispatcher.check_access());
/// assert_eq!(dispatcher.name(), Some("main"));
/// ```
#[derive(Clone, Debug, Default)]
pub struct DispatcherBuilder {
    name: Option<String>,
    default_timeout: Option<Duration>,
}

impl DispatcherBuilder {
    /// Creates a builder with no name and no default timeout.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Names the dispatcher. [`spawn`](Self::spawn) also uses this as the
    /// thread name.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the timeout for marshaled calls that don't specify one.
    #[must_use]
    pub fn default_timeout(mut self, timeout: Duration) -> Self {
        self.default_timeout = Some(timeout);
        self
    }

    /// Makes the current thread the owner of a new dispatcher.
    ///
    /// The returned loop must be driven with [`DispatcherLoop::run`] or one of
    /// the pump methods for marshaled work to execute.
    ///
    /// # Panics
    ///
    /// Panics if the current thread already owns a dispatcher.
    #[must_use]
    pub fn build_for_current_thread(self) -> DispatcherLoop {
        assert!(
            Dispatcher::current().is_none(),
            "thread already owns a dispatcher"
        );
        let dispatcher = Dispatcher::from_inner(Inner {
            name: self.name,
            owner: thread::current().id(),
            default_timeout: self.default_timeout,
            queue: WorkQueue::default(),
        });
        Dispatcher::set_current(Some(dispatcher.clone()));
        tracing::debug!(dispatcher = ?dispatcher.name(), "dispatcher started");
        DispatcherLoop {
            dispatcher,
            _not_send: PhantomData,
        }
    }

    /// Spawns a thread that owns a new dispatcher and runs its loop until
    /// shutdown.
    ///
    /// # Errors
    ///
    /// Returns an error if the thread could not be spawned.
    pub fn spawn(self) -> io::Result<DispatcherThread> {
        let (ready_tx, ready_rx) = crossbeam_channel::bounded(1);
        let mut thread = thread::Builder::new();
        if let Some(name) = &self.name {
            thread = thread.name(name.clone());
        }
        let handle = thread.spawn(move || {
            let event_loop = self.build_for_current_thread();
            if ready_tx.send(event_loop.dispatcher().clone()).is_ok() {
                event_loop.run();
            }
        })?;
        let dispatcher = ready_rx
            .recv()
            .map_err(|_| io::Error::other("dispatcher thread exited during startup"))?;
        Ok(DispatcherThread {
            dispatcher,
            handle: Some(handle),
        })
    }
}

/// The owner side of a [`Dispatcher`], bound to the thread that built it.
///
/// Dropping the loop shuts the dispatcher down.
#[derive(Debug)]
pub struct DispatcherLoop {
    dispatcher: Dispatcher,
    _not_send: PhantomData<*const ()>,
}

impl DispatcherLoop {
    /// Returns the dispatcher this loop services.
    #[must_use]
    #[inline]
    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Runs queued work until the dispatcher shuts down.
    pub fn run(&self) {
        tracing::debug!(dispatcher = ?self.dispatcher.name(), "owner loop running");
        while let Some(job) = self.dispatcher.inner.queue.pop_blocking() {
            tracing::trace!(dispatcher = ?self.dispatcher.name(), "dispatching work item");
            self.dispatcher.run_job(job);
        }
        tracing::debug!(dispatcher = ?self.dispatcher.name(), "owner loop exited");
    }

    /// Runs everything queued right now, without waiting.
    ///
    /// Work queued by the executed items is also run. Returns the number of
    /// items executed; abandoned items are skipped and not counted.
    pub fn pump(&self) -> usize {
        let mut executed = 0;
        while let Some(job) = self.dispatcher.inner.queue.try_pop() {
            if self.dispatcher.run_job(job) {
                executed += 1;
            }
        }
        executed
    }

    /// Runs work as it arrives until `deadline` or shutdown.
    ///
    /// Returns the number of items executed.
    pub fn pump_until(&self, deadline: Instant) -> usize {
        let mut executed = 0;
        while Instant::now() < deadline {
            let Some(job) = self.dispatcher.inner.queue.pop_until(deadline) else {
                break;
            };
            if self.dispatcher.run_job(job) {
                executed += 1;
            }
        }
        executed
    }
}

impl Drop for DispatcherLoop {
    fn drop(&mut self) {
        if !self.dispatcher.has_shut_down() {
            self.dispatcher.shutdown();
        }
        if Dispatcher::current().as_ref() == Some(&self.dispatcher) {
            Dispatcher::set_current(None);
        }
    }
}

/// A dispatcher running on a thread of its own.
///
/// Dropping the handle shuts the dispatcher down and joins the thread.
#[derive(Debug)]
pub struct DispatcherThread {
    dispatcher: Dispatcher,
    handle: Option<JoinHandle<()>>,
}

impl DispatcherThread {
    /// Returns the dispatcher owned by the spawned thread.
    #[must_use]
    #[inline]
    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Shuts the dispatcher down and waits for the thread to exit.
    ///
    /// # Errors
    ///
    /// Returns the panic payload if the owner thread panicked outside of
    /// dispatched work.
    pub fn join(mut self) -> thread::Result<()> {
        self.dispatcher.shutdown();
        match self.handle.take() {
            Some(handle) => handle.join(),
            None => Ok(()),
        }
    }
}

impl Drop for DispatcherThread {
    fn drop(&mut self) {
        let Some(handle) = self.handle.take() else {
            return;
        };
        self.dispatcher.shutdown();
        // Joining from the owner thread would wait on itself.
        if !self.dispatcher.check_access() && handle.join().is_err() {
            tracing::warn!(dispatcher = ?self.dispatcher.name(), "owner thread panicked");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Priority;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn pump_runs_posted_work() {
        let event_loop = DispatcherBuilder::new().build_for_current_thread();
        let dispatcher = event_loop.dispatcher();
        let count = Arc::new(AtomicUsize::new(0));
        for _ in 0..3 {
            let count = Arc::clone(&count);
            dispatcher
                .begin_invoke(Priority::Normal, move || {
                    count.fetch_add(1, Ordering::SeqCst);
                })
                .unwrap();
        }
        assert_eq!(dispatcher.pending(), 3);
        assert_eq!(event_loop.pump(), 3);
        assert_eq!(count.load(Ordering::SeqCst), 3);
        assert_eq!(event_loop.pump(), 0);
    }

    #[test]
    fn pump_runs_work_queued_by_work() {
        let event_loop = DispatcherBuilder::new().build_for_current_thread();
        let dispatcher = event_loop.dispatcher().clone();
        let count = Arc::new(AtomicUsize::new(0));
        let inner_count = Arc::clone(&count);
        let inner_dispatcher = dispatcher.clone();
        dispatcher
            .begin_invoke(Priority::Normal, move || {
                inner_dispatcher
                    .begin_invoke(Priority::Normal, move || {
                        inner_count.fetch_add(1, Ordering::SeqCst);
                    })
                    .unwrap();
            })
            .unwrap();
        assert_eq!(event_loop.pump(), 2);
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn pump_until_stops_at_deadline() {
        let event_loop = DispatcherBuilder::new().build_for_current_thread();
        let start = Instant::now();
        assert_eq!(event_loop.pump_until(start + Duration::from_millis(20)), 0);
        assert!(start.elapsed() >= Duration::from_millis(20));
    }

    #[test]
    fn dropping_the_loop_shuts_down() {
        let event_loop = DispatcherBuilder::new().build_for_current_thread();
        let dispatcher = event_loop.dispatcher().clone();
        drop(event_loop);
        assert!(dispatcher.has_shut_down());
        assert!(dispatcher.begin_invoke(Priority::Normal, || {}).is_err());
    }

    #[test]
    #[should_panic(expected = "already owns a dispatcher")]
    fn one_dispatcher_per_thread() {
        let _first = DispatcherBuilder::new().build_for_current_thread();
        let _second = DispatcherBuilder::new().build_for_current_thread();
    }

    #[test]
    fn spawned_thread_is_named_and_joins() {
        let owner = DispatcherBuilder::new().name("automation").spawn().unwrap();
        let name = owner
            .dispatcher()
            .invoke(|| thread::current().name().map(String::from))
            .unwrap();
        assert_eq!(name.as_deref(), Some("automation"));

        let dispatcher = owner.dispatcher().clone();
        owner.join().unwrap();
        assert!(dispatcher.has_shut_down());
    }
}
