// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The owner thread's work queue.
//!
//! One FIFO per [`Priority`] band, guarded by a single mutex, with a condition
//! variable that wakes the owner loop when work arrives or the queue shuts
//! down.

use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use parking_lot::{Condvar, Mutex};

use crate::priority::Priority;

/// A unit of work queued for the owner thread.
pub(crate) struct Job {
    pub(crate) work: Box<dyn FnOnce() + Send>,
    /// The submitter's span, entered while the work runs.
    pub(crate) span: tracing::Span,
    /// Set by a synchronous caller that gave up waiting.
    pub(crate) abandoned: Option<Arc<AtomicBool>>,
}

impl Job {
    /// Returns `true` if the submitter no longer wants this job to run.
    #[inline]
    pub(crate) fn is_abandoned(&self) -> bool {
        self.abandoned
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Acquire))
    }
}

impl fmt::Debug for Job {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Job")
            .field("abandoned", &self.is_abandoned())
            .finish_non_exhaustive()
    }
}

#[derive(Default)]
struct QueueState {
    bands: [VecDeque<Job>; Priority::COUNT],
    shut_down: bool,
}

impl QueueState {
    fn pop(&mut self) -> Option<Job> {
        Priority::DESCENDING
            .iter()
            .find_map(|p| self.bands[p.band()].pop_front())
    }

    fn len(&self) -> usize {
        self.bands.iter().map(VecDeque::len).sum()
    }
}

/// Multi-producer, single-consumer priority work queue.
#[derive(Default)]
pub(crate) struct WorkQueue {
    state: Mutex<QueueState>,
    ready: Condvar,
}

impl WorkQueue {
    /// Queues `job` in the band for `priority`.
    ///
    /// Hands the job back if the queue has shut down.
    pub(crate) fn push(&self, priority: Priority, job: Job) -> Result<(), Job> {
        let mut state = self.state.lock();
        if state.shut_down {
            return Err(job);
        }
        state.bands[priority.band()].push_back(job);
        drop(state);
        self.ready.notify_one();
        Ok(())
    }

    /// Takes the next job without waiting.
    pub(crate) fn try_pop(&self) -> Option<Job> {
        let mut state = self.state.lock();
        if state.shut_down {
            return None;
        }
        state.pop()
    }

    /// Waits for the next job. Returns `None` once the queue has shut down.
    pub(crate) fn pop_blocking(&self) -> Option<Job> {
        let mut state = self.state.lock();
        loop {
            if state.shut_down {
                return None;
            }
            if let Some(job) = state.pop() {
                return Some(job);
            }
            self.ready.wait(&mut state);
        }
    }

    /// Waits for the next job until `deadline`.
    ///
    /// Returns `None` on shutdown or when the deadline passes with nothing
    /// queued.
    pub(crate) fn pop_until(&self, deadline: Instant) -> Option<Job> {
        let mut state = self.state.lock();
        loop {
            if state.shut_down {
                return None;
            }
            if let Some(job) = state.pop() {
                return Some(job);
            }
            if self.ready.wait_until(&mut state, deadline).timed_out() {
                return if state.shut_down { None } else { state.pop() };
            }
        }
    }

    /// Number of queued jobs.
    pub(crate) fn len(&self) -> usize {
        self.state.lock().len()
    }

    pub(crate) fn is_shut_down(&self) -> bool {
        self.state.lock().shut_down
    }

    /// Stops accepting work and discards everything still queued.
    ///
    /// Returns the number of discarded jobs. Dropping a job drops its reply
    /// channel, which is how blocked callers learn about the shutdown.
    pub(crate) fn shut_down(&self) -> usize {
        let mut state = self.state.lock();
        state.shut_down = true;
        let discarded = core::mem::take(&mut state.bands);
        drop(state);
        self.ready.notify_all();
        discarded.iter().map(VecDeque::len).sum()
    }
}

impl fmt::Debug for WorkQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock();
        f.debug_struct("WorkQueue")
            .field("len", &state.len())
            .field("shut_down", &state.shut_down)
            .finish_non_exhaustive()
    }
}
