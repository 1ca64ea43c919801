// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors introduced by marshaling itself.

use std::time::Duration;

use thiserror::Error;

/// A failure of the dispatcher to run a call, as opposed to a failure of the
/// call.
///
/// Errors returned by the marshaled function never appear here: they are
/// handed back to the caller unchanged (see
/// [`Dispatcher::try_invoke`](crate::Dispatcher::try_invoke)).
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum InvokeError {
    /// The owner thread did not service the call in time.
    ///
    /// The queued work is abandoned on a best-effort basis: it is skipped if
    /// it has not started yet, and otherwise runs to completion with its
    /// result discarded.
    #[error("owner thread did not service the call within {timeout:?}")]
    Timeout {
        /// The timeout that elapsed.
        timeout: Duration,
    },

    /// The dispatcher has shut down, so the call was not (or will not be) run.
    #[error("dispatcher has shut down")]
    Shutdown,

    /// The calling thread is not the dispatcher's owner thread.
    #[error("calling thread does not own this dispatcher")]
    WrongThread,
}

impl InvokeError {
    /// Returns `true` if this is [`InvokeError::Timeout`].
    #[must_use]
    #[inline]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}
