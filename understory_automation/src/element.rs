// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The wrapper's handle on a peer and its owner thread.

use core::fmt;
use std::sync::{Arc, Weak};

use understory_dispatcher::{Dispatcher, InvokeOptions};

use crate::error::AutomationError;
use crate::provider::AutomationPeer;

/// A non-owning reference to a peer together with its owner dispatcher.
///
/// All access to the peer goes through [`call`](Self::call), which runs on
/// the owner thread and fails with [`AutomationError::ElementNotAvailable`]
/// once the peer has been dropped.
#[derive(Clone)]
pub struct ElementContext {
    peer: Weak<dyn AutomationPeer>,
    dispatcher: Dispatcher,
    options: InvokeOptions,
}

impl ElementContext {
    /// Creates a context for `peer`, capturing its dispatcher.
    #[must_use]
    pub fn new(peer: &Arc<dyn AutomationPeer>) -> Self {
        Self {
            peer: Arc::downgrade(peer),
            dispatcher: peer.dispatcher().clone(),
            options: InvokeOptions::default(),
        }
    }

    /// Uses `options` (timeout, priority) for every call made through this
    /// context.
    #[must_use]
    pub fn with_options(mut self, options: InvokeOptions) -> Self {
        self.options = options;
        self
    }

    /// Returns the peer's owner dispatcher.
    #[must_use]
    #[inline]
    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Returns the invocation options used for calls.
    #[must_use]
    #[inline]
    pub fn options(&self) -> InvokeOptions {
        self.options
    }

    /// Returns `true` while the peer is still alive.
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.peer.strong_count() > 0
    }

    /// Runs `f` against the peer on its owner thread.
    ///
    /// The peer is kept alive for the duration of the call.
    ///
    /// # Errors
    ///
    /// [`AutomationError::ElementNotAvailable`] if the peer is gone, whatever
    /// `f` returns, or a marshaling failure as [`AutomationError::Invoke`].
    pub fn call<R, F>(&self, f: F) -> Result<R, AutomationError>
    where
        F: FnOnce(&dyn AutomationPeer) -> Result<R, AutomationError> + Send + 'static,
        R: Send + 'static,
    {
        let peer = self.peer.clone();
        self.dispatcher.try_invoke_with(self.options, move || {
            let peer = peer.upgrade().ok_or(AutomationError::ElementNotAvailable)?;
            f(&*peer)
        })
    }
}

impl fmt::Debug for ElementContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ElementContext")
            .field("available", &self.is_available())
            .field("dispatcher", &self.dispatcher)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}
