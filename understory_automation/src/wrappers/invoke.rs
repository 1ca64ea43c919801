// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::fmt;
use std::sync::Arc;

use super::call_provider;
use crate::element::ElementContext;
use crate::error::AutomationError;
use crate::provider::InvokeProvider;

/// Client-side wrapper for the Invoke pattern.
#[derive(Clone)]
pub struct InvokeProviderWrapper {
    element: ElementContext,
    provider: Arc<dyn InvokeProvider>,
}

impl InvokeProviderWrapper {
    /// Wraps `provider` for the element described by `element`.
    #[must_use]
    pub fn new(element: ElementContext, provider: Arc<dyn InvokeProvider>) -> Self {
        Self { element, provider }
    }

    /// Returns the element this wrapper is bound to.
    #[must_use]
    #[inline]
    pub fn element(&self) -> &ElementContext {
        &self.element
    }

    /// Performs the element's action.
    pub fn invoke(&self) -> Result<(), AutomationError> {
        call_provider(&self.element, &self.provider, |p| p.invoke())
    }
}

impl fmt::Debug for InvokeProviderWrapper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InvokeProviderWrapper")
            .field("element", &self.element)
            .finish_non_exhaustive()
    }
}
