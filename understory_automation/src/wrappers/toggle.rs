// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::fmt;
use std::sync::Arc;

use super::call_provider;
use crate::element::ElementContext;
use crate::error::AutomationError;
use crate::provider::{ToggleProvider, ToggleState};

/// Client-side wrapper for the Toggle pattern.
#[derive(Clone)]
pub struct ToggleProviderWrapper {
    element: ElementContext,
    provider: Arc<dyn ToggleProvider>,
}

impl ToggleProviderWrapper {
    /// Wraps `provider` for the element described by `element`.
    #[must_use]
    pub fn new(element: ElementContext, provider: Arc<dyn ToggleProvider>) -> Self {
        Self { element, provider }
    }

    /// Returns the element this wrapper is bound to.
    #[must_use]
    #[inline]
    pub fn element(&self) -> &ElementContext {
        &self.element
    }

    /// Reads the current toggle state.
    pub fn toggle_state(&self) -> Result<ToggleState, AutomationError> {
        call_provider(&self.element, &self.provider, |p| Ok(p.toggle_state()))
    }

    /// Advances to the next toggle state.
    pub fn toggle(&self) -> Result<(), AutomationError> {
        call_provider(&self.element, &self.provider, |p| p.toggle())
    }
}

impl fmt::Debug for ToggleProviderWrapper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToggleProviderWrapper")
            .field("element", &self.element)
            .finish_non_exhaustive()
    }
}
