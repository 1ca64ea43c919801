// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::fmt;
use std::sync::Arc;

use super::call_provider;
use crate::element::ElementContext;
use crate::error::AutomationError;
use crate::provider::ValueProvider;

/// Client-side wrapper for the Value pattern.
#[derive(Clone)]
pub struct ValueProviderWrapper {
    element: ElementContext,
    provider: Arc<dyn ValueProvider>,
}

impl ValueProviderWrapper {
    /// Wraps `provider` for the element described by `element`.
    #[must_use]
    pub fn new(element: ElementContext, provider: Arc<dyn ValueProvider>) -> Self {
        Self { element, provider }
    }

    /// Returns the element this wrapper is bound to.
    #[must_use]
    #[inline]
    pub fn element(&self) -> &ElementContext {
        &self.element
    }

    /// Reads the current value.
    pub fn value(&self) -> Result<String, AutomationError> {
        call_provider(&self.element, &self.provider, |p| Ok(p.value()))
    }

    /// Reads whether the value is read-only.
    pub fn is_read_only(&self) -> Result<bool, AutomationError> {
        call_provider(&self.element, &self.provider, |p| Ok(p.is_read_only()))
    }

    /// Sets the value. Fails with [`AutomationError::InvalidOperation`] if the
    /// element is read-only.
    pub fn set_value(&self, value: &str) -> Result<(), AutomationError> {
        let value = value.to_owned();
        call_provider(&self.element, &self.provider, move |p| {
            if p.is_read_only() {
                return Err(AutomationError::invalid_operation("value is read-only"));
            }
            p.set_value(&value)
        })
    }
}

impl fmt::Debug for ValueProviderWrapper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValueProviderWrapper")
            .field("element", &self.element)
            .finish_non_exhaustive()
    }
}
