// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::fmt;
use std::sync::Arc;

use super::call_provider;
use crate::element::ElementContext;
use crate::error::AutomationError;
use crate::provider::ScrollItemProvider;

/// Client-side wrapper for the `ScrollItem` pattern.
#[derive(Clone)]
pub struct ScrollItemProviderWrapper {
    element: ElementContext,
    provider: Arc<dyn ScrollItemProvider>,
}

impl ScrollItemProviderWrapper {
    /// Wraps `provider` for the element described by `element`.
    #[must_use]
    pub fn new(element: ElementContext, provider: Arc<dyn ScrollItemProvider>) -> Self {
        Self { element, provider }
    }

    /// Returns the element this wrapper is bound to.
    #[must_use]
    #[inline]
    pub fn element(&self) -> &ElementContext {
        &self.element
    }

    /// Scrolls the containing viewport until the item is visible.
    pub fn scroll_into_view(&self) -> Result<(), AutomationError> {
        call_provider(&self.element, &self.provider, |p| p.scroll_into_view())
    }
}

impl fmt::Debug for ScrollItemProviderWrapper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScrollItemProviderWrapper")
            .field("element", &self.element)
            .finish_non_exhaustive()
    }
}
