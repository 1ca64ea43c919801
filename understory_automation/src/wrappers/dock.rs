// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::fmt;
use std::sync::Arc;

use super::call_provider;
use crate::element::ElementContext;
use crate::error::AutomationError;
use crate::provider::{DockPosition, DockProvider};

/// Client-side wrapper for the Dock pattern.
#[derive(Clone)]
pub struct DockProviderWrapper {
    element: ElementContext,
    provider: Arc<dyn DockProvider>,
}

impl DockProviderWrapper {
    /// Wraps `provider` for the element described by `element`.
    #[must_use]
    pub fn new(element: ElementContext, provider: Arc<dyn DockProvider>) -> Self {
        Self { element, provider }
    }

    /// Returns the element this wrapper is bound to.
    #[must_use]
    #[inline]
    pub fn element(&self) -> &ElementContext {
        &self.element
    }

    /// Reads the dock position.
    pub fn dock_position(&self) -> Result<DockPosition, AutomationError> {
        call_provider(&self.element, &self.provider, |p| Ok(p.dock_position()))
    }

    /// Docks the element at `position`.
    pub fn set_dock_position(&self, position: DockPosition) -> Result<(), AutomationError> {
        call_provider(&self.element, &self.provider, move |p| {
            p.set_dock_position(position)
        })
    }
}

impl fmt::Debug for DockProviderWrapper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DockProviderWrapper")
            .field("element", &self.element)
            .finish_non_exhaustive()
    }
}
