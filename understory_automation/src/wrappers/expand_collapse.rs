// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::fmt;
use std::sync::Arc;

use super::call_provider;
use crate::element::ElementContext;
use crate::error::AutomationError;
use crate::provider::{ExpandCollapseProvider, ExpandCollapseState};

/// Client-side wrapper for the `ExpandCollapse` pattern.
///
/// Expanding or collapsing a [`ExpandCollapseState::LeafNode`] fails with
/// [`AutomationError::InvalidOperation`].
#[derive(Clone)]
pub struct ExpandCollapseProviderWrapper {
    element: ElementContext,
    provider: Arc<dyn ExpandCollapseProvider>,
}

impl ExpandCollapseProviderWrapper {
    /// Wraps `provider` for the element described by `element`.
    #[must_use]
    pub fn new(element: ElementContext, provider: Arc<dyn ExpandCollapseProvider>) -> Self {
        Self { element, provider }
    }

    /// Returns the element this wrapper is bound to.
    #[must_use]
    #[inline]
    pub fn element(&self) -> &ElementContext {
        &self.element
    }

    /// Reads the current state.
    pub fn expand_collapse_state(&self) -> Result<ExpandCollapseState, AutomationError> {
        call_provider(&self.element, &self.provider, |p| {
            Ok(p.expand_collapse_state())
        })
    }

    /// Shows the element's child content.
    pub fn expand(&self) -> Result<(), AutomationError> {
        call_provider(&self.element, &self.provider, |p| {
            reject_leaf(p, "expand")?;
            p.expand()
        })
    }

    /// Hides the element's child content.
    pub fn collapse(&self) -> Result<(), AutomationError> {
        call_provider(&self.element, &self.provider, |p| {
            reject_leaf(p, "collapse")?;
            p.collapse()
        })
    }
}

fn reject_leaf(provider: &dyn ExpandCollapseProvider, action: &str) -> Result<(), AutomationError> {
    if provider.expand_collapse_state() == ExpandCollapseState::LeafNode {
        Err(AutomationError::invalid_operation(format!(
            "cannot {action} a leaf node"
        )))
    } else {
        Ok(())
    }
}

impl fmt::Debug for ExpandCollapseProviderWrapper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExpandCollapseProviderWrapper")
            .field("element", &self.element)
            .finish_non_exhaustive()
    }
}
