// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::fmt;
use std::sync::Arc;

use super::call_provider;
use crate::element::ElementContext;
use crate::error::AutomationError;
use crate::provider::RangeValueProvider;

/// All `RangeValue` properties, read in a single owner-thread call.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RangeValueSnapshot {
    /// Current value.
    pub value: f64,
    /// Smallest allowed value.
    pub minimum: f64,
    /// Largest allowed value.
    pub maximum: f64,
    /// Large increment.
    pub large_change: f64,
    /// Small increment.
    pub small_change: f64,
    /// Whether the value can be changed.
    pub is_read_only: bool,
}

/// Client-side wrapper for the `RangeValue` pattern.
///
/// [`set_value`](Self::set_value) is checked on the owner thread before the
/// provider sees it: a read-only element rejects it with
/// [`AutomationError::InvalidOperation`], and a value outside
/// `[minimum, maximum]` (or not finite) with
/// [`AutomationError::ArgumentOutOfRange`].
#[derive(Clone)]
pub struct RangeValueProviderWrapper {
    element: ElementContext,
    provider: Arc<dyn RangeValueProvider>,
}

impl RangeValueProviderWrapper {
    /// Wraps `provider` for the element described by `element`.
    #[must_use]
    pub fn new(element: ElementContext, provider: Arc<dyn RangeValueProvider>) -> Self {
        Self { element, provider }
    }

    /// Returns the element this wrapper is bound to.
    #[must_use]
    #[inline]
    pub fn element(&self) -> &ElementContext {
        &self.element
    }

    /// Reads the current value.
    pub fn value(&self) -> Result<f64, AutomationError> {
        call_provider(&self.element, &self.provider, |p| Ok(p.value()))
    }

    /// Reads the minimum.
    pub fn minimum(&self) -> Result<f64, AutomationError> {
        call_provider(&self.element, &self.provider, |p| Ok(p.minimum()))
    }

    /// Reads the maximum.
    pub fn maximum(&self) -> Result<f64, AutomationError> {
        call_provider(&self.element, &self.provider, |p| Ok(p.maximum()))
    }

    /// Reads the large increment.
    pub fn large_change(&self) -> Result<f64, AutomationError> {
        call_provider(&self.element, &self.provider, |p| Ok(p.large_change()))
    }

    /// Reads the small increment.
    pub fn small_change(&self) -> Result<f64, AutomationError> {
        call_provider(&self.element, &self.provider, |p| Ok(p.small_change()))
    }

    /// Reads whether the value is read-only.
    pub fn is_read_only(&self) -> Result<bool, AutomationError> {
        call_provider(&self.element, &self.provider, |p| Ok(p.is_read_only()))
    }

    /// Reads every property at once, so the values are consistent with each
    /// other.
    pub fn snapshot(&self) -> Result<RangeValueSnapshot, AutomationError> {
        call_provider(&self.element, &self.provider, |p| {
            Ok(RangeValueSnapshot {
                value: p.value(),
                minimum: p.minimum(),
                maximum: p.maximum(),
                large_change: p.large_change(),
                small_change: p.small_change(),
                is_read_only: p.is_read_only(),
            })
        })
    }

    /// Sets the value.
    pub fn set_value(&self, value: f64) -> Result<(), AutomationError> {
        call_provider(&self.element, &self.provider, move |p| {
            if p.is_read_only() {
                return Err(AutomationError::invalid_operation("range value is read-only"));
            }
            if !value.is_finite() || value < p.minimum() || value > p.maximum() {
                return Err(AutomationError::ArgumentOutOfRange {
                    name: "value",
                    value,
                });
            }
            p.set_value(value)
        })
    }
}

impl fmt::Debug for RangeValueProviderWrapper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RangeValueProviderWrapper")
            .field("element", &self.element)
            .finish_non_exhaustive()
    }
}
