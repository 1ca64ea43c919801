// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::fmt;
use std::sync::Arc;

use super::{call_provider, finite};
use crate::element::ElementContext;
use crate::error::AutomationError;
use crate::provider::{TransformCapabilities, TransformProvider};

/// Client-side wrapper for the Transform pattern.
///
/// Each operation first checks the matching `can_*` flag on the owner thread
/// and fails with [`AutomationError::InvalidOperation`] when it is false.
/// Arguments are then validated: coordinates and angles must be finite, and
/// sizes must be finite and non-negative.
#[derive(Clone)]
pub struct TransformProviderWrapper {
    element: ElementContext,
    provider: Arc<dyn TransformProvider>,
}

impl TransformProviderWrapper {
    /// Wraps `provider` for the element described by `element`.
    #[must_use]
    pub fn new(element: ElementContext, provider: Arc<dyn TransformProvider>) -> Self {
        Self { element, provider }
    }

    /// Returns the element this wrapper is bound to.
    #[must_use]
    #[inline]
    pub fn element(&self) -> &ElementContext {
        &self.element
    }

    /// Reads whether the element can be moved.
    pub fn can_move(&self) -> Result<bool, AutomationError> {
        call_provider(&self.element, &self.provider, |p| Ok(p.can_move()))
    }

    /// Reads whether the element can be resized.
    pub fn can_resize(&self) -> Result<bool, AutomationError> {
        call_provider(&self.element, &self.provider, |p| Ok(p.can_resize()))
    }

    /// Reads whether the element can be rotated.
    pub fn can_rotate(&self) -> Result<bool, AutomationError> {
        call_provider(&self.element, &self.provider, |p| Ok(p.can_rotate()))
    }

    /// Reads all three capability flags in one call.
    pub fn capabilities(&self) -> Result<TransformCapabilities, AutomationError> {
        call_provider(&self.element, &self.provider, |p| Ok(capabilities_of(p)))
    }

    /// Moves the element to `(x, y)`.
    pub fn move_to(&self, x: f64, y: f64) -> Result<(), AutomationError> {
        call_provider(&self.element, &self.provider, move |p| {
            if !p.can_move() {
                return Err(AutomationError::invalid_operation("element cannot be moved"));
            }
            p.move_to(finite("x", x)?, finite("y", y)?)
        })
    }

    /// Resizes the element to `width` by `height`.
    pub fn resize(&self, width: f64, height: f64) -> Result<(), AutomationError> {
        call_provider(&self.element, &self.provider, move |p| {
            if !p.can_resize() {
                return Err(AutomationError::invalid_operation("element cannot be resized"));
            }
            p.resize(extent("width", width)?, extent("height", height)?)
        })
    }

    /// Rotates the element by `degrees`.
    pub fn rotate(&self, degrees: f64) -> Result<(), AutomationError> {
        call_provider(&self.element, &self.provider, move |p| {
            if !p.can_rotate() {
                return Err(AutomationError::invalid_operation("element cannot be rotated"));
            }
            p.rotate(finite("degrees", degrees)?)
        })
    }
}

fn capabilities_of(provider: &dyn TransformProvider) -> TransformCapabilities {
    let mut caps = TransformCapabilities::empty();
    caps.set(TransformCapabilities::MOVE, provider.can_move());
    caps.set(TransformCapabilities::RESIZE, provider.can_resize());
    caps.set(TransformCapabilities::ROTATE, provider.can_rotate());
    caps
}

fn extent(name: &'static str, value: f64) -> Result<f64, AutomationError> {
    match finite(name, value)? {
        v if v < 0.0 => Err(AutomationError::ArgumentOutOfRange { name, value }),
        v => Ok(v),
    }
}

impl fmt::Debug for TransformProviderWrapper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransformProviderWrapper")
            .field("element", &self.element)
            .finish_non_exhaustive()
    }
}
