// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The error type shared by providers and wrappers.

use thiserror::Error;
use understory_dispatcher::InvokeError;

/// An automation operation failed.
///
/// Providers return these from their own methods; wrappers hand them back to
/// the client exactly as the provider produced them. Marshaling failures
/// arrive as [`AutomationError::Invoke`].
#[derive(Clone, Debug, Error, PartialEq)]
pub enum AutomationError {
    /// The operation is not valid in the element's current state, for example
    /// setting the value of a read-only element or resizing an element that
    /// cannot be resized.
    #[error("invalid operation: {0}")]
    InvalidOperation(String),

    /// An argument is outside the range the element accepts.
    #[error("argument `{name}` is out of range: {value}")]
    ArgumentOutOfRange {
        /// The argument's name.
        name: &'static str,
        /// The rejected value.
        value: f64,
    },

    /// The element behind the wrapper no longer exists.
    #[error("element is not available")]
    ElementNotAvailable,

    /// The element exists but is disabled.
    #[error("element is not enabled")]
    ElementNotEnabled,

    /// The call could not be marshaled to the element's owner thread.
    #[error(transparent)]
    Invoke(#[from] InvokeError),
}

impl AutomationError {
    /// Creates an [`AutomationError::InvalidOperation`].
    #[must_use]
    pub fn invalid_operation(message: impl Into<String>) -> Self {
        Self::InvalidOperation(message.into())
    }

    /// Returns `true` if the owner thread did not service the call in time.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Invoke(err) if err.is_timeout())
    }
}
