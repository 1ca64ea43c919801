// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Typed wrappers over pattern providers.
//!
//! A wrapper is what an automation client holds. Each method marshals onto the
//! element's owner thread, performs the read or the validated operation there,
//! and returns the result. Wrappers are created per request by the
//! [`WrapperRegistry`](crate::WrapperRegistry) and are not cached.

use std::sync::Arc;

use crate::element::ElementContext;
use crate::error::AutomationError;
use crate::pattern::PatternId;
use crate::provider::PatternProvider;

mod custom;
mod dock;
mod expand_collapse;
mod invoke;
mod range_value;
mod scroll_item;
mod toggle;
mod transform;
mod value;

pub use custom::CustomProviderWrapper;
pub use dock::DockProviderWrapper;
pub use expand_collapse::ExpandCollapseProviderWrapper;
pub use invoke::InvokeProviderWrapper;
pub use range_value::{RangeValueProviderWrapper, RangeValueSnapshot};
pub use scroll_item::ScrollItemProviderWrapper;
pub use toggle::ToggleProviderWrapper;
pub use transform::TransformProviderWrapper;
pub use value::ValueProviderWrapper;

/// A wrapper for one pattern of one element.
#[derive(Clone, Debug)]
pub enum ProviderWrapper {
    /// Wraps [`PatternProvider::Invoke`].
    Invoke(InvokeProviderWrapper),
    /// Wraps [`PatternProvider::Toggle`].
    Toggle(ToggleProviderWrapper),
    /// Wraps [`PatternProvider::RangeValue`].
    RangeValue(RangeValueProviderWrapper),
    /// Wraps [`PatternProvider::Transform`].
    Transform(TransformProviderWrapper),
    /// Wraps [`PatternProvider::Value`].
    Value(ValueProviderWrapper),
    /// Wraps [`PatternProvider::ExpandCollapse`].
    ExpandCollapse(ExpandCollapseProviderWrapper),
    /// Wraps [`PatternProvider::Dock`].
    Dock(DockProviderWrapper),
    /// Wraps [`PatternProvider::ScrollItem`].
    ScrollItem(ScrollItemProviderWrapper),
    /// Wraps [`PatternProvider::Custom`].
    Custom(CustomProviderWrapper),
}

impl ProviderWrapper {
    /// Wraps `provider` in the wrapper for its pattern.
    ///
    /// This is the factory the registry uses for every built-in pattern.
    #[must_use]
    pub fn from_provider(element: ElementContext, provider: PatternProvider) -> Self {
        match provider {
            PatternProvider::Invoke(p) => Self::Invoke(InvokeProviderWrapper::new(element, p)),
            PatternProvider::Toggle(p) => Self::Toggle(ToggleProviderWrapper::new(element, p)),
            PatternProvider::RangeValue(p) => {
                Self::RangeValue(RangeValueProviderWrapper::new(element, p))
            }
            PatternProvider::Transform(p) => {
                Self::Transform(TransformProviderWrapper::new(element, p))
            }
            PatternProvider::Value(p) => Self::Value(ValueProviderWrapper::new(element, p)),
            PatternProvider::ExpandCollapse(p) => {
                Self::ExpandCollapse(ExpandCollapseProviderWrapper::new(element, p))
            }
            PatternProvider::Dock(p) => Self::Dock(DockProviderWrapper::new(element, p)),
            PatternProvider::ScrollItem(p) => {
                Self::ScrollItem(ScrollItemProviderWrapper::new(element, p))
            }
            PatternProvider::Custom(pattern, p) => {
                Self::Custom(CustomProviderWrapper::new(element, pattern, p))
            }
        }
    }

    /// Returns the pattern this wrapper exposes.
    #[must_use]
    pub fn pattern(&self) -> PatternId {
        match self {
            Self::Invoke(_) => PatternId::INVOKE,
            Self::Toggle(_) => PatternId::TOGGLE,
            Self::RangeValue(_) => PatternId::RANGE_VALUE,
            Self::Transform(_) => PatternId::TRANSFORM,
            Self::Value(_) => PatternId::VALUE,
            Self::ExpandCollapse(_) => PatternId::EXPAND_COLLAPSE,
            Self::Dock(_) => PatternId::DOCK,
            Self::ScrollItem(_) => PatternId::SCROLL_ITEM,
            Self::Custom(w) => w.pattern(),
        }
    }

    /// Returns the element the wrapper is bound to.
    #[must_use]
    pub fn element(&self) -> &ElementContext {
        match self {
            Self::Invoke(w) => w.element(),
            Self::Toggle(w) => w.element(),
            Self::RangeValue(w) => w.element(),
            Self::Transform(w) => w.element(),
            Self::Value(w) => w.element(),
            Self::ExpandCollapse(w) => w.element(),
            Self::Dock(w) => w.element(),
            Self::ScrollItem(w) => w.element(),
            Self::Custom(w) => w.element(),
        }
    }
}

/// Runs `f` against `provider` on the element's owner thread.
fn call_provider<P, R, F>(
    element: &ElementContext,
    provider: &Arc<P>,
    f: F,
) -> Result<R, AutomationError>
where
    P: ?Sized + Send + Sync + 'static,
    R: Send + 'static,
    F: FnOnce(&P) -> Result<R, AutomationError> + Send + 'static,
{
    let provider = Arc::clone(provider);
    element.call(move |_peer| f(&provider))
}

/// Rejects non-finite arguments.
fn finite(name: &'static str, value: f64) -> Result<f64, AutomationError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(AutomationError::ArgumentOutOfRange { name, value })
    }
}
