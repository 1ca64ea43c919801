// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::any::{Any, type_name};
use core::fmt;
use std::sync::Arc;

use super::call_provider;
use crate::element::ElementContext;
use crate::error::AutomationError;
use crate::pattern::PatternId;

/// Client-side wrapper for a pattern without a built-in wrapper.
///
/// The provider is opaque; [`call`](Self::call) downcasts it to the concrete
/// type the client expects, on the owner thread.
#[derive(Clone)]
pub struct CustomProviderWrapper {
    element: ElementContext,
    pattern: PatternId,
    provider: Arc<dyn Any + Send + Sync>,
}

impl CustomProviderWrapper {
    /// Wraps `provider` for `pattern` on the element described by `element`.
    #[must_use]
    pub fn new(
        element: ElementContext,
        pattern: PatternId,
        provider: Arc<dyn Any + Send + Sync>,
    ) -> Self {
        Self {
            element,
            pattern,
            provider,
        }
    }

    /// Returns the element this wrapper is bound to.
    #[must_use]
    #[inline]
    pub fn element(&self) -> &ElementContext {
        &self.element
    }

    /// Returns the wrapped pattern.
    #[must_use]
    #[inline]
    pub fn pattern(&self) -> PatternId {
        self.pattern
    }

    /// Runs `f` against the provider, downcast to `T`, on the owner thread.
    ///
    /// # Errors
    ///
    /// [`AutomationError::InvalidOperation`] if the provider is not a `T`,
    /// otherwise whatever `f` or the marshaling returns.
    pub fn call<T, R, F>(&self, f: F) -> Result<R, AutomationError>
    where
        T: Any + Send + Sync,
        R: Send + 'static,
        F: FnOnce(&T) -> Result<R, AutomationError> + Send + 'static,
    {
        let pattern = self.pattern;
        call_provider(&self.element, &self.provider, move |p| {
            let provider = p.downcast_ref::<T>().ok_or_else(|| {
                AutomationError::invalid_operation(format!(
                    "provider for {pattern} is not a {}",
                    type_name::<T>()
                ))
            })?;
            f(provider)
        })
    }
}

impl fmt::Debug for CustomProviderWrapper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomProviderWrapper")
            .field("element", &self.element)
            .field("pattern", &self.pattern)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::PatternProvider;
    use crate::wrappers::ProviderWrapper;
    use crate::wrappers::test_support::{assert_on_owner, bind, spawn_owner};
    use understory_dispatcher::Dispatcher;
    use parking_lot::Mutex;

    const ZOOM: PatternId = PatternId::new(70_001);

    struct Zoom {
        owner: Dispatcher,
        level: Mutex<u32>,
    }

    #[test]
    fn downcasts_on_owner_thread() {
        let owner = spawn_owner();
        let zoom = Arc::new(Zoom {
            owner: owner.dispatcher().clone(),
            level: Mutex::new(100),
        });
        let (_owner, _peer, wrapper) = bind(owner, PatternProvider::Custom(ZOOM, zoom));
        assert_eq!(wrapper.pattern(), ZOOM);
        let ProviderWrapper::Custom(custom) = wrapper else {
            panic!("expected a custom wrapper");
        };

        custom
            .call(|zoom: &Zoom| {
                assert_on_owner(&zoom.owner);
                *zoom.level.lock() = 150;
                Ok(())
            })
            .unwrap();
        assert_eq!(custom.call(|zoom: &Zoom| Ok(*zoom.level.lock())), Ok(150));

        let wrong = custom.call(|_: &String| Ok(()));
        assert!(matches!(wrong, Err(AutomationError::InvalidOperation(_))));
    }
}
