// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Resolving a peer and a pattern id to a typed wrapper.

use std::sync::Arc;

use understory_dispatcher::InvokeOptions;
use understory_type_map::BoundedKeyMap;

use crate::element::ElementContext;
use crate::error::AutomationError;
use crate::pattern::PatternId;
use crate::provider::{AutomationPeer, PatternProvider};
use crate::wrappers::ProviderWrapper;

/// Builds a wrapper for a provider the peer returned.
pub type WrapperFactory = fn(ElementContext, PatternProvider) -> ProviderWrapper;

/// Dense slots in the factory table; covers every well-known pattern.
const DENSE_PATTERNS: usize = 32;

const STANDARD_PATTERNS: [PatternId; 8] = [
    PatternId::INVOKE,
    PatternId::VALUE,
    PatternId::RANGE_VALUE,
    PatternId::EXPAND_COLLAPSE,
    PatternId::DOCK,
    PatternId::TOGGLE,
    PatternId::TRANSFORM,
    PatternId::SCROLL_ITEM,
];

/// Maps pattern ids to wrapper factories.
///
/// The registry is built once, typically at startup, and then only read.
/// Well-known patterns land in the dense tier of its table; custom pattern
/// ids go to the overflow tier.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use understory_automation::{
///     AutomationError, AutomationPeer, PatternId, PatternProvider, ProviderWrapper,
///     ToggleProvider, ToggleState, WrapperRegistry,
/// };
/// use understory_dispatcher::{Dispatcher, DispatcherBuilder};
///
/// struct CheckBox {
///     dispatcher: Dispatcher,
/// }
///
/// struct Checked;
///
/// impl ToggleProvider for Checked {
///     fn toggle_state(&self) -> ToggleState {
///         ToggleState::On
///     }
///     fn toggle(&self) -> Result<(), AutomationError> {
///         Ok(())
///     }
/// }
///
/// impl AutomationPeer for CheckBox {
///     fn dispatcher(&self) -> &Dispatcher {
///         &self.dispatcher
///     }
///     fn pattern_provider(&self, pattern: PatternId) -> Option<PatternProvider> {
///         (pattern == PatternId::TOGGLE).then(|| PatternProvider::Toggle(Arc::new(Checked)))
///     }
/// }
///
/// let owner = DispatcherBuilder::new().spawn().unwrap();
/// let peer: Arc<dyn AutomationPeer> = Arc::new(CheckBox {
///     dispatcher: owner.dispatcher().clone(),
/// });
///
/// let registry = WrapperRegistry::with_standard_patterns();
/// let Some(ProviderWrapper::Toggle(toggle)) = registry.wrapper(&peer, PatternId::TOGGLE).unwrap()
/// else {
///     panic!("check boxes support Toggle");
/// };
/// assert_eq!(toggle.toggle_state(), Ok(ToggleState::On));
/// assert!(registry.wrapper(&peer, PatternId::VALUE).unwrap().is_none());
/// ```
#[derive(Clone, Debug)]
pub struct WrapperRegistry {
    factories: BoundedKeyMap<PatternId, WrapperFactory>,
    options: InvokeOptions,
}

impl Default for WrapperRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl WrapperRegistry {
    /// Creates a registry with no patterns.
    #[must_use]
    pub fn new() -> Self {
        Self {
            factories: BoundedKeyMap::new(DENSE_PATTERNS),
            options: InvokeOptions::default(),
        }
    }

    /// Creates a registry with every built-in wrapper registered.
    #[must_use]
    pub fn with_standard_patterns() -> Self {
        let mut registry = Self::new();
        for pattern in STANDARD_PATTERNS {
            registry.register(pattern, ProviderWrapper::from_provider);
        }
        registry
    }

    /// Sets the invocation options used by the wrappers this registry
    /// creates, and by the provider query itself.
    #[must_use]
    pub fn with_options(mut self, options: InvokeOptions) -> Self {
        self.options = options;
        self
    }

    /// Registers `factory` for `pattern`, returning the factory it replaces.
    pub fn register(
        &mut self,
        pattern: PatternId,
        factory: WrapperFactory,
    ) -> Option<WrapperFactory> {
        tracing::debug!(%pattern, "registered wrapper factory");
        self.factories.insert(pattern, factory)
    }

    /// Returns `true` if a factory is registered for `pattern`.
    #[must_use]
    pub fn is_registered(&self, pattern: PatternId) -> bool {
        self.factories.contains_key(pattern)
    }

    /// Returns the registered patterns, in no particular order.
    pub fn patterns(&self) -> impl Iterator<Item = PatternId> + '_ {
        self.factories.active_keys()
    }

    /// Returns the number of registered patterns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    /// Returns `true` if no patterns are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }

    /// Resolves a wrapper for `pattern` on `peer`.
    ///
    /// The peer is asked for its provider on its owner thread. Returns
    /// `Ok(None)` when the pattern is not registered, the peer does not
    /// support it, or the peer returned a provider for a different pattern.
    ///
    /// # Errors
    ///
    /// Only marshaling failures, as [`AutomationError::Invoke`], or
    /// [`AutomationError::ElementNotAvailable`] if the peer is dropped before
    /// the query runs.
    pub fn wrapper(
        &self,
        peer: &Arc<dyn AutomationPeer>,
        pattern: PatternId,
    ) -> Result<Option<ProviderWrapper>, AutomationError> {
        let Some(factory) = self.factories.get(pattern).copied() else {
            tracing::debug!(%pattern, "no wrapper factory registered");
            return Ok(None);
        };

        let element = ElementContext::new(peer).with_options(self.options);
        let Some(provider) = element.call(move |peer| Ok(peer.pattern_provider(pattern)))? else {
            tracing::debug!(%pattern, "peer does not support pattern");
            return Ok(None);
        };

        if provider.pattern() != pattern {
            tracing::warn!(
                requested = %pattern,
                returned = %provider.pattern(),
                "peer returned a provider for a different pattern"
            );
            return Ok(None);
        }

        tracing::trace!(%pattern, "resolved wrapper");
        Ok(Some(factory(element, provider)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::{InvokeProvider, ToggleProvider, ToggleState};
    use understory_dispatcher::{Dispatcher, DispatcherBuilder};

    struct Button;

    impl InvokeProvider for Button {
        fn invoke(&self) -> Result<(), AutomationError> {
            Ok(())
        }
    }

    /// Answers every query with an Invoke provider, whatever was asked.
    struct Confused {
        dispatcher: Dispatcher,
    }

    impl AutomationPeer for Confused {
        fn dispatcher(&self) -> &Dispatcher {
            &self.dispatcher
        }
        fn pattern_provider(&self, _pattern: PatternId) -> Option<PatternProvider> {
            Some(PatternProvider::Invoke(Arc::new(Button)))
        }
    }

    struct Switch;

    impl ToggleProvider for Switch {
        fn toggle_state(&self) -> ToggleState {
            ToggleState::Indeterminate
        }
        fn toggle(&self) -> Result<(), AutomationError> {
            Ok(())
        }
    }

    fn flip_factory(element: ElementContext, provider: PatternProvider) -> ProviderWrapper {
        ProviderWrapper::from_provider(element, provider)
    }

    #[test]
    fn standard_patterns_are_registered() {
        let registry = WrapperRegistry::with_standard_patterns();
        assert_eq!(registry.len(), STANDARD_PATTERNS.len());
        assert!(registry.is_registered(PatternId::TOGGLE));
        assert!(registry.is_registered(PatternId::SCROLL_ITEM));
        assert!(!registry.is_registered(PatternId::GRID));
        let mut patterns: Vec<_> = registry.patterns().collect();
        patterns.sort_unstable();
        let mut expected = STANDARD_PATTERNS.to_vec();
        expected.sort_unstable();
        assert_eq!(patterns, expected);
        assert!(WrapperRegistry::new().is_empty());
    }

    #[test]
    fn register_replaces_and_reports_previous() {
        let mut registry = WrapperRegistry::new();
        let custom = PatternId::new(70_000);
        assert!(registry.register(custom, flip_factory).is_none());
        assert!(registry.register(custom, flip_factory).is_some());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn unregistered_pattern_is_unsupported_without_marshaling() {
        let owner = DispatcherBuilder::new().spawn().unwrap();
        let peer: Arc<dyn AutomationPeer> = Arc::new(Confused {
            dispatcher: owner.dispatcher().clone(),
        });
        // Shut down first: resolving must not need the owner thread.
        owner.dispatcher().shutdown();
        let registry = WrapperRegistry::new();
        assert!(registry.wrapper(&peer, PatternId::INVOKE).unwrap().is_none());
    }

    #[test]
    fn mismatched_provider_is_unsupported() {
        let owner = DispatcherBuilder::new().spawn().unwrap();
        let peer: Arc<dyn AutomationPeer> = Arc::new(Confused {
            dispatcher: owner.dispatcher().clone(),
        });
        let registry = WrapperRegistry::with_standard_patterns();

        assert!(registry.wrapper(&peer, PatternId::TOGGLE).unwrap().is_none());
        let invoke = registry.wrapper(&peer, PatternId::INVOKE).unwrap().unwrap();
        assert_eq!(invoke.pattern(), PatternId::INVOKE);
    }

    #[test]
    fn custom_patterns_use_the_overflow_tier() {
        struct Vendor {
            dispatcher: Dispatcher,
        }

        impl AutomationPeer for Vendor {
            fn dispatcher(&self) -> &Dispatcher {
                &self.dispatcher
            }
            fn pattern_provider(&self, pattern: PatternId) -> Option<PatternProvider> {
                match pattern.get() {
                    5 => Some(PatternProvider::Custom(pattern, Arc::new(Switch))),
                    _ => Some(PatternProvider::Toggle(Arc::new(Switch))),
                }
            }
        }

        let owner = DispatcherBuilder::new().spawn().unwrap();
        let peer: Arc<dyn AutomationPeer> = Arc::new(Vendor {
            dispatcher: owner.dispatcher().clone(),
        });
        let mut registry = WrapperRegistry::with_standard_patterns();
        let vendor = PatternId::new(5);
        registry.register(vendor, ProviderWrapper::from_provider);

        let wrapper = registry.wrapper(&peer, vendor).unwrap().unwrap();
        assert_eq!(wrapper.pattern(), vendor);
        assert!(wrapper.element().is_available());

        let Some(ProviderWrapper::Toggle(toggle)) =
            registry.wrapper(&peer, PatternId::TOGGLE).unwrap()
        else {
            panic!("expected a toggle wrapper");
        };
        assert_eq!(toggle.toggle_state(), Ok(ToggleState::Indeterminate));
    }
}
