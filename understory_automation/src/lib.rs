// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Automation: thread-safe UI automation pattern wrappers.
//!
//! UI elements belong to the thread that created them, while automation
//! clients (screen readers, test drivers) call in from anywhere. This crate
//! sits between the two: a client asks for a pattern on an element and gets a
//! typed wrapper whose every read and every operation runs on the element's
//! owner thread.
//!
//! ## Core Concepts
//!
//! - [`AutomationPeer`]: the automation face of an element. It names its
//!   owner [`Dispatcher`](understory_dispatcher::Dispatcher) and hands out a
//!   [`PatternProvider`] for each pattern it supports.
//! - [`PatternId`]: identifies a pattern. The UI Automation ids are provided
//!   as constants.
//! - [`WrapperRegistry`]: maps pattern ids to wrapper factories and resolves
//!   `(peer, pattern)` to an optional [`ProviderWrapper`].
//! - Wrappers ([`ToggleProviderWrapper`], [`RangeValueProviderWrapper`],
//!   [`TransformProviderWrapper`], [`ValueProviderWrapper`],
//!   [`ExpandCollapseProviderWrapper`], and others): hold the peer weakly and
//!   marshal each call through the owner dispatcher.
//!
//! ## Errors
//!
//! An unsupported pattern is `Ok(None)`, not an error. Operations return
//! [`AutomationError`]: errors raised by a provider reach the client
//! unchanged, invalid requests (writing a read-only value, resizing an
//! element that cannot be resized) are rejected on the owner thread before
//! the provider sees them, and marshaling failures such as timeouts arrive as
//! [`AutomationError::Invoke`]. Panics in a provider resume on the client
//! thread with their original payload.
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::{Arc, Mutex};
//! use understory_automation::{
//!     AutomationError, AutomationPeer, PatternId, PatternProvider, ProviderWrapper,
//!     RangeValueProvider, WrapperRegistry,
//! };
//! use understory_dispatcher::{Dispatcher, DispatcherBuilder};
//!
//! struct Volume(Mutex<f64>);
//!
//! impl RangeValueProvider for Volume {
//!     fn value(&self) -> f64 { *self.0.lock().unwrap() }
//!     fn minimum(&self) -> f64 { 0.0 }
//!     fn maximum(&self) -> f64 { 11.0 }
//!     fn large_change(&self) -> f64 { 1.0 }
//!     fn small_change(&self) -> f64 { 0.5 }
//!     fn is_read_only(&self) -> bool { false }
//!     fn set_value(&self, value: f64) -> Result<(), AutomationError> {
//!         *self.0.lock().unwrap() = value;
//!         Ok(())
//!     }
//! }
//!
//! struct Knob {
//!     dispatcher: Dispatcher,
//!     volume: Arc<Volume>,
//! }
//!
//! impl AutomationPeer for Knob {
//!     fn dispatcher(&self) -> &Dispatcher {
//!         &self.dispatcher
//!     }
//!     fn pattern_provider(&self, pattern: PatternId) -> Option<PatternProvider> {
//!         (pattern == PatternId::RANGE_VALUE)
//!             .then(|| PatternProvider::RangeValue(self.volume.clone()))
//!     }
//! }
//!
//! let ui = DispatcherBuilder::new().name("ui").spawn().unwrap();
//! let knob: Arc<dyn AutomationPeer> = Arc::new(Knob {
//!     dispatcher: ui.dispatcher().clone(),
//!     volume: Arc::new(Volume(Mutex::new(5.0))),
//! });
//!
//! let registry = WrapperRegistry::with_standard_patterns();
//! let Some(ProviderWrapper::RangeValue(range)) =
//!     registry.wrapper(&knob, PatternId::RANGE_VALUE).unwrap()
//! else {
//!     unreachable!();
//! };
//!
//! range.set_value(11.0).unwrap();
//! assert_eq!(range.value(), Ok(11.0));
//! assert!(matches!(
//!     range.set_value(12.0),
//!     Err(AutomationError::ArgumentOutOfRange { .. })
//! ));
//! ```
//!
//! ## Logging
//!
//! Registry resolution is logged with [`tracing`] at `debug`, and a peer
//! returning a provider for the wrong pattern at `warn`. Marshaling is logged
//! by `understory_dispatcher`.

mod element;
mod error;
mod pattern;
mod provider;
mod registry;
mod wrappers;

pub use element::ElementContext;
pub use error::AutomationError;
pub use pattern::PatternId;
pub use provider::{
    AutomationPeer, DockPosition, DockProvider, ExpandCollapseProvider, ExpandCollapseState,
    InvokeProvider, PatternProvider, RangeValueProvider, ScrollItemProvider, ToggleProvider,
    ToggleState, TransformCapabilities, TransformProvider, ValueProvider,
};
pub use registry::{WrapperFactory, WrapperRegistry};
pub use wrappers::{
    CustomProviderWrapper, DockProviderWrapper, ExpandCollapseProviderWrapper,
    InvokeProviderWrapper, ProviderWrapper, RangeValueProviderWrapper, RangeValueSnapshot,
    ScrollItemProviderWrapper, ToggleProviderWrapper, TransformProviderWrapper,
    ValueProviderWrapper,
};
