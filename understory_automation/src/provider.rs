// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The element-facing side: peers and the pattern provider traits they
//! implement.
//!
//! Every method on these traits is called on the peer's owner thread. Getters
//! are plain reads of element state; operations return an
//! [`AutomationError`] of the provider's choosing, which reaches the client
//! unchanged.

use core::fmt;
use std::any::Any;
use std::sync::Arc;

use understory_dispatcher::Dispatcher;

use crate::error::AutomationError;
use crate::pattern::PatternId;

/// The automation face of a UI element.
///
/// A peer belongs to the thread that owns its element and is only queried
/// there; wrappers hold it weakly and marshal every access through
/// [`dispatcher`](Self::dispatcher).
pub trait AutomationPeer: Send + Sync + 'static {
    /// Returns the dispatcher of the thread that owns this element.
    fn dispatcher(&self) -> &Dispatcher;

    /// Returns the provider for `pattern`, or `None` if the element does not
    /// support it.
    fn pattern_provider(&self, pattern: PatternId) -> Option<PatternProvider>;
}

/// Binary or three-way toggle state.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum ToggleState {
    /// Unchecked, off, or not pressed.
    #[default]
    Off,
    /// Checked, on, or pressed.
    On,
    /// Neither on nor off.
    Indeterminate,
}

/// Whether an element's child content is shown.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum ExpandCollapseState {
    /// No children are visible.
    #[default]
    Collapsed,
    /// All children are visible.
    Expanded,
    /// Some, but not all, children are visible.
    PartiallyExpanded,
    /// The element has no children to show.
    LeafNode,
}

/// Docking position within a docking container.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum DockPosition {
    /// Docked to the top edge.
    Top,
    /// Docked to the left edge.
    Left,
    /// Docked to the bottom edge.
    Bottom,
    /// Docked to the right edge.
    Right,
    /// Fills the remaining space.
    Fill,
    /// Not docked.
    #[default]
    None,
}

bitflags::bitflags! {
    /// Which transform operations an element currently allows.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct TransformCapabilities: u8 {
        /// [`TransformProvider::move_to`] is allowed.
        const MOVE   = 0b0000_0001;
        /// [`TransformProvider::resize`] is allowed.
        const RESIZE = 0b0000_0010;
        /// [`TransformProvider::rotate`] is allowed.
        const ROTATE = 0b0000_0100;
    }
}

/// An element that performs a single action.
pub trait InvokeProvider: Send + Sync {
    /// Performs the action.
    fn invoke(&self) -> Result<(), AutomationError>;
}

/// An element that cycles through toggle states.
pub trait ToggleProvider: Send + Sync {
    /// Returns the current state.
    fn toggle_state(&self) -> ToggleState;
    /// Advances to the next state.
    fn toggle(&self) -> Result<(), AutomationError>;
}

/// An element with a numeric value in a range.
pub trait RangeValueProvider: Send + Sync {
    /// Current value.
    fn value(&self) -> f64;
    /// Smallest allowed value.
    fn minimum(&self) -> f64;
    /// Largest allowed value.
    fn maximum(&self) -> f64;
    /// Step for large increments, such as page up.
    fn large_change(&self) -> f64;
    /// Step for small increments, such as an arrow key.
    fn small_change(&self) -> f64;
    /// Whether the value can be changed.
    fn is_read_only(&self) -> bool;
    /// Sets the value.
    ///
    /// The wrapper has already checked that the element is writable and that
    /// `value` is within `[minimum, maximum]`.
    fn set_value(&self, value: f64) -> Result<(), AutomationError>;
}

/// An element that can be moved, resized, or rotated.
pub trait TransformProvider: Send + Sync {
    /// Whether the element can be moved.
    fn can_move(&self) -> bool;
    /// Whether the element can be resized.
    fn can_resize(&self) -> bool;
    /// Whether the element can be rotated.
    fn can_rotate(&self) -> bool;
    /// Moves the element's origin to `(x, y)`.
    fn move_to(&self, x: f64, y: f64) -> Result<(), AutomationError>;
    /// Resizes the element.
    fn resize(&self, width: f64, height: f64) -> Result<(), AutomationError>;
    /// Rotates the element by `degrees`.
    fn rotate(&self, degrees: f64) -> Result<(), AutomationError>;
}

/// An element with a string value.
pub trait ValueProvider: Send + Sync {
    /// Current value.
    fn value(&self) -> String;
    /// Whether the value can be changed.
    fn is_read_only(&self) -> bool;
    /// Sets the value. The wrapper has already checked that the element is
    /// writable.
    fn set_value(&self, value: &str) -> Result<(), AutomationError>;
}

/// An element whose child content can be shown and hidden.
pub trait ExpandCollapseProvider: Send + Sync {
    /// Current state.
    fn expand_collapse_state(&self) -> ExpandCollapseState;
    /// Shows the child content.
    fn expand(&self) -> Result<(), AutomationError>;
    /// Hides the child content.
    fn collapse(&self) -> Result<(), AutomationError>;
}

/// An element docked within a container.
pub trait DockProvider: Send + Sync {
    /// Current position.
    fn dock_position(&self) -> DockPosition;
    /// Docks the element at `position`.
    fn set_dock_position(&self, position: DockPosition) -> Result<(), AutomationError>;
}

/// An item in a scrollable container.
pub trait ScrollItemProvider: Send + Sync {
    /// Scrolls the container so the item is visible.
    fn scroll_into_view(&self) -> Result<(), AutomationError>;
}

/// A provider returned by [`AutomationPeer::pattern_provider`].
///
/// Each variant carries the provider for one pattern. Patterns without a
/// built-in wrapper use [`PatternProvider::Custom`].
#[derive(Clone)]
pub enum PatternProvider {
    /// [`PatternId::INVOKE`].
    Invoke(Arc<dyn InvokeProvider>),
    /// [`PatternId::TOGGLE`].
    Toggle(Arc<dyn ToggleProvider>),
    /// [`PatternId::RANGE_VALUE`].
    RangeValue(Arc<dyn RangeValueProvider>),
    /// [`PatternId::TRANSFORM`].
    Transform(Arc<dyn TransformProvider>),
    /// [`PatternId::VALUE`].
    Value(Arc<dyn ValueProvider>),
    /// [`PatternId::EXPAND_COLLAPSE`].
    ExpandCollapse(Arc<dyn ExpandCollapseProvider>),
    /// [`PatternId::DOCK`].
    Dock(Arc<dyn DockProvider>),
    /// [`PatternId::SCROLL_ITEM`].
    ScrollItem(Arc<dyn ScrollItemProvider>),
    /// Any other pattern, identified explicitly.
    Custom(PatternId, Arc<dyn Any + Send + Sync>),
}

impl PatternProvider {
    /// Returns the pattern this provider implements.
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
            Self::Custom(pattern, _) => *pattern,
        }
    }
}

impl fmt::Debug for PatternProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PatternProvider")
            .field(&self.pattern())
            .finish()
    }
}
