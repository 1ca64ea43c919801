// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Control pattern identifiers.

use core::fmt;

use understory_type_map::MapKey;

/// Identifies a control pattern (a capability an element can expose).
///
/// The well-known patterns use the UI Automation identifiers, which start at
/// [`PatternId::FIRST_STANDARD`]. Other values are free for custom patterns.
///
/// # Example
///
/// ```rust
/// use understory_automation::PatternId;
///
/// assert_eq!(PatternId::TOGGLE.get(), 10015);
/// assert_eq!(PatternId::TOGGLE.name(), Some("Toggle"));
/// assert!(PatternId::new(42).name().is_none());
/// ```
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PatternId(u32);

impl PatternId {
    /// The lowest well-known pattern id.
    pub const FIRST_STANDARD: u32 = 10000;

    /// Invoke: a single unambiguous action.
    pub const INVOKE: Self = Self(10000);
    /// Selection container.
    pub const SELECTION: Self = Self(10001);
    /// Value: a string value.
    pub const VALUE: Self = Self(10002);
    /// `RangeValue`: a numeric value within a range.
    pub const RANGE_VALUE: Self = Self(10003);
    /// Scroll container.
    pub const SCROLL: Self = Self(10004);
    /// `ExpandCollapse`: shows or hides child content.
    pub const EXPAND_COLLAPSE: Self = Self(10005);
    /// Grid container.
    pub const GRID: Self = Self(10006);
    /// Item in a grid.
    pub const GRID_ITEM: Self = Self(10007);
    /// Multiple views of the same content.
    pub const MULTIPLE_VIEW: Self = Self(10008);
    /// Top-level window.
    pub const WINDOW: Self = Self(10009);
    /// Selectable item.
    pub const SELECTION_ITEM: Self = Self(10010);
    /// Dock: position within a docking container.
    pub const DOCK: Self = Self(10011);
    /// Table container.
    pub const TABLE: Self = Self(10012);
    /// Item in a table.
    pub const TABLE_ITEM: Self = Self(10013);
    /// Text content.
    pub const TEXT: Self = Self(10014);
    /// Toggle: cycles through a set of states.
    pub const TOGGLE: Self = Self(10015);
    /// Transform: move, resize, rotate.
    pub const TRANSFORM: Self = Self(10016);
    /// `ScrollItem`: can be scrolled into view.
    pub const SCROLL_ITEM: Self = Self(10017);

    const NAMES: [&'static str; 18] = [
        "Invoke",
        "Selection",
        "Value",
        "RangeValue",
        "Scroll",
        "ExpandCollapse",
        "Grid",
        "GridItem",
        "MultipleView",
        "Window",
        "SelectionItem",
        "Dock",
        "Table",
        "TableItem",
        "Text",
        "Toggle",
        "Transform",
        "ScrollItem",
    ];

    /// Creates a pattern id from a raw value.
    #[must_use]
    #[inline]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Returns the raw value.
    #[must_use]
    #[inline]
    pub const fn get(self) -> u32 {
        self.0
    }

    /// Returns the name of a well-known pattern.
    #[must_use]
    pub fn name(self) -> Option<&'static str> {
        let offset = self.0.checked_sub(Self::FIRST_STANDARD)?;
        Self::NAMES.get(usize::try_from(offset).ok()?).copied()
    }

    /// Returns `true` for the well-known UI Automation patterns.
    #[must_use]
    #[inline]
    pub fn is_standard(self) -> bool {
        self.name().is_some()
    }
}

impl MapKey for PatternId {
    /// Well-known ids map to small indices; everything below
    /// [`PatternId::FIRST_STANDARD`] wraps to a large index and overflows.
    #[inline]
    fn index(self) -> usize {
        self.0
            .wrapping_sub(Self::FIRST_STANDARD)
            .index()
    }
}

impl fmt::Debug for PatternId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "PatternId({name})"),
            None => f.debug_tuple("PatternId").field(&self.0).finish(),
        }
    }
}

impl fmt::Display for PatternId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            None => write!(f, "PatternId({})", self.0),
        }
    }
}
