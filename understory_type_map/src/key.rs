// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Key types for [`BoundedKeyMap`](crate::BoundedKeyMap).
//!
//! This module provides the [`MapKey`] trait, which maps a key onto a
//! non-negative index, and [`TypeKey`], the dense per-type identifier handed
//! out by [`TypeRegistry`](crate::TypeRegistry).

use core::fmt;
use core::hash::Hash;

/// A key that can address the dense tier of a [`BoundedKeyMap`](crate::BoundedKeyMap).
///
/// Keys whose [`index`](MapKey::index) is below the map's dense length are
/// stored in a flat array; all others go to the overflow hash map. Distinct
/// keys must produce distinct indices.
pub trait MapKey: Copy + Eq + Hash {
    /// Returns the non-negative index of this key.
    fn index(self) -> usize;
}

impl MapKey for u8 {
    #[inline]
    fn index(self) -> usize {
        usize::from(self)
    }
}

impl MapKey for u16 {
    #[inline]
    fn index(self) -> usize {
        usize::from(self)
    }
}

impl MapKey for u32 {
    #[inline]
    fn index(self) -> usize {
        // Only unrepresentable on targets narrower than 32 bits, where the
        // key simply lands in the overflow tier.
        usize::try_from(self).unwrap_or(usize::MAX)
    }
}

impl MapKey for usize {
    #[inline]
    fn index(self) -> usize {
        self
    }
}

/// A dense identifier for a registered type.
///
/// Type keys are assigned sequentially from zero by
/// [`TypeRegistry::register`](crate::TypeRegistry::register), so the types
/// registered first (usually the common ones) land in the dense tier of a
/// [`TypeMap`](crate::TypeMap).
///
/// # Example
///
/// ```rust
/// use understory_type_map::{MapKey, TypeKey};
///
/// let key = TypeKey::new(7);
/// assert_eq!(key.get(), 7);
/// assert_eq!(key.index(), 7);
/// ```
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TypeKey(u32);

impl TypeKey {
    /// Creates a type key from a raw value.
    ///
    /// This is typically called by the registry rather than directly.
    #[must_use]
    #[inline]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Returns the raw value of this key.
    #[must_use]
    #[inline]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl MapKey for TypeKey {
    #[inline]
    fn index(self) -> usize {
        self.0.index()
    }
}

impl fmt::Debug for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TypeKey").field(&self.0).finish()
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeKey({})", self.0)
    }
}
