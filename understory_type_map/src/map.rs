// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Two-tier associative storage for bounded integer keys.
//!
//! This module provides [`BoundedKeyMap`], which stores small keys in a flat
//! array and everything else in a hash map.
//!
//! # Implementation
//!
//! Lookups for keys below the dense length are a bounds check plus an array
//! index. The dense tier is sized once, at construction, to the common key
//! range; the overflow tier absorbs the long tail without growing the array.
//!
//! An active-key list records every key currently holding a value, so that
//! enumeration and [`clear`](BoundedKeyMap::clear) cost O(len) rather than
//! O(dense length). A key appears in the list at most once.

use alloc::vec::Vec;
use core::fmt;
use hashbrown::HashMap;
use hashbrown::hash_map::Entry;

use crate::key::MapKey;

/// A map with a dense array tier for keys `< N` and a hash-map overflow tier.
///
/// `N` (the dense length) is fixed at construction and never changes, not
/// even on [`clear`](Self::clear). A key has no value until it is explicitly
/// inserted.
///
/// The map holds no internal lock. It is meant to be owned by one thread (or
/// built once and then shared read-only); callers that need several writers
/// wrap it in their own mutex.
///
/// # Example
///
/// ```rust
/// use understory_type_map::BoundedKeyMap;
///
/// let mut map = BoundedKeyMap::<u32, &str>::new(4);
///
/// // Dense tier.
/// map.insert(1, "one");
/// // Overflow tier.
/// map.insert(1_000, "thousand");
///
/// assert_eq!(map.get(1), Some(&"one"));
/// assert_eq!(map.get(1_000), Some(&"thousand"));
/// assert_eq!(map.get(2), None);
/// assert_eq!(map.len(), 2);
///
/// map.clear();
/// assert!(map.is_empty());
/// assert_eq!(map.dense_len(), 4);
/// ```
#[derive(Clone)]
pub struct BoundedKeyMap<K, V> {
    /// Dense slots, indexed by [`MapKey::index`]. Length never changes.
    dense: Vec<Option<V>>,
    /// Values whose key index is `>= dense.len()`.
    overflow: HashMap<K, V>,
    /// Every key that currently holds a value, without duplicates.
    active: Vec<K>,
}

impl<K: MapKey, V> BoundedKeyMap<K, V> {
    /// Creates an empty map whose dense tier covers key indices `0..dense_len`.
    #[must_use]
    pub fn new(dense_len: usize) -> Self {
        let mut dense = Vec::with_capacity(dense_len);
        dense.resize_with(dense_len, || None);
        Self {
            dense,
            overflow: HashMap::new(),
            active: Vec::new(),
        }
    }

    /// Returns the number of dense slots.
    #[must_use]
    #[inline]
    pub fn dense_len(&self) -> usize {
        self.dense.len()
    }

    /// Returns the number of keys holding a value.
    #[must_use]
    #[inline]
    pub fn len(&self) -> usize {
        self.active.len()
    }

    /// Returns `true` if no key holds a value.
    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    /// Returns the number of values stored in the overflow tier.
    #[must_use]
    #[inline]
    pub fn overflow_len(&self) -> usize {
        self.overflow.len()
    }

    /// Returns the value for `key`, or `None` if it was never set.
    #[must_use]
    #[inline]
    pub fn get(&self, key: K) -> Option<&V> {
        match self.dense.get(key.index()) {
            Some(slot) => slot.as_ref(),
            None => self.overflow.get(&key),
        }
    }

    /// Returns a mutable reference to the value for `key`.
    #[must_use]
    #[inline]
    pub fn get_mut(&mut self, key: K) -> Option<&mut V> {
        match self.dense.get_mut(key.index()) {
            Some(slot) => slot.as_mut(),
            None => self.overflow.get_mut(&key),
        }
    }

    /// Returns `true` if `key` holds a value.
    #[must_use]
    #[inline]
    pub fn contains_key(&self, key: K) -> bool {
        self.get(key).is_some()
    }

    /// Sets the value for `key` and records it as active.
    ///
    /// Returns the previous value, if any.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let previous = match self.dense.get_mut(key.index()) {
            Some(slot) => slot.replace(value),
            None => self.overflow.insert(key, value),
        };
        if previous.is_none() {
            self.active.push(key);
        }
        previous
    }

    /// Returns the value for `key`, inserting the result of `f` first if the
    /// key holds no value.
    pub fn get_or_insert_with(&mut self, key: K, f: impl FnOnce() -> V) -> &mut V {
        match self.dense.get_mut(key.index()) {
            Some(slot) => {
                let inserted = slot.is_none();
                let value = slot.get_or_insert_with(f);
                if inserted {
                    self.active.push(key);
                }
                value
            }
            None => match self.overflow.entry(key) {
                Entry::Occupied(entry) => entry.into_mut(),
                Entry::Vacant(entry) => {
                    // Record the key only once `f` has produced a value.
                    let value = f();
                    self.active.push(key);
                    entry.insert(value)
                }
            },
        }
    }

    /// Removes the value for `key`, returning it if it was set.
    ///
    /// This is O(len) in the number of active keys.
    pub fn remove(&mut self, key: K) -> Option<V> {
        let removed = match self.dense.get_mut(key.index()) {
            Some(slot) => slot.take(),
            None => self.overflow.remove(&key),
        };
        if removed.is_some()
            && let Some(pos) = self.active.iter().position(|k| *k == key)
        {
            self.active.swap_remove(pos);
        }
        removed
    }

    /// Returns the keys that currently hold a value, in no particular order.
    pub fn active_keys(&self) -> impl Iterator<Item = K> + '_ {
        self.active.iter().copied()
    }

    /// Returns an iterator over `(key, value)` pairs, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (K, &V)> + '_ {
        self.active
            .iter()
            .filter_map(move |&key| self.get(key).map(|value| (key, value)))
    }

    /// Removes every value.
    ///
    /// Dense slots are reset, the overflow tier and the active-key list are
    /// emptied. The dense length is unchanged.
    pub fn clear(&mut self) {
        for key in self.active.drain(..) {
            if let Some(slot) = self.dense.get_mut(key.index()) {
                *slot = None;
            }
        }
        self.overflow.clear();
        debug_assert!(
            self.dense.iter().all(Option::is_none),
            "every dense value must be tracked as active"
        );
    }
}

impl<K: MapKey + fmt::Debug, V: fmt::Debug> fmt::Debug for BoundedKeyMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundedKeyMap")
            .field("dense_len", &self.dense.len())
            .field("len", &self.active.len())
            .field("overflow_len", &self.overflow.len())
            .field("entries", &DebugEntries(self))
            .finish()
    }
}

struct DebugEntries<'a, K, V>(&'a BoundedKeyMap<K, V>);

impl<K: MapKey + fmt::Debug, V: fmt::Debug> fmt::Debug for DebugEntries<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.0.iter()).finish()
    }
}
