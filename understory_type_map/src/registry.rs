// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dense type identifiers and per-type caches.
//!
//! This module provides [`TypeRegistry`], which hands out sequential
//! [`TypeKey`]s for Rust types (optionally recording a base type), and
//! [`TypeMap`], a [`BoundedKeyMap`] keyed by those ids.

use alloc::vec::Vec;
use core::any::{TypeId, type_name};
use hashbrown::HashMap;

use crate::key::TypeKey;
use crate::map::BoundedKeyMap;

/// A per-type cache keyed by [`TypeKey`].
pub type TypeMap<V> = BoundedKeyMap<TypeKey, V>;

/// Dense length used by [`TypeMap::for_types`].
///
/// Large enough that every type a typical element tree registers stays in
/// the dense tier.
pub const DEFAULT_TYPE_MAP_DENSE_LEN: usize = 256;

impl<V> BoundedKeyMap<TypeKey, V> {
    /// Creates an empty per-type cache with [`DEFAULT_TYPE_MAP_DENSE_LEN`]
    /// dense slots.
    #[must_use]
    pub fn for_types() -> Self {
        Self::new(DEFAULT_TYPE_MAP_DENSE_LEN)
    }
}

/// A registration entry for a type.
#[derive(Clone, Debug)]
pub struct TypeRegistration {
    name: &'static str,
    type_id: TypeId,
    base: Option<TypeKey>,
}

impl TypeRegistration {
    /// Returns the type's name, as reported by [`core::any::type_name`].
    #[must_use]
    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the [`TypeId`] of the registered type.
    #[must_use]
    #[inline]
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Returns the base type, if one was recorded.
    #[must_use]
    #[inline]
    pub fn base(&self) -> Option<TypeKey> {
        self.base
    }
}

/// Assigns dense [`TypeKey`]s to Rust types.
///
/// Keys are handed out in registration order starting from zero, and
/// registering a type twice returns the key it already has. A base type can
/// be recorded to model a type hierarchy; [`is_derived_from`](Self::is_derived_from)
/// walks it.
///
/// # Example
///
/// ```rust
/// use understory_type_map::{TypeMap, TypeRegistry};
///
/// struct Element;
/// struct Button;
///
/// let mut registry = TypeRegistry::new();
/// let element = registry.register::<Element>();
/// let button = registry.register_derived::<Button>(element);
///
/// assert!(registry.is_derived_from(button, element));
/// assert_eq!(registry.key_of::<Button>(), Some(button));
///
/// let mut cache = TypeMap::for_types();
/// cache.insert(button, "button metadata");
/// assert_eq!(cache.get(button), Some(&"button metadata"));
/// ```
#[derive(Debug, Default)]
pub struct TypeRegistry {
    types: Vec<TypeRegistration>,
    by_type: HashMap<TypeId, TypeKey>,
}

impl TypeRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `T` without a base type and returns its key.
    ///
    /// Returns the existing key if `T` is already registered.
    pub fn register<T: ?Sized + 'static>(&mut self) -> TypeKey {
        self.register_with_base::<T>(None)
    }

    /// Registers `T` as derived from `base` and returns its key.
    ///
    /// Returns the existing key if `T` is already registered; its recorded
    /// base is left unchanged.
    ///
    /// # Panics
    ///
    /// Panics if `base` is not registered.
    pub fn register_derived<T: ?Sized + 'static>(&mut self, base: TypeKey) -> TypeKey {
        assert!(self.get(base).is_some(), "base {base} is not registered");
        self.register_with_base::<T>(Some(base))
    }

    fn register_with_base<T: ?Sized + 'static>(&mut self, base: Option<TypeKey>) -> TypeKey {
        let type_id = TypeId::of::<T>();
        if let Some(key) = self.by_type.get(&type_id) {
            return *key;
        }

        let raw = u32::try_from(self.types.len()).unwrap_or_else(|_| {
            panic!("Too many types registered (max {})", u32::MAX)
        });
        let key = TypeKey::new(raw);
        self.types.push(TypeRegistration {
            name: type_name::<T>(),
            type_id,
            base,
        });
        self.by_type.insert(type_id, key);
        key
    }

    /// Returns the key of `T`, if registered.
    #[must_use]
    pub fn key_of<T: ?Sized + 'static>(&self) -> Option<TypeKey> {
        self.by_type.get(&TypeId::of::<T>()).copied()
    }

    /// Returns the registration for `key`.
    #[must_use]
    pub fn get(&self, key: TypeKey) -> Option<&TypeRegistration> {
        usize::try_from(key.get())
            .ok()
            .and_then(|index| self.types.get(index))
    }

    /// Returns the name of a registered type.
    #[must_use]
    pub fn name(&self, key: TypeKey) -> Option<&'static str> {
        self.get(key).map(TypeRegistration::name)
    }

    /// Returns the base of a registered type.
    #[must_use]
    pub fn base(&self, key: TypeKey) -> Option<TypeKey> {
        self.get(key).and_then(TypeRegistration::base)
    }

    /// Returns `true` if `key` is `ancestor` or has it somewhere up its base
    /// chain.
    #[must_use]
    pub fn is_derived_from(&self, key: TypeKey, ancestor: TypeKey) -> bool {
        let mut current = Some(key);
        while let Some(k) = current {
            if k == ancestor {
                return true;
            }
            current = self.base(k);
        }
        false
    }

    /// Returns the number of registered types.
    #[must_use]
    #[inline]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Returns `true` if no types are registered.
    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Returns an iterator over all registrations in key order.
    pub fn iter(&self) -> impl Iterator<Item = (TypeKey, &TypeRegistration)> {
        self.types
            .iter()
            .enumerate()
            .map(|(i, r)| (TypeKey::new(u32::try_from(i).unwrap_or(u32::MAX)), r))
    }
}
