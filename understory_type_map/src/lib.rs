// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Type Map: two-tier storage for bounded integer keys.
//!
//! Per-type metadata in a UI object model is looked up constantly and keyed
//! by small, densely assigned ids. This crate provides the storage for that
//! pattern.
//!
//! ## Core Concepts
//!
//! ### Bounded-key map
//!
//! [`BoundedKeyMap`] keeps two tiers:
//!
//! - **Dense** - a flat array of `N` slots for keys whose index is `< N`
//! - **Overflow** - a hash map for every other key
//!
//! `N` is chosen at construction and never changes. An active-key list makes
//! enumeration and [`BoundedKeyMap::clear`] proportional to the number of
//! stored values.
//!
//! ### Type registry
//!
//! [`TypeRegistry`] assigns sequential [`TypeKey`]s to Rust types, with an
//! optional base type for each. [`TypeMap`] is a [`BoundedKeyMap`] keyed by
//! those ids.
//!
//! ## Quick Start
//!
//! ```rust
//! use understory_type_map::{TypeMap, TypeRegistry};
//!
//! struct Slider;
//! struct CheckBox;
//!
//! let mut types = TypeRegistry::new();
//! let slider = types.register::<Slider>();
//! let check_box = types.register::<CheckBox>();
//!
//! // One cache per kind of metadata; cleared explicitly on reload.
//! let mut default_styles: TypeMap<&'static str> = TypeMap::for_types();
//! default_styles.insert(slider, "SliderStyle");
//!
//! assert_eq!(default_styles.get(slider), Some(&"SliderStyle"));
//! assert_eq!(default_styles.get(check_box), None);
//!
//! default_styles.clear();
//! assert!(default_styles.is_empty());
//! ```
//!
//! ## Thread Safety
//!
//! The map has no internal lock. Keep it on one thread, or build it once and
//! share it immutably; wrap it in a mutex for concurrent writers.
//!
//! ## `no_std` Support
//!
//! This crate is `no_std` and uses `alloc`. It does not depend on `std`.

#![no_std]

extern crate alloc;

mod key;
mod map;
mod registry;

pub use key::{MapKey, TypeKey};
pub use map::BoundedKeyMap;
pub use registry::{DEFAULT_TYPE_MAP_DENSE_LEN, TypeMap, TypeRegistration, TypeRegistry};
