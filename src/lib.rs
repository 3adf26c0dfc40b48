#![warn(missing_docs)]
#![doc = include_str!("../README.md")]
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

/// Error types shared by the table layers.
pub mod error;

/// A key-value map built on a separately-chained hash table.
///
/// This module provides a `HashMap` that wraps the `HashTable` and provides
/// a key-unique map interface with configurable hashers and resize bounds.
pub mod hash_map;

/// The raw separately-chained table underlying [`HashMap`].
///
/// Callers supply precomputed hashes and equality predicates, which makes it
/// usable for entry types that do not split into a key and a value.
pub mod hash_table;

/// Keyword-scoring spam detection built on the map.
#[cfg(feature = "std")]
pub mod spam;

pub use error::Error;
pub use error::Result;
pub use hash_map::Entry;
pub use hash_map::HashMap;
pub use hash_table::HashTable;
pub use hash_table::LoadFactors;

cfg_if::cfg_if! {
    if #[cfg(feature = "foldhash")] {
        /// Hasher builder used by [`BucketHashTable`].
        pub type DefaultHashBuilder = foldhash::fast::RandomState;
    } else if #[cfg(feature = "std")] {
        /// Hasher builder used by [`BucketHashTable`].
        pub type DefaultHashBuilder = std::hash::RandomState;
    }
}

/// A [`HashMap`] using the crate's default hasher.
#[cfg(any(feature = "foldhash", feature = "std"))]
pub type BucketHashTable<K, V> = HashMap<K, V, DefaultHashBuilder>;
