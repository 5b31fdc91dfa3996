//! This module contains the concurrent map and the operations it exposes.

mod concurrent_map;

pub use concurrent_map::{ConcurrentMap, ValueRef};

use std::hash::Hash;
use std::ops::Deref;

use crate::Result;

/// Common functionalities for thread-safe maps.
///
/// Every operation takes `&self`; implementations synchronize internally.
pub trait Map {
    /// Key type for a map implementation.
    type Key: Hash + Eq;
    /// Value type for a map implementation.
    type Val;
    /// Map entry reference type.
    type ValueRef<'a>: Deref<Target = Self::Val>
    where
        Self: 'a;

    /// Emplaces a key-value pair into the map.
    ///
    /// If there were a key-value pair associated with this provided key,
    /// it will be overwritten.
    fn set(&self, key: Self::Key, value: Self::Val);

    /// Get a copy of the value associated with a key.
    ///
    /// Shared access is released before this returns. Fails with
    /// [`Error::UnknownKey`](crate::Error::UnknownKey) if the key is absent.
    fn get(&self, key: &Self::Key) -> Result<Self::Val>
    where
        Self::Val: Clone,
    {
        self.get_ref(key).map(|v| <Self::Val as Clone>::clone(&*v))
    }

    /// Get reference to a value associated with a key, keeping the map
    /// readable-only for as long as the reference lives.
    fn get_ref(&self, key: &Self::Key) -> Result<Self::ValueRef<'_>>;

    /// Removes the key-value pair associated with the key.
    ///
    /// Fails with [`Error::UnknownKey`](crate::Error::UnknownKey), leaving
    /// the map untouched, if the key is absent.
    fn delete(&self, key: &Self::Key) -> Result<()>;

    /// Returns a snapshot of the keys currently in the map, in no particular
    /// order.
    fn keys(&self) -> Vec<Self::Key>
    where
        Self::Key: Clone;

    /// Check whether the map contains a value mapped to the given key.
    fn contains_key(&self, key: &Self::Key) -> bool;
}
