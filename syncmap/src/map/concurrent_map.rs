use std::collections::hash_map::RandomState;
use std::collections::HashMap;
use std::fmt;
use std::hash::{BuildHasher, Hash};
use std::ops::Deref;
use std::time::Duration;

use crossbeam::utils::CachePadded;
use parking_lot::{MappedRwLockReadGuard, RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::Map;
use crate::{Error, Result};

type Table<K, V, S> = HashMap<K, V, S>;

/// A concurrent hashmap implemented with a single reader-writer lock.
///
/// Lookups take the lock in shared mode and can run in parallel; `set` and
/// `delete` take it exclusively. Shared access is taken recursively, so a
/// thread already holding a [`ValueRef`] is never queued behind a waiting
/// writer. The lock is padded to its own cache line.
pub struct ConcurrentMap<K, V, S = RandomState> {
    data: CachePadded<RwLock<Table<K, V, S>>>,
}

/// Shared reference to a value stored in a [`ConcurrentMap`].
///
/// The map stays read-locked for as long as this is alive: writers block
/// until it is dropped, and a thread that holds one and then calls `set` or
/// `delete` on the same map deadlocks. Reads from the holding thread still
/// go through, even with a writer queued behind it.
pub struct ValueRef<'a, V>(MappedRwLockReadGuard<'a, V>);

impl<'a, V> Deref for ValueRef<'a, V> {
    type Target = V;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<'a, V: fmt::Debug> fmt::Debug for ValueRef<'a, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ValueRef").field(&*self.0).finish()
    }
}

impl<K, V> ConcurrentMap<K, V, RandomState> {
    /// Creates an empty map.
    pub fn new() -> Self {
        ConcurrentMap::with_hasher(RandomState::new())
    }
}

impl<K, V, S> ConcurrentMap<K, V, S> {
    /// Creates an empty map which will use the given hash builder to hash
    /// keys.
    pub fn with_hasher(hasher: S) -> Self {
        ConcurrentMap {
            data: CachePadded::new(RwLock::new(HashMap::with_hasher(hasher))),
        }
    }

    /// Number of entries at the time of the call.
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Whether the map held no entries at the time of the call.
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    fn read(&self) -> RwLockReadGuard<'_, Table<K, V, S>> {
        self.data.read_recursive()
    }

    fn read_for(&self, timeout: Duration) -> Result<RwLockReadGuard<'_, Table<K, V, S>>> {
        self.data.try_read_recursive_for(timeout).ok_or_else(|| {
            log::debug!("shared access not acquired within {:?}", timeout);
            Error::LockTimeout(timeout)
        })
    }

    fn write_for(&self, timeout: Duration) -> Result<RwLockWriteGuard<'_, Table<K, V, S>>> {
        self.data.try_write_for(timeout).ok_or_else(|| {
            log::debug!("exclusive access not acquired within {:?}", timeout);
            Error::LockTimeout(timeout)
        })
    }
}

impl<K, V, S> ConcurrentMap<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    fn lookup<'a>(
        guard: RwLockReadGuard<'a, Table<K, V, S>>,
        key: &K,
    ) -> Result<ValueRef<'a, V>> {
        // the guard handed back on a miss is dropped here, releasing the lock
        RwLockReadGuard::try_map(guard, |data| data.get(key))
            .map(ValueRef)
            .map_err(|_| Error::UnknownKey)
    }

    fn evict(data: &mut Table<K, V, S>, key: &K) -> Result<()> {
        match data.remove(key) {
            Some(_) => Ok(()),
            None => Err(Error::UnknownKey),
        }
    }

    /// [`Map::set`], giving up with [`Error::LockTimeout`] if exclusive
    /// access is not obtained within `timeout`.
    pub fn try_set_for(&self, key: K, value: V, timeout: Duration) -> Result<()> {
        self.write_for(timeout)?.insert(key, value);
        Ok(())
    }

    /// [`Map::get`], giving up with [`Error::LockTimeout`] if shared access
    /// is not obtained within `timeout`.
    pub fn try_get_for(&self, key: &K, timeout: Duration) -> Result<V>
    where
        V: Clone,
    {
        Self::lookup(self.read_for(timeout)?, key).map(|v| V::clone(&v))
    }

    /// [`Map::delete`], giving up with [`Error::LockTimeout`] if exclusive
    /// access is not obtained within `timeout`.
    pub fn try_delete_for(&self, key: &K, timeout: Duration) -> Result<()> {
        Self::evict(&mut *self.write_for(timeout)?, key)
    }

    /// [`Map::keys`] with a bound on the wait for shared access.
    pub fn try_keys_for(&self, timeout: Duration) -> Result<Vec<K>>
    where
        K: Clone,
    {
        Ok(self.read_for(timeout)?.keys().cloned().collect())
    }

    /// [`Map::contains_key`] with a bound on the wait for shared access.
    pub fn try_contains_key_for(&self, key: &K, timeout: Duration) -> Result<bool> {
        Ok(self.read_for(timeout)?.contains_key(key))
    }
}

impl<K, V, S: Default> Default for ConcurrentMap<K, V, S> {
    fn default() -> Self {
        ConcurrentMap::with_hasher(S::default())
    }
}

impl<K: fmt::Debug, V: fmt::Debug, S> fmt::Debug for ConcurrentMap<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.read().iter()).finish()
    }
}

impl<K, V, S> Map for ConcurrentMap<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    type Key = K;
    type Val = V;
    type ValueRef<'a> = ValueRef<'a, V> where Self: 'a;

    fn set(&self, key: K, value: V) {
        self.data.write().insert(key, value);
    }

    fn get_ref(&self, key: &K) -> Result<ValueRef<'_, V>> {
        Self::lookup(self.read(), key)
    }

    fn delete(&self, key: &K) -> Result<()> {
        Self::evict(&mut self.data.write(), key)
    }

    fn keys(&self) -> Vec<K>
    where
        K: Clone,
    {
        self.read().keys().cloned().collect()
    }

    fn contains_key(&self, key: &K) -> bool {
        self.read().contains_key(key)
    }
}
