//! LRU (Least Recently Used) cache
//!
//! Binds a hash index to a [`RecencyList`] for O(1) put, get and delete.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;
use std::hash::{BuildHasher, Hash};

use ahash::RandomState;
use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::list::{Entry, EntryId, RecencyList};
use crate::stats::CacheStats;

/// Upper bound on slots reserved up front; larger caches grow on demand
const PREALLOC_LIMIT: usize = 4096;

/// LRU cache with fixed capacity
///
/// The index and the recency list always hold the same set of keys, and
/// `len() <= max_size()` after every call.
pub struct LruCache<K, V, S = RandomState> {
    map: HashMap<K, EntryId, S>,
    list: RecencyList<K, V>,
    stats: CacheStats,
    max_size: usize,
}

impl<K, V> LruCache<K, V>
where
    K: Hash + Eq + Clone,
{
    /// Create a new LRU cache holding at most `max_size` entries
    ///
    /// # Arguments
    /// * `max_size` - Any integer; must be positive and fit in `usize`
    ///
    /// # Returns
    /// * `Result<LruCache>` - `Error::InvalidCapacity` for zero or negative values
    ///
    /// # Examples
    /// ```
    /// use lrucache::LruCache;
    ///
    /// let mut cache = LruCache::new(2).unwrap();
    /// cache.put("a", 1);
    /// assert_eq!(cache.get(&"a"), Some(&1));
    ///
    /// assert!(LruCache::<&str, i32>::new(0).is_err());
    /// assert!(LruCache::<&str, i32>::new(-1).is_err());
    /// ```
    pub fn new<C>(max_size: C) -> Result<Self>
    where
        C: TryInto<usize> + Copy + fmt::Display,
    {
        Self::with_hasher(max_size, RandomState::new())
    }
}

impl<K, V, S> LruCache<K, V, S>
where
    K: Hash + Eq + Clone,
    S: BuildHasher,
{
    /// Create a new LRU cache using `hasher` for the key index
    pub fn with_hasher<C>(max_size: C, hasher: S) -> Result<Self>
    where
        C: TryInto<usize> + Copy + fmt::Display,
    {
        let max_size = match max_size.try_into() {
            Ok(size) if size > 0 => size,
            _ => return Err(Error::InvalidCapacity(max_size.to_string())),
        };
        let reserve = max_size.min(PREALLOC_LIMIT);

        Ok(Self {
            map: HashMap::with_capacity_and_hasher(reserve, hasher),
            list: RecencyList::with_capacity(reserve),
            stats: CacheStats::new(),
            max_size,
        })
    }

    /// Insert or update a key-value pair and mark it most recently used
    ///
    /// A new key at capacity first evicts the least recently used entry.
    pub fn put(&mut self, key: K, value: V) {
        if let Some(&id) = self.map.get(&key) {
            if let Some(entry) = self.list.get_mut(id) {
                *entry.value_mut() = value;
            }
            self.list.promote(id);
            self.stats.record_update();
            return;
        }

        if self.map.len() >= self.max_size {
            self.evict();
        }

        let id = self.list.add(key.clone(), value);
        self.map.insert(key, id);
        self.stats.record_insert();
        trace!(len = self.map.len(), "inserted entry");
    }

    /// Get a value and mark it most recently used
    pub fn get<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        match self.map.get(key) {
            Some(&id) => {
                self.list.promote(id);
                self.stats.record_hit();
                self.list.get(id).map(Entry::value)
            }
            None => {
                self.stats.record_miss();
                None
            }
        }
    }

    /// Get a value without touching recency order or statistics
    pub fn peek<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let &id = self.map.get(key)?;
        self.list.get(id).map(Entry::value)
    }

    /// Check whether a key is cached, without touching recency order
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.map.contains_key(key)
    }

    /// Remove a key, returning its value if it was present
    ///
    /// Deleting an absent key is a no-op.
    pub fn delete<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let id = self.map.remove(key)?;
        let (_, value) = self.list.remove(id)?;
        self.stats.record_delete();
        Some(value)
    }

    /// Drop every entry and zero the statistics; capacity is kept
    pub fn reset(&mut self) {
        let dropped = self.map.len();
        self.map.clear();
        self.list.clear();
        self.stats.reset();
        debug!(dropped, max_size = self.max_size, "cache reset");
    }

    fn evict(&mut self) {
        if let Some((key, _)) = self.list.remove_back() {
            self.map.remove(&key);
            self.stats.record_eviction();
            debug!(max_size = self.max_size, "evicted least recently used entry");
        }
    }
}

impl<K, V, S> LruCache<K, V, S> {
    /// Iterate entries from most to least recently used
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (&K, &V)> + '_ {
        self.list.iter().map(|entry| (entry.key(), entry.value()))
    }

    /// Get the current number of entries
    pub fn len(&self) -> usize {
        self.list.len()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    /// Get the fixed capacity
    pub fn max_size(&self) -> usize {
        self.max_size
    }

    /// Get cache statistics
    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }
}

impl<K: fmt::Debug, V: fmt::Debug, S> fmt::Debug for LruCache<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LruCache")
            .field("max_size", &self.max_size)
            .field("entries", &DebugEntries(self))
            .finish()
    }
}

struct DebugEntries<'a, K, V, S>(&'a LruCache<K, V, S>);

impl<K: fmt::Debug, V: fmt::Debug, S> fmt::Debug for DebugEntries<'_, K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.0.iter()).finish()
    }
}
