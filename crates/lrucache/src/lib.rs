//! # lrucache
//!
//! Fixed-capacity in-memory key/value cache with Least-Recently-Used eviction.
//!
//! ## Architecture
//! - **HashMap**: AHash index from key to entry handle (O(1))
//! - **Recency List**: doubly linked list in an index arena, front = most recent (O(1))
//! - **Eviction**: the back entry is dropped before a new key is linked in
//!
//! The cache has no internal synchronization. Share it across threads only
//! behind a single lock that serializes every call.
//!
//! ```
//! use lrucache::LruCache;
//!
//! let mut cache = LruCache::new(2)?;
//! cache.put(1, "a");
//! cache.put(2, "b");
//! cache.get(&1);
//! cache.put(3, "c"); // evicts 2
//!
//! assert_eq!(cache.get(&2), None);
//! assert_eq!(cache.iter().map(|(k, _)| *k).collect::<Vec<_>>(), vec![3, 1]);
//! # Ok::<(), lrucache::Error>(())
//! ```

#![warn(missing_docs)]

mod cache;
mod error;
mod list;
mod stats;

pub use cache::LruCache;
pub use error::{Error, Result};
pub use list::{Entry, EntryId, Iter as ListIter, RecencyList};
pub use stats::CacheStats;
