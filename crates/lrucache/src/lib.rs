//! # lrucache
//!
//! Bounded in-memory key-value cache with least-recently-used eviction.
//!
//! ## Architecture
//! - **HashMap**: AHash index from key to slot (O(1))
//! - **LRU List**: index-based doubly-linked list over a node slab (O(1) eviction)
//! - **SharedCache**: one mutex around the list, plus lock-free counters
//!
//! ## Example
//! ```
//! use lrucache::LruCache;
//!
//! let mut cache = LruCache::new(2)?;
//! cache.put(1, "a");
//! cache.put(2, "b");
//! assert_eq!(cache.get(&1), Some(&"a"));
//!
//! cache.put(3, "c"); // evicts 2
//! assert_eq!(cache.get(&2), None);
//! # Ok::<(), lrucache::Error>(())
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod lru;
mod shared;
mod stats;

pub use config::{CacheConfig, DEFAULT_CAPACITY};
pub use error::{Error, Result};
pub use lru::{Iter, LruCache};
pub use shared::SharedCache;
pub use stats::{CacheStats, StatsSnapshot};
