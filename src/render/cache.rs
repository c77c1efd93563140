//! Render cache for placeholder data URIs.
//!
//! Decoding a hash and compressing the PNG is cheap but not free, and the same
//! placeholder is requested on every page view. This module memoizes rendered
//! payloads behind a [`CacheStore`] capability.
//!
//! # Cache Key
//!
//! Entries are keyed by:
//! - Hash string
//! - Target width
//! - Target height
//!
//! serialized as `hash|width|height` for stores that want a flat string key.
//!
//! # Failure Model
//!
//! The cache never decides correctness. A store error on read is a miss, and
//! a store error on write is logged and dropped. Eviction belongs to the store.

use std::fmt;
use std::num::NonZeroUsize;
use std::sync::Arc;

use async_trait::async_trait;
use lru::LruCache;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use super::encoder::{data_uri_from_base64, to_base64};
use crate::error::{CacheError, PlaceholderError};

/// Default capacity of the in-memory store: 16MB of base-64 payloads.
pub const DEFAULT_RENDER_CACHE_CAPACITY: usize = 16 * 1024 * 1024;

/// Default maximum number of entries (to bound LRU overhead)
const DEFAULT_MAX_ENTRIES: usize = 10_000;

// =============================================================================
// Cache Key
// =============================================================================

/// Identity of one rendered placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RenderCacheKey {
    /// Blur hash string
    pub hash: Arc<str>,

    /// Target box width in pixels
    pub width: u32,

    /// Target box height in pixels
    pub height: u32,
}

impl RenderCacheKey {
    /// Create a new cache key.
    pub fn new(hash: impl Into<Arc<str>>, width: u32, height: u32) -> Self {
        Self {
            hash: hash.into(),
            width,
            height,
        }
    }
}

impl fmt::Display for RenderCacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}|{}|{}", self.hash, self.width, self.height)
    }
}

// =============================================================================
// Cache Store
// =============================================================================

/// Shared key-value store backing the render cache.
///
/// Implementations must make each `get` and `set` atomic per key. No
/// cross-key transactions or ordering between writers are required: two
/// writers racing on one key always write the same value.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Fetch the base-64 payload stored under `key`.
    async fn get(&self, key: &RenderCacheKey) -> Result<Option<String>, CacheError>;

    /// Store a base-64 payload under `key`.
    async fn set(&self, key: &RenderCacheKey, value: String) -> Result<(), CacheError>;
}

#[async_trait]
impl<T: CacheStore + ?Sized> CacheStore for Arc<T> {
    async fn get(&self, key: &RenderCacheKey) -> Result<Option<String>, CacheError> {
        (**self).get(key).await
    }

    async fn set(&self, key: &RenderCacheKey, value: String) -> Result<(), CacheError> {
        (**self).set(key, value).await
    }
}

// =============================================================================
// In-Memory Store
// =============================================================================

/// LRU store for base-64 payloads with size-based capacity.
///
/// Evicts least-recently-used entries once the total payload size exceeds
/// capacity. Thread-safe; share across tasks via `Arc`.
pub struct MemoryCacheStore {
    /// The underlying LRU cache
    cache: RwLock<LruCache<RenderCacheKey, String>>,

    /// Maximum total payload size in bytes
    max_size: usize,

    /// Current total payload size in bytes
    current_size: RwLock<usize>,
}

impl MemoryCacheStore {
    /// Create a store with default capacity (16MB).
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_RENDER_CACHE_CAPACITY)
    }

    /// Create a store holding at most `max_size` bytes of payload.
    pub fn with_capacity(max_size: usize) -> Self {
        Self::with_capacity_and_entries(max_size, DEFAULT_MAX_ENTRIES)
    }

    /// Create a store with a byte capacity and an entry limit.
    ///
    /// An entry limit of zero is treated as one.
    pub fn with_capacity_and_entries(max_size: usize, max_entries: usize) -> Self {
        let entries = NonZeroUsize::new(max_entries).unwrap_or(NonZeroUsize::MIN);
        Self {
            cache: RwLock::new(LruCache::new(entries)),
            max_size,
            current_size: RwLock::new(0),
        }
    }

    /// Check if a key is cached without updating LRU order.
    pub async fn contains(&self, key: &RenderCacheKey) -> bool {
        let cache = self.cache.read().await;
        cache.contains(key)
    }

    /// Remove all entries.
    pub async fn clear(&self) {
        let mut cache = self.cache.write().await;
        let mut current_size = self.current_size.write().await;
        cache.clear();
        *current_size = 0;
    }

    /// Number of cached entries.
    pub async fn len(&self) -> usize {
        let cache = self.cache.read().await;
        cache.len()
    }

    /// Check if the store is empty.
    pub async fn is_empty(&self) -> bool {
        let cache = self.cache.read().await;
        cache.is_empty()
    }

    /// Total size of cached payloads in bytes.
    pub async fn size(&self) -> usize {
        let current_size = self.current_size.read().await;
        *current_size
    }

    /// Maximum capacity in bytes.
    pub fn capacity(&self) -> usize {
        self.max_size
    }
}

impl Default for MemoryCacheStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CacheStore for MemoryCacheStore {
    async fn get(&self, key: &RenderCacheKey) -> Result<Option<String>, CacheError> {
        let mut cache = self.cache.write().await;
        Ok(cache.get(key).cloned())
    }

    async fn set(&self, key: &RenderCacheKey, value: String) -> Result<(), CacheError> {
        let value_size = value.len();
        let mut cache = self.cache.write().await;
        let mut current_size = self.current_size.write().await;

        if let Some(old) = cache.peek(key) {
            *current_size = current_size.saturating_sub(old.len());
        }

        // Entry-count eviction happens inside `push`; keep the byte total in step
        if let Some((evicted_key, evicted)) = cache.push(key.clone(), value) {
            if evicted_key != *key {
                *current_size = current_size.saturating_sub(evicted.len());
            }
        }
        *current_size += value_size;

        while *current_size > self.max_size {
            match cache.pop_lru() {
                Some((_, evicted)) => {
                    *current_size = current_size.saturating_sub(evicted.len());
                }
                None => break,
            }
        }

        Ok(())
    }
}

// =============================================================================
// Render Cache
// =============================================================================

/// Result of a cached render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOutcome {
    /// `data:image/png;base64,...`
    pub data_uri: String,

    /// Whether the payload came from the store
    pub cache_hit: bool,
}

/// Memoizes rendered placeholders in a [`CacheStore`].
pub struct RenderCache<C: CacheStore> {
    store: C,
}

impl<C: CacheStore> RenderCache<C> {
    /// Wrap a store.
    pub fn new(store: C) -> Self {
        Self { store }
    }

    /// Access the underlying store.
    pub fn store(&self) -> &C {
        &self.store
    }

    /// Return the cached data URI for `(hash, width, height)`, rendering on a miss.
    ///
    /// `render` receives the hash and target size and returns PNG bytes. It is
    /// not called on a hit. Its errors propagate and nothing is cached.
    pub async fn get_or_render<F, B>(
        &self,
        hash: &str,
        width: u32,
        height: u32,
        render: F,
    ) -> Result<RenderOutcome, PlaceholderError>
    where
        F: FnOnce(&str, u32, u32) -> Result<B, PlaceholderError>,
        B: AsRef<[u8]>,
    {
        let key = RenderCacheKey::new(hash, width, height);

        match self.store.get(&key).await {
            Ok(Some(payload)) => {
                debug!(key = %key, "Render cache hit");
                return Ok(RenderOutcome {
                    data_uri: data_uri_from_base64(&payload),
                    cache_hit: true,
                });
            }
            Ok(None) => {
                debug!(key = %key, "Render cache miss");
            }
            Err(e) => {
                warn!(key = %key, error = %e, "Render cache read failed, rendering");
            }
        }

        let png = render(hash, width, height)?;
        let payload = to_base64(png.as_ref());
        let data_uri = data_uri_from_base64(&payload);

        if let Err(e) = self.store.set(&key, payload).await {
            warn!(key = %key, error = %e, "Render cache write failed");
        }

        Ok(RenderOutcome {
            data_uri,
            cache_hit: false,
        })
    }
}

// =============================================================================
// Tests
// =============================================================================
