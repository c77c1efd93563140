use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::IngestError;

// =============================================================================
// PlaceholderStore Trait
// =============================================================================

/// Persistence for one hash per source image.
///
/// This abstraction lets the ingestion pipeline write to whatever holds image
/// metadata (a database row, a sidecar file, a key-value store) without the
/// codec knowing about it.
#[async_trait]
pub trait PlaceholderStore: Send + Sync {
    /// Store `hash` for `image_id`, replacing any previous value.
    async fn put(&self, image_id: &str, hash: &str) -> Result<(), IngestError>;

    /// Fetch the hash stored for `image_id`.
    async fn get(&self, image_id: &str) -> Result<Option<String>, IngestError>;
}

#[async_trait]
impl<T: PlaceholderStore + ?Sized> PlaceholderStore for Arc<T> {
    async fn put(&self, image_id: &str, hash: &str) -> Result<(), IngestError> {
        (**self).put(image_id, hash).await
    }

    async fn get(&self, image_id: &str) -> Result<Option<String>, IngestError> {
        (**self).get(image_id).await
    }
}

// =============================================================================
// MemoryPlaceholderStore
// =============================================================================

/// In-process placeholder store, mostly for tests and the CLI.
#[derive(Default)]
pub struct MemoryPlaceholderStore {
    hashes: RwLock<HashMap<String, String>>,
}

impl MemoryPlaceholderStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored hashes.
    pub async fn len(&self) -> usize {
        self.hashes.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.hashes.read().await.is_empty()
    }
}

#[async_trait]
impl PlaceholderStore for MemoryPlaceholderStore {
    async fn put(&self, image_id: &str, hash: &str) -> Result<(), IngestError> {
        let mut hashes = self.hashes.write().await;
        hashes.insert(image_id.to_string(), hash.to_string());
        Ok(())
    }

    async fn get(&self, image_id: &str) -> Result<Option<String>, IngestError> {
        let hashes = self.hashes.read().await;
        Ok(hashes.get(image_id).cloned())
    }
}
