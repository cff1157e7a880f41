//! Single-slot cache for the most recently uploaded table.
//!
//! Every upload overwrites the same key. Concurrent uploads race and the last
//! write wins; a `question` sees whichever table landed last. There is no
//! per-client isolation and no expiry beyond what the backend applies.

mod codec;
mod memory;
mod redis_store;

use std::sync::Arc;

use arrow::record_batch::RecordBatch;
use async_trait::async_trait;
use bytes::Bytes;
use log::debug;

use crate::conf::{CacheBackend, CacheConfig};
use crate::core::TabchatError;

pub use codec::{decode, encode};
pub use memory::MemoryStore;
pub use redis_store::RedisStore;

/// Byte-level key-value store the cache slot lives in.
#[async_trait]
pub trait SlotStore: Send + Sync {
    async fn set(&self, key: &str, value: Bytes) -> Result<(), TabchatError>;

    /// `None` when the key was never written or the backend dropped it.
    async fn get(&self, key: &str) -> Result<Option<Bytes>, TabchatError>;
}

#[derive(Clone)]
pub struct UploadCache {
    store: Arc<dyn SlotStore>,
    key: String,
}

impl UploadCache {
    pub fn new(store: Arc<dyn SlotStore>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    pub async fn from_config(config: &CacheConfig) -> Result<Self, TabchatError> {
        let store: Arc<dyn SlotStore> = match config.backend {
            CacheBackend::Redis => Arc::new(RedisStore::connect(config).await?),
            CacheBackend::Memory => Arc::new(MemoryStore::new()),
        };
        Ok(Self::new(store, config.key.clone()))
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Replace whatever table is in the slot.
    pub async fn put(&self, table: &RecordBatch) -> Result<(), TabchatError> {
        let blob = encode(table)?;
        debug!(key = self.key.as_str(), bytes = blob.len(); "writing cache slot");
        self.store.set(&self.key, blob).await
    }

    pub async fn get(&self) -> Result<Option<RecordBatch>, TabchatError> {
        match self.store.get(&self.key).await? {
            Some(blob) => decode(&blob).map(Some),
            None => Ok(None),
        }
    }
}
