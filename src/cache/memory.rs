use std::collections::HashMap;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::sync::RwLock;

use crate::core::TabchatError;

use super::SlotStore;

/// Process-local store. Nothing is shared across workers or restarts.
#[derive(Default)]
pub struct MemoryStore {
    slots: RwLock<HashMap<String, Bytes>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SlotStore for MemoryStore {
    async fn set(&self, key: &str, value: Bytes) -> Result<(), TabchatError> {
        self.slots.write().await.insert(key.to_string(), value);
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<Bytes>, TabchatError> {
        Ok(self.slots.read().await.get(key).cloned())
    }
}
