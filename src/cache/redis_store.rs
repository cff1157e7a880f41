use async_trait::async_trait;
use bytes::Bytes;
use log::info;
use redis::AsyncCommands;
use redis::aio::ConnectionManager;

use crate::conf::CacheConfig;
use crate::core::TabchatError;

use super::SlotStore;

/// Store backed by a shared redis instance, reconnecting on failure.
#[derive(Clone)]
pub struct RedisStore {
    conn: ConnectionManager,
}

impl RedisStore {
    pub async fn connect(config: &CacheConfig) -> Result<Self, TabchatError> {
        let url = config.redis_url()?;
        let host = url.host_str().unwrap_or_default().to_string();
        let client = redis::Client::open(url)?;
        let conn = ConnectionManager::new(client).await?;
        info!(host = host, tls = config.tls; "connected to redis");
        Ok(Self { conn })
    }
}

#[async_trait]
impl SlotStore for RedisStore {
    async fn set(&self, key: &str, value: Bytes) -> Result<(), TabchatError> {
        let mut conn = self.conn.clone();
        conn.set::<_, _, ()>(key, value.as_ref()).await?;
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<Bytes>, TabchatError> {
        let mut conn = self.conn.clone();
        let value: Option<Vec<u8>> = conn.get(key).await?;
        Ok(value.map(Bytes::from))
    }
}
