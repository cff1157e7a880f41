use serde::{Deserialize, Serialize};
use url::Url;

use crate::core::TabchatError;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackend {
    #[default]
    Redis,
    Memory,
}

/// Where the uploaded table lives between `upload` and `question`.
///
/// With the redis backend, `url` wins over the `host`/`port`/`password`
/// triple when both are given.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct CacheConfig {
    #[serde(default)]
    pub backend: CacheBackend,
    #[serde(default = "CacheConfig::default_key")]
    pub key: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub host: Option<String>,
    #[serde(default = "CacheConfig::default_port")]
    pub port: u16,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub db: i64,
    #[serde(default = "CacheConfig::default_tls")]
    pub tls: bool,
}

impl CacheConfig {
    pub fn default_key() -> String {
        String::from("df_cache")
    }

    fn default_port() -> u16 {
        6380
    }

    fn default_tls() -> bool {
        true
    }

    /// Connection URL for the redis client, with the password percent-encoded.
    pub fn redis_url(&self) -> Result<Url, TabchatError> {
        if let Some(url) = &self.url {
            return Url::parse(url)
                .map_err(|e| TabchatError::ConfigParsingError(format!("cache.url: {e}")));
        }

        let host = self.host.as_deref().ok_or_else(|| {
            TabchatError::ConfigParsingError(
                "cache.host or cache.url is required for the redis backend".to_string(),
            )
        })?;
        let scheme = if self.tls { "rediss" } else { "redis" };
        let mut url = Url::parse(&format!("{scheme}://{host}:{}/{}", self.port, self.db))
            .map_err(|e| TabchatError::ConfigParsingError(format!("cache.host: {e}")))?;
        if let Some(password) = &self.password {
            url.set_password(Some(password)).map_err(|_| {
                TabchatError::ConfigParsingError("cache.password cannot be set on url".into())
            })?;
        }
        Ok(url)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            backend: CacheBackend::default(),
            key: Self::default_key(),
            url: None,
            host: None,
            port: Self::default_port(),
            password: None,
            db: 0,
            tls: Self::default_tls(),
        }
    }
}
