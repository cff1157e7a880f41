use crate::{
    conf::{CacheConfig, DelegateConfig, ServerConfig},
    core::TabchatError::{self, ConfigParsingError},
};
use config::{Config as CConfig, ConfigBuilder, Environment, builder::DefaultState};
use serde::{Deserialize, Serialize};

const ENV_PREFIX: &str = "TABCHAT";

/// Variables the service has always been deployed with. They only fill in
/// values nothing else sets.
const LEGACY_ENV: [(&str, &str); 3] = [
    ("OPENAI_API_KEY", "delegate.api_key"),
    ("AZURE_REDIS_HOSTNAME", "cache.host"),
    ("AZURE_REDIS_PASSWORD", "cache.password"),
];

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub delegate: DelegateConfig,
}

impl Config {
    pub fn from_str(toml_str: &str) -> Result<Config, TabchatError> {
        let builder = CConfig::builder()
            .add_source(config::File::from_str(toml_str, config::FileFormat::Toml));
        Self::build(builder)
    }

    /// Layers, lowest first: legacy env vars, the optional TOML file, `TABCHAT_*` env vars.
    pub fn load(path: Option<&str>) -> Result<Config, TabchatError> {
        let mut builder = CConfig::builder();
        for (var, key) in LEGACY_ENV {
            if let Ok(value) = std::env::var(var) {
                builder = builder
                    .set_default(key, value)
                    .map_err(|e| ConfigParsingError(e.to_string()))?;
            }
        }
        if let Some(path) = path {
            builder = builder.add_source(config::File::with_name(path));
        }
        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );
        Self::build(builder)
    }

    fn build(builder: ConfigBuilder<DefaultState>) -> Result<Config, TabchatError> {
        let config = builder
            .build()
            .map_err(|e| ConfigParsingError(e.to_string()))?
            .try_deserialize::<Config>()
            .map_err(|e| ConfigParsingError(e.to_string()))?;
        Ok(config)
    }
}
