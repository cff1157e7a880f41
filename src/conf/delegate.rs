use std::time::Duration;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct DelegateConfig {
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "DelegateConfig::default_base_url")]
    pub base_url: String,
    #[serde(default = "DelegateConfig::default_model")]
    pub model: String,
    #[serde(with = "humantime_serde", default = "DelegateConfig::default_timeout")]
    pub timeout: Duration,
}

impl DelegateConfig {
    fn default_base_url() -> String {
        String::from("https://api.openai.com/v1")
    }

    fn default_model() -> String {
        String::from("gpt-3.5-turbo")
    }

    fn default_timeout() -> Duration {
        Duration::from_secs(60)
    }
}

impl Default for DelegateConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: Self::default_base_url(),
            model: Self::default_model(),
            timeout: Self::default_timeout(),
        }
    }
}
