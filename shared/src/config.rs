use serde::{de, Deserialize, Deserializer};
use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;

use crate::openai_client::{Provider, DEFAULT_CHAT_MODEL};

fn default_timeout_secs() -> u64 {
    90
}

fn default_port() -> u16 {
    3000
}

fn default_http_bind() -> String {
    "0.0.0.0".into()
}

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    #[serde(default)]
    pub llm_endpoint: Option<String>,
    #[serde(default)]
    pub deepseek_api_key: Option<String>,
    #[serde(default)]
    pub deepseek_model: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub llm_timeout_secs: Option<u64>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub port: Option<u16>,
    #[serde(default = "default_http_bind")]
    pub http_bind: String,
}

/// Treats unset and whitespace-only values the same way.
fn non_blank(v: &Option<String>) -> Option<String> {
    v.as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

// Environment values arrive as text; an empty one means "use the default".
fn blank_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(s) if !s.trim().is_empty() => s.trim().parse().map(Some).map_err(de::Error::custom),
        _ => Ok(None),
    }
}

impl Settings {
    pub fn new() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::Environment::default())
            .build()?
            .try_deserialize()
    }

    /// Generation endpoint, if one is configured.
    pub fn endpoint(&self) -> Option<String> {
        non_blank(&self.llm_endpoint)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.llm_timeout_secs.unwrap_or_else(default_timeout_secs))
    }

    pub fn port(&self) -> u16 {
        self.port.unwrap_or_else(default_port)
    }

    /// Picks the request/response dialect once: a credential switches the
    /// client to chat completions, otherwise the plain prompt body is used.
    pub fn provider(&self) -> Provider {
        match non_blank(&self.deepseek_api_key) {
            Some(credential) => Provider::Chat {
                credential,
                model: non_blank(&self.deepseek_model)
                    .unwrap_or_else(|| DEFAULT_CHAT_MODEL.to_string()),
            },
            None => Provider::Plain,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            llm_endpoint: None,
            deepseek_api_key: None,
            deepseek_model: None,
            llm_timeout_secs: None,
            port: None,
            http_bind: default_http_bind(),
        }
    }
}
