//! Process configuration from the environment

use std::time::Duration;
use thiserror::Error;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_API_VERSION: &str = "v21.0";
const DEFAULT_API_BASE: &str = "https://graph.facebook.com";
const DEFAULT_TTL_SECS: u64 = 86_400;
const DEFAULT_EVICTION_INTERVAL_SECS: u64 = 300;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{name} must be a number, got {value:?}")]
    InvalidNumber { name: &'static str, value: String },
    #[error("{name} must be greater than zero")]
    Zero { name: &'static str },
}

/// Credentials and endpoint for the WhatsApp Cloud API
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WhatsAppConfig {
    pub access_token: String,
    pub phone_number_id: String,
    pub api_version: String,
    pub api_base: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BotConfig {
    pub port: u16,
    /// Expected `hub.verify_token`; `None` rejects every handshake
    pub verify_token: Option<String>,
    /// Enables `X-Hub-Signature-256` verification when set
    pub app_secret: Option<String>,
    /// `None` when outbound credentials are missing
    pub whatsapp: Option<WhatsAppConfig>,
    /// `None` disables idle eviction
    pub conversation_ttl: Option<Duration>,
    pub eviction_interval: Duration,
}

impl BotConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from any variable source. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let port = match var("PORT") {
            Some(value) => value
                .parse()
                .map_err(|_| ConfigError::InvalidNumber { name: "PORT", value })?,
            None => DEFAULT_PORT,
        };

        let whatsapp = match (var("WHATSAPP_TOKEN"), var("PHONE_NUMBER_ID")) {
            (Some(access_token), Some(phone_number_id)) => Some(WhatsAppConfig {
                access_token,
                phone_number_id,
                api_version: var("GRAPH_API_VERSION")
                    .unwrap_or_else(|| DEFAULT_API_VERSION.to_string()),
                api_base: var("GRAPH_API_BASE").unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            }),
            _ => None,
        };

        let ttl_secs = parse_secs(var("CONVERSATION_TTL_SECS"), "CONVERSATION_TTL_SECS")?
            .unwrap_or(DEFAULT_TTL_SECS);
        let interval_secs = parse_secs(var("EVICTION_INTERVAL_SECS"), "EVICTION_INTERVAL_SECS")?
            .unwrap_or(DEFAULT_EVICTION_INTERVAL_SECS);
        if interval_secs == 0 {
            return Err(ConfigError::Zero {
                name: "EVICTION_INTERVAL_SECS",
            });
        }

        Ok(Self {
            port,
            verify_token: var("VERIFY_TOKEN"),
            app_secret: var("WHATSAPP_APP_SECRET"),
            whatsapp,
            conversation_ttl: (ttl_secs > 0).then_some(Duration::from_secs(ttl_secs)),
            eviction_interval: Duration::from_secs(interval_secs),
        })
    }
}

fn parse_secs(value: Option<String>, name: &'static str) -> Result<Option<u64>, ConfigError> {
    value
        .map(|value| {
            value
                .parse()
                .map_err(|_| ConfigError::InvalidNumber { name, value })
        })
        .transpose()
}
