//! Configuration management.
//!
//! Configuration can be set via environment variables:
//! - `HOST` - Optional. Server host. Defaults to `127.0.0.1`.
//! - `PORT` - Optional. Server port. Defaults to `8000`.
//! - `DEFAULT_MODEL` - Optional. Model used for session rounds. Defaults to `gpt-4o-mini`.
//! - `OPENAI_API_KEY` - Optional. Model client credential. A session round
//!   without it fails at call time; the gateway endpoints still work.
//! - `OPENAI_BASE_URL` - Optional. Chat Completions base URL.
//! - `APCA_API_KEY_ID` / `APCA_API_SECRET_KEY` - Optional. Default brokerage
//!   credential pair. A partial pair is treated as absent.
//! - `FMP_KEY` - Optional. Default market-data API key.
//! - `BROKERAGE_BASE_URL` / `MARKET_DATA_BASE_URL` - Optional. Upstream base
//!   URL overrides.
//! - `GATEWAY_TIMEOUT_SECS` - Optional. Upstream request timeout. Defaults to `30`.
//!
//! No credential is required at startup: requests that need an absent one
//! report it per call instead.

use thiserror::Error;

use crate::gateway::{
    BrokerageCredentials, GatewayConfig, DEFAULT_BROKERAGE_BASE_URL, DEFAULT_MARKET_DATA_BASE_URL,
};
use crate::llm::DEFAULT_OPENAI_BASE_URL;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

/// Process-wide configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host
    pub host: String,

    /// Server port
    pub port: u16,

    /// Model identifier used for session rounds
    pub default_model: String,

    /// Model client credential
    pub openai_api_key: Option<String>,

    /// Chat Completions base URL
    pub openai_base_url: String,

    /// Upstream gateway configuration
    pub gateway: GatewayConfig,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());

        let port = std::env::var("PORT")
            .unwrap_or_else(|_| "8000".to_string())
            .parse()
            .map_err(|e| ConfigError::InvalidValue("PORT".to_string(), format!("{}", e)))?;

        let default_model =
            std::env::var("DEFAULT_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string());

        let openai_api_key = env_opt("OPENAI_API_KEY");
        let openai_base_url = std::env::var("OPENAI_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_OPENAI_BASE_URL.to_string());

        // Both halves or nothing; a partial pair is treated as absent.
        let brokerage = match (env_opt("APCA_API_KEY_ID"), env_opt("APCA_API_SECRET_KEY")) {
            (Some(key_id), Some(secret)) => Some(BrokerageCredentials { key_id, secret }),
            _ => None,
        };

        let timeout_secs = std::env::var("GATEWAY_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".to_string())
            .parse()
            .map_err(|e| {
                ConfigError::InvalidValue("GATEWAY_TIMEOUT_SECS".to_string(), format!("{}", e))
            })?;

        let gateway = GatewayConfig {
            brokerage_base_url: std::env::var("BROKERAGE_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_BROKERAGE_BASE_URL.to_string()),
            market_data_base_url: std::env::var("MARKET_DATA_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_MARKET_DATA_BASE_URL.to_string()),
            brokerage,
            market_data_key: env_opt("FMP_KEY"),
            timeout_secs,
        };

        Ok(Self {
            host,
            port,
            default_model,
            openai_api_key,
            openai_base_url,
            gateway,
        })
    }
}

/// Read an optional variable; set-but-empty counts as unset.
fn env_opt(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.is_empty())
}
