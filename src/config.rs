//! Runtime configuration, read from the environment (and `.env` via the binary).

use crate::error::{CoachError, Result};
use crate::llm::gateways::openai::{OpenAIConfig, DEFAULT_BASE_URL};
use crate::session::state::DEFAULT_USER_NAME;
use crate::store::DEFAULT_CONVERSATIONS_DIR;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_BIND: &str = "127.0.0.1:8501";

#[derive(Debug, Clone)]
pub struct Config {
    pub openai: OpenAIConfig,
    pub model: String,
    pub conversations_dir: PathBuf,
    pub bind: SocketAddr,
    pub default_user: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let timeout = match get("OPENAI_TIMEOUT_SECS") {
            Some(raw) => Some(Duration::from_secs(raw.trim().parse().map_err(|_| {
                CoachError::ConfigError(format!("OPENAI_TIMEOUT_SECS must be whole seconds, got {:?}", raw))
            })?)),
            None => None,
        };

        let bind_raw = get("COACH_BIND").unwrap_or_else(|| DEFAULT_BIND.to_string());
        let bind: SocketAddr = bind_raw.trim().parse().map_err(|_| {
            CoachError::ConfigError(format!("COACH_BIND must be host:port, got {:?}", bind_raw))
        })?;

        Ok(Self {
            openai: OpenAIConfig {
                api_key: get("OPENAI_API_KEY").unwrap_or_default(),
                base_url: get("OPENAI_API_ENDPOINT").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
                timeout,
            },
            model: get("COACH_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            conversations_dir: get("COACH_CONVERSATIONS_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_CONVERSATIONS_DIR)),
            bind,
            default_user: get("COACH_DEFAULT_USER").unwrap_or_else(|| DEFAULT_USER_NAME.to_string()),
        })
    }
}
