use anyhow::{Context, Result};

use crate::key_manager::{get_secret, OPENROUTER_API_KEY};

pub const OPENROUTER_HOST: &str = "https://openrouter.ai/api/v1";
pub const DEFAULT_MODEL: &str = "openai/gpt-4o-mini";

/// Configuration for the OpenRouter chat completion provider.
/// Constructed once at startup and injected into the provider, never
/// read as an ambient global.
#[derive(Debug, Clone)]
pub struct OpenRouterProviderConfig {
    pub host: String,
    pub api_key: String,
    pub model: String,
    pub temperature: Option<f32>,
    pub max_tokens: Option<i32>,
}

impl OpenRouterProviderConfig {
    pub fn new(api_key: String, model: String) -> Self {
        Self {
            host: OPENROUTER_HOST.to_string(),
            api_key,
            model,
            temperature: None,
            max_tokens: None,
        }
    }

    /// Build the config from process configuration. A missing chat
    /// provider credential is fatal here, before any provider call.
    pub fn from_env() -> Result<Self> {
        let api_key = get_secret(OPENROUTER_API_KEY)
            .with_context(|| format!("{} is required to reach the chat provider", OPENROUTER_API_KEY))?;
        Ok(Self::new(api_key, DEFAULT_MODEL.to_string()))
    }
}
