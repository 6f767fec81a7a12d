//! Provider selection from configuration
//!
//! The provider name and model identifier are configuration, not code. This
//! module reads them (plus the API key and optional base URL) and builds the
//! matching [`LLMProvider`](crate::LLMProvider).

use crate::{LLMError, Result};
use std::str::FromStr;

const GEMINI_OPENAI_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/openai";
const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Supported provider kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    /// OpenAI or any OpenAI-compatible endpoint
    OpenAI,
    /// Google Gemini through its OpenAI-compatible endpoint
    Gemini,
    /// Anthropic messages API
    Anthropic,
}

impl ProviderKind {
    /// Environment variable holding the API key for this provider
    pub fn api_key_var(self) -> &'static str {
        match self {
            Self::OpenAI => "OPENAI_API_KEY",
            Self::Gemini => "GEMINI_API_KEY",
            Self::Anthropic => "ANTHROPIC_API_KEY",
        }
    }

    /// Model used when none is configured
    pub fn default_model(self) -> &'static str {
        match self {
            Self::OpenAI => "gpt-4o-mini",
            Self::Gemini => "gemini-1.5-flash",
            Self::Anthropic => "claude-sonnet-4-5-20250929",
        }
    }
}

impl FromStr for ProviderKind {
    type Err = LLMError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "openai" => Ok(Self::OpenAI),
            "gemini" => Ok(Self::Gemini),
            "anthropic" | "claude" => Ok(Self::Anthropic),
            other => Err(LLMError::ConfigurationError(format!(
                "unknown LLM provider '{other}' (expected openai, gemini or anthropic)"
            ))),
        }
    }
}

/// Resolved LLM settings
#[derive(Clone)]
pub struct LlmSettings {
    /// Which provider to talk to
    pub provider: ProviderKind,
    /// Model identifier
    pub model: String,
    /// API key
    pub api_key: String,
    /// Optional base URL override
    pub api_base: Option<String>,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl LlmSettings {
    /// Read settings from the process environment
    ///
    /// `LLM_PROVIDER` (default `gemini`), `LLM_MODEL`, `LLM_API_BASE`,
    /// `LLM_TIMEOUT_SECS`, and the provider's API key variable.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through an arbitrary lookup function
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let provider = match lookup("LLM_PROVIDER") {
            Some(name) => name.parse()?,
            None => ProviderKind::Gemini,
        };

        // OpenAI-compatible local deployments often run without a key
        let api_key = match (lookup(provider.api_key_var()), lookup("LLM_API_BASE")) {
            (Some(key), _) => key,
            (None, Some(_)) if provider == ProviderKind::OpenAI => "not-needed".to_string(),
            (None, _) => {
                return Err(LLMError::ConfigurationError(format!(
                    "{} environment variable not set",
                    provider.api_key_var()
                )));
            }
        };

        let timeout_secs = match lookup("LLM_TIMEOUT_SECS") {
            Some(raw) => raw.parse().map_err(|_| {
                LLMError::ConfigurationError(format!("invalid LLM_TIMEOUT_SECS '{raw}'"))
            })?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Self {
            provider,
            model: lookup("LLM_MODEL").unwrap_or_else(|| provider.default_model().to_string()),
            api_key,
            api_base: lookup("LLM_API_BASE"),
            timeout_secs,
        })
    }

    /// Override the provider (resets the model to the provider default)
    pub fn with_provider(mut self, provider: ProviderKind) -> Self {
        if self.provider != provider {
            self.model = provider.default_model().to_string();
        }
        self.provider = provider;
        self
    }

    /// Override the model
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Build the configured provider
    #[cfg(all(feature = "openai", feature = "anthropic"))]
    pub fn build_provider(&self) -> Result<std::sync::Arc<dyn crate::LLMProvider>> {
        use crate::providers::{AnthropicProvider, OpenAIConfig, OpenAIProvider};
        use std::sync::Arc;

        Ok(match self.provider {
            ProviderKind::OpenAI => {
                let mut config = OpenAIConfig::new(&self.api_key).with_timeout(self.timeout_secs);
                if let Some(base) = &self.api_base {
                    config = config.with_api_base(base);
                }
                Arc::new(OpenAIProvider::with_config(config)?)
            }
            ProviderKind::Gemini => {
                let config = OpenAIConfig::new(&self.api_key)
                    .with_api_base(self.api_base.as_deref().unwrap_or(GEMINI_OPENAI_BASE))
                    .with_timeout(self.timeout_secs)
                    .with_provider_name("gemini");
                Arc::new(OpenAIProvider::with_config(config)?)
            }
            ProviderKind::Anthropic => {
                let mut provider = AnthropicProvider::new(&self.api_key, self.timeout_secs)?;
                if let Some(base) = &self.api_base {
                    provider = provider.with_api_base(base);
                }
                Arc::new(provider)
            }
        })
    }
}

impl std::fmt::Debug for LlmSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmSettings")
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("api_base", &self.api_base)
            .field("timeout_secs", &self.timeout_secs)
            .finish_non_exhaustive()
    }
}
