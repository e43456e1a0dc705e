// ABOUTME: Unified LLM provider selector built from server configuration
// ABOUTME: Wraps the Anthropic or OpenAI-compatible provider behind one LlmProvider implementation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # LLM Provider Selector
//!
//! `MYPT_LLM_PROVIDER` picks the backend:
//! - `anthropic` (default): Messages API, key from `ANTHROPIC_API_KEY`
//! - `openai_compatible`: any `chat/completions` endpoint (Groq, Ollama, vLLM)

use async_trait::async_trait;
use std::fmt;
use std::time::Duration;
use tracing::info;

use super::{
    AnthropicConfig, AnthropicProvider, ChatRequest, ChatResponse, LlmProvider,
    OpenAiCompatibleConfig, OpenAiCompatibleProvider,
};
use crate::config::{LlmConfig, LlmProviderType};
use crate::errors::AppError;

/// Unified chat provider that wraps the configured backend
pub enum ChatProvider {
    /// Anthropic Messages API
    Anthropic(AnthropicProvider),
    /// `OpenAI`-compatible `chat/completions` endpoint
    OpenAiCompatible(OpenAiCompatibleProvider),
}

impl ChatProvider {
    /// Build the configured provider
    ///
    /// Returns `Ok(None)` when the backend needs an API key and none is set;
    /// the summary client then answers every request with the heuristic
    /// fallback. Local `OpenAI`-compatible servers run without a key.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn from_config(config: &LlmConfig) -> Result<Option<Self>, AppError> {
        let timeout = Duration::from_secs(config.timeout_secs);

        let provider = match config.provider {
            LlmProviderType::Anthropic => {
                let Some(api_key) = config.api_key.clone() else {
                    info!("No Anthropic API key configured; AI summaries will use the fallback");
                    return Ok(None);
                };
                Self::Anthropic(AnthropicProvider::new(AnthropicConfig {
                    base_url: config.base_url.clone(),
                    api_key,
                    default_model: config.model.clone(),
                    default_max_tokens: config.max_tokens,
                    timeout,
                })?)
            }
            LlmProviderType::OpenAiCompatible => {
                Self::OpenAiCompatible(OpenAiCompatibleProvider::new(OpenAiCompatibleConfig {
                    base_url: config.base_url.clone(),
                    api_key: config.api_key.clone(),
                    default_model: config.model.clone(),
                    timeout,
                })?)
            }
        };

        info!(
            "Initialized LLM provider: {} (model {})",
            provider.display_name(),
            provider.default_model()
        );
        Ok(Some(provider))
    }
}

impl fmt::Debug for ChatProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Anthropic(_) => f.debug_tuple("ChatProvider::Anthropic").finish(),
            Self::OpenAiCompatible(_) => f.debug_tuple("ChatProvider::OpenAiCompatible").finish(),
        }
    }
}

#[async_trait]
impl LlmProvider for ChatProvider {
    fn name(&self) -> &'static str {
        match self {
            Self::Anthropic(p) => p.name(),
            Self::OpenAiCompatible(p) => p.name(),
        }
    }

    fn display_name(&self) -> &'static str {
        match self {
            Self::Anthropic(p) => p.display_name(),
            Self::OpenAiCompatible(p) => p.display_name(),
        }
    }

    fn default_model(&self) -> &str {
        match self {
            Self::Anthropic(p) => p.default_model(),
            Self::OpenAiCompatible(p) => p.default_model(),
        }
    }

    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, AppError> {
        match self {
            Self::Anthropic(p) => p.complete(request).await,
            Self::OpenAiCompatible(p) => p.complete(request).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anthropic_without_key_yields_none() {
        let config = LlmConfig::default();
        assert!(ChatProvider::from_config(&config).unwrap().is_none());
    }

    #[test]
    fn test_anthropic_with_key() {
        let config = LlmConfig {
            api_key: Some("sk-test".to_owned()),
            ..LlmConfig::default()
        };
        let provider = ChatProvider::from_config(&config).unwrap().unwrap();
        assert_eq!(format!("{provider:?}"), "ChatProvider::Anthropic");
        assert_eq!(provider.name(), "anthropic");
    }

    #[test]
    fn test_openai_compatible_runs_without_key() {
        let config = LlmConfig {
            provider: LlmProviderType::OpenAiCompatible,
            base_url: "http://localhost:11434/v1".to_owned(),
            model: "llama3".to_owned(),
            ..LlmConfig::default()
        };
        let provider = ChatProvider::from_config(&config).unwrap().unwrap();
        assert_eq!(provider.default_model(), "llama3");
    }
}
