// ABOUTME: Text-generation provider abstraction used by the AI summary client
// ABOUTME: Defines the completion request/response types and the LlmProvider trait
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # LLM Provider Interface
//!
//! The summary client only needs a single request/response completion, so
//! the contract is: send a prompt, get text back.
//!
//! ## Example: Using a Provider
//!
//! ```rust,no_run
//! use mypt_server::llm::{ChatRequest, LlmProvider};
//!
//! async fn example(provider: &dyn LlmProvider) {
//!     let request = ChatRequest::new("How am I doing?").with_max_tokens(1000);
//!     let response = provider.complete(&request).await;
//! }
//! ```

mod anthropic;
mod openai_compatible;
pub mod prompts;
mod provider;

pub use anthropic::{AnthropicConfig, AnthropicProvider};
pub use openai_compatible::{OpenAiCompatibleConfig, OpenAiCompatibleProvider};
pub use prompts::build_summary_prompt;
pub use provider::ChatProvider;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;

/// A single-prompt completion request
///
/// The prompt is sent as one user message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    /// Prompt text
    pub prompt: String,
    /// Maximum tokens to generate; the provider default applies when unset
    pub max_tokens: Option<u32>,
}

impl ChatRequest {
    /// Create a request for `prompt`
    #[must_use]
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            max_tokens: None,
        }
    }

    /// Set the maximum tokens
    #[must_use]
    pub const fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }
}

/// Response from a completion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    /// Generated text
    pub content: String,
    /// Model used for generation
    pub model: String,
    /// Token usage statistics
    pub usage: Option<TokenUsage>,
    /// Finish reason (stop, `end_turn`, `max_tokens`, ...)
    pub finish_reason: Option<String>,
}

/// Token usage statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenUsage {
    /// Number of tokens in the prompt
    pub prompt_tokens: u32,
    /// Number of tokens in the completion
    pub completion_tokens: u32,
    /// Total tokens used
    pub total_tokens: u32,
}

/// A text-generation backend
///
/// Implementations perform exactly one HTTP round trip per call and never
/// retry; the summary client decides what to do with failures.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Unique provider identifier (e.g., "anthropic", "groq")
    fn name(&self) -> &'static str;

    /// Human-readable display name for the provider
    fn display_name(&self) -> &'static str;

    /// Model every request is sent to
    fn default_model(&self) -> &str;

    /// Perform a chat completion
    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, AppError>;
}
