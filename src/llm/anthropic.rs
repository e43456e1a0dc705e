// ABOUTME: Anthropic Messages API provider for AI summary completions
// ABOUTME: Maps chat requests to /v1/messages and extracts the first text block of the reply
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Anthropic Provider
//!
//! The prompt is sent as a single user message. The reply's first `text`
//! content block is the completion.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error, instrument};

use super::{ChatRequest, ChatResponse, LlmProvider, TokenUsage};
use crate::errors::{AppError, ErrorCode};

/// Anthropic API version header value
const API_VERSION: &str = "2023-06-01";

/// Service name used in error messages
const SERVICE_NAME: &str = "Anthropic";

/// Connection timeout
const CONNECT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Serialize)]
struct AnthropicRequest {
    model: String,
    max_tokens: u32,
    messages: Vec<AnthropicMessage>,
}

#[derive(Debug, Serialize)]
struct AnthropicMessage {
    role: &'static str,
    content: String,
}

impl AnthropicMessage {
    fn user(content: &str) -> Self {
        Self {
            role: "user",
            content: content.to_owned(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct AnthropicResponse {
    content: Vec<ContentBlock>,
    model: String,
    #[serde(default)]
    stop_reason: Option<String>,
    #[serde(default)]
    usage: Option<AnthropicUsage>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    content_type: String,
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AnthropicUsage {
    input_tokens: u32,
    output_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct AnthropicErrorResponse {
    error: AnthropicErrorDetail,
}

#[derive(Debug, Deserialize)]
struct AnthropicErrorDetail {
    message: String,
}

/// Configuration for the Anthropic provider
#[derive(Debug, Clone)]
pub struct AnthropicConfig {
    /// API base URL, e.g. `https://api.anthropic.com/v1`
    pub base_url: String,
    /// API key sent as `x-api-key`
    pub api_key: String,
    /// Model sent with every request
    pub default_model: String,
    /// Token limit used when the request does not set one
    pub default_max_tokens: u32,
    /// Whole-request timeout
    pub timeout: Duration,
}

/// Anthropic Messages API provider
pub struct AnthropicProvider {
    client: Client,
    config: AnthropicConfig,
}

impl AnthropicProvider {
    /// Create a new provider with the given configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(config: AnthropicConfig) -> Result<Self, AppError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .timeout(config.timeout)
            .build()
            .map_err(|e| AppError::internal(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self { client, config })
    }

    fn api_url(&self, endpoint: &str) -> String {
        format!("{}/{endpoint}", self.config.base_url.trim_end_matches('/'))
    }

    fn parse_error_response(status: StatusCode, body: &str) -> AppError {
        let message = serde_json::from_str::<AnthropicErrorResponse>(body).map_or_else(
            |_| format!("HTTP {status}: {}", body.chars().take(200).collect::<String>()),
            |resp| resp.error.message,
        );

        match status.as_u16() {
            401 | 403 => AppError::external_auth(SERVICE_NAME, message),
            429 => AppError::new(
                ErrorCode::ExternalRateLimited,
                format!("{SERVICE_NAME} rate limit reached: {message}"),
            ),
            500..=599 => AppError::external_unavailable(SERVICE_NAME, message),
            _ => AppError::external_service(SERVICE_NAME, message),
        }
    }
}

#[async_trait]
impl LlmProvider for AnthropicProvider {
    fn name(&self) -> &'static str {
        "anthropic"
    }

    fn display_name(&self) -> &'static str {
        "Anthropic Claude"
    }

    fn default_model(&self) -> &str {
        &self.config.default_model
    }

    #[instrument(skip(self, request), fields(model = %self.config.default_model))]
    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, AppError> {
        let body = AnthropicRequest {
            model: self.config.default_model.clone(),
            max_tokens: request
                .max_tokens
                .unwrap_or(self.config.default_max_tokens.max(1)),
            messages: vec![AnthropicMessage::user(&request.prompt)],
        };

        debug!(
            prompt_chars = request.prompt.len(),
            max_tokens = body.max_tokens,
            "Sending Anthropic messages request"
        );

        let response = self
            .client
            .post(self.api_url("messages"))
            .header("x-api-key", &self.config.api_key)
            .header("anthropic-version", API_VERSION)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                error!("Failed to send request to Anthropic: {e}");
                if e.is_connect() || e.is_timeout() {
                    AppError::external_unavailable(SERVICE_NAME, format!("Cannot reach API: {e}"))
                } else {
                    AppError::external_service(SERVICE_NAME, format!("Request failed: {e}"))
                }
            })?;

        let status = response.status();
        let text = response.text().await.map_err(|e| {
            error!("Failed to read Anthropic response: {e}");
            AppError::external_service(SERVICE_NAME, format!("Failed to read response: {e}"))
        })?;

        if !status.is_success() {
            return Err(Self::parse_error_response(status, &text));
        }

        let parsed: AnthropicResponse = serde_json::from_str(&text).map_err(|e| {
            error!("Failed to parse Anthropic response: {e}");
            AppError::external_service(SERVICE_NAME, format!("Failed to parse response: {e}"))
        })?;

        let content = parsed
            .content
            .iter()
            .find(|block| block.content_type == "text")
            .and_then(|block| block.text.clone())
            .ok_or_else(|| AppError::external_service(SERVICE_NAME, "No text content in response"))?;

        debug!(
            chars = content.len(),
            stop_reason = ?parsed.stop_reason,
            "Received Anthropic completion"
        );

        Ok(ChatResponse {
            content,
            model: parsed.model,
            usage: parsed.usage.map(|u| TokenUsage {
                prompt_tokens: u.input_tokens,
                completion_tokens: u.output_tokens,
                total_tokens: u.input_tokens + u.output_tokens,
            }),
            finish_reason: parsed.stop_reason,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_body_shape() {
        let body = AnthropicRequest {
            model: "claude-test".to_owned(),
            max_tokens: 1000,
            messages: vec![AnthropicMessage::user("Summarize my week")],
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["model"], "claude-test");
        assert_eq!(json["max_tokens"], 1000);
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["messages"][0]["content"], "Summarize my week");
        assert!(json.get("system").is_none());
    }

    #[test]
    fn test_error_mapping() {
        let body = r#"{"type":"error","error":{"type":"authentication_error","message":"invalid x-api-key"}}"#;
        let err = AnthropicProvider::parse_error_response(StatusCode::UNAUTHORIZED, body);
        assert_eq!(err.code, ErrorCode::ExternalAuthFailed);
        assert!(err.message.contains("invalid x-api-key"));

        let err = AnthropicProvider::parse_error_response(StatusCode::TOO_MANY_REQUESTS, "slow down");
        assert_eq!(err.code, ErrorCode::ExternalRateLimited);

        let err = AnthropicProvider::parse_error_response(StatusCode::BAD_GATEWAY, "<html>");
        assert_eq!(err.code, ErrorCode::ExternalServiceUnavailable);
    }

    #[test]
    fn test_api_url_trims_trailing_slash() {
        let provider = AnthropicProvider::new(AnthropicConfig {
            base_url: "https://api.anthropic.com/v1/".to_owned(),
            api_key: "k".to_owned(),
            default_model: "m".to_owned(),
            default_max_tokens: 1000,
            timeout: Duration::from_secs(30),
        })
        .unwrap();
        assert_eq!(provider.api_url("messages"), "https://api.anthropic.com/v1/messages");
    }
}
