// ABOUTME: Environment-based configuration for the MyPT server
// ABOUTME: Parses HTTP binding, database URL, LLM provider settings and the goal adjustment policy
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::constants::llm as llm_defaults;
use anyhow::Result;
use mypt_intelligence::GoalAdjustmentPolicy;
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::str::FromStr;
use tracing::{info, warn};

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_HTTP_PORT: u16 = 8081;
const DEFAULT_DATABASE_URL: &str = "sqlite:./data/mypt.db";
const DEFAULT_ANTHROPIC_MODEL: &str = "claude-3-sonnet-20240229";
const DEFAULT_ANTHROPIC_BASE_URL: &str = "https://api.anthropic.com/v1";
const DEFAULT_OPENAI_COMPATIBLE_MODEL: &str = "llama-3.3-70b-versatile";
const DEFAULT_OPENAI_COMPATIBLE_BASE_URL: &str = "https://api.groq.com/openai/v1";
const DEFAULT_LLM_TIMEOUT_SECS: u64 = 60;

/// Deployment environment
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Local development
    #[default]
    Development,
    /// Production deployment
    Production,
    /// Automated tests
    Testing,
}

impl Environment {
    /// Parse from string with fallback
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            "testing" | "test" => Self::Testing,
            _ => Self::Development,
        }
    }

    /// Check if this is a production environment
    #[must_use]
    pub const fn is_production(self) -> bool {
        matches!(self, Self::Production)
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
            Self::Testing => write!(f, "testing"),
        }
    }
}

/// Text-generation backend used for AI summaries
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LlmProviderType {
    /// Anthropic Messages API (default)
    #[default]
    Anthropic,
    /// Any `OpenAI`-compatible `chat/completions` endpoint (Groq, Ollama, vLLM)
    OpenAiCompatible,
}

impl LlmProviderType {
    /// Environment variable name for provider selection
    pub const ENV_VAR: &'static str = "MYPT_LLM_PROVIDER";

    /// Parse from string with fallback to default
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "openai_compatible" | "openai" | "groq" | "ollama" | "vllm" | "local" => {
                Self::OpenAiCompatible
            }
            _ => Self::Anthropic,
        }
    }

    /// Model used when `MYPT_LLM_MODEL` is unset
    #[must_use]
    pub const fn default_model(self) -> &'static str {
        match self {
            Self::Anthropic => DEFAULT_ANTHROPIC_MODEL,
            Self::OpenAiCompatible => DEFAULT_OPENAI_COMPATIBLE_MODEL,
        }
    }

    /// API base URL used when `MYPT_LLM_BASE_URL` is unset
    #[must_use]
    pub const fn default_base_url(self) -> &'static str {
        match self {
            Self::Anthropic => DEFAULT_ANTHROPIC_BASE_URL,
            Self::OpenAiCompatible => DEFAULT_OPENAI_COMPATIBLE_BASE_URL,
        }
    }
}

impl fmt::Display for LlmProviderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Anthropic => write!(f, "anthropic"),
            Self::OpenAiCompatible => write!(f, "openai_compatible"),
        }
    }
}

/// Text-generation client settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Which backend to talk to
    pub provider: LlmProviderType,
    /// Model identifier sent with each request
    pub model: String,
    /// API base URL
    pub base_url: String,
    /// API key; `None` disables the model call and every summary uses the fallback
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    /// Token limit per completion
    pub max_tokens: u32,
    /// Whole-request timeout
    pub timeout_secs: u64,
}

impl LlmConfig {
    /// Load LLM settings from environment
    ///
    /// # Errors
    ///
    /// Returns an error if a numeric variable cannot be parsed
    pub fn from_env() -> Result<Self> {
        let provider = env::var(LlmProviderType::ENV_VAR)
            .map(|s| LlmProviderType::from_str_or_default(&s))
            .unwrap_or_default();

        let api_key = match provider {
            LlmProviderType::Anthropic => non_empty_var("MYPT_LLM_API_KEY")
                .or_else(|| non_empty_var("ANTHROPIC_API_KEY")),
            LlmProviderType::OpenAiCompatible => non_empty_var("MYPT_LLM_API_KEY"),
        };

        Ok(Self {
            provider,
            model: env_var_or("MYPT_LLM_MODEL", provider.default_model()),
            base_url: env_var_or("MYPT_LLM_BASE_URL", provider.default_base_url()),
            api_key,
            max_tokens: parse_var("MYPT_LLM_MAX_TOKENS", llm_defaults::DEFAULT_MAX_TOKENS)?,
            timeout_secs: parse_var("MYPT_LLM_TIMEOUT_SECS", DEFAULT_LLM_TIMEOUT_SECS)?,
        })
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        let provider = LlmProviderType::default();
        Self {
            provider,
            model: provider.default_model().to_owned(),
            base_url: provider.default_base_url().to_owned(),
            api_key: None,
            max_tokens: llm_defaults::DEFAULT_MAX_TOKENS,
            timeout_secs: DEFAULT_LLM_TIMEOUT_SECS,
        }
    }
}

/// Complete server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Interface to bind
    pub host: String,
    /// HTTP port
    pub http_port: u16,
    /// `sqlx` connection URL (`sqlite:path` or `sqlite::memory:`)
    pub database_url: String,
    /// Deployment environment
    pub environment: Environment,
    /// Text-generation settings
    pub llm: LlmConfig,
    /// How AI-suggested goal weights may replace the stored goal
    pub goal_policy: GoalAdjustmentPolicy,
    /// Allowed CORS origins; `*` allows any
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_owned(),
            http_port: DEFAULT_HTTP_PORT,
            database_url: DEFAULT_DATABASE_URL.to_owned(),
            environment: Environment::default(),
            llm: LlmConfig::default(),
            goal_policy: GoalAdjustmentPolicy::default(),
            cors_origins: vec!["*".to_owned()],
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is present but unparseable, or if the
    /// resulting configuration fails validation
    pub fn from_env() -> Result<Self> {
        info!("Loading configuration from environment variables");

        let goal_policy = match env::var("MYPT_GOAL_POLICY") {
            Ok(value) => value
                .parse::<GoalAdjustmentPolicy>()
                .map_err(|e| anyhow::anyhow!("Invalid MYPT_GOAL_POLICY: {e}"))?,
            Err(_) => GoalAdjustmentPolicy::default(),
        };

        let config = Self {
            host: env_var_or("HOST", DEFAULT_HOST),
            http_port: parse_var("HTTP_PORT", DEFAULT_HTTP_PORT)?,
            database_url: env_var_or("DATABASE_URL", DEFAULT_DATABASE_URL),
            environment: Environment::from_str_or_default(&env_var_or(
                "ENVIRONMENT",
                "development",
            )),
            llm: LlmConfig::from_env()?,
            goal_policy,
            cors_origins: parse_origins(&env_var_or("CORS_ALLOWED_ORIGINS", "*")),
        };

        config.validate()?;
        info!("Configuration loaded successfully");
        Ok(config)
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns an error for values the server cannot start with
    pub fn validate(&self) -> Result<()> {
        if !self.database_url.starts_with("sqlite:") {
            return Err(anyhow::anyhow!(
                "DATABASE_URL must be a sqlite URL, got '{}'",
                self.database_url
            ));
        }

        if self.llm.max_tokens == 0 {
            return Err(anyhow::anyhow!("MYPT_LLM_MAX_TOKENS must be greater than 0"));
        }

        if self.llm.model.trim().is_empty() {
            return Err(anyhow::anyhow!("MYPT_LLM_MODEL cannot be empty"));
        }

        if self.llm.api_key.is_none() {
            warn!(
                "No API key configured for {} provider; AI summaries will use the heuristic fallback",
                self.llm.provider
            );
        }

        if self.environment.is_production() && self.cors_origins.iter().any(|o| o == "*") {
            warn!("CORS allows any origin in production");
        }

        Ok(())
    }

    /// Human-readable configuration summary for startup logs
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "MyPT Server Configuration:\n\
             - Bind: {}:{}\n\
             - Environment: {}\n\
             - Database: {}\n\
             - LLM Provider: {} ({})\n\
             - LLM API Key: {}\n\
             - Goal Policy: {}\n\
             - CORS Origins: {}",
            self.host,
            self.http_port,
            self.environment,
            self.database_url,
            self.llm.provider,
            self.llm.model,
            if self.llm.api_key.is_some() {
                "configured"
            } else {
                "missing (fallback only)"
            },
            self.goal_policy,
            self.cors_origins.join(","),
        )
    }
}

fn env_var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_owned())
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_var<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    match env::var(key) {
        Ok(value) => value
            .trim()
            .parse::<T>()
            .map_err(|e| anyhow::anyhow!("Invalid {key} value '{value}': {e}")),
        Err(_) => Ok(default),
    }
}

/// Parse comma-separated CORS origins
fn parse_origins(origins_str: &str) -> Vec<String> {
    if origins_str.trim() == "*" {
        vec!["*".to_owned()]
    } else {
        origins_str
            .split(',')
            .map(|s| s.trim().to_owned())
            .filter(|s| !s.is_empty())
            .collect()
    }
}
