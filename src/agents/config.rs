//! Configuration types for the routing agent

use serde::{Deserialize, Serialize};

/// Language-model connection settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LlmConfig {
    /// Provider type
    #[serde(default)]
    pub provider: LlmProviderType,
    /// Model name/identifier
    #[serde(default = "default_model")]
    pub model: String,
    /// Environment variable containing the API key
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key_env: Option<String>,
    /// Custom base URL (for self-hosted or proxied endpoints)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Sampling temperature
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    /// Max tokens per completion
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    /// Per-call timeout in seconds
    #[serde(default = "default_model_timeout")]
    pub timeout_seconds: u64,
    /// Retries for transient connectivity faults
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: LlmProviderType::default(),
            model: default_model(),
            api_key_env: None,
            base_url: None,
            temperature: None,
            max_tokens: None,
            timeout_seconds: default_model_timeout(),
            max_retries: default_max_retries(),
        }
    }
}

impl LlmConfig {
    /// Base URL, falling back to the provider's public endpoint
    pub fn resolved_base_url(&self) -> String {
        self.base_url
            .clone()
            .unwrap_or_else(|| self.provider.default_base_url().to_string())
    }

    /// Name of the environment variable holding the API key
    pub fn resolved_api_key_env(&self) -> String {
        self.api_key_env
            .clone()
            .unwrap_or_else(|| self.provider.default_api_key_env().to_string())
    }
}

fn default_model() -> String {
    "anthropic/claude-2".to_string()
}

fn default_model_timeout() -> u64 {
    60
}

fn default_max_retries() -> u32 {
    2
}

/// Supported chat-completion providers. Both speak the OpenAI wire format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LlmProviderType {
    /// OpenRouter (routes to many hosted models)
    #[default]
    OpenRouter,
    /// OpenAI
    #[serde(rename = "openai")]
    OpenAI,
}

impl LlmProviderType {
    pub fn default_base_url(&self) -> &'static str {
        match self {
            LlmProviderType::OpenRouter => "https://openrouter.ai/api/v1",
            LlmProviderType::OpenAI => "https://api.openai.com/v1",
        }
    }

    pub fn default_api_key_env(&self) -> &'static str {
        match self {
            LlmProviderType::OpenRouter => "OPENROUTER_API_KEY",
            LlmProviderType::OpenAI => "OPENAI_API_KEY",
        }
    }
}

impl std::fmt::Display for LlmProviderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LlmProviderType::OpenRouter => write!(f, "openrouter"),
            LlmProviderType::OpenAI => write!(f, "openai"),
        }
    }
}

/// Routing loop settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AgentConfig {
    /// Iteration ceiling for one query
    #[serde(default = "default_max_iterations")]
    pub max_iterations: u32,
    /// Timeout for a single tool invocation, in seconds
    #[serde(default = "default_tool_timeout")]
    pub tool_timeout_seconds: u64,
    /// Replaces the built-in instruction prefix
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            max_iterations: default_max_iterations(),
            tool_timeout_seconds: default_tool_timeout(),
            instructions: None,
        }
    }
}

fn default_max_iterations() -> u32 {
    10
}

fn default_tool_timeout() -> u64 {
    30
}

/// Conversation memory configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MemoryConfig {
    /// Retention strategy applied on every append
    #[serde(default)]
    pub strategy: MemoryStrategy,
    /// Maximum number of live sessions
    #[serde(default = "default_max_sessions")]
    pub max_sessions: usize,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            strategy: MemoryStrategy::default(),
            max_sessions: default_max_sessions(),
        }
    }
}

fn default_max_sessions() -> usize {
    1000
}

/// Memory retention strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MemoryStrategy {
    /// Keep every turn
    Full,
    /// Sliding window of most recent turns
    SlidingWindow {
        /// Number of turns to keep
        size: usize,
    },
    /// Keep first N turns + last M turns
    FirstLast {
        /// Number of initial turns to keep
        first: usize,
        /// Number of recent turns to keep
        last: usize,
    },
}

impl Default for MemoryStrategy {
    fn default() -> Self {
        Self::SlidingWindow { size: 200 }
    }
}

impl MemoryStrategy {
    /// Maximum number of retained turns, if bounded
    pub fn capacity(&self) -> Option<usize> {
        match self {
            MemoryStrategy::Full => None,
            MemoryStrategy::SlidingWindow { size } => Some(*size),
            MemoryStrategy::FirstLast { first, last } => Some(first.saturating_add(*last)),
        }
    }
}
