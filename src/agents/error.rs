//! Error types for the routing agent

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while routing a query
#[derive(Debug, Error)]
pub enum AgentError {
    /// A tool with the same name is already registered
    #[error("Duplicate tool: {0}")]
    DuplicateTool(String),

    /// The requested tool is not in the registry
    #[error("Tool not found: {0}")]
    ToolNotFound(String),

    /// Model output did not match either expected shape after the re-prompt
    #[error("Could not parse model output: {reason}")]
    Parse { reason: String, raw: String },

    /// Loop exceeded its configured ceiling
    #[error("Max iterations ({0}) reached without a final answer")]
    IterationLimit(u32),

    /// A tool failed internally
    #[error("Tool '{tool}' failed: {message}")]
    ToolInvocation { tool: String, message: String },

    /// The completion endpoint could not be reached
    #[error("Language model unavailable: {0}")]
    ModelUnavailable(String),

    /// The completion endpoint did not answer in time
    #[error("Language model timed out after {0}s")]
    ModelTimeout(u64),

    /// Query was cancelled between iterations
    #[error("Query was cancelled")]
    Cancelled,

    /// Request rejected before routing
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Stable, machine-readable error kind exposed to API callers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    DuplicateTool,
    ToolNotFound,
    AgentParseError,
    AgentIterationLimit,
    ToolInvocation,
    ModelUnavailable,
    ModelTimeout,
    Cancelled,
    InvalidRequest,
    Configuration,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ErrorKind::DuplicateTool => "duplicate_tool",
            ErrorKind::ToolNotFound => "tool_not_found",
            ErrorKind::AgentParseError => "agent_parse_error",
            ErrorKind::AgentIterationLimit => "agent_iteration_limit",
            ErrorKind::ToolInvocation => "tool_invocation",
            ErrorKind::ModelUnavailable => "model_unavailable",
            ErrorKind::ModelTimeout => "model_timeout",
            ErrorKind::Cancelled => "cancelled",
            ErrorKind::InvalidRequest => "invalid_request",
            ErrorKind::Configuration => "configuration",
        };
        write!(f, "{}", s)
    }
}

impl AgentError {
    /// Get the error kind surfaced to callers
    pub fn kind(&self) -> ErrorKind {
        match self {
            AgentError::DuplicateTool(_) => ErrorKind::DuplicateTool,
            AgentError::ToolNotFound(_) => ErrorKind::ToolNotFound,
            AgentError::Parse { .. } => ErrorKind::AgentParseError,
            AgentError::IterationLimit(_) => ErrorKind::AgentIterationLimit,
            AgentError::ToolInvocation { .. } => ErrorKind::ToolInvocation,
            AgentError::ModelUnavailable(_) => ErrorKind::ModelUnavailable,
            AgentError::ModelTimeout(_) => ErrorKind::ModelTimeout,
            AgentError::Cancelled => ErrorKind::Cancelled,
            AgentError::InvalidRequest(_) => ErrorKind::InvalidRequest,
            AgentError::Configuration(_) => ErrorKind::Configuration,
        }
    }
}

/// Errors specific to the language-model transport
#[derive(Debug, Error)]
pub enum LlmError {
    /// API error
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Rate limited
    #[error("Rate limited: retry after {retry_after_ms}ms")]
    RateLimited { retry_after_ms: u64 },

    /// Authentication error
    #[error("Authentication error: {0}")]
    Authentication(String),

    /// Network error
    #[error("Network error: {0}")]
    Network(String),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Timeout
    #[error("Request timed out")]
    Timeout,
}

impl LlmError {
    /// Whether a retry could plausibly succeed
    pub fn is_transient(&self) -> bool {
        match self {
            LlmError::Network(_) | LlmError::RateLimited { .. } => true,
            LlmError::Api { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            LlmError::Timeout
        } else if err.is_connect() {
            LlmError::Network(format!("Connection error: {}", err))
        } else {
            LlmError::Network(err.to_string())
        }
    }
}

impl From<LlmError> for AgentError {
    fn from(err: LlmError) -> Self {
        match err {
            // The transport timeout carries no duration; the router reports its own.
            LlmError::Timeout => AgentError::ModelTimeout(0),
            other => AgentError::ModelUnavailable(other.to_string()),
        }
    }
}

/// Result type alias for agent operations
pub type AgentResult<T> = Result<T, AgentError>;

/// Result type alias for LLM operations
pub type LlmResult<T> = Result<T, LlmError>;
