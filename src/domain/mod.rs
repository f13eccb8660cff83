use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Errors raised by a domain tool's own logic
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("{0}")]
    Failed(String),

    #[error("Timed out after {0}s")]
    Timeout(u64),
}

/// Name and description of a registered tool, as shown to the model and API callers
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ToolInfo {
    pub name: String,
    pub description: String,
}

/// A domain capability the routing agent can dispatch to.
///
/// Implementations are registered once at startup and must be safe to call
/// from concurrent queries.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Unique name the model uses to select this tool
    fn name(&self) -> &str;

    /// What the tool is for; shown to the model in the decision prompt
    fn description(&self) -> &str;

    /// Run the tool on free-text input
    async fn invoke(&self, input: &str) -> Result<Value, ToolError>;

    fn info(&self) -> ToolInfo {
        ToolInfo {
            name: self.name().to_string(),
            description: self.description().to_string(),
        }
    }
}
