//! Tool observation types

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Result of invoking a tool, as fed back into the routing loop
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Name of the tool that was called
    pub tool_name: String,
    /// Input passed to the tool
    pub input: String,
    /// Output returned by the tool (Null on failure)
    pub output: Value,
    /// Execution time in milliseconds
    pub execution_time_ms: u64,
    /// Whether the tool execution succeeded
    pub success: bool,
    /// Error message if execution failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Observation {
    /// Create a successful observation
    pub fn success(tool_name: String, input: String, output: Value, execution_time_ms: u64) -> Self {
        Self {
            tool_name,
            input,
            output,
            execution_time_ms,
            success: true,
            error: None,
        }
    }

    /// Create a failed observation
    pub fn failure(tool_name: String, input: String, error: String, execution_time_ms: u64) -> Self {
        Self {
            tool_name,
            input,
            output: Value::Null,
            execution_time_ms,
            success: false,
            error: Some(error),
        }
    }

    /// Text shown to the model and stored in memory
    pub fn render(&self) -> String {
        match (&self.error, &self.output) {
            (Some(err), _) => format!("Error: {}", err),
            (None, Value::String(s)) => s.clone(),
            (None, other) => other.to_string(),
        }
    }
}
