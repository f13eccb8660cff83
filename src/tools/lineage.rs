//! Data lineage lookup tool

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::{Tool, ToolError};

pub const LINEAGE_TOOL_NAME: &str = "Lineage_Explorer";

const DEFAULT_DEPTH: u32 = 2;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineageNode {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl LineageNode {
    fn new(name: &str, kind: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: kind.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineageReport {
    pub entity: String,
    pub upstream: Vec<LineageNode>,
    pub downstream: Vec<LineageNode>,
    pub depth: u32,
}

/// Placeholder lineage source returning a fixed two-hop graph
#[derive(Debug, Clone)]
pub struct LineageAgent {
    depth: u32,
}

impl Default for LineageAgent {
    fn default() -> Self {
        Self {
            depth: DEFAULT_DEPTH,
        }
    }
}

impl LineageAgent {
    pub fn new(depth: u32) -> Self {
        Self { depth }
    }

    pub fn get_lineage(&self, entity: &str, depth: u32) -> Result<LineageReport, ToolError> {
        let entity = entity.trim();
        if entity.is_empty() {
            return Err(ToolError::InvalidInput("entity name is empty".to_string()));
        }

        Ok(LineageReport {
            entity: entity.to_string(),
            upstream: vec![
                LineageNode::new("source_1", "table"),
                LineageNode::new("source_2", "pipeline"),
            ],
            downstream: vec![
                LineageNode::new("target_1", "report"),
                LineageNode::new("target_2", "dashboard"),
            ],
            depth,
        })
    }
}

#[async_trait]
impl Tool for LineageAgent {
    fn name(&self) -> &str {
        LINEAGE_TOOL_NAME
    }

    fn description(&self) -> &str {
        "Provides data lineage information"
    }

    async fn invoke(&self, input: &str) -> Result<Value, ToolError> {
        let report = self.get_lineage(input, self.depth)?;
        serde_json::to_value(report).map_err(|e| ToolError::Failed(e.to_string()))
    }
}
