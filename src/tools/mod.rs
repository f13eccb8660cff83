//! Domain tools the routing agent can dispatch to

mod lineage;
mod policy;
mod sql;

pub use lineage::{LineageAgent, LineageNode, LineageReport, LINEAGE_TOOL_NAME};
pub use policy::{
    PolicyAgent, PolicyAnswer, PolicyDocument, PolicyLibrary, PolicySummary, ProcessedDocument,
    POLICY_TOOL_NAME,
};
pub use sql::{GeneratedQuery, QueryValidation, SqlAgent, SqlDialect, SQL_TOOL_NAME};

use std::sync::Arc;

use crate::agents::error::AgentResult;
use crate::agents::registry::ToolRegistry;

/// Build the registry with the built-in tools, in their fixed order
pub fn default_registry(library: Arc<PolicyLibrary>) -> AgentResult<ToolRegistry> {
    let mut registry = ToolRegistry::new();
    register_default_tools(&mut registry, library)?;
    Ok(registry)
}

/// Register SQL, policy and lineage tools, in that order
pub fn register_default_tools(registry: &mut ToolRegistry, library: Arc<PolicyLibrary>) -> AgentResult<()> {
    registry.register(Arc::new(SqlAgent::default()))?;
    registry.register(Arc::new(PolicyAgent::new(library)))?;
    registry.register(Arc::new(LineageAgent::default()))?;
    Ok(())
}
