//! Routing core
//!
//! - `prompt`: decision prompt rendering (Tera)
//! - `parser`: strict model-reply parser producing `AgentStep`s
//! - `router`: the `ToolRoutingAgent` loop

mod parser;
mod prompt;
mod router;

pub use parser::parse_step;
pub use prompt::{format_instructions, PromptBuilder, DEFAULT_INSTRUCTIONS};
pub use router::ToolRoutingAgent;
