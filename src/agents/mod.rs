//! Tool-routing agent for Comply Nav
//!
//! A free-text query is dispatched to a domain tool chosen by a language
//! model, in a "think, select tool, observe, repeat" loop, with the
//! conversation retained per session.
//!
//! ## Architecture
//!
//! - `domain/` - Core types (Turn, AgentStep, AgentAction, Observation)
//! - `registry` - Name-unique tool registry
//! - `memory/` - Per-session conversation memory and retention strategies
//! - `llm/` - Language-model completion interface and clients
//! - `core/` - Prompt builder, reply parser and the routing loop
//! - `service` - Query facade returning answers or typed failures
//! - `context` - Application context wiring it all together

pub mod config;
pub mod context;
pub mod core;
pub mod domain;
pub mod error;
pub mod llm;
pub mod memory;
pub mod registry;
pub mod service;

// Re-export commonly used types
pub use config::*;
pub use domain::*;
pub use error::*;
pub use registry::ToolRegistry;
pub use service::{QueryFailure, QueryRequest, QueryResponse, QueryService};
