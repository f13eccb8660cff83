//! Conversation turn types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Who produced a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnRole {
    /// The caller's query
    User,
    /// The agent: a tool action or the final answer
    Agent,
    /// Result of a tool invocation
    ToolObservation,
}

impl std::fmt::Display for TurnRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TurnRole::User => write!(f, "user"),
            TurnRole::Agent => write!(f, "agent"),
            TurnRole::ToolObservation => write!(f, "tool_observation"),
        }
    }
}

/// A turn waiting to be appended. Memory stamps it with its sequence position.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTurn {
    pub role: TurnRole,
    pub text: String,
    pub tool: Option<String>,
    pub is_error: bool,
}

impl NewTurn {
    /// The caller's query
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: TurnRole::User,
            text: text.into(),
            tool: None,
            is_error: false,
        }
    }

    /// An agent turn selecting a tool
    pub fn action(text: impl Into<String>, tool: impl Into<String>) -> Self {
        Self {
            role: TurnRole::Agent,
            text: text.into(),
            tool: Some(tool.into()),
            is_error: false,
        }
    }

    /// The final answer
    pub fn answer(text: impl Into<String>) -> Self {
        Self {
            role: TurnRole::Agent,
            text: text.into(),
            tool: None,
            is_error: false,
        }
    }

    /// A tool observation, optionally marked as an error
    pub fn observation(text: impl Into<String>, tool: impl Into<String>, is_error: bool) -> Self {
        Self {
            role: TurnRole::ToolObservation,
            text: text.into(),
            tool: Some(tool.into()),
            is_error,
        }
    }
}

/// An appended, immutable conversation turn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    /// Logical timestamp: position in the session's append order
    pub seq: u64,
    pub role: TurnRole,
    pub text: String,
    /// Tool the turn refers to (actions and observations)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_error: bool,
    pub created_at: DateTime<Utc>,
}

impl Turn {
    pub(crate) fn stamp(seq: u64, turn: NewTurn) -> Self {
        Self {
            seq,
            role: turn.role,
            text: turn.text,
            tool: turn.tool,
            is_error: turn.is_error,
            created_at: Utc::now(),
        }
    }

    /// Get a preview of the turn text
    pub fn preview(&self, max_chars: usize) -> String {
        if self.text.chars().count() > max_chars {
            let cut: String = self.text.chars().take(max_chars).collect();
            format!("{}...", cut)
        } else {
            self.text.clone()
        }
    }
}
