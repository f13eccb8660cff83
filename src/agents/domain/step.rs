//! Routing loop step and state types

use serde::{Deserialize, Serialize};

use super::Observation;

/// What the model decided to do in one iteration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AgentAction {
    /// Invoke a registered tool with the given input
    ToolCall { name: String, input: String },
    /// Stop and answer the caller
    FinalAnswer { text: String },
}

/// One iteration of the routing loop
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentStep {
    /// The model's reasoning, if it gave any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thought: Option<String>,
    pub action: AgentAction,
    /// Tool result; None for a final answer
    #[serde(skip_serializing_if = "Option::is_none")]
    pub observation: Option<Observation>,
}

impl AgentStep {
    pub fn new(thought: Option<String>, action: AgentAction) -> Self {
        Self {
            thought,
            action,
            observation: None,
        }
    }

    /// Render the step the way the model is asked to write it.
    ///
    /// This is the text stored for an agent action turn, so replayed history
    /// reads like the model's own scratchpad.
    pub fn render(&self) -> String {
        let mut out = String::new();
        if let Some(thought) = &self.thought {
            out.push_str("Thought: ");
            out.push_str(thought);
            out.push('\n');
        }
        match &self.action {
            AgentAction::ToolCall { name, input } => {
                out.push_str("Action: ");
                out.push_str(name);
                out.push_str("\nAction Input: ");
                out.push_str(input);
            }
            AgentAction::FinalAnswer { text } => {
                out.push_str("Final Answer: ");
                out.push_str(text);
            }
        }
        out
    }
}

/// Routing state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentState {
    Thinking,
    ToolSelected,
    ToolExecuting,
    Observing,
    Done,
    Failed,
}

impl AgentState {
    /// Whether the loop has stopped
    pub fn is_terminal(self) -> bool {
        matches!(self, AgentState::Done | AgentState::Failed)
    }

    /// Whether `next` is a legal successor of this state
    pub fn can_transition_to(self, next: AgentState) -> bool {
        use AgentState::*;
        matches!(
            (self, next),
            (Thinking, ToolSelected)
                | (Thinking, Done)
                | (Thinking, Failed)
                | (ToolSelected, ToolExecuting)
                | (ToolSelected, Failed)
                | (ToolExecuting, Observing)
                | (Observing, Thinking)
                | (Observing, Failed)
        )
    }
}

impl std::fmt::Display for AgentState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            AgentState::Thinking => "thinking",
            AgentState::ToolSelected => "tool_selected",
            AgentState::ToolExecuting => "tool_executing",
            AgentState::Observing => "observing",
            AgentState::Done => "done",
            AgentState::Failed => "failed",
        };
        write!(f, "{}", s)
    }
}

/// Result of a routing loop that reached DONE
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteOutcome {
    pub answer: String,
    /// Every step taken, including the final one
    pub steps: Vec<AgentStep>,
    /// Number of model decisions taken
    pub iterations: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_tool_step() {
        let step = AgentStep::new(
            Some("I need the schema".into()),
            AgentAction::ToolCall {
                name: "SQL_Query_Generator".into(),
                input: "customers table schema".into(),
            },
        );
        assert_eq!(
            step.render(),
            "Thought: I need the schema\nAction: SQL_Query_Generator\nAction Input: customers table schema"
        );
    }

    #[test]
    fn test_render_final_without_thought() {
        let step = AgentStep::new(None, AgentAction::FinalAnswer { text: "done".into() });
        assert_eq!(step.render(), "Final Answer: done");
    }

    #[test]
    fn test_state_transitions() {
        assert!(AgentState::Thinking.can_transition_to(AgentState::ToolSelected));
        assert!(AgentState::Observing.can_transition_to(AgentState::Thinking));
        assert!(!AgentState::Done.can_transition_to(AgentState::Thinking));
        assert!(!AgentState::Thinking.can_transition_to(AgentState::Observing));
        assert!(AgentState::Failed.is_terminal());
        assert!(!AgentState::ToolExecuting.is_terminal());
    }
}
