//! Decision prompt assembly

use serde::Serialize;
use tera::{Context, Tera};

use crate::agents::error::{AgentError, AgentResult};
use crate::domain::ToolInfo;

/// Instruction prefix used when none is configured
pub const DEFAULT_INSTRUCTIONS: &str =
    "You are a compliance navigation assistant with access to the following tools:";

const DECISION_TEMPLATE_NAME: &str = "decision";

const DECISION_TEMPLATE: &str = r#"{{ instructions }}

{% for tool in tools %}{{ tool.name }}: {{ tool.description }}
{% endfor %}
{{ format_instructions }}

Answer user queries using the most appropriate tool(s).
Use the conversation so far as context when it is relevant.

Question: {{ input }}"#;

/// Reminder of the two reply shapes the parser accepts
pub fn format_instructions(tool_names: &str) -> String {
    format!(
        "Use the following format:\n\n\
         Thought: you should always think about what to do\n\
         Action: the action to take, should be one of [{}]\n\
         Action Input: the input to the action\n\n\
         or, once you know the answer:\n\n\
         Thought: I now know the final answer\n\
         Final Answer: the final answer to the original question\n\n\
         Reply with exactly one Action and Action Input, or exactly one Final Answer.",
        tool_names
    )
}

#[derive(Serialize)]
struct ToolLine<'a> {
    name: &'a str,
    description: &'a str,
}

/// Renders decision prompts for the routing loop
pub struct PromptBuilder {
    tera: Tera,
    instructions: String,
}

impl PromptBuilder {
    pub fn new(instructions: Option<&str>) -> AgentResult<Self> {
        let mut tera = Tera::default();
        tera.autoescape_on(vec![]);
        tera.add_raw_template(DECISION_TEMPLATE_NAME, DECISION_TEMPLATE)
            .map_err(|e| AgentError::Configuration(format!("Invalid prompt template: {}", e)))?;

        Ok(Self {
            tera,
            instructions: instructions.unwrap_or(DEFAULT_INSTRUCTIONS).to_string(),
        })
    }

    /// Prompt for one routing decision over `tools` (registration order)
    pub fn decision_prompt(&self, tools: &[ToolInfo], input: &str) -> AgentResult<String> {
        let lines: Vec<ToolLine<'_>> = tools
            .iter()
            .map(|t| ToolLine {
                name: &t.name,
                description: &t.description,
            })
            .collect();
        let tool_names = tools
            .iter()
            .map(|t| t.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");

        let mut context = Context::new();
        context.insert("instructions", &self.instructions);
        context.insert("tools", &lines);
        context.insert("format_instructions", &format_instructions(&tool_names));
        context.insert("input", input);

        self.tera
            .render(DECISION_TEMPLATE_NAME, &context)
            .map_err(|e| AgentError::Configuration(format!("Failed to render prompt: {}", e)))
    }

    /// Prompt re-issued after an unparseable reply
    pub fn clarifying_prompt(&self, prompt: &str, raw: &str, reason: &str, tools: &[ToolInfo]) -> String {
        let tool_names = tools
            .iter()
            .map(|t| t.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        format!(
            "{}\n\nYour previous reply could not be understood ({}):\n{}\n\n{}",
            prompt,
            reason,
            raw.trim(),
            format_instructions(&tool_names)
        )
    }
}
