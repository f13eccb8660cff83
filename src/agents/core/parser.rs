//! Strict parser for model replies
//!
//! Accepted shapes:
//!
//! ```text
//! Thought: optional reasoning
//! Action: <tool name>
//! Action Input: <input, may continue on following lines>
//! ```
//!
//! ```text
//! Thought: optional reasoning
//! Final Answer: <answer, may continue on following lines>
//! ```

use crate::agents::domain::{AgentAction, AgentStep};
use crate::agents::error::{AgentError, AgentResult};

const THOUGHT: &str = "Thought:";
const ACTION: &str = "Action:";
const ACTION_INPUT: &str = "Action Input:";
const FINAL_ANSWER: &str = "Final Answer:";
const OBSERVATION: &str = "Observation:";

#[derive(Clone, Copy, PartialEq, Eq)]
enum Section {
    Preamble,
    Thought,
    Action,
    ActionInput,
    FinalAnswer,
}

#[derive(Default)]
struct Sections {
    thought: Option<String>,
    action: Option<String>,
    action_input: Option<String>,
    final_answer: Option<String>,
}

/// Parse one model reply into an `AgentStep`
pub fn parse_step(raw: &str) -> AgentResult<AgentStep> {
    let sections = split_sections(raw)?;

    let thought = sections
        .thought
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty());

    match (sections.action, sections.action_input, sections.final_answer) {
        (Some(_), _, Some(_)) => Err(parse_error("reply contains both an Action and a Final Answer", raw)),
        (Some(name), Some(input), None) => {
            let name = strip_quotes(name.trim());
            if name.is_empty() {
                return Err(parse_error("Action names no tool", raw));
            }
            Ok(AgentStep::new(
                thought,
                AgentAction::ToolCall {
                    name: name.to_string(),
                    input: strip_quotes(input.trim()).to_string(),
                },
            ))
        }
        (Some(_), None, None) => Err(parse_error("Action without an Action Input", raw)),
        (None, Some(_), _) => Err(parse_error("Action Input without an Action", raw)),
        (None, None, Some(answer)) => {
            let text = answer.trim();
            if text.is_empty() {
                return Err(parse_error("Final Answer is empty", raw));
            }
            Ok(AgentStep::new(
                thought,
                AgentAction::FinalAnswer {
                    text: text.to_string(),
                },
            ))
        }
        (None, None, None) => Err(parse_error("reply has neither an Action nor a Final Answer", raw)),
    }
}

fn split_sections(raw: &str) -> AgentResult<Sections> {
    let mut sections = Sections::default();
    let mut current = Section::Preamble;

    for line in raw.lines() {
        let trimmed = line.trim_start();

        // The model sometimes invents the observation; nothing after it is its decision
        if trimmed.starts_with(OBSERVATION) {
            break;
        }

        let (section, rest) = if let Some(rest) = trimmed.strip_prefix(ACTION_INPUT) {
            (Section::ActionInput, rest)
        } else if let Some(rest) = trimmed.strip_prefix(ACTION) {
            (Section::Action, rest)
        } else if let Some(rest) = trimmed.strip_prefix(FINAL_ANSWER) {
            (Section::FinalAnswer, rest)
        } else if let Some(rest) = trimmed.strip_prefix(THOUGHT) {
            (Section::Thought, rest)
        } else {
            append_line(&mut sections, current, line);
            continue;
        };

        let slot = slot_mut(&mut sections, section);
        if slot.is_some() {
            return Err(parse_error(
                &format!("repeated '{}' marker", marker(section)),
                raw,
            ));
        }
        *slot = Some(rest.trim().to_string());
        current = section;
    }

    Ok(sections)
}

fn append_line(sections: &mut Sections, section: Section, line: &str) {
    match section {
        // A tool name is a single line
        Section::Preamble | Section::Action => {}
        _ => {
            if let Some(text) = slot_mut(sections, section) {
                if !text.is_empty() {
                    text.push('\n');
                }
                text.push_str(line.trim_end());
            }
        }
    }
}

fn slot_mut(sections: &mut Sections, section: Section) -> &mut Option<String> {
    match section {
        Section::Thought | Section::Preamble => &mut sections.thought,
        Section::Action => &mut sections.action,
        Section::ActionInput => &mut sections.action_input,
        Section::FinalAnswer => &mut sections.final_answer,
    }
}

fn marker(section: Section) -> &'static str {
    match section {
        Section::Preamble | Section::Thought => THOUGHT,
        Section::Action => ACTION,
        Section::ActionInput => ACTION_INPUT,
        Section::FinalAnswer => FINAL_ANSWER,
    }
}

fn strip_quotes(s: &str) -> &str {
    for quote in ['"', '\'', '`'] {
        if s.len() >= 2 && s.starts_with(quote) && s.ends_with(quote) {
            return &s[1..s.len() - 1];
        }
    }
    s
}

fn parse_error(reason: &str, raw: &str) -> AgentError {
    AgentError::Parse {
        reason: reason.to_string(),
        raw: raw.to_string(),
    }
}
