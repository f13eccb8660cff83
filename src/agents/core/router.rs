//! Tool-routing agent: think, select tool, observe, repeat

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio_util::sync::CancellationToken;
use tracing::Instrument;

use super::parser::parse_step;
use super::prompt::PromptBuilder;
use crate::adapters::metrics_handler::MetricsCollector;
use crate::agents::config::AgentConfig;
use crate::agents::domain::{
    AgentAction, AgentState, AgentStep, NewTurn, Observation, RouteOutcome, Turn,
};
use crate::agents::error::{AgentError, AgentResult, LlmError};
use crate::agents::llm::LanguageModel;
use crate::agents::memory::ConversationMemory;
use crate::agents::registry::ToolRegistry;
use crate::domain::{Tool, ToolError, ToolInfo};

/// Dispatches free-text queries to registered tools, trusting the model's choice
pub struct ToolRoutingAgent {
    config: AgentConfig,
    registry: Arc<ToolRegistry>,
    model: Arc<dyn LanguageModel>,
    prompts: PromptBuilder,
    model_timeout: Duration,
    metrics: Option<Arc<MetricsCollector>>,
}

impl ToolRoutingAgent {
    pub fn new(
        config: AgentConfig,
        registry: Arc<ToolRegistry>,
        model: Arc<dyn LanguageModel>,
        model_timeout: Duration,
    ) -> AgentResult<Self> {
        if config.max_iterations == 0 {
            return Err(AgentError::Configuration(
                "max_iterations must be at least 1".to_string(),
            ));
        }
        let prompts = PromptBuilder::new(config.instructions.as_deref())?;
        Ok(Self {
            config,
            registry,
            model,
            prompts,
            model_timeout,
            metrics: None,
        })
    }

    pub fn with_metrics(mut self, metrics: Arc<MetricsCollector>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Route one query, appending its turns to `memory`.
    ///
    /// Turns are appended only once the step producing them has completed,
    /// so an error or cancellation never leaves a partial turn behind.
    pub async fn run(
        &self,
        query: &str,
        memory: &mut ConversationMemory,
        cancel: &CancellationToken,
    ) -> AgentResult<RouteOutcome> {
        let span = tracing::info_span!(
            "route_query",
            model = self.model.model(),
            max_iterations = self.config.max_iterations
        );
        self.run_loop(query, memory, cancel).instrument(span).await
    }

    async fn run_loop(
        &self,
        query: &str,
        memory: &mut ConversationMemory,
        cancel: &CancellationToken,
    ) -> AgentResult<RouteOutcome> {
        memory.append(NewTurn::user(query));

        let tools = self.registry.infos();
        let prompt = self.prompts.decision_prompt(&tools, query)?;
        let mut state = AgentState::Thinking;
        let mut steps: Vec<AgentStep> = Vec::new();

        for iteration in 1..=self.config.max_iterations {
            if cancel.is_cancelled() {
                transition(&mut state, AgentState::Failed, iteration);
                return Err(AgentError::Cancelled);
            }

            let mut step = match self.decide(&prompt, &tools, &memory.history(), cancel).await {
                Ok(step) => step,
                Err(e) => {
                    transition(&mut state, AgentState::Failed, iteration);
                    return Err(e);
                }
            };

            let (name, input) = match &step.action {
                AgentAction::FinalAnswer { text } => {
                    let answer = text.clone();
                    memory.append(NewTurn::answer(answer.clone()));
                    transition(&mut state, AgentState::Done, iteration);
                    steps.push(step);
                    tracing::info!(iterations = iteration, "Query answered");
                    return Ok(RouteOutcome {
                        answer,
                        steps,
                        iterations: iteration,
                    });
                }
                AgentAction::ToolCall { name, input } => (name.clone(), input.clone()),
            };

            transition(&mut state, AgentState::ToolSelected, iteration);
            let tool = match self.registry.resolve(&name) {
                Ok(tool) => tool,
                Err(e) => {
                    tracing::warn!(tool = %name, iteration, "Model selected an unregistered tool");
                    transition(&mut state, AgentState::Failed, iteration);
                    return Err(e);
                }
            };

            memory.append(NewTurn::action(step.render(), name.clone()));

            transition(&mut state, AgentState::ToolExecuting, iteration);
            let observation = self.invoke_tool(tool.as_ref(), &input).await;

            transition(&mut state, AgentState::Observing, iteration);
            memory.append(NewTurn::observation(
                observation.render(),
                name,
                !observation.success,
            ));
            step.observation = Some(observation);
            steps.push(step);

            transition(&mut state, AgentState::Thinking, iteration);
        }

        transition(&mut state, AgentState::Failed, self.config.max_iterations);
        tracing::warn!(
            max_iterations = self.config.max_iterations,
            "Iteration ceiling reached without a final answer"
        );
        Err(AgentError::IterationLimit(self.config.max_iterations))
    }

    /// One model decision, with a single clarifying re-prompt on a parse failure
    async fn decide(
        &self,
        prompt: &str,
        tools: &[ToolInfo],
        context: &[Turn],
        cancel: &CancellationToken,
    ) -> AgentResult<AgentStep> {
        let raw = self.call_model(prompt, context, cancel).await?;
        match parse_step(&raw) {
            Ok(step) => Ok(step),
            Err(AgentError::Parse { reason, .. }) => {
                tracing::warn!(%reason, "Unparseable model reply, re-prompting once");
                let retry_prompt = self.prompts.clarifying_prompt(prompt, &raw, &reason, tools);
                let raw = self.call_model(&retry_prompt, context, cancel).await?;
                parse_step(&raw)
            }
            Err(e) => Err(e),
        }
    }

    async fn call_model(
        &self,
        prompt: &str,
        context: &[Turn],
        cancel: &CancellationToken,
    ) -> AgentResult<String> {
        let call = tokio::time::timeout(self.model_timeout, self.model.complete(prompt, context));

        let result = tokio::select! {
            _ = cancel.cancelled() => return Err(AgentError::Cancelled),
            result = call => result,
        };

        let (outcome, result) = match result {
            Ok(Ok(text)) => ("success", Ok(text)),
            Ok(Err(LlmError::Timeout)) | Err(_) => (
                "timeout",
                Err(AgentError::ModelTimeout(self.model_timeout.as_secs())),
            ),
            Ok(Err(e)) => ("error", Err(AgentError::from(e))),
        };

        if let Some(metrics) = &self.metrics {
            metrics.model_calls.with_label_values(&[outcome]).inc();
        }
        if let Err(e) = &result {
            tracing::error!(error = %e, "Language model call failed");
        }
        result
    }

    /// Invoke a tool under the tool timeout. Failures become error observations.
    async fn invoke_tool(&self, tool: &dyn Tool, input: &str) -> Observation {
        let name = tool.name().to_string();
        let timeout = Duration::from_secs(self.config.tool_timeout_seconds);
        let started = Instant::now();

        tracing::debug!(tool = %name, "Invoking tool");
        let result = match tokio::time::timeout(timeout, tool.invoke(input)).await {
            Ok(result) => result,
            Err(_) => Err(ToolError::Timeout(self.config.tool_timeout_seconds)),
        };
        let elapsed_ms = started.elapsed().as_millis() as u64;

        let observation = match result {
            Ok(output) => Observation::success(name.clone(), input.to_string(), output, elapsed_ms),
            Err(e) => {
                let err = AgentError::ToolInvocation {
                    tool: name.clone(),
                    message: e.to_string(),
                };
                tracing::warn!(error = %err, elapsed_ms, "Tool failed, feeding error back to the model");
                Observation::failure(name.clone(), input.to_string(), e.to_string(), elapsed_ms)
            }
        };

        if let Some(metrics) = &self.metrics {
            let outcome = if observation.success { "success" } else { "error" };
            metrics
                .tool_invocations
                .with_label_values(&[name.as_str(), outcome])
                .inc();
        }
        observation
    }
}

fn transition(state: &mut AgentState, next: AgentState, iteration: u32) {
    debug_assert!(
        state.can_transition_to(next),
        "illegal transition {} -> {}",
        state,
        next
    );
    tracing::debug!(from = %state, to = %next, iteration, "Agent state transition");
    if next.is_terminal() {
        tracing::debug!(state = %next, iteration, "Routing finished");
    }
    *state = next;
}
