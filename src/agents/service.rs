//! Query service facade: session lookup, routing, typed failures

use std::sync::Arc;
use std::time::Instant;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use prometheus::Gauge;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::Instrument;
use uuid::Uuid;

use crate::adapters::metrics_handler::MetricsCollector;
use crate::agents::core::ToolRoutingAgent;
use crate::agents::domain::Turn;
use crate::agents::error::{AgentError, ErrorKind};
use crate::agents::memory::SessionStore;

/// Session used when a request names none
pub const DEFAULT_SESSION: &str = "default";

const MAX_SESSION_ID_LEN: usize = 128;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryRequest {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

impl QueryRequest {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            session_id: None,
        }
    }

    pub fn with_session(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }
}

/// Memory snapshot and diagnostics attached to an answer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryContext {
    pub session_id: String,
    pub query_id: String,
    pub iterations: u32,
    pub history: Vec<Turn>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryResponse {
    pub status: String,
    pub response: String,
    pub context: QueryContext,
}

/// Structured failure: an error kind plus a human-readable message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryFailure {
    pub kind: ErrorKind,
    pub message: String,
}

impl QueryFailure {
    pub fn status_code(&self) -> StatusCode {
        status_for(self.kind)
    }
}

impl From<AgentError> for QueryFailure {
    fn from(err: AgentError) -> Self {
        Self {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

impl IntoResponse for QueryFailure {
    fn into_response(self) -> Response {
        let status = self.status_code();
        (
            status,
            Json(serde_json::json!({
                "status": "error",
                "error": {
                    "kind": self.kind,
                    "message": self.message,
                }
            })),
        )
            .into_response()
    }
}

/// HTTP status for each error kind
pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::InvalidRequest => StatusCode::BAD_REQUEST,
        ErrorKind::ToolNotFound | ErrorKind::AgentParseError => StatusCode::BAD_GATEWAY,
        ErrorKind::AgentIterationLimit => StatusCode::UNPROCESSABLE_ENTITY,
        ErrorKind::ModelUnavailable | ErrorKind::Cancelled => StatusCode::SERVICE_UNAVAILABLE,
        ErrorKind::ModelTimeout => StatusCode::GATEWAY_TIMEOUT,
        ErrorKind::DuplicateTool | ErrorKind::Configuration | ErrorKind::ToolInvocation => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

/// Exposes the routing agent over a request/response boundary
pub struct QueryService {
    agent: ToolRoutingAgent,
    sessions: Arc<SessionStore>,
    metrics: Arc<MetricsCollector>,
    shutdown: CancellationToken,
}

impl QueryService {
    pub fn new(
        agent: ToolRoutingAgent,
        sessions: Arc<SessionStore>,
        metrics: Arc<MetricsCollector>,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            agent,
            sessions,
            metrics,
            shutdown,
        }
    }

    /// Route one query within its session.
    ///
    /// The session's memory lock is held for the whole query, so queries on
    /// the same session run one at a time and their turns never interleave.
    pub async fn handle(&self, request: QueryRequest) -> Result<QueryResponse, QueryFailure> {
        let session_id = resolve_session_id(request.session_id.as_deref())?;
        let text = request.text.trim();
        if text.is_empty() {
            return Err(AgentError::InvalidRequest("query text is empty".to_string()).into());
        }

        let query_id = Uuid::new_v4().to_string();
        let span = tracing::info_span!("query", %session_id, %query_id);

        async {
            let started = Instant::now();
            let _in_flight = InFlight::enter(&self.metrics.queries_in_flight);

            let memory = self.sessions.session(&session_id).await;
            let mut memory = memory.lock().await;
            let cancel = self.shutdown.child_token();
            let first_seq = memory.next_seq();

            let result = self.agent.run(text, &mut memory, &cancel).await;
            let appended = memory.since(first_seq);
            let history = memory.history();
            drop(memory);

            let outcome = match &result {
                Ok(_) => "success".to_string(),
                Err(e) => e.kind().to_string(),
            };
            self.metrics.queries_total.with_label_values(&[outcome.as_str()]).inc();
            self.metrics
                .query_duration
                .with_label_values(&[outcome.as_str()])
                .observe(started.elapsed().as_secs_f64());

            match result {
                Ok(outcome) => {
                    if let Some(last) = appended.last() {
                        tracing::debug!(answer = %last.preview(80), "Answer ready");
                    }
                    Ok(QueryResponse {
                        status: "success".to_string(),
                        response: outcome.answer,
                        context: QueryContext {
                            session_id: session_id.clone(),
                            query_id: query_id.clone(),
                            iterations: outcome.iterations,
                            history,
                        },
                    })
                }
                Err(e) => {
                    tracing::error!(
                        kind = %e.kind(),
                        error = %e,
                        turns_appended = appended.len(),
                        "Query failed"
                    );
                    Err(QueryFailure::from(e))
                }
            }
        }
        .instrument(span)
        .await
    }

    /// Snapshot of a session's history, or None if the session does not exist
    pub async fn history(&self, session_id: &str) -> Option<Vec<Turn>> {
        let memory = self.sessions.get(session_id).await?;
        let history = memory.lock().await.history();
        Some(history)
    }

    /// Clear a session's history. Idempotent; unknown sessions are a no-op.
    pub async fn clear_session(&self, session_id: &str) -> bool {
        let cleared = self.sessions.clear(session_id).await;
        if cleared {
            tracing::info!(session_id, "Cleared session history");
        }
        cleared
    }
}

/// Holds the in-flight gauge raised until the query completes or its future is dropped
struct InFlight<'a>(&'a Gauge);

impl<'a> InFlight<'a> {
    fn enter(gauge: &'a Gauge) -> Self {
        gauge.inc();
        Self(gauge)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.dec();
    }
}

/// Normalise a requested session id: blank means the default session,
/// otherwise trimmed, at most 128 printable characters.
pub(crate) fn resolve_session_id(requested: Option<&str>) -> Result<String, QueryFailure> {
    let session_id = match requested.map(str::trim) {
        None | Some("") => return Ok(DEFAULT_SESSION.to_string()),
        Some(id) => id,
    };

    if session_id.len() > MAX_SESSION_ID_LEN || session_id.chars().any(char::is_control) {
        return Err(AgentError::InvalidRequest(format!(
            "session_id must be at most {} printable characters",
            MAX_SESSION_ID_LEN
        ))
        .into());
    }
    Ok(session_id.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::config::AgentConfig;
    use crate::agents::error::LlmResult;
    use crate::agents::llm::LanguageModel;
    use crate::agents::registry::ToolRegistry;
    use async_trait::async_trait;
    use std::time::Duration;

    struct SlowModel;

    #[async_trait]
    impl LanguageModel for SlowModel {
        fn name(&self) -> &str {
            "slow"
        }

        fn model(&self) -> &str {
            "slow-1"
        }

        async fn complete(&self, _prompt: &str, _context: &[Turn]) -> LlmResult<String> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok("Final Answer: late".to_string())
        }
    }

    fn slow_service() -> QueryService {
        let agent = ToolRoutingAgent::new(
            AgentConfig::default(),
            Arc::new(ToolRegistry::new()),
            Arc::new(SlowModel),
            Duration::from_secs(30),
        )
        .unwrap();
        QueryService::new(
            agent,
            Arc::new(SessionStore::default()),
            Arc::new(MetricsCollector::new().unwrap()),
            CancellationToken::new(),
        )
    }

    #[tokio::test]
    async fn test_in_flight_gauge_released_when_query_dropped() {
        let service = slow_service();

        let result = tokio::time::timeout(
            Duration::from_millis(50),
            service.handle(QueryRequest::new("hello")),
        )
        .await;
        assert!(result.is_err());
        assert_eq!(service.metrics.queries_in_flight.get(), 0.0);
    }

    #[tokio::test]
    async fn test_in_flight_gauge_raised_during_query() {
        let service = Arc::new(slow_service());

        let running = tokio::spawn({
            let service = service.clone();
            async move { service.handle(QueryRequest::new("hello")).await }
        });
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(service.metrics.queries_in_flight.get(), 1.0);

        running.abort();
        let _ = running.await;
        assert_eq!(service.metrics.queries_in_flight.get(), 0.0);
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(status_for(ErrorKind::InvalidRequest), StatusCode::BAD_REQUEST);
        assert_eq!(status_for(ErrorKind::ToolNotFound), StatusCode::BAD_GATEWAY);
        assert_eq!(status_for(ErrorKind::AgentParseError), StatusCode::BAD_GATEWAY);
        assert_eq!(status_for(ErrorKind::AgentIterationLimit), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(status_for(ErrorKind::ModelUnavailable), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(status_for(ErrorKind::ModelTimeout), StatusCode::GATEWAY_TIMEOUT);
        assert_eq!(status_for(ErrorKind::Configuration), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(status_for(ErrorKind::ToolInvocation), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_failure_from_error() {
        let failure = QueryFailure::from(AgentError::IterationLimit(10));
        assert_eq!(failure.kind, ErrorKind::AgentIterationLimit);
        assert!(failure.message.contains("10"));
    }

    #[test]
    fn test_session_id_resolution() {
        assert_eq!(resolve_session_id(None).unwrap(), DEFAULT_SESSION);
        assert_eq!(resolve_session_id(Some("  ")).unwrap(), DEFAULT_SESSION);
        assert_eq!(resolve_session_id(Some(" abc ")).unwrap(), "abc");
        assert!(resolve_session_id(Some(&"x".repeat(200))).is_err());
        assert!(resolve_session_id(Some("a\nb")).is_err());
    }

    #[test]
    fn test_request_deserialization() {
        let req: QueryRequest = serde_json::from_str(r#"{"text":"hi"}"#).unwrap();
        assert_eq!(req.text, "hi");
        assert!(req.session_id.is_none());
    }
}
