use axum::{
    extract::{rejection::JsonRejection, State},
    response::IntoResponse,
    Json,
};

use crate::agents::context::AppContext;
use crate::agents::error::AgentError;
use crate::agents::service::{QueryFailure, QueryRequest, QueryResponse};

/// POST /agent/query
pub async fn query_agent(
    State(ctx): State<AppContext>,
    payload: Result<Json<QueryRequest>, JsonRejection>,
) -> Result<Json<QueryResponse>, QueryFailure> {
    let Json(request) = payload.map_err(|rejection| {
        QueryFailure::from(AgentError::InvalidRequest(rejection.body_text()))
    })?;

    let response = ctx.service.handle(request).await?;
    Ok(Json(response))
}

/// GET /agent/tools
pub async fn list_tools(State(ctx): State<AppContext>) -> impl IntoResponse {
    Json(serde_json::json!({
        "tools": ctx.registry.infos(),
    }))
}
