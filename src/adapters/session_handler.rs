use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::agents::context::AppContext;
use crate::agents::service::{resolve_session_id, QueryFailure};

/// GET /agent/sessions/:session_id
///
/// The id is normalised the same way as on `POST /agent/query`.
pub async fn get_session(
    State(ctx): State<AppContext>,
    Path(session_id): Path<String>,
) -> Result<Response, QueryFailure> {
    let session_id = resolve_session_id(Some(&session_id))?;

    let response = match ctx.service.history(&session_id).await {
        Some(history) => Json(serde_json::json!({
            "session_id": session_id,
            "history": history,
        }))
        .into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({
                "status": "error",
                "error": {
                    "kind": "not_found",
                    "message": format!("Session not found: {}", session_id),
                }
            })),
        )
            .into_response(),
    };
    Ok(response)
}

/// DELETE /agent/sessions/:session_id
///
/// Idempotent: clearing an unknown or already empty session still succeeds.
pub async fn clear_session(
    State(ctx): State<AppContext>,
    Path(session_id): Path<String>,
) -> Result<Json<serde_json::Value>, QueryFailure> {
    let session_id = resolve_session_id(Some(&session_id))?;
    let existed = ctx.service.clear_session(&session_id).await;
    Ok(Json(serde_json::json!({
        "status": "success",
        "session_id": session_id,
        "cleared": existed,
    })))
}
