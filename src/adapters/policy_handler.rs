use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{Map, Value};

use crate::agents::context::AppContext;
use crate::agents::error::AgentError;
use crate::agents::service::QueryFailure;

const UPLOAD_FIELD: &str = "file";

/// POST /policy/upload (multipart field `file`)
///
/// Any file type is accepted. The raw bytes are recorded in the policy library;
/// nothing is parsed or embedded.
pub async fn upload_policy(
    State(ctx): State<AppContext>,
    mut multipart: Multipart,
) -> Result<Response, QueryFailure> {
    while let Some(field) = multipart.next_field().await.map_err(invalid)? {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let filename = field.file_name().unwrap_or("untitled").to_string();
        let content_type = field.content_type().map(str::to_string);
        let bytes = field.bytes().await.map_err(invalid)?;

        let mut metadata = Map::new();
        metadata.insert("filename".to_string(), Value::String(filename.clone()));
        metadata.insert("size_bytes".to_string(), Value::from(bytes.len()));
        if let Some(content_type) = content_type {
            metadata.insert("content_type".to_string(), Value::String(content_type));
        }

        let document = ctx
            .policies
            .process_document(&filename, &bytes, metadata)
            .await
            .map_err(|e| QueryFailure::from(AgentError::InvalidRequest(e.to_string())))?;

        return Ok(Json(serde_json::json!({
            "status": "success",
            "message": format!("Policy document '{}' uploaded successfully", filename),
            "document": document,
        }))
        .into_response());
    }

    Err(AgentError::InvalidRequest(format!("missing multipart field '{}'", UPLOAD_FIELD)).into())
}

/// GET /policy/:doc_id/summary
pub async fn policy_summary(
    State(ctx): State<AppContext>,
    Path(doc_id): Path<String>,
) -> Response {
    match ctx.policies.summary(&doc_id).await {
        Some(summary) => Json(summary).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({
                "status": "error",
                "error": {
                    "kind": "not_found",
                    "message": format!("Policy document not found: {}", doc_id),
                }
            })),
        )
            .into_response(),
    }
}

fn invalid(err: axum::extract::multipart::MultipartError) -> QueryFailure {
    QueryFailure::from(AgentError::InvalidRequest(err.body_text()))
}
