//! # Comply Nav - compliance navigation assistant
//!
//! A web API that routes natural-language requests to domain tools (SQL
//! generation, policy Q&A, data-lineage lookup) through a language-model
//! driven tool-selection loop, with conversation memory kept per session.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use comply_nav::agents::context::AppContext;
//! use comply_nav::config::Settings;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::new()?;
//!     let ctx = AppContext::from_settings(settings)?;
//!     let app = comply_nav::create_app(ctx);
//!     let listener = tokio::net::TcpListener::bind("127.0.0.1:8000").await?;
//!     axum::serve(listener, app).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! - **Domain**: the `Tool` capability every domain tool implements
//! - **Agents**: registry, memory, model client, routing loop, query service
//! - **Tools**: SQL, policy and lineage tools plus the policy library
//! - **Adapters**: HTTP handlers and middleware
//! - **Config**: layered settings and validation

pub mod adapters;
pub mod agents;
pub mod cli;
pub mod config;
pub mod domain;
pub mod tools;

use crate::adapters::health_handler::HealthHandler;
use crate::adapters::{metrics_handler, policy_handler, query_handler, rate_limit, session_handler};
use crate::agents::context::AppContext;
use crate::config::CorsConfig;
use axum::http::HeaderValue;
use axum::{routing::{get, post}, Router};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Creates the Axum application router with all endpoints configured.
///
/// # Arguments
///
/// * `ctx` - Application context shared by every handler
///
/// # Returns
///
/// Configured Axum Router
pub fn create_app(ctx: AppContext) -> Router {
    let health_handler = Arc::new(HealthHandler::new(ctx.registry.clone()));

    // Public routes (never rate limited)
    let public_router = Router::new()
        .route("/health", get({
            let handler = health_handler.clone();
            move || {
                let h = handler.clone();
                async move { h.health().await }
            }
        }))
        .route("/health/ready", get({
            let handler = health_handler.clone();
            move || {
                let h = handler.clone();
                async move { h.ready().await }
            }
        }))
        .route("/health/live", get({
            let handler = health_handler.clone();
            move || {
                let h = handler.clone();
                async move { h.live().await }
            }
        }))
        .route("/metrics", get(metrics_handler::metrics))
        .with_state(ctx.clone());

    // Agent and policy routes
    let mut api_router = Router::new()
        .route("/agent/query", post(query_handler::query_agent))
        .route("/agent/tools", get(query_handler::list_tools))
        .route(
            "/agent/sessions/:session_id",
            get(session_handler::get_session).delete(session_handler::clear_session),
        )
        .route("/policy/upload", post(policy_handler::upload_policy))
        .route("/policy/:doc_id/summary", get(policy_handler::policy_summary))
        .with_state(ctx.clone());

    // Apply Rate Limiting to API routes if enabled
    if let Some(limit) = &ctx.settings.rate_limit {
        if limit.enabled {
            let limiter = rate_limit::create_limiter(limit.requests_per_second, limit.burst_size);
            api_router = api_router.layer(axum::middleware::from_fn_with_state(
                limiter,
                rate_limit::rate_limit_middleware,
            ));
        }
    }

    public_router
        .merge(api_router)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&ctx.settings.cors))
}

/// CORS for the configured origins; any origin when none are listed
fn cors_layer(cors: &CorsConfig) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if cors.allowed_origins.is_empty() {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = cors
        .allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(%origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    layer.allow_origin(AllowOrigin::list(origins))
}
