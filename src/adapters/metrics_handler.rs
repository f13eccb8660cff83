use axum::{extract::State, http::header, response::IntoResponse};
use prometheus::{CounterVec, Encoder, Gauge, HistogramOpts, HistogramVec, Opts, Registry, TextEncoder};
use std::sync::Arc;

use crate::agents::context::AppContext;

pub struct MetricsCollector {
    registry: Registry,

    // Query metrics
    pub queries_total: CounterVec,
    pub query_duration: HistogramVec,
    pub queries_in_flight: Gauge,

    // Routing loop metrics
    pub tool_invocations: CounterVec,
    pub model_calls: CounterVec,
}

impl MetricsCollector {
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();

        let queries_total = CounterVec::new(
            Opts::new("comply_nav_queries_total", "Total number of routed queries"),
            &["outcome"],
        )?;
        registry.register(Box::new(queries_total.clone()))?;

        let query_duration = HistogramVec::new(
            HistogramOpts::new("comply_nav_query_duration_seconds", "Query duration in seconds"),
            &["outcome"],
        )?;
        registry.register(Box::new(query_duration.clone()))?;

        let queries_in_flight = Gauge::new(
            "comply_nav_queries_in_flight",
            "Number of queries currently being routed",
        )?;
        registry.register(Box::new(queries_in_flight.clone()))?;

        let tool_invocations = CounterVec::new(
            Opts::new("comply_nav_tool_invocations_total", "Total tool invocations"),
            &["tool", "outcome"],
        )?;
        registry.register(Box::new(tool_invocations.clone()))?;

        let model_calls = CounterVec::new(
            Opts::new("comply_nav_model_calls_total", "Total language-model completions"),
            &["outcome"],
        )?;
        registry.register(Box::new(model_calls.clone()))?;

        Ok(Self {
            registry,
            queries_total,
            query_duration,
            queries_in_flight,
            tool_invocations,
            model_calls,
        })
    }

    pub fn encode(&self) -> anyhow::Result<String> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }
}

pub struct MetricsHandler {
    collector: Arc<MetricsCollector>,
}

impl MetricsHandler {
    pub fn new(collector: Arc<MetricsCollector>) -> Self {
        Self { collector }
    }

    pub async fn metrics(&self) -> String {
        self.collector.encode().unwrap_or_else(|e| {
            tracing::error!("Failed to encode metrics: {}", e);
            String::from("# Error encoding metrics\n")
        })
    }
}

/// GET /metrics
pub async fn metrics(State(ctx): State<AppContext>) -> impl IntoResponse {
    let body = MetricsHandler::new(ctx.metrics.clone()).metrics().await;
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        body,
    )
}
