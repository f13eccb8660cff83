//! Application context built once at startup and shared with every handler

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::adapters::metrics_handler::MetricsCollector;
use crate::agents::core::ToolRoutingAgent;
use crate::agents::llm::{create_model, LanguageModel};
use crate::agents::memory::SessionStore;
use crate::agents::registry::ToolRegistry;
use crate::agents::service::QueryService;
use crate::config::Settings;
use crate::tools::{default_registry, PolicyLibrary};

#[derive(Clone)]
pub struct AppContext {
    pub settings: Arc<Settings>,
    pub service: Arc<QueryService>,
    pub registry: Arc<ToolRegistry>,
    pub policies: Arc<PolicyLibrary>,
    pub metrics: Arc<MetricsCollector>,
    pub shutdown: CancellationToken,
}

impl AppContext {
    /// Build the context with the model described by `settings.llm`.
    ///
    /// Fails when the API key environment variable is missing.
    pub fn from_settings(settings: Settings) -> anyhow::Result<Self> {
        let model = create_model(&settings.llm)?;
        tracing::info!(
            provider = model.name(),
            model = model.model(),
            "Language model client ready"
        );
        Self::new(settings, model)
    }

    /// Build the context around an already constructed model
    pub fn new(settings: Settings, model: Arc<dyn LanguageModel>) -> anyhow::Result<Self> {
        let metrics = Arc::new(MetricsCollector::new()?);
        let policies = Arc::new(PolicyLibrary::new());
        let registry = Arc::new(default_registry(policies.clone())?);
        let sessions = Arc::new(SessionStore::new(
            settings.memory.strategy,
            settings.memory.max_sessions,
        ));
        let shutdown = CancellationToken::new();

        let agent = ToolRoutingAgent::new(
            settings.agent.clone(),
            registry.clone(),
            model,
            Duration::from_secs(settings.llm.timeout_seconds),
        )?
        .with_metrics(metrics.clone());

        let service = Arc::new(QueryService::new(
            agent,
            sessions,
            metrics.clone(),
            shutdown.clone(),
        ));

        tracing::info!(tools = ?registry, "Tool registry built");

        Ok(Self {
            settings: Arc::new(settings),
            service,
            registry,
            policies,
            metrics,
            shutdown,
        })
    }

    /// Cancel in-flight queries between iterations
    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }
}
