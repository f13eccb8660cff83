//! Language-model completion interface
//!
//! The routing agent only needs text in, text out:
//! - `OpenAiCompatibleModel`: chat-completions over HTTP (OpenRouter, OpenAI)
//! - `RetryingModel`: exponential-backoff decorator for transient faults

mod openai;
mod retry;

pub use openai::OpenAiCompatibleModel;
pub use retry::RetryingModel;

use async_trait::async_trait;
use std::sync::Arc;

use crate::agents::config::LlmConfig;
use crate::agents::domain::Turn;
use crate::agents::error::LlmResult;

/// Trait for completion backends
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Get the provider name
    fn name(&self) -> &str;

    /// Get the model being used
    fn model(&self) -> &str;

    /// Complete `prompt` given the ordered conversation `context`
    async fn complete(&self, prompt: &str, context: &[Turn]) -> LlmResult<String>;
}

/// Create the configured model, wrapped with retries
pub fn create_model(config: &LlmConfig) -> LlmResult<Arc<dyn LanguageModel>> {
    let model = OpenAiCompatibleModel::new(config)?;
    if config.max_retries == 0 {
        return Ok(Arc::new(model));
    }
    Ok(Arc::new(RetryingModel::new(model, config.max_retries)))
}
