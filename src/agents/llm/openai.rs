//! OpenAI-compatible chat-completions client (OpenRouter, OpenAI)

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::{json, Value};
use std::env;
use std::time::Duration;

use super::LanguageModel;
use crate::agents::config::{LlmConfig, LlmProviderType};
use crate::agents::domain::{Turn, TurnRole};
use crate::agents::error::{LlmError, LlmResult};

/// Chat-completions model client
pub struct OpenAiCompatibleModel {
    client: reqwest::Client,
    api_key: SecretString,
    base_url: String,
    provider: LlmProviderType,
    model: String,
    temperature: Option<f32>,
    max_tokens: Option<u32>,
}

impl OpenAiCompatibleModel {
    /// Create a client, reading the API key from the configured environment variable
    pub fn new(config: &LlmConfig) -> LlmResult<Self> {
        let env_var = config.resolved_api_key_env();
        let api_key = env::var(&env_var).map_err(|_| {
            LlmError::Authentication(format!("Environment variable {} not set", env_var))
        })?;
        Self::with_api_key(config, SecretString::from(api_key))
    }

    /// Create a client with an explicit API key
    pub fn with_api_key(config: &LlmConfig, api_key: SecretString) -> LlmResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| LlmError::Network(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key,
            base_url: config.resolved_base_url().trim_end_matches('/').to_string(),
            provider: config.provider,
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        })
    }

    /// Build the request body: the prompt as system message, then the history
    fn build_request_body(&self, prompt: &str, context: &[Turn]) -> Value {
        let mut messages = vec![json!({ "role": "system", "content": prompt })];
        messages.extend(Self::convert_turns(context));

        let mut body = json!({
            "model": self.model,
            "messages": messages,
        });

        if let Some(temp) = self.temperature {
            body["temperature"] = json!(temp);
        }

        if let Some(max_tokens) = self.max_tokens {
            body["max_tokens"] = json!(max_tokens);
        }

        body
    }

    /// Convert memory turns to chat messages
    fn convert_turns(turns: &[Turn]) -> Vec<Value> {
        turns
            .iter()
            .map(|t| match t.role {
                TurnRole::User => json!({ "role": "user", "content": t.text }),
                TurnRole::Agent => json!({ "role": "assistant", "content": t.text }),
                TurnRole::ToolObservation => {
                    json!({ "role": "user", "content": format!("Observation: {}", t.text) })
                }
            })
            .collect()
    }

    /// Pull the first choice's text out of a response
    fn parse_response(response: OpenAiResponse) -> LlmResult<String> {
        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| LlmError::Parse("No choices in response".to_string()))?;

        Ok(choice.message.content.unwrap_or_default())
    }
}

#[async_trait]
impl LanguageModel for OpenAiCompatibleModel {
    fn name(&self) -> &str {
        match self.provider {
            LlmProviderType::OpenRouter => "openrouter",
            LlmProviderType::OpenAI => "openai",
        }
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, prompt: &str, context: &[Turn]) -> LlmResult<String> {
        let body = self.build_request_body(prompt, context);

        let mut request = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header(
                "Authorization",
                format!("Bearer {}", self.api_key.expose_secret()),
            )
            .header("Content-Type", "application/json");

        if self.provider == LlmProviderType::OpenRouter {
            request = request.header("X-Title", "Comply Nav Insights");
        }

        let response = request.json(&body).send().await?;

        let status = response.status();
        if status.as_u16() == 429 {
            let retry_after_ms = retry_after_ms(
                response
                    .headers()
                    .get("retry-after")
                    .and_then(|v| v.to_str().ok()),
            );
            return Err(LlmError::RateLimited { retry_after_ms });
        }
        if status.as_u16() == 401 || status.as_u16() == 403 {
            return Err(LlmError::Authentication(format!(
                "Provider rejected credentials ({})",
                status.as_u16()
            )));
        }
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), body = %error_text, "Completion request failed");
            return Err(LlmError::Api {
                status: status.as_u16(),
                message: status
                    .canonical_reason()
                    .unwrap_or("upstream error")
                    .to_string(),
            });
        }

        let parsed: OpenAiResponse = response
            .json()
            .await
            .map_err(|e| LlmError::Parse(format!("Failed to parse response: {}", e)))?;

        Self::parse_response(parsed)
    }
}

/// Delay requested by a `retry-after` header (in seconds), defaulting to one second
fn retry_after_ms(header: Option<&str>) -> u64 {
    header
        .and_then(|v| v.trim().parse::<u64>().ok())
        .map(|secs| secs.saturating_mul(1000))
        .unwrap_or(1000)
}

// Chat-completions response types

#[derive(Debug, Deserialize)]
struct OpenAiResponse {
    choices: Vec<OpenAiChoice>,
}

#[derive(Debug, Deserialize)]
struct OpenAiChoice {
    message: OpenAiMessage,
}

#[derive(Debug, Deserialize)]
struct OpenAiMessage {
    content: Option<String>,
}
