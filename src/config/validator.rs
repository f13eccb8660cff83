use thiserror::Error;

use crate::agents::config::{AgentConfig, LlmConfig, MemoryConfig};
use crate::config::{RateLimitConfig, ServerSettings, Settings};

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
}

impl ValidationError {
    fn invalid(field: &str, reason: &str) -> Self {
        ValidationError::InvalidValue {
            field: field.to_string(),
            reason: reason.to_string(),
        }
    }
}

pub struct ConfigValidator;

impl ConfigValidator {
    pub fn validate(settings: &Settings) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        Self::validate_server(&settings.server, &mut errors);
        Self::validate_llm(&settings.llm, &mut errors);
        Self::validate_agent(&settings.agent, &mut errors);
        Self::validate_memory(&settings.memory, &mut errors);
        if let Some(rate_limit) = &settings.rate_limit {
            Self::validate_rate_limit(rate_limit, &mut errors);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    fn validate_server(server: &ServerSettings, errors: &mut Vec<ValidationError>) {
        if server.host.is_empty() {
            errors.push(ValidationError::MissingField("server.host".to_string()));
        }

        if server.port == 0 {
            errors.push(ValidationError::invalid("server.port", "Port must be greater than 0"));
        }
    }

    fn validate_llm(llm: &LlmConfig, errors: &mut Vec<ValidationError>) {
        if llm.model.trim().is_empty() {
            errors.push(ValidationError::MissingField("llm.model".to_string()));
        }

        if llm.timeout_seconds == 0 {
            errors.push(ValidationError::invalid("llm.timeout_seconds", "Timeout must be greater than 0"));
        }

        if let Some(temperature) = llm.temperature {
            if !(0.0..=2.0).contains(&temperature) {
                errors.push(ValidationError::invalid(
                    "llm.temperature",
                    "Temperature must be between 0.0 and 2.0",
                ));
            }
        }

        if let Some(base_url) = &llm.base_url {
            if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
                errors.push(ValidationError::invalid("llm.base_url", "Base URL must be http(s)"));
            }
        }
    }

    fn validate_agent(agent: &AgentConfig, errors: &mut Vec<ValidationError>) {
        if agent.max_iterations == 0 {
            errors.push(ValidationError::invalid(
                "agent.max_iterations",
                "At least one iteration is required",
            ));
        }

        if agent.tool_timeout_seconds == 0 {
            errors.push(ValidationError::invalid(
                "agent.tool_timeout_seconds",
                "Timeout must be greater than 0",
            ));
        }
    }

    fn validate_memory(memory: &MemoryConfig, errors: &mut Vec<ValidationError>) {
        if memory.strategy.capacity() == Some(0) {
            errors.push(ValidationError::invalid(
                "memory.strategy",
                "Strategy must retain at least one turn",
            ));
        }

        if memory.max_sessions == 0 {
            errors.push(ValidationError::invalid(
                "memory.max_sessions",
                "At least one session is required",
            ));
        }
    }

    fn validate_rate_limit(rate_limit: &RateLimitConfig, errors: &mut Vec<ValidationError>) {
        if !rate_limit.enabled {
            return;
        }

        if rate_limit.requests_per_second == 0 {
            errors.push(ValidationError::invalid(
                "rate_limit.requests_per_second",
                "Must be greater than 0 when rate limiting is enabled",
            ));
        }

        if rate_limit.burst_size == 0 {
            errors.push(ValidationError::invalid(
                "rate_limit.burst_size",
                "Must be greater than 0 when rate limiting is enabled",
            ));
        }
    }
}
