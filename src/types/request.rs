//! Generation request type

use serde::{Deserialize, Serialize};

use crate::{GatewayError, Result};

/// A single uniform generation request.
///
/// Immutable value passed into the gateway; every provider adapter
/// translates the same fields into its native call shape. `json_mode`
/// additionally excludes the request from the semantic cache, because
/// structured answers are bound to caller-specific context that
/// similarity matching cannot discriminate safely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub system_prompt: String,
    pub user_message: String,
    /// Sampling temperature in `[0, 1]`.
    pub temperature: f32,
    /// Upper bound on generated tokens; must be positive.
    pub max_output_tokens: u32,
    /// Instruct the provider to emit syntactically valid JSON.
    pub json_mode: bool,
}

impl GenerationRequest {
    /// Create a request with default sampling settings.
    pub fn new(system_prompt: impl Into<String>, user_message: impl Into<String>) -> Self {
        Self {
            system_prompt: system_prompt.into(),
            user_message: user_message.into(),
            temperature: 0.7,
            max_output_tokens: 1024,
            json_mode: false,
        }
    }

    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn max_output_tokens(mut self, max: u32) -> Self {
        self.max_output_tokens = max;
        self
    }

    pub fn json_mode(mut self, json_mode: bool) -> Self {
        self.json_mode = json_mode;
        self
    }

    /// Whether this request may consult and populate the semantic cache.
    pub fn cacheable(&self) -> bool {
        !self.json_mode
    }

    /// Composite cache key: both prompt halves contribute to the
    /// embedding, so a changed system prompt cannot hit a stale entry.
    pub fn cache_key(&self) -> String {
        format!("{}\n{}", self.system_prompt, self.user_message)
    }

    /// Check field ranges before any provider is contacted.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.temperature) {
            return Err(GatewayError::InvalidRequest(format!(
                "temperature must be in [0, 1], got {}",
                self.temperature
            )));
        }
        if self.max_output_tokens == 0 {
            return Err(GatewayError::InvalidRequest(
                "max_output_tokens must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
