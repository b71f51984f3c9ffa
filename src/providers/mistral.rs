//! Mistral API client for chat completions.
//!
//! The tertiary text provider. The wire shape is OpenAI-compatible,
//! including the `response_format` JSON flag, but it is a separate vendor
//! with its own credential, endpoint, and failure modes.
//! See: <https://docs.mistral.ai/api/>

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::traits::ChatProvider;
use crate::types::{Capabilities, GenerationRequest};
use crate::{GatewayError, Result};

/// Default base URL for the Mistral API
const DEFAULT_BASE_URL: &str = "https://api.mistral.ai";

const DEFAULT_MODEL: &str = "mistral-small-latest";

/// Client for the Mistral chat completions API.
#[derive(Clone)]
pub struct MistralClient {
    api_key: String,
    http: Client,
    base_url: String,
    model: String,
}

impl MistralClient {
    /// Create a new client with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    /// Create a client with a custom base URL (for testing with wiremock).
    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("failed to build HTTP client");
        Self::with_http_client(api_key, base_url, http)
    }

    /// Create a client sharing an existing HTTP client.
    pub fn with_http_client(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        http: Client,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            http,
            base_url: base_url.into(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    /// Override the model.
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    fn handle_response_errors(response: &reqwest::Response) -> Result<()> {
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        match status.as_u16() {
            401 => Err(GatewayError::AuthenticationFailed),
            429 => {
                let retry_after = response
                    .headers()
                    .get("retry-after")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|s| s.parse::<u64>().ok())
                    .map(Duration::from_secs);
                Err(GatewayError::RateLimited { retry_after })
            }
            code => Err(GatewayError::Api {
                status: code,
                message: format!("Mistral API error: {status}"),
            }),
        }
    }
}

#[async_trait]
impl ChatProvider for MistralClient {
    fn name(&self) -> &str {
        "mistral"
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::chat_with_json()
    }

    async fn complete(&self, request: &GenerationRequest) -> Result<String> {
        let url = format!("{}/v1/chat/completions", self.base_url);

        let mut body = json!({
            "model": self.model,
            "messages": [
                {"role": "system", "content": request.system_prompt},
                {"role": "user", "content": request.user_message},
            ],
            "temperature": request.temperature,
            "max_tokens": request.max_output_tokens,
        });
        if request.json_mode {
            body["response_format"] = json!({"type": "json_object"});
        }

        let response = self
            .http
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&body)
            .send()
            .await
            .map_err(|e| GatewayError::Http(e.to_string()))?;

        Self::handle_response_errors(&response)?;

        let parsed: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::Http(e.to_string()))?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|text| !text.is_empty())
            .ok_or(GatewayError::EmptyResponse)
    }
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: AssistantMessage,
}

#[derive(Deserialize)]
struct AssistantMessage {
    content: Option<String>,
}
