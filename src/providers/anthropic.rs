//! Anthropic Messages API client for image analysis.
//!
//! The vision-only provider: multimodal chat accepting inline base64
//! image data. It sits outside the text fallback chain — there is no
//! secondary vision provider, so a failure here is terminal for the call.
//! See: <https://docs.anthropic.com/en/api/messages>

use std::time::Duration;

use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::traits::VisionProvider;
use crate::{GatewayError, Result};

/// Default base URL for the Anthropic API
const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";

const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";
const API_VERSION: &str = "2023-06-01";
const MAX_TOKENS: u32 = 1024;

/// Client for the Anthropic Messages API (vision only).
#[derive(Clone)]
pub struct AnthropicClient {
    api_key: String,
    http: Client,
    base_url: String,
    model: String,
}

impl AnthropicClient {
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
                message: format!("Anthropic API error: {status}"),
            }),
        }
    }
}

#[async_trait]
impl VisionProvider for AnthropicClient {
    fn name(&self) -> &str {
        "anthropic"
    }

    async fn analyze(&self, base64_image: &str, instruction: &str) -> Result<String> {
        let media_type = sniff_media_type(base64_image)?;
        let url = format!("{}/v1/messages", self.base_url);

        let body = MessagesRequest {
            model: &self.model,
            max_tokens: MAX_TOKENS,
            messages: vec![RequestMessage {
                role: "user",
                content: vec![
                    ContentBlock::Image {
                        source: ImageSource {
                            kind: "base64",
                            media_type,
                            data: base64_image,
                        },
                    },
                    ContentBlock::Text { text: instruction },
                ],
            }],
        };

        let response = self
            .http
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .json(&body)
            .send()
            .await
            .map_err(|e| GatewayError::Http(e.to_string()))?;

        Self::handle_response_errors(&response)?;

        let parsed: MessagesResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::Http(e.to_string()))?;

        parsed
            .content
            .into_iter()
            .find_map(|block| block.text)
            .filter(|text| !text.is_empty())
            .ok_or(GatewayError::EmptyResponse)
    }
}

/// Decode the payload and detect its media type from magic bytes.
///
/// Rejects input that is not valid base64 before any network call.
/// Unrecognized image formats default to JPEG, which matches what the
/// upstream callers actually send.
fn sniff_media_type(base64_image: &str) -> Result<&'static str> {
    let bytes = BASE64
        .decode(base64_image.trim())
        .map_err(|e| GatewayError::InvalidRequest(format!("image is not valid base64: {e}")))?;
    if bytes.is_empty() {
        return Err(GatewayError::InvalidRequest("image payload is empty".into()));
    }
    Ok(match bytes.as_slice() {
        [0x89, b'P', b'N', b'G', ..] => "image/png",
        [b'G', b'I', b'F', b'8', ..] => "image/gif",
        [b'R', b'I', b'F', b'F', _, _, _, _, b'W', b'E', b'B', b'P', ..] => "image/webp",
        _ => "image/jpeg",
    })
}

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<RequestMessage<'a>>,
}

#[derive(Serialize)]
struct RequestMessage<'a> {
    role: &'static str,
    content: Vec<ContentBlock<'a>>,
}

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum ContentBlock<'a> {
    Image { source: ImageSource<'a> },
    Text { text: &'a str },
}

#[derive(Serialize)]
struct ImageSource<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    media_type: &'static str,
    data: &'a str,
}

#[derive(Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ResponseBlock>,
}

#[derive(Deserialize)]
struct ResponseBlock {
    text: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sniffs_png() {
        let png = BASE64.encode([0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a]);
        assert_eq!(sniff_media_type(&png).unwrap(), "image/png");
    }

    #[test]
    fn defaults_to_jpeg() {
        let jpeg = BASE64.encode([0xff, 0xd8, 0xff, 0xe0]);
        assert_eq!(sniff_media_type(&jpeg).unwrap(), "image/jpeg");
    }

    #[test]
    fn rejects_invalid_base64() {
        assert!(matches!(
            sniff_media_type("not valid base64!!!"),
            Err(GatewayError::InvalidRequest(_))
        ));
    }

    #[test]
    fn rejects_empty_payload() {
        assert!(sniff_media_type("").is_err());
    }
}
