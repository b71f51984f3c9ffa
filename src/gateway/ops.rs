//! Higher-level operations composed over `generate` and the vision path.
//!
//! These are the call shapes the rest of the system consumes: attribute
//! extraction for search, sentiment screening for user content, and
//! image analysis for visual search. All JSON-mode parsing happens here,
//! caller-side: a provider's HTTP-successful body that fails to parse
//! surfaces [`GatewayError::MalformedOutput`] without consulting another
//! provider.

use serde_json::Value;
use tracing::debug;

use super::Gateway;
use crate::normalize::normalize;
use crate::types::{GenerationRequest, ImageAnalysis, SentimentReport};
use crate::{GatewayError, Result};

const EXTRACT_SYSTEM_PROMPT: &str = "You extract searchable attributes from product \
     descriptions. Respond with a JSON object of the form \
     {\"items\": [\"attribute\", ...]} and nothing else.";

const SENTIMENT_SYSTEM_PROMPT: &str = "You screen user-submitted text for a marketplace. \
     Respond with a JSON object of the form {\"sentiment\": \
     \"positive\"|\"neutral\"|\"negative\", \"flagged\": boolean, \
     \"summary\": \"one line\"} and nothing else.";

const IMAGE_INSTRUCTION: &str = "Describe this product image as a JSON object with \
     \"category\", \"colors\", \"attributes\", and \"keywords\" fields \
     suitable for catalogue search.";

impl Gateway {
    /// Extract a flat list of searchable strings from free-form text.
    ///
    /// Runs a JSON-mode generation and accepts either a bare JSON array
    /// of strings or an object wrapping one (providers wrap even when
    /// told not to).
    pub async fn extract_structured_list(&self, description: &str) -> Result<Vec<String>> {
        let request = GenerationRequest::new(EXTRACT_SYSTEM_PROMPT, description)
            .temperature(0.2)
            .max_output_tokens(512)
            .json_mode(true);
        let text = self.generate(&request).await?;

        let value: Value = serde_json::from_str(&text)
            .map_err(|e| GatewayError::MalformedOutput(format!("expected JSON list: {e}")))?;
        string_list(&value).ok_or_else(|| {
            GatewayError::MalformedOutput("expected a JSON array of strings".to_string())
        })
    }

    /// Screen a piece of user-facing text.
    ///
    /// Returns the sentiment label, whether the content should be
    /// withheld, and a one-line rationale.
    pub async fn analyze_sentiment(&self, text: &str) -> Result<SentimentReport> {
        let request = GenerationRequest::new(SENTIMENT_SYSTEM_PROMPT, text)
            .temperature(0.0)
            .max_output_tokens(256)
            .json_mode(true);
        let output = self.generate(&request).await?;

        serde_json::from_str(&output)
            .map_err(|e| GatewayError::MalformedOutput(format!("expected sentiment report: {e}")))
    }

    /// Analyze base64-encoded image bytes.
    ///
    /// A single dedicated path to the one vision-capable provider: no
    /// fallback chain, no cache. When the provider's text fails JSON
    /// parsing, the raw text is preserved under [`ImageAnalysis::Raw`]
    /// instead of failing the call.
    pub async fn analyze_image(&self, base64_image: &str) -> Result<ImageAnalysis> {
        let raw = self
            .registry()
            .analyze_image(base64_image, IMAGE_INSTRUCTION)
            .await?;
        let text = normalize(&raw);

        Ok(match serde_json::from_str(&text) {
            Ok(value) => ImageAnalysis::Structured(value),
            Err(e) => {
                debug!(error = %e, "vision output is not JSON, returning raw text");
                ImageAnalysis::Raw {
                    raw_description: text,
                }
            }
        })
    }
}

/// Pull a list of strings out of `value`: either a bare array or the
/// first array-valued field of an object.
fn string_list(value: &Value) -> Option<Vec<String>> {
    let array = match value {
        Value::Array(items) => items,
        Value::Object(map) => map.values().find_map(|v| v.as_array())?,
        _ => return None,
    };
    array
        .iter()
        .map(|item| item.as_str().map(str::to_string))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn string_list_accepts_bare_array() {
        let value = json!(["red", "leather", "handbag"]);
        assert_eq!(
            string_list(&value).unwrap(),
            vec!["red", "leather", "handbag"]
        );
    }

    #[test]
    fn string_list_unwraps_object() {
        let value = json!({"items": ["vanilla", "amber"]});
        assert_eq!(string_list(&value).unwrap(), vec!["vanilla", "amber"]);
    }

    #[test]
    fn string_list_rejects_non_strings() {
        assert!(string_list(&json!([1, 2, 3])).is_none());
        assert!(string_list(&json!("just a string")).is_none());
        assert!(string_list(&json!({"count": 3})).is_none());
    }
}
