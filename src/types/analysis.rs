//! Caller-facing analysis result types

use serde::{Deserialize, Serialize};

/// Sentiment classification label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

/// Result of screening a piece of user-facing text.
///
/// `flagged` marks content that should be withheld pending review;
/// `summary` is a one-line rationale suitable for an audit log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentReport {
    pub sentiment: Sentiment,
    pub flagged: bool,
    pub summary: String,
}

/// Result of analyzing an image.
///
/// The vision provider is asked for structured JSON, but its output is
/// not constrained. When the body parses, the structured value is
/// returned as-is; otherwise the raw text is preserved under a fallback
/// field instead of failing the call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ImageAnalysis {
    /// The provider returned valid JSON.
    Structured(serde_json::Value),
    /// Parse fallback: the provider's text, verbatim.
    Raw { raw_description: String },
}

impl ImageAnalysis {
    /// The structured value, if the provider produced one.
    pub fn as_structured(&self) -> Option<&serde_json::Value> {
        match self {
            Self::Structured(value) => Some(value),
            Self::Raw { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentiment_report_round_trips_lowercase_labels() {
        let report: SentimentReport = serde_json::from_str(
            r#"{"sentiment": "negative", "flagged": true, "summary": "hostile tone"}"#,
        )
        .unwrap();
        assert_eq!(report.sentiment, Sentiment::Negative);
        assert!(report.flagged);
    }

    #[test]
    fn image_analysis_accessor() {
        let structured = ImageAnalysis::Structured(serde_json::json!({"objects": ["mug"]}));
        assert!(structured.as_structured().is_some());

        let raw = ImageAnalysis::Raw {
            raw_description: "a mug on a desk".into(),
        };
        assert!(raw.as_structured().is_none());
    }
}
