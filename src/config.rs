//! Process configuration for the gateway.
//!
//! Each upstream provider requires its own credential. A missing credential
//! permanently disables that provider for the process lifetime: the
//! registry is built once from this config and availability is never
//! re-probed afterwards.

use std::env;
use std::time::Duration;

/// Default per-provider call timeout.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Default deadline for one whole fallback chain walk.
///
/// Bounds worst-case latency when several providers time out in sequence.
pub const DEFAULT_CHAIN_DEADLINE: Duration = Duration::from_secs(60);

/// Gateway configuration.
///
/// Credentials are optional per provider; a `None` credential means the
/// provider is skipped at registry construction (logged at warn level,
/// never treated as a runtime failure).
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Primary text provider (chat, JSON-mode flag, embeddings).
    pub openai_api_key: Option<String>,
    /// Secondary text provider (chat, JSON mode via MIME-type hint).
    pub gemini_api_key: Option<String>,
    /// Tertiary text provider (chat, OpenAI-shaped JSON-mode flag).
    pub mistral_api_key: Option<String>,
    /// Vision-only provider (multimodal, inline base64 images).
    pub anthropic_api_key: Option<String>,
    /// Timeout applied to every single provider call.
    pub request_timeout: Duration,
    /// Deadline for a whole fallback chain walk.
    pub chain_deadline: Duration,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            openai_api_key: None,
            gemini_api_key: None,
            mistral_api_key: None,
            anthropic_api_key: None,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            chain_deadline: DEFAULT_CHAIN_DEADLINE,
        }
    }
}

impl GatewayConfig {
    /// Load credentials from the conventional environment variables.
    ///
    /// Empty values are treated as absent.
    pub fn from_env() -> Self {
        Self {
            openai_api_key: env_key("OPENAI_API_KEY"),
            gemini_api_key: env_key("GEMINI_API_KEY"),
            mistral_api_key: env_key("MISTRAL_API_KEY"),
            anthropic_api_key: env_key("ANTHROPIC_API_KEY"),
            ..Self::default()
        }
    }

    /// Whether at least one text provider credential is present.
    pub fn has_text_provider(&self) -> bool {
        self.openai_api_key.is_some()
            || self.gemini_api_key.is_some()
            || self.mistral_api_key.is_some()
    }
}

fn env_key(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_has_no_providers() {
        let config = GatewayConfig::default();
        assert!(!config.has_text_provider());
        assert!(config.anthropic_api_key.is_none());
        assert_eq!(config.request_timeout, DEFAULT_REQUEST_TIMEOUT);
    }

    #[test]
    fn any_text_key_counts() {
        let config = GatewayConfig {
            mistral_api_key: Some("key".into()),
            ..Default::default()
        };
        assert!(config.has_text_provider());
    }
}
