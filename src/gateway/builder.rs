//! Builder for configuring gateway instances

use std::sync::Arc;
use std::time::Duration;

use tracing::warn;

use super::orchestrator::Gateway;
use crate::cache::{CacheConfig, SemanticCache};
use crate::config::GatewayConfig;
use crate::providers::{
    AnthropicClient, EmbeddingProvider, GeminiClient, MistralClient, OpenAiClient,
    ProviderRegistry,
};

/// Main entry point for creating gateway instances.
pub struct Muninn;

impl Muninn {
    /// Create a new builder for configuring the gateway.
    pub fn builder() -> MuninnBuilder {
        MuninnBuilder::new()
    }

    /// Build a gateway straight from the conventional environment
    /// variables.
    pub fn from_env() -> Gateway {
        MuninnBuilder::from_config(GatewayConfig::from_env()).build()
    }
}

/// Builder for configuring gateway instances.
///
/// Providers are registered in fixed priority order: OpenAI, then
/// Gemini, then Mistral. A provider whose credential is absent is never
/// constructed — that configuration-declined state is logged once at
/// warning level and persists for the process lifetime.
pub struct MuninnBuilder {
    config: GatewayConfig,
    cache_config: CacheConfig,
    cache_enabled: bool,
    openai_base_url: Option<String>,
    gemini_base_url: Option<String>,
    mistral_base_url: Option<String>,
    anthropic_base_url: Option<String>,
}

impl MuninnBuilder {
    pub fn new() -> Self {
        Self::from_config(GatewayConfig::default())
    }

    /// Start from an existing configuration (e.g. [`GatewayConfig::from_env`]).
    pub fn from_config(config: GatewayConfig) -> Self {
        Self {
            config,
            cache_config: CacheConfig::default(),
            cache_enabled: true,
            openai_base_url: None,
            gemini_base_url: None,
            mistral_base_url: None,
            anthropic_base_url: None,
        }
    }

    /// Configure the primary provider (chat, JSON flag, embeddings).
    pub fn openai(mut self, api_key: impl Into<String>) -> Self {
        self.config.openai_api_key = Some(api_key.into());
        self
    }

    /// Configure the secondary provider (chat, JSON via MIME-type hint).
    pub fn gemini(mut self, api_key: impl Into<String>) -> Self {
        self.config.gemini_api_key = Some(api_key.into());
        self
    }

    /// Configure the tertiary provider (chat, OpenAI-shaped JSON flag).
    pub fn mistral(mut self, api_key: impl Into<String>) -> Self {
        self.config.mistral_api_key = Some(api_key.into());
        self
    }

    /// Configure the vision-only provider.
    pub fn anthropic(mut self, api_key: impl Into<String>) -> Self {
        self.config.anthropic_api_key = Some(api_key.into());
        self
    }

    /// Set the per-provider call timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.request_timeout = timeout;
        self
    }

    /// Set the deadline for one whole fallback chain walk.
    pub fn chain_deadline(mut self, deadline: Duration) -> Self {
        self.config.chain_deadline = deadline;
        self
    }

    /// Tune the semantic cache.
    pub fn cache(mut self, config: CacheConfig) -> Self {
        self.cache_config = config;
        self
    }

    /// Disable the semantic cache entirely.
    pub fn no_cache(mut self) -> Self {
        self.cache_enabled = false;
        self
    }

    /// Override the OpenAI base URL (for testing with wiremock).
    pub fn openai_base_url(mut self, url: impl Into<String>) -> Self {
        self.openai_base_url = Some(url.into());
        self
    }

    /// Override the Gemini base URL (for testing with wiremock).
    pub fn gemini_base_url(mut self, url: impl Into<String>) -> Self {
        self.gemini_base_url = Some(url.into());
        self
    }

    /// Override the Mistral base URL (for testing with wiremock).
    pub fn mistral_base_url(mut self, url: impl Into<String>) -> Self {
        self.mistral_base_url = Some(url.into());
        self
    }

    /// Override the Anthropic base URL (for testing with wiremock).
    pub fn anthropic_base_url(mut self, url: impl Into<String>) -> Self {
        self.anthropic_base_url = Some(url.into());
        self
    }

    /// Build the gateway.
    ///
    /// A gateway with zero configured providers still builds: exhaustion
    /// is a per-request outcome, surfaced as `AllProvidersExhausted` when
    /// `generate` is called, not a construction failure.
    pub fn build(self) -> Gateway {
        let http = reqwest::Client::builder()
            .timeout(self.config.request_timeout)
            .build()
            .expect("failed to build HTTP client");

        let mut registry = ProviderRegistry::new(self.config.chain_deadline);
        let mut embedder: Option<Arc<dyn EmbeddingProvider>> = None;

        if let Some(ref key) = self.config.openai_api_key {
            let base = self
                .openai_base_url
                .unwrap_or_else(|| "https://api.openai.com".to_string());
            let client = Arc::new(OpenAiClient::with_http_client(key, base, http.clone()));
            registry.add_chat(client.clone());
            embedder = Some(client);
        } else {
            warn!(provider = "openai", "credential not configured, provider disabled");
        }

        if let Some(ref key) = self.config.gemini_api_key {
            let base = self
                .gemini_base_url
                .unwrap_or_else(|| "https://generativelanguage.googleapis.com".to_string());
            registry.add_chat(Arc::new(GeminiClient::with_http_client(
                key,
                base,
                http.clone(),
            )));
        } else {
            warn!(provider = "gemini", "credential not configured, provider disabled");
        }

        if let Some(ref key) = self.config.mistral_api_key {
            let base = self
                .mistral_base_url
                .unwrap_or_else(|| "https://api.mistral.ai".to_string());
            registry.add_chat(Arc::new(MistralClient::with_http_client(
                key,
                base,
                http.clone(),
            )));
        } else {
            warn!(provider = "mistral", "credential not configured, provider disabled");
        }

        if let Some(ref key) = self.config.anthropic_api_key {
            let base = self
                .anthropic_base_url
                .unwrap_or_else(|| "https://api.anthropic.com".to_string());
            registry.set_vision(Arc::new(AnthropicClient::with_http_client(
                key,
                base,
                http.clone(),
            )));
        } else {
            warn!(provider = "anthropic", "credential not configured, vision disabled");
        }

        // The cache needs an embedding provider; without one it is never
        // allocated and every generation goes straight to the chain.
        let cache = match (self.cache_enabled, embedder) {
            (true, Some(embedder)) => Some(SemanticCache::new(embedder, self.cache_config)),
            _ => None,
        };

        Gateway::new(registry, cache)
    }
}

impl Default for MuninnBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_builder_still_builds() {
        let gateway = Muninn::builder().build();
        assert!(gateway.provider_names().is_empty());
        assert_eq!(gateway.capabilities(), Default::default());
    }

    #[test]
    fn providers_register_in_priority_order() {
        let gateway = Muninn::builder()
            .mistral("key-c")
            .openai("key-a")
            .gemini("key-b")
            .build();
        // Registration order is fixed by priority, not call order.
        assert_eq!(gateway.provider_names(), vec!["openai", "gemini", "mistral"]);
    }

    #[test]
    fn capabilities_follow_configured_providers() {
        let gateway = Muninn::builder().gemini("key").anthropic("key").build();
        let caps = gateway.capabilities();
        assert!(caps.chat && caps.json_mode && caps.vision);
        // No OpenAI key means no embedder, so no cache.
        assert!(!caps.embeddings);
    }

    #[test]
    fn no_cache_disables_embeddings_capability() {
        let gateway = Muninn::builder().openai("key").no_cache().build();
        assert!(!gateway.capabilities().embeddings);
    }
}
