//! Gateway orchestration: cache lookup, fallback chain, normalization.

use tracing::debug;

use crate::Result;
use crate::cache::SemanticCache;
use crate::normalize::normalize;
use crate::providers::ProviderRegistry;
use crate::types::{Capabilities, GenerationRequest};

/// The gateway every caller talks to.
///
/// Owns the provider fallback chain and the semantic cache. Control flow
/// for one generation request:
///
/// ```text
/// caller → generate(request) → [cache lookup, if cacheable]
///        → on miss, provider chain → normalize → [cache write] → caller
/// ```
///
/// The vision path ([`Gateway::analyze_image`](crate::Gateway)) is invoked
/// directly and passes through neither the chain nor the cache.
pub struct Gateway {
    registry: ProviderRegistry,
    cache: Option<SemanticCache>,
}

impl Gateway {
    pub(crate) fn new(registry: ProviderRegistry, cache: Option<SemanticCache>) -> Self {
        Self { registry, cache }
    }

    /// Generate text for a request.
    ///
    /// Cacheable (non-JSON-mode) requests consult the semantic cache
    /// first; a hit returns without contacting any provider. On a miss
    /// the fallback chain runs, the winning text is normalized, and the
    /// result is written back to the cache best-effort.
    ///
    /// Fails with [`GatewayError::AllProvidersExhausted`] only when every
    /// configured provider has failed or none were ever configured.
    ///
    /// [`GatewayError::AllProvidersExhausted`]: crate::GatewayError::AllProvidersExhausted
    pub async fn generate(&self, request: &GenerationRequest) -> Result<String> {
        request.validate()?;

        // JSON-mode requests bypass the cache entirely: structured
        // answers are bound to caller-specific context that similarity
        // cannot discriminate safely.
        let cache = self.cache.as_ref().filter(|_| request.cacheable());

        if let Some(cache) = cache {
            let key = request.cache_key();
            if let Some(cached) = cache.lookup(&key).await {
                debug!("serving generation from semantic cache");
                return Ok(cached);
            }
        }

        let text = normalize(&self.registry.complete(request).await?);

        if let Some(cache) = cache {
            cache.store(&request.cache_key(), &text).await;
        }

        Ok(text)
    }

    /// What this gateway can do, given the providers that were configured.
    pub fn capabilities(&self) -> Capabilities {
        let mut caps = self.registry.capabilities();
        caps.embeddings = self.cache.is_some();
        caps
    }

    /// Chat provider names in fallback priority order.
    pub fn provider_names(&self) -> Vec<String> {
        self.registry.chat_provider_names()
    }

    pub(crate) fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }
}
