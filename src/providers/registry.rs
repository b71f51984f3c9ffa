//! Provider registry with fallback chain semantics.
//!
//! The `ProviderRegistry` stores chat providers in priority order
//! (index 0 = highest). A generation request walks the chain until one
//! provider succeeds; every per-provider failure is absorbed, logged at
//! warning level, and advances the chain. There is no intra-provider
//! retry — moving to the next provider is the retry strategy.
//!
//! The registry is built exactly once at startup from the process
//! configuration. Providers whose credential is missing are never
//! registered, so "configuration declined" is decided at construction
//! time and memoized for the process lifetime.
//!
//! # Chain deadline
//!
//! Each provider call is bounded by whatever remains of the chain
//! deadline, so a request cannot stack full per-call timeouts when
//! several providers hang in sequence. A timed-out call is treated
//! exactly like a failed call.
//!
//! # Fallback Chain Flow
//!
//! ```text
//! User: gateway.generate(request)
//!                 │ cache miss
//!                 ▼
//!       ┌─────────────────────┐
//!       │  ProviderRegistry   │
//!       │  chat providers     │
//!       └─────────┬───────────┘
//!                 │ try in order
//!                 ▼
//!       ┌─────────────────────┐
//!       │  OpenAiClient       │ ──► transport error / non-2xx / timeout
//!       │  (priority 0)       │ ──► log, advance
//!       └─────────┬───────────┘
//!                 ▼
//!       ┌─────────────────────┐
//!       │  GeminiClient       │ ──► returns text
//!       │  (priority 1)       │
//!       └─────────────────────┘
//! ```

use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;
use tracing::{instrument, warn};

use super::traits::{ChatProvider, VisionProvider};
use crate::telemetry;
use crate::types::{Capabilities, GenerationRequest};
use crate::{GatewayError, Result};

/// Registry of providers with fallback chain semantics.
///
/// Chat providers are stored in priority order (index 0 = highest).
/// The vision provider stands alone: it is not part of any chain.
pub struct ProviderRegistry {
    chat: Vec<Arc<dyn ChatProvider>>,
    vision: Option<Arc<dyn VisionProvider>>,
    chain_deadline: Duration,
}

impl ProviderRegistry {
    /// Create an empty registry with the given chain deadline.
    pub fn new(chain_deadline: Duration) -> Self {
        Self {
            chat: Vec::new(),
            vision: None,
            chain_deadline,
        }
    }

    /// Add a chat provider (appended to end of chain = lowest priority).
    ///
    /// Call in priority order: first registered = tried first.
    pub fn add_chat(&mut self, provider: Arc<dyn ChatProvider>) {
        self.chat.push(provider);
    }

    /// Set the vision provider.
    pub fn set_vision(&mut self, provider: Arc<dyn VisionProvider>) {
        self.vision = Some(provider);
    }

    /// Check if any chat providers are registered.
    pub fn has_chat(&self) -> bool {
        !self.chat.is_empty()
    }

    /// Check if a vision provider is registered.
    pub fn has_vision(&self) -> bool {
        self.vision.is_some()
    }

    /// Chat provider names in priority order.
    pub fn chat_provider_names(&self) -> Vec<String> {
        self.chat.iter().map(|p| p.name().to_string()).collect()
    }

    /// Union of all registered provider capabilities.
    pub fn capabilities(&self) -> Capabilities {
        let mut caps = self
            .chat
            .iter()
            .fold(Capabilities::default(), |acc, p| acc.union(p.capabilities()));
        caps.vision = self.vision.is_some();
        caps
    }

    /// Chat completion via the fallback chain.
    ///
    /// Returns the first successful provider's raw text. Fails with
    /// [`GatewayError::AllProvidersExhausted`] only when every registered
    /// provider has failed, the chain deadline expired, or no provider
    /// was ever configured.
    #[instrument(skip(self, request), fields(operation = "complete"))]
    pub async fn complete(&self, request: &GenerationRequest) -> Result<String> {
        let start = Instant::now();

        for provider in &self.chat {
            let remaining = self.chain_deadline.saturating_sub(start.elapsed());
            if remaining.is_zero() {
                warn!(
                    deadline = ?self.chain_deadline,
                    "chain deadline expired before all providers were tried"
                );
                break;
            }

            let outcome = tokio::time::timeout(remaining, provider.complete(request)).await;
            match outcome {
                Ok(Ok(text)) => {
                    Self::record_request("complete", provider.name(), start, true);
                    return Ok(text);
                }
                Ok(Err(e)) if e.is_provider_failure() => {
                    warn!(provider = provider.name(), error = %e, "provider call failed, advancing chain");
                    Self::record_fallback(provider.name());
                }
                Ok(Err(e)) => {
                    Self::record_request("complete", provider.name(), start, false);
                    return Err(e);
                }
                Err(_) => {
                    let e = GatewayError::Timeout(remaining);
                    warn!(provider = provider.name(), error = %e, "provider call failed, advancing chain");
                    Self::record_fallback(provider.name());
                }
            }
        }

        Self::record_request("complete", "none", start, false);
        Err(GatewayError::AllProvidersExhausted)
    }

    /// Image analysis via the single vision provider.
    ///
    /// Not a chain: no fallback exists for vision, so any failure is
    /// terminal for the call. An absent provider reads as exhaustion,
    /// the same terminal signal callers already handle.
    #[instrument(skip(self, base64_image, instruction), fields(operation = "analyze_image"))]
    pub async fn analyze_image(&self, base64_image: &str, instruction: &str) -> Result<String> {
        let start = Instant::now();
        let Some(provider) = &self.vision else {
            Self::record_request("analyze_image", "none", start, false);
            return Err(GatewayError::AllProvidersExhausted);
        };

        match provider.analyze(base64_image, instruction).await {
            Ok(text) => {
                Self::record_request("analyze_image", provider.name(), start, true);
                Ok(text)
            }
            Err(e) => {
                Self::record_request("analyze_image", provider.name(), start, false);
                Err(e)
            }
        }
    }

    /// Record request outcome metrics (counter + histogram).
    fn record_request(operation: &'static str, provider: &str, start: Instant, ok: bool) {
        let status = if ok { "ok" } else { "error" };
        let elapsed = start.elapsed().as_secs_f64();
        metrics::counter!(telemetry::REQUESTS_TOTAL,
            "provider" => provider.to_owned(),
            "operation" => operation,
            "status" => status,
        )
        .increment(1);
        metrics::histogram!(telemetry::REQUEST_DURATION_SECONDS,
            "provider" => provider.to_owned(),
            "operation" => operation,
        )
        .record(elapsed);
    }

    /// Record that a provider failure advanced the chain.
    fn record_fallback(provider: &str) {
        metrics::counter!(telemetry::FALLBACKS_TOTAL,
            "provider" => provider.to_owned(),
        )
        .increment(1);
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Mock chat provider with a scripted outcome.
    struct MockChatProvider {
        name: &'static str,
        reply: Option<&'static str>,
        calls: AtomicUsize,
    }

    impl MockChatProvider {
        fn succeeding(name: &'static str, reply: &'static str) -> Self {
            Self {
                name,
                reply: Some(reply),
                calls: AtomicUsize::new(0),
            }
        }

        fn failing(name: &'static str) -> Self {
            Self {
                name,
                reply: None,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait::async_trait]
    impl ChatProvider for MockChatProvider {
        fn name(&self) -> &str {
            self.name
        }

        fn capabilities(&self) -> Capabilities {
            Capabilities::chat_with_json()
        }

        async fn complete(&self, _request: &GenerationRequest) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.reply {
                Some(text) => Ok(text.to_string()),
                None => Err(GatewayError::Api {
                    status: 500,
                    message: "scripted failure".into(),
                }),
            }
        }
    }

    /// Chat provider that never resolves; exercises the chain deadline.
    struct HangingProvider;

    #[async_trait::async_trait]
    impl ChatProvider for HangingProvider {
        fn name(&self) -> &str {
            "hanging"
        }

        fn capabilities(&self) -> Capabilities {
            Capabilities::chat_with_json()
        }

        async fn complete(&self, _request: &GenerationRequest) -> Result<String> {
            std::future::pending().await
        }
    }

    fn request() -> GenerationRequest {
        GenerationRequest::new("system", "user")
    }

    #[tokio::test]
    async fn first_success_wins() {
        let mut registry = ProviderRegistry::new(Duration::from_secs(60));
        registry.add_chat(Arc::new(MockChatProvider::succeeding("a", "from a")));
        registry.add_chat(Arc::new(MockChatProvider::succeeding("b", "from b")));

        assert_eq!(registry.complete(&request()).await.unwrap(), "from a");
    }

    #[tokio::test]
    async fn failures_advance_to_next_provider() {
        let mut registry = ProviderRegistry::new(Duration::from_secs(60));
        let a = Arc::new(MockChatProvider::failing("a"));
        let b = Arc::new(MockChatProvider::failing("b"));
        let c = Arc::new(MockChatProvider::succeeding("c", "from c"));
        registry.add_chat(a.clone());
        registry.add_chat(b.clone());
        registry.add_chat(c.clone());

        let text = registry.complete(&request()).await.unwrap();
        assert_eq!(text, "from c");
        assert_eq!(a.calls.load(Ordering::SeqCst), 1);
        assert_eq!(b.calls.load(Ordering::SeqCst), 1);
        assert_eq!(c.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn exhaustion_surfaces_single_terminal_error() {
        let mut registry = ProviderRegistry::new(Duration::from_secs(60));
        registry.add_chat(Arc::new(MockChatProvider::failing("a")));
        registry.add_chat(Arc::new(MockChatProvider::failing("b")));
        registry.add_chat(Arc::new(MockChatProvider::failing("c")));

        assert!(matches!(
            registry.complete(&request()).await,
            Err(GatewayError::AllProvidersExhausted)
        ));
    }

    #[tokio::test]
    async fn empty_registry_is_exhausted() {
        let registry = ProviderRegistry::new(Duration::from_secs(60));
        assert!(matches!(
            registry.complete(&request()).await,
            Err(GatewayError::AllProvidersExhausted)
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn chain_deadline_bounds_hanging_providers() {
        let mut registry = ProviderRegistry::new(Duration::from_millis(100));
        registry.add_chat(Arc::new(HangingProvider));
        let fallback = Arc::new(MockChatProvider::succeeding("b", "late"));
        registry.add_chat(fallback.clone());

        // The hanging provider eats the whole deadline; the fallback is
        // never reached because no budget remains.
        let result = registry.complete(&request()).await;
        assert!(matches!(result, Err(GatewayError::AllProvidersExhausted)));
        assert_eq!(fallback.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn missing_vision_provider_is_terminal() {
        let registry = ProviderRegistry::new(Duration::from_secs(60));
        assert!(matches!(
            registry.analyze_image("aGVsbG8=", "describe").await,
            Err(GatewayError::AllProvidersExhausted)
        ));
    }

    #[test]
    fn capabilities_reflect_registered_providers() {
        let mut registry = ProviderRegistry::new(Duration::from_secs(60));
        assert_eq!(registry.capabilities(), Capabilities::default());

        registry.add_chat(Arc::new(MockChatProvider::succeeding("a", "x")));
        let caps = registry.capabilities();
        assert!(caps.chat && caps.json_mode);
        assert!(!caps.vision);
    }

    #[test]
    fn provider_names_in_priority_order() {
        let mut registry = ProviderRegistry::new(Duration::from_secs(60));
        registry.add_chat(Arc::new(MockChatProvider::succeeding("first", "x")));
        registry.add_chat(Arc::new(MockChatProvider::succeeding("second", "y")));
        assert_eq!(registry.chat_provider_names(), vec!["first", "second"]);
    }
}
