//! Provider traits for capability-specific implementations.
//!
//! Providers implement capability-specific traits rather than a single
//! "god trait". This keeps the fallback chain, the semantic cache's
//! embedder, and the vision path independently injectable and lets tests
//! substitute any of them with in-process mocks.
//!
//! # Fallback semantics
//!
//! Every error from [`ChatProvider::complete`] is a single-call failure:
//! the registry logs it and advances to the next provider in priority
//! order. There is no intra-provider retry; moving to the next provider
//! is itself the retry strategy.

use async_trait::async_trait;

use crate::Result;
use crate::types::{Capabilities, GenerationRequest};

/// Provider for chat-style text generation.
///
/// Adapters translate the uniform [`GenerationRequest`] into their native
/// call shape, including the provider-specific JSON-mode mechanism (a
/// response-format flag, a MIME-type hint, or equivalent), and return
/// plain text.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Provider name for logging/debugging.
    fn name(&self) -> &str;

    /// What this provider can do.
    fn capabilities(&self) -> Capabilities;

    /// Non-streaming chat completion, returning the assistant text.
    async fn complete(&self, request: &GenerationRequest) -> Result<String>;
}

/// Provider for text embeddings.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Provider name for logging/debugging.
    fn name(&self) -> &str;

    /// Generate an embedding vector for a single text.
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;
}

/// Provider for multimodal image analysis.
///
/// A single dedicated path: not part of the fallback chain and never
/// cache-backed. A failure here is terminal for that call.
#[async_trait]
pub trait VisionProvider: Send + Sync {
    /// Provider name for logging/debugging.
    fn name(&self) -> &str;

    /// Analyze base64-encoded image bytes against a text instruction.
    async fn analyze(&self, base64_image: &str, instruction: &str) -> Result<String>;
}
