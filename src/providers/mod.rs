//! Provider adapters and the fallback-chain registry.
//!
//! Each adapter translates the uniform internal request into one
//! upstream vendor's native call shape and translates the native
//! response back to plain text. The [`ProviderRegistry`] walks chat
//! adapters in priority order until one succeeds.

pub mod anthropic;
pub mod gemini;
pub mod mistral;
pub mod openai;
pub mod registry;
pub mod traits;

pub use anthropic::AnthropicClient;
pub use gemini::GeminiClient;
pub use mistral::MistralClient;
pub use openai::OpenAiClient;
pub use registry::ProviderRegistry;
pub use traits::{ChatProvider, EmbeddingProvider, VisionProvider};
