//! Muninn - provider-redundant AI generation gateway with a semantic
//! response cache
//!
//! This crate puts several heterogeneous LLM providers behind one uniform
//! contract: a request either returns text from the first provider in a
//! fixed-priority fallback chain that answers, or fails with a single
//! terminal error once every provider is exhausted. Non-JSON requests are
//! additionally served from a cache keyed on embedding similarity, so
//! semantically equivalent prompts skip the network entirely.
//!
//! # Generation Example
//!
//! ```rust,no_run
//! use muninn::{GenerationRequest, Muninn};
//!
//! #[tokio::main]
//! async fn main() -> muninn::Result<()> {
//!     let gateway = Muninn::builder()
//!         .openai("sk-your-key")
//!         .gemini("your-gemini-key")
//!         .mistral("your-mistral-key")
//!         .build();
//!
//!     let request = GenerationRequest::new(
//!         "You are a helpful assistant.",
//!         "Tell me a short joke about perfumes.",
//!     )
//!     .temperature(0.7)
//!     .max_output_tokens(50);
//!
//!     let text = gateway.generate(&request).await?;
//!     println!("{text}");
//!     Ok(())
//! }
//! ```
//!
//! # Vision Example
//!
//! ```rust,no_run
//! use muninn::Muninn;
//!
//! #[tokio::main]
//! async fn main() -> muninn::Result<()> {
//!     let gateway = Muninn::builder().anthropic("your-key").build();
//!     let analysis = gateway.analyze_image("...base64 bytes...").await?;
//!     println!("{analysis:?}");
//!     Ok(())
//! }
//! ```

pub mod cache;
pub mod config;
pub mod error;
pub mod gateway;
pub mod normalize;
pub mod providers;
pub mod telemetry;
pub mod types;

// Re-export main types at crate root
pub use config::GatewayConfig;
pub use error::{GatewayError, Result};
pub use gateway::{Gateway, Muninn, MuninnBuilder};
pub use normalize::normalize;

// Re-export all types
pub use types::{Capabilities, GenerationRequest, ImageAnalysis, Sentiment, SentimentReport};
