//! Core gateway types

pub mod analysis;
pub mod capabilities;
pub mod request;

pub use analysis::{ImageAnalysis, Sentiment, SentimentReport};
pub use capabilities::Capabilities;
pub use request::GenerationRequest;
