//! Semantic response cache

mod semantic;

pub use semantic::{
    CacheConfig, DEFAULT_CAPACITY, DEFAULT_SIMILARITY_THRESHOLD, DEFAULT_TTL, SemanticCache,
};
