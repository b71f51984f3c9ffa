//! Semantic response cache keyed on embedding similarity.
//!
//! Conversational inputs are rarely byte-identical across semantically
//! equivalent requests ("a short joke about perfumes" vs. "a quick joke
//! about fragrance"), so exact-key caching would almost never hit.
//! [`SemanticCache`] instead embeds each cache key and answers a lookup
//! from the stored entry whose embedding is most similar, when that
//! similarity clears a threshold.
//!
//! # Architecture
//!
//! The cache sits in the gateway, above the provider fallback chain.
//! A hit bypasses provider selection and all network calls. The store is
//! an explicit, injectable service object rather than a process-wide
//! singleton, so tests substitute a fresh store per test and a
//! distributed backing store can later be swapped in without touching
//! callers.
//!
//! # Failure semantics
//!
//! Any embedding failure degrades the cache to a transparent no-op for
//! that call: lookups miss, stores are skipped, and no error ever
//! propagates to the gateway. Degradation is logged at warning level and
//! counted in `muninn_cache_degraded_total`.
//!
//! # Consistency
//!
//! Entries are appended or evicted, never updated in place. Concurrent
//! reads and writes from unrelated requests may interleave arbitrarily;
//! two near-simultaneous misses may both populate near-duplicate entries.
//! That duplication is bounded by capacity and self-heals through FIFO
//! eviction, so it is tolerated rather than locked against.

use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use std::sync::Arc;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::providers::EmbeddingProvider;
use crate::telemetry;

/// Default number of entries the store holds before FIFO eviction.
pub const DEFAULT_CAPACITY: usize = 500;

/// Default soft-expiry for matching eligibility.
pub const DEFAULT_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Default minimum cosine similarity for a hit.
pub const DEFAULT_SIMILARITY_THRESHOLD: f32 = 0.92;

/// Configuration for the semantic cache.
///
/// ```rust
/// # use muninn::cache::CacheConfig;
/// # use std::time::Duration;
/// let config = CacheConfig::new()
///     .capacity(1_000)
///     .ttl(Duration::from_secs(3600))
///     .similarity_threshold(0.95);
/// ```
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Maximum number of stored entries. Default: 500.
    pub capacity: usize,
    /// Soft time-to-live: entries older than this are skipped at lookup
    /// but occupy storage until FIFO eviction. Default: 24 hours.
    pub ttl: Duration,
    /// Minimum cosine similarity for a hit. Default: 0.92.
    pub similarity_threshold: f32,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            ttl: DEFAULT_TTL,
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
        }
    }
}

impl CacheConfig {
    /// Create a new config with the defaults above.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum number of stored entries.
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Set the soft time-to-live.
    pub fn ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Set the minimum cosine similarity for a hit.
    pub fn similarity_threshold(mut self, threshold: f32) -> Self {
        self.similarity_threshold = threshold;
        self
    }
}

/// One cached (embedding, response) pair. Immutable once created.
struct CacheEntry {
    embedding: Vec<f32>,
    response: String,
    created_at: Instant,
}

/// Bounded, append-ordered semantic cache.
///
/// See the module docs for matching, eviction, and failure semantics.
pub struct SemanticCache {
    entries: Mutex<VecDeque<CacheEntry>>,
    config: CacheConfig,
    embedder: Arc<dyn EmbeddingProvider>,
}

impl SemanticCache {
    /// Create a cache backed by the given embedding provider.
    pub fn new(embedder: Arc<dyn EmbeddingProvider>, config: CacheConfig) -> Self {
        Self {
            entries: Mutex::new(VecDeque::with_capacity(config.capacity)),
            config,
            embedder,
        }
    }

    /// Look up the best non-expired match for `key`.
    ///
    /// Embeds the key, scans every eligible entry, and returns the stored
    /// response whose similarity is maximal and at least the threshold.
    /// Ties keep the earliest-inserted entry. An embedding failure
    /// reports a miss.
    pub async fn lookup(&self, key: &str) -> Option<String> {
        let query = match self.embedder.embed(key).await {
            Ok(vector) => vector,
            Err(e) => {
                warn!(error = %e, "embedding failed, cache degraded to miss");
                metrics::counter!(telemetry::CACHE_DEGRADED_TOTAL).increment(1);
                return None;
            }
        };

        let now = Instant::now();
        let entries = self
            .entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let mut best: Option<(f32, &CacheEntry)> = None;
        for entry in entries.iter() {
            if now.duration_since(entry.created_at) > self.config.ttl {
                continue;
            }
            let score = cosine_similarity(&query, &entry.embedding);
            // Strict > keeps the earliest-inserted entry on ties.
            if best.is_none_or(|(top, _)| score > top) {
                best = Some((score, entry));
            }
        }

        match best {
            Some((score, entry)) if score >= self.config.similarity_threshold => {
                debug!(score, "semantic cache hit");
                metrics::counter!(telemetry::CACHE_HITS_TOTAL).increment(1);
                Some(entry.response.clone())
            }
            _ => {
                metrics::counter!(telemetry::CACHE_MISSES_TOTAL).increment(1);
                None
            }
        }
    }

    /// Store a (key, response) pair, best-effort.
    ///
    /// An embedding failure skips the store silently. At capacity,
    /// exactly the oldest entry is evicted first.
    pub async fn store(&self, key: &str, response: &str) {
        let embedding = match self.embedder.embed(key).await {
            Ok(vector) => vector,
            Err(e) => {
                warn!(error = %e, "embedding failed, cache store skipped");
                metrics::counter!(telemetry::CACHE_DEGRADED_TOTAL).increment(1);
                return;
            }
        };

        let mut entries = self
            .entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        while entries.len() >= self.config.capacity.max(1) {
            entries.pop_front();
            metrics::counter!(telemetry::CACHE_EVICTIONS_TOTAL).increment(1);
        }
        entries.push_back(CacheEntry {
            embedding,
            response: response.to_string(),
            created_at: Instant::now(),
        });
    }

    /// Number of stored entries, expired or not.
    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Cosine similarity `dot(a, b) / (‖a‖·‖b‖)`.
///
/// Defined as 0 whenever either vector is empty, zero-normed, or the
/// dimensionalities disagree, rather than raising an error.
fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;
    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a.sqrt() * norm_b.sqrt())
}

// ============================================================================
// Tests
// ============================================================================
