//! Telemetry metric name constants.
//!
//! Centralised metric names for gateway operations. Consumers install
//! their own `metrics` recorder (e.g. prometheus, statsd); without a
//! recorder installed, all metric calls are no-ops.
//!
//! # Metric naming conventions
//!
//! All metrics are prefixed with `muninn_`. Counters end in `_total`,
//! histograms use meaningful units (e.g. `_seconds`).
//!
//! # Common labels
//!
//! - `provider` — provider name (e.g. "openai", "gemini")
//! - `operation` — entry point invoked (e.g. "complete", "analyze_image")
//! - `status` — outcome: "ok" or "error"

/// Total requests dispatched through the registry.
///
/// Labels: `provider`, `operation`, `status` ("ok" | "error").
pub const REQUESTS_TOTAL: &str = "muninn_requests_total";

/// Request duration in seconds.
///
/// Labels: `provider`, `operation`.
pub const REQUEST_DURATION_SECONDS: &str = "muninn_request_duration_seconds";

/// Total times a provider failure advanced the fallback chain.
///
/// Labels: `provider` (the one that failed).
pub const FALLBACKS_TOTAL: &str = "muninn_provider_fallbacks_total";

/// Total semantic cache hits.
pub const CACHE_HITS_TOTAL: &str = "muninn_cache_hits_total";

/// Total semantic cache misses.
pub const CACHE_MISSES_TOTAL: &str = "muninn_cache_misses_total";

/// Total cache operations skipped because embedding generation failed.
pub const CACHE_DEGRADED_TOTAL: &str = "muninn_cache_degraded_total";

/// Total entries evicted from the cache at capacity.
pub const CACHE_EVICTIONS_TOTAL: &str = "muninn_cache_evictions_total";
