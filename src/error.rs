//! Gateway error types

use std::time::Duration;

/// Gateway error types
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    // Provider/network errors
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("rate limited, retry after {retry_after:?}")]
    RateLimited { retry_after: Option<Duration> },

    #[error("authentication failed")]
    AuthenticationFailed,

    #[error("provider call timed out after {0:?}")]
    Timeout(Duration),

    // Soft provider errors
    #[error("empty response from provider")]
    EmptyResponse,

    // Request errors
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// A provider returned an HTTP success whose body failed caller-side
    /// JSON parsing. Surfaced without consulting another provider: the
    /// chain trusts the first HTTP-successful response.
    #[error("malformed provider output: {0}")]
    MalformedOutput(String),

    /// Every configured provider failed, or none were configured.
    /// The only way a generation request fails as a whole.
    #[error("all providers exhausted")]
    AllProvidersExhausted,
}

impl GatewayError {
    /// Whether this error counts as a single provider call failing.
    ///
    /// Provider failures are absorbed by the fallback chain: the registry
    /// logs them and advances to the next provider. Anything else is
    /// terminal for the request.
    pub fn is_provider_failure(&self) -> bool {
        matches!(
            self,
            Self::Http(_)
                | Self::Api { .. }
                | Self::RateLimited { .. }
                | Self::AuthenticationFailed
                | Self::Timeout(_)
                | Self::EmptyResponse
        )
    }
}

/// Result type alias for gateway operations
pub type Result<T> = std::result::Result<T, GatewayError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_failures_are_absorbed_by_the_chain() {
        assert!(GatewayError::Http("connection refused".into()).is_provider_failure());
        assert!(
            GatewayError::Api {
                status: 500,
                message: "internal".into()
            }
            .is_provider_failure()
        );
        assert!(GatewayError::RateLimited { retry_after: None }.is_provider_failure());
        assert!(GatewayError::AuthenticationFailed.is_provider_failure());
        assert!(GatewayError::Timeout(Duration::from_secs(5)).is_provider_failure());
        assert!(GatewayError::EmptyResponse.is_provider_failure());
    }

    #[test]
    fn terminal_errors_are_not_provider_failures() {
        assert!(!GatewayError::AllProvidersExhausted.is_provider_failure());
        assert!(!GatewayError::MalformedOutput("not json".into()).is_provider_failure());
        assert!(!GatewayError::InvalidRequest("temperature".into()).is_provider_failure());
    }
}
