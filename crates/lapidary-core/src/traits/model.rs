//! Language-model client abstraction.

use async_trait::async_trait;

/// Result type for model calls.
pub type ModelResult<T> = Result<T, ModelError>;

/// Provider call errors, classified so the pipeline can report the failure
/// cause without knowing which provider is behind the trait.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    /// HTTP 429 or provider-reported throttling, after retries exhausted.
    #[error("rate limited")]
    RateLimited,

    /// Invalid or missing credentials. Never retried.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// Request exceeded the client's configured deadline.
    #[error("timed out after {0}s")]
    Timeout(u64),

    /// Anything else the provider reported: malformed request, 5xx after
    /// retries, unexpected response shape.
    #[error("provider error: {0}")]
    Provider(String),
}

/// One prompt round-trip to a language-model provider.
///
/// Implementations own their retry policy and must return within a bounded
/// time; the pipeline never retries on top and blocks on the full
/// round-trip. The response is raw text, validated downstream.
#[async_trait]
pub trait LanguageModelClient: Send + Sync {
    /// Send a system + user prompt pair and return the model's raw text.
    async fn send(&self, system_prompt: &str, user_prompt: &str) -> ModelResult<String>;

    /// Short provider name for logs (`"anthropic"`, `"openai"`, ...).
    fn provider_name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_kinds_are_distinguishable_in_logs() {
        assert_eq!(ModelError::RateLimited.to_string(), "rate limited");
        assert_eq!(
            ModelError::Auth("bad key".into()).to_string(),
            "authentication failed: bad key"
        );
        assert_eq!(ModelError::Timeout(120).to_string(), "timed out after 120s");
        assert_eq!(
            ModelError::Provider("500".into()).to_string(),
            "provider error: 500"
        );
    }
}
