//! Primary/fallback composition of two clients.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::warn;

use lapidary_core::{LanguageModelClient, ModelResult};

/// Tries a primary client; on any error, tries the fallback once. The
/// fallback's error is the one reported when both fail.
pub struct FallbackClient {
    primary: Arc<dyn LanguageModelClient>,
    fallback: Arc<dyn LanguageModelClient>,
    name: String,
}

impl FallbackClient {
    pub fn new(primary: Arc<dyn LanguageModelClient>, fallback: Arc<dyn LanguageModelClient>) -> Self {
        let name = format!("{}+{}", primary.provider_name(), fallback.provider_name());
        Self {
            primary,
            fallback,
            name,
        }
    }
}

#[async_trait]
impl LanguageModelClient for FallbackClient {
    async fn send(&self, system_prompt: &str, user_prompt: &str) -> ModelResult<String> {
        match self.primary.send(system_prompt, user_prompt).await {
            Ok(text) => Ok(text),
            Err(primary_error) => {
                warn!(
                    primary = self.primary.provider_name(),
                    fallback = self.fallback.provider_name(),
                    error = %primary_error,
                    "primary provider failed, trying fallback"
                );
                self.fallback.send(system_prompt, user_prompt).await
            }
        }
    }

    fn provider_name(&self) -> &str {
        &self.name
    }
}
