//! # Lapidary LLM
//!
//! Provider clients behind the [`LanguageModelClient`] trait:
//!
//! - [`AnthropicClient`] — the Anthropic Messages API
//! - [`OpenAiClient`] — any OpenAI-compatible chat-completions endpoint
//!   (hosted, LiteLLM proxy, local Ollama `/v1`)
//! - [`FallbackClient`] — tries a primary client, falls back to a second on
//!   any error
//!
//! Clients own their retry policy (exponential backoff on throttling and
//! transient faults); the pipeline above never retries. Use
//! [`create_model_client`] to build the configured client stack.
//!
//! [`LanguageModelClient`]: lapidary_core::LanguageModelClient

mod anthropic;
mod config;
mod fallback;
mod openai;
mod retry;

pub use anthropic::AnthropicClient;
pub use config::{ModelConfig, ProviderKind};
pub use fallback::FallbackClient;
pub use openai::OpenAiClient;

use std::sync::Arc;

use lapidary_core::{LanguageModelClient, ModelResult};

/// Build the client stack described by `config`: one concrete provider
/// client, wrapped in a [`FallbackClient`] when a fallback is configured.
pub fn create_model_client(config: &ModelConfig) -> ModelResult<Arc<dyn LanguageModelClient>> {
    let primary = build_provider(config)?;
    match &config.fallback {
        Some(fallback_config) => {
            let fallback = build_provider(fallback_config)?;
            Ok(Arc::new(FallbackClient::new(primary, fallback)))
        }
        None => Ok(primary),
    }
}

fn build_provider(config: &ModelConfig) -> ModelResult<Arc<dyn LanguageModelClient>> {
    match config.provider {
        ProviderKind::Anthropic => Ok(Arc::new(AnthropicClient::new(config)?)),
        ProviderKind::OpenAi => Ok(Arc::new(OpenAiClient::new(config))),
    }
}
