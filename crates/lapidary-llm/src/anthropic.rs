//! Anthropic Messages API client.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use lapidary_core::{LanguageModelClient, ModelError, ModelResult};

use crate::config::ModelConfig;
use crate::retry::{self, Attempt};

const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
const API_VERSION: &str = "2023-06-01";

/// Client for `POST {base_url}/v1/messages`.
pub struct AnthropicClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
    max_tokens: u32,
    temperature: f32,
    max_retries: u32,
    timeout: Duration,
}

impl AnthropicClient {
    /// Build a client from resolved provider config. Fails when no API key
    /// was resolved from `ANTHROPIC_API_KEY`.
    pub fn new(config: &ModelConfig) -> ModelResult<Self> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| ModelError::Auth("ANTHROPIC_API_KEY is not set".to_string()))?;
        Ok(Self {
            client: reqwest::Client::new(),
            api_key,
            base_url: config
                .base_url
                .clone()
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
            max_retries: config.max_retries,
            timeout: Duration::from_secs(config.timeout_secs),
        })
    }

    async fn attempt(&self, system_prompt: &str, user_prompt: &str) -> Result<String, Attempt> {
        let url = format!("{}/v1/messages", self.base_url);
        let body = json!({
            "model": self.model,
            "max_tokens": self.max_tokens,
            "temperature": self.temperature,
            "system": system_prompt,
            "messages": [{ "role": "user", "content": user_prompt }],
        });

        let response = self
            .client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .json(&body)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|err| retry::transport_error(err, self.timeout.as_secs()))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(retry::status_error(status, &detail));
        }

        let parsed: MessagesResponse = response.json().await.map_err(|err| {
            Attempt::Fatal(ModelError::Provider(format!("unparseable response: {err}")))
        })?;
        parsed
            .content
            .into_iter()
            .find_map(|block| match block {
                ContentBlock::Text { text } => Some(text),
                ContentBlock::Other => None,
            })
            .ok_or_else(|| {
                Attempt::Fatal(ModelError::Provider(
                    "response contains no text block".to_string(),
                ))
            })
    }
}

#[async_trait]
impl LanguageModelClient for AnthropicClient {
    async fn send(&self, system_prompt: &str, user_prompt: &str) -> ModelResult<String> {
        debug!(model = %self.model, "sending messages request");
        retry::send_with_backoff("anthropic", self.max_retries, || {
            self.attempt(system_prompt, user_prompt)
        })
        .await
    }

    fn provider_name(&self) -> &str {
        "anthropic"
    }
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentBlock {
    Text { text: String },
    #[serde(other)]
    Other,
}
