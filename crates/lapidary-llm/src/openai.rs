//! OpenAI-compatible chat-completions client.
//!
//! Works against the hosted API and against anything speaking the same
//! shape: LiteLLM proxies, vLLM, Ollama's `/v1` endpoint. The API key is
//! optional because local endpoints typically accept unauthenticated
//! requests.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use lapidary_core::{LanguageModelClient, ModelError, ModelResult};

use crate::config::ModelConfig;
use crate::retry::{self, Attempt};

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Client for `POST {base_url}/chat/completions`.
pub struct OpenAiClient {
    client: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
    model: String,
    max_tokens: u32,
    temperature: f32,
    max_retries: u32,
    timeout: Duration,
}

impl OpenAiClient {
    pub fn new(config: &ModelConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: config.api_key.clone(),
            base_url: config
                .base_url
                .clone()
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
            max_retries: config.max_retries,
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }

    async fn attempt(&self, system_prompt: &str, user_prompt: &str) -> Result<String, Attempt> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": system_prompt },
                { "role": "user", "content": user_prompt },
            ],
            "max_tokens": self.max_tokens,
            "temperature": self.temperature,
        });

        let mut request = self.client.post(&url).json(&body).timeout(self.timeout);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|err| retry::transport_error(err, self.timeout.as_secs()))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(retry::status_error(status, &detail));
        }

        let parsed: ChatResponse = response.json().await.map_err(|err| {
            Attempt::Fatal(ModelError::Provider(format!("unparseable response: {err}")))
        })?;
        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| {
                Attempt::Fatal(ModelError::Provider(
                    "response contains no message content".to_string(),
                ))
            })
    }
}

#[async_trait]
impl LanguageModelClient for OpenAiClient {
    async fn send(&self, system_prompt: &str, user_prompt: &str) -> ModelResult<String> {
        debug!(model = %self.model, "sending chat completion request");
        retry::send_with_backoff("openai", self.max_retries, || {
            self.attempt(system_prompt, user_prompt)
        })
        .await
    }

    fn provider_name(&self) -> &str {
        "openai"
    }
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_accepts_missing_key_for_local_endpoints() {
        let config = ModelConfig {
            base_url: Some("http://localhost:11434/v1".into()),
            model: "qwen2.5:7b".into(),
            ..ModelConfig::default()
        };
        let client = OpenAiClient::new(&config);
        assert!(client.api_key.is_none());
        assert_eq!(client.base_url, "http://localhost:11434/v1");
    }

    #[test]
    fn response_extracts_first_choice() {
        let raw = r#"{
            "id": "chatcmpl-01",
            "object": "chat.completion",
            "choices": [
                {"index": 0, "message": {"role": "assistant", "content": "hi"}, "finish_reason": "stop"}
            ]
        }"#;
        let parsed: ChatResponse = serde_json::from_str(raw).unwrap();
        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content);
        assert_eq!(content.as_deref(), Some("hi"));
    }
}
