//! Provider configuration.

use serde::Deserialize;

/// Which provider implementation to construct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[default]
    Anthropic,
    OpenAi,
}

/// One provider's settings, deserialized from the `[model]` table (and,
/// with the same shape, from `[model.fallback]`).
///
/// `api_key` is deliberately `#[serde(skip)]`: keys come from the
/// environment (`ANTHROPIC_API_KEY` / `OPENAI_API_KEY`), never from the
/// configuration file. The caller resolves them before building clients.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModelConfig {
    #[serde(default)]
    pub provider: ProviderKind,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Override the provider endpoint (proxies, local servers).
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(skip)]
    pub api_key: Option<String>,
    /// Secondary provider to try when this one fails.
    #[serde(default)]
    pub fallback: Option<Box<ModelConfig>>,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::default(),
            model: default_model(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            base_url: None,
            max_retries: default_max_retries(),
            timeout_secs: default_timeout_secs(),
            api_key: None,
            fallback: None,
        }
    }
}

fn default_model() -> String {
    "claude-sonnet-4-20250514".to_string()
}

fn default_max_tokens() -> u32 {
    4096
}

fn default_temperature() -> f32 {
    0.3
}

fn default_max_retries() -> u32 {
    3
}

fn default_timeout_secs() -> u64 {
    120
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_mirror_the_deployment() {
        let config = ModelConfig::default();
        assert_eq!(config.provider, ProviderKind::Anthropic);
        assert_eq!(config.model, "claude-sonnet-4-20250514");
        assert_eq!(config.max_tokens, 4096);
        assert_eq!(config.temperature, 0.3);
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.timeout_secs, 120);
        assert!(config.base_url.is_none());
        assert!(config.fallback.is_none());
    }
}
