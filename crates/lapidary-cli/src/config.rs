//! Configuration for the `lap` binary.
//!
//! Loaded with precedence: built-in defaults < TOML file < environment.
//! Command-line flags are applied on top by the commands themselves. API
//! keys are the exception: they come from the environment only
//! (`ANTHROPIC_API_KEY` / `OPENAI_API_KEY`), never from the file.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use lapidary_llm::{ModelConfig, ProviderKind};
use lapidary_pipeline::{PipelineConfig, RunConfig};
use lapidary_store::ListOptions;

/// Top-level configuration, one section per concern.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LapidaryConfig {
    pub vault: VaultConfig,
    pub processing: ProcessingConfig,
    pub model: ModelConfig,
}

/// Where the vault lives and which files count as notes.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VaultConfig {
    /// Vault root. No built-in default: comes from the file, the
    /// `LAPIDARY_VAULT` environment variable, or `--vault`.
    #[serde(default)]
    pub path: Option<PathBuf>,
    /// Inbox folder scanned for unprocessed notes, relative to the root.
    #[serde(default = "default_inbox")]
    pub inbox: String,
    #[serde(default = "default_recursive")]
    pub recursive: bool,
    /// Directory names excluded from listing at any depth.
    #[serde(default = "default_exclude_folders")]
    pub exclude_folders: Vec<String>,
    /// Filename globs a listed file must match.
    #[serde(default = "default_file_patterns")]
    pub file_patterns: Vec<String>,
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            path: None,
            inbox: default_inbox(),
            recursive: default_recursive(),
            exclude_folders: default_exclude_folders(),
            file_patterns: default_file_patterns(),
        }
    }
}

/// Batch limits and stamping behavior.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProcessingConfig {
    #[serde(default = "default_max_note_size_kb")]
    pub max_note_size_kb: u64,
    #[serde(default = "default_max_notes_per_run")]
    pub max_notes_per_run: usize,
    /// Stamped into every enhanced note as `processing_version`.
    #[serde(default = "default_processing_version")]
    pub processing_version: String,
    #[serde(default = "default_skip_unchanged")]
    pub skip_unchanged: bool,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            max_note_size_kb: default_max_note_size_kb(),
            max_notes_per_run: default_max_notes_per_run(),
            processing_version: default_processing_version(),
            skip_unchanged: default_skip_unchanged(),
        }
    }
}

fn default_inbox() -> String {
    "0-QuickNotes".to_string()
}

fn default_recursive() -> bool {
    true
}

fn default_exclude_folders() -> Vec<String> {
    [".obsidian", ".trash", "templates", ".git"]
        .map(String::from)
        .to_vec()
}

fn default_file_patterns() -> Vec<String> {
    ["*.md", "*.txt", "*.org", "*.rst", "*.markdown"]
        .map(String::from)
        .to_vec()
}

fn default_max_note_size_kb() -> u64 {
    10_000
}

fn default_max_notes_per_run() -> usize {
    10
}

fn default_processing_version() -> String {
    "1.0".to_string()
}

fn default_skip_unchanged() -> bool {
    true
}

impl LapidaryConfig {
    /// Load configuration with precedence: defaults < file < environment.
    pub fn load(config_file: Option<PathBuf>) -> Result<Self> {
        let mut config = Self::from_file_or_default(config_file)?;

        if let Ok(path) = std::env::var("LAPIDARY_VAULT") {
            config.vault.path = Some(PathBuf::from(path));
        }
        config.resolve_api_keys();

        Ok(config)
    }

    /// Load from an explicit file (which must exist), the default location
    /// (if present), or fall back to defaults.
    fn from_file_or_default(config_file: Option<PathBuf>) -> Result<Self> {
        let path = match config_file {
            Some(path) => {
                if !path.exists() {
                    bail!("config file {} does not exist", path.display());
                }
                Some(path)
            }
            None => Self::default_config_path().filter(|path| path.exists()),
        };

        match path {
            Some(path) => {
                let contents = std::fs::read_to_string(&path)
                    .with_context(|| format!("cannot read config file {}", path.display()))?;
                toml::from_str(&contents)
                    .with_context(|| format!("cannot parse config file {}", path.display()))
            }
            None => Ok(Self::default()),
        }
    }

    /// `~/.config/lapidary/lapidary.toml` on Linux, the platform equivalent
    /// elsewhere.
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("lapidary").join("lapidary.toml"))
    }

    /// Fill in API keys from the environment for every provider in the
    /// chain (primary plus any fallbacks).
    fn resolve_api_keys(&mut self) {
        let mut current = Some(&mut self.model);
        while let Some(model) = current {
            model.api_key = match model.provider {
                ProviderKind::Anthropic => std::env::var("ANTHROPIC_API_KEY").ok(),
                ProviderKind::OpenAi => std::env::var("OPENAI_API_KEY").ok(),
            };
            current = model.fallback.as_deref_mut();
        }
    }

    /// Check what every command needs: a real vault directory and a sane
    /// batch cap. Provider credentials are not checked here — a dry run
    /// needs none, and client construction reports a missing key itself.
    pub fn validate(&self) -> Result<()> {
        let Some(path) = &self.vault.path else {
            bail!("no vault configured; set vault.path, LAPIDARY_VAULT, or pass --vault");
        };
        if !path.is_dir() {
            bail!("vault path {} is not a directory", path.display());
        }
        if self.processing.max_notes_per_run == 0 {
            bail!("processing.max_notes_per_run must be at least 1");
        }
        Ok(())
    }

    /// Vault root, once configured.
    pub fn vault_root(&self) -> Result<&Path> {
        self.vault.path.as_deref().context("no vault configured")
    }

    /// Extensions accepted by the pipeline, derived from the filename
    /// patterns (`*.md` → `md`). Patterns that are not simple extension
    /// globs contribute nothing; listing still applies them in full.
    pub fn allowed_extensions(&self) -> Vec<String> {
        self.vault
            .file_patterns
            .iter()
            .filter_map(|pattern| pattern.strip_prefix("*."))
            .map(str::to_ascii_lowercase)
            .collect()
    }

    pub fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            max_note_size_kb: self.processing.max_note_size_kb,
            allowed_extensions: self.allowed_extensions(),
            skip_unchanged: self.processing.skip_unchanged,
            processing_version: self.processing.processing_version.clone(),
        }
    }

    pub fn run_config(&self) -> RunConfig {
        RunConfig {
            inbox: self.vault.inbox.clone(),
            recursive: self.vault.recursive,
            max_notes_per_run: self.processing.max_notes_per_run,
        }
    }

    pub fn list_options(&self) -> ListOptions {
        ListOptions {
            exclude_folders: self.vault.exclude_folders.clone(),
            file_patterns: self.vault.file_patterns.clone(),
        }
    }
}
