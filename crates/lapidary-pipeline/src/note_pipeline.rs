//! Per-note processing state machine.
//!
//! A note moves strictly forward: read, filter, size check, mark, model
//! call, response validation, metadata assembly, persist. Any stage may
//! short-circuit into a skip or a failure.
//!
//! Ordering invariant: the Mark rename lands before the model call. Once a
//! note carries the in-progress prefix no later run will select it, so a
//! crash mid-call cannot lead to a second submission. The flip side is that
//! a failure after Mark leaves the note marked with its original content —
//! it is reported for operator attention, never silently unmarked.

use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde_json::{json, Map, Value};
use tracing::{debug, info, warn};

use lapidary_core::{
    frontmatter::{self, Frontmatter},
    hashing, prompt, response, FailureReason, FileStore, LanguageModelClient, Note, NoteRef,
    ProcessingResult, SkipReason,
};

use crate::config::PipelineConfig;

/// Frontmatter flag that permanently opts a note out of processing.
const IGNORE_FLAG: &str = "ignoreParse";

/// Frontmatter keys the pipeline owns. Provider copies are dropped so a
/// response cannot forge the stamps.
const RESERVED_KEYS: [&str; 2] = ["processed_datetime", "note_hash"];

/// Runs one note through the full state machine.
pub struct NotePipeline {
    store: Arc<dyn FileStore>,
    model: Arc<dyn LanguageModelClient>,
    config: PipelineConfig,
}

impl NotePipeline {
    pub fn new(
        store: Arc<dyn FileStore>,
        model: Arc<dyn LanguageModelClient>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            store,
            model,
            config,
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Process one note. Never returns an error: every outcome is a
    /// [`ProcessingResult`] for the coordinator to aggregate.
    pub async fn process(&self, reference: &NoteRef) -> ProcessingResult {
        let start = Instant::now();
        debug!(note = %reference, "processing note");

        // Filtering needs the frontmatter (ignore flag, stamped hash), so
        // the read comes first.
        let raw = match self.store.read(reference).await {
            Ok(raw) => raw,
            Err(err) => {
                warn!(note = %reference, error = %err, "read failed");
                return ProcessingResult::Failed(FailureReason::ReadFailed(err));
            }
        };
        let note = Note::from_raw(reference.clone(), &raw);

        if let Some(reason) = filter_verdict(&note, &self.config) {
            debug!(note = %reference, reason = %reason, "filtered out");
            return ProcessingResult::Skipped(reason);
        }

        if let Some(reason) = size_verdict(raw.len(), &self.config) {
            debug!(note = %reference, reason = %reason, "rejected by size check");
            return ProcessingResult::Skipped(reason);
        }

        // Claim the note before any external call. The rename is the
        // cross-run exclusion point.
        let marked = match self.store.rename(reference, &reference.marked_name()).await {
            Ok(marked) => marked,
            Err(err) => {
                warn!(note = %reference, error = %err, "mark failed, no model call made");
                return ProcessingResult::Failed(FailureReason::MarkFailed(err));
            }
        };

        // From here on, failures leave the note marked.
        let model_start = Instant::now();
        let raw_response = match self
            .model
            .send(prompt::SYSTEM_PROMPT, &prompt::build_user_prompt(note.body()))
            .await
        {
            Ok(text) => text,
            Err(err) => {
                warn!(note = %marked, error = %err, "model call failed; note left marked");
                return ProcessingResult::Failed(FailureReason::LlmError(err));
            }
        };
        debug!(
            note = %marked,
            elapsed_ms = model_start.elapsed().as_millis() as u64,
            "model call complete"
        );

        let enhancement = match response::validate(&raw_response) {
            Ok(enhancement) => enhancement,
            Err(err) => {
                warn!(note = %marked, error = %err, "invalid model response; note left marked");
                return ProcessingResult::Failed(FailureReason::InvalidResponse(err));
            }
        };

        let metadata = build_metadata(enhancement.metadata, note.body(), Utc::now(), &self.config);
        let document = frontmatter::serialize(&metadata, &enhancement.content);

        if let Err(err) = self.store.write(&marked, &document).await {
            warn!(note = %marked, error = %err, "persist failed; note left marked");
            return ProcessingResult::Failed(FailureReason::PersistFailed(err));
        }

        info!(
            note = %marked,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "note enhanced"
        );
        ProcessingResult::Processed { note: marked }
    }
}

/// Decide whether a note should be processed at all.
pub fn filter_verdict(note: &Note, config: &PipelineConfig) -> Option<SkipReason> {
    if note.is_marked() {
        return Some(SkipReason::AlreadyProcessed);
    }
    if note.frontmatter().get_bool(IGNORE_FLAG) == Some(true) {
        return Some(SkipReason::IgnoreFlagged);
    }
    if !extension_allowed(note.reference(), &config.allowed_extensions) {
        return Some(SkipReason::WrongExtension);
    }
    if config.skip_unchanged {
        if let Some(stamped) = note.frontmatter().get_str("note_hash") {
            if stamped == hashing::hash_body(note.body()) {
                return Some(SkipReason::Unchanged);
            }
        }
    }
    None
}

/// Enforce the size ceiling on the raw document.
pub fn size_verdict(raw_len: usize, config: &PipelineConfig) -> Option<SkipReason> {
    let limit_bytes = config.max_note_size_kb.saturating_mul(1024);
    if raw_len as u64 > limit_bytes {
        return Some(SkipReason::TooLarge {
            size_kb: (raw_len as u64).div_ceil(1024),
            limit_kb: config.max_note_size_kb,
        });
    }
    None
}

pub(crate) fn extension_allowed(reference: &NoteRef, allowed: &[String]) -> bool {
    if allowed.is_empty() {
        return true;
    }
    reference
        .extension()
        .is_some_and(|ext| allowed.iter().any(|a| a == &ext))
}

/// Assemble the frontmatter for a processed note: pipeline stamps first,
/// provider fields in response order, then defaults for anything the
/// provider omitted. Provider-supplied values are never overwritten.
pub fn build_metadata(
    provider_fields: Map<String, Value>,
    original_body: &str,
    now: DateTime<Utc>,
    config: &PipelineConfig,
) -> Frontmatter {
    let mut metadata = Frontmatter::new();
    metadata.insert(
        "processed_datetime",
        json!(now.format("%Y-%m-%dT%H:%M:%SZ").to_string()),
    );
    metadata.insert("note_hash", json!(hashing::hash_body(original_body)));

    for (key, value) in provider_fields {
        if RESERVED_KEYS.contains(&key.as_str()) {
            continue;
        }
        metadata.insert(key, value);
    }

    if !metadata.contains("summary") {
        metadata.insert("summary", json!("No summary generated"));
    }
    if !metadata.contains("processing_version") {
        metadata.insert("processing_version", json!(config.processing_version));
    }
    if !metadata.contains("original_length") {
        metadata.insert("original_length", json!(original_body.len()));
    }
    metadata
}
