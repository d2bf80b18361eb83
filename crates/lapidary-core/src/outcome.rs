//! Per-note outcomes and the skip/failure taxonomy.
//!
//! Skips are expected and harmless; failures are per-note faults that never
//! abort a run. Run-level faults live in the pipeline crate, not here.

use crate::note::NoteRef;
use crate::response::ValidationError;
use crate::traits::{ModelError, StoreError};

/// Outcome of one pipeline pass over one note. Reported, never persisted.
#[derive(Debug)]
pub enum ProcessingResult {
    /// Enhanced and written back under its marked name.
    Processed { note: NoteRef },
    /// Intentionally left alone.
    Skipped(SkipReason),
    /// Could not be processed. If the failure happened after marking, the
    /// note stays marked for operator inspection — never silently unmarked.
    Failed(FailureReason),
}

impl ProcessingResult {
    pub fn is_processed(&self) -> bool {
        matches!(self, ProcessingResult::Processed { .. })
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, ProcessingResult::Skipped(_))
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, ProcessingResult::Failed(_))
    }
}

/// Why a note was left alone. Expected, recoverable-by-user conditions.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SkipReason {
    /// Filename already carries the in-progress prefix.
    #[error("already_processed")]
    AlreadyProcessed,
    /// Frontmatter carries `ignoreParse: true`.
    #[error("ignore_flagged")]
    IgnoreFlagged,
    /// Extension is not in the configured allow-list.
    #[error("wrong_extension")]
    WrongExtension,
    /// File exceeds the configured size limit.
    #[error("too_large ({size_kb} KB > {limit_kb} KB)")]
    TooLarge { size_kb: u64, limit_kb: u64 },
    /// Stamped `note_hash` matches a fresh hash of the current body.
    #[error("unchanged")]
    Unchanged,
}

/// Why a note could not be processed. Display strings keep grep-friendly
/// tokens, so `llm_error:` in a log always means the same stage.
#[derive(Debug, thiserror::Error)]
pub enum FailureReason {
    #[error("read_failed: {0}")]
    ReadFailed(#[source] StoreError),
    #[error("mark_failed: {0}")]
    MarkFailed(#[source] StoreError),
    #[error("llm_error: {0}")]
    LlmError(#[source] ModelError),
    #[error("invalid_response: {0}")]
    InvalidResponse(#[source] ValidationError),
    #[error("persist_failed: {0}")]
    PersistFailed(#[source] StoreError),
}
