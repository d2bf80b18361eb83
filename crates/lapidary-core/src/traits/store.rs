//! File store abstraction over a note vault.

use async_trait::async_trait;

use crate::note::NoteRef;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Store operation errors. Kinds stay distinguishable so the pipeline can
/// tell an expected rename race (`AlreadyExists`) from a real fault.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("permission denied: {0}")]
    PermissionDenied(String),

    /// Rename target already exists. Surfacing this (instead of clobbering)
    /// is what makes Mark safe against racing runs.
    #[error("already exists: {0}")]
    AlreadyExists(String),

    #[error("io error: {0}")]
    Io(String),
}

impl StoreError {
    /// Map an [`std::io::Error`] onto the store taxonomy, keeping the
    /// offending path in the message.
    pub fn from_io(err: std::io::Error, path: impl std::fmt::Display) -> Self {
        use std::io::ErrorKind;
        match err.kind() {
            ErrorKind::NotFound => StoreError::NotFound(path.to_string()),
            ErrorKind::PermissionDenied => StoreError::PermissionDenied(path.to_string()),
            ErrorKind::AlreadyExists => StoreError::AlreadyExists(path.to_string()),
            _ => StoreError::Io(format!("{path}: {err}")),
        }
    }
}

/// Listing and mutation of notes in a vault.
///
/// Paths in [`NoteRef`] are relative to the store root. `rename` must be
/// atomic with respect to concurrent callers: two racing renames of the same
/// note must not both succeed.
#[async_trait]
pub trait FileStore: Send + Sync {
    /// List candidate notes under `dir` (relative to the root), optionally
    /// recursing into subdirectories. Ordering is the store's own stable
    /// policy and the coordinator preserves it.
    async fn list(&self, dir: &str, recursive: bool) -> StoreResult<Vec<NoteRef>>;

    /// Read a note's full text.
    async fn read(&self, note: &NoteRef) -> StoreResult<String>;

    /// Overwrite a note's content.
    async fn write(&self, note: &NoteRef, text: &str) -> StoreResult<()>;

    /// Rename a note within its directory, returning the new ref.
    ///
    /// Must refuse to clobber: an existing target surfaces
    /// [`StoreError::AlreadyExists`] rather than silently replacing it.
    async fn rename(&self, note: &NoteRef, new_name: &str) -> StoreResult<NoteRef>;
}
