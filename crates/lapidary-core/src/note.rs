//! Note identity and document model.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::frontmatter::{self, Frontmatter};

/// Filename prefix that marks a note as claimed or completed by the
/// pipeline. A note carrying it is never selected for processing again.
pub const IN_PROGRESS_PREFIX: char = '_';

/// Reference to a note inside a [`FileStore`](crate::FileStore), relative to
/// the store root.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NoteRef {
    path: PathBuf,
}

impl NoteRef {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Final path component; empty for pathological refs.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Lowercased extension without the dot.
    pub fn extension(&self) -> Option<String> {
        self.path
            .extension()
            .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
    }

    /// Whether the filename carries [`IN_PROGRESS_PREFIX`].
    pub fn is_marked(&self) -> bool {
        self.file_name().starts_with(IN_PROGRESS_PREFIX)
    }

    /// Filename this note gets when the pipeline claims it.
    pub fn marked_name(&self) -> String {
        format!("{}{}", IN_PROGRESS_PREFIX, self.file_name())
    }
}

impl fmt::Display for NoteRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path.display())
    }
}

/// A discovered note split into frontmatter and body.
///
/// Construction is lenient: a malformed frontmatter block is treated as body
/// text so user-authored files never block a run. The body never contains
/// the delimiter block.
#[derive(Debug, Clone)]
pub struct Note {
    reference: NoteRef,
    frontmatter: Frontmatter,
    body: String,
}

impl Note {
    pub fn from_raw(reference: NoteRef, raw: &str) -> Self {
        let (frontmatter, body) = frontmatter::parse_lenient(raw);
        Self {
            reference,
            frontmatter,
            body: body.to_string(),
        }
    }

    pub fn reference(&self) -> &NoteRef {
        &self.reference
    }

    pub fn frontmatter(&self) -> &Frontmatter {
        &self.frontmatter
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn is_marked(&self) -> bool {
        self.reference.is_marked()
    }
}
