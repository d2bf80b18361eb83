//! Vault-rooted local file store.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use async_trait::async_trait;
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

use lapidary_core::traits::{FileStore, StoreError, StoreResult};
use lapidary_core::NoteRef;

/// Listing behavior for a vault.
#[derive(Debug, Clone, Default)]
pub struct ListOptions {
    /// Directory names skipped during the walk (matched by name at any
    /// depth, e.g. `.obsidian`, `.git`).
    pub exclude_folders: Vec<String>,
    /// Filename globs a listed file must match, e.g. `*.md`. Empty means
    /// every file matches.
    pub file_patterns: Vec<String>,
}

/// [`FileStore`] over a local vault directory.
///
/// All [`NoteRef`] paths are relative to the vault root. Listing walks the
/// tree on a blocking task, applies [`ListOptions`], and returns newest
/// modification first with a stable path tiebreak, so repeated runs see
/// candidates in a consistent order.
#[derive(Debug)]
pub struct LocalFileStore {
    root: PathBuf,
    exclude_folders: Vec<String>,
    patterns: GlobSet,
}

impl LocalFileStore {
    /// Open a vault. Fails if the root does not exist, is not a directory,
    /// or a file pattern does not compile.
    pub fn new(root: impl Into<PathBuf>, options: ListOptions) -> StoreResult<Self> {
        let root = root.into();
        if !root.is_dir() {
            return Err(StoreError::NotFound(format!(
                "vault root {} is not a directory",
                root.display()
            )));
        }

        let mut builder = GlobSetBuilder::new();
        for pattern in &options.file_patterns {
            let glob = GlobBuilder::new(pattern)
                .case_insensitive(true)
                .build()
                .map_err(|err| StoreError::Io(format!("file pattern {pattern:?}: {err}")))?;
            builder.add(glob);
        }
        let patterns = builder
            .build()
            .map_err(|err| StoreError::Io(format!("file patterns: {err}")))?;

        debug!(root = %root.display(), "opened vault");
        Ok(Self {
            root,
            exclude_folders: options.exclude_folders,
            patterns,
        })
    }

    /// Vault root this store is bound to.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn absolute(&self, note: &NoteRef) -> PathBuf {
        self.root.join(note.path())
    }
}

#[async_trait]
impl FileStore for LocalFileStore {
    async fn list(&self, dir: &str, recursive: bool) -> StoreResult<Vec<NoteRef>> {
        let base = if dir.is_empty() {
            self.root.clone()
        } else {
            self.root.join(dir)
        };
        let root = self.root.clone();
        let excludes = self.exclude_folders.clone();
        let patterns = self.patterns.clone();

        // walkdir is synchronous; keep it off the async workers.
        tokio::task::spawn_blocking(move || walk_vault(&root, &base, recursive, &excludes, &patterns))
            .await
            .map_err(|err| StoreError::Io(format!("listing task failed: {err}")))?
    }

    async fn read(&self, note: &NoteRef) -> StoreResult<String> {
        let path = self.absolute(note);
        tokio::fs::read_to_string(&path)
            .await
            .map_err(|err| StoreError::from_io(err, note))
    }

    async fn write(&self, note: &NoteRef, text: &str) -> StoreResult<()> {
        let path = self.absolute(note);
        tokio::fs::write(&path, text)
            .await
            .map_err(|err| StoreError::from_io(err, note))
    }

    /// Rename within the note's directory. The underlying `rename(2)` is
    /// atomic on the source: of two racing callers, exactly one succeeds and
    /// the other observes `NotFound`. An existing target is refused up front
    /// rather than clobbered.
    async fn rename(&self, note: &NoteRef, new_name: &str) -> StoreResult<NoteRef> {
        let parent = note.path().parent().unwrap_or_else(|| Path::new(""));
        let new_ref = NoteRef::new(parent.join(new_name));

        let old_path = self.absolute(note);
        let new_path = self.absolute(&new_ref);
        if tokio::fs::try_exists(&new_path).await.unwrap_or(false) {
            return Err(StoreError::AlreadyExists(new_ref.to_string()));
        }

        tokio::fs::rename(&old_path, &new_path)
            .await
            .map_err(|err| StoreError::from_io(err, note))?;
        debug!(from = %note, to = %new_ref, "renamed note");
        Ok(new_ref)
    }
}

fn walk_vault(
    root: &Path,
    base: &Path,
    recursive: bool,
    excludes: &[String],
    patterns: &GlobSet,
) -> StoreResult<Vec<NoteRef>> {
    if !base.is_dir() {
        return Err(StoreError::NotFound(format!(
            "inbox {} is not a directory",
            base.display()
        )));
    }

    let mut walker = WalkDir::new(base).follow_links(false);
    if !recursive {
        walker = walker.max_depth(1);
    }

    let mut entries: Vec<(SystemTime, PathBuf)> = Vec::new();
    for entry in walker
        .into_iter()
        .filter_entry(|entry| !is_excluded_dir(entry, excludes))
    {
        let entry = match entry {
            Ok(entry) => entry,
            // A single unreadable subtree should not abort the run.
            Err(err) => {
                warn!(error = %err, "skipping unreadable entry");
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        if !patterns.is_empty() && !patterns.is_match(entry.file_name()) {
            continue;
        }

        let modified = entry
            .metadata()
            .ok()
            .and_then(|meta| meta.modified().ok())
            .unwrap_or(SystemTime::UNIX_EPOCH);
        let relative = entry
            .path()
            .strip_prefix(root)
            .unwrap_or(entry.path())
            .to_path_buf();
        entries.push((modified, relative));
    }

    // Newest first; path breaks ties so the order is stable across runs.
    entries.sort_by(|(time_a, path_a), (time_b, path_b)| {
        time_b.cmp(time_a).then_with(|| path_a.cmp(path_b))
    });

    Ok(entries
        .into_iter()
        .map(|(_, path)| NoteRef::new(path))
        .collect())
}

fn is_excluded_dir(entry: &DirEntry, excludes: &[String]) -> bool {
    entry.depth() > 0
        && entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| excludes.iter().any(|excluded| excluded == name))
}
