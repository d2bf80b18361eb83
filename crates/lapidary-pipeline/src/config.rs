//! Processing policy, injected by the caller. The CLI builds these from its
//! TOML configuration; tests build them directly.

/// Per-note policy: what gets processed and how results are stamped.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Largest raw document accepted, in kilobytes.
    pub max_note_size_kb: u64,
    /// Extension allow-list, lowercase without the dot. Empty means no
    /// allow-list: every extension passes.
    pub allowed_extensions: Vec<String>,
    /// Skip notes whose stamped `note_hash` still matches the body.
    pub skip_unchanged: bool,
    /// Version stamp written into the frontmatter of processed notes.
    pub processing_version: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_note_size_kb: 10_000,
            allowed_extensions: ["md", "txt", "org", "rst", "markdown"]
                .map(String::from)
                .to_vec(),
            skip_unchanged: true,
            processing_version: "1.0".to_string(),
        }
    }
}

/// Shape of one batch run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Folder scanned for candidates, relative to the store root.
    pub inbox: String,
    /// Recurse into subfolders of the inbox.
    pub recursive: bool,
    /// Hard cap on notes attempted per run. Candidates beyond it wait for
    /// the next run.
    pub max_notes_per_run: usize,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            inbox: "0-QuickNotes".to_string(),
            recursive: true,
            max_notes_per_run: 10,
        }
    }
}
