//! `lap inspect` — show how the pipeline sees one note.

use std::path::PathBuf;

use anyhow::{Context, Result};

use lapidary_core::{hashing, FileStore, Note, NoteRef};
use lapidary_pipeline::{filter_verdict, size_verdict};
use lapidary_store::LocalFileStore;

use crate::config::LapidaryConfig;

/// Print one note's parsed frontmatter, body fingerprint, size, and the
/// verdict the next run would give it.
pub async fn execute(config: LapidaryConfig, file: PathBuf) -> Result<()> {
    config.validate()?;

    let vault_root = config.vault_root()?;
    let store = LocalFileStore::new(vault_root, config.list_options())
        .with_context(|| format!("cannot open vault {}", vault_root.display()))?;

    let reference = NoteRef::new(file);
    let raw = store
        .read(&reference)
        .await
        .with_context(|| format!("cannot read {reference}"))?;
    let note = Note::from_raw(reference.clone(), &raw);

    println!("note: {reference}");
    println!("size: {} bytes", raw.len());
    println!("body hash: {}", hashing::hash_body(note.body()));

    if note.frontmatter().is_empty() {
        println!("frontmatter: (none)");
    } else {
        println!("frontmatter:");
        for (key, value) in note.frontmatter().iter() {
            match value.as_str() {
                Some(text) => println!("  {key}: {text}"),
                None => println!("  {key}: {value}"),
            }
        }
    }

    let pipeline_config = config.pipeline_config();
    let verdict = filter_verdict(&note, &pipeline_config)
        .or_else(|| size_verdict(raw.len(), &pipeline_config));
    match verdict {
        Some(reason) => println!("next run: skip ({reason})"),
        None => println!("next run: process"),
    }

    Ok(())
}
