//! # Lapidary Store
//!
//! [`LocalFileStore`]: the filesystem implementation of
//! [`FileStore`](lapidary_core::FileStore), rooted at a vault directory.
//! Listing honors the configured folder exclusions and filename patterns;
//! renames refuse to clobber, which is what the pipeline's Mark stage relies
//! on for cross-run exclusion.

mod local;

pub use local::{ListOptions, LocalFileStore};
