//! # Lapidary Core
//!
//! Domain types, collaborator traits, and the pure building blocks of the
//! note-enhancement pipeline: content hashing, the frontmatter codec, and
//! response validation.
//!
//! Higher layers inject implementations of [`FileStore`] and
//! [`LanguageModelClient`]; nothing in this crate touches the filesystem or
//! the network.

pub mod frontmatter;
pub mod hashing;
pub mod note;
pub mod outcome;
pub mod prompt;
pub mod response;
pub mod traits;

pub use frontmatter::{Frontmatter, ParseError};
pub use note::{Note, NoteRef, IN_PROGRESS_PREFIX};
pub use outcome::{FailureReason, ProcessingResult, SkipReason};
pub use response::{EnhancementResponse, ValidationError};
pub use traits::{
    FileStore, LanguageModelClient, ModelError, ModelResult, StoreError, StoreResult,
};
