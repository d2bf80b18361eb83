//! Collaborator traits for dependency injection.
//!
//! The pipeline depends on these abstractions instead of concrete
//! filesystem or HTTP code, so every layer above can be tested with
//! in-memory fakes:
//!
//! - [`FileStore`]: list/read/write/rename over a note vault
//! - [`LanguageModelClient`]: one prompt round-trip to a provider

pub mod model;
pub mod store;

pub use model::{LanguageModelClient, ModelError, ModelResult};
pub use store::{FileStore, StoreError, StoreResult};
