//! Error types for the document model.

use thiserror::Error;

pub type DocumentResult<T> = Result<T, DocumentError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DocumentError {
    /// A path lookup walked through an ancestor the index does not know.
    /// The schema and the requested path disagree; this is caller or data
    /// corruption, not a missing leaf.
    #[error("cannot resolve ancestor '{prefix}' of field path '{path}'")]
    UnresolvablePrefix { prefix: String, path: String },

    /// `populate_from_fields` ran twice on the same document.
    #[error("document '{0}' has already been populated")]
    AlreadyPopulated(String),
}
