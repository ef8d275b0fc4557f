//! Error types for mapping commands.

use thiserror::Error;

use fieldmap_document::DocumentError;

fn side_name(is_source: &bool) -> &'static str {
    if *is_source {
        "source"
    } else {
        "target"
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SelectionError {
    #[error("no {} document is loaded", side_name(.0))]
    DocumentNotLoaded(bool),

    #[error("field not found: {0}")]
    NotFound(String),

    #[error("field '{0}' is not terminal and cannot join a mapping")]
    NotTerminal(String),

    /// The one user-visible rejection: the field is excluded under the
    /// current collection mode and the reason says why.
    #[error("field '{display_name}' cannot be selected, {reason}")]
    NotAvailable { display_name: String, reason: String },

    #[error(transparent)]
    Document(#[from] DocumentError),
}
