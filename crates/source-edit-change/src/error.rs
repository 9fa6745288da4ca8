use crate::workspace::DocumentId;
use source_edit::EditError;
use thiserror::Error;

#[derive(Debug, Error)]
/// Errors produced while loading or applying a source change.
pub enum ChangeError {
    #[error("invalid source change JSON: {0}")]
    /// The change could not be decoded.
    Json(#[from] serde_json::Error),

    #[error("file is not open: {0}")]
    /// A file edit targets a path with no open document.
    MissingFile(String),

    #[error("file is already open: {0}")]
    /// A document is already open for this path.
    PathAlreadyOpen(String),

    #[error("document not found: {0:?}")]
    /// A document id was not found.
    DocumentNotFound(DocumentId),

    #[error("cannot apply edits to {path}: {source}")]
    /// The engine rejected an edit of one file.
    Edit {
        /// Path of the affected file.
        path: String,
        /// The underlying engine error.
        #[source]
        source: EditError,
    },
}
