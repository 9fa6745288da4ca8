#![warn(missing_docs)]
//! `source-edit-change` - applying analysis-service source changes to open documents.
//!
//! This crate is the host side of `source-edit`: it keeps the open documents of an editor
//! session, decodes multi-file [`SourceChange`]s, runs each file's batch through
//! [`source_edit::apply_edits`] with a line-ending offset table as converter, and translates
//! the change's caret and linked-edit positions into the edited documents.
//!
//! ```rust
//! use source_edit_change::{ChangeOptions, SourceChange, Workspace};
//!
//! let mut workspace = Workspace::new();
//! let id = workspace.open_document("/lib/main.dart", "var hello = 1;\r\nprint(hello);\r\n").unwrap();
//!
//! let change = SourceChange::from_json(r#"{
//!     "message": "Rename variable",
//!     "edits": [{ "file": "/lib/main.dart", "fileStamp": 1, "edits": [
//!         { "offset": 22, "length": 5, "replacement": "world" },
//!         { "offset": 4, "length": 5, "replacement": "world" }
//!     ]}],
//!     "selection": { "file": "/lib/main.dart", "offset": 9 }
//! }"#).unwrap();
//!
//! let outcome = workspace.apply_source_change(&change, &ChangeOptions::default()).unwrap();
//! assert_eq!(workspace.document_text(id).unwrap(), "var world = 1;\nprint(world);\n");
//! assert_eq!(outcome.selection.unwrap().offset, 9);
//! ```

pub mod change;
mod error;
pub mod workspace;

pub use change::{
    LinkedEditGroup, LinkedEditSuggestion, NEW_FILE_STAMP, Position, SourceChange, SourceFileEdit,
};
pub use error::ChangeError;
pub use workspace::{
    AppliedDocument, ChangeOptions, ChangeOutcome, DocumentId, ResolvedLinkedEditGroup,
    ResolvedPosition, Workspace,
};
