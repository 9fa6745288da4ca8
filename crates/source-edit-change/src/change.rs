//! Multi-file source changes as delivered by an analysis service.
//!
//! The model mirrors the service's JSON (camelCase) closely enough to deserialize it directly:
//!
//! ```json
//! {
//!   "message": "Rename local variable",
//!   "edits": [
//!     { "file": "/project/lib/main.dart", "fileStamp": 12,
//!       "edits": [ { "offset": 6, "length": 5, "replacement": "earth" } ] }
//!   ],
//!   "linkedEditGroups": [
//!     { "positions": [ { "file": "/project/lib/main.dart", "offset": 6 } ], "length": 5,
//!       "suggestions": [] }
//!   ],
//!   "selection": { "file": "/project/lib/main.dart", "offset": 11 }
//! }
//! ```

use crate::error::ChangeError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use source_edit::SourceEdit;

/// `fileStamp` value announcing a file that does not exist yet.
pub const NEW_FILE_STAMP: i64 = -1;

/// A set of edits across one or more files, plus follow-up UI positions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceChange {
    /// Human readable description of the change.
    #[serde(default)]
    pub message: String,
    /// Per-file edit batches.
    #[serde(default)]
    pub edits: Vec<SourceFileEdit>,
    /// Regions to be edited together after the change is applied.
    #[serde(default)]
    pub linked_edit_groups: Vec<LinkedEditGroup>,
    /// Where the caret goes once the change is applied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selection: Option<Position>,
    /// Optional change id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl SourceChange {
    /// Parse a change from its JSON text.
    pub fn from_json(json: &str) -> Result<Self, ChangeError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parse a change from an already decoded JSON value.
    pub fn from_value(value: Value) -> Result<Self, ChangeError> {
        Ok(serde_json::from_value(value)?)
    }

    /// Returns `true` if the change carries no edits at all.
    pub fn is_empty(&self) -> bool {
        self.edits.iter().all(|file_edit| file_edit.edits.is_empty())
    }

    /// Total number of edits across all files.
    pub fn edit_count(&self) -> usize {
        self.edits.iter().map(|file_edit| file_edit.edits.len()).sum()
    }
}

/// The edit batch for one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceFileEdit {
    /// File path as the service knows it.
    pub file: String,
    /// Modification stamp the edits were computed against; [`NEW_FILE_STAMP`] for new files.
    #[serde(default)]
    pub file_stamp: i64,
    /// Edits in application order.
    #[serde(default)]
    pub edits: Vec<SourceEdit>,
}

impl SourceFileEdit {
    /// Whether this batch creates its file.
    pub fn creates_file(&self) -> bool {
        self.file_stamp == NEW_FILE_STAMP
    }
}

/// A group of regions that should be edited in lockstep.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkedEditGroup {
    /// Start of each region, in original space of the changed file.
    #[serde(default)]
    pub positions: Vec<Position>,
    /// Length shared by every region, in original space.
    #[serde(default)]
    pub length: usize,
    /// Values offered for the regions.
    #[serde(default)]
    pub suggestions: Vec<LinkedEditSuggestion>,
}

/// A value offered for a linked edit group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkedEditSuggestion {
    /// The suggested text.
    pub value: String,
    /// Service-defined kind, e.g. `"TYPE"` or `"VARIABLE"`.
    #[serde(default)]
    pub kind: String,
}

/// An original-space offset in a file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    /// File path.
    pub file: String,
    /// Character offset in original space.
    pub offset: usize,
}

impl Position {
    /// Create a position.
    pub fn new(file: impl Into<String>, offset: usize) -> Self {
        Self {
            file: file.into(),
            offset,
        }
    }
}
