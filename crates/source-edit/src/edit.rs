//! Edit input and per-edit bookkeeping.

use crate::error::EditError;
use serde::{Deserialize, Serialize};

fn shifted(offset: usize, delta: isize) -> Result<usize, EditError> {
    offset
        .checked_add_signed(delta)
        .ok_or(EditError::NegativeOffset {
            offset: offset as i64 + delta as i64,
        })
}

/// A single replacement produced by an analysis service, in original space.
///
/// Wire shape (camelCase): `{ "offset": 6, "length": 5, "replacement": "earth", "id": "e1" }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceEdit {
    /// Start character offset in original space.
    pub offset: usize,
    /// Number of original characters replaced.
    pub length: usize,
    /// Replacement text, possibly containing CRLF line breaks.
    pub replacement: String,
    /// Optional id, used to exclude the edit from a batch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl SourceEdit {
    /// Create an edit without an id.
    pub fn new(offset: usize, length: usize, replacement: impl Into<String>) -> Self {
        Self {
            offset,
            length,
            replacement: replacement.into(),
            id: None,
        }
    }

    /// Attach an id to this edit.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Exclusive end offset in original space.
    pub fn end(&self) -> usize {
        self.offset.saturating_add(self.length)
    }
}

/// Bookkeeping for one applied edit.
///
/// The original and converted extents are fixed when the edit is applied. The two resulting
/// offsets track where the edit's replacement text begins in the current text and are shifted
/// each time a later edit of the same batch is applied in front of it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditRecord {
    original_offset: usize,
    original_length: usize,
    original_replacement: String,
    original_replacement_len: usize,
    converted_offset: usize,
    converted_length: usize,
    normalized_replacement: String,
    normalized_replacement_len: usize,
    resulting_original_offset: usize,
    resulting_converted_offset: usize,
}

impl EditRecord {
    pub(crate) fn new(
        edit: &SourceEdit,
        converted_offset: usize,
        converted_length: usize,
        normalized_replacement: String,
    ) -> Self {
        Self {
            original_offset: edit.offset,
            original_length: edit.length,
            original_replacement: edit.replacement.clone(),
            original_replacement_len: edit.replacement.chars().count(),
            converted_offset,
            converted_length,
            normalized_replacement_len: normalized_replacement.chars().count(),
            normalized_replacement,
            resulting_original_offset: edit.offset,
            resulting_converted_offset: converted_offset,
        }
    }

    /// Shift both resulting offsets by the net length change of a later edit.
    ///
    /// Fails with [`EditError::NegativeOffset`] when the later edit removed text reaching past
    /// this record's start, which only overlapping edits can do.
    pub(crate) fn shift(
        &mut self,
        original_delta: isize,
        converted_delta: isize,
    ) -> Result<(), EditError> {
        let original = shifted(self.resulting_original_offset, original_delta)?;
        let converted = shifted(self.resulting_converted_offset, converted_delta)?;
        self.resulting_original_offset = original;
        self.resulting_converted_offset = converted;
        Ok(())
    }

    /// Start offset as supplied, in original space.
    pub fn original_offset(&self) -> usize {
        self.original_offset
    }

    /// Replaced length as supplied, in original space.
    pub fn original_length(&self) -> usize {
        self.original_length
    }

    /// Replacement text as supplied.
    pub fn original_replacement(&self) -> &str {
        &self.original_replacement
    }

    /// Length of [`EditRecord::original_replacement`] in characters.
    pub fn original_replacement_len(&self) -> usize {
        self.original_replacement_len
    }

    /// Start offset in converted space at the time the edit was applied.
    pub fn converted_offset(&self) -> usize {
        self.converted_offset
    }

    /// Replaced length in converted space.
    pub fn converted_length(&self) -> usize {
        self.converted_length
    }

    /// Replacement text with line endings normalized; this is what the buffer received.
    pub fn normalized_replacement(&self) -> &str {
        &self.normalized_replacement
    }

    /// Length of [`EditRecord::normalized_replacement`] in characters.
    pub fn normalized_replacement_len(&self) -> usize {
        self.normalized_replacement_len
    }

    /// Where the replacement text currently begins, in original space.
    pub fn resulting_original_offset(&self) -> usize {
        self.resulting_original_offset
    }

    /// Where the replacement text currently begins, in converted space.
    pub fn resulting_converted_offset(&self) -> usize {
        self.resulting_converted_offset
    }

    /// Whether `target` (original space) falls within the current replacement text, ends
    /// included.
    pub fn contains_resulting(&self, target: usize) -> bool {
        target >= self.resulting_original_offset
            && target - self.resulting_original_offset <= self.original_replacement_len
    }
}
