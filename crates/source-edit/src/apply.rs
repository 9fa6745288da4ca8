//! Batch edit application.
//!
//! [`apply_edits`] applies one batch of original-space edits to a converted-space buffer, in the
//! order they were supplied, and returns the [`AppliedEdits`] store that later offset
//! translations run against.

use crate::buffer::TextBuffer;
use crate::converter::OffsetConverter;
use crate::edit::{EditRecord, SourceEdit};
use crate::error::EditError;
use crate::line_ending::normalize;
use std::collections::HashSet;
use std::ops::Range;

/// The edit records of one applied batch, in application order.
///
/// Records live in a flat vector; the retroactive shifting done while applying only ever touches
/// them by index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppliedEdits {
    pub(crate) records: Vec<EditRecord>,
}

impl AppliedEdits {
    /// All records, in the order their edits were applied.
    pub fn records(&self) -> &[EditRecord] {
        &self.records
    }

    /// Number of applied edits.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if no edit was applied.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

fn net_delta(inserted: usize, removed: usize) -> isize {
    inserted as isize - removed as isize
}

fn is_excluded(edit: &SourceEdit, excluded: &HashSet<String>) -> bool {
    edit.id.as_ref().is_some_and(|id| excluded.contains(id))
}

/// Apply `edits` to `buffer` in sequence order, skipping edits whose id is in `excluded`.
///
/// For each retained edit:
/// 1. its start and end are converted through `converter` (the converted length is the
///    difference of the two),
/// 2. its replacement is line-ending normalized,
/// 3. every previously recorded edit whose resulting original offset lies strictly after this
///    edit's original offset is shifted by this edit's net length change (in both spaces),
/// 4. the converted range is replaced, unless it already holds the normalized replacement,
/// 5. a record is appended.
///
/// Errors from the converter or the buffer stop the batch, as does a later edit deleting text
/// across the start of an earlier one ([`EditError::NegativeOffset`]). Edits applied before the failure
/// stay applied; use [`apply_edits_or_restore`] when the batch must be all-or-nothing.
pub fn apply_edits<B, C>(
    buffer: &mut B,
    edits: &[SourceEdit],
    excluded: &HashSet<String>,
    converter: &C,
) -> Result<AppliedEdits, EditError>
where
    B: TextBuffer + ?Sized,
    C: OffsetConverter + ?Sized,
{
    let mut applied = AppliedEdits::default();

    for edit in edits {
        if is_excluded(edit, excluded) {
            tracing::trace!(id = ?edit.id, offset = edit.offset, "skipping excluded edit");
            continue;
        }

        let converted_offset = converter.convert(edit.offset)?;
        let converted_end = converter.convert(edit.end())?;
        let converted_length =
            converted_end
                .checked_sub(converted_offset)
                .ok_or(EditError::InvalidRange {
                    start: converted_offset,
                    end: converted_end,
                    len: buffer.len_chars(),
                })?;
        let normalized = normalize(&edit.replacement).into_owned();

        let record = EditRecord::new(edit, converted_offset, converted_length, normalized);
        let original_delta = net_delta(record.original_replacement_len(), edit.length);
        let converted_delta = net_delta(record.normalized_replacement_len(), converted_length);

        for earlier in applied.records.iter_mut() {
            if earlier.resulting_original_offset() > edit.offset {
                earlier.shift(original_delta, converted_delta)?;
            }
        }

        let range: Range<usize> = converted_offset..converted_end;
        if buffer.range_eq(range.clone(), record.normalized_replacement())? {
            tracing::trace!(
                offset = edit.offset,
                converted_offset,
                "edit matches buffer content, not replacing"
            );
        } else {
            tracing::trace!(
                offset = edit.offset,
                length = edit.length,
                converted_offset,
                converted_length,
                "applying edit"
            );
            buffer.replace_range(range, record.normalized_replacement())?;
        }
        applied.records.push(record);
    }

    tracing::debug!(
        supplied = edits.len(),
        applied = applied.len(),
        "applied edit batch"
    );
    Ok(applied)
}

/// [`apply_edits`], restoring `buffer` to its pre-batch content if any edit fails.
pub fn apply_edits_or_restore<B, C>(
    buffer: &mut B,
    edits: &[SourceEdit],
    excluded: &HashSet<String>,
    converter: &C,
) -> Result<AppliedEdits, EditError>
where
    B: TextBuffer + Clone,
    C: OffsetConverter + ?Sized,
{
    let snapshot = buffer.clone();
    match apply_edits(buffer, edits, excluded, converter) {
        Ok(applied) => Ok(applied),
        Err(err) => {
            tracing::debug!(error = %err, "edit batch failed, restoring buffer");
            *buffer = snapshot;
            Err(err)
        }
    }
}
