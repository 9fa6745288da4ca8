//! Offset translation through an applied batch.
//!
//! Given an original-space offset expressed against the text *after* the batch (for example a
//! caret position or linked-edit anchor reported by the producer of the batch), find the matching
//! converted-space offset in the edited buffer.

use crate::apply::AppliedEdits;
use crate::converter::OffsetConverter;
use crate::edit::EditRecord;
use crate::error::EditError;
use crate::line_ending::count_terminators;
use std::ops::Range;

/// Translate `target` through `records` (in application order) into converted space.
///
/// If `target` falls within some record's replacement text (ends included, the start wins a
/// tie), the answer is read off that record: its resulting converted offset plus the characters
/// consumed from the replacement, less one for every `"\r\n"` consumed.
///
/// Otherwise every edit at or before `target` is undone to find the offset in the pristine
/// original text, which goes through `converter`, and every edit is then redone in converted
/// lengths.
pub fn translate<C>(target: usize, records: &[EditRecord], converter: &C) -> Result<usize, EditError>
where
    C: OffsetConverter + ?Sized,
{
    if let Some(record) = records.iter().find(|record| record.contains_resulting(target)) {
        let consumed = target - record.resulting_original_offset();
        let consumed_text: String = record
            .original_replacement()
            .chars()
            .take(consumed)
            .collect();
        let terminators = count_terminators(&consumed_text);
        let translated = record.resulting_converted_offset() + consumed - terminators;
        tracing::debug!(target, translated, "translated offset inside edit");
        return Ok(translated);
    }

    let mut pristine = target as i64;
    for record in records.iter().rev() {
        if target >= record.original_offset() {
            pristine -= record.original_replacement_len() as i64;
            pristine += record.original_length() as i64;
        }
    }
    let pristine =
        usize::try_from(pristine).map_err(|_| EditError::NegativeOffset { offset: pristine })?;

    let mut translated = converter.convert(pristine)? as i64;
    for record in records {
        if translated >= record.converted_offset() as i64 {
            translated -= record.converted_length() as i64;
            translated += record.normalized_replacement_len() as i64;
        }
    }
    let translated =
        usize::try_from(translated).map_err(|_| EditError::NegativeOffset { offset: translated })?;

    tracing::debug!(target, pristine, translated, "translated offset outside edits");
    Ok(translated)
}

impl AppliedEdits {
    /// Translate an original-space offset into the edited buffer. See [`translate`].
    pub fn translate<C>(&self, target: usize, converter: &C) -> Result<usize, EditError>
    where
        C: OffsetConverter + ?Sized,
    {
        translate(target, &self.records, converter)
    }

    /// Translate both ends of an original-space range; the end never precedes the start.
    pub fn translate_range<C>(
        &self,
        range: Range<usize>,
        converter: &C,
    ) -> Result<Range<usize>, EditError>
    where
        C: OffsetConverter + ?Sized,
    {
        let start = self.translate(range.start, converter)?;
        let end = self.translate(range.end, converter)?;
        Ok(start..end.max(start))
    }
}
