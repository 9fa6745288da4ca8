//! Mutable text buffers edited in converted space.
//!
//! All ranges are half-open character offsets (Unicode scalar values).

use crate::error::EditError;
use ropey::Rope;
use std::ops::Range;

/// A text buffer the batch applicator can read, compare and replace ranges of.
pub trait TextBuffer {
    /// Buffer length in characters.
    fn len_chars(&self) -> usize;

    /// Copy the text in `range`.
    fn read_range(&self, range: Range<usize>) -> Result<String, EditError>;

    /// Whether the text in `range` equals `text`.
    fn range_eq(&self, range: Range<usize>, text: &str) -> Result<bool, EditError> {
        Ok(self.read_range(range)? == text)
    }

    /// Replace the text in `range` with `text`.
    fn replace_range(&mut self, range: Range<usize>, text: &str) -> Result<(), EditError>;
}

pub(crate) fn check_range(range: &Range<usize>, len: usize) -> Result<(), EditError> {
    if range.start > range.end || range.end > len {
        return Err(EditError::InvalidRange {
            start: range.start,
            end: range.end,
            len,
        });
    }
    Ok(())
}

fn char_to_byte(text: &str, char_offset: usize) -> usize {
    text.char_indices()
        .nth(char_offset)
        .map(|(byte, _)| byte)
        .unwrap_or(text.len())
}

fn byte_range(text: &str, range: Range<usize>) -> Result<Range<usize>, EditError> {
    check_range(&range, text.chars().count())?;
    let start = char_to_byte(text, range.start);
    let end = start + char_to_byte(&text[start..], range.end - range.start);
    Ok(start..end)
}

impl TextBuffer for String {
    fn len_chars(&self) -> usize {
        self.chars().count()
    }

    fn read_range(&self, range: Range<usize>) -> Result<String, EditError> {
        let bytes = byte_range(self, range)?;
        Ok(self[bytes].to_string())
    }

    fn range_eq(&self, range: Range<usize>, text: &str) -> Result<bool, EditError> {
        let bytes = byte_range(self, range)?;
        Ok(&self[bytes] == text)
    }

    fn replace_range(&mut self, range: Range<usize>, text: &str) -> Result<(), EditError> {
        let bytes = byte_range(self, range)?;
        String::replace_range(self, bytes, text);
        Ok(())
    }
}

impl TextBuffer for Rope {
    fn len_chars(&self) -> usize {
        Rope::len_chars(self)
    }

    fn read_range(&self, range: Range<usize>) -> Result<String, EditError> {
        check_range(&range, Rope::len_chars(self))?;
        Ok(self.slice(range).to_string())
    }

    fn range_eq(&self, range: Range<usize>, text: &str) -> Result<bool, EditError> {
        check_range(&range, Rope::len_chars(self))?;
        Ok(self.slice(range) == text)
    }

    fn replace_range(&mut self, range: Range<usize>, text: &str) -> Result<(), EditError> {
        check_range(&range, Rope::len_chars(self))?;
        let start = range.start;
        if range.start < range.end {
            self.remove(range);
        }
        if !text.is_empty() {
            self.insert(start, text);
        }
        Ok(())
    }
}
