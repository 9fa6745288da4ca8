//! Coordinate conversion between the producer's text and the in-memory buffer.
//!
//! Edit producers report offsets in **original space**: character offsets into the text as they
//! read it, which may contain CRLF line breaks. Buffers are edited in **converted space**:
//! character offsets into the LF-normalized in-memory text.
//!
//! The engine never indexes line endings itself; every original offset it needs in converted
//! space goes through an [`OffsetConverter`] supplied by the host.

use crate::error::EditError;

/// Maps a single original-space offset to its converted-space offset.
///
/// Implementations must fail with [`EditError::InvalidOffset`] for offsets past the end of the
/// original text. Any `Fn(usize) -> Result<usize, EditError>` is a converter.
pub trait OffsetConverter {
    /// Convert `original` into converted space.
    fn convert(&self, original: usize) -> Result<usize, EditError>;
}

impl<F> OffsetConverter for F
where
    F: Fn(usize) -> Result<usize, EditError>,
{
    fn convert(&self, original: usize) -> Result<usize, EditError> {
        self(original)
    }
}

/// Converter for texts whose two spaces coincide (no CRLF in the producer's text).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdentityConverter {
    len: usize,
}

impl IdentityConverter {
    /// Identity mapping over `0..=len`.
    pub fn new(len: usize) -> Self {
        Self { len }
    }

    /// Identity mapping over the whole of `text`.
    pub fn for_text(text: &str) -> Self {
        Self::new(text.chars().count())
    }
}

impl OffsetConverter for IdentityConverter {
    fn convert(&self, original: usize) -> Result<usize, EditError> {
        if original > self.len {
            return Err(EditError::InvalidOffset {
                offset: original,
                len: self.len,
            });
        }
        Ok(original)
    }
}

/// Line-ending offset table for one producer text.
///
/// Records where every `"\r\n"` pair sits so offsets can be mapped in both directions:
///
/// - original -> converted: subtract the pairs whose `'\r'` lies strictly before the offset.
///   An offset between `'\r'` and `'\n'` lands on the converted `'\n'`.
/// - converted -> original: add the pairs whose converted `'\n'` lies strictly before the
///   offset. An offset at a converted line break lands on the original `'\r'`.
///
/// The table describes the text it was built from. Batches emitted in descending offset order
/// (the usual producer order) only ever convert offsets in front of already-applied edits, so the
/// table stays valid for the whole batch; rebuild it once the batch has been applied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineEndingOffsets {
    /// Original offset of the `'\r'` of each pair, ascending.
    crlf_starts: Vec<usize>,
    /// Converted offset of the `'\n'` of each pair, ascending.
    converted_breaks: Vec<usize>,
    original_len: usize,
}

impl LineEndingOffsets {
    /// Build the table from the producer's text.
    pub fn from_original(text: &str) -> Self {
        let mut crlf_starts = Vec::new();
        let mut prev_cr = false;
        let mut original_len = 0;

        for (idx, ch) in text.chars().enumerate() {
            if ch == '\n' && prev_cr {
                crlf_starts.push(idx - 1);
            }
            prev_cr = ch == '\r';
            original_len = idx + 1;
        }

        let converted_breaks = crlf_starts
            .iter()
            .enumerate()
            .map(|(k, start)| start - k)
            .collect();

        Self {
            crlf_starts,
            converted_breaks,
            original_len,
        }
    }

    /// Length of the producer's text in characters.
    pub fn original_len(&self) -> usize {
        self.original_len
    }

    /// Length of the normalized text in characters.
    pub fn converted_len(&self) -> usize {
        self.original_len - self.crlf_starts.len()
    }

    /// Number of `"\r\n"` pairs in the producer's text.
    pub fn terminator_count(&self) -> usize {
        self.crlf_starts.len()
    }

    /// Map an original-space offset into converted space.
    pub fn to_converted(&self, original: usize) -> Result<usize, EditError> {
        if original > self.original_len {
            return Err(EditError::InvalidOffset {
                offset: original,
                len: self.original_len,
            });
        }
        let before = self.crlf_starts.partition_point(|&start| start < original);
        Ok(original - before)
    }

    /// Map a converted-space offset back into original space.
    pub fn to_original(&self, converted: usize) -> Result<usize, EditError> {
        let len = self.converted_len();
        if converted > len {
            return Err(EditError::InvalidOffset {
                offset: converted,
                len,
            });
        }
        let before = self
            .converted_breaks
            .partition_point(|&line_break| line_break < converted);
        Ok(converted + before)
    }
}

impl OffsetConverter for LineEndingOffsets {
    fn convert(&self, original: usize) -> Result<usize, EditError> {
        self.to_converted(original)
    }
}
