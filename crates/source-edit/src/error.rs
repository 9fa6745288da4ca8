use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
/// Errors produced while applying a batch of edits or translating offsets through it.
pub enum EditError {
    #[error("invalid offset {offset} (text length {len})")]
    /// A coordinate converter was asked to convert an offset past the end of its text.
    InvalidOffset {
        /// The offending offset.
        offset: usize,
        /// Length of the text the converter describes.
        len: usize,
    },

    #[error("offset {offset} lies before the start of the text")]
    /// Undoing a batch's edits moved a translated offset before the start of the text.
    NegativeOffset {
        /// The offset reached.
        offset: i64,
    },

    #[error("invalid range {start}..{end} (buffer length {len})")]
    /// A buffer range was reversed or reached past the end of the buffer.
    InvalidRange {
        /// Inclusive start character offset.
        start: usize,
        /// Exclusive end character offset.
        end: usize,
        /// Buffer length in characters.
        len: usize,
    },
}
