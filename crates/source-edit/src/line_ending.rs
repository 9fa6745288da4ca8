//! Line ending helpers.
//!
//! Edit producers measure offsets against text that may use CRLF (`"\r\n"`) line breaks,
//! while the in-memory buffers edited by this crate store LF (`'\n'`) only. The helpers here
//! normalize replacement text into the buffer's convention and count the two-character
//! terminators that make raw character counts diverge between the two spaces.

use std::borrow::Cow;

/// The producer's two-character line terminator.
pub const CRLF: &str = "\r\n";

/// The preferred newline sequence of a document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LineEnding {
    /// Unix-style LF (`'\n'`).
    #[default]
    Lf,
    /// Windows-style CRLF (`"\r\n"`).
    Crlf,
}

impl LineEnding {
    /// Detect the dominant line ending from a source text.
    ///
    /// Policy: if the input contains any CRLF (`"\r\n"`), returns [`LineEnding::Crlf`],
    /// otherwise [`LineEnding::Lf`].
    pub fn detect_in_text(text: &str) -> Self {
        if text.contains(CRLF) {
            Self::Crlf
        } else {
            Self::Lf
        }
    }

    /// Convert an LF-normalized text to this line ending for saving.
    pub fn apply_to_text(self, text: &str) -> String {
        match self {
            Self::Lf => text.to_string(),
            Self::Crlf => text.replace('\n', self.as_str()),
        }
    }

    /// The newline sequence itself.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Lf => "\n",
            Self::Crlf => CRLF,
        }
    }
}

/// Collapse every `"\r\n"` in `text` to `'\n'`.
///
/// Lone `'\r'` characters are left untouched. Borrows when there is nothing to collapse.
pub fn normalize(text: &str) -> Cow<'_, str> {
    if text.contains(CRLF) {
        Cow::Owned(text.replace(CRLF, "\n"))
    } else {
        Cow::Borrowed(text)
    }
}

/// Count the `"\r\n"` terminators in `text`.
pub fn count_terminators(text: &str) -> usize {
    text.matches(CRLF).count()
}
