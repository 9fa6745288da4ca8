#![warn(missing_docs)]
//! Source Edit - applying analysis-service edits to an in-memory document
//!
//! # Overview
//!
//! An external analysis or refactoring service hands out batches of textual replacements
//! ("edits") measured against its own view of a file, which may use CRLF line breaks. The
//! in-memory buffer being edited is LF-normalized. `source-edit` applies such a batch to the
//! buffer and afterwards translates other offsets from the same producer (a caret position, a
//! linked-edit anchor) into the edited buffer.
//!
//! # Coordinate Spaces
//!
//! ```text
//! original space   "a\r\nbc"   producer offsets, CRLF counted as two characters
//!                      │
//!            OffsetConverter   (host-supplied, pre-edit text)
//!                      ▼
//! converted space  "a\nbc"     buffer offsets, LF-normalized
//! ```
//!
//! All offsets are character offsets (Unicode scalar values).
//!
//! # Quick Start
//!
//! ```rust
//! use source_edit::{IdentityConverter, SourceEdit, apply_edits};
//! use std::collections::HashSet;
//!
//! let mut buffer = String::from("hello world");
//! let converter = IdentityConverter::for_text(&buffer);
//! let edits = vec![SourceEdit::new(6, 5, "earth").with_id("e1")];
//!
//! let applied = apply_edits(&mut buffer, &edits, &HashSet::new(), &converter).unwrap();
//! assert_eq!(buffer, "hello earth");
//! assert_eq!(applied.translate(11, &converter).unwrap(), 11);
//! ```
//!
//! # Module Description
//!
//! - [`line_ending`] - CRLF normalization and terminator counting
//! - [`converter`] - the [`OffsetConverter`] boundary and stock converters
//! - [`buffer`] - the [`TextBuffer`] abstraction (`String`, `ropey::Rope`)
//! - [`edit`] - [`SourceEdit`] input and [`EditRecord`] bookkeeping
//! - [`apply`] - batch application
//! - [`translate`] - offset translation through an applied batch
//!
//! # Failure Model
//!
//! Batches are applied edit by edit. When the converter or the buffer rejects an offset, the
//! error is returned and the buffer keeps the edits applied so far;
//! [`apply_edits_or_restore`] snapshots the buffer first and restores it on failure.

pub mod apply;
pub mod buffer;
pub mod converter;
pub mod edit;
mod error;
pub mod line_ending;
pub mod translate;

pub use apply::{AppliedEdits, apply_edits, apply_edits_or_restore};
pub use buffer::TextBuffer;
pub use converter::{IdentityConverter, LineEndingOffsets, OffsetConverter};
pub use edit::{EditRecord, SourceEdit};
pub use error::EditError;
pub use line_ending::{LineEnding, count_terminators, normalize};
pub use translate::translate;
