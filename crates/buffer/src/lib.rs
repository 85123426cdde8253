// Chunk: docs/chunks/line_buffer - Line storage with edit notifications
// Chunk: docs/chunks/line_source - LineSource trait and renderer-facing color types

//! linelabel-buffer: line storage and renderer types for the linelabel engine.
//!
//! The labeling engine reads text one line at a time and reports colors per
//! character. This crate holds the pieces it shares with its host editor.
//!
//! # Overview
//!
//! - [`LineSource`]: read-only access to lines, implemented by any buffer
//! - [`LineBuffer`]: a simple line store that records [`LineEdit`]s
//! - [`Color`], [`Span`], [`StyledLine`]: what the renderer draws
//!
//! # Example
//!
//! ```
//! use linelabel_buffer::{LineBuffer, LineEdit, LineSource, Position};
//!
//! let mut buffer = LineBuffer::from_str("let a = 1;");
//! buffer.insert_text(Position::new(0, 10), "\nlet b = 2;");
//! assert_eq!(buffer.line_count(), 2);
//! assert_eq!(
//!     buffer.take_edits(),
//!     vec![LineEdit::Changed(0), LineEdit::Inserted { at: 1, count: 1 }]
//! );
//! ```
//!
//! # Edit Notifications
//!
//! Every mutation of a [`LineBuffer`] appends a [`LineEdit`]:
//!
//! - `LineEdit::Changed(line)` - the text of one line changed
//! - `LineEdit::Inserted { at, count }` - lines were inserted at `at`
//! - `LineEdit::Removed { at, count }` - lines starting at `at` were removed

mod buffer_view;
mod line_buffer;
mod types;

pub use buffer_view::{Color, LineSource, ParseColorError, Span, StyledLine};
pub use line_buffer::LineBuffer;
pub use types::{LineEdit, Position};
