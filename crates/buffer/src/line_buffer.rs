// Chunk: docs/chunks/line_buffer - Line storage with edit notifications

//! `LineBuffer` is a minimal line store standing in for an editor buffer.
//!
//! It keeps one `String` per line and records a [`LineEdit`] for every
//! mutation. The labeling engine drains those edits with
//! [`LineBuffer::take_edits`] to keep its per-line records aligned.

use crate::buffer_view::LineSource;
use crate::types::{LineEdit, Position};

/// A vector of lines with edit notifications.
///
/// The buffer always holds at least one line (possibly empty).
#[derive(Debug, Clone)]
pub struct LineBuffer {
    lines: Vec<String>,
    edits: Vec<LineEdit>,
}

/// Converts a character column into a byte index, clamping to the line end.
fn byte_index(text: &str, col: usize) -> usize {
    text.char_indices()
        .nth(col)
        .map(|(i, _)| i)
        .unwrap_or(text.len())
}

impl LineBuffer {
    /// Creates a buffer holding one empty line.
    pub fn new() -> Self {
        Self {
            lines: vec![String::new()],
            edits: Vec::new(),
        }
    }

    /// Creates a buffer from text, splitting on `\n`.
    ///
    /// A trailing newline produces a trailing empty line. No edits are
    /// recorded for the initial content.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Self {
        Self {
            lines: content.split('\n').map(str::to_string).collect(),
            edits: Vec::new(),
        }
    }

    /// Returns the number of lines.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Returns the text of a line.
    pub fn line(&self, line: usize) -> Option<&str> {
        self.lines.get(line).map(String::as_str)
    }

    /// Returns the number of characters in a line.
    pub fn line_len(&self, line: usize) -> usize {
        self.lines.get(line).map(|l| l.chars().count()).unwrap_or(0)
    }

    /// Returns true if the buffer holds a single empty line.
    pub fn is_empty(&self) -> bool {
        self.lines.len() == 1 && self.lines[0].is_empty()
    }

    /// Returns the whole content joined with `\n`.
    pub fn content(&self) -> String {
        self.lines.join("\n")
    }

    /// Replaces the text of a line.
    ///
    /// `text` must not contain newlines; use [`insert_text`](Self::insert_text)
    /// for multi-line input. Returns false if the line does not exist.
    pub fn set_line(&mut self, line: usize, text: &str) -> bool {
        match self.lines.get_mut(line) {
            Some(existing) => {
                if existing != text {
                    *existing = text.to_string();
                    self.edits.push(LineEdit::Changed(line));
                }
                true
            }
            None => false,
        }
    }

    /// Inserts a new line so that it ends up at index `at`.
    ///
    /// `at` is clamped to the line count (appending).
    pub fn insert_line(&mut self, at: usize, text: &str) {
        let at = at.min(self.lines.len());
        self.lines.insert(at, text.to_string());
        self.edits.push(LineEdit::Inserted { at, count: 1 });
    }

    /// Appends a line at the end of the buffer.
    pub fn push_line(&mut self, text: &str) {
        let at = self.lines.len();
        self.insert_line(at, text);
    }

    /// Removes a line and returns its text.
    ///
    /// Removing the only line clears it instead, so the buffer never becomes
    /// line-less.
    pub fn remove_line(&mut self, line: usize) -> Option<String> {
        if line >= self.lines.len() {
            return None;
        }
        if self.lines.len() == 1 {
            let old = std::mem::take(&mut self.lines[0]);
            if !old.is_empty() {
                self.edits.push(LineEdit::Changed(0));
            }
            return Some(old);
        }
        let old = self.lines.remove(line);
        self.edits.push(LineEdit::Removed { at: line, count: 1 });
        Some(old)
    }

    /// Inserts text at a position, splitting lines at each `\n`.
    ///
    /// The column is clamped to the line length. Returns the position just
    /// after the inserted text.
    pub fn insert_text(&mut self, pos: Position, text: &str) -> Position {
        let line = pos.line.min(self.lines.len() - 1);
        let current = &self.lines[line];
        let split_at = byte_index(current, pos.col);
        let tail = current[split_at..].to_string();
        let head = current[..split_at].to_string();

        let mut pieces = text.split('\n');
        // split always yields at least one piece
        let first = pieces.next().unwrap_or_default();
        let rest: Vec<&str> = pieces.collect();

        if rest.is_empty() {
            self.lines[line] = format!("{}{}{}", head, first, tail);
            self.edits.push(LineEdit::Changed(line));
            return Position::new(line, head.chars().count() + first.chars().count());
        }

        self.lines[line] = format!("{}{}", head, first);
        self.edits.push(LineEdit::Changed(line));

        let last_index = rest.len() - 1;
        let mut new_lines = Vec::with_capacity(rest.len());
        for (i, piece) in rest.iter().enumerate() {
            if i == last_index {
                new_lines.push(format!("{}{}", piece, tail));
            } else {
                new_lines.push(piece.to_string());
            }
        }
        let count = new_lines.len();
        let end_col = rest[last_index].chars().count();
        self.lines.splice(line + 1..line + 1, new_lines);
        self.edits.push(LineEdit::Inserted { at: line + 1, count });
        Position::new(line + count, end_col)
    }

    /// Deletes the text between two positions, joining lines as needed.
    ///
    /// Positions are clamped to the buffer and swapped if out of order.
    pub fn delete_range(&mut self, from: Position, to: Position) {
        let (from, to) = if from <= to { (from, to) } else { (to, from) };
        let last = self.lines.len() - 1;
        let from = Position::new(from.line.min(last), from.col);
        let to = Position::new(to.line.min(last), to.col);

        let head_end = byte_index(&self.lines[from.line], from.col);
        let tail_start = byte_index(&self.lines[to.line], to.col);
        let joined = format!(
            "{}{}",
            &self.lines[from.line][..head_end],
            &self.lines[to.line][tail_start..]
        );

        if to.line > from.line {
            let count = to.line - from.line;
            self.lines.drain(from.line + 1..=to.line);
            if self.lines[from.line] != joined {
                self.lines[from.line] = joined;
                self.edits.push(LineEdit::Changed(from.line));
            }
            self.edits.push(LineEdit::Removed {
                at: from.line + 1,
                count,
            });
        } else if self.lines[from.line] != joined {
            self.lines[from.line] = joined;
            self.edits.push(LineEdit::Changed(from.line));
        }
    }

    /// Drains the edits recorded since the last call.
    pub fn take_edits(&mut self) -> Vec<LineEdit> {
        std::mem::take(&mut self.edits)
    }

    /// Returns true if edits are waiting to be drained.
    pub fn has_pending_edits(&self) -> bool {
        !self.edits.is_empty()
    }
}

impl Default for LineBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl LineSource for LineBuffer {
    fn line_count(&self) -> usize {
        self.lines.len()
    }

    fn line(&self, line: usize) -> Option<&str> {
        self.lines.get(line).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_has_one_empty_line() {
        let buf = LineBuffer::new();
        assert_eq!(buf.line_count(), 1);
        assert!(buf.is_empty());
        assert_eq!(buf.line(0), Some(""));
    }

    #[test]
    fn test_from_str_splits_lines() {
        let buf = LineBuffer::from_str("a\nb\n");
        assert_eq!(buf.line_count(), 3);
        assert_eq!(buf.line(2), Some(""));
        assert_eq!(buf.content(), "a\nb\n");
    }

    #[test]
    fn test_set_line_records_change() {
        let mut buf = LineBuffer::from_str("a\nb");
        assert!(buf.set_line(1, "c"));
        assert_eq!(buf.take_edits(), vec![LineEdit::Changed(1)]);
        assert!(!buf.has_pending_edits());
    }

    #[test]
    fn test_set_line_same_text_is_silent() {
        let mut buf = LineBuffer::from_str("a");
        assert!(buf.set_line(0, "a"));
        assert!(buf.take_edits().is_empty());
    }

    #[test]
    fn test_set_line_out_of_bounds() {
        let mut buf = LineBuffer::from_str("a");
        assert!(!buf.set_line(5, "x"));
        assert!(buf.take_edits().is_empty());
    }

    #[test]
    fn test_insert_and_remove_line() {
        let mut buf = LineBuffer::from_str("a\nc");
        buf.insert_line(1, "b");
        assert_eq!(buf.content(), "a\nb\nc");
        assert_eq!(buf.remove_line(0), Some("a".to_string()));
        assert_eq!(buf.content(), "b\nc");
        assert_eq!(
            buf.take_edits(),
            vec![
                LineEdit::Inserted { at: 1, count: 1 },
                LineEdit::Removed { at: 0, count: 1 },
            ]
        );
    }

    #[test]
    fn test_remove_only_line_clears_it() {
        let mut buf = LineBuffer::from_str("solo");
        assert_eq!(buf.remove_line(0), Some("solo".to_string()));
        assert_eq!(buf.line_count(), 1);
        assert_eq!(buf.take_edits(), vec![LineEdit::Changed(0)]);
    }

    #[test]
    fn test_insert_text_within_line() {
        let mut buf = LineBuffer::from_str("helo");
        let end = buf.insert_text(Position::new(0, 3), "l");
        assert_eq!(buf.line(0), Some("hello"));
        assert_eq!(end, Position::new(0, 4));
    }

    #[test]
    fn test_insert_text_with_newlines() {
        let mut buf = LineBuffer::from_str("head tail\nnext");
        let end = buf.insert_text(Position::new(0, 5), "x\ny\nz ");
        assert_eq!(buf.content(), "head x\ny\nz tail\nnext");
        assert_eq!(end, Position::new(2, 2));
        assert_eq!(
            buf.take_edits(),
            vec![LineEdit::Changed(0), LineEdit::Inserted { at: 1, count: 2 }]
        );
    }

    #[test]
    fn test_insert_text_multibyte_column() {
        let mut buf = LineBuffer::from_str("héllo");
        buf.insert_text(Position::new(0, 2), "-");
        assert_eq!(buf.line(0), Some("hé-llo"));
    }

    #[test]
    fn test_delete_range_joins_lines() {
        let mut buf = LineBuffer::from_str("one\ntwo\nthree");
        buf.delete_range(Position::new(0, 2), Position::new(2, 1));
        assert_eq!(buf.content(), "onhree");
        assert_eq!(
            buf.take_edits(),
            vec![LineEdit::Changed(0), LineEdit::Removed { at: 1, count: 2 }]
        );
    }

    #[test]
    fn test_delete_range_reversed_positions() {
        let mut buf = LineBuffer::from_str("abcdef");
        buf.delete_range(Position::new(0, 4), Position::new(0, 1));
        assert_eq!(buf.line(0), Some("aef"));
    }
}
