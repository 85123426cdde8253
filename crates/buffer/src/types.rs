// Chunk: docs/chunks/line_buffer - Line storage with edit notifications

/// Position in the buffer as (line, column) where both are 0-indexed.
///
/// Columns count characters, not bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    pub line: usize,
    pub col: usize,
}

impl Position {
    pub fn new(line: usize, col: usize) -> Self {
        Self { line, col }
    }
}

impl PartialOrd for Position {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Position {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        match self.line.cmp(&other.line) {
            std::cmp::Ordering::Equal => self.col.cmp(&other.col),
            ord => ord,
        }
    }
}

/// A structural notification emitted by a mutation of the line store.
///
/// Consumers that keep per-line state (such as the labeling engine) replay
/// these in order to keep their records aligned with the buffer's lines.
/// Indices in each edit refer to the buffer *after* all earlier edits in the
/// same batch were applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineEdit {
    /// The text of an existing line changed.
    Changed(usize),
    /// `count` new lines were inserted so that the first of them is at `at`.
    /// Lines previously at `at..` move down by `count`.
    Inserted { at: usize, count: usize },
    /// `count` lines starting at `at` were removed.
    /// Lines previously after them move up by `count`.
    Removed { at: usize, count: usize },
}

impl LineEdit {
    /// Returns the first line touched by this edit.
    pub fn first_line(&self) -> usize {
        match self {
            LineEdit::Changed(line) => *line,
            LineEdit::Inserted { at, .. } | LineEdit::Removed { at, .. } => *at,
        }
    }

    /// Returns true if the edit changes the number of lines.
    pub fn is_structural(&self) -> bool {
        !matches!(self, LineEdit::Changed(_))
    }

    /// Maps a line index from before this edit to after it.
    ///
    /// Returns `None` when the line was removed by the edit.
    pub fn map_line(&self, line: usize) -> Option<usize> {
        match *self {
            LineEdit::Changed(_) => Some(line),
            LineEdit::Inserted { at, count } => {
                if line >= at {
                    Some(line + count)
                } else {
                    Some(line)
                }
            }
            LineEdit::Removed { at, count } => {
                if line < at {
                    Some(line)
                } else if line < at + count {
                    None
                } else {
                    Some(line - count)
                }
            }
        }
    }
}
