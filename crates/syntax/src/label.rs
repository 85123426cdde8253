// Chunk: docs/chunks/line_labeling - Label occurrences and per-line label state

//! Label occurrences.
//!
//! A [`Label`] is one occurrence of a named lexical category on a line. Labels
//! come out of the finder as raw `Start`/`End`/`Single` markers, are paired
//! into regions by the tracker, and get their derived fields (`depends_on`,
//! `depth`, `disabled`) filled in by the resolver.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use linelabel_buffer::Color;

/// Name of a label category, e.g. `"COMMENT"` or `"function"`.
pub type LabelName = Arc<str>;

/// Labels of one line grouped by name.
pub type LabelMap = BTreeMap<LabelName, Vec<Label>>;

/// Identifies a label within one labeling pass of one line.
///
/// Ids are assigned sequentially as labels are committed, so relabeling the
/// same text with the same inherited state yields the same ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct LabelId(pub u32);

/// Where a label ends.
///
/// `EndOfLine` sorts after every `At` offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LabelEnd {
    /// Exclusive character offset.
    At(usize),
    /// Open: extends to the end of the line and possibly onto the next one.
    EndOfLine,
}

impl LabelEnd {
    /// Resolves the end against a line length.
    pub fn resolve(self, line_len: usize) -> usize {
        match self {
            LabelEnd::At(offset) => offset.min(line_len),
            LabelEnd::EndOfLine => line_len,
        }
    }

    /// Returns true for `EndOfLine`.
    pub fn is_open(self) -> bool {
        matches!(self, LabelEnd::EndOfLine)
    }
}

/// The role a label plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LabelKind {
    /// Opening delimiter, or after pairing, the whole delimited region.
    Start,
    /// Closing delimiter as produced by the finder.
    End,
    /// A complete token such as a keyword or number.
    Single,
    /// A region carried over from the previous line.
    Continued,
}

/// Identifies a continuation across lines: the scheme a label belongs to and
/// its name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LabelKey {
    pub scheme: Arc<str>,
    pub name: LabelName,
}

impl LabelKey {
    pub fn new(scheme: impl Into<Arc<str>>, name: impl Into<LabelName>) -> Self {
        Self {
            scheme: scheme.into(),
            name: name.into(),
        }
    }
}

/// One occurrence of a label on a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    pub id: LabelId,
    pub name: LabelName,
    /// Name of the scheme whose rule produced this label.
    pub scheme: Arc<str>,
    /// Character offset of the first colored character.
    pub start: usize,
    pub end: LabelEnd,
    pub kind: LabelKind,
    /// Character range of the delimiter or token that was matched, before any
    /// extension was applied. Used to pair starts with ends.
    pub matched: (usize, usize),
    pub color: Color,
    /// Declaration index of the rule within its scheme.
    pub order: usize,
    /// Sub-grammar nesting level of the pass that produced the label.
    pub level: usize,
    pub multi_line: bool,
    /// Name of a label that must contain this one for it to be active.
    pub requires: Option<LabelName>,

    /// Labels containing this one. Derived by the resolver.
    pub depends_on: BTreeSet<LabelId>,
    /// Number of containers. Derived by the resolver.
    pub depth: usize,
    /// Set by the resolver when a required container is missing.
    pub disabled: bool,
}

impl Label {
    /// Creates a label with empty derived state.
    pub fn new(
        name: impl Into<LabelName>,
        scheme: impl Into<Arc<str>>,
        start: usize,
        end: LabelEnd,
        kind: LabelKind,
    ) -> Self {
        let matched_end = match end {
            LabelEnd::At(offset) => offset,
            LabelEnd::EndOfLine => start,
        };
        Self {
            id: LabelId::default(),
            name: name.into(),
            scheme: scheme.into(),
            start,
            end,
            kind,
            matched: (start, matched_end),
            color: Color::Default,
            order: 0,
            level: 0,
            multi_line: false,
            requires: None,
            depends_on: BTreeSet::new(),
            depth: 0,
            disabled: false,
        }
    }

    /// Returns the continuation key of this label.
    pub fn key(&self) -> LabelKey {
        LabelKey {
            scheme: self.scheme.clone(),
            name: self.name.clone(),
        }
    }

    /// Returns the exclusive end offset within a line of `line_len` characters.
    pub fn end_offset(&self, line_len: usize) -> usize {
        self.end.resolve(line_len).max(self.start.min(line_len))
    }

    /// Returns the number of characters covered within a line.
    pub fn len(&self, line_len: usize) -> usize {
        self.end_offset(line_len) - self.start.min(line_len)
    }

    /// Returns true if the label covers no characters.
    pub fn is_empty(&self, line_len: usize) -> bool {
        self.len(line_len) == 0
    }

    /// Returns true if the label covers the character at `index`.
    pub fn covers(&self, index: usize, line_len: usize) -> bool {
        index >= self.start && index < self.end_offset(line_len)
    }

    /// Returns true if the label is a delimited region still open at the end
    /// of the line.
    pub fn is_open_region(&self) -> bool {
        matches!(self.kind, LabelKind::Start | LabelKind::Continued) && self.end.is_open()
    }

    /// Creates the label a following line inherits from this open region.
    pub fn continuation(&self) -> Label {
        Label {
            id: LabelId::default(),
            name: self.name.clone(),
            scheme: self.scheme.clone(),
            start: 0,
            end: LabelEnd::EndOfLine,
            kind: LabelKind::Continued,
            matched: (0, 0),
            color: self.color,
            order: self.order,
            level: self.level,
            multi_line: self.multi_line,
            requires: self.requires.clone(),
            depends_on: BTreeSet::new(),
            depth: 0,
            disabled: false,
        }
    }
}

/// Per-line state of one label name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelState {
    /// No occurrence on the line.
    Absent,
    /// Occurs and every occurrence closes on the line.
    Matched,
    /// An occurrence is open at the end of the line.
    Continuing,
    /// A region inherited from the previous line closes on this line.
    Ended,
}

/// Computes the state of `name` from a line's labels.
pub fn label_state(labels: &[Label], name: &str) -> LabelState {
    let mut state = LabelState::Absent;
    for label in labels.iter().filter(|l| &*l.name == name) {
        if label.is_open_region() {
            return LabelState::Continuing;
        }
        if label.kind == LabelKind::Continued {
            state = LabelState::Ended;
        } else if state == LabelState::Absent {
            state = LabelState::Matched;
        }
    }
    state
}

/// Groups labels by name, keeping their relative order.
pub fn group_by_name(labels: &[Label]) -> LabelMap {
    let mut map = LabelMap::new();
    for label in labels {
        map.entry(label.name.clone())
            .or_insert_with(Vec::new)
            .push(label.clone());
    }
    map
}

#[cfg(test)]
mod tests {
    use super::*;

    fn region(name: &str, start: usize, end: LabelEnd, kind: LabelKind) -> Label {
        Label::new(name, "test", start, end, kind)
    }

    #[test]
    fn test_end_of_line_sorts_last() {
        assert!(LabelEnd::At(1_000_000) < LabelEnd::EndOfLine);
        assert!(LabelEnd::At(3) < LabelEnd::At(4));
    }

    #[test]
    fn test_resolve_clamps_to_line() {
        assert_eq!(LabelEnd::At(10).resolve(4), 4);
        assert_eq!(LabelEnd::At(2).resolve(4), 2);
        assert_eq!(LabelEnd::EndOfLine.resolve(4), 4);
    }

    #[test]
    fn test_covers_and_len() {
        let label = region("STRING", 2, LabelEnd::At(5), LabelKind::Start);
        assert!(!label.covers(1, 10));
        assert!(label.covers(2, 10));
        assert!(label.covers(4, 10));
        assert!(!label.covers(5, 10));
        assert_eq!(label.len(10), 3);

        let open = region("COMMENT", 3, LabelEnd::EndOfLine, LabelKind::Start);
        assert!(open.covers(9, 10));
        assert_eq!(open.len(10), 7);
        assert!(open.is_open_region());
    }

    #[test]
    fn test_continuation_starts_at_line_start() {
        let mut open = region("COMMENT", 3, LabelEnd::EndOfLine, LabelKind::Start);
        open.multi_line = true;
        open.depth = 2;
        let cont = open.continuation();
        assert_eq!(cont.start, 0);
        assert_eq!(cont.kind, LabelKind::Continued);
        assert_eq!(cont.depth, 0);
        assert!(cont.multi_line);
        assert_eq!(cont.key(), open.key());
    }

    #[test]
    fn test_label_state() {
        let labels = vec![
            region("STRING", 0, LabelEnd::At(3), LabelKind::Start),
            region("COMMENT", 0, LabelEnd::At(5), LabelKind::Continued),
            region("BLOCK", 6, LabelEnd::EndOfLine, LabelKind::Start),
        ];
        assert_eq!(label_state(&labels, "STRING"), LabelState::Matched);
        assert_eq!(label_state(&labels, "COMMENT"), LabelState::Ended);
        assert_eq!(label_state(&labels, "BLOCK"), LabelState::Continuing);
        assert_eq!(label_state(&labels, "NUMBER"), LabelState::Absent);
    }

    #[test]
    fn test_group_by_name() {
        let labels = vec![
            region("a", 0, LabelEnd::At(1), LabelKind::Single),
            region("b", 2, LabelEnd::At(3), LabelKind::Single),
            region("a", 4, LabelEnd::At(5), LabelKind::Single),
        ];
        let map = group_by_name(&labels);
        assert_eq!(map.len(), 2);
        assert_eq!(map["a"].len(), 2);
        assert_eq!(map["a"][1].start, 4);
    }
}
