// Chunk: docs/chunks/bracket_balance - Bracket balance checker

//! Bracket balance checking.
//!
//! [`BracketChecker`] is fed lines in order and reports closing brackets
//! that have no opener or close the wrong one; [`BracketChecker::finish`]
//! reports openers left unclosed. It is independent of the labeling engine,
//! except that [`check_document`] can mask characters covered by chosen
//! labels so brackets inside strings and comments are ignored.

use std::fmt;

use linelabel_buffer::LineSource;

use crate::document::LabeledDocument;

fn closer_for(open: char) -> Option<char> {
    match open {
        '(' => Some(')'),
        '[' => Some(']'),
        '{' => Some('}'),
        _ => None,
    }
}

fn is_closer(c: char) -> bool {
    matches!(c, ')' | ']' | '}')
}

/// What is wrong with a bracket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BracketProblemKind {
    /// A closer with no opener.
    Unexpected(char),
    /// A closer that does not match the innermost opener.
    Mismatched { expected: char, found: char },
    /// An opener never closed.
    Unclosed(char),
}

/// A bracket problem at a zero-based line and character column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BracketProblem {
    pub line: usize,
    pub col: usize,
    pub kind: BracketProblemKind,
}

impl fmt::Display for BracketProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (line, col) = (self.line + 1, self.col + 1);
        match self.kind {
            BracketProblemKind::Unexpected(c) => {
                write!(f, "{}:{}: unexpected '{}'", line, col, c)
            }
            BracketProblemKind::Mismatched { expected, found } => {
                write!(f, "{}:{}: expected '{}', found '{}'", line, col, expected, found)
            }
            BracketProblemKind::Unclosed(c) => write!(f, "{}:{}: unclosed '{}'", line, col, c),
        }
    }
}

/// Incremental bracket matcher.
#[derive(Debug, Default)]
pub struct BracketChecker {
    /// Open brackets with their positions, innermost last
    stack: Vec<(char, usize, usize)>,
    problems: Vec<BracketProblem>,
}

impl BracketChecker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Checks the next line.
    pub fn check_line(&mut self, line: usize, text: &str) {
        self.check_line_masked(line, text, |_| false);
    }

    /// Checks the next line, skipping characters for which `masked` is true.
    pub fn check_line_masked(&mut self, line: usize, text: &str, masked: impl Fn(usize) -> bool) {
        for (col, c) in text.chars().enumerate() {
            if masked(col) {
                continue;
            }
            if closer_for(c).is_some() {
                self.stack.push((c, line, col));
            } else if is_closer(c) {
                let kind = match self.stack.last() {
                    None => Some(BracketProblemKind::Unexpected(c)),
                    Some(&(open, _, _)) => match closer_for(open) {
                        Some(expected) if expected != c => {
                            Some(BracketProblemKind::Mismatched { expected, found: c })
                        }
                        _ => None,
                    },
                };
                match kind {
                    Some(kind) => self.problems.push(BracketProblem { line, col, kind }),
                    None => {
                        self.stack.pop();
                    }
                }
            }
        }
    }

    /// Number of brackets currently open.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Reports every problem found, unclosed openers last.
    pub fn finish(mut self) -> Vec<BracketProblem> {
        for (open, line, col) in self.stack.drain(..) {
            self.problems.push(BracketProblem {
                line,
                col,
                kind: BracketProblemKind::Unclosed(open),
            });
        }
        self.problems
    }
}

/// Checks a whole document.
///
/// Characters covered by a label named in `masked` are ignored. Lines not yet
/// labeled are checked unmasked.
pub fn check_document(
    doc: &LabeledDocument,
    source: &dyn LineSource,
    masked: &[&str],
) -> Vec<BracketProblem> {
    let mut checker = BracketChecker::new();
    for line in 0..source.line_count() {
        let text = source.line(line).unwrap_or("");
        let len = text.chars().count();
        let labels: Vec<_> = doc
            .labels(line)
            .iter()
            .filter(|l| !l.disabled && masked.contains(&&*l.name))
            .collect();
        checker.check_line_masked(line, text, |col| labels.iter().any(|l| l.covers(col, len)));
    }
    checker.finish()
}
