// Chunk: docs/chunks/refresh_scheduling - Bounded per-frame refresh batches
//!
//! The pending-refresh queue.
//!
//! Lines waiting for a relabel are grouped into batch windows. Requests join
//! the newest open window; once draining starts on a window it closes, and
//! later requests open a new one behind it. Lines come out in ascending order
//! within a window and windows are drained first-in, first-out. The document
//! pops a bounded number of lines per host frame.

use std::collections::{BTreeSet, VecDeque};

/// Default number of lines relabeled per host frame.
pub const DEFAULT_LINES_PER_FRAME: usize = 20;

/// Lines waiting for a relabel, in batch windows.
#[derive(Debug, Default)]
pub struct RefreshQueue {
    windows: VecDeque<BTreeSet<usize>>,
    /// Whether the back window still accepts lines.
    open: bool,
}

impl RefreshQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a line. Returns false if it was already queued.
    pub fn push(&mut self, line: usize) -> bool {
        if self.contains(line) {
            return false;
        }
        if !self.open || self.windows.is_empty() {
            self.windows.push_back(BTreeSet::new());
            self.open = true;
        }
        match self.windows.back_mut() {
            Some(window) => window.insert(line),
            None => false,
        }
    }

    /// Takes the next line to relabel.
    pub fn pop(&mut self) -> Option<usize> {
        loop {
            let last_window = self.windows.len() == 1;
            let front = self.windows.front_mut()?;
            match front.pop_first() {
                Some(line) => {
                    if last_window {
                        self.open = false;
                    }
                    return Some(line);
                }
                None => {
                    self.windows.pop_front();
                }
            }
        }
    }

    pub fn contains(&self, line: usize) -> bool {
        self.windows.iter().any(|w| w.contains(&line))
    }

    /// Returns the number of queued lines.
    pub fn len(&self) -> usize {
        self.windows.iter().map(BTreeSet::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.iter().all(BTreeSet::is_empty)
    }

    /// Removes a line from the queue.
    pub fn remove(&mut self, line: usize) -> bool {
        self.windows.iter_mut().any(|w| w.remove(&line))
    }

    pub fn clear(&mut self) {
        self.windows.clear();
        self.open = false;
    }

    /// Shifts queued lines for `count` lines inserted at `at`.
    pub fn insert_lines(&mut self, at: usize, count: usize) {
        if count == 0 {
            return;
        }
        for window in self.windows.iter_mut() {
            *window = window
                .iter()
                .map(|&line| if line >= at { line + count } else { line })
                .collect();
        }
    }

    /// Drops queued lines in `at..at + count` and shifts the lines after them.
    pub fn remove_lines(&mut self, at: usize, count: usize) {
        if count == 0 {
            return;
        }
        for window in self.windows.iter_mut() {
            *window = window
                .iter()
                .filter_map(|&line| {
                    if line < at {
                        Some(line)
                    } else if line < at + count {
                        None
                    } else {
                        Some(line - count)
                    }
                })
                .collect();
        }
    }
}
