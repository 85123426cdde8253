// Chunk: docs/chunks/line_labeling - Worklist dispatch into embedded sub-grammars

//! The sub-grammar dispatcher.
//!
//! [`label_line`] runs the whole per-line pipeline. The line is processed as
//! a stack of [`DispatchTask`]s: the first covers the line with the root
//! scheme, and every active region whose label maps to a sub-scheme, and is
//! not held by a higher-precedence region of its own scheme, pushes a
//! task that re-runs the finder and tracker over exactly that region with the
//! sub-scheme. After each task the merged labels go through the resolver
//! again. Nesting is bounded by a maximum depth.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::coloring::{active_labels, is_outranked};
use crate::label::{Label, LabelEnd, LabelId, LabelKey};
use crate::resolver::update_depths;
use crate::scheme::Scheme;
use crate::tracker::track_span;

/// Default bound on sub-scheme nesting.
pub const DEFAULT_MAX_DISPATCH_DEPTH: usize = 8;

/// One span of a line to label with one scheme.
#[derive(Debug, Clone)]
pub struct DispatchTask {
    pub start: usize,
    pub end: LabelEnd,
    pub scheme: Arc<Scheme>,
    pub depth: usize,
}

impl DispatchTask {
    /// Returns false for spans with nothing to label.
    ///
    /// An empty span at the start of the line that runs to its end is kept:
    /// it may still carry a continuation through an empty line.
    fn is_worth_running(&self, line_len: usize) -> bool {
        let stop = self.end.resolve(line_len);
        self.start < stop || (self.start == 0 && self.end.is_open())
    }
}

/// Labels one line.
///
/// `inherited` holds the continuations the line received from its
/// predecessor. The result is in resolver order with ids assigned in the
/// order labels were produced.
pub fn label_line(
    text: &str,
    scheme: &Arc<Scheme>,
    inherited: &BTreeMap<LabelKey, Label>,
    max_depth: usize,
) -> Vec<Label> {
    let chars: Vec<char> = text.chars().collect();
    let line_len = chars.len();
    let mut labels: Vec<Label> = Vec::new();
    let mut next_id = 0u32;

    let mut worklist = vec![DispatchTask {
        start: 0,
        end: LabelEnd::EndOfLine,
        scheme: Arc::clone(scheme),
        depth: 0,
    }];

    while let Some(task) = worklist.pop() {
        if !task.is_worth_running(line_len) {
            continue;
        }
        let start = task.start.min(line_len);
        let stop = task.end.resolve(line_len).max(start);
        let span: String = chars[start..stop].iter().collect();

        let first_new = next_id;
        for mut label in track_span(&span, start, task.end, &task.scheme, inherited, task.depth) {
            label.id = LabelId(next_id);
            next_id += 1;
            labels.push(label);
        }
        if next_id == first_new {
            continue;
        }
        update_depths(&mut labels, line_len);

        if !task.scheme.has_sub_schemes() {
            continue;
        }
        let active = active_labels(&labels);
        let mut children = Vec::new();
        for label in labels.iter().filter(|l| l.id.0 >= first_new) {
            let Some(sub) = task.scheme.sub_scheme(&label.name) else {
                continue;
            };
            if !active.contains(&label.id) {
                continue;
            }
            let shadowed = labels.iter().any(|container| {
                active.contains(&container.id) && is_outranked(label, container, &task.scheme)
            });
            if shadowed {
                continue;
            }
            if task.depth + 1 > max_depth {
                tracing::warn!(
                    scheme = task.scheme.name(),
                    label = &*label.name,
                    depth = task.depth + 1,
                    "sub-scheme nesting limit reached; not descending"
                );
                continue;
            }
            children.push(DispatchTask {
                start: label.start,
                end: label.end,
                scheme: Arc::clone(sub),
                depth: task.depth + 1,
            });
        }
        // Reversed so the stack yields children in line order
        worklist.extend(children.into_iter().rev());
    }

    labels
}
