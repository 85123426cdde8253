// Chunk: docs/chunks/line_labeling - Precedence-based color resolution

//! Color resolution.
//!
//! [`color_at`] decides the color of one character from the labels covering
//! it. The work happens once per relabel: [`build_runs`] evaluates every
//! segment between label boundaries and stores the result as run-length
//! [`ColorRun`]s, so the renderer's per-character query is a binary search.
//!
//! Within a precedence group the label with the smallest start wins; labels
//! that start together are ordered by declaration order in their scheme.

use std::collections::HashSet;

use linelabel_buffer::{Color, Span, StyledLine};

use crate::label::{Label, LabelId};
use crate::scheme::Scheme;

/// A run of characters `[start, end)` sharing one color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorRun {
    pub start: usize,
    pub end: usize,
    pub color: Color,
}

/// Returns the ids of labels that may color text.
///
/// A label is active when it is not disabled and every label it depends on
/// is present and active. Expects the resolver's order, in which containers
/// precede their contents.
pub fn active_labels(labels: &[Label]) -> HashSet<LabelId> {
    let mut active = HashSet::with_capacity(labels.len());
    for label in labels {
        if !label.disabled && label.depends_on.iter().all(|dep| active.contains(dep)) {
            active.insert(label.id);
        }
    }
    active
}

/// Returns true if `container` holds `label` and wins over it.
///
/// Both must belong to `scheme`, and `container` must sit in an earlier
/// precedence entry. A sub-scheme region held by such a container is text
/// of the container (a script block inside a markup comment) and neither
/// dispatches nor switches the active scheme.
pub(crate) fn is_outranked(label: &Label, container: &Label, scheme: &Scheme) -> bool {
    if &*label.scheme != scheme.name()
        || container.scheme != label.scheme
        || !label.depends_on.contains(&container.id)
    {
        return false;
    }
    match (scheme.rank_of(&container.name), scheme.rank_of(&label.name)) {
        (Some(outer), Some(inner)) => outer < inner,
        _ => false,
    }
}

/// Resolves the color of a character covered by `covering`.
///
/// The active scheme starts as `root` and switches, outermost first, each
/// time an active label of the current scheme maps to a sub-scheme and no
/// covering label of that scheme outranks it as its container. The first
/// entry of that scheme's precedence list with an active label of that scheme
/// decides the color; otherwise the scheme's base color is used.
pub fn color_at(covering: &[&Label], active: &HashSet<LabelId>, root: &Scheme) -> Color {
    let mut by_depth: Vec<&Label> = covering.to_vec();
    by_depth.sort_by_key(|l| (l.depth, l.level, l.start));

    let mut scheme = root;
    for label in by_depth {
        if &*label.scheme != scheme.name() || !active.contains(&label.id) {
            continue;
        }
        let Some(sub) = scheme.sub_scheme(&label.name) else {
            continue;
        };
        let shadowed = covering
            .iter()
            .any(|container| active.contains(&container.id) && is_outranked(label, container, scheme));
        if !shadowed {
            scheme = sub.as_ref();
        }
    }

    for entry in scheme.precedence() {
        let winner = covering
            .iter()
            .filter(|l| {
                &*l.scheme == scheme.name() && active.contains(&l.id) && entry.contains(&l.name)
            })
            .min_by_key(|l| (l.start, l.order, l.id));
        if let Some(label) = winner {
            return label.color;
        }
    }

    scheme.base_color()
}

/// Precomputes the colors of a line of `line_len` characters.
///
/// Runs cover `[0, line_len)` without gaps and adjacent runs differ in color.
pub fn build_runs(labels: &[Label], line_len: usize, root: &Scheme) -> Vec<ColorRun> {
    if line_len == 0 {
        return Vec::new();
    }
    let active = active_labels(labels);

    let mut bounds = Vec::with_capacity(labels.len() * 2 + 2);
    bounds.push(0);
    bounds.push(line_len);
    for label in labels {
        bounds.push(label.start.min(line_len));
        bounds.push(label.end_offset(line_len));
    }
    bounds.sort_unstable();
    bounds.dedup();

    let mut runs: Vec<ColorRun> = Vec::new();
    for pair in bounds.windows(2) {
        let (start, end) = (pair[0], pair[1]);
        let covering: Vec<&Label> = labels.iter().filter(|l| l.covers(start, line_len)).collect();
        let color = color_at(&covering, &active, root);
        match runs.last_mut() {
            Some(last) if last.color == color => last.end = end,
            _ => runs.push(ColorRun { start, end, color }),
        }
    }
    runs
}

/// Looks up the color of a character in precomputed runs.
pub fn run_color(runs: &[ColorRun], index: usize) -> Option<Color> {
    let i = runs.partition_point(|run| run.end <= index);
    runs.get(i).filter(|run| run.start <= index).map(|run| run.color)
}

/// Splits `text` into spans following `runs`.
///
/// Characters past the last run, such as text typed since the line was last
/// labeled, get `fallback`.
pub fn styled_line(runs: &[ColorRun], text: &str, fallback: Color) -> StyledLine {
    let mut line = StyledLine::empty();
    let mut current = String::new();
    let mut current_color = fallback;
    for (i, c) in text.chars().enumerate() {
        let color = run_color(runs, i).unwrap_or(fallback);
        if color != current_color && !current.is_empty() {
            line.push(Span::new(std::mem::take(&mut current), current_color));
        }
        current_color = color;
        current.push(c);
    }
    line.push(Span::new(current, current_color));
    line
}
