// Chunk: docs/chunks/line_labeling - Containment edges and depth for overlapping labels

//! The overlap/depth resolver.
//!
//! Labels on a line may overlap. [`update_depths`] orders them and, for every
//! label that starts inside a longer label (a container), records a
//! dependency edge on the container and clamps the label's end to the
//! container's. A label's depth is its number of containers.
//!
//! Edges only ever point from a later label to an earlier one in the sorted
//! order, so the dependency graph is acyclic.

use crate::label::{Label, LabelKind};

/// Returns true if `label` can contain other labels.
///
/// Delimiter markers and single characters cannot. Open regions always can.
fn is_container(label: &Label, line_len: usize) -> bool {
    label.kind != LabelKind::End && (label.end.is_open() || label.len(line_len) > 1)
}

/// Sorts labels and recomputes their derived fields.
///
/// Order: start ascending, longer first, then shallower dispatch level, then
/// declaration order. `depends_on`, `depth` and `disabled` are reset and
/// rebuilt; a label whose rule requires a container is disabled when no
/// container of that name encloses it.
pub fn update_depths(labels: &mut [Label], line_len: usize) {
    labels.sort_by(|a, b| {
        a.start
            .cmp(&b.start)
            .then_with(|| b.end.cmp(&a.end))
            .then_with(|| a.level.cmp(&b.level))
            .then_with(|| a.order.cmp(&b.order))
            .then_with(|| a.id.cmp(&b.id))
    });

    for label in labels.iter_mut() {
        label.depends_on.clear();
        label.depth = 0;
        label.disabled = false;
    }

    for i in 0..labels.len() {
        let (before, rest) = labels.split_at_mut(i);
        let label = &mut rest[0];
        let mut inside_required = false;

        for container in before.iter() {
            if !is_container(container, line_len) {
                continue;
            }
            if label.start < container.start || label.start >= container.end_offset(line_len) {
                continue;
            }
            label.depends_on.insert(container.id);
            label.depth += 1;
            if label.end > container.end {
                label.end = container.end;
            }
            if label.requires.as_deref() == Some(&*container.name) {
                inside_required = true;
            }
        }

        if label.requires.is_some() && !inside_required {
            label.disabled = true;
        }
    }
}
