// Chunk: docs/chunks/line_labeling - Pairing delimiters and carrying regions across lines

//! The cross-line tracker.
//!
//! [`track_span`] turns the finder's raw markers into regions. Delimited
//! labels are paired per precedence entry: the earliest `Start` among the
//! entry's labels claims a region up to the closest following `End` of its
//! own name, and the delimiters of the entry's labels inside that region are
//! text, not markers. A `Start` with no partner stays open to the end of the
//! line. A region inherited from the previous line becomes a `Continued`
//! label that closes at the first `End` on this line, or covers the whole
//! span when there is none.
//!
//! [`offered_continuations`] picks the regions a line hands to its successor.

use std::collections::{BTreeMap, HashMap};

use crate::finder::find_labels;
use crate::label::{Label, LabelEnd, LabelId, LabelKey, LabelKind, LabelMap};
use crate::scheme::{LabelRule, Scheme, SearchStrategy};

/// Pairs the raw markers of one span into regions.
///
/// `text` is the span's text and `offset` its first character within the
/// line. `span_end` is where the span stops: regions of a closed span are
/// clamped to it. Continuations in `inherited` are only picked up when the
/// span starts the line and they belong to `scheme`.
pub fn track_span(
    text: &str,
    offset: usize,
    span_end: LabelEnd,
    scheme: &Scheme,
    inherited: &BTreeMap<LabelKey, Label>,
    level: usize,
) -> Vec<Label> {
    let raw = find_labels(text, offset, scheme);
    let mut regions = Vec::new();

    for entry in scheme.precedence() {
        let mut delimited: Vec<(usize, &LabelRule)> = Vec::new();
        for name in entry.names() {
            let Some(order) = scheme.order_of(name) else {
                continue;
            };
            let rule = &scheme.rules()[order];
            if matches!(rule.strategy, SearchStrategy::AllText) {
                delimited.push((order, rule));
            } else if let Some(found) = raw.get(name) {
                regions.extend(found.iter().cloned());
            }
        }
        delimited.sort_by_key(|&(order, _)| order);
        pair_delimiters(&delimited, &raw, offset, scheme, inherited, &mut regions);
    }

    for region in &mut regions {
        region.level = level;
        if let LabelEnd::At(limit) = span_end {
            region.start = region.start.min(limit);
            if region.end > LabelEnd::At(limit) {
                region.end = LabelEnd::At(limit);
            }
        }
    }
    regions
}

fn markers<'a>(raw: &'a LabelMap, name: &str, kind: LabelKind) -> impl Iterator<Item = &'a Label> {
    raw.get(name)
        .map(Vec::as_slice)
        .unwrap_or(&[])
        .iter()
        .filter(move |l| l.kind == kind)
}

/// Pairs the markers of the delimited labels of one precedence entry.
///
/// `rules` is in declaration order, which breaks ties between starts at the
/// same position.
fn pair_delimiters(
    rules: &[(usize, &LabelRule)],
    raw: &LabelMap,
    offset: usize,
    scheme: &Scheme,
    inherited: &BTreeMap<LabelKey, Label>,
    regions: &mut Vec<Label>,
) {
    let mut cursor = offset;

    let carried = if offset == 0 {
        rules.iter().find_map(|&(order, rule)| {
            let key = LabelKey {
                scheme: scheme.name_arc().clone(),
                name: rule.name.clone(),
            };
            inherited.get(&key).map(|label| (order, rule, label))
        })
    } else {
        None
    };
    if let Some((order, rule, carried)) = carried {
        let mut region = carried.clone();
        region.start = offset;
        region.kind = LabelKind::Continued;
        region.color = rule.color;
        region.order = order;
        match markers(raw, &rule.name, LabelKind::End).find(|end| end.matched.0 >= offset) {
            Some(end) => {
                region.end = LabelEnd::At(end.end.resolve(usize::MAX).max(offset));
                region.matched = (offset, end.matched.1);
                cursor = end.matched.1;
                regions.push(region);
            }
            None => {
                region.end = LabelEnd::EndOfLine;
                region.matched = (offset, offset);
                regions.push(region);
                return;
            }
        }
    }

    loop {
        let next = rules
            .iter()
            .filter_map(|&(order, rule)| {
                markers(raw, &rule.name, LabelKind::Start)
                    .find(|start| start.matched.0 >= cursor)
                    .map(|start| (order, start, rule))
            })
            .min_by_key(|&(order, start, _)| (start.matched.0, order));
        let Some((_, start, rule)) = next else {
            return;
        };

        let mut region = start.clone();
        match markers(raw, &rule.name, LabelKind::End).find(|end| end.matched.0 >= start.matched.1) {
            Some(end) => {
                region.end = LabelEnd::At(end.end.resolve(usize::MAX).max(start.start));
                region.matched = (start.matched.0, end.matched.1);
                cursor = end.matched.1;
                regions.push(region);
            }
            None => {
                region.end = LabelEnd::EndOfLine;
                regions.push(region);
                return;
            }
        }
    }
}

/// Returns the continuations a line offers to the next line.
///
/// A label is offered when it is a region open at the end of the line, its
/// rule is multi-line, it is not disabled, and it is not nested inside
/// another region of its own scheme (a block comment opener inside a line
/// comment does not continue).
pub fn offered_continuations(labels: &[Label]) -> BTreeMap<LabelKey, Label> {
    let by_id: HashMap<LabelId, &Label> = labels.iter().map(|l| (l.id, l)).collect();
    let mut offered = BTreeMap::new();
    for label in labels {
        if !label.is_open_region() || !label.multi_line || label.disabled {
            continue;
        }
        let nested = label.depends_on.iter().any(|id| {
            by_id.get(id).map_or(false, |container| {
                container.scheme == label.scheme
                    && matches!(container.kind, LabelKind::Start | LabelKind::Continued)
            })
        });
        if nested {
            continue;
        }
        offered
            .entry(label.key())
            .or_insert_with(|| label.continuation());
    }
    offered
}
