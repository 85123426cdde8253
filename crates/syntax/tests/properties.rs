// Chunk: docs/chunks/line_labeling - Property tests for relabeling and containment
//!
//! Property tests over generated source text.
//!
//! The alphabet is biased toward delimiters (quotes, comment markers, tag
//! brackets, backslashes) so that overlapping and unterminated constructs
//! are common.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::Instant;

use linelabel_buffer::LineBuffer;
use linelabel_syntax::{
    build_runs, label_line, Label, LabelId, LabeledDocument, LabelerConfig, Scheme,
    SchemeRegistry, DEFAULT_MAX_DISPATCH_DEPTH,
};
use proptest::prelude::*;

fn line_strategy() -> impl Strategy<Value = String> {
    "[a-z0-9 /*\"'<>=;(){}\\\\#`]{0,40}"
}

fn lines_strategy() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(line_strategy(), 1..8)
}

fn scheme(ext: &str) -> Arc<Scheme> {
    SchemeRegistry::with_builtin().scheme_for_extension(ext).unwrap()
}

fn labeled(ext: &str, lines: &[String]) -> (LineBuffer, LabeledDocument) {
    let buffer = LineBuffer::from_str(&lines.join("\n"));
    let mut doc = LabeledDocument::new(scheme(ext), LabelerConfig::default(), buffer.line_count());
    doc.run_until_idle(Instant::now(), &buffer);
    (buffer, doc)
}

fn snapshot(doc: &LabeledDocument) -> Vec<Vec<Label>> {
    (0..doc.line_count()).map(|line| doc.labels(line).to_vec()).collect()
}

proptest! {
    #[test]
    fn relabeling_unchanged_text_is_idempotent(lines in lines_strategy()) {
        for ext in ["js", "html", "py"] {
            let (buffer, mut doc) = labeled(ext, &lines);
            let before = snapshot(&doc);

            doc.refresh_all();
            doc.run_until_idle(Instant::now(), &buffer);
            prop_assert_eq!(&before, &snapshot(&doc));
        }
    }

    #[test]
    fn dependencies_are_contained(text in line_strategy()) {
        let len = text.chars().count();
        for ext in ["js", "html", "py", "css"] {
            let labels = label_line(&text, &scheme(ext), &BTreeMap::new(), DEFAULT_MAX_DISPATCH_DEPTH);
            let by_id: HashMap<LabelId, &Label> = labels.iter().map(|l| (l.id, l)).collect();
            for label in &labels {
                for dep in &label.depends_on {
                    let container = by_id[dep];
                    prop_assert!(container.start <= label.start);
                    prop_assert!(label.end_offset(len) <= container.end_offset(len));
                }
            }
        }
    }

    #[test]
    fn runs_cover_the_line(text in line_strategy()) {
        let len = text.chars().count();
        let scheme = scheme("html");
        let labels = label_line(&text, &scheme, &BTreeMap::new(), DEFAULT_MAX_DISPATCH_DEPTH);
        let runs = build_runs(&labels, len, &scheme);

        let mut next = 0;
        for run in &runs {
            prop_assert_eq!(run.start, next);
            prop_assert!(run.end > run.start);
            next = run.end;
        }
        prop_assert_eq!(next, len);
    }

    #[test]
    fn incremental_matches_fresh_labeling(lines in lines_strategy(), edit in line_strategy(), at in 0usize..8) {
        let (mut buffer, mut doc) = labeled("js", &lines);
        let line = at % buffer.line_count();

        let later = Instant::now() + std::time::Duration::from_secs(1);
        buffer.set_line(line, &edit);
        doc.apply_edits(&buffer.take_edits(), later);
        doc.run_until_idle(later, &buffer);

        let fresh_lines: Vec<String> = (0..buffer.line_count())
            .map(|i| buffer.line(i).unwrap_or("").to_string())
            .collect();
        let (_, fresh) = labeled("js", &fresh_lines);
        for i in 0..buffer.line_count() {
            let len = buffer.line_len(i);
            for index in 0..len {
                prop_assert_eq!(doc.color_at(i, index), fresh.color_at(i, index));
            }
        }
    }
}
