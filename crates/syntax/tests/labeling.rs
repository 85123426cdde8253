// Chunk: docs/chunks/line_labeling - End-to-end labeling through the document
//!
//! Integration tests for the labeling engine.
//!
//! These drive a `LabeledDocument` the way a host editor does: mutate a
//! `LineBuffer`, forward its edit notifications, and run frames until the
//! refresh queue drains. Colors are then checked per character.

use std::time::{Duration, Instant};

use linelabel_buffer::{Color, LineBuffer, Position};
use linelabel_syntax::{
    catppuccin, LabelKind, LabelState, LabeledDocument, LabelerConfig, SchemeRegistry,
};

const COMMENT: Color = catppuccin::OVERLAY0;
const STRING: Color = catppuccin::GREEN;
const NUMBER: Color = catppuccin::PEACH;
const KEYWORD: Color = catppuccin::MAUVE;
const BRACKET: Color = catppuccin::SUBTEXT0;
const OPERATOR: Color = catppuccin::SKY;
const TAG: Color = catppuccin::BLUE;
const TEXT: Color = catppuccin::TEXT;

/// A buffer and its labeled document, with a controllable clock.
struct MockEditor {
    buffer: LineBuffer,
    doc: LabeledDocument,
    now: Instant,
}

impl MockEditor {
    fn new(ext: &str, content: &str) -> Self {
        Self::with_config(ext, content, LabelerConfig::default())
    }

    fn with_config(ext: &str, content: &str, config: LabelerConfig) -> Self {
        let registry = SchemeRegistry::with_builtin();
        let scheme = registry.scheme_for_extension(ext).unwrap();
        let buffer = LineBuffer::from_str(content);
        let doc = LabeledDocument::new(scheme, config, buffer.line_count());
        let mut editor = Self {
            buffer,
            doc,
            now: Instant::now(),
        };
        editor.settle();
        editor
    }

    /// Moves the clock past the refresh interval.
    fn wait(&mut self) {
        self.now += Duration::from_secs(1);
    }

    fn flush_edits(&mut self) {
        let edits = self.buffer.take_edits();
        self.doc.apply_edits(&edits, self.now);
    }

    fn frame(&mut self) -> usize {
        self.doc.on_frame(self.now, &self.buffer)
    }

    fn settle(&mut self) {
        self.doc.run_until_idle(self.now, &self.buffer);
    }

    fn set_line(&mut self, line: usize, text: &str) {
        self.wait();
        self.buffer.set_line(line, text);
        self.flush_edits();
    }

    fn color(&self, line: usize, index: usize) -> Color {
        self.doc.color_at(line, index)
    }

    fn colors(&self, line: usize) -> Vec<Color> {
        let len = self.buffer.line_len(line);
        (0..len).map(|i| self.color(line, i)).collect()
    }
}

// =============================================================================
// Single-line labeling
// =============================================================================

#[test]
fn test_call_with_string_and_trailing_comment() {
    let editor = MockEditor::new("js", r#"print("a") // note"#);
    let mut expected = vec![TEXT; 5];
    expected.push(BRACKET);
    expected.extend([STRING; 3]);
    expected.push(BRACKET);
    expected.push(TEXT);
    expected.extend([COMMENT; 7]);
    assert_eq!(editor.colors(0), expected);
}

#[test]
fn test_escaped_quote_does_not_close_string() {
    let editor = MockEditor::new("js", r#"s = "a\"b";"#);
    for i in 4..10 {
        assert_eq!(editor.color(0, i), STRING, "index {}", i);
    }
    assert_eq!(editor.color(0, 10), TEXT);
}

#[test]
fn test_earliest_start_wins_within_group() {
    let string_first = MockEditor::new("js", r#""// x" + 1"#);
    assert_eq!(string_first.color(0, 2), STRING);
    assert_eq!(string_first.color(0, 7), OPERATOR);
    assert_eq!(string_first.color(0, 9), NUMBER);

    let comment_first = MockEditor::new("js", r#"// "x" + 1"#);
    assert_eq!(comment_first.colors(0), vec![COMMENT; 10]);
}

#[test]
fn test_line_comment_after_string_with_slashes() {
    let editor = MockEditor::new("js", r#"u = "http://x"; // note"#);
    assert_eq!(editor.color(0, 9), STRING);
    assert_eq!(editor.color(0, 16), COMMENT);
    assert_eq!(editor.color(0, 19), COMMENT);
}

#[test]
fn test_block_comment_after_string_with_opener() {
    let editor = MockEditor::new("js", r#"s = "/*"; y = 1; /* c */"#);
    assert_eq!(editor.color(0, 5), STRING);
    assert_eq!(editor.color(0, 14), NUMBER);
    assert_eq!(editor.color(0, 20), COMMENT);
    assert_eq!(editor.doc.label_state(0, "BLOCK_COMMENT"), LabelState::Matched);
}

#[test]
fn test_python_comment_after_string_with_hash() {
    let editor = MockEditor::new("py", "x = '#fff'  # note");
    assert_eq!(editor.color(0, 5), STRING);
    assert_eq!(editor.color(0, 12), COMMENT);
    assert_eq!(editor.color(0, 14), COMMENT);
}

#[test]
fn test_keywords_are_whole_tokens() {
    let editor = MockEditor::new("js", "const constant = 1;");
    assert_eq!(editor.color(0, 0), KEYWORD);
    assert_eq!(editor.color(0, 6), TEXT);
    assert_eq!(editor.color(0, 17), NUMBER);
}

// =============================================================================
// Cross-line continuations
// =============================================================================

#[test]
fn test_block_comment_continues_to_next_line() {
    let editor = MockEditor::new("js", "/* start\nstill open");
    assert_eq!(editor.colors(1), vec![COMMENT; 10]);
    let labels = editor.doc.labels(1);
    assert!(labels
        .iter()
        .any(|l| &*l.name == "BLOCK_COMMENT" && l.kind == LabelKind::Continued && l.start == 0));
}

#[test]
fn test_closing_comment_revokes_continuation_on_next_batch() {
    let mut editor = MockEditor::new("js", "/* start\nstill open");
    editor.set_line(0, "/* start */");

    assert_eq!(editor.frame(), 1);
    assert_eq!(editor.color(1, 0), COMMENT);
    assert!(editor.doc.is_pending(1));

    assert_eq!(editor.frame(), 1);
    assert_eq!(editor.colors(1), vec![TEXT; 10]);
    assert_eq!(editor.doc.label_state(1, "BLOCK_COMMENT"), LabelState::Absent);
}

#[test]
fn test_revocation_cascades_through_many_lines() {
    let mut editor = MockEditor::new("js", "/*\na\nb\nc\nd */ 5");
    assert_eq!(editor.color(3, 0), COMMENT);
    assert_eq!(editor.color(4, 5), NUMBER);

    editor.set_line(0, "// no block");
    editor.settle();
    for line in 1..4 {
        assert_eq!(editor.color(line, 0), TEXT, "line {}", line);
    }
    assert_eq!(editor.doc.label_state(4, "BLOCK_COMMENT"), LabelState::Absent);
}

#[test]
fn test_splitting_a_comment_with_newline() {
    let mut editor = MockEditor::new("js", "a /* b */ c");
    editor.wait();
    editor.buffer.insert_text(Position::new(0, 6), "\n");
    editor.flush_edits();
    editor.settle();

    assert_eq!(editor.buffer.line(1), Some(" */ c"));
    assert_eq!(editor.color(0, 2), COMMENT);
    assert_eq!(editor.color(1, 1), COMMENT);
    assert_eq!(editor.color(1, 4), TEXT);
}

#[test]
fn test_joining_lines_closes_comment() {
    let mut editor = MockEditor::new("js", "/* a\nb */\nc");
    editor.wait();
    editor
        .buffer
        .delete_range(Position::new(0, 4), Position::new(1, 0));
    editor.flush_edits();
    editor.settle();

    assert_eq!(editor.buffer.line_count(), 2);
    assert_eq!(editor.buffer.line(0), Some("/* ab */"));
    assert_eq!(editor.color(1, 0), TEXT);
}

#[test]
fn test_python_triple_quoted_string() {
    let editor = MockEditor::new("py", "x = \"\"\"doc\nmore\nend\"\"\" + 1");
    assert_eq!(editor.color(0, 0), TEXT);
    assert_eq!(editor.color(0, 7), STRING);
    assert_eq!(editor.colors(1), vec![STRING; 4]);
    assert_eq!(editor.color(2, 0), STRING);
    assert_eq!(editor.color(2, 7), OPERATOR);
    assert_eq!(editor.color(2, 9), NUMBER);
}

// =============================================================================
// Embedded sub-schemes
// =============================================================================

#[test]
fn test_script_region_uses_javascript_colors() {
    let editor = MockEditor::new("html", "<script>var x=1;</script>");
    assert_eq!(editor.color(0, 0), TAG);
    assert_eq!(editor.color(0, 8), KEYWORD);
    assert_eq!(editor.color(0, 14), NUMBER);
    assert_eq!(editor.color(0, 16), TAG);
}

#[test]
fn test_script_region_spanning_lines() {
    let editor = MockEditor::new("html", "<script>\nlet y = 2;\n</script>\n<p>let</p>");
    assert_eq!(editor.color(1, 0), KEYWORD);
    assert_eq!(editor.color(1, 8), NUMBER);
    assert_eq!(editor.color(2, 0), TAG);
    // Outside the script region "let" is plain text
    assert_eq!(editor.color(3, 3), TEXT);
}

#[test]
fn test_commented_out_script_is_comment() {
    let editor = MockEditor::new("html", "<!-- <script>var x = 1; -->");
    assert_eq!(editor.color(0, 13), COMMENT);
    assert_eq!(editor.color(0, 21), COMMENT);
}

#[test]
fn test_attribute_strings_only_inside_tags() {
    let editor = MockEditor::new("html", r#"<a href="x">"y"</a>"#);
    assert_eq!(editor.color(0, 8), STRING);
    assert_eq!(editor.color(0, 13), TEXT);
}

#[test]
fn test_style_region_uses_css_colors() {
    let editor = MockEditor::new("html", "<style>p { color: #ff0000; }</style>");
    assert_eq!(editor.color(0, 18), NUMBER);
}

// =============================================================================
// Frame budget
// =============================================================================

#[test]
fn test_large_paste_is_spread_over_frames() {
    let config = LabelerConfig {
        lines_per_frame: 20,
        ..LabelerConfig::default()
    };
    let mut editor = MockEditor::with_config("js", "x", config);
    editor.wait();
    let pasted = vec!["let a = 1;"; 100].join("\n");
    editor.buffer.insert_text(Position::new(0, 1), &format!("\n{}", pasted));
    editor.flush_edits();

    let mut frames = 0;
    while editor.frame() > 0 {
        frames += 1;
    }
    assert_eq!(frames, 6);
    assert_eq!(editor.color(100, 0), KEYWORD);
}

#[test]
fn test_rapid_edits_are_throttled() {
    let mut editor = MockEditor::new("js", "x");
    editor.wait();
    editor.buffer.set_line(0, "1");
    editor.flush_edits();
    editor.settle();
    assert_eq!(editor.color(0, 0), NUMBER);

    editor.now += Duration::from_millis(100);
    editor.buffer.set_line(0, "let");
    editor.flush_edits();
    assert!(editor.doc.is_deferred(0));
    editor.settle();
    assert_eq!(editor.color(0, 0), NUMBER);

    editor.now += Duration::from_millis(400);
    editor.settle();
    assert_eq!(editor.color(0, 0), KEYWORD);
}
