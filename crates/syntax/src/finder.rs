// Chunk: docs/chunks/line_labeling - Raw label occurrences for one line

//! The label finder.
//!
//! [`find_labels`] is a pure function of a line (or a slice of one) and a
//! scheme. It reports every raw occurrence: `Start` and `End` markers for
//! delimited labels, `Single` labels for tokens. Pairing markers into regions
//! is the tracker's job.
//!
//! All offsets are character offsets. Regex matches are byte ranges, so they
//! are converted through [`CharOffsets`].

use crate::label::{Label, LabelEnd, LabelKind, LabelMap};
use crate::scheme::{LabelRule, Scheme, SearchStrategy};

/// Maps byte offsets of a string to character offsets.
pub(crate) struct CharOffsets {
    byte_starts: Vec<usize>,
}

impl CharOffsets {
    pub(crate) fn new(text: &str) -> Self {
        Self {
            byte_starts: text.char_indices().map(|(i, _)| i).collect(),
        }
    }

    /// Character offset of a byte offset on a char boundary.
    pub(crate) fn char_at(&self, byte: usize) -> usize {
        match self.byte_starts.binary_search(&byte) {
            Ok(i) | Err(i) => i,
        }
    }
}

/// A token produced by a separator strategy, in character offsets.
struct Token<'a> {
    start: usize,
    end: usize,
    text: &'a str,
}

fn tokenize<'a>(text: &'a str, strategy: &SearchStrategy) -> Vec<Token<'a>> {
    let mut tokens = Vec::new();
    if let SearchStrategy::SingleChar = strategy {
        for (i, (byte, c)) in text.char_indices().enumerate() {
            tokens.push(Token {
                start: i,
                end: i + 1,
                text: &text[byte..byte + c.len_utf8()],
            });
        }
        return tokens;
    }

    let mut current: Option<(usize, usize)> = None;
    let mut char_index = 0;
    for (byte, c) in text.char_indices() {
        if strategy.is_separator(c) {
            if let Some((start, start_byte)) = current.take() {
                tokens.push(Token {
                    start,
                    end: char_index,
                    text: &text[start_byte..byte],
                });
            }
        } else if current.is_none() {
            current = Some((char_index, byte));
        }
        char_index += 1;
    }
    if let Some((start, start_byte)) = current {
        tokens.push(Token {
            start,
            end: char_index,
            text: &text[start_byte..],
        });
    }
    tokens
}

/// Returns true if the character at `index` follows an odd number of
/// backslashes.
fn is_escaped(chars: &[char], index: usize) -> bool {
    let backslashes = chars[..index.min(chars.len())]
        .iter()
        .rev()
        .take_while(|&&c| c == '\\')
        .count();
    backslashes % 2 == 1
}

/// Runs a delimiter pattern over the text, returning unescaped,
/// non-empty matches as character ranges.
fn delimiter_matches(
    text: &str,
    pattern: &regex::Regex,
    offsets: &CharOffsets,
    chars: &[char],
) -> Vec<(usize, usize)> {
    pattern
        .find_iter(text)
        .filter(|m| !m.as_str().is_empty())
        .map(|m| (offsets.char_at(m.start()), offsets.char_at(m.end())))
        .filter(|&(start, _)| !is_escaped(chars, start))
        .collect()
}

fn base_label(
    rule: &LabelRule,
    scheme: &Scheme,
    order: usize,
    start: usize,
    end: usize,
    kind: LabelKind,
    matched: (usize, usize),
) -> Label {
    let mut label = Label::new(
        rule.name.clone(),
        scheme.name_arc().clone(),
        start,
        LabelEnd::At(end.max(start)),
        kind,
    );
    label.matched = matched;
    label.color = rule.color;
    label.order = order;
    label.multi_line = rule.multi_line;
    label.requires = rule.requires.clone();
    label
}

/// Finds every raw label occurrence in `text`.
///
/// `offset` is added to every reported position; it is non-zero when `text`
/// is a slice of a longer line. Returned lists are ordered by position.
/// Ids are left at their default; they are assigned when labels are
/// committed to a line.
pub fn find_labels(text: &str, offset: usize, scheme: &Scheme) -> LabelMap {
    let offsets = CharOffsets::new(text);
    let chars: Vec<char> = text.chars().collect();
    let mut token_cache: Vec<(&SearchStrategy, Vec<Token<'_>>)> = Vec::new();
    let mut map = LabelMap::new();

    for (order, rule) in scheme.rules().iter().enumerate() {
        if !rule.is_valid() {
            continue;
        }
        let mut found = Vec::new();

        match &rule.strategy {
            SearchStrategy::AllText => {
                if let Some(start) = &rule.start {
                    for (s, e) in delimiter_matches(text, start, &offsets, &chars) {
                        let matched = (s + offset, e + offset);
                        let colored = rule.extension.start_of(matched);
                        found.push(base_label(
                            rule,
                            scheme,
                            order,
                            colored,
                            matched.1,
                            LabelKind::Start,
                            matched,
                        ));
                    }
                }
                if let Some(end) = &rule.end {
                    for (s, e) in delimiter_matches(text, end, &offsets, &chars) {
                        let matched = (s + offset, e + offset);
                        let colored = rule.extension.end_of(matched).max(matched.0);
                        found.push(base_label(
                            rule,
                            scheme,
                            order,
                            matched.0,
                            colored,
                            LabelKind::End,
                            matched,
                        ));
                    }
                }
            }
            strategy => {
                let cached = token_cache.iter().position(|(s, _)| *s == strategy);
                let slot = match cached {
                    Some(slot) => slot,
                    None => {
                        token_cache.push((strategy, tokenize(text, strategy)));
                        token_cache.len() - 1
                    }
                };
                for token in &token_cache[slot].1 {
                    if rule.matches_token(token.text) {
                        let matched = (token.start + offset, token.end + offset);
                        found.push(base_label(
                            rule,
                            scheme,
                            order,
                            matched.0,
                            matched.1,
                            LabelKind::Single,
                            matched,
                        ));
                    }
                }
            }
        }

        if !found.is_empty() {
            found.sort_by_key(|l| (l.matched.0, l.kind == LabelKind::End));
            map.insert(rule.name.clone(), found);
        }
    }

    map
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheme::LabelExtension;
    use linelabel_buffer::Color;

    const STRING: Color = Color::from_u32(0xa6e3a1);
    const COMMENT: Color = Color::from_u32(0x6c7086);
    const KEYWORD: Color = Color::from_u32(0xcba6f7);

    fn scheme() -> Scheme {
        Scheme::builder("test")
            .label(LabelRule::delimited("STRING", STRING, "\"").with_end("\""))
            .label(LabelRule::delimited("COMMENT", COMMENT, "//"))
            .label(LabelRule::token("var", KEYWORD))
            .label(LabelRule::token("NUMBER", KEYWORD).with_pattern(r"\d+"))
            .label(LabelRule::single_char("+", KEYWORD))
            .build()
            .unwrap()
    }

    fn kinds(map: &LabelMap, name: &str) -> Vec<(LabelKind, usize)> {
        map.get(name)
            .map(|v| v.iter().map(|l| (l.kind, l.start)).collect())
            .unwrap_or_default()
    }

    // ==================== AllText ====================

    #[test]
    fn test_delimiters_become_start_and_end_markers() {
        let map = find_labels(r#"x = "a""#, 0, &scheme());
        assert_eq!(
            kinds(&map, "STRING"),
            vec![
                (LabelKind::Start, 4),
                (LabelKind::End, 4),
                (LabelKind::Start, 6),
                (LabelKind::End, 6),
            ]
        );
    }

    #[test]
    fn test_escaped_delimiter_skipped() {
        let map = find_labels(r#"a \" b " c"#, 0, &scheme());
        let starts: Vec<usize> = map["STRING"]
            .iter()
            .filter(|l| l.kind == LabelKind::Start)
            .map(|l| l.start)
            .collect();
        assert_eq!(starts, vec![7]);
    }

    #[test]
    fn test_double_backslash_does_not_escape() {
        let map = find_labels(r#"\\" x"#, 0, &scheme());
        assert_eq!(map["STRING"][0].start, 2);
    }

    #[test]
    fn test_comment_without_end_pattern() {
        let map = find_labels("print(1) // note", 0, &scheme());
        assert_eq!(kinds(&map, "COMMENT"), vec![(LabelKind::Start, 9)]);
        assert_eq!(map["COMMENT"][0].matched, (9, 11));
    }

    #[test]
    fn test_offsets_are_characters_not_bytes() {
        let map = find_labels("é \"x\"", 0, &scheme());
        assert_eq!(map["STRING"][0].start, 2);
    }

    #[test]
    fn test_offset_shifts_positions() {
        let map = find_labels("var", 10, &scheme());
        assert_eq!(map["var"][0].start, 10);
        assert_eq!(map["var"][0].end, LabelEnd::At(13));
    }

    #[test]
    fn test_extension_excludes_delimiters() {
        let scheme = Scheme::builder("markup")
            .label(
                LabelRule::delimited("SCRIPT", STRING, "<script[^>]*>")
                    .with_end("</script>")
                    .with_extension(LabelExtension::exclude_delimiters()),
            )
            .build()
            .unwrap();
        let map = find_labels("<script>x</script>", 0, &scheme);
        let labels = &map["SCRIPT"];
        assert_eq!(labels[0].kind, LabelKind::Start);
        assert_eq!(labels[0].start, 8);
        assert_eq!(labels[0].matched, (0, 8));
        assert_eq!(labels[1].kind, LabelKind::End);
        assert_eq!(labels[1].end, LabelEnd::At(9));
        assert_eq!(labels[1].matched, (9, 18));
    }

    #[test]
    fn test_invalid_rule_never_matches() {
        let scheme = Scheme::builder("broken")
            .label(LabelRule::delimited("BAD", STRING, "("))
            .label(LabelRule::token("ok", KEYWORD))
            .build()
            .unwrap();
        let map = find_labels("( ok", 0, &scheme);
        assert!(!map.contains_key("BAD"));
        assert!(map.contains_key("ok"));
    }

    // ==================== Tokens ====================

    #[test]
    fn test_token_equal_to_name_is_single() {
        let map = find_labels("var x = variable;", 0, &scheme());
        assert_eq!(kinds(&map, "var"), vec![(LabelKind::Single, 0)]);
    }

    #[test]
    fn test_token_pattern() {
        let map = find_labels("x = 12 + y3", 0, &scheme());
        assert_eq!(kinds(&map, "NUMBER"), vec![(LabelKind::Single, 4)]);
        assert_eq!(map["NUMBER"][0].end, LabelEnd::At(6));
    }

    #[test]
    fn test_single_char_tokens() {
        let map = find_labels("a+b++", 0, &scheme());
        assert_eq!(
            kinds(&map, "+"),
            vec![(LabelKind::Single, 1), (LabelKind::Single, 3), (LabelKind::Single, 4)]
        );
    }

    #[test]
    fn test_labels_carry_rule_metadata() {
        let map = find_labels("var", 0, &scheme());
        let label = &map["var"][0];
        assert_eq!(label.color, KEYWORD);
        assert_eq!(label.order, 2);
        assert_eq!(&*label.scheme, "test");
    }
}
