// Chunk: docs/chunks/line_labeling - Immutable grammar configuration

//! Schemes: the per-grammar labeling configuration.
//!
//! A [`Scheme`] is immutable once built and shared behind an `Arc`. It holds
//! one [`LabelRule`] per label name, the precedence list used to pick a color
//! when labels overlap, and the sub-schemes that embedded regions dispatch to.
//! Schemes are assembled with [`SchemeBuilder`], which enforces the naming
//! invariants and completes the precedence list.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use linelabel_buffer::Color;
use regex::Regex;

use crate::error::SchemeError;
use crate::label::LabelName;

/// Separator characters used by [`SearchStrategy::default_separators`].
pub const DEFAULT_SEPARATORS: &str = " \t()[]{}<>;:,.=+-*/%!&|^~?\"'`\\";

// =============================================================================
// Rules
// =============================================================================

/// How the finder slices a line into candidates for a label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchStrategy {
    /// Run the start and end patterns over the whole line.
    AllText,
    /// Split on the given separators (plus any whitespace) and compare tokens.
    SeparatorSet(Arc<[char]>),
    /// Every character is a token of its own.
    SingleChar,
}

impl SearchStrategy {
    /// A separator strategy splitting on the given characters.
    pub fn separators(chars: &str) -> Self {
        SearchStrategy::SeparatorSet(chars.chars().collect())
    }

    /// A separator strategy using [`DEFAULT_SEPARATORS`].
    pub fn default_separators() -> Self {
        Self::separators(DEFAULT_SEPARATORS)
    }

    /// Returns true if `c` ends a token under this strategy.
    pub fn is_separator(&self, c: char) -> bool {
        match self {
            SearchStrategy::AllText => false,
            SearchStrategy::SeparatorSet(chars) => c.is_whitespace() || chars.contains(&c),
            SearchStrategy::SingleChar => true,
        }
    }
}

/// Adjustment applied to one side of a delimiter match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Adjust {
    /// Move the reported offset by a number of characters.
    By(isize),
    /// Leave the delimiter text out of the colored span.
    Exclude,
}

impl Default for Adjust {
    fn default() -> Self {
        Adjust::By(0)
    }
}

fn shift(offset: usize, by: isize) -> usize {
    if by >= 0 {
        offset.saturating_add(by as usize)
    } else {
        offset.saturating_sub(by.unsigned_abs())
    }
}

/// Grows or shrinks the colored span of a delimited label.
///
/// `start` applies to the opening delimiter and `end` to the closing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LabelExtension {
    pub start: Adjust,
    pub end: Adjust,
}

impl LabelExtension {
    pub fn new(start: Adjust, end: Adjust) -> Self {
        Self { start, end }
    }

    /// Colors only the text between the delimiters.
    pub fn exclude_delimiters() -> Self {
        Self::new(Adjust::Exclude, Adjust::Exclude)
    }

    /// Reported start of a region opened by a delimiter at `matched`.
    pub fn start_of(&self, matched: (usize, usize)) -> usize {
        match self.start {
            Adjust::By(by) => shift(matched.0, by),
            Adjust::Exclude => matched.1,
        }
    }

    /// Reported end of a region closed by a delimiter at `matched`.
    pub fn end_of(&self, matched: (usize, usize)) -> usize {
        match self.end {
            Adjust::By(by) => shift(matched.1, by),
            Adjust::Exclude => matched.0,
        }
    }
}

/// Compiles a pattern, logging and returning `None` when it is malformed.
fn compile_pattern(label: &str, pattern: &str) -> Option<Regex> {
    match Regex::new(pattern) {
        Ok(regex) => Some(regex),
        Err(err) => {
            tracing::warn!(label, pattern, %err, "invalid label pattern; label will never match");
            None
        }
    }
}

/// How one label name is found, colored and carried across lines.
#[derive(Debug, Clone)]
pub struct LabelRule {
    pub name: LabelName,
    pub color: Color,
    pub strategy: SearchStrategy,
    /// Opening delimiter for `AllText`, token pattern for the other strategies.
    pub start: Option<Regex>,
    /// Closing delimiter for `AllText`.
    pub end: Option<Regex>,
    pub multi_line: bool,
    pub extension: LabelExtension,
    pub requires: Option<LabelName>,
    valid: bool,
}

impl LabelRule {
    fn with_strategy(name: &str, color: Color, strategy: SearchStrategy) -> Self {
        Self {
            name: name.into(),
            color,
            strategy,
            start: None,
            end: None,
            multi_line: false,
            extension: LabelExtension::default(),
            requires: None,
            valid: true,
        }
    }

    /// A delimited label found by running `start` over the whole line.
    ///
    /// Without an end pattern the label runs to the end of the line.
    pub fn delimited(name: &str, color: Color, start: &str) -> Self {
        let mut rule = Self::with_strategy(name, color, SearchStrategy::AllText);
        rule.start = compile_pattern(name, start);
        rule.valid = rule.start.is_some();
        rule
    }

    /// A token label matched against separator-delimited words.
    ///
    /// Matches tokens equal to `name` until a pattern is given with
    /// [`with_pattern`](Self::with_pattern).
    pub fn token(name: &str, color: Color) -> Self {
        Self::with_strategy(name, color, SearchStrategy::default_separators())
    }

    /// A label matched against individual characters.
    pub fn single_char(name: &str, color: Color) -> Self {
        Self::with_strategy(name, color, SearchStrategy::SingleChar)
    }

    /// Sets the closing delimiter pattern.
    pub fn with_end(mut self, pattern: &str) -> Self {
        self.end = compile_pattern(&self.name, pattern);
        self.valid &= self.end.is_some();
        self
    }

    /// Sets a pattern a whole token must match.
    pub fn with_pattern(mut self, pattern: &str) -> Self {
        self.start = compile_pattern(&self.name, &format!("^(?:{})$", pattern));
        self.valid &= self.start.is_some();
        self
    }

    /// Replaces the separator set.
    pub fn with_separators(mut self, separators: &str) -> Self {
        self.strategy = SearchStrategy::separators(separators);
        self
    }

    /// Allows the label to stay open into the following line.
    pub fn multi_line(mut self) -> Self {
        self.multi_line = true;
        self
    }

    pub fn with_extension(mut self, extension: LabelExtension) -> Self {
        self.extension = extension;
        self
    }

    /// Makes the label active only inside a label named `container`.
    pub fn requires(mut self, container: &str) -> Self {
        self.requires = Some(container.into());
        self
    }

    /// Returns false if one of the rule's patterns failed to compile.
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Returns true if a token produced by the rule's strategy is this label.
    pub fn matches_token(&self, token: &str) -> bool {
        match &self.start {
            Some(pattern) => token == &*self.name || pattern.is_match(token),
            None => token == &*self.name,
        }
    }
}

// =============================================================================
// Scheme
// =============================================================================

/// One precedence entry: a single label, or a group whose members tie.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Precedence {
    Single(LabelName),
    Group(Vec<LabelName>),
}

impl Precedence {
    pub fn names(&self) -> &[LabelName] {
        match self {
            Precedence::Single(name) => std::slice::from_ref(name),
            Precedence::Group(names) => names,
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names().iter().any(|n| &**n == name)
    }
}

/// The labeling configuration of one grammar.
#[derive(Debug)]
pub struct Scheme {
    name: Arc<str>,
    base_color: Color,
    rules: Vec<LabelRule>,
    index: HashMap<LabelName, usize>,
    precedence: Vec<Precedence>,
    sub_schemes: HashMap<LabelName, Arc<Scheme>>,
}

impl Scheme {
    /// Starts building a scheme.
    pub fn builder(name: &str) -> SchemeBuilder {
        SchemeBuilder::new(name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Shared handle to the scheme name, as stored in labels.
    pub fn name_arc(&self) -> &Arc<str> {
        &self.name
    }

    /// Color of text no label claims.
    pub fn base_color(&self) -> Color {
        self.base_color
    }

    /// Rules in declaration order.
    pub fn rules(&self) -> &[LabelRule] {
        &self.rules
    }

    pub fn rule(&self, name: &str) -> Option<&LabelRule> {
        self.index.get(name).map(|&i| &self.rules[i])
    }

    /// Declaration index of a label.
    pub fn order_of(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// The complete precedence list, highest priority first.
    pub fn precedence(&self) -> &[Precedence] {
        &self.precedence
    }

    /// Index of the precedence entry holding `name`; lower ranks win.
    pub fn rank_of(&self, name: &str) -> Option<usize> {
        self.precedence.iter().position(|entry| entry.contains(name))
    }

    /// Returns the scheme a region labeled `name` is dispatched to.
    pub fn sub_scheme(&self, name: &str) -> Option<&Arc<Scheme>> {
        self.sub_schemes.get(name)
    }

    pub fn has_sub_schemes(&self) -> bool {
        !self.sub_schemes.is_empty()
    }

    /// Iterates over `(label name, sub-scheme)` pairs.
    pub fn sub_schemes(&self) -> impl Iterator<Item = (&LabelName, &Arc<Scheme>)> {
        self.sub_schemes.iter()
    }
}

/// Assembles a [`Scheme`].
///
/// Precedence names omitted by the caller are appended once in definition
/// order, so every label can be rendered.
pub struct SchemeBuilder {
    name: Arc<str>,
    base_color: Color,
    rules: Vec<LabelRule>,
    precedence: Vec<Precedence>,
    sub_schemes: Vec<(LabelName, Arc<Scheme>)>,
}

impl SchemeBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.into(),
            base_color: Color::Default,
            rules: Vec::new(),
            precedence: Vec::new(),
            sub_schemes: Vec::new(),
        }
    }

    pub fn base_color(mut self, color: Color) -> Self {
        self.base_color = color;
        self
    }

    pub fn label(mut self, rule: LabelRule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn labels(mut self, rules: impl IntoIterator<Item = LabelRule>) -> Self {
        self.rules.extend(rules);
        self
    }

    /// Copies the rules of another scheme.
    ///
    /// Rules whose names are already defined on this builder are skipped, so
    /// overrides must be added before calling this.
    pub fn extend_from(mut self, other: &Scheme) -> Self {
        let defined: HashSet<LabelName> = self.rules.iter().map(|r| r.name.clone()).collect();
        self.rules.extend(
            other
                .rules
                .iter()
                .filter(|rule| !defined.contains(&rule.name))
                .cloned(),
        );
        self
    }

    pub fn precedence(mut self, name: &str) -> Self {
        self.precedence.push(Precedence::Single(name.into()));
        self
    }

    /// Adds a tie group. Within a group the earliest-starting label wins.
    pub fn precedence_group(mut self, names: &[&str]) -> Self {
        match names {
            [] => {}
            [single] => self.precedence.push(Precedence::Single((*single).into())),
            _ => self
                .precedence
                .push(Precedence::Group(names.iter().map(|&n| n.into()).collect())),
        }
        self
    }

    /// Dispatches regions labeled `label` to `scheme`.
    pub fn sub_scheme(mut self, label: &str, scheme: Arc<Scheme>) -> Self {
        self.sub_schemes.push((label.into(), scheme));
        self
    }

    /// Validates the configuration and builds the scheme.
    pub fn build(self) -> Result<Scheme, SchemeError> {
        let scheme_name = self.name.to_string();

        let mut index = HashMap::with_capacity(self.rules.len());
        for (i, rule) in self.rules.iter().enumerate() {
            if index.insert(rule.name.clone(), i).is_some() {
                return Err(SchemeError::DuplicateLabel {
                    scheme: scheme_name,
                    label: rule.name.to_string(),
                });
            }
        }

        let mut listed: HashSet<LabelName> = HashSet::new();
        for entry in &self.precedence {
            for name in entry.names() {
                if !index.contains_key(name) {
                    return Err(SchemeError::UnknownPrecedenceLabel {
                        scheme: scheme_name,
                        label: name.to_string(),
                    });
                }
                if !listed.insert(name.clone()) {
                    return Err(SchemeError::DuplicatePrecedenceLabel {
                        scheme: scheme_name,
                        label: name.to_string(),
                    });
                }
            }
        }

        let mut precedence = self.precedence;
        for rule in &self.rules {
            if !listed.contains(&rule.name) {
                precedence.push(Precedence::Single(rule.name.clone()));
            }
        }

        let mut sub_schemes = HashMap::with_capacity(self.sub_schemes.len());
        for (label, scheme) in self.sub_schemes {
            if !index.contains_key(&label) {
                return Err(SchemeError::UnknownSubSchemeLabel {
                    scheme: scheme_name,
                    label: label.to_string(),
                });
            }
            sub_schemes.insert(label, scheme);
        }

        Ok(Scheme {
            name: self.name,
            base_color: self.base_color,
            rules: self.rules,
            index,
            precedence,
            sub_schemes,
        })
    }
}
