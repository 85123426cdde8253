// Chunk: docs/chunks/scheme_definitions - JSON scheme definitions

//! Serializable scheme definitions.
//!
//! A [`SchemeDefinition`] is the on-disk form of a [`Scheme`]. Colors are
//! written as `#rrggbb` or as a theme role, and other schemes (a base to
//! extend, sub-schemes for embedded regions) are referenced by name and
//! resolved when the definition is compiled.
//!
//! ```json
//! {
//!   "name": "ini",
//!   "extensions": ["ini", "cfg"],
//!   "labels": [
//!     { "name": "COMMENT", "color": "comment", "start": ";" },
//!     { "name": "SECTION", "color": "type", "start": "\\[", "end": "\\]" },
//!     { "name": "NUMBER", "color": "number", "search": "separators", "pattern": "\\d+" }
//!   ],
//!   "precedence": ["COMMENT", ["SECTION", "NUMBER"]]
//! }
//! ```

use std::collections::BTreeMap;
use std::sync::Arc;

use linelabel_buffer::Color;
use serde::{Deserialize, Serialize};

use crate::error::SchemeError;
use crate::scheme::{Adjust, LabelExtension, LabelRule, Scheme};
use crate::theme::LabelTheme;

/// Search strategy as written in a definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchKind {
    #[default]
    AllText,
    Separators,
    SingleChar,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NamedAdjust {
    Exclude,
}

/// One side of a label extension: a character count or `"exclude"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AdjustDefinition {
    By(isize),
    Named(NamedAdjust),
}

impl Default for AdjustDefinition {
    fn default() -> Self {
        AdjustDefinition::By(0)
    }
}

impl From<AdjustDefinition> for Adjust {
    fn from(def: AdjustDefinition) -> Self {
        match def {
            AdjustDefinition::By(by) => Adjust::By(by),
            AdjustDefinition::Named(NamedAdjust::Exclude) => Adjust::Exclude,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExtensionDefinition {
    pub start: AdjustDefinition,
    pub end: AdjustDefinition,
}

impl From<ExtensionDefinition> for LabelExtension {
    fn from(def: ExtensionDefinition) -> Self {
        LabelExtension::new(def.start.into(), def.end.into())
    }
}

/// On-disk form of a [`LabelRule`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LabelDefinition {
    pub name: String,
    pub color: String,
    #[serde(default)]
    pub search: SearchKind,
    /// Replaces the default separator set for `separators` labels.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub separators: Option<String>,
    /// Opening delimiter pattern of an `all_text` label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,
    /// Pattern a whole token must match, for token labels.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(default)]
    pub multi_line: bool,
    #[serde(default)]
    pub extension: ExtensionDefinition,
    /// Name of a label this one must lie inside.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requires: Option<String>,
}

/// A precedence entry: a label name or a tie group of names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PrecedenceDefinition {
    Single(String),
    Group(Vec<String>),
}

/// On-disk form of a [`Scheme`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SchemeDefinition {
    pub name: String,
    /// File extensions, without the dot.
    #[serde(default)]
    pub extensions: Vec<String>,
    #[serde(default)]
    pub aliases: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_color: Option<String>,
    /// Scheme whose labels this one inherits.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extends: Option<String>,
    #[serde(default)]
    pub labels: Vec<LabelDefinition>,
    #[serde(default)]
    pub precedence: Vec<PrecedenceDefinition>,
    /// Label name to the name of the scheme its regions dispatch to.
    #[serde(default)]
    pub sub_schemes: BTreeMap<String, String>,
}

impl SchemeDefinition {
    /// Compiles the definition into a scheme.
    ///
    /// `lookup` resolves scheme names used by `extends` and `sub_schemes`.
    /// A base scheme contributes the labels this definition does not
    /// redefine, its precedence when none is given here, its sub-schemes
    /// and its base color.
    pub fn compile<F>(&self, theme: &LabelTheme, lookup: F) -> Result<Scheme, SchemeError>
    where
        F: Fn(&str) -> Option<Arc<Scheme>>,
    {
        let resolve = |referenced: &str| {
            lookup(referenced).ok_or_else(|| SchemeError::UnknownScheme {
                scheme: self.name.clone(),
                referenced: referenced.to_string(),
            })
        };
        let base = self.extends.as_deref().map(|name| resolve(name)).transpose()?;

        let base_color = match &self.base_color {
            Some(value) => self.color(theme, "", value)?,
            None => base
                .as_ref()
                .map_or_else(|| theme.base_color(), |b| b.base_color()),
        };

        let mut builder = Scheme::builder(&self.name).base_color(base_color);
        for label in &self.labels {
            builder = builder.label(self.rule(theme, label)?);
        }
        if let Some(base) = &base {
            builder = builder.extend_from(base);
        }

        if self.precedence.is_empty() {
            if let Some(base) = &base {
                for entry in base.precedence() {
                    let names: Vec<&str> = entry.names().iter().map(|n| &**n).collect();
                    builder = builder.precedence_group(&names);
                }
            }
        }
        for entry in &self.precedence {
            builder = match entry {
                PrecedenceDefinition::Single(name) => builder.precedence(name),
                PrecedenceDefinition::Group(names) => {
                    let names: Vec<&str> = names.iter().map(String::as_str).collect();
                    builder.precedence_group(&names)
                }
            };
        }

        if let Some(base) = &base {
            for (label, scheme) in base.sub_schemes() {
                if !self.sub_schemes.contains_key(&**label) {
                    builder = builder.sub_scheme(label, Arc::clone(scheme));
                }
            }
        }
        for (label, referenced) in &self.sub_schemes {
            builder = builder.sub_scheme(label, resolve(referenced)?);
        }

        builder.build()
    }

    fn rule(&self, theme: &LabelTheme, def: &LabelDefinition) -> Result<LabelRule, SchemeError> {
        let color = self.color(theme, &def.name, &def.color)?;
        let mut rule = match def.search {
            SearchKind::AllText => {
                let start = def.start.as_deref().ok_or_else(|| SchemeError::MissingStartPattern {
                    scheme: self.name.clone(),
                    label: def.name.clone(),
                })?;
                let mut rule = LabelRule::delimited(&def.name, color, start);
                if let Some(end) = &def.end {
                    rule = rule.with_end(end);
                }
                rule
            }
            SearchKind::Separators => {
                let mut rule = LabelRule::token(&def.name, color);
                if let Some(separators) = &def.separators {
                    rule = rule.with_separators(separators);
                }
                rule
            }
            SearchKind::SingleChar => LabelRule::single_char(&def.name, color),
        };
        if def.search != SearchKind::AllText {
            if let Some(pattern) = &def.pattern {
                rule = rule.with_pattern(pattern);
            }
        }
        if def.multi_line {
            rule = rule.multi_line();
        }
        if let Some(container) = &def.requires {
            rule = rule.requires(container);
        }
        Ok(rule.with_extension(def.extension.into()))
    }

    fn color(&self, theme: &LabelTheme, label: &str, value: &str) -> Result<Color, SchemeError> {
        theme.resolve(value).ok_or_else(|| SchemeError::InvalidColor {
            scheme: self.name.clone(),
            label: label.to_string(),
            color: value.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheme::{Precedence, SearchStrategy};
    use crate::theme::catppuccin;

    fn no_schemes(_: &str) -> Option<Arc<Scheme>> {
        None
    }

    fn parse(json: &str) -> SchemeDefinition {
        serde_json::from_str(json).unwrap()
    }

    // ==================== Parsing ====================

    #[test]
    fn test_minimal_definition() {
        let def = parse(r#"{ "name": "plain" }"#);
        assert!(def.labels.is_empty());
        let scheme = def.compile(&LabelTheme::default(), no_schemes).unwrap();
        assert_eq!(scheme.name(), "plain");
        assert_eq!(scheme.base_color(), catppuccin::TEXT);
    }

    #[test]
    fn test_extension_forms() {
        let def: LabelDefinition = serde_json::from_str(
            r#"{ "name": "B", "color": "embedded", "start": "<b>", "end": "</b>",
                 "extension": { "start": "exclude", "end": -1 } }"#,
        )
        .unwrap();
        assert_eq!(def.extension.start, AdjustDefinition::Named(NamedAdjust::Exclude));
        assert_eq!(def.extension.end, AdjustDefinition::By(-1));
        let ext: LabelExtension = def.extension.into();
        assert_eq!(ext, LabelExtension::new(Adjust::Exclude, Adjust::By(-1)));
    }

    #[test]
    fn test_unknown_field_rejected() {
        let result: Result<SchemeDefinition, _> =
            serde_json::from_str(r##"{ "name": "x", "colour": "#000000" }"##);
        assert!(result.is_err());
    }

    // ==================== Compiling ====================

    #[test]
    fn test_compile_rules_and_precedence() {
        let def = parse(
            r##"{
                "name": "ini",
                "labels": [
                    { "name": "COMMENT", "color": "comment", "start": ";" },
                    { "name": "SECTION", "color": "#112233", "start": "\\[", "end": "\\]" },
                    { "name": "NUMBER", "color": "number", "search": "separators", "pattern": "\\d+" }
                ],
                "precedence": ["COMMENT", ["SECTION", "NUMBER"]]
            }"##,
        );
        let scheme = def.compile(&LabelTheme::default(), no_schemes).unwrap();

        let section = scheme.rule("SECTION").unwrap();
        assert_eq!(section.color, Color::from_u32(0x112233));
        assert!(section.end.is_some());

        let number = scheme.rule("NUMBER").unwrap();
        assert!(matches!(number.strategy, SearchStrategy::SeparatorSet(_)));
        assert!(number.matches_token("42"));
        assert!(!number.matches_token("4x"));

        assert_eq!(scheme.precedence().len(), 2);
        assert!(matches!(&scheme.precedence()[1], Precedence::Group(names) if names.len() == 2));
    }

    #[test]
    fn test_invalid_color() {
        let def = parse(r#"{ "name": "x", "labels": [ { "name": "A", "color": "chartreuse", "start": "a" } ] }"#);
        let err = def.compile(&LabelTheme::default(), no_schemes).unwrap_err();
        assert!(matches!(err, SchemeError::InvalidColor { ref label, .. } if label == "A"));
    }

    #[test]
    fn test_delimited_label_needs_start() {
        let def = parse(r#"{ "name": "x", "labels": [ { "name": "A", "color": "string" } ] }"#);
        let err = def.compile(&LabelTheme::default(), no_schemes).unwrap_err();
        assert!(matches!(err, SchemeError::MissingStartPattern { .. }));
    }

    #[test]
    fn test_invalid_regex_degrades_to_never_matching() {
        let def = parse(r#"{ "name": "x", "labels": [ { "name": "A", "color": "string", "start": "(" } ] }"#);
        let scheme = def.compile(&LabelTheme::default(), no_schemes).unwrap();
        assert!(!scheme.rule("A").unwrap().is_valid());
    }

    #[test]
    fn test_unknown_sub_scheme_reference() {
        let def = parse(
            r#"{ "name": "x",
                 "labels": [ { "name": "A", "color": "embedded", "start": "<a>", "end": "</a>" } ],
                 "sub_schemes": { "A": "missing" } }"#,
        );
        let err = def.compile(&LabelTheme::default(), no_schemes).unwrap_err();
        assert!(
            matches!(err, SchemeError::UnknownScheme { ref referenced, .. } if referenced == "missing")
        );
    }

    #[test]
    fn test_extends_inherits_labels_and_color() {
        let base = Arc::new(
            Scheme::builder("base")
                .base_color(catppuccin::SUBTEXT0)
                .label(LabelRule::delimited("COMMENT", catppuccin::OVERLAY0, "#"))
                .label(LabelRule::token("if", catppuccin::MAUVE))
                .build()
                .unwrap(),
        );
        let def = parse(
            r#"{ "name": "child", "extends": "base",
                 "labels": [ { "name": "if", "color": "keyword.control", "search": "separators" } ] }"#,
        );
        let lookup = |name: &str| (name == "base").then(|| Arc::clone(&base));
        let scheme = def.compile(&LabelTheme::default(), lookup).unwrap();

        assert_eq!(scheme.base_color(), catppuccin::SUBTEXT0);
        assert_eq!(scheme.rules().len(), 2);
        assert_eq!(scheme.order_of("if"), Some(0));
        assert!(scheme.rule("COMMENT").is_some());
    }
}
