// Chunk: docs/chunks/scheme_definitions - Built-in JavaScript, CSS, HTML and Python schemes

//! Built-in schemes.
//!
//! Each function builds one scheme with colors taken from a [`LabelTheme`].
//! HTML embeds the JavaScript and CSS schemes for `<script>` and `<style>`
//! regions, so those are passed in.

use std::sync::Arc;

use linelabel_buffer::Color;

use crate::error::SchemeError;
use crate::scheme::{LabelExtension, LabelRule, Scheme};
use crate::theme::LabelTheme;

const JS_KEYWORDS: &str = "var|let|const|function|return|if|else|for|while|do|switch|case|default|\
break|continue|new|delete|typeof|instanceof|in|of|class|extends|super|import|export|from|as|\
try|catch|finally|throw|async|await|yield|void|with|static|get|set";

const JS_CONSTANTS: &str = "true|false|null|undefined|NaN|Infinity|this";

const CSS_VALUES: &str = "important|inherit|initial|unset|none|auto|block|inline|inline-block|\
flex|grid|absolute|relative|fixed|sticky|solid|dashed|dotted|bold|normal|italic|hidden|visible";

const PY_KEYWORDS: &str = "def|class|return|if|elif|else|for|while|break|continue|pass|import|\
from|as|with|try|except|finally|raise|lambda|yield|global|nonlocal|assert|del|in|is|not|and|or|\
async|await";

const PY_CONSTANTS: &str = "True|False|None|self|cls";

/// Separators for CSS tokens that keep `-`, `.`, `%` and `#` inside words.
const CSS_SEPARATORS: &str = " \t;:,(){}[]\"'";

fn role(theme: &LabelTheme, name: &str) -> Color {
    theme.color_for_role(name).unwrap_or_else(|| theme.base_color())
}

fn operators(theme: &LabelTheme) -> LabelRule {
    LabelRule::single_char("OPERATOR", role(theme, "operator")).with_pattern(r"[-+*/%=<>!&|^~?:]")
}

fn brackets(theme: &LabelTheme) -> LabelRule {
    LabelRule::single_char("BRACKET", role(theme, "punctuation.bracket"))
        .with_pattern(r"[()\[\]{}]")
}

/// JavaScript.
pub fn javascript(theme: &LabelTheme) -> Result<Scheme, SchemeError> {
    Scheme::builder("javascript")
        .base_color(theme.base_color())
        .label(LabelRule::delimited("COMMENT", role(theme, "comment.line"), "//"))
        .label(
            LabelRule::delimited("BLOCK_COMMENT", role(theme, "comment.block"), r"/\*")
                .with_end(r"\*/")
                .multi_line(),
        )
        .label(LabelRule::delimited("STRING_DOUBLE", role(theme, "string"), "\"").with_end("\""))
        .label(LabelRule::delimited("STRING_SINGLE", role(theme, "string"), "'").with_end("'"))
        .label(
            LabelRule::delimited("TEMPLATE", role(theme, "string.template"), "`")
                .with_end("`")
                .multi_line(),
        )
        .label(
            LabelRule::token("NUMBER", role(theme, "number"))
                .with_pattern(r"\d+|0[xX][0-9a-fA-F]+|\d+[eE]\d+"),
        )
        .label(LabelRule::token("KEYWORD", role(theme, "keyword")).with_pattern(JS_KEYWORDS))
        .label(LabelRule::token("CONSTANT", role(theme, "constant")).with_pattern(JS_CONSTANTS))
        .label(operators(theme))
        .label(brackets(theme))
        .precedence_group(&[
            "BLOCK_COMMENT",
            "COMMENT",
            "STRING_DOUBLE",
            "STRING_SINGLE",
            "TEMPLATE",
        ])
        .build()
}

/// CSS.
pub fn css(theme: &LabelTheme) -> Result<Scheme, SchemeError> {
    Scheme::builder("css")
        .base_color(theme.base_color())
        .label(
            LabelRule::delimited("COMMENT", role(theme, "comment.block"), r"/\*")
                .with_end(r"\*/")
                .multi_line(),
        )
        .label(LabelRule::delimited("STRING_DOUBLE", role(theme, "string"), "\"").with_end("\""))
        .label(LabelRule::delimited("STRING_SINGLE", role(theme, "string"), "'").with_end("'"))
        .label(
            LabelRule::token("HEX_COLOR", role(theme, "constant"))
                .with_separators(CSS_SEPARATORS)
                .with_pattern(r"#(?:[0-9a-fA-F]{3,4}|[0-9a-fA-F]{6}|[0-9a-fA-F]{8})"),
        )
        .label(
            LabelRule::token("NUMBER", role(theme, "number"))
                .with_separators(CSS_SEPARATORS)
                .with_pattern(r"-?\d*\.?\d+(?:px|em|rem|%|vh|vw|vmin|vmax|ch|ex|pt|s|ms|deg|fr)?"),
        )
        .label(
            LabelRule::token("AT_RULE", role(theme, "keyword"))
                .with_separators(CSS_SEPARATORS)
                .with_pattern(r"@[A-Za-z-]+"),
        )
        .label(
            LabelRule::token("VALUE", role(theme, "constant.builtin"))
                .with_separators(CSS_SEPARATORS)
                .with_pattern(CSS_VALUES),
        )
        .label(
            LabelRule::single_char("PUNCTUATION", role(theme, "punctuation.delimiter"))
                .with_pattern(r"[{}:;,()]"),
        )
        .precedence_group(&["COMMENT", "STRING_DOUBLE", "STRING_SINGLE"])
        .build()
}

/// HTML with embedded JavaScript and CSS.
pub fn html(
    theme: &LabelTheme,
    javascript: Arc<Scheme>,
    css: Arc<Scheme>,
) -> Result<Scheme, SchemeError> {
    Scheme::builder("html")
        .base_color(theme.base_color())
        .label(
            LabelRule::delimited("COMMENT", role(theme, "comment.block"), "<!--")
                .with_end("-->")
                .multi_line(),
        )
        .label(
            LabelRule::delimited("SCRIPT_BLOCK", role(theme, "embedded"), r"<script\b[^>]*>")
                .with_end("</script>")
                .with_extension(LabelExtension::exclude_delimiters())
                .multi_line(),
        )
        .label(
            LabelRule::delimited("STYLE_BLOCK", role(theme, "embedded"), r"<style\b[^>]*>")
                .with_end("</style>")
                .with_extension(LabelExtension::exclude_delimiters())
                .multi_line(),
        )
        .label(
            LabelRule::delimited("STRING_DOUBLE", role(theme, "string"), "\"")
                .with_end("\"")
                .requires("TAG"),
        )
        .label(
            LabelRule::delimited("STRING_SINGLE", role(theme, "string"), "'")
                .with_end("'")
                .requires("TAG"),
        )
        .label(
            LabelRule::delimited("TAG", role(theme, "tag"), r"</?[A-Za-z][A-Za-z0-9-]*")
                .with_end("/?>")
                .multi_line(),
        )
        .label(
            LabelRule::token("ENTITY", role(theme, "escape"))
                .with_separators(" \t<>\"'")
                .with_pattern("&[A-Za-z]+;|&#[0-9]+;"),
        )
        .precedence("COMMENT")
        .precedence_group(&["SCRIPT_BLOCK", "STYLE_BLOCK"])
        .precedence_group(&["STRING_DOUBLE", "STRING_SINGLE"])
        .sub_scheme("SCRIPT_BLOCK", javascript)
        .sub_scheme("STYLE_BLOCK", css)
        .build()
}

/// Python.
pub fn python(theme: &LabelTheme) -> Result<Scheme, SchemeError> {
    Scheme::builder("python")
        .base_color(theme.base_color())
        .label(LabelRule::delimited("COMMENT", role(theme, "comment.line"), "#"))
        .label(
            LabelRule::delimited("TRIPLE_DOUBLE", role(theme, "string.doc"), "\"\"\"")
                .with_end("\"\"\"")
                .multi_line(),
        )
        .label(
            LabelRule::delimited("TRIPLE_SINGLE", role(theme, "string.doc"), "'''")
                .with_end("'''")
                .multi_line(),
        )
        .label(LabelRule::delimited("STRING_DOUBLE", role(theme, "string"), "\"").with_end("\""))
        .label(LabelRule::delimited("STRING_SINGLE", role(theme, "string"), "'").with_end("'"))
        .label(
            LabelRule::token("NUMBER", role(theme, "number"))
                .with_pattern(r"\d+|0[xXoObB][0-9a-fA-F_]+|\d+[jJ]"),
        )
        .label(LabelRule::token("KEYWORD", role(theme, "keyword")).with_pattern(PY_KEYWORDS))
        .label(LabelRule::token("CONSTANT", role(theme, "constant")).with_pattern(PY_CONSTANTS))
        .label(LabelRule::token("DECORATOR", role(theme, "attribute")).with_pattern(r"@\w+"))
        .label(operators(theme))
        .label(brackets(theme))
        .precedence_group(&[
            "COMMENT",
            "TRIPLE_DOUBLE",
            "TRIPLE_SINGLE",
            "STRING_DOUBLE",
            "STRING_SINGLE",
        ])
        .build()
}
