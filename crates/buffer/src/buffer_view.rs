// Chunk: docs/chunks/line_source - LineSource trait and renderer-facing color types
//!
//! Line source abstraction and styled output types.
//!
//! The labeling engine never owns text. It reads lines through the
//! [`LineSource`] trait, which any editor buffer can implement, and hands the
//! renderer per-character colors or whole [`StyledLine`]s.
//!
//! # Styling
//!
//! - [`Color`]: the theme default or a 24-bit RGB value
//! - [`Span`]: a run of text with one color
//! - [`StyledLine`]: the spans of a single line

use std::fmt;
use std::str::FromStr;

// =============================================================================
// LineSource
// =============================================================================

/// Read access to an editor's lines.
///
/// Adjacency is positional: the previous line of `n` is `n - 1` and the next
/// line is `n + 1`. The trait is object-safe.
pub trait LineSource {
    /// Returns the number of lines. An empty document still has one line.
    fn line_count(&self) -> usize;

    /// Returns the text of a line without its trailing newline, or `None` if
    /// the index is out of bounds.
    fn line(&self, line: usize) -> Option<&str>;

    /// Returns the text of the line before `line`, if any.
    fn previous_line(&self, line: usize) -> Option<&str> {
        line.checked_sub(1).and_then(|prev| self.line(prev))
    }

    /// Returns the text of the line after `line`, if any.
    fn next_line(&self, line: usize) -> Option<&str> {
        self.line(line + 1)
    }
}

impl LineSource for Vec<String> {
    fn line_count(&self) -> usize {
        self.len()
    }

    fn line(&self, line: usize) -> Option<&str> {
        self.get(line).map(String::as_str)
    }
}

impl LineSource for [&str] {
    fn line_count(&self) -> usize {
        self.len()
    }

    fn line(&self, line: usize) -> Option<&str> {
        self.get(line).copied()
    }
}

// =============================================================================
// Color
// =============================================================================

/// Error returned when a color string is not `#rrggbb`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("expected a color of the form #rrggbb, got `{0}`")]
pub struct ParseColorError(pub String);

/// A glyph color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Color {
    /// The renderer's default foreground.
    #[default]
    Default,
    /// 24-bit RGB color.
    Rgb { r: u8, g: u8, b: u8 },
}

impl Color {
    /// Creates an RGB color from a `0xRRGGBB` value.
    pub const fn from_u32(value: u32) -> Self {
        Color::Rgb {
            r: ((value >> 16) & 0xff) as u8,
            g: ((value >> 8) & 0xff) as u8,
            b: (value & 0xff) as u8,
        }
    }
}

impl FromStr for Color {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s
            .trim()
            .strip_prefix('#')
            .ok_or_else(|| ParseColorError(s.to_string()))?;
        if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ParseColorError(s.to_string()));
        }
        let value = u32::from_str_radix(hex, 16).map_err(|_| ParseColorError(s.to_string()))?;
        Ok(Color::from_u32(value))
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::Default => write!(f, "default"),
            Color::Rgb { r, g, b } => write!(f, "#{:02x}{:02x}{:02x}", r, g, b),
        }
    }
}

// =============================================================================
// Span and StyledLine
// =============================================================================

/// A contiguous run of text drawn in one color.
#[derive(Debug, Clone, PartialEq)]
pub struct Span {
    /// The text content of this span.
    pub text: String,
    /// The color applied to this text.
    pub color: Color,
}

impl Span {
    /// Creates a new span with the given text and color.
    pub fn new(text: impl Into<String>, color: Color) -> Self {
        Self {
            text: text.into(),
            color,
        }
    }

    /// Creates a span in the default color.
    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(text, Color::Default)
    }
}

/// A line as the renderer sees it: a sequence of colored spans.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StyledLine {
    /// The spans comprising this line.
    pub spans: Vec<Span>,
}

impl StyledLine {
    /// Creates a new styled line from spans.
    pub fn new(spans: Vec<Span>) -> Self {
        Self { spans }
    }

    /// Creates an empty line.
    pub fn empty() -> Self {
        Self { spans: vec![] }
    }

    /// Returns true if the line has no spans.
    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    /// Returns the total character count across all spans.
    pub fn char_count(&self) -> usize {
        self.spans.iter().map(|s| s.text.chars().count()).sum()
    }

    /// Returns the concatenated text of all spans.
    pub fn text(&self) -> String {
        self.spans.iter().map(|s| s.text.as_str()).collect()
    }

    /// Appends a span, merging it into the previous one when the colors match.
    pub fn push(&mut self, span: Span) {
        if span.text.is_empty() {
            return;
        }
        if let Some(last) = self.spans.last_mut() {
            if last.color == span.color {
                last.text.push_str(&span.text);
                return;
            }
        }
        self.spans.push(span);
    }
}
