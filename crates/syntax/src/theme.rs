// Chunk: docs/chunks/scheme_definitions - Catppuccin Mocha palette for label roles

//! Color theme mapping label roles to colors.
//!
//! Scheme definitions name colors either as `#rrggbb` or by role
//! ("keyword", "string", "comment.block", ...). A [`LabelTheme`] resolves
//! roles to colors using the Catppuccin Mocha palette.

use std::collections::HashMap;

use linelabel_buffer::Color;

/// Catppuccin Mocha color palette constants.
pub mod catppuccin {
    use linelabel_buffer::Color;

    // Accent colors
    pub const MAUVE: Color = Color::from_u32(0xcba6f7);
    pub const BLUE: Color = Color::from_u32(0x89b4fa);
    pub const SAPPHIRE: Color = Color::from_u32(0x74c7ec);
    pub const GREEN: Color = Color::from_u32(0xa6e3a1);
    pub const TEAL: Color = Color::from_u32(0x94e2d5);
    pub const PINK: Color = Color::from_u32(0xf5c2e7);
    pub const PEACH: Color = Color::from_u32(0xfab387);
    pub const YELLOW: Color = Color::from_u32(0xf9e2af);
    pub const MAROON: Color = Color::from_u32(0xeba0ac);
    pub const RED: Color = Color::from_u32(0xf38ba8);
    pub const LAVENDER: Color = Color::from_u32(0xb4befe);
    pub const SKY: Color = Color::from_u32(0x89dceb);

    // Surface/text colors
    pub const OVERLAY0: Color = Color::from_u32(0x6c7086);
    pub const SUBTEXT0: Color = Color::from_u32(0xa6adc8);
    pub const TEXT: Color = Color::from_u32(0xcdd6f4);
}

/// A mapping from label roles to colors.
///
/// Lookups try the exact role first, then progressively shorter dotted
/// prefixes, so "comment.block" falls back to "comment".
pub struct LabelTheme {
    colors: HashMap<&'static str, Color>,
    base: Color,
}

impl LabelTheme {
    /// Creates the Catppuccin Mocha theme.
    pub fn catppuccin_mocha() -> Self {
        use catppuccin::*;

        let colors = HashMap::from([
            ("keyword", MAUVE),
            ("function", BLUE),
            ("type", YELLOW),
            ("constructor", SAPPHIRE),
            ("string", GREEN),
            ("string.template", TEAL),
            ("escape", PINK),
            ("constant", PEACH),
            ("number", PEACH),
            ("comment", OVERLAY0),
            ("variable.builtin", RED),
            ("variable.parameter", MAROON),
            ("property", LAVENDER),
            ("label", SAPPHIRE),
            ("punctuation", SUBTEXT0),
            ("operator", SKY),
            ("attribute", YELLOW),
            ("tag", BLUE),
            ("embedded", PINK),
            ("text", TEXT),
        ]);

        Self { colors, base: TEXT }
    }

    /// Returns the color for a role, if defined.
    pub fn color_for_role(&self, role: &str) -> Option<Color> {
        if let Some(color) = self.colors.get(role) {
            return Some(*color);
        }

        let mut prefix = role;
        while let Some(dot_pos) = prefix.rfind('.') {
            prefix = &prefix[..dot_pos];
            if let Some(color) = self.colors.get(prefix) {
                return Some(*color);
            }
        }

        None
    }

    /// Color of unlabeled text.
    pub fn base_color(&self) -> Color {
        self.base
    }

    /// Resolves a color written as `#rrggbb` or as a role.
    pub fn resolve(&self, value: &str) -> Option<Color> {
        if value.trim_start().starts_with('#') {
            return value.parse().ok();
        }
        self.color_for_role(value.trim())
    }

    /// Known roles, sorted.
    pub fn roles(&self) -> Vec<&'static str> {
        let mut roles: Vec<_> = self.colors.keys().copied().collect();
        roles.sort_unstable();
        roles
    }
}

impl Default for LabelTheme {
    fn default() -> Self {
        Self::catppuccin_mocha()
    }
}
