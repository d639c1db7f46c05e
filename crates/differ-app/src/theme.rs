// Diff colours: built-in defaults and their resolution from settings.

use differ_core::{Color, Decoration};
use owo_colors::Rgb;

use crate::settings::ColorSettings;

pub const CHANGED_LINE: &str = "#505000";
pub const DETAIL_ADD: &str = "#004212";
pub const DETAIL_DEL: &str = "#3D0007";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiffTheme {
    pub changed_line: Color,
    pub detail_add: Color,
    pub detail_del: Color,
}

impl Default for DiffTheme {
    fn default() -> Self {
        Self {
            changed_line: builtin(CHANGED_LINE),
            detail_add: builtin(DETAIL_ADD),
            detail_del: builtin(DETAIL_DEL),
        }
    }
}

impl DiffTheme {
    /// Parse the configured colours; a bad token keeps its built-in colour.
    pub fn from_settings(colors: &ColorSettings) -> Self {
        let defaults = Self::default();
        Self {
            changed_line: parse_or("changed_line", &colors.changed_line, defaults.changed_line),
            detail_add: parse_or("detail_add", &colors.detail_add, defaults.detail_add),
            detail_del: parse_or("detail_del", &colors.detail_del, defaults.detail_del),
        }
    }
}

fn builtin(token: &str) -> Color {
    Color::from_html(token).unwrap_or(Color::BLACK)
}

fn parse_or(key: &str, token: &str, fallback: Color) -> Color {
    match Color::from_html(token) {
        Ok(color) => color,
        Err(e) => {
            log::warn!("Ignoring colors.{}: {}", key, e);
            fallback
        }
    }
}

pub fn to_rgb(color: Color) -> Rgb {
    let (r, g, b) = color.to_rgb8();
    Rgb(r, g, b)
}

/// Margin glyph for a decorated line.
pub fn decoration_glyph(class: Decoration) -> char {
    match class {
        Decoration::Modified => '~',
        Decoration::Removed => '-',
        Decoration::Added => '+',
    }
}
