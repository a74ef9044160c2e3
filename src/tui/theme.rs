use std::collections::HashMap;

use ratatui::style::Color;

use crate::model::{Category, LineMark, UiConfig};

/// Parsed color theme for the TUI
#[derive(Debug, Clone)]
pub struct Theme {
    pub background: Color,
    pub text: Color,
    pub text_bright: Color,
    pub highlight: Color,
    pub dim: Color,
    /// Unfilled part of a bar, and the "off" half of a blink
    pub track: Color,
    pub started: Color,
    pub done: Color,
    pub selection_bg: Color,
    /// Bar color per category
    pub category_colors: HashMap<Category, Color>,
}

impl Default for Theme {
    fn default() -> Self {
        let category_colors = Category::ALL
            .into_iter()
            .filter_map(|c| parse_hex_color(c.default_hex()).map(|color| (c, color)))
            .collect();

        Theme {
            background: Color::Rgb(0x12, 0x12, 0x1A),
            text: Color::Rgb(0xD0, 0xD0, 0xDA),
            text_bright: Color::Rgb(0xFF, 0xFF, 0xFF),
            highlight: Color::Rgb(0xFD, 0xD8, 0x35),
            dim: Color::Rgb(0x78, 0x78, 0x8C),
            track: Color::Rgb(0xF5, 0xF5, 0xF5),
            started: Color::Rgb(0xFD, 0xD8, 0x35),
            done: Color::Rgb(0xC8, 0xE6, 0xC9),
            selection_bg: Color::Rgb(0x2E, 0x2E, 0x44),
            category_colors,
        }
    }
}

/// Parse a hex color string like "#d32f2f" into an RGB Color
fn parse_hex_color(hex: &str) -> Option<Color> {
    let hex = hex.strip_prefix('#')?;
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some(Color::Rgb(channel(0)?, channel(2)?, channel(4)?))
}

impl Theme {
    /// Create a theme from UI config, falling back to defaults.
    /// Keys in `[ui.colors]` are either category names or theme slots.
    pub fn from_config(ui: &UiConfig) -> Self {
        let mut theme = Theme::default();

        for (key, value) in &ui.colors {
            let Some(color) = parse_hex_color(value) else {
                continue;
            };
            if let Some(category) = Category::parse_name(key) {
                theme.category_colors.insert(category, color);
                continue;
            }
            match key.as_str() {
                "background" => theme.background = color,
                "text" => theme.text = color,
                "text_bright" => theme.text_bright = color,
                "highlight" => theme.highlight = color,
                "dim" => theme.dim = color,
                "track" => theme.track = color,
                "started" => theme.started = color,
                "done" => theme.done = color,
                "selection_bg" => theme.selection_bg = color,
                _ => {}
            }
        }

        theme
    }

    pub fn category_color(&self, category: Category) -> Color {
        self.category_colors
            .get(&category)
            .copied()
            .unwrap_or(self.highlight)
    }

    /// Background for a todo line
    pub fn mark_color(&self, mark: LineMark) -> Option<Color> {
        match mark {
            LineMark::Open => None,
            LineMark::Started => Some(self.started),
            LineMark::Done => Some(self.done),
        }
    }
}
