// Theme - resolved colors for the TUI
//
// A theme is a flat struct of semantic colors, resolved once at startup.
// Two palettes ship with the binary; `by_name` falls back to the dark one
// for unknown names so a typo in the config never blanks the screen.

use ratatui::style::Color;
use ratatui::widgets::BorderType;

/// Complete resolved theme ready for use in the TUI.
#[derive(Debug, Clone)]
pub struct Theme {
    pub name: String,

    // ─── Terminal colors ─────────────────────────────────────
    pub background: Color,
    pub foreground: Color,
    pub muted: Color,

    // ─── Chrome ──────────────────────────────────────────────
    pub title: Color,
    pub status_bar: Color,
    pub border: Color,
    pub highlight: Color,

    // ─── Chat accents ────────────────────────────────────────
    pub accent_user: Color,
    pub accent_assistant: Color,
    pub accent_system: Color,
    pub reaction: Color,

    // ─── Message body ────────────────────────────────────────
    pub code_inline: Color,
    pub code_block: Color,
    pub heading: Color,
    pub quote: Color,

    // ─── Selection ───────────────────────────────────────────
    pub selection: Color,
    pub selection_fg: Color,

    // ─── Border style ────────────────────────────────────────
    pub border_type: BorderType,
}

impl Theme {
    /// Resolve a theme by name; unknown names fall back to the default
    pub fn by_name(name: &str) -> Self {
        match name {
            "paper" => Self::paper(),
            "dusk" => Self::dusk(),
            other => {
                tracing::warn!(theme = other, "unknown theme, using dusk");
                Self::dusk()
            }
        }
    }

    /// Names accepted by [`Theme::by_name`]
    pub fn available() -> &'static [&'static str] {
        &["dusk", "paper"]
    }

    /// Cycle to the next bundled theme
    pub fn next(&self) -> Self {
        match self.name.as_str() {
            "dusk" => Self::paper(),
            _ => Self::dusk(),
        }
    }

    /// Default dark palette
    pub fn dusk() -> Self {
        Self {
            name: "dusk".to_string(),
            background: Color::Rgb(24, 25, 33),
            foreground: Color::Rgb(205, 209, 220),
            muted: Color::Rgb(110, 115, 130),
            title: Color::Rgb(137, 180, 250),
            status_bar: Color::Rgb(110, 115, 130),
            border: Color::Rgb(60, 64, 80),
            highlight: Color::Rgb(137, 180, 250),
            accent_user: Color::Rgb(166, 227, 161),
            accent_assistant: Color::Rgb(137, 220, 235),
            accent_system: Color::Rgb(249, 226, 175),
            reaction: Color::Rgb(243, 139, 168),
            code_inline: Color::Rgb(245, 194, 231),
            code_block: Color::Rgb(148, 156, 187),
            heading: Color::Rgb(137, 180, 250),
            quote: Color::Rgb(148, 156, 187),
            selection: Color::Rgb(69, 71, 90),
            selection_fg: Color::Rgb(205, 209, 220),
            border_type: BorderType::Rounded,
        }
    }

    /// Light palette
    pub fn paper() -> Self {
        Self {
            name: "paper".to_string(),
            background: Color::Rgb(250, 248, 242),
            foreground: Color::Rgb(55, 58, 65),
            muted: Color::Rgb(140, 138, 130),
            title: Color::Rgb(30, 102, 245),
            status_bar: Color::Rgb(140, 138, 130),
            border: Color::Rgb(200, 196, 186),
            highlight: Color::Rgb(30, 102, 245),
            accent_user: Color::Rgb(64, 160, 43),
            accent_assistant: Color::Rgb(23, 146, 153),
            accent_system: Color::Rgb(223, 142, 29),
            reaction: Color::Rgb(210, 15, 57),
            code_inline: Color::Rgb(136, 57, 239),
            code_block: Color::Rgb(92, 95, 119),
            heading: Color::Rgb(30, 102, 245),
            quote: Color::Rgb(92, 95, 119),
            selection: Color::Rgb(220, 224, 232),
            selection_fg: Color::Rgb(55, 58, 65),
            border_type: BorderType::Plain,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::dusk()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_name_falls_back() {
        let theme = Theme::by_name("definitely-not-a-theme");
        assert_eq!(theme.name, "dusk");
    }

    #[test]
    fn test_cycle_covers_all_bundled_themes() {
        let mut theme = Theme::dusk();
        let mut seen = vec![theme.name.clone()];
        for _ in 1..Theme::available().len() {
            theme = theme.next();
            seen.push(theme.name.clone());
        }
        seen.sort();
        assert_eq!(seen, Theme::available().to_vec());
    }
}
