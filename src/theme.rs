//! UI palette, with per-color overrides from the `[theme]` config table

use ratatui::style::Color;

use crate::config::ThemeConfig;

/// Theme colors for the UI
#[derive(Debug, Clone)]
pub struct Theme {
    pub accent: Color,      // Focused borders, key hints
    pub danger: Color,      // Errors
    pub success: Color,     // Create/download confirmations
    pub warning: Color,     // Status line
    pub text: Color,
    pub text_dim: Color,
    pub inactive: Color,    // Unfocused borders
    pub bg_selected: Color, // Selected history entry
    pub header: Color,
}

impl Default for Theme {
    fn default() -> Self {
        // Catppuccin-inspired
        Self {
            accent: Color::Rgb(250, 179, 135),
            danger: Color::Rgb(243, 139, 168),
            success: Color::Rgb(166, 218, 149),
            warning: Color::Rgb(250, 179, 135),
            text: Color::Rgb(205, 214, 244),
            text_dim: Color::Rgb(147, 153, 178),
            inactive: Color::Rgb(88, 91, 112),
            bg_selected: Color::Rgb(69, 71, 90),
            header: Color::Rgb(243, 139, 168),
        }
    }
}

impl Theme {
    pub fn from_config(config: &ThemeConfig) -> Self {
        let base = Self::default();
        let pick = |over: Option<crate::form::Color>, fallback: Color| {
            over.map(Color::from).unwrap_or(fallback)
        };

        let danger = pick(config.danger, base.danger);
        Self {
            accent: pick(config.accent, base.accent),
            danger,
            success: pick(config.success, base.success),
            warning: pick(config.warning, base.warning),
            text: pick(config.text, base.text),
            text_dim: pick(config.text_dim, base.text_dim),
            inactive: pick(config.inactive, base.inactive),
            bg_selected: pick(config.selected, base.bg_selected),
            header: danger, // headers follow danger for contrast
        }
    }
}
