//! Colors, resolved from `[theme]` config strings.
//!
//! Styles are handed to components as render parameters (`PaneStyle`);
//! nothing here is global.

use std::str::FromStr;

use log::warn;
use ratatui::style::Color;

use crate::core::config::ThemeConfig;
use crate::tui::components::help::TitleColor;

/// Frame style for one pane, chosen per render from focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaneStyle {
    pub border: Color,
    pub borderless: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    pub active_border: Color,
    pub inactive_border: Color,
    pub title: TitleColor,
    pub selected: Color,
    pub info: Color,
    pub error: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            active_border: Color::Rgb(0xF2, 0x5D, 0x94),
            inactive_border: Color::DarkGray,
            title: TitleColor {
                background: Color::Rgb(0xF2, 0x5D, 0x94),
                foreground: Color::Rgb(0xFF, 0xFD, 0xF5),
            },
            selected: Color::Rgb(0xF2, 0x5D, 0x94),
            info: Color::Rgb(0x04, 0xB5, 0x75),
            error: Color::Rgb(0xFF, 0x46, 0x72),
        }
    }
}

impl Theme {
    pub fn from_config(config: &ThemeConfig) -> Self {
        let defaults = Theme::default();
        Self {
            active_border: color_or(&config.active_border, defaults.active_border),
            inactive_border: color_or(&config.inactive_border, defaults.inactive_border),
            title: TitleColor {
                background: color_or(&config.title_background, defaults.title.background),
                foreground: color_or(&config.title_foreground, defaults.title.foreground),
            },
            selected: color_or(&config.selected, defaults.selected),
            info: color_or(&config.info, defaults.info),
            error: color_or(&config.error, defaults.error),
        }
    }

    pub fn pane(&self, focused: bool, borderless: bool) -> PaneStyle {
        PaneStyle {
            border: if focused {
                self.active_border
            } else {
                self.inactive_border
            },
            borderless,
        }
    }
}

fn color_or(value: &Option<String>, fallback: Color) -> Color {
    match value {
        Some(raw) => Color::from_str(raw.trim()).unwrap_or_else(|_| {
            warn!("Invalid theme color {:?}, using {:?}", raw, fallback);
            fallback
        }),
        None => fallback,
    }
}
