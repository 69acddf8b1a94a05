//! Theme system for the editor.
//!
//! ## Learning: Data-Driven Styling
//!
//! A theme is plain data that serde can read and write, so users can ship
//! their own palettes as JSON. Views convert colors to iced types at the
//! last moment with `Color::to_iced`.

use serde::{Deserialize, Serialize};

/// Fixed colors for the window chrome (toolbar, status bar, dialogs).
pub mod colors {
    use iced::Color;

    pub const BG_DARK: Color = Color::from_rgb(0.11, 0.11, 0.13);
    pub const BG_MEDIUM: Color = Color::from_rgb(0.14, 0.14, 0.16);
    pub const BG_LIGHT: Color = Color::from_rgb(0.18, 0.18, 0.20);
    pub const BG_HOVER: Color = Color::from_rgb(0.22, 0.22, 0.25);
    pub const BG_ACTIVE: Color = Color::from_rgb(0.25, 0.25, 0.28);

    pub const TEXT_PRIMARY: Color = Color::from_rgb(0.93, 0.93, 0.93);
    pub const TEXT_SECONDARY: Color = Color::from_rgb(0.65, 0.65, 0.68);
    pub const TEXT_MUTED: Color = Color::from_rgb(0.45, 0.45, 0.48);

    pub const ACCENT: Color = Color::from_rgb(0.36, 0.54, 0.90);
    pub const DANGER: Color = Color::from_rgb(0.75, 0.22, 0.22);

    pub const BORDER: Color = Color::from_rgb(0.25, 0.25, 0.28);
}

/// Color representation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Converts to iced Color.
    pub fn to_iced(&self) -> iced::Color {
        iced::Color::from_rgba(self.r, self.g, self.b, self.a)
    }
}

/// Document theme.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    /// Theme name
    pub name: String,

    /// Is this a dark theme?
    pub is_dark: bool,

    /// Page colors
    pub page: PageColors,

    /// Colors for marked text and block decorations
    pub content: ContentColors,

    /// Font settings
    pub font: FontSettings,
}

/// Page colors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageColors {
    pub background: Color,
    pub text: Color,
    pub placeholder: Color,
    pub caret: Color,
    pub selection: Color,
    pub hovered_block: Color,
}

/// Colors for marks and block decorations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentColors {
    pub heading: Color,
    pub quote_bar: Color,
    pub quote_text: Color,
    pub code_text: Color,
    pub code_background: Color,
    pub list_marker: Color,
    pub image_border: Color,
}

/// Font settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FontSettings {
    pub size: f32,
    pub heading_one_scale: f32,
    pub heading_two_scale: f32,
    pub line_height: f32,
}

impl FontSettings {
    /// Text size for a block, scaled for headings.
    pub fn size_for(&self, heading_level: Option<u8>) -> f32 {
        match heading_level {
            Some(1) => self.size * self.heading_one_scale,
            Some(_) => self.size * self.heading_two_scale,
            None => self.size,
        }
    }
}

impl Theme {
    /// Creates the default dark theme.
    pub fn dark() -> Self {
        Self {
            name: "Inkpad Dark".to_string(),
            is_dark: true,
            page: PageColors {
                background: Color::rgb(0.10, 0.10, 0.12),
                text: Color::rgb(0.9, 0.9, 0.9),
                placeholder: Color::rgb(0.5, 0.5, 0.5),
                caret: Color::rgb(0.4, 0.6, 1.0),
                selection: Color::rgba(0.3, 0.5, 0.8, 0.35),
                hovered_block: Color::rgba(1.0, 1.0, 1.0, 0.04),
            },
            content: ContentColors {
                heading: Color::rgb(0.95, 0.95, 0.95),
                quote_bar: Color::rgb(0.35, 0.35, 0.40),
                quote_text: Color::rgb(0.7, 0.7, 0.7),
                code_text: Color::rgb(0.9, 0.7, 0.5),
                code_background: Color::rgb(0.16, 0.16, 0.18),
                list_marker: Color::rgb(0.4, 0.6, 1.0),
                image_border: Color::rgb(0.25, 0.25, 0.28),
            },
            font: FontSettings {
                size: 16.0,
                heading_one_scale: 2.0,
                heading_two_scale: 1.5,
                line_height: 1.5,
            },
        }
    }

    /// Creates a light theme.
    pub fn light() -> Self {
        Self {
            name: "Inkpad Light".to_string(),
            is_dark: false,
            page: PageColors {
                background: Color::rgb(1.0, 1.0, 1.0),
                text: Color::rgb(0.1, 0.1, 0.1),
                placeholder: Color::rgb(0.6, 0.6, 0.6),
                caret: Color::rgb(0.2, 0.4, 0.8),
                selection: Color::rgba(0.3, 0.5, 0.8, 0.25),
                hovered_block: Color::rgba(0.0, 0.0, 0.0, 0.03),
            },
            content: ContentColors {
                heading: Color::rgb(0.05, 0.05, 0.05),
                quote_bar: Color::rgb(0.85, 0.85, 0.85),
                quote_text: Color::rgb(0.45, 0.45, 0.45),
                code_text: Color::rgb(0.7, 0.3, 0.2),
                code_background: Color::rgb(0.95, 0.95, 0.95),
                list_marker: Color::rgb(0.2, 0.4, 0.8),
                image_border: Color::rgb(0.85, 0.85, 0.85),
            },
            font: FontSettings {
                size: 16.0,
                heading_one_scale: 2.0,
                heading_two_scale: 1.5,
                line_height: 1.5,
            },
        }
    }

    /// Looks up a built-in theme by name, falling back to dark.
    pub fn named(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "light" => Self::light(),
            "dark" => Self::dark(),
            other => {
                tracing::warn!("Unknown theme {:?}, using dark", other);
                Self::dark()
            }
        }
    }

    /// Returns this theme with a different body font size.
    pub fn with_font_size(mut self, size: f32) -> Self {
        self.font.size = size;
        self
    }

    /// The iced theme for built-in widgets.
    pub fn iced_theme(&self) -> iced::Theme {
        if self.is_dark {
            iced::Theme::Dark
        } else {
            iced::Theme::Light
        }
    }

    /// Loads a theme from a file.
    pub fn load(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    }

    /// Saves the theme to a file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(path, content)
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_themes() {
        assert!(Theme::named("dark").is_dark);
        assert!(!Theme::named("Light").is_dark);
        assert_eq!(Theme::named("solarized").name, "Inkpad Dark");
    }

    #[test]
    fn test_heading_sizes() {
        let font = Theme::dark().with_font_size(10.0).font;
        assert_eq!(font.size_for(None), 10.0);
        assert_eq!(font.size_for(Some(1)), 20.0);
        assert_eq!(font.size_for(Some(2)), 15.0);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("theme.json");

        let theme = Theme::light().with_font_size(18.0);
        theme.save(&path).unwrap();
        let loaded = Theme::load(&path).unwrap();
        assert_eq!(loaded.name, theme.name);
        assert_eq!(loaded.font.size, 18.0);
        assert_eq!(loaded.page.text, theme.page.text);
    }
}
