//! Theme system for consistent UI colors across dark and light modes.
//!
//! The theme follows `Visuals.theme` in the settings document. `Auto` asks
//! the OS whether it is in dark or light mode.

use ratatui::style::Color;

/// Semantic color theme for the shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    // Primary UI colors
    /// Primary color for borders, titles, and emphasis
    pub primary: Color,
    /// Accent color for highlights, selections, and focus states
    pub accent: Color,
    /// Success state color
    pub success: Color,
    /// Error state color, used by the load-error screen
    pub error: Color,
    /// Warning state color
    pub warning: Color,

    // Text hierarchy
    /// Primary text content color
    pub text: Color,
    /// Secondary text color for labels
    pub text_secondary: Color,
    /// Muted text color for hints and disabled controls
    pub text_muted: Color,

    // Backgrounds
    /// Main background color
    pub background: Color,
    /// Highlight/selection background color
    pub highlight_bg: Color,
    /// Surface color for panels and overlays
    pub surface: Color,

    // State indicators
    /// Focused control color
    pub active: Color,
    /// Disabled control color
    pub inactive: Color,
}

/// Theme variant identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeVariant {
    /// Dark theme
    Dark,
    /// Light theme
    Light,
}

impl Theme {
    /// Detects the OS theme and returns the matching Theme.
    #[must_use]
    pub fn detect() -> Self {
        Self::from_mode(dark_light::detect())
    }

    /// Theme for a detected OS mode. Unspecified falls back to dark.
    #[must_use]
    pub const fn from_mode(mode: dark_light::Mode) -> Self {
        match mode {
            dark_light::Mode::Light => Self::light(),
            dark_light::Mode::Dark | dark_light::Mode::Default => Self::dark(),
        }
    }

    /// Resolves the `Visuals.theme` setting.
    ///
    /// `"Light"` and `"Dark"` are explicit; anything else detects.
    #[must_use]
    pub fn from_setting(setting: Option<&str>) -> Self {
        match setting {
            Some("Light") => Self::light(),
            Some("Dark") => Self::dark(),
            _ => Self::detect(),
        }
    }

    /// Dark theme. Projection surfaces are dark, so this is the usual one.
    #[must_use]
    pub const fn dark() -> Self {
        Self {
            primary: Color::Cyan,
            accent: Color::Yellow,
            success: Color::Green,
            error: Color::Red,
            warning: Color::Yellow,

            text: Color::White,
            text_secondary: Color::Gray,
            text_muted: Color::DarkGray,

            background: Color::Black,
            highlight_bg: Color::DarkGray,
            surface: Color::Rgb(30, 30, 30),

            active: Color::Yellow,
            inactive: Color::Gray,
        }
    }

    /// Light theme for daylight rooms.
    #[must_use]
    pub const fn light() -> Self {
        Self {
            primary: Color::Blue,
            accent: Color::Rgb(180, 100, 0),
            success: Color::Rgb(0, 128, 0),
            error: Color::Red,
            warning: Color::Rgb(200, 100, 0),

            text: Color::Black,
            text_secondary: Color::Rgb(60, 60, 60),
            text_muted: Color::Gray,

            background: Color::White,
            highlight_bg: Color::Rgb(230, 230, 230),
            surface: Color::Rgb(245, 245, 245),

            active: Color::Rgb(180, 100, 0),
            inactive: Color::Rgb(180, 180, 180),
        }
    }

    /// Creates a theme from a variant enum.
    #[must_use]
    pub const fn from_variant(variant: ThemeVariant) -> Self {
        match variant {
            ThemeVariant::Dark => Self::dark(),
            ThemeVariant::Light => Self::light(),
        }
    }

    /// Returns the theme variant, judged by the background color.
    #[must_use]
    pub const fn variant(&self) -> ThemeVariant {
        match self.background {
            Color::White | Color::Rgb(255, 255, 255) | Color::Rgb(245, 245, 245) => {
                ThemeVariant::Light
            }
            _ => ThemeVariant::Dark,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}
