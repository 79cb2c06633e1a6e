//! Terminal theme detection and color definitions

use std::str::FromStr;

use ratatui::style::Color;

use crate::config::{ColorOverrides, ThemeChoice};
use crate::types::{GridError, Level, Result};

/// Color for each grid level, plus the selected-day highlight
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelColors {
    pub padding: Color,
    pub empty: Color,
    pub level1: Color,
    pub level2: Color,
    pub level3: Color,
    pub level4: Color,
    pub selected_border: Color,
}

impl LevelColors {
    /// Soft green palette for light backgrounds
    pub const LIGHT: Self = Self {
        padding: Color::Reset,
        empty: Color::Rgb(0xe5, 0xe7, 0xeb),
        level1: Color::Rgb(0xe6, 0xf4, 0xea),
        level2: Color::Rgb(0xcd, 0xea, 0xd6),
        level3: Color::Rgb(0xa5, 0xd6, 0xb2),
        level4: Color::Rgb(0x7d, 0xc2, 0x8e),
        selected_border: Color::Rgb(0x7c, 0x3a, 0xed),
    };

    /// GitHub-style green gradient using ANSI 256
    pub const DARK: Self = Self {
        padding: Color::Reset,
        empty: Color::Indexed(236),
        level1: Color::Indexed(22),
        level2: Color::Indexed(28),
        level3: Color::Indexed(34),
        level4: Color::Indexed(40),
        selected_border: Color::Indexed(135),
    };

    /// Color for a level
    pub fn color_for(&self, level: Level) -> Color {
        match level {
            Level::Padding => self.padding,
            Level::Empty => self.empty,
            Level::L1 => self.level1,
            Level::L2 => self.level2,
            Level::L3 => self.level3,
            Level::L4 => self.level4,
        }
    }

    /// Color for a raw level value; unknown values fall back to `empty`
    pub fn color_for_value(&self, value: i8) -> Color {
        Level::from_value(value)
            .map(|level| self.color_for(level))
            .unwrap_or(self.empty)
    }

    /// Apply configured overrides on top of these colors
    pub fn with_overrides(mut self, overrides: &ColorOverrides) -> Result<Self> {
        let slots: [(&Option<String>, &mut Color); 7] = [
            (&overrides.padding, &mut self.padding),
            (&overrides.empty, &mut self.empty),
            (&overrides.level1, &mut self.level1),
            (&overrides.level2, &mut self.level2),
            (&overrides.level3, &mut self.level3),
            (&overrides.level4, &mut self.level4),
            (&overrides.selected_border, &mut self.selected_border),
        ];
        for (value, slot) in slots {
            if let Some(value) = value {
                *slot = parse_color(value)?;
            }
        }
        Ok(self)
    }
}

/// Parse "#RRGGBB", a color name or an ANSI index; "transparent" means no color
fn parse_color(value: &str) -> Result<Color> {
    if value.eq_ignore_ascii_case("transparent") {
        return Ok(Color::Reset);
    }
    Color::from_str(value)
        .map_err(|_| GridError::Config(format!("invalid color '{}'", value)))
}

/// Terminal color scheme (dark or light background)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    /// Auto-detect terminal theme from background luminance.
    /// Must be called **before** entering raw mode (ratatui::init).
    /// Falls back to Dark if detection fails.
    pub fn detect() -> Self {
        match terminal_light::luma() {
            Ok(luma) if luma > 0.6 => Self::Light,
            _ => Self::Dark,
        }
    }

    /// Resolve a configured choice, detecting when set to auto
    pub fn from_choice(choice: ThemeChoice) -> Self {
        match choice {
            ThemeChoice::Auto => Self::detect(),
            ThemeChoice::Dark => Self::Dark,
            ThemeChoice::Light => Self::Light,
        }
    }

    /// Primary text color (headers, body text)
    pub fn text(self) -> Color {
        match self {
            Self::Dark => Color::White,
            Self::Light => Color::Black,
        }
    }

    /// Active/accent color (year header, keybinding keys)
    pub fn accent(self) -> Color {
        match self {
            Self::Dark => Color::Cyan,
            Self::Light => Color::Indexed(25), // dark blue (ANSI 256)
        }
    }

    /// Secondary/muted text (labels, disabled buttons, hints)
    pub fn muted(self) -> Color {
        match self {
            Self::Dark => Color::DarkGray,
            Self::Light => Color::Gray,
        }
    }

    /// Date text color
    pub fn date(self) -> Color {
        match self {
            Self::Dark => Color::Yellow,
            Self::Light => Color::Indexed(130), // dark orange/yellow (ANSI 256)
        }
    }

    /// Default level palette for this background
    pub fn level_colors(self) -> LevelColors {
        match self {
            Self::Dark => LevelColors::DARK,
            Self::Light => LevelColors::LIGHT,
        }
    }
}
