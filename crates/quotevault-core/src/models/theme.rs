//! Appearance preferences and the fixed color palettes they resolve to.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// An sRGB color with alpha in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
    pub alpha: f32,
}

impl Rgba {
    pub const WHITE: Self = Self::opaque(0xFF, 0xFF, 0xFF);
    pub const BLACK: Self = Self::opaque(0x00, 0x00, 0x00);

    #[must_use]
    pub const fn opaque(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red,
            green,
            blue,
            alpha: 1.0,
        }
    }

    /// Same color with a different opacity
    #[must_use]
    pub const fn with_alpha(self, alpha: f32) -> Self {
        Self { alpha, ..self }
    }

    /// Parse `RGB`, `RRGGBB` or `AARRGGBB` hex, with or without a leading `#`.
    ///
    /// Malformed input yields opaque black.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)] // channels are masked to 8 bits
    pub fn from_hex(hex: &str) -> Self {
        let digits: String = hex.chars().filter(char::is_ascii_alphanumeric).collect();
        let Ok(value) = u32::from_str_radix(&digits, 16) else {
            return Self::BLACK;
        };
        let channel = |shift: u32, mask: u32| ((value >> shift) & mask) as u8;
        match digits.len() {
            3 => Self::opaque(
                channel(8, 0xF) * 17,
                channel(4, 0xF) * 17,
                channel(0, 0xF) * 17,
            ),
            6 => Self::opaque(channel(16, 0xFF), channel(8, 0xFF), channel(0, 0xFF)),
            8 => Self::opaque(channel(16, 0xFF), channel(8, 0xFF), channel(0, 0xFF))
                .with_alpha(f32::from(channel(24, 0xFF)) / 255.0),
            _ => Self::BLACK,
        }
    }

    /// `#RRGGBB` form, ignoring alpha
    #[must_use]
    pub fn to_hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.red, self.green, self.blue)
    }
}

/// User-selectable accent color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AccentColor {
    #[default]
    Blue,
    Red,
    Green,
    Orange,
    Purple,
}

impl AccentColor {
    pub const ALL: [Self; 5] = [
        Self::Blue,
        Self::Red,
        Self::Green,
        Self::Orange,
        Self::Purple,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Blue => "blue",
            Self::Red => "red",
            Self::Green => "green",
            Self::Orange => "orange",
            Self::Purple => "purple",
        }
    }

    #[must_use]
    pub fn color(self) -> Rgba {
        Rgba::from_hex(match self {
            Self::Blue => "4F46E5",
            Self::Red => "EF4444",
            Self::Green => "10B981",
            Self::Orange => "F59E0B",
            Self::Purple => "8B5CF6",
        })
    }

    /// Resolve a stored value, falling back to blue for unknown names
    #[must_use]
    pub fn from_stored(value: &str) -> Self {
        value.parse().unwrap_or_default()
    }
}

impl fmt::Display for AccentColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccentColor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|color| color.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown accent color '{s}'"))
    }
}

/// Theme mode options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    /// Light theme
    Light,
    /// Dark theme
    Dark,
    /// Follow system preference
    #[default]
    Auto,
}

impl ThemeMode {
    pub const ALL: [Self; 3] = [Self::Light, Self::Dark, Self::Auto];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
            Self::Auto => "auto",
        }
    }

    /// Resolve a stored value, falling back to auto for unknown names
    #[must_use]
    pub fn from_stored(value: &str) -> Self {
        value.parse().unwrap_or_default()
    }
}

impl fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ThemeMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown theme '{s}'"))
    }
}

/// Default color for a category name when the row carries none.
#[must_use]
pub fn category_color(name: &str) -> Rgba {
    let hex = match name.to_lowercase().as_str() {
        "motivation" => "4F46E5",
        "love" => "EC4899",
        "success" => "F59E0B",
        "wisdom" => "10B981",
        "humor" => "8B5CF6",
        "life" => "06B6D4",
        "business" => "EF4444",
        "creativity" => "F97316",
        "growth" => "22C55E",
        _ => "6B7280",
    };
    Rgba::from_hex(hex)
}

/// Fill behind a share card.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum CardBackground {
    Solid { color: Rgba },
    Gradient { from: Rgba, to: Rgba },
}

/// Colors a share card renders with.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CardPalette {
    pub background: CardBackground,
    pub text: Rgba,
    pub secondary_text: Rgba,
}

/// Visual style of a shareable quote card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CardStyle {
    #[default]
    Ocean,
    Clean,
    Nature,
    Noir,
}

impl CardStyle {
    pub const ALL: [Self; 4] = [Self::Ocean, Self::Clean, Self::Nature, Self::Noir];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Ocean => "Ocean",
            Self::Clean => "Clean",
            Self::Nature => "Nature",
            Self::Noir => "Noir",
        }
    }

    #[must_use]
    pub fn palette(self) -> CardPalette {
        match self {
            Self::Ocean => CardPalette {
                background: CardBackground::Gradient {
                    from: Rgba::from_hex("4F46E5"),
                    to: Rgba::from_hex("7C3AED"),
                },
                text: Rgba::WHITE,
                secondary_text: Rgba::WHITE.with_alpha(0.8),
            },
            Self::Clean => CardPalette {
                background: CardBackground::Solid { color: Rgba::WHITE },
                text: Rgba::BLACK,
                secondary_text: Rgba::from_hex("6B7280"),
            },
            Self::Nature => CardPalette {
                background: CardBackground::Gradient {
                    from: Rgba::from_hex("10B981"),
                    to: Rgba::from_hex("06B6D4"),
                },
                text: Rgba::WHITE,
                secondary_text: Rgba::WHITE.with_alpha(0.8),
            },
            Self::Noir => CardPalette {
                background: CardBackground::Solid {
                    color: Rgba::from_hex("1F2937"),
                },
                text: Rgba::WHITE,
                secondary_text: Rgba::WHITE.with_alpha(0.6),
            },
        }
    }
}

impl FromStr for CardStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|style| style.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown card style '{s}'"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_parsing() {
        assert_eq!(Rgba::from_hex("#4F46E5"), Rgba::opaque(0x4F, 0x46, 0xE5));
        assert_eq!(Rgba::from_hex("fff"), Rgba::WHITE);
        assert_eq!(Rgba::from_hex("nothex"), Rgba::BLACK);

        let translucent = Rgba::from_hex("80FFFFFF");
        assert_eq!(translucent.red, 0xFF);
        assert!((translucent.alpha - 128.0 / 255.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_stored_values_fall_back_to_defaults() {
        assert_eq!(AccentColor::from_stored("purple"), AccentColor::Purple);
        assert_eq!(AccentColor::from_stored("teal"), AccentColor::Blue);
        assert_eq!(ThemeMode::from_stored("dark"), ThemeMode::Dark);
        assert_eq!(ThemeMode::from_stored("system"), ThemeMode::Auto);
    }

    #[test]
    fn test_category_color_is_case_insensitive() {
        assert_eq!(category_color("Wisdom").to_hex(), "#10B981");
        assert_eq!(category_color("unknown").to_hex(), "#6B7280");
    }

    #[test]
    fn test_card_palettes() {
        let clean = CardStyle::Clean.palette();
        assert_eq!(clean.text, Rgba::BLACK);
        assert_eq!(
            clean.background,
            CardBackground::Solid { color: Rgba::WHITE }
        );

        let noir = CardStyle::Noir.palette();
        assert!((noir.secondary_text.alpha - 0.6).abs() < f32::EPSILON);

        assert_eq!("nature".parse::<CardStyle>(), Ok(CardStyle::Nature));
    }
}
