use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// A 24-bit RGB color, written as `#rrggbb`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// One of the three channels of a [`Color`], as picked in the color fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Red,
    Green,
    Blue,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse a hex color string (#RRGGBB or #RGB, leading '#' optional)
    pub fn from_hex(s: &str) -> Result<Self, Error> {
        let trimmed = s.trim();
        let hex = trimmed.strip_prefix('#').unwrap_or(trimmed);
        let invalid = || Error::InvalidColor(s.to_string());

        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        match hex.len() {
            6 => {
                let r = u8::from_str_radix(&hex[0..2], 16).map_err(|_| invalid())?;
                let g = u8::from_str_radix(&hex[2..4], 16).map_err(|_| invalid())?;
                let b = u8::from_str_radix(&hex[4..6], 16).map_err(|_| invalid())?;
                Ok(Self::rgb(r, g, b))
            }
            3 => {
                let r = u8::from_str_radix(&hex[0..1], 16).map_err(|_| invalid())? * 17;
                let g = u8::from_str_radix(&hex[1..2], 16).map_err(|_| invalid())? * 17;
                let b = u8::from_str_radix(&hex[2..3], 16).map_err(|_| invalid())? * 17;
                Ok(Self::rgb(r, g, b))
            }
            _ => Err(invalid()),
        }
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    pub fn channel(self, channel: Channel) -> u8 {
        match channel {
            Channel::Red => self.r,
            Channel::Green => self.g,
            Channel::Blue => self.b,
        }
    }

    /// Shift one channel by `delta`, saturating at 0 and 255
    pub fn adjust(self, channel: Channel, delta: i16) -> Self {
        let value = (self.channel(channel) as i16 + delta).clamp(0, 255) as u8;
        let mut out = self;
        match channel {
            Channel::Red => out.r = value,
            Channel::Green => out.g = value,
            Channel::Blue => out.b = value,
        }
        out
    }

    pub fn to_rgb8(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Color {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl TryFrom<String> for Color {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(&value)
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_hex()
    }
}

impl From<Color> for ratatui::style::Color {
    fn from(color: Color) -> Self {
        ratatui::style::Color::Rgb(color.r, color.g, color.b)
    }
}

impl Channel {
    pub fn next(self) -> Self {
        match self {
            Channel::Red => Channel::Green,
            Channel::Green => Channel::Blue,
            Channel::Blue => Channel::Red,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Channel::Red => Channel::Blue,
            Channel::Green => Channel::Red,
            Channel::Blue => Channel::Green,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Channel::Red => "R",
            Channel::Green => "G",
            Channel::Blue => "B",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_long_and_short_hex() {
        assert_eq!(Color::from_hex("#112233").unwrap(), Color::rgb(0x11, 0x22, 0x33));
        assert_eq!(Color::from_hex("FFFFFF").unwrap(), Color::WHITE);
        assert_eq!(Color::from_hex("#abc").unwrap(), Color::rgb(0xaa, 0xbb, 0xcc));
    }

    #[test]
    fn test_reject_malformed_hex() {
        for bad in ["", "#12", "#12345", "#gggggg", "#1234567", "#+12345", "##112233", "##fff"] {
            assert!(
                matches!(Color::from_hex(bad), Err(Error::InvalidColor(_))),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_hex_output_is_lowercase() {
        assert_eq!(Color::rgb(0xAB, 0x0C, 0xFF).to_hex(), "#ab0cff");
        assert_eq!(Color::from_hex("#ABCDEF").unwrap().to_string(), "#abcdef");
    }

    #[test]
    fn test_adjust_saturates() {
        let c = Color::rgb(250, 3, 128);
        assert_eq!(c.adjust(Channel::Red, 16).r, 255);
        assert_eq!(c.adjust(Channel::Green, -16).g, 0);
        assert_eq!(c.adjust(Channel::Blue, 1), Color::rgb(250, 3, 129));
    }

    #[test]
    fn test_serde_as_hex_string() {
        #[derive(Serialize, Deserialize)]
        struct Wrapper {
            color: Color,
        }

        let out = toml::to_string(&Wrapper { color: Color::rgb(1, 2, 3) }).unwrap();
        assert_eq!(out.trim(), "color = \"#010203\"");

        let back: Wrapper = toml::from_str("color = \"#fff\"").unwrap();
        assert_eq!(back.color, Color::WHITE);

        assert!(toml::from_str::<Wrapper>("color = \"nope\"").is_err());
    }
}
