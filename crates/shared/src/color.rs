//! CSS-style color values.
//!
//! Hosts address colors the way a web frontend would: `#rgb`, `#rrggbb`,
//! or a named color. Internally a color is three linear floats in `[0, 1]`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Named colors accepted by [`Color::from_str`].
const NAMED: &[(&str, [u8; 3])] = &[
    ("black", [0x00, 0x00, 0x00]),
    ("white", [0xff, 0xff, 0xff]),
    ("red", [0xff, 0x00, 0x00]),
    ("green", [0x00, 0x80, 0x00]),
    ("lime", [0x00, 0xff, 0x00]),
    ("blue", [0x00, 0x00, 0xff]),
    ("yellow", [0xff, 0xff, 0x00]),
    ("cyan", [0x00, 0xff, 0xff]),
    ("magenta", [0xff, 0x00, 0xff]),
    ("orange", [0xff, 0xa5, 0x00]),
    ("purple", [0x80, 0x00, 0x80]),
    ("gray", [0x80, 0x80, 0x80]),
    ("grey", [0x80, 0x80, 0x80]),
    ("brown", [0xa5, 0x2a, 0x2a]),
    ("pink", [0xff, 0xc0, 0xcb]),
    ("snow", [0xff, 0xfa, 0xfa]),
    ("skyblue", [0x87, 0xce, 0xeb]),
    ("steelblue", [0x46, 0x82, 0xb4]),
];

/// An RGB color with components in `[0, 1]`.
///
/// Serializes as its CSS hex string so command payloads stay readable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
        }
    }

    /// Components as the `[r, g, b]` array mesh vertices carry.
    pub fn to_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }

    pub fn to_rgb8(self) -> [u8; 3] {
        [
            (self.r.clamp(0.0, 1.0) * 255.0).round() as u8,
            (self.g.clamp(0.0, 1.0) * 255.0).round() as u8,
            (self.b.clamp(0.0, 1.0) * 255.0).round() as u8,
        ]
    }

    pub fn to_hex(self) -> String {
        let [r, g, b] = self.to_rgb8();
        format!("#{r:02x}{g:02x}{b:02x}")
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Color {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some(hex) = s.strip_prefix('#') {
            return parse_hex(hex).ok_or_else(|| format!("invalid hex color: {s:?}"));
        }
        let lower = s.to_ascii_lowercase();
        NAMED
            .iter()
            .find(|(name, _)| *name == lower)
            .map(|&(_, [r, g, b])| Color::from_rgb8(r, g, b))
            .ok_or_else(|| format!("unknown color name: {s:?}"))
    }
}

impl TryFrom<String> for Color {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Color> for String {
    fn from(c: Color) -> Self {
        c.to_hex()
    }
}

fn parse_hex(hex: &str) -> Option<Color> {
    match hex.len() {
        // #rgb shorthand: each digit doubled
        3 => {
            let mut ch = hex.chars();
            let r = hex_digit(ch.next()?)?;
            let g = hex_digit(ch.next()?)?;
            let b = hex_digit(ch.next()?)?;
            Some(Color::from_rgb8(r * 17, g * 17, b * 17))
        }
        6 => {
            let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
            let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
            let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
            Some(Color::from_rgb8(r, g, b))
        }
        _ => None,
    }
}

fn hex_digit(c: char) -> Option<u8> {
    c.to_digit(16).map(|d| d as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_long_hex() {
        let c: Color = "#ff8000".parse().unwrap();
        assert_eq!(c.to_rgb8(), [0xff, 0x80, 0x00]);
    }

    #[test]
    fn test_parse_short_hex() {
        let c: Color = "#f80".parse().unwrap();
        assert_eq!(c.to_rgb8(), [0xff, 0x88, 0x00]);
    }

    #[test]
    fn test_parse_named() {
        let c: Color = "SkyBlue".parse().unwrap();
        assert_eq!(c.to_rgb8(), [0x87, 0xce, 0xeb]);
    }

    #[test]
    fn test_parse_invalid() {
        assert!("#12345".parse::<Color>().is_err());
        assert!("notacolor".parse::<Color>().is_err());
    }

    #[test]
    fn test_hex_roundtrip() {
        let c: Color = "#4682b4".parse().unwrap();
        assert_eq!(c.to_hex(), "#4682b4");
    }

    #[test]
    fn test_serde_as_string() {
        let c: Color = "#ff0000".parse().unwrap();
        let json = serde_json::to_string(&c).unwrap();
        assert_eq!(json, "\"#ff0000\"");
        let back: Color = serde_json::from_str("\"red\"").unwrap();
        assert_eq!(back, c);
    }
}
