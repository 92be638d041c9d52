use std::{fmt, str::FromStr};

use image::Rgb;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColorError {
    Empty,
    InvalidHex(String),
    InvalidRgb(String),
    UnknownName(String),
}

impl fmt::Display for ColorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColorError::Empty => write!(f, "Empty color specification"),
            ColorError::InvalidHex(s) => write!(f, "Invalid hex color: {s}"),
            ColorError::InvalidRgb(s) => write!(f, "Invalid rgb() color: {s}"),
            ColorError::UnknownName(s) => write!(f, "Unknown color name: {s}"),
        }
    }
}

impl std::error::Error for ColorError {}

/// An opaque RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

// CSS level 1 names plus a few common extras
const NAMED_COLORS: &[(&str, [u8; 3])] = &[
    ("black", [0x00, 0x00, 0x00]),
    ("silver", [0xc0, 0xc0, 0xc0]),
    ("gray", [0x80, 0x80, 0x80]),
    ("grey", [0x80, 0x80, 0x80]),
    ("white", [0xff, 0xff, 0xff]),
    ("maroon", [0x80, 0x00, 0x00]),
    ("red", [0xff, 0x00, 0x00]),
    ("purple", [0x80, 0x00, 0x80]),
    ("fuchsia", [0xff, 0x00, 0xff]),
    ("magenta", [0xff, 0x00, 0xff]),
    ("green", [0x00, 0x80, 0x00]),
    ("lime", [0x00, 0xff, 0x00]),
    ("olive", [0x80, 0x80, 0x00]),
    ("yellow", [0xff, 0xff, 0x00]),
    ("navy", [0x00, 0x00, 0x80]),
    ("blue", [0x00, 0x00, 0xff]),
    ("teal", [0x00, 0x80, 0x80]),
    ("aqua", [0x00, 0xff, 0xff]),
    ("cyan", [0x00, 0xff, 0xff]),
    ("orange", [0xff, 0xa5, 0x00]),
];

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(0xff, 0xff, 0xff);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    fn from_hex(digits: &str) -> Result<Self, ColorError> {
        let invalid = || ColorError::InvalidHex(format!("#{digits}"));
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        match digits.len() {
            // #RGB expands each nibble, e.g. #0DF -> #00DDFF
            3 => {
                let nibble = |i: usize| u8::from_str_radix(&digits[i..=i], 16).map(|v| v * 0x11);
                Ok(Self::rgb(
                    nibble(0).map_err(|_| invalid())?,
                    nibble(1).map_err(|_| invalid())?,
                    nibble(2).map_err(|_| invalid())?,
                ))
            }
            6 => {
                let byte = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16);
                Ok(Self::rgb(
                    byte(0).map_err(|_| invalid())?,
                    byte(2).map_err(|_| invalid())?,
                    byte(4).map_err(|_| invalid())?,
                ))
            }
            _ => Err(invalid()),
        }
    }

    fn from_rgb_function(spec: &str, args: &str) -> Result<Self, ColorError> {
        let parts: Vec<u8> = args
            .split(',')
            .map(|part| part.trim().parse::<u8>())
            .collect::<Result<_, _>>()
            .map_err(|_| ColorError::InvalidRgb(spec.to_string()))?;

        match parts.as_slice() {
            [r, g, b] => Ok(Self::rgb(*r, *g, *b)),
            _ => Err(ColorError::InvalidRgb(spec.to_string())),
        }
    }
}

impl FromStr for Color {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let spec = s.trim();
        if spec.is_empty() {
            return Err(ColorError::Empty);
        }

        if let Some(digits) = spec.strip_prefix('#') {
            return Self::from_hex(digits);
        }

        let lower = spec.to_ascii_lowercase();
        if let Some(args) = lower.strip_prefix("rgb(").and_then(|rest| rest.strip_suffix(')')) {
            return Self::from_rgb_function(spec, args);
        }

        NAMED_COLORS
            .iter()
            .find(|(name, _)| *name == lower)
            .map(|(_, [r, g, b])| Self::rgb(*r, *g, *b))
            .ok_or_else(|| ColorError::UnknownName(spec.to_string()))
    }
}

impl TryFrom<String> for Color {
    type Error = ColorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_hex()
    }
}

impl From<Color> for Rgb<u8> {
    fn from(color: Color) -> Self {
        Rgb([color.r, color.g, color.b])
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}
