use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Background of a cell nobody has painted yet
pub const DEFAULT_HEX: &str = "#1a1a2e";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    fn from_hex(input: &str) -> Option<Self> {
        let digits = input.trim().strip_prefix('#')?;
        if !digits.bytes().all(|byte| byte.is_ascii_hexdigit()) {
            return None;
        }

        let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&digits[range], 16).ok();
        match digits.len() {
            // short form: every nibble is doubled (#abc == #aabbcc)
            3 => Some(Self {
                r: channel(0..1)? * 17,
                g: channel(1..2)? * 17,
                b: channel(2..3)? * 17,
            }),
            6 => Some(Self {
                r: channel(0..2)?,
                g: channel(2..4)?,
                b: channel(4..6)?,
            }),
            _ => None,
        }
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// A cell color as the wall stores it.
///
/// Colors coming from the server are kept verbatim, whatever they look like.
/// Colors picked locally go through [`Color::parse_hex`] and always end up as
/// lowercase `#rrggbb`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(transparent)]
pub struct Color(String);

impl Color {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn parse_hex(input: &str) -> Result<Self, ParseColorError> {
        Rgb::from_hex(input)
            .map(|rgb| Self(rgb.to_string()))
            .ok_or_else(|| ParseColorError(input.to_owned()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn rgb(&self) -> Option<Rgb> {
        Rgb::from_hex(&self.0)
    }
}

impl Default for Color {
    fn default() -> Self {
        Self(DEFAULT_HEX.to_owned())
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Color {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_hex(s)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseColorError(String);

impl fmt::Display for ParseColorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} is not a #rgb or #rrggbb color", self.0)
    }
}

impl std::error::Error for ParseColorError {}
