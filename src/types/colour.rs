//! Colour type and Mapfile colour parsing.

use std::fmt;

use crate::error::{MapstyleError, Result};

/// An RGBA colour value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Colour {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Colour {
    /// Create a new colour from RGBA components.
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Create a new opaque colour from RGB components.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Parse a hex colour string.
    ///
    /// Supports formats:
    /// - `#RGB` (3 digits, expanded to 6)
    /// - `#RRGGBB` (6 digits)
    /// - `#RRGGBBAA` (8 digits)
    pub fn from_hex(s: &str) -> Result<Self> {
        let s = s.trim();
        let hex = s.strip_prefix('#').unwrap_or(s);

        if !hex.is_ascii() {
            return Err(invalid_hex(s));
        }

        match hex.len() {
            3 => {
                // #RGB -> #RRGGBB
                let mut digits = [0u8; 3];
                for (digit, c) in digits.iter_mut().zip(hex.chars()) {
                    *digit = parse_hex_digit(c)?;
                }
                let [r, g, b] = digits;
                Ok(Self::rgb(r << 4 | r, g << 4 | g, b << 4 | b))
            }
            6 => {
                let r = parse_hex_byte(&hex[0..2])?;
                let g = parse_hex_byte(&hex[2..4])?;
                let b = parse_hex_byte(&hex[4..6])?;
                Ok(Self::rgb(r, g, b))
            }
            8 => {
                let r = parse_hex_byte(&hex[0..2])?;
                let g = parse_hex_byte(&hex[2..4])?;
                let b = parse_hex_byte(&hex[4..6])?;
                let a = parse_hex_byte(&hex[6..8])?;
                Ok(Self::new(r, g, b, a))
            }
            _ => Err(invalid_hex(s)),
        }
    }

    /// Parse a Mapfile `R G B` triple such as `226 6 19`.
    ///
    /// MapServer uses `-1 -1 -1` for "no colour", which yields `None`.
    pub fn from_rgb_triple(s: &str) -> Option<Self> {
        let parts: Vec<i32> = s
            .split_whitespace()
            .map(|p| p.parse::<f64>().ok().map(|v| v.round() as i32))
            .collect::<Option<_>>()?;

        match parts.as_slice() {
            [r, g, b] => {
                let channel = |v: i32| u8::try_from(v).ok();
                Some(Self::rgb(channel(*r)?, channel(*g)?, channel(*b)?))
            }
            _ => None,
        }
    }

    /// Parse any colour value a Mapfile can hold (`R G B` or hex).
    ///
    /// Attribute bindings like `[colour]` have no static value and yield `None`.
    pub fn parse_mapfile(s: &str) -> Option<Self> {
        let s = s.trim();
        if s.starts_with('#') {
            Self::from_hex(s).ok()
        } else {
            Self::from_rgb_triple(s)
        }
    }

    /// `#RRGGBB`, ignoring alpha.
    pub fn to_hex_rgb(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl fmt::Display for Colour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a == 255 {
            write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
        } else {
            write!(f, "#{:02X}{:02X}{:02X}{:02X}", self.r, self.g, self.b, self.a)
        }
    }
}

/// Whether `s` is a `#RGB`, `#RRGGBB` or `#RRGGBBAA` hex colour.
pub fn is_hex_colour(s: &str) -> bool {
    match s.strip_prefix('#') {
        Some(hex) => matches!(hex.len(), 3 | 6 | 8) && hex.chars().all(|c| c.is_ascii_hexdigit()),
        None => false,
    }
}

/// Convert a Mapfile `R G B` triple to `#RRGGBB`.
pub fn rgb_to_hex(s: &str) -> Option<String> {
    Colour::from_rgb_triple(s).map(Colour::to_hex_rgb)
}

fn invalid_hex(s: &str) -> MapstyleError {
    MapstyleError::Parse {
        message: format!("Invalid hex colour: {}", s),
        help: Some("Use #RGB, #RRGGBB, or #RRGGBBAA format".to_string()),
    }
}

/// Parse a single hex digit.
fn parse_hex_digit(c: char) -> Result<u8> {
    c.to_digit(16)
        .map(|d| d as u8)
        .ok_or_else(|| MapstyleError::Parse {
            message: format!("Invalid hex digit: {}", c),
            help: None,
        })
}

/// Parse a two-character hex byte.
fn parse_hex_byte(s: &str) -> Result<u8> {
    u8::from_str_radix(s, 16).map_err(|_| MapstyleError::Parse {
        message: format!("Invalid hex byte: {}", s),
        help: None,
    })
}
