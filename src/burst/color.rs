//! Palette colors
//!
//! Palettes are written as CSS hex strings so settings JSON stays readable.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::FxError;

/// 8-bit RGBA color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const WHITE: Rgba = Rgba::rgb(255, 255, 255);
    pub const BLACK: Rgba = Rgba::rgb(0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Parse `#rgb`, `#rgba`, `#rrggbb` or `#rrggbbaa`
    pub fn parse(s: &str) -> Result<Self, FxError> {
        let invalid = || FxError::InvalidColor(s.to_string());
        let hex = s.trim().strip_prefix('#').ok_or_else(invalid)?;
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        let nibble = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).map(|v| v * 17);
        let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16);

        let color = match hex.len() {
            3 | 4 => Self {
                r: nibble(0).map_err(|_| invalid())?,
                g: nibble(1).map_err(|_| invalid())?,
                b: nibble(2).map_err(|_| invalid())?,
                a: if hex.len() == 4 {
                    nibble(3).map_err(|_| invalid())?
                } else {
                    255
                },
            },
            6 | 8 => Self {
                r: byte(0).map_err(|_| invalid())?,
                g: byte(2).map_err(|_| invalid())?,
                b: byte(4).map_err(|_| invalid())?,
                a: if hex.len() == 8 {
                    byte(6).map_err(|_| invalid())?
                } else {
                    255
                },
            },
            _ => return Err(invalid()),
        };
        Ok(color)
    }

    /// Linear float color with an extra alpha multiplier, for vertex upload
    pub fn to_f32(self, alpha: f32) -> [f32; 4] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
            (self.a as f32 / 255.0) * alpha.clamp(0.0, 1.0),
        ]
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)?;
        if self.a != 255 {
            write!(f, "{:02x}", self.a)?;
        }
        Ok(())
    }
}

impl FromStr for Rgba {
    type Err = FxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Rgba {
    type Error = FxError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<Rgba> for String {
    fn from(c: Rgba) -> Self {
        c.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_short_and_long_forms() {
        assert_eq!(Rgba::parse("#fff").unwrap(), Rgba::WHITE);
        assert_eq!(Rgba::parse("#00E5FF").unwrap(), Rgba::rgb(0x00, 0xe5, 0xff));
        assert_eq!(
            Rgba::parse("#11223344").unwrap(),
            Rgba {
                r: 0x11,
                g: 0x22,
                b: 0x33,
                a: 0x44
            }
        );
        assert_eq!(Rgba::parse("#f008").unwrap().a, 0x88);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        for bad in ["fff", "#ff", "#gggggg", "#12345", "", "#ffé"] {
            assert!(
                matches!(Rgba::parse(bad), Err(FxError::InvalidColor(_))),
                "{bad:?} should not parse"
            );
        }
    }

    #[test]
    fn test_serde_uses_hex_strings() {
        let json = serde_json::to_string(&Rgba::rgb(0xa8, 0x55, 0xf7)).unwrap();
        assert_eq!(json, "\"#a855f7\"");
        let back: Rgba = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Rgba::rgb(0xa8, 0x55, 0xf7));
        assert!(serde_json::from_str::<Rgba>("\"nope\"").is_err());
    }

    #[test]
    fn test_to_f32_scales_alpha() {
        let c = Rgba::WHITE.to_f32(0.5);
        assert_eq!(c, [1.0, 1.0, 1.0, 0.5]);
        assert_eq!(Rgba::BLACK.to_f32(2.0)[3], 1.0);
    }
}
