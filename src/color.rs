//! Color model: conversion of a sampled 24-bit pixel to display strings.
//!
//! Every channel is a `u8`, so out-of-range input cannot be expressed; the
//! conversions below are total and never fail.

use crate::error::PickerError;
use palette::Srgb;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A sampled screen color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    red: u8,
    green: u8,
    blue: u8,
}

/// Integer HSL triple as shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HslComponents {
    /// Hue in degrees, `0..360`
    pub hue: u16,
    /// Saturation in percent, `0..=100`
    pub saturation: u8,
    /// Lightness in percent, `0..=100`
    pub lightness: u8,
}

impl Color {
    pub const fn from_rgb(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    pub fn channels(self) -> (u8, u8, u8) {
        (self.red, self.green, self.blue)
    }

    pub fn hex(self) -> String {
        to_hex(self.red, self.green, self.blue)
    }

    pub fn rgb_string(self) -> String {
        to_rgb_string(self.red, self.green, self.blue)
    }

    pub fn hsl(self) -> HslComponents {
        to_hsl(self.red, self.green, self.blue)
    }

    pub fn hsl_string(self) -> String {
        self.hsl().to_string()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.hex())
    }
}

/// Accepts `#RRGGBB` or `RRGGBB`, in either case.
impl FromStr for Color {
    type Err = PickerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.trim();
        let digits = digits.strip_prefix('#').unwrap_or(digits);
        if digits.len() != 6 || !digits.is_ascii() {
            return Err(PickerError::InvalidHexColor(s.to_string()));
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16)
                .map_err(|_| PickerError::InvalidHexColor(s.to_string()))
        };
        Ok(Self::from_rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }
}

impl TryFrom<String> for Color {
    type Error = PickerError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.hex()
    }
}

impl fmt::Display for HslComponents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} deg, {}%, {}%",
            self.hue, self.saturation, self.lightness
        )
    }
}

/// `#RRGGBB`, uppercase, each channel zero-padded to two digits.
pub fn to_hex(r: u8, g: u8, b: u8) -> String {
    format!("#{r:02X}{g:02X}{b:02X}")
}

/// `R, G, B` in decimal without padding.
pub fn to_rgb_string(r: u8, g: u8, b: u8) -> String {
    format!("{r}, {g}, {b}")
}

/// Lightness and saturation are rounded; hue is truncated toward zero in
/// every branch so the displayed value matches the classic Windows picker.
pub fn to_hsl(r: u8, g: u8, b: u8) -> HslComponents {
    let rgb: Srgb<f64> = Srgb::new(r, g, b).into_format();
    let (r, g, b) = (rgb.red, rgb.green, rgb.blue);

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;

    let lightness = ((max + min) / 2.0 * 100.0).round() as u8;

    if delta == 0.0 {
        return HslComponents {
            hue: 0,
            saturation: 0,
            lightness,
        };
    }

    let saturation = if lightness < 50 {
        delta / (max + min) * 100.0
    } else {
        delta / (2.0 - max - min) * 100.0
    }
    .round() as u8;

    let sector = if max == r {
        ((g - b) / delta).rem_euclid(6.0)
    } else if max == g {
        (b - r) / delta + 2.0
    } else {
        (r - g) / delta + 4.0
    };
    let hue = (sector * 60.0) as u16 % 360;

    HslComponents {
        hue,
        saturation,
        lightness,
    }
}

/// `H deg, S%, L%`
pub fn to_hsl_string(r: u8, g: u8, b: u8) -> String {
    to_hsl(r, g, b).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hsl(hue: u16, saturation: u8, lightness: u8) -> HslComponents {
        HslComponents {
            hue,
            saturation,
            lightness,
        }
    }

    #[test]
    fn test_hex_is_uppercase_and_padded() {
        assert_eq!(to_hex(99, 102, 241), "#6366F1");
        assert_eq!(to_hex(0, 10, 255), "#000AFF");
    }

    #[test]
    fn test_rgb_string() {
        assert_eq!(to_rgb_string(99, 102, 241), "99, 102, 241");
        assert_eq!(to_rgb_string(0, 0, 0), "0, 0, 0");
    }

    #[test]
    fn test_primary_hues() {
        assert_eq!(to_hsl(255, 0, 0), hsl(0, 100, 50));
        assert_eq!(to_hsl(0, 255, 0), hsl(120, 100, 50));
        assert_eq!(to_hsl(0, 0, 255), hsl(240, 100, 50));
    }

    #[test]
    fn test_secondary_hues() {
        assert_eq!(to_hsl(255, 255, 0), hsl(60, 100, 50));
        assert_eq!(to_hsl(0, 255, 255), hsl(180, 100, 50));
        assert_eq!(to_hsl(255, 0, 255), hsl(300, 100, 50));
    }

    #[test]
    fn test_hue_is_truncated_not_rounded() {
        // Exact hue is 238.73 degrees
        let value = to_hsl(99, 102, 241);
        assert_eq!(value, hsl(238, 84, 67));
        assert_eq!(to_hsl_string(99, 102, 241), "238 deg, 84%, 67%");
    }

    #[test]
    fn test_red_dominant_with_blue_above_green_wraps() {
        // (g - b) / delta is negative here and must wrap into 300..360
        let value = to_hsl(255, 0, 128);
        assert!(value.hue >= 300 && value.hue < 360, "hue was {}", value.hue);
        assert_eq!(value.hue, 329);
    }

    #[test]
    fn test_achromatic() {
        assert_eq!(to_hsl(0, 0, 0), hsl(0, 0, 0));
        assert_eq!(to_hsl(255, 255, 255), hsl(0, 0, 100));
        assert_eq!(to_hsl(128, 128, 128), hsl(0, 0, 50));
    }

    #[test]
    fn test_dark_color_uses_low_lightness_saturation_branch() {
        // l = 25, delta / (max + min) = 1
        assert_eq!(to_hsl(128, 0, 0), hsl(0, 100, 25));
    }

    #[test]
    fn test_parse_hex_variants() {
        let expected = Color::from_rgb(99, 102, 241);
        assert_eq!("#6366F1".parse::<Color>().unwrap(), expected);
        assert_eq!("6366f1".parse::<Color>().unwrap(), expected);
        assert_eq!("  #6366f1 ".parse::<Color>().unwrap(), expected);
    }

    #[test]
    fn test_parse_hex_rejects_garbage() {
        for input in ["", "#", "#12345", "#1234567", "#GG0000", "#éé000"] {
            assert!(
                matches!(input.parse::<Color>(), Err(PickerError::InvalidHexColor(_))),
                "accepted {input:?}"
            );
        }
    }

    #[test]
    fn test_color_serializes_as_hex_string() {
        let color = Color::from_rgb(1, 2, 3);
        let json = serde_json::to_string(&color).unwrap();
        assert_eq!(json, "\"#010203\"");
        let back: Color = serde_json::from_str(&json).unwrap();
        assert_eq!(back, color);
        assert!(serde_json::from_str::<Color>("\"nope\"").is_err());
    }

    #[test]
    fn test_color_accessors_delegate() {
        let color = Color::from_rgb(99, 102, 241);
        assert_eq!(color.channels(), (99, 102, 241));
        assert_eq!(color.hex(), "#6366F1");
        assert_eq!(color.rgb_string(), "99, 102, 241");
        assert_eq!(color.hsl_string(), "238 deg, 84%, 67%");
        assert_eq!(color.to_string(), "#6366F1");
    }

    // Property-based tests using proptest
    mod proptests {
        use super::*;
        use palette::encoding::Srgb;
        use palette::{FromColor, Hsl};
        use proptest::prelude::*;

        proptest! {
            /// Property: hex output parses back to the same channels
            #[test]
            fn hex_round_trips(r in any::<u8>(), g in any::<u8>(), b in any::<u8>()) {
                let hex = to_hex(r, g, b);
                prop_assert_eq!(hex.len(), 7);
                prop_assert_eq!(u8::from_str_radix(&hex[1..3], 16).unwrap(), r);
                prop_assert_eq!(u8::from_str_radix(&hex[3..5], 16).unwrap(), g);
                prop_assert_eq!(u8::from_str_radix(&hex[5..7], 16).unwrap(), b);
                prop_assert_eq!(hex.parse::<Color>().unwrap(), Color::from_rgb(r, g, b));
            }

            /// Property: grays have no hue or saturation
            #[test]
            fn achromatic_has_zero_hue_and_saturation(v in any::<u8>()) {
                let value = to_hsl(v, v, v);
                prop_assert_eq!(value.hue, 0);
                prop_assert_eq!(value.saturation, 0);
                let expected = (f64::from(v) / 255.0 * 100.0).round() as u8;
                prop_assert_eq!(value.lightness, expected);
            }

            /// Property: output stays within the documented ranges
            #[test]
            fn components_stay_in_range(r in any::<u8>(), g in any::<u8>(), b in any::<u8>()) {
                let value = to_hsl(r, g, b);
                prop_assert!(value.hue < 360);
                prop_assert!(value.saturation <= 100);
                prop_assert!(value.lightness <= 100);
            }

            /// Property: agrees with palette's HSL up to truncation of the hue
            #[test]
            fn agrees_with_palette(r in any::<u8>(), g in any::<u8>(), b in any::<u8>()) {
                let value = to_hsl(r, g, b);
                let reference: Hsl<Srgb, f64> = Hsl::from_color(palette::Srgb::new(r, g, b).into_format::<f64>());
                let lightness = (reference.lightness * 100.0).round();
                prop_assert!((f64::from(value.lightness) - lightness).abs() <= 1.0);
                if value.saturation > 0 {
                    let hue = reference.hue.into_positive_degrees();
                    let diff = (f64::from(value.hue) - hue).abs();
                    prop_assert!(diff <= 1.0 || diff >= 359.0, "hue {} vs {}", value.hue, hue);
                }
            }
        }
    }
}
