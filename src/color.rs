//! Color model: HSB picker values, RGB triples and normalized hex strings.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// An 8-bit RGB triple.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb { r: 255, g: 255, b: 255 };

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn to_hex(self) -> HexColor {
        HexColor(self)
    }
}

/// Hue (degrees), saturation and brightness (percent).
///
/// Saturation and brightness are clamped to `0..=100`. Hue is kept in
/// `0..=360` so a hue bar dragged to its right edge stays there; values
/// outside that range wrap.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hsb {
    hue: f64,
    saturation: f64,
    brightness: f64,
}

impl Hsb {
    pub fn new(hue: f64, saturation: f64, brightness: f64) -> Self {
        Self {
            hue: normalize_hue(hue),
            saturation: clamp_percent(saturation),
            brightness: clamp_percent(brightness),
        }
    }

    pub fn hue(&self) -> f64 {
        self.hue
    }

    pub fn saturation(&self) -> f64 {
        self.saturation
    }

    pub fn brightness(&self) -> f64 {
        self.brightness
    }

    pub fn with_hue(self, hue: f64) -> Self {
        Self::new(hue, self.saturation, self.brightness)
    }

    pub fn with_sat_bri(self, saturation: f64, brightness: f64) -> Self {
        Self::new(self.hue, saturation, brightness)
    }

    /// Standard HSV → RGB on the conventional wheel (0 red, 120 green, 240 blue).
    pub fn to_rgb(&self) -> Rgb {
        let h = self.hue.rem_euclid(360.0);
        let s = self.saturation / 100.0;
        let v = self.brightness / 100.0;
        let c = v * s;
        let x = c * (1.0 - ((h / 60.0) % 2.0 - 1.0).abs());
        let m = v - c;
        let (r, g, b) = match h {
            h if h < 60.0 => (c, x, 0.0),
            h if h < 120.0 => (x, c, 0.0),
            h if h < 180.0 => (0.0, c, x),
            h if h < 240.0 => (0.0, x, c),
            h if h < 300.0 => (x, 0.0, c),
            _ => (c, 0.0, x),
        };
        Rgb::new(to_channel(r + m), to_channel(g + m), to_channel(b + m))
    }

    pub fn to_hex(&self) -> HexColor {
        self.to_rgb().to_hex()
    }

    /// CSS `hsl()` of the fully saturated hue, used as the picker backdrop.
    pub fn pure_hue_css(&self) -> String {
        format!("hsl({},100%,50%)", self.hue)
    }
}

impl Default for Hsb {
    fn default() -> Self {
        use crate::config::{DEFAULT_BRIGHTNESS, DEFAULT_HUE, DEFAULT_SATURATION};
        Self::new(DEFAULT_HUE, DEFAULT_SATURATION, DEFAULT_BRIGHTNESS)
    }
}

fn normalize_hue(hue: f64) -> f64 {
    if !hue.is_finite() {
        0.0
    } else if (0.0..=360.0).contains(&hue) {
        hue
    } else {
        hue.rem_euclid(360.0)
    }
}

fn clamp_percent(v: f64) -> f64 {
    if v.is_nan() { 0.0 } else { v.clamp(0.0, 100.0) }
}

fn to_channel(unit: f64) -> u8 {
    (unit * 255.0).round().clamp(0.0, 255.0) as u8
}

/// A color stored as `#rrggbb`. Parsing is case-insensitive; output is
/// always lowercase.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct HexColor(Rgb);

impl HexColor {
    pub const WHITE: HexColor = HexColor(Rgb::WHITE);

    pub fn rgb(self) -> Rgb {
        self.0
    }

    /// Strict form accepted from the text field: `#` followed by exactly six
    /// hex digits.
    pub fn parse_strict(text: &str) -> Option<Self> {
        let digits = text.strip_prefix('#')?;
        parse_digits(digits).map(HexColor)
    }

    /// Lenient form: the leading `#` is optional.
    pub fn parse_lenient(text: &str) -> Option<Self> {
        let digits = text.strip_prefix('#').unwrap_or(text);
        parse_digits(digits).map(HexColor)
    }
}

fn parse_digits(digits: &str) -> Option<Rgb> {
    if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
    Some(Rgb::new(channel(0)?, channel(2)?, channel(4)?))
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Rgb { r, g, b } = self.0;
        write!(f, "#{r:02x}{g:02x}{b:02x}")
    }
}

impl FromStr for HexColor {
    type Err = InvalidHex;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        HexColor::parse_lenient(s).ok_or(InvalidHex)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("expected a #rrggbb color")]
pub struct InvalidHex;

impl Serialize for HexColor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for HexColor {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

/// HSB → `#rrggbb`, each channel rounded to the nearest integer.
pub fn hsb_to_hex(h: f64, s: f64, b: f64) -> String {
    Hsb::new(h, s, b).to_hex().to_string()
}

/// Parses six hex digits with an optional leading `#`. Malformed input
/// yields opaque white; recoloring is best effort.
pub fn hex_to_rgb(hex: &str) -> Rgb {
    HexColor::parse_lenient(hex).map_or(Rgb::WHITE, HexColor::rgb)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_points() {
        assert_eq!(hsb_to_hex(0.0, 100.0, 100.0), "#ff0000");
        assert_eq!(hsb_to_hex(120.0, 100.0, 100.0), "#00ff00");
        assert_eq!(hsb_to_hex(240.0, 100.0, 100.0), "#0000ff");
        assert_eq!(hsb_to_hex(0.0, 0.0, 100.0), "#ffffff");
        assert_eq!(hsb_to_hex(0.0, 100.0, 0.0), "#000000");
    }

    #[test]
    fn hue_360_wraps_to_red() {
        assert_eq!(hsb_to_hex(360.0, 100.0, 100.0), "#ff0000");
        assert_eq!(Hsb::new(360.0, 50.0, 50.0).hue(), 360.0);
        assert_eq!(Hsb::new(420.0, 50.0, 50.0).hue(), 60.0);
        assert_eq!(Hsb::new(-30.0, 50.0, 50.0).hue(), 330.0);
    }

    #[test]
    fn out_of_range_percentages_are_clamped() {
        let c = Hsb::new(10.0, 140.0, -5.0);
        assert_eq!(c.saturation(), 100.0);
        assert_eq!(c.brightness(), 0.0);
        assert_eq!(Hsb::new(f64::NAN, f64::NAN, 50.0).hue(), 0.0);
    }

    #[test]
    fn secondary_and_mid_colors() {
        assert_eq!(hsb_to_hex(60.0, 100.0, 100.0), "#ffff00");
        assert_eq!(hsb_to_hex(180.0, 100.0, 100.0), "#00ffff");
        assert_eq!(hsb_to_hex(300.0, 100.0, 100.0), "#ff00ff");
        assert_eq!(hsb_to_hex(0.0, 0.0, 50.0), "#808080");
    }

    #[test]
    fn hex_to_rgb_is_case_insensitive_and_hash_optional() {
        assert_eq!(hex_to_rgb("#FF00aa"), Rgb::new(255, 0, 170));
        assert_eq!(hex_to_rgb("336699"), Rgb::new(0x33, 0x66, 0x99));
    }

    #[test]
    fn hex_to_rgb_falls_back_to_white() {
        for bad in ["not-a-color", "", "#12345", "#1234567", "#gg0000", "##112233"] {
            assert_eq!(hex_to_rgb(bad), Rgb::WHITE, "input {bad:?}");
        }
    }

    #[test]
    fn strict_parse_requires_hash() {
        assert!(HexColor::parse_strict("ff00aa").is_none());
        assert!(HexColor::parse_strict("#ff00a").is_none());
        assert_eq!(
            HexColor::parse_strict("#FF00AA").map(|c| c.to_string()),
            Some("#ff00aa".to_string())
        );
    }

    #[test]
    fn hex_serializes_as_lowercase_string() {
        let c: HexColor = "#ABCDEF".parse().unwrap();
        assert_eq!(serde_json::to_string(&c).unwrap(), "\"#abcdef\"");
        let back: HexColor = serde_json::from_str("\"#abcdef\"").unwrap();
        assert_eq!(back, c);
        assert!(serde_json::from_str::<HexColor>("\"teal\"").is_err());
    }

    #[test]
    fn pure_hue_backdrop() {
        assert_eq!(Hsb::new(200.0, 10.0, 10.0).pure_hue_css(), "hsl(200,100%,50%)");
    }
}
