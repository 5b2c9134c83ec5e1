//! Color conversions and color-theory helpers.
//!
//! | Function | Result |
//! |---|---|
//! | [`Rgb::hex`] / [`Rgb::from_hex`] | lower-case `#rrggbb` |
//! | [`Rgb::to_hsl`] / [`Hsl::to_hex`] | rounded HSL (h 0–360, s/l 0–100) |
//! | [`Rgb::to_cmyk`] | rounded CMYK percentages |
//! | [`ColorFamily::of`] | coarse hue family for naming and grouping |
//! | [`contrast_ratio`] / [`WcagGrade`] | WCAG 2 contrast |
//! | [`shades`] | five tints and five shades around a base color |

use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Hsl {
    pub h: u16,
    pub s: u8,
    pub l: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Cmyk {
    pub c: u8,
    pub m: u8,
    pub y: u8,
    pub k: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Build from wider channels, clamping each to `0..=255`.
    pub fn clamped(channels: [u16; 3]) -> Self {
        let c = |v: u16| v.min(255) as u8;
        Self::new(c(channels[0]), c(channels[1]), c(channels[2]))
    }

    /// Parse `#rrggbb` or `rrggbb`, any case.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
        Some(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }

    pub fn hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    pub fn to_hsl(self) -> Hsl {
        let (r, g, b) = (
            f64::from(self.r) / 255.0,
            f64::from(self.g) / 255.0,
            f64::from(self.b) / 255.0,
        );
        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let l = (max + min) / 2.0;

        let (h, s) = if max == min {
            (0.0, 0.0)
        } else {
            let d = max - min;
            let s = if l > 0.5 {
                d / (2.0 - max - min)
            } else {
                d / (max + min)
            };
            let h = if max == r {
                (g - b) / d + if g < b { 6.0 } else { 0.0 }
            } else if max == g {
                (b - r) / d + 2.0
            } else {
                (r - g) / d + 4.0
            };
            (h / 6.0, s)
        };

        Hsl {
            h: (h * 360.0).round() as u16,
            s: (s * 100.0).round() as u8,
            l: (l * 100.0).round() as u8,
        }
    }

    /// Pure black is `0, 0, 0, 100`.
    pub fn to_cmyk(self) -> Cmyk {
        let c = 1.0 - f64::from(self.r) / 255.0;
        let m = 1.0 - f64::from(self.g) / 255.0;
        let y = 1.0 - f64::from(self.b) / 255.0;
        let k = c.min(m).min(y);
        if k == 1.0 {
            return Cmyk { c: 0, m: 0, y: 0, k: 100 };
        }
        let pct = |v: f64| ((v - k) / (1.0 - k) * 100.0).round() as u8;
        Cmyk {
            c: pct(c),
            m: pct(m),
            y: pct(y),
            k: (k * 100.0).round() as u8,
        }
    }

    /// WCAG relative luminance.
    pub fn luminance(self) -> f64 {
        let linear = |c: u8| {
            let c = f64::from(c) / 255.0;
            if c <= 0.03928 {
                c / 12.92
            } else {
                ((c + 0.055) / 1.055).powf(2.4)
            }
        };
        0.2126 * linear(self.r) + 0.7152 * linear(self.g) + 0.0722 * linear(self.b)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgb({}, {}, {})", self.r, self.g, self.b)
    }
}

impl Hsl {
    pub fn to_hex(self) -> String {
        hsl_to_hex(f64::from(self.h), f64::from(self.s), f64::from(self.l))
    }
}

impl fmt::Display for Hsl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "hsl({}, {}%, {}%)", self.h, self.s, self.l)
    }
}

impl fmt::Display for Cmyk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cmyk({}%, {}%, {}%, {}%)", self.c, self.m, self.y, self.k)
    }
}

/// HSL (degrees, percent, percent) to `#rrggbb`.
pub fn hsl_to_hex(h: f64, s: f64, l: f64) -> String {
    let (s, l) = (s / 100.0, l / 100.0);
    let a = s * l.min(1.0 - l);
    let channel = |n: f64| {
        let k = (n + h / 30.0) % 12.0;
        let color = l - a * (k - 3.0).min(9.0 - k).min(1.0).max(-1.0);
        (255.0 * color).round().clamp(0.0, 255.0) as u8
    };
    format!("#{:02x}{:02x}{:02x}", channel(0.0), channel(8.0), channel(4.0))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorFamily {
    Black,
    White,
    Gray,
    Red,
    Orange,
    Yellow,
    Green,
    Cyan,
    Blue,
    Purple,
    Pink,
}

impl ColorFamily {
    /// Lightness extremes first, then low saturation, then hue bands.
    pub fn of(hsl: Hsl) -> Self {
        let Hsl { h, s, l } = hsl;
        if l < 15 {
            return ColorFamily::Black;
        }
        if l > 90 {
            return ColorFamily::White;
        }
        if s < 10 {
            return ColorFamily::Gray;
        }
        match h {
            0..15 | 345.. => ColorFamily::Red,
            15..45 => ColorFamily::Orange,
            45..70 => ColorFamily::Yellow,
            70..165 => ColorFamily::Green,
            165..195 => ColorFamily::Cyan,
            195..265 => ColorFamily::Blue,
            265..295 => ColorFamily::Purple,
            _ => ColorFamily::Pink,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ColorFamily::Black => "black",
            ColorFamily::White => "white",
            ColorFamily::Gray => "gray",
            ColorFamily::Red => "red",
            ColorFamily::Orange => "orange",
            ColorFamily::Yellow => "yellow",
            ColorFamily::Green => "green",
            ColorFamily::Cyan => "cyan",
            ColorFamily::Blue => "blue",
            ColorFamily::Purple => "purple",
            ColorFamily::Pink => "pink",
        }
    }
}

/// WCAG contrast ratio, 1.0 to 21.0.
pub fn contrast_ratio(a: Rgb, b: Rgb) -> f64 {
    let (la, lb) = (a.luminance(), b.luminance());
    let (lighter, darker) = if la > lb { (la, lb) } else { (lb, la) };
    (lighter + 0.05) / (darker + 0.05)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum WcagGrade {
    Aaa,
    Aa,
    AaLarge,
    Fail,
}

impl WcagGrade {
    pub fn for_ratio(ratio: f64) -> Self {
        if ratio >= 7.0 {
            WcagGrade::Aaa
        } else if ratio >= 4.5 {
            WcagGrade::Aa
        } else if ratio >= 3.0 {
            WcagGrade::AaLarge
        } else {
            WcagGrade::Fail
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            WcagGrade::Aaa => "AAA",
            WcagGrade::Aa => "AA",
            WcagGrade::AaLarge => "AA Large",
            WcagGrade::Fail => "Fail",
        }
    }
}

/// Lighter tints (lightest first), the base and darker shades.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Shades {
    pub tints: Vec<String>,
    pub base: String,
    pub shades: Vec<String>,
}

/// Tints step lightness up by 8 (capped at 98), shades step it down by 10
/// (floored at 5).
pub fn shades(base: Rgb) -> Shades {
    let hsl = base.to_hsl();
    let (h, s, l) = (f64::from(hsl.h), f64::from(hsl.s), f64::from(hsl.l));
    let tints = (1..=5)
        .rev()
        .map(|i| hsl_to_hex(h, s, (l + f64::from(i) * 8.0).min(98.0)))
        .collect();
    let darker = (1..=5)
        .map(|i| hsl_to_hex(h, s, (l - f64::from(i) * 10.0).max(5.0)))
        .collect();
    Shades {
        tints,
        base: base.hex(),
        shades: darker,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // =========================================================================
    // Conversions
    // =========================================================================

    #[test]
    fn hex_round_trip_and_parse() {
        let c = Rgb::new(0x33, 0x66, 0x99);
        assert_eq!(c.hex(), "#336699");
        assert_eq!(Rgb::from_hex("#336699"), Some(c));
        assert_eq!(Rgb::from_hex("33669A").map(|c| c.b), Some(0x9a));
        assert_eq!(Rgb::from_hex("#3366"), None);
        assert_eq!(Rgb::from_hex("#zz6699"), None);
    }

    #[test]
    fn clamped_caps_bucket_overflow() {
        assert_eq!(Rgb::clamped([256, 128, 0]), Rgb::new(255, 128, 0));
    }

    #[test]
    fn hsl_of_primaries_and_grays() {
        assert_eq!(Rgb::new(255, 0, 0).to_hsl(), Hsl { h: 0, s: 100, l: 50 });
        assert_eq!(Rgb::new(0, 255, 0).to_hsl(), Hsl { h: 120, s: 100, l: 50 });
        assert_eq!(Rgb::new(0, 0, 255).to_hsl(), Hsl { h: 240, s: 100, l: 50 });
        assert_eq!(Rgb::new(128, 128, 128).to_hsl(), Hsl { h: 0, s: 0, l: 50 });
        assert_eq!(Rgb::new(0x33, 0x66, 0x99).to_hsl(), Hsl { h: 210, s: 50, l: 40 });
    }

    #[test]
    fn hsl_to_hex_matches_known_colors() {
        assert_eq!(hsl_to_hex(0.0, 100.0, 50.0), "#ff0000");
        assert_eq!(hsl_to_hex(210.0, 50.0, 40.0), "#336699");
        assert_eq!(hsl_to_hex(0.0, 0.0, 100.0), "#ffffff");
        assert_eq!(Hsl { h: 120, s: 100, l: 25 }.to_hex(), "#008000");
    }

    #[test]
    fn cmyk_conversion() {
        assert_eq!(Rgb::new(0, 0, 0).to_cmyk(), Cmyk { c: 0, m: 0, y: 0, k: 100 });
        assert_eq!(Rgb::new(255, 255, 255).to_cmyk(), Cmyk { c: 0, m: 0, y: 0, k: 0 });
        assert_eq!(Rgb::new(255, 0, 0).to_cmyk(), Cmyk { c: 0, m: 100, y: 100, k: 0 });
        assert_eq!(Rgb::new(0x33, 0x66, 0x99).to_cmyk(), Cmyk { c: 67, m: 33, y: 0, k: 40 });
    }

    // =========================================================================
    // Families and contrast
    // =========================================================================

    #[test]
    fn families_by_lightness_saturation_and_hue() {
        let family = |hex: &str| ColorFamily::of(Rgb::from_hex(hex).unwrap().to_hsl());
        assert_eq!(family("#050505"), ColorFamily::Black);
        assert_eq!(family("#fafafa"), ColorFamily::White);
        assert_eq!(family("#808080"), ColorFamily::Gray);
        assert_eq!(family("#ff0000"), ColorFamily::Red);
        assert_eq!(family("#ff8000"), ColorFamily::Orange);
        assert_eq!(family("#ffff00"), ColorFamily::Yellow);
        assert_eq!(family("#00ff00"), ColorFamily::Green);
        assert_eq!(family("#00ffff"), ColorFamily::Cyan);
        assert_eq!(family("#0000ff"), ColorFamily::Blue);
        assert_eq!(family("#8000ff"), ColorFamily::Purple);
        assert_eq!(family("#ff00c0"), ColorFamily::Pink);
    }

    #[test]
    fn contrast_extremes_and_grades() {
        let black = Rgb::new(0, 0, 0);
        let white = Rgb::new(255, 255, 255);
        assert!((contrast_ratio(black, white) - 21.0).abs() < 1e-9);
        assert!((contrast_ratio(white, white) - 1.0).abs() < 1e-9);
        assert_eq!(contrast_ratio(black, white), contrast_ratio(white, black));

        assert_eq!(WcagGrade::for_ratio(21.0), WcagGrade::Aaa);
        assert_eq!(WcagGrade::for_ratio(4.5), WcagGrade::Aa);
        assert_eq!(WcagGrade::for_ratio(3.2).label(), "AA Large");
        assert_eq!(WcagGrade::for_ratio(1.5).label(), "Fail");
    }

    #[test]
    fn shades_step_lightness() {
        let s = shades(Rgb::new(0x33, 0x66, 0x99));
        assert_eq!(s.base, "#336699");
        assert_eq!(s.tints.len(), 5);
        assert_eq!(s.shades.len(), 5);
        // l = 40: tints at 80, 72, 64, 56, 48; shades at 30, 20, 10, 5, 5
        assert_eq!(s.tints[0], hsl_to_hex(210.0, 50.0, 80.0));
        assert_eq!(s.tints[4], hsl_to_hex(210.0, 50.0, 48.0));
        assert_eq!(s.shades[0], hsl_to_hex(210.0, 50.0, 30.0));
        assert_eq!(s.shades[3], s.shades[4]);
    }
}
