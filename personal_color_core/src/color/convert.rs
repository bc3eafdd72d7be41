//! Deterministic color space conversions.
//!
//! Fixed-parameter transforms between sRGB, CMYK, HSL and CIELAB using the
//! D65 reference white. Every function is pure: identical input always
//! produces bit-identical output, which the query cache and the ranking
//! tests both rely on.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ColorError, ColorResult};

/// D65 reference white (Xn, Yn, Zn).
pub const D65_WHITE_POINT: [f64; 3] = [0.95047, 1.0, 1.08883];
const EPSILON: f64 = 0.008856;
const KAPPA_SLOPE: f64 = 7.787;
const LAB_OFFSET: f64 = 16.0 / 116.0;

/// sRGB → XYZ (D65) matrix, row-major.
const RGB_TO_XYZ: [[f64; 3]; 3] = [
    [0.4124, 0.3576, 0.1805],
    [0.2126, 0.7152, 0.0722],
    [0.0193, 0.1192, 0.9505],
];

/// XYZ (D65) → linear sRGB matrix, row-major.
const XYZ_TO_RGB: [[f64; 3]; 3] = [
    [3.2404542, -1.5371385, -0.4985314],
    [-0.9692660, 1.8760108, 0.0415560],
    [0.0556434, -0.2040259, 1.0572252],
];

/// sRGB color with 8-bit gamma-encoded channels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn to_lab(self) -> Lab {
        rgb_to_lab(self)
    }

    pub fn to_hsl(self) -> Hsl {
        rgb_to_hsl(self)
    }

    pub fn to_cmyk(self) -> Cmyk {
        rgb_to_cmyk(self)
    }

    /// Uppercase `#RRGGBB` representation.
    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Rgb {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        hex_to_rgb(s)
    }
}

/// CIE L*a*b* coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct Lab {
    /// Lightness [0, 100]
    pub l: f64,
    /// Green-red axis
    pub a: f64,
    /// Blue-yellow axis
    pub b: f64,
}

impl Lab {
    pub const fn new(l: f64, a: f64, b: f64) -> Self {
        Self { l, a, b }
    }

    pub fn to_rgb(self) -> Rgb {
        lab_to_rgb(self)
    }
}

/// Hue in degrees [0, 360), saturation and lightness in [0, 1].
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct Hsl {
    pub h: f64,
    pub s: f64,
    pub l: f64,
}

/// Subtractive process color, every component in [0, 1].
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct Cmyk {
    pub c: f64,
    pub m: f64,
    pub y: f64,
    pub k: f64,
}

impl Cmyk {
    pub const fn new(c: f64, m: f64, y: f64, k: f64) -> Self {
        Self { c, m, y, k }
    }
}

/// A color as supplied by a caller: either an sRGB sample or an already
/// measured Lab value.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Rgb(Rgb),
    Lab(Lab),
}

impl Color {
    pub fn from_hex(hex: &str) -> ColorResult<Self> {
        hex_to_rgb(hex).map(Color::Rgb)
    }

    pub fn to_lab(self) -> Lab {
        match self {
            Color::Rgb(rgb) => rgb_to_lab(rgb),
            Color::Lab(lab) => lab,
        }
    }

    /// sRGB value; Lab colors go through the CIE inverse and are clamped to gamut.
    pub fn to_rgb(self) -> Rgb {
        match self {
            Color::Rgb(rgb) => rgb,
            Color::Lab(lab) => lab_to_rgb(lab),
        }
    }

    /// HSL hue angle in degrees.
    pub fn hue(self) -> f64 {
        rgb_to_hsl(self.to_rgb()).h
    }
}

impl From<Rgb> for Color {
    fn from(rgb: Rgb) -> Self {
        Color::Rgb(rgb)
    }
}

impl From<Lab> for Color {
    fn from(lab: Lab) -> Self {
        Color::Lab(lab)
    }
}

/// Parse a 6-digit hex color, with or without a leading `#`, case-insensitive.
pub fn hex_to_rgb(hex: &str) -> ColorResult<Rgb> {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    if digits.len() != 6 {
        return Err(ColorError::invalid_format(
            hex,
            format!("expected 6 hex digits, found {}", digits.len()),
        ));
    }
    if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(ColorError::invalid_format(hex, "non-hexadecimal digit"));
    }

    let channel = |range: std::ops::Range<usize>| {
        u8::from_str_radix(&digits[range], 16)
            .map_err(|err| ColorError::invalid_format(hex, err.to_string()))
    };

    Ok(Rgb::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

/// Build an [`Rgb`] from untrusted integer channels.
pub fn rgb_from_channels(r: i64, g: i64, b: i64) -> ColorResult<Rgb> {
    let check = |name: &str, value: i64| {
        u8::try_from(value).map_err(|_| {
            ColorError::invalid_format(
                format!("{}={}", name, value),
                "channel must be within 0..=255",
            )
        })
    };
    Ok(Rgb::new(check("r", r)?, check("g", g)?, check("b", b)?))
}

fn srgb_to_linear(channel: f64) -> f64 {
    if channel > 0.04045 {
        ((channel + 0.055) / 1.055).powf(2.4)
    } else {
        channel / 12.92
    }
}

fn linear_to_srgb(channel: f64) -> f64 {
    if channel > 0.0031308 {
        1.055 * channel.powf(1.0 / 2.4) - 0.055
    } else {
        12.92 * channel
    }
}

fn mat3(m: &[[f64; 3]; 3], v: [f64; 3]) -> [f64; 3] {
    [
        m[0][0] * v[0] + m[0][1] * v[1] + m[0][2] * v[2],
        m[1][0] * v[0] + m[1][1] * v[1] + m[1][2] * v[2],
        m[2][0] * v[0] + m[2][1] * v[1] + m[2][2] * v[2],
    ]
}

/// Convert an sRGB color to XYZ (D65), Y normalized to [0, 1].
pub fn rgb_to_xyz(rgb: Rgb) -> [f64; 3] {
    let linear = [
        srgb_to_linear(rgb.r as f64 / 255.0),
        srgb_to_linear(rgb.g as f64 / 255.0),
        srgb_to_linear(rgb.b as f64 / 255.0),
    ];
    mat3(&RGB_TO_XYZ, linear)
}

fn lab_f(t: f64) -> f64 {
    if t > EPSILON {
        t.cbrt()
    } else {
        KAPPA_SLOPE * t + LAB_OFFSET
    }
}

fn lab_f_inv(f: f64) -> f64 {
    let cube = f * f * f;
    if cube > EPSILON {
        cube
    } else {
        (f - LAB_OFFSET) / KAPPA_SLOPE
    }
}

/// Convert an sRGB color to CIELAB coordinates (L*, a*, b*).
pub fn rgb_to_lab(rgb: Rgb) -> Lab {
    let xyz = rgb_to_xyz(rgb);
    let fx = lab_f(xyz[0] / D65_WHITE_POINT[0]);
    let fy = lab_f(xyz[1] / D65_WHITE_POINT[1]);
    let fz = lab_f(xyz[2] / D65_WHITE_POINT[2]);

    Lab {
        l: 116.0 * fy - 16.0,
        a: 500.0 * (fx - fy),
        b: 200.0 * (fy - fz),
    }
}

/// CIE inverse of [`rgb_to_lab`]. Out-of-gamut values are clamped per channel.
pub fn lab_to_rgb(lab: Lab) -> Rgb {
    let fy = (lab.l + 16.0) / 116.0;
    let fx = fy + lab.a / 500.0;
    let fz = fy - lab.b / 200.0;

    let xyz = [
        lab_f_inv(fx) * D65_WHITE_POINT[0],
        lab_f_inv(fy) * D65_WHITE_POINT[1],
        lab_f_inv(fz) * D65_WHITE_POINT[2],
    ];
    let linear = mat3(&XYZ_TO_RGB, xyz);

    let encode = |c: f64| {
        (linear_to_srgb(c.clamp(0.0, 1.0)) * 255.0)
            .round()
            .clamp(0.0, 255.0) as u8
    };
    Rgb::new(encode(linear[0]), encode(linear[1]), encode(linear[2]))
}

/// Standard max/min channel HSL conversion.
pub fn rgb_to_hsl(rgb: Rgb) -> Hsl {
    let r = rgb.r as f64 / 255.0;
    let g = rgb.g as f64 / 255.0;
    let b = rgb.b as f64 / 255.0;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;
    let l = (max + min) / 2.0;

    if delta == 0.0 {
        return Hsl { h: 0.0, s: 0.0, l };
    }

    let s = if l > 0.5 {
        delta / (2.0 - max - min)
    } else {
        delta / (max + min)
    };

    let sector = if max == r {
        ((g - b) / delta).rem_euclid(6.0)
    } else if max == g {
        (b - r) / delta + 2.0
    } else {
        (r - g) / delta + 4.0
    };

    Hsl {
        h: (sector * 60.0).rem_euclid(360.0),
        s,
        l,
    }
}

/// Naive (profile-free) RGB → CMYK separation.
pub fn rgb_to_cmyk(rgb: Rgb) -> Cmyk {
    let r = rgb.r as f64 / 255.0;
    let g = rgb.g as f64 / 255.0;
    let b = rgb.b as f64 / 255.0;

    let k = 1.0 - r.max(g).max(b);
    if k >= 1.0 {
        return Cmyk::new(0.0, 0.0, 0.0, 1.0);
    }

    Cmyk {
        c: (1.0 - r - k) / (1.0 - k),
        m: (1.0 - g - k) / (1.0 - k),
        y: (1.0 - b - k) / (1.0 - k),
        k,
    }
}

/// Inverse of [`rgb_to_cmyk`]; every component must lie in [0, 1].
pub fn cmyk_to_rgb(cmyk: Cmyk) -> ColorResult<Rgb> {
    for (name, value) in [("c", cmyk.c), ("m", cmyk.m), ("y", cmyk.y), ("k", cmyk.k)] {
        if !value.is_finite() || !(0.0..=1.0).contains(&value) {
            return Err(ColorError::invalid_format(
                format!("{}={}", name, value),
                "CMYK component must be within [0, 1]",
            ));
        }
    }

    let channel = |ink: f64| (255.0 * (1.0 - ink) * (1.0 - cmyk.k)).round() as u8;
    Ok(Rgb::new(channel(cmyk.c), channel(cmyk.m), channel(cmyk.y)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_equal(a: f64, b: f64, eps: f64) {
        assert!((a - b).abs() <= eps, "{} !≈ {}", a, b);
    }

    #[test]
    fn hex_parses_with_and_without_hash() {
        assert_eq!(hex_to_rgb("#FF0000").unwrap(), Rgb::new(255, 0, 0));
        assert_eq!(hex_to_rgb("ff8800").unwrap(), Rgb::new(255, 136, 0));
        assert_eq!(hex_to_rgb("#aBcDeF").unwrap(), Rgb::new(0xAB, 0xCD, 0xEF));
    }

    #[test]
    fn hex_rejects_malformed_input() {
        for bad in ["", "#", "#FFF", "#FF00000", "##FF0000", "#GG0000", "FF 000", "#ff00ü"] {
            assert!(
                matches!(hex_to_rgb(bad), Err(ColorError::InvalidFormat { .. })),
                "accepted {bad:?}"
            );
        }
    }

    #[test]
    fn hex_formatting_is_uppercase() {
        assert_eq!(Rgb::new(255, 219, 88).to_hex(), "#FFDB58");
        assert_eq!("#ffdb58".parse::<Rgb>().unwrap().to_string(), "#FFDB58");
    }

    #[test]
    fn channels_out_of_range_are_rejected() {
        assert_eq!(rgb_from_channels(1, 2, 3).unwrap(), Rgb::new(1, 2, 3));
        assert!(rgb_from_channels(256, 0, 0).is_err());
        assert!(rgb_from_channels(0, -1, 0).is_err());
    }

    #[test]
    fn pure_red_lab_reference() {
        let lab = rgb_to_lab(Rgb::new(255, 0, 0));
        approx_equal(lab.l, 53.24, 0.5);
        approx_equal(lab.a, 80.09, 0.5);
        approx_equal(lab.b, 67.20, 0.5);
    }

    #[test]
    fn white_and_black_endpoints() {
        let white = rgb_to_lab(Rgb::new(255, 255, 255));
        approx_equal(white.l, 100.0, 1e-2);
        approx_equal(white.a, 0.0, 0.05);
        approx_equal(white.b, 0.0, 0.05);

        let black = rgb_to_lab(Rgb::new(0, 0, 0));
        approx_equal(black.l, 0.0, 1e-9);
    }

    #[test]
    fn lab_inverse_recovers_primaries() {
        for rgb in [
            Rgb::new(255, 0, 0),
            Rgb::new(0, 255, 0),
            Rgb::new(0, 0, 255),
            Rgb::new(128, 128, 128),
        ] {
            let back = lab_to_rgb(rgb_to_lab(rgb));
            assert!((back.r as i16 - rgb.r as i16).abs() <= 2, "{rgb:?} -> {back:?}");
            assert!((back.g as i16 - rgb.g as i16).abs() <= 2, "{rgb:?} -> {back:?}");
            assert!((back.b as i16 - rgb.b as i16).abs() <= 2, "{rgb:?} -> {back:?}");
        }
    }

    #[test]
    fn hsl_hues_of_primaries() {
        approx_equal(rgb_to_hsl(Rgb::new(255, 0, 0)).h, 0.0, 1e-9);
        approx_equal(rgb_to_hsl(Rgb::new(0, 255, 0)).h, 120.0, 1e-9);
        approx_equal(rgb_to_hsl(Rgb::new(0, 0, 255)).h, 240.0, 1e-9);
        approx_equal(rgb_to_hsl(Rgb::new(0, 255, 255)).h, 180.0, 1e-9);
        approx_equal(rgb_to_hsl(Rgb::new(255, 0, 255)).h, 300.0, 1e-9);

        let gray = rgb_to_hsl(Rgb::new(90, 90, 90));
        assert_eq!(gray.h, 0.0);
        assert_eq!(gray.s, 0.0);
    }

    #[test]
    fn cmyk_separation() {
        assert_eq!(rgb_to_cmyk(Rgb::new(0, 0, 0)), Cmyk::new(0.0, 0.0, 0.0, 1.0));

        let red = rgb_to_cmyk(Rgb::new(255, 0, 0));
        approx_equal(red.c, 0.0, 1e-12);
        approx_equal(red.m, 1.0, 1e-12);
        approx_equal(red.y, 1.0, 1e-12);
        approx_equal(red.k, 0.0, 1e-12);

        let teal = Rgb::new(0, 128, 128);
        assert_eq!(cmyk_to_rgb(rgb_to_cmyk(teal)).unwrap(), teal);
    }

    #[test]
    fn cmyk_rejects_out_of_range_components() {
        assert!(cmyk_to_rgb(Cmyk::new(1.2, 0.0, 0.0, 0.0)).is_err());
        assert!(cmyk_to_rgb(Cmyk::new(0.0, 0.0, 0.0, f64::NAN)).is_err());
    }

    #[test]
    fn conversions_are_deterministic() {
        let rgb = Rgb::new(201, 133, 97);
        assert_eq!(rgb_to_lab(rgb), rgb_to_lab(rgb));
        assert_eq!(Color::Rgb(rgb).to_lab(), Color::Lab(rgb_to_lab(rgb)).to_lab());
    }
}
