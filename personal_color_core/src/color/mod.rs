//! Color space conversion and perceptual distance.

pub mod convert;
pub mod distance;

pub use convert::{
    cmyk_to_rgb, hex_to_rgb, lab_to_rgb, rgb_from_channels, rgb_to_cmyk, rgb_to_hsl, rgb_to_lab,
    rgb_to_xyz, Cmyk, Color, Hsl, Lab, Rgb, D65_WHITE_POINT,
};
pub use distance::{delta_e, delta_e_rgb, matching_score, MatchQuality};
