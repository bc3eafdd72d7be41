//! # Personal Color Core
//!
//! A deterministic perceptual color-matching engine for seasonal
//! personal-color consultation. Skin samples and swatches come in as sRGB,
//! are compared in CIE L*a*b* with the CIE76 ΔE, and ranked against an
//! injected catalog of seasonal reference colors.
//!
//! ## Quick Start
//!
//! ```rust
//! use personal_color_core::{MatchOptions, PaletteMatcher};
//!
//! let mut matcher = PaletteMatcher::builtin();
//!
//! let estimate = matcher.estimate_season_hex("#FF0000").unwrap();
//! println!("{} ({:.0}%)", estimate.season, estimate.confidence);
//!
//! let top = matcher
//!     .find_matches_hex("#FFDB58", &MatchOptions::default().with_limit(3))
//!     .unwrap();
//! for m in &top {
//!     println!("{} ΔE={:.1} {}", m.reference.label, m.delta_e, m.quality.label());
//! }
//! ```
//!
//! ## Core Modules
//!
//! - [`color`] - RGB/HSL/CMYK/Lab conversion and ΔE
//! - [`matcher`] - Catalog ranking and season estimation
//! - [`harmony`] - Hue-wheel harmony analysis
//! - [`config`] - Matcher configuration via TOML
//! - [`logging`] - JSON line-delimited audit log

pub mod catalog;
pub mod color;
pub mod config;
pub mod error;
pub mod harmony;
pub mod logging;
pub mod matcher;
pub mod query_cache;
pub mod season;

pub use catalog::{Catalog, ReferenceColor, SeasonalCatalog, PRIMARY_CATEGORY};
pub use color::{
    cmyk_to_rgb, delta_e, delta_e_rgb, hex_to_rgb, lab_to_rgb, matching_score, rgb_from_channels,
    rgb_to_cmyk, rgb_to_hsl, rgb_to_lab, rgb_to_xyz, Cmyk, Color, Hsl, Lab, MatchQuality, Rgb,
};
pub use config::{ConfigError, LoggingConfig, MatcherConfig};
pub use error::{ColorError, ColorResult};
pub use harmony::{
    analyze_combination, classify_harmony, HarmonyAnalysis, HarmonyMatch, HarmonyType,
};
pub use matcher::{
    average_samples, estimate_season_from_color, find_matches, summarize_by_category,
    CategorySummary, MatchOptions, MatchResult, PaletteMatcher, SeasonEstimate,
};
pub use query_cache::QueryCache;
pub use season::{Clarity, Depth, Season, SeasonProfile, SeasonSubtype, Temperature};
