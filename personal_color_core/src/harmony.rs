//! Hue-wheel harmony classification for small color combinations.
//!
//! A combination may qualify for several harmony types at once; all of them
//! are reported, strongest first. The overall score blends three parts:
//!
//! - 40 % confidence of the strongest harmony type (0 when none qualify)
//! - 40 % palette fit: how well the colors sit in their best season
//! - 20 % diversity: mean pairwise ΔE relative to a target of 30
//!
//! All constants are fixed legacy calibration values.

use serde::Serialize;

use crate::catalog::Catalog;
use crate::color::{delta_e, matching_score, Color, Lab};
use crate::error::{ColorError, ColorResult};
use crate::season::Season;

const MONOCHROMATIC_MAX_SPREAD: f64 = 30.0;
const ANALOGOUS_MAX_SPREAD: f64 = 60.0;
const COMPLEMENTARY_BAND: (f64, f64) = (150.0, 210.0);
const TRIADIC_GAP: f64 = 120.0;
const TRIADIC_TOLERANCE: f64 = 30.0;
const DIVERSITY_TARGET: f64 = 30.0;

const HARMONY_WEIGHT: f64 = 0.4;
const PALETTE_WEIGHT: f64 = 0.4;
const DIVERSITY_WEIGHT: f64 = 0.2;

/// Relationship between colors on the hue wheel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HarmonyType {
    Monochromatic,
    Analogous,
    Complementary,
    Triadic,
}

impl HarmonyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            HarmonyType::Monochromatic => "monochromatic",
            HarmonyType::Analogous => "analogous",
            HarmonyType::Complementary => "complementary",
            HarmonyType::Triadic => "triadic",
        }
    }
}

/// A qualifying harmony type and its confidence in [0, 100].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HarmonyMatch {
    pub harmony: HarmonyType,
    pub confidence: f64,
}

/// Result of [`analyze_combination`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HarmonyAnalysis {
    /// Qualifying harmony types, highest confidence first
    pub harmonies: Vec<HarmonyMatch>,
    /// HSL hue of each input color, in input order
    pub hues: Vec<f64>,
    /// Mean pairwise ΔE among the inputs
    pub average_distance: f64,
    pub diversity_score: f64,
    pub palette_score: f64,
    pub overall_score: f64,
}

impl HarmonyAnalysis {
    /// Strongest qualifying harmony, if any.
    pub fn primary(&self) -> Option<&HarmonyMatch> {
        self.harmonies.first()
    }

    pub fn has(&self, harmony: HarmonyType) -> bool {
        self.harmonies.iter().any(|m| m.harmony == harmony)
    }
}

/// Absolute hue difference wrapped into [0, 360).
pub fn hue_difference(h1: f64, h2: f64) -> f64 {
    (h1 - h2).abs().rem_euclid(360.0)
}

/// Classify a set of hue angles (degrees). Order of `hues` does not matter.
pub fn classify_harmony(hues: &[f64]) -> Vec<HarmonyMatch> {
    let mut matches = Vec::new();
    if hues.len() < 2 {
        return matches;
    }

    let max = hues.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let min = hues.iter().copied().fold(f64::INFINITY, f64::min);
    let spread = max - min;

    if spread <= MONOCHROMATIC_MAX_SPREAD {
        matches.push(HarmonyMatch {
            harmony: HarmonyType::Monochromatic,
            confidence: (100.0 - spread * 2.0).max(0.0),
        });
    }

    if hues.len() <= 3 && spread <= ANALOGOUS_MAX_SPREAD {
        matches.push(HarmonyMatch {
            harmony: HarmonyType::Analogous,
            confidence: (100.0 - spread).max(0.0),
        });
    }

    if hues.len() == 2 {
        let diff = hue_difference(hues[0], hues[1]);
        if (COMPLEMENTARY_BAND.0..=COMPLEMENTARY_BAND.1).contains(&diff) {
            matches.push(HarmonyMatch {
                harmony: HarmonyType::Complementary,
                confidence: (100.0 - (diff - 180.0).abs() * 2.0).max(0.0),
            });
        }
    }

    if hues.len() == 3 {
        let mut sorted = hues.to_vec();
        sorted.sort_by(f64::total_cmp);
        let gap1 = sorted[1] - sorted[0];
        let gap2 = sorted[2] - sorted[1];

        // Only the two adjacent gaps count; the wrap-around gap is not checked.
        let near_third = |gap: f64| (gap - TRIADIC_GAP).abs() <= TRIADIC_TOLERANCE;
        if near_third(gap1) && near_third(gap2) {
            let deviation = (gap1 - TRIADIC_GAP).abs() + (gap2 - TRIADIC_GAP).abs();
            matches.push(HarmonyMatch {
                harmony: HarmonyType::Triadic,
                confidence: (100.0 - deviation * 2.0).max(0.0),
            });
        }
    }

    // Stable: equal confidences keep declaration order.
    matches.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
    matches
}

/// Mean ΔE over all unordered pairs; 0 for fewer than two colors.
pub fn average_pairwise_distance(labs: &[Lab]) -> f64 {
    let n = labs.len();
    if n < 2 {
        return 0.0;
    }

    let mut total = 0.0;
    let mut count = 0usize;
    for i in 0..n {
        for j in (i + 1)..n {
            total += delta_e(labs[i], labs[j]);
            count += 1;
        }
    }
    total / count as f64
}

/// `max(0, 100 - |avg - 30| * 2)`: penalizes both near-duplicates and scatter.
pub fn diversity_score(average_distance: f64) -> f64 {
    (100.0 - (average_distance - DIVERSITY_TARGET).abs() * 2.0).max(0.0)
}

/// For each season, average each color's best matching score within that
/// season; the best season's average is the palette score.
pub fn palette_score(labs: &[Lab], catalog: &Catalog) -> f64 {
    if labs.is_empty() {
        return 0.0;
    }

    Season::ALL
        .iter()
        .filter(|&&season| catalog.iter().any(|entry| entry.season == season))
        .map(|&season| {
            let total: f64 = labs
                .iter()
                .map(|&lab| {
                    catalog
                        .iter()
                        .filter(|entry| entry.season == season)
                        .map(|entry| matching_score(delta_e(lab, entry.lab())))
                        .fold(0.0, f64::max)
                })
                .sum();
            total / labs.len() as f64
        })
        .fold(0.0, f64::max)
}

/// Classify the harmony of two or more colors and score the combination
/// against `catalog`.
pub fn analyze_combination(colors: &[Color], catalog: &Catalog) -> ColorResult<HarmonyAnalysis> {
    if colors.len() < 2 {
        return Err(ColorError::insufficient_input(
            "harmony analysis",
            2,
            colors.len(),
        ));
    }
    if catalog.is_empty() {
        return Err(ColorError::insufficient_input("harmony palette scoring", 1, 0));
    }

    let hues: Vec<f64> = colors.iter().map(|c| c.hue()).collect();
    let labs: Vec<Lab> = colors.iter().map(|c| c.to_lab()).collect();

    let harmonies = classify_harmony(&hues);
    let top_confidence = harmonies.first().map_or(0.0, |m| m.confidence);

    let average_distance = average_pairwise_distance(&labs);
    let diversity = diversity_score(average_distance);
    let palette = palette_score(&labs, catalog);

    let overall_score =
        HARMONY_WEIGHT * top_confidence + PALETTE_WEIGHT * palette + DIVERSITY_WEIGHT * diversity;

    tracing::debug!(
        colors = colors.len(),
        harmonies = harmonies.len(),
        overall_score,
        "analyzed combination"
    );

    Ok(HarmonyAnalysis {
        harmonies,
        hues,
        average_distance,
        diversity_score: diversity,
        palette_score: palette,
        overall_score,
    })
}
