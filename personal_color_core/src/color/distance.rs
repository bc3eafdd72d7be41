//! CIE76 color difference and the score/quality bands derived from it.
//!
//! ΔE here is the plain Euclidean distance in L*a*b*. Report thresholds and
//! progress-bar scores are calibrated against exactly this formula, so it is
//! deliberately left unweighted.

use serde::{Deserialize, Serialize};

use super::convert::{rgb_to_lab, Lab, Rgb};

/// Compute the CIE76 ΔE between two Lab colors.
pub fn delta_e(lab1: Lab, lab2: Lab) -> f64 {
    let dl = lab1.l - lab2.l;
    let da = lab1.a - lab2.a;
    let db = lab1.b - lab2.b;
    (dl * dl + da * da + db * db).sqrt()
}

/// ΔE between two sRGB colors.
pub fn delta_e_rgb(a: Rgb, b: Rgb) -> f64 {
    delta_e(rgb_to_lab(a), rgb_to_lab(b))
}

/// Linear rescale of ΔE onto [0, 100]: `max(0, 100 - ΔE * 5)`.
pub fn matching_score(delta_e: f64) -> f64 {
    (100.0 - delta_e * 5.0).max(0.0)
}

/// Interpretation band for a ΔE value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchQuality {
    /// ΔE < 3
    Excellent,
    /// 3 ≤ ΔE < 6
    Good,
    /// 6 ≤ ΔE < 10
    Acceptable,
    /// 10 ≤ ΔE < 15
    Caution,
    /// ΔE ≥ 15
    Poor,
}

impl MatchQuality {
    pub fn from_delta_e(delta_e: f64) -> Self {
        if delta_e < 3.0 {
            MatchQuality::Excellent
        } else if delta_e < 6.0 {
            MatchQuality::Good
        } else if delta_e < 10.0 {
            MatchQuality::Acceptable
        } else if delta_e < 15.0 {
            MatchQuality::Caution
        } else {
            MatchQuality::Poor
        }
    }

    /// User-facing band text.
    pub fn label(&self) -> &'static str {
        match self {
            MatchQuality::Excellent => "excellent match",
            MatchQuality::Good => "good match",
            MatchQuality::Acceptable => "acceptable match",
            MatchQuality::Caution => "caution",
            MatchQuality::Poor => "poor match",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_colors_have_zero_distance() {
        let lab = Lab::new(53.24, 80.09, 67.20);
        assert_eq!(delta_e(lab, lab), 0.0);
        assert_eq!(matching_score(0.0), 100.0);
    }

    #[test]
    fn delta_e_is_plain_euclidean() {
        let a = Lab::new(50.0, 0.0, 0.0);
        let b = Lab::new(53.0, 4.0, 0.0);
        assert!((delta_e(a, b) - 5.0).abs() < 1e-12);
        assert_eq!(delta_e(a, b), delta_e(b, a));
    }

    #[test]
    fn score_is_linear_and_clamped() {
        assert_eq!(matching_score(2.0), 90.0);
        assert_eq!(matching_score(10.0), 50.0);
        assert_eq!(matching_score(20.0), 0.0);
        assert_eq!(matching_score(45.0), 0.0);
    }

    #[test]
    fn quality_band_boundaries() {
        assert_eq!(MatchQuality::from_delta_e(0.0), MatchQuality::Excellent);
        assert_eq!(MatchQuality::from_delta_e(2.999), MatchQuality::Excellent);
        assert_eq!(MatchQuality::from_delta_e(3.0), MatchQuality::Good);
        assert_eq!(MatchQuality::from_delta_e(6.0), MatchQuality::Acceptable);
        assert_eq!(MatchQuality::from_delta_e(10.0), MatchQuality::Caution);
        assert_eq!(MatchQuality::from_delta_e(15.0), MatchQuality::Poor);
        assert_eq!(MatchQuality::Caution.label(), "caution");
        assert_eq!(MatchQuality::Good.label(), "good match");
    }

    #[test]
    fn rgb_convenience_matches_lab_path() {
        let a = Rgb::new(255, 215, 0);
        let b = Rgb::new(255, 219, 88);
        assert_eq!(delta_e_rgb(a, b), delta_e(rgb_to_lab(a), rgb_to_lab(b)));
    }
}
