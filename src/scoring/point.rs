//! Point scorer and classifier.

use crate::config::{BandThresholds, FactorWeights};
use crate::route::RiskBand;
use crate::scoring::clamp01;
use crate::scoring::factors::FactorVector;

/// Weighted sum of the factors, clamped to [0, 1].
///
/// A sum rather than a max so that several mild conditions add up.
pub fn point_probability(f: &FactorVector, w: &FactorWeights) -> f64 {
    let pr = w.baseline * f.baseline
        + w.gust * f.gust
        + w.precip * f.precip
        + w.visibility * f.visibility
        + w.snow * f.snow
        + w.ice * f.ice
        + w.prob * f.prob;
    clamp01(pr)
}

/// Maps a probability onto the 1..=100 scale, rounding half away from zero.
pub fn probability_to_score(p: f64) -> i32 {
    (1.0 + clamp01(p) * 99.0).round() as i32
}

/// Band for a score on the 1..=100 scale.
pub fn band_for_score(score: i32, bands: &BandThresholds) -> RiskBand {
    match score {
        s if s >= bands.high => RiskBand::High,
        s if s >= bands.medium => RiskBand::Medium,
        _ => RiskBand::Low,
    }
}

/// Classifies a single point with the same thresholds the labeler uses, so
/// point bands line up with the route label.
pub fn classify_point(pr: f64, bands: &BandThresholds) -> (i32, RiskBand) {
    let score = probability_to_score(pr);
    (score, band_for_score(score, bands))
}
