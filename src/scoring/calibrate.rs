//! Calibration of the route probability into the final score.

use serde::Serialize;

use crate::config::Calibration;
use crate::scoring::clamp01;
use crate::scoring::point::probability_to_score;

/// Final route score, always within 1..=100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct RouteScore(u8);

impl RouteScore {
    pub const MIN: RouteScore = RouteScore(1);
    pub const MAX: RouteScore = RouteScore(100);

    /// Builds a score, clamping out-of-range values into 1..=100.
    pub fn new(score: i32) -> Self {
        RouteScore(score.clamp(1, 100) as u8)
    }

    pub fn value(self) -> i32 {
        i32::from(self.0)
    }
}

impl std::fmt::Display for RouteScore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// `clamp01(p ^ exponent * scale)`. An exponent above 1 pulls low and mid
/// probabilities down harder than high ones.
pub fn calibrate(route_probability: f64, c: &Calibration) -> f64 {
    clamp01(clamp01(route_probability).powf(c.exponent) * c.scale)
}

pub fn score_from_calibrated(calibrated: f64) -> RouteScore {
    RouteScore::new(probability_to_score(calibrated))
}
