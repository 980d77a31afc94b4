//! Weather-to-risk scoring.
//!
//! Each waypoint's readings are turned into bounded factors, combined into a
//! point probability, and classified. The route probability is the 75th
//! percentile of the points, calibrated into a 1..=100 score and a policy
//! label.

pub mod aggregate;
pub mod calibrate;
pub mod factors;
pub mod label;
pub mod point;
pub mod scorer;

pub use calibrate::RouteScore;
pub use label::{PolicyLabel, risk_label_from_score};
pub use scorer::{
    LegCost, PointAssessment, RouteAssessment, RouteScorer, score_route_from_weather_matrix,
};

/// Clamps `x` into [0, 1].
pub fn clamp01(x: f64) -> f64 {
    if x < 0.0 {
        0.0
    } else if x > 1.0 {
        1.0
    } else {
        x
    }
}
