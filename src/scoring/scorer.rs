//! The weather-to-risk pipeline.
//!
//! normalize → factors → point probability → 75th percentile → calibration →
//! score and label. Each waypoint also becomes a segment on a [`Route`].

use serde::Serialize;
use tracing::{debug, trace, warn};

use crate::config::ScoringConfig;
use crate::error::ScoreError;
use crate::route::{
    Region, RiskBand, Route, RouteSegment, SegmentCost, WeatherFlags, WeatherSummary,
};
use crate::scoring::aggregate::{mean, percentile_floor};
use crate::scoring::calibrate::{RouteScore, calibrate, score_from_calibrated};
use crate::scoring::factors::FactorVector;
use crate::scoring::label::PolicyLabel;
use crate::scoring::point::{classify_point, point_probability};
use crate::weather::{NormalizedRow, WeatherMatrix, normalize};

/// Route id given to routes built by the scorer.
pub const DEFAULT_ROUTE_ID: &str = "AUTO-ROUTE";

/// Distance, base cost, and expected delay of one leg. Without these the
/// segments carry 1 km and zero cost, good for risk display only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LegCost {
    pub distance_km: u32,
    pub base_cost_cents: u32,
    pub expected_delay_minutes: u32,
}

impl Default for LegCost {
    fn default() -> Self {
        Self {
            distance_km: 1,
            base_cost_cents: 0,
            expected_delay_minutes: 0,
        }
    }
}

/// Everything computed for one waypoint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointAssessment {
    pub normalized: NormalizedRow,
    pub factors: FactorVector,
    pub probability: f64,
    pub score: i32,
    pub band: RiskBand,
}

/// Result of scoring a route, with the intermediate values kept for callers
/// that want to explain the score.
#[derive(Debug, Clone)]
pub struct RouteAssessment {
    pub points: Vec<PointAssessment>,
    pub route_probability: f64,
    /// Waypoint whose probability was selected by the percentile.
    pub selected_point: usize,
    /// Mean point probability, reported alongside the percentile pick.
    pub mean_probability: f64,
    pub calibrated: f64,
    pub score: RouteScore,
    pub label: PolicyLabel,
    pub route: Route,
}

impl RouteAssessment {
    pub fn count_band(&self, band: RiskBand) -> usize {
        self.points.iter().filter(|p| p.band == band).count()
    }
}

/// Compact serializable view of an assessment.
#[derive(Debug, Serialize)]
pub struct AssessmentSummary<'a> {
    pub route_id: &'a str,
    pub points: usize,
    pub route_probability: f64,
    pub mean_probability: f64,
    pub selected_point: usize,
    pub score: RouteScore,
    pub label: PolicyLabel,
    pub overall_risk: RiskBand,
}

impl<'a> From<&'a RouteAssessment> for AssessmentSummary<'a> {
    fn from(a: &'a RouteAssessment) -> Self {
        Self {
            route_id: a.route.route_id(),
            points: a.points.len(),
            route_probability: a.route_probability,
            mean_probability: a.mean_probability,
            selected_point: a.selected_point,
            score: a.score,
            label: a.label,
            overall_risk: a.route.overall_risk,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RouteScorer {
    config: ScoringConfig,
}

impl RouteScorer {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    /// Scores a single normalized waypoint.
    pub fn assess_point(&self, row: &NormalizedRow) -> PointAssessment {
        let factors = FactorVector::extract(row, &self.config.ramps);
        let probability = point_probability(&factors, &self.config.weights);
        let (score, band) = classify_point(probability, &self.config.bands);
        trace!(?factors, probability, "point factors");
        PointAssessment {
            normalized: *row,
            factors,
            probability,
            score,
            band,
        }
    }

    pub fn assess(&self, matrix: &WeatherMatrix<'_>) -> Result<RouteAssessment, ScoreError> {
        self.assess_with_legs(matrix, DEFAULT_ROUTE_ID, None)
    }

    /// Scores a route. `legs`, when given, must hold one entry per row.
    #[tracing::instrument(skip(self, matrix, legs), fields(rows = matrix.rows()))]
    pub fn assess_with_legs(
        &self,
        matrix: &WeatherMatrix<'_>,
        route_id: &str,
        legs: Option<&[LegCost]>,
    ) -> Result<RouteAssessment, ScoreError> {
        if let Some(legs) = legs {
            if legs.len() != matrix.rows() {
                return Err(ScoreError::InvalidInput(format!(
                    "{} leg costs given for {} rows",
                    legs.len(),
                    matrix.rows()
                )));
            }
        }

        let mut route = Route::new(route_id);
        let mut points = Vec::with_capacity(matrix.rows());

        for (i, row) in matrix.iter().enumerate() {
            let normalized = normalize(&row, &self.config.defaults, &self.config.coercion);
            let point = self.assess_point(&normalized);
            debug!(
                point = i,
                probability = point.probability,
                score = point.score,
                band = %point.band,
                "waypoint scored"
            );

            let leg = legs.and_then(|l| l.get(i)).copied().unwrap_or_default();
            if !route.add_segment(segment_for(&point, leg)) {
                warn!(point = i, route_id, "route is full, segment dropped");
            }
            points.push(point);
        }

        let probabilities: Vec<f64> = points.iter().map(|p| p.probability).collect();
        let selected = percentile_floor(&probabilities, self.config.percentile)
            .ok_or_else(|| ScoreError::InvalidInput("matrix has no rows".into()))?;
        let mean_probability = mean(&probabilities);

        let calibrated = calibrate(selected.probability, &self.config.calibration);
        let score = score_from_calibrated(calibrated);
        let label = PolicyLabel::from_score(score.value(), &self.config.bands);

        route.recalculate_totals(self.config.delay_cost_per_minute_cents);

        debug!(
            route_probability = selected.probability,
            selected_point = selected.point,
            mean_probability,
            calibrated,
            score = score.value(),
            label = %label,
            "route scored"
        );

        Ok(RouteAssessment {
            points,
            route_probability: selected.probability,
            selected_point: selected.point,
            mean_probability,
            calibrated,
            score,
            label,
            route,
        })
    }

    pub fn score(&self, matrix: &WeatherMatrix<'_>) -> Result<RouteScore, ScoreError> {
        Ok(self.assess(matrix)?.score)
    }
}

/// Builds the route segment recorded for a scored waypoint.
fn segment_for(point: &PointAssessment, leg: LegCost) -> RouteSegment {
    let n = &point.normalized;
    RouteSegment {
        region: Region::new("AUTO", "Auto Segment"),
        distance_km: leg.distance_km,
        weather: WeatherSummary {
            temperature_c: n.temp_min_c.round() as i32,
            wind_kph: n.gusts_kmh.round() as u32,
            precipitation_mm: n.precip_mm.round() as u32,
            visibility_km: (n.visibility_m / 1000.0).round() as u32,
            flags: WeatherFlags::NONE,
            risk: point.band,
        },
        expected_delay_minutes: leg.expected_delay_minutes,
        cost: SegmentCost {
            base_cost_cents: leg.base_cost_cents,
            ..Default::default()
        },
        ..Default::default()
    }
}

/// Scores a row-major matrix of `rows` × `cols` values with the reference
/// calibration. `cols` must be at least 11 and `rows` within 1..=32.
pub fn score_route_from_weather_matrix(
    matrix: &[f64],
    rows: usize,
    cols: usize,
) -> Result<RouteScore, ScoreError> {
    let matrix = WeatherMatrix::new(matrix, rows, cols)?;
    RouteScorer::default().score(&matrix)
}
