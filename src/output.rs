//! Output formatting and persistence for score records.
//!
//! Records are appended to a CSV file and dumped to the debug log.

use anyhow::Result;
use chrono::{DateTime, Utc};
use csv::WriterBuilder;
use serde::Serialize;
use std::fs::OpenOptions;
use std::path::Path;
use tracing::debug;

use crate::route::RiskBand;
use crate::scoring::RouteAssessment;

/// One scoring outcome, flattened for CSV.
#[derive(Debug, Default, Serialize)]
pub struct ScoreRecord {
    pub timestamp: DateTime<Utc>,
    pub route_id: Option<String>,
    pub source: Option<String>,
    pub rows: usize,

    pub route_probability: Option<f64>,
    pub mean_probability: Option<f64>,
    pub score: Option<i32>,
    pub label: Option<String>,
    pub overall_risk: Option<String>,

    // per-point bands
    pub low_points: usize,
    pub medium_points: usize,
    pub high_points: usize,

    // error tracking
    pub error_type: Option<String>,
    pub error_message: Option<String>,
}

impl ScoreRecord {
    pub fn from_assessment(a: &RouteAssessment) -> Self {
        ScoreRecord {
            timestamp: Utc::now(),
            route_id: Some(a.route.route_id().to_string()),
            rows: a.points.len(),
            route_probability: Some(a.route_probability),
            mean_probability: Some(a.mean_probability),
            score: Some(a.score.value()),
            label: Some(a.label.to_string()),
            overall_risk: Some(a.route.overall_risk.to_string()),
            low_points: a.count_band(RiskBand::Low),
            medium_points: a.count_band(RiskBand::Medium),
            high_points: a.count_band(RiskBand::High),
            ..Default::default()
        }
    }

    /// Create an error record with timestamp and error information
    pub fn from_error(error_type: &str, error_message: &str) -> Self {
        ScoreRecord {
            timestamp: Utc::now(),
            error_type: Some(error_type.to_string()),
            error_message: Some(error_message.to_string()),
            ..Default::default()
        }
    }

    /// Set route metadata (id and input source)
    pub fn with_route_info(mut self, route_id: &str, source: &str) -> Self {
        self.route_id = Some(route_id.to_string());
        self.source = Some(source.to_string());
        self
    }

    pub fn with_rows(mut self, rows: usize) -> Self {
        self.rows = rows;
        self
    }
}

/// Logs a record using Rust's debug pretty-print format.
pub fn print_pretty(record: &ScoreRecord) {
    debug!("{:#?}", record);
}

/// Appends a [`ScoreRecord`] as a row to a CSV file.
///
/// Creates the file with headers if it does not already exist.
pub fn append_record(path: &str, record: &ScoreRecord) -> Result<()> {
    let file_exists = Path::new(path).exists();
    debug!(path, file_exists, "Appending CSV record");

    let file = OpenOptions::new().append(true).create(true).open(path)?;

    let mut writer = WriterBuilder::new()
        .has_headers(!file_exists)
        .from_writer(file);

    writer.serialize(record)?;
    writer.flush()?;

    Ok(())
}
