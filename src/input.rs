//! CSV loader for weather matrices.
//!
//! Expects a header row. Columns are matched by name (see
//! [`Column::from_name`]), so their order in the file does not matter; columns
//! the file lacks are filled with NaN and unknown columns are ignored.
//!
//! Optional `distance_km`, `base_cost_cents` and `delay_minutes` columns
//! supply per-leg costs for the route record.

use anyhow::{Context, Result, bail};
use std::io::Read;
use tracing::debug;

use crate::error::ScoreError;
use crate::scoring::LegCost;
use crate::weather::{COLUMN_COUNT, Column, WeatherMatrix};

/// An owned row-major weather table in the canonical column order.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherTable {
    data: Vec<f64>,
    rows: usize,
    legs: Option<Vec<LegCost>>,
}

impl WeatherTable {
    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn data(&self) -> &[f64] {
        &self.data
    }

    /// Per-row leg costs, present when the file carried any leg column.
    pub fn legs(&self) -> Option<&[LegCost]> {
        self.legs.as_deref()
    }

    /// Borrows the table as a matrix, applying the row-count limits.
    pub fn matrix(&self) -> Result<WeatherMatrix<'_>, ScoreError> {
        WeatherMatrix::new(&self.data, self.rows, COLUMN_COUNT)
    }
}

fn parse_cell(raw: &str) -> Option<f64> {
    match raw {
        "" => Some(f64::NAN),
        s if s.eq_ignore_ascii_case("nan")
            || s.eq_ignore_ascii_case("na")
            || s.eq_ignore_ascii_case("null") =>
        {
            Some(f64::NAN)
        }
        s => s.parse().ok(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LegField {
    Distance,
    BaseCost,
    Delay,
}

impl LegField {
    fn from_name(name: &str) -> Option<LegField> {
        match name.trim().to_ascii_lowercase().as_str() {
            "distance_km" => Some(LegField::Distance),
            "base_cost_cents" => Some(LegField::BaseCost),
            "delay_minutes" | "expected_delay_minutes" => Some(LegField::Delay),
            _ => None,
        }
    }

    fn set(self, leg: &mut LegCost, value: u32) {
        match self {
            LegField::Distance => leg.distance_km = value,
            LegField::BaseCost => leg.base_cost_cents = value,
            LegField::Delay => leg.expected_delay_minutes = value,
        }
    }
}

/// Reads a headed weather CSV.
pub fn parse_weather_csv<R: Read>(reader: R) -> Result<WeatherTable> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut mapping: Vec<(usize, Column)> = Vec::new();
    let mut leg_mapping: Vec<(usize, LegField)> = Vec::new();
    for (i, name) in rdr.headers()?.iter().enumerate() {
        if let Some(column) = Column::from_name(name) {
            if mapping.iter().any(|&(_, c)| c == column) {
                bail!("column '{}' appears more than once", column.name());
            }
            mapping.push((i, column));
        } else if let Some(field) = LegField::from_name(name) {
            leg_mapping.push((i, field));
        } else {
            debug!(header = name, "ignoring unknown column");
        }
    }
    if mapping.is_empty() {
        bail!("header has no recognised weather columns");
    }

    let mut data = Vec::new();
    let mut legs = Vec::new();
    let mut rows = 0;
    for (n, record) in rdr.records().enumerate() {
        let record = record.with_context(|| format!("malformed CSV record {}", n + 1))?;
        let mut row = [f64::NAN; COLUMN_COUNT];
        for &(i, column) in &mapping {
            let raw = record.get(i).unwrap_or("");
            row[column.index()] = parse_cell(raw).with_context(|| {
                format!("row {}: invalid {} value '{raw}'", n + 1, column.name())
            })?;
        }
        data.extend_from_slice(&row);

        let mut leg = LegCost::default();
        for &(i, field) in &leg_mapping {
            let raw = record.get(i).unwrap_or("");
            if raw.is_empty() {
                continue;
            }
            let value = raw
                .parse::<u32>()
                .with_context(|| format!("row {}: invalid leg value '{raw}'", n + 1))?;
            field.set(&mut leg, value);
        }
        legs.push(leg);
        rows += 1;
    }

    debug!(
        rows,
        columns = mapping.len(),
        with_legs = !leg_mapping.is_empty(),
        "weather CSV parsed"
    );
    Ok(WeatherTable {
        data,
        rows,
        legs: (!leg_mapping.is_empty()).then_some(legs),
    })
}

/// Loads a headed weather CSV from `path`.
pub fn load_weather_csv(path: &str) -> Result<WeatherTable> {
    let file =
        std::fs::File::open(path).with_context(|| format!("failed to open weather file {path}"))?;
    parse_weather_csv(file)
}
