//! Weather matrix input and unit normalization.
//!
//! A matrix is a row-major block of `f64` with one row per waypoint. Missing
//! readings are NaN; [`normalize`] replaces them with benign defaults and
//! rescales visibility and gusts that look like they arrived in km and m/s.

use crate::config::{MAX_SEGMENTS, MissingDefaults, UnitCoercion};
use crate::error::ScoreError;

/// Column layout shared with every caller. Order matters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum Column {
    Lat = 0,
    Lon = 1,
    TempMin = 2,
    TempMax = 3,
    PrecipMm = 4,
    PrecipProb = 5,
    SnowMm = 6,
    WindSpeed = 7,
    WindGusts = 8,
    Visibility = 9,
    WeatherCode = 10,
}

/// Number of columns a row must carry.
pub const COLUMN_COUNT: usize = 11;

impl Column {
    pub const ALL: [Column; COLUMN_COUNT] = [
        Column::Lat,
        Column::Lon,
        Column::TempMin,
        Column::TempMax,
        Column::PrecipMm,
        Column::PrecipProb,
        Column::SnowMm,
        Column::WindSpeed,
        Column::WindGusts,
        Column::Visibility,
        Column::WeatherCode,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Column::Lat => "lat",
            Column::Lon => "lon",
            Column::TempMin => "temp_min",
            Column::TempMax => "temp_max",
            Column::PrecipMm => "precip_mm",
            Column::PrecipProb => "precip_prob",
            Column::SnowMm => "snow_mm",
            Column::WindSpeed => "wind_speed",
            Column::WindGusts => "wind_gusts",
            Column::Visibility => "visibility",
            Column::WeatherCode => "weathercode",
        }
    }

    /// Resolves a header name, accepting both the short names and the daily
    /// forecast export names.
    pub fn from_name(name: &str) -> Option<Column> {
        let column = match name.trim().to_ascii_lowercase().as_str() {
            "lat" | "latitude" => Column::Lat,
            "lon" | "longitude" => Column::Lon,
            "temp_min" | "temperature_2m_min" => Column::TempMin,
            "temp_max" | "temperature_2m_max" => Column::TempMax,
            "precip_mm" | "precipitation_sum" => Column::PrecipMm,
            "precip_prob" | "precip_prob_max" | "precipitation_probability_max" => {
                Column::PrecipProb
            }
            "snow_mm" | "snowfall_mm" | "snowfall_sum" => Column::SnowMm,
            "wind_speed" | "wind_speed_max" | "wind_speed_10m_max" => Column::WindSpeed,
            "wind_gusts" | "wind_gusts_max" | "wind_gusts_10m_max" => Column::WindGusts,
            "visibility" | "visibility_min" => Column::Visibility,
            "weathercode" | "weather_code" => Column::WeatherCode,
            _ => return None,
        };
        Some(column)
    }
}

/// One waypoint's raw readings, borrowed from the matrix.
#[derive(Debug, Clone, Copy)]
pub struct WeatherRow<'a>(&'a [f64]);

impl<'a> WeatherRow<'a> {
    pub fn get(&self, column: Column) -> f64 {
        self.0[column.index()]
    }
}

/// A validated, borrowed row-major weather matrix.
///
/// `cols` may exceed [`COLUMN_COUNT`]; extra trailing columns are ignored.
#[derive(Debug, Clone, Copy)]
pub struct WeatherMatrix<'a> {
    data: &'a [f64],
    rows: usize,
    cols: usize,
}

impl<'a> WeatherMatrix<'a> {
    pub fn new(data: &'a [f64], rows: usize, cols: usize) -> Result<Self, ScoreError> {
        if rows == 0 {
            return Err(ScoreError::InvalidInput("matrix has no rows".into()));
        }
        if cols < COLUMN_COUNT {
            return Err(ScoreError::InvalidInput(format!(
                "{cols} columns given, at least {COLUMN_COUNT} required"
            )));
        }
        if rows > MAX_SEGMENTS {
            return Err(ScoreError::OverCapacity {
                rows,
                cap: MAX_SEGMENTS,
            });
        }
        let needed = rows
            .checked_mul(cols)
            .ok_or_else(|| ScoreError::InvalidInput("matrix dimensions overflow".into()))?;
        if data.len() < needed {
            return Err(ScoreError::InvalidInput(format!(
                "matrix holds {} values, {rows}x{cols} requires {needed}",
                data.len()
            )));
        }
        Ok(Self { data, rows, cols })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn row(&self, i: usize) -> Option<WeatherRow<'a>> {
        if i >= self.rows {
            return None;
        }
        let start = i * self.cols;
        self.data.get(start..start + COLUMN_COUNT).map(WeatherRow)
    }

    pub fn iter(&self) -> impl Iterator<Item = WeatherRow<'a>> + '_ {
        (0..self.rows).filter_map(move |i| self.row(i))
    }
}

/// Readings after defaulting and unit coercion: temperatures in °C,
/// precipitation and snow in mm, probability in percent, gusts in km/h,
/// visibility in meters. The weather code stays NaN when missing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizedRow {
    pub temp_min_c: f64,
    pub precip_mm: f64,
    pub precip_prob: f64,
    pub snow_mm: f64,
    pub gusts_kmh: f64,
    pub visibility_m: f64,
    pub weather_code: f64,
}

fn or_default(value: f64, default: f64) -> f64 {
    if value.is_nan() { default } else { value }
}

/// Fills missing readings and coerces suspicious units.
pub fn normalize(
    row: &WeatherRow<'_>,
    defaults: &MissingDefaults,
    coercion: &UnitCoercion,
) -> NormalizedRow {
    let mut gusts = or_default(row.get(Column::WindGusts), defaults.gusts_kmh);
    let mut vis = or_default(row.get(Column::Visibility), defaults.visibility_m);

    if vis > 0.0 && vis < coercion.visibility_km_below {
        vis *= coercion.km_to_m;
    }
    if gusts > 0.0 && gusts < coercion.gust_ms_below {
        gusts *= coercion.ms_to_kmh;
    }

    NormalizedRow {
        temp_min_c: or_default(row.get(Column::TempMin), defaults.temp_min_c),
        precip_mm: or_default(row.get(Column::PrecipMm), defaults.precip_mm),
        precip_prob: or_default(row.get(Column::PrecipProb), defaults.precip_prob),
        snow_mm: or_default(row.get(Column::SnowMm), defaults.snow_mm),
        gusts_kmh: gusts,
        visibility_m: vis,
        weather_code: row.get(Column::WeatherCode),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NAN: f64 = f64::NAN;

    fn row(values: [f64; COLUMN_COUNT]) -> NormalizedRow {
        let data = values;
        let matrix = WeatherMatrix::new(&data, 1, COLUMN_COUNT).unwrap();
        normalize(
            &matrix.row(0).unwrap(),
            &MissingDefaults::default(),
            &UnitCoercion::default(),
        )
    }

    #[test]
    fn test_missing_values_defaulted() {
        let n = row([NAN; COLUMN_COUNT]);
        assert_eq!(n.temp_min_c, 5.0);
        assert_eq!(n.precip_mm, 0.0);
        assert_eq!(n.precip_prob, 0.0);
        assert_eq!(n.snow_mm, 0.0);
        assert_eq!(n.gusts_kmh, 0.0);
        assert_eq!(n.visibility_m, 20000.0);
        assert!(n.weather_code.is_nan());
    }

    #[test]
    fn test_visibility_km_coerced() {
        let n = row([0.0, 0.0, 10.0, 15.0, 0.0, 0.0, 0.0, 5.0, 40.0, 5.0, 1.0]);
        assert_eq!(n.visibility_m, 5000.0);
    }

    #[test]
    fn test_visibility_boundary_not_coerced() {
        let n = row([0.0, 0.0, 10.0, 15.0, 0.0, 0.0, 0.0, 5.0, 40.0, 200.0, 1.0]);
        assert_eq!(n.visibility_m, 200.0);
        let n = row([0.0, 0.0, 10.0, 15.0, 0.0, 0.0, 0.0, 5.0, 40.0, 0.0, 1.0]);
        assert_eq!(n.visibility_m, 0.0);
    }

    #[test]
    fn test_gusts_ms_coerced() {
        let n = row([0.0, 0.0, 10.0, 15.0, 0.0, 0.0, 0.0, 5.0, 20.0, 9000.0, 1.0]);
        assert_eq!(n.gusts_kmh, 72.0);
    }

    #[test]
    fn test_gusts_boundary_not_coerced() {
        let n = row([0.0, 0.0, 10.0, 15.0, 0.0, 0.0, 0.0, 5.0, 30.0, 9000.0, 1.0]);
        assert_eq!(n.gusts_kmh, 30.0);
        let n = row([0.0, 0.0, 10.0, 15.0, 0.0, 0.0, 0.0, 5.0, 0.0, 9000.0, 1.0]);
        assert_eq!(n.gusts_kmh, 0.0);
    }

    #[test]
    fn test_canonical_row_unchanged() {
        let n = row([51.5, -0.1, -3.0, 4.0, 12.5, 80.0, 6.0, 30.0, 85.0, 2500.0, 65.0]);
        assert_eq!(
            n,
            NormalizedRow {
                temp_min_c: -3.0,
                precip_mm: 12.5,
                precip_prob: 80.0,
                snow_mm: 6.0,
                gusts_kmh: 85.0,
                visibility_m: 2500.0,
                weather_code: 65.0,
            }
        );
    }

    #[test]
    fn test_matrix_rejects_zero_rows() {
        let err = WeatherMatrix::new(&[], 0, COLUMN_COUNT).unwrap_err();
        assert_eq!(err.code(), -1);
    }

    #[test]
    fn test_matrix_rejects_narrow_rows() {
        let data = [0.0; 10];
        let err = WeatherMatrix::new(&data, 1, 10).unwrap_err();
        assert_eq!(err.code(), -1);
    }

    #[test]
    fn test_matrix_rejects_short_buffer() {
        let data = [0.0; COLUMN_COUNT];
        let err = WeatherMatrix::new(&data, 2, COLUMN_COUNT).unwrap_err();
        assert!(matches!(err, ScoreError::InvalidInput(_)));
    }

    #[test]
    fn test_matrix_over_capacity() {
        let data = vec![0.0; 33 * COLUMN_COUNT];
        let err = WeatherMatrix::new(&data, 33, COLUMN_COUNT).unwrap_err();
        assert_eq!(err, ScoreError::OverCapacity { rows: 33, cap: 32 });
    }

    #[test]
    fn test_matrix_wide_stride() {
        let mut data = vec![0.0; 2 * 13];
        data[13 + Column::WeatherCode.index()] = 95.0;
        let matrix = WeatherMatrix::new(&data, 2, 13).unwrap();
        assert_eq!(matrix.row(1).unwrap().get(Column::WeatherCode), 95.0);
        assert_eq!(matrix.iter().count(), 2);
        assert!(matrix.row(2).is_none());
    }

    #[test]
    fn test_column_names_round_trip() {
        for column in Column::ALL {
            assert_eq!(Column::from_name(column.name()), Some(column));
        }
        assert_eq!(Column::from_name("wind_gusts_max"), Some(Column::WindGusts));
        assert_eq!(Column::from_name(" Visibility_Min "), Some(Column::Visibility));
        assert_eq!(Column::from_name("pressure"), None);
    }
}
