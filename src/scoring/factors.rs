//! Per-point risk factors.

use serde::Serialize;

use crate::config::FactorRamps;
use crate::scoring::clamp01;
use crate::weather::NormalizedRow;

/// Baseline risk for a WMO weather code.
///
/// | Baseline | Codes                                                   |
/// |----------|---------------------------------------------------------|
/// | 0.05     | 0–3 (clear to overcast)                                 |
/// | 0.35     | 51, 53, 55, 61, 63, 71, 73 (drizzle, light rain/snow)   |
/// | 0.70     | 45, 48, 56, 57, 65–67, 75, 77, 80–82, 85, 86            |
/// | 0.90     | 95, 96, 99 (thunderstorms)                              |
/// | 0.30     | anything else                                           |
/// | 0.20     | missing                                                 |
pub fn weathercode_baseline(code: f64) -> f64 {
    if code.is_nan() {
        return 0.20;
    }
    match code.round() as i64 {
        0..=3 => 0.05,
        51 | 53 | 55 | 61 | 63 | 71 | 73 => 0.35,
        45 | 48 | 56 | 57 | 65 | 66 | 67 | 75 | 77 | 80 | 81 | 82 | 85 | 86 => 0.70,
        95 | 96 | 99 => 0.90,
        _ => 0.30,
    }
}

/// Bounded contributions of one waypoint. Every field lies in [0, 1];
/// `ice` is either 0 or 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FactorVector {
    pub baseline: f64,
    pub gust: f64,
    pub precip: f64,
    pub visibility: f64,
    pub snow: f64,
    pub ice: f64,
    pub prob: f64,
}

impl FactorVector {
    pub fn extract(row: &NormalizedRow, ramps: &FactorRamps) -> Self {
        let freezing = row.temp_min_c <= ramps.ice_temp_c;
        let wet = row.precip_mm > ramps.ice_precip_mm || row.snow_mm > 0.0;

        FactorVector {
            baseline: weathercode_baseline(row.weather_code),
            gust: ramps.gust.apply(row.gusts_kmh),
            precip: ramps.precip.apply(row.precip_mm),
            visibility: ramps.visibility.apply(row.visibility_m),
            snow: ramps.snow.apply(row.snow_mm),
            ice: if freezing && wet { 1.0 } else { 0.0 },
            prob: clamp01(row.precip_prob / 100.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn calm() -> NormalizedRow {
        NormalizedRow {
            temp_min_c: 10.0,
            precip_mm: 0.0,
            precip_prob: 0.0,
            snow_mm: 0.0,
            gusts_kmh: 18.0,
            visibility_m: 20000.0,
            weather_code: 1.0,
        }
    }

    #[test]
    fn test_baseline_bands() {
        for code in [0.0, 1.0, 2.0, 3.0] {
            assert_eq!(weathercode_baseline(code), 0.05);
        }
        for code in [51.0, 53.0, 55.0, 61.0, 63.0, 71.0, 73.0] {
            assert_eq!(weathercode_baseline(code), 0.35);
        }
        for code in [45, 48, 56, 57, 65, 66, 67, 75, 77, 80, 81, 82, 85, 86] {
            assert_eq!(weathercode_baseline(code as f64), 0.70);
        }
        for code in [95.0, 96.0, 99.0] {
            assert_eq!(weathercode_baseline(code), 0.90);
        }
    }

    #[test]
    fn test_baseline_missing_and_unknown() {
        assert_eq!(weathercode_baseline(f64::NAN), 0.20);
        assert_eq!(weathercode_baseline(4.0), 0.30);
        assert_eq!(weathercode_baseline(62.0), 0.30);
        assert_eq!(weathercode_baseline(-1.0), 0.30);
        assert_eq!(weathercode_baseline(f64::INFINITY), 0.30);
    }

    #[test]
    fn test_baseline_rounds_code() {
        assert_eq!(weathercode_baseline(94.6), 0.90);
        assert_eq!(weathercode_baseline(2.4), 0.05);
    }

    #[test]
    fn test_calm_row_only_baseline() {
        let f = FactorVector::extract(&calm(), &FactorRamps::default());
        assert_eq!(f.baseline, 0.05);
        assert_eq!(f.gust, 0.0);
        assert_eq!(f.precip, 0.0);
        assert_eq!(f.visibility, 0.0);
        assert_eq!(f.snow, 0.0);
        assert_eq!(f.ice, 0.0);
        assert_eq!(f.prob, 0.0);
    }

    #[test]
    fn test_thunderstorm_factors() {
        let row = NormalizedRow {
            temp_min_c: 12.0,
            precip_mm: 30.0,
            precip_prob: 90.0,
            snow_mm: 0.0,
            gusts_kmh: 70.0,
            visibility_m: 2000.0,
            weather_code: 95.0,
        };
        let f = FactorVector::extract(&row, &FactorRamps::default());
        assert_eq!(f.baseline, 0.90);
        assert_abs_diff_eq!(f.gust, 0.25, epsilon = 1e-12);
        assert_eq!(f.precip, 1.0);
        assert_abs_diff_eq!(f.visibility, 0.4, epsilon = 1e-12);
        assert_eq!(f.ice, 0.0);
        assert_abs_diff_eq!(f.prob, 0.9, epsilon = 1e-12);
    }

    #[test]
    fn test_ice_requires_freezing_and_moisture() {
        let ramps = FactorRamps::default();
        let mut row = calm();
        row.temp_min_c = 0.0;
        assert_eq!(FactorVector::extract(&row, &ramps).ice, 0.0);

        row.precip_mm = 0.2;
        assert_eq!(FactorVector::extract(&row, &ramps).ice, 0.0);

        row.precip_mm = 0.3;
        assert_eq!(FactorVector::extract(&row, &ramps).ice, 1.0);

        row.precip_mm = 0.0;
        row.snow_mm = 0.1;
        assert_eq!(FactorVector::extract(&row, &ramps).ice, 1.0);

        row.temp_min_c = 0.5;
        assert_eq!(FactorVector::extract(&row, &ramps).ice, 0.0);
    }

    #[test]
    fn test_factors_saturate() {
        let row = NormalizedRow {
            temp_min_c: -20.0,
            precip_mm: 500.0,
            precip_prob: 250.0,
            snow_mm: 400.0,
            gusts_kmh: 300.0,
            visibility_m: -10.0,
            weather_code: 99.0,
        };
        let f = FactorVector::extract(&row, &FactorRamps::default());
        for v in [f.baseline, f.gust, f.precip, f.visibility, f.snow, f.ice, f.prob] {
            assert!((0.0..=1.0).contains(&v), "factor {v} out of range");
        }
        assert_eq!(f.gust, 1.0);
        assert_eq!(f.prob, 1.0);
    }
}
