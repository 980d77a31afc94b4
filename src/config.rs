//! Scoring constants and the configuration that carries them.
//!
//! Every tunable number of the pipeline lives here. [`ScoringConfig::default`]
//! reproduces the reference calibration; a JSON file may override any subset:
//!
//! ```json
//! { "calibration": { "exponent": 1.4 }, "bands": { "high": 75 } }
//! ```

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

/// Maximum number of waypoints (and route segments) per scoring call.
pub const MAX_SEGMENTS: usize = 32;
/// Region code capacity, terminator included.
pub const MAX_REGION_CODE_LEN: usize = 16;
/// Region name capacity, terminator included.
pub const MAX_NAME_LEN: usize = 64;
/// Route id capacity, terminator included.
pub const MAX_ROUTE_ID_LEN: usize = 32;
/// Delay cost applied by the segment adapter, in cents per minute.
pub const DELAY_COST_PER_MINUTE_CENTS: u32 = 20;

pub const WEIGHT_BASELINE: f64 = 0.25;
pub const WEIGHT_GUST: f64 = 0.25;
pub const WEIGHT_PRECIP: f64 = 0.20;
pub const WEIGHT_VISIBILITY: f64 = 0.20;
pub const WEIGHT_SNOW: f64 = 0.15;
pub const WEIGHT_ICE: f64 = 0.25;
pub const WEIGHT_PROB: f64 = 0.05;

pub const ROUTE_PERCENTILE: f64 = 0.75;
pub const CALIBRATION_EXPONENT: f64 = 1.6;
pub const CALIBRATION_SCALE: f64 = 0.75;

pub const BAND_MEDIUM: i32 = 50;
pub const BAND_HIGH: i32 = 70;

pub const GUST_MS_BELOW: f64 = 30.0;
pub const MS_TO_KMH: f64 = 3.6;
pub const VISIBILITY_KM_BELOW: f64 = 200.0;
pub const KM_TO_M: f64 = 1000.0;

/// Weights of the per-point linear combination. They sum to 1.35 so that
/// several adverse conditions together saturate the clamp.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FactorWeights {
    pub baseline: f64,
    pub gust: f64,
    pub precip: f64,
    pub visibility: f64,
    pub snow: f64,
    pub ice: f64,
    pub prob: f64,
}

impl Default for FactorWeights {
    fn default() -> Self {
        Self {
            baseline: WEIGHT_BASELINE,
            gust: WEIGHT_GUST,
            precip: WEIGHT_PRECIP,
            visibility: WEIGHT_VISIBILITY,
            snow: WEIGHT_SNOW,
            ice: WEIGHT_ICE,
            prob: WEIGHT_PROB,
        }
    }
}

/// A linear ramp `clamp01((x - start) / span)`.
///
/// A negative span turns it into a falling ramp, used for visibility.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ramp {
    pub start: f64,
    pub span: f64,
}

impl Ramp {
    pub const fn new(start: f64, span: f64) -> Self {
        Self { start, span }
    }

    pub fn apply(&self, x: f64) -> f64 {
        crate::scoring::clamp01((x - self.start) / self.span)
    }
}

/// Ramps turning normalized readings into factors.
///
/// Deserialized through [`FactorRampsFile`], so a file may override a single
/// `start` or `span` and keep the rest.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "FactorRampsFile")]
pub struct FactorRamps {
    /// Zero at 60 km/h, saturated at 100 km/h.
    pub gust: Ramp,
    /// Zero at 5 mm, saturated at 25 mm per day.
    pub precip: Ramp,
    /// Zero above 3000 m, saturated at 500 m.
    pub visibility: Ramp,
    pub snow: Ramp,
    /// Icing needs freezing air plus more than this much rain.
    pub ice_precip_mm: f64,
    pub ice_temp_c: f64,
}

impl Default for FactorRamps {
    fn default() -> Self {
        Self {
            gust: Ramp::new(60.0, 40.0),
            precip: Ramp::new(5.0, 20.0),
            visibility: Ramp::new(3000.0, -2500.0),
            snow: Ramp::new(5.0, 20.0),
            ice_precip_mm: 0.2,
            ice_temp_c: 0.0,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RampFile {
    start: Option<f64>,
    span: Option<f64>,
}

impl RampFile {
    fn over(self, base: Ramp) -> Ramp {
        Ramp {
            start: self.start.unwrap_or(base.start),
            span: self.span.unwrap_or(base.span),
        }
    }
}

/// On-disk form of [`FactorRamps`] where every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FactorRampsFile {
    gust: RampFile,
    precip: RampFile,
    visibility: RampFile,
    snow: RampFile,
    ice_precip_mm: Option<f64>,
    ice_temp_c: Option<f64>,
}

impl From<FactorRampsFile> for FactorRamps {
    fn from(f: FactorRampsFile) -> Self {
        let base = FactorRamps::default();
        FactorRamps {
            gust: f.gust.over(base.gust),
            precip: f.precip.over(base.precip),
            visibility: f.visibility.over(base.visibility),
            snow: f.snow.over(base.snow),
            ice_precip_mm: f.ice_precip_mm.unwrap_or(base.ice_precip_mm),
            ice_temp_c: f.ice_temp_c.unwrap_or(base.ice_temp_c),
        }
    }
}

/// Values substituted for missing (NaN) readings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MissingDefaults {
    pub temp_min_c: f64,
    pub precip_mm: f64,
    pub precip_prob: f64,
    pub snow_mm: f64,
    pub gusts_kmh: f64,
    pub visibility_m: f64,
}

impl Default for MissingDefaults {
    fn default() -> Self {
        Self {
            temp_min_c: 5.0,
            precip_mm: 0.0,
            precip_prob: 0.0,
            snow_mm: 0.0,
            gusts_kmh: 0.0,
            visibility_m: 20000.0,
        }
    }
}

/// Heuristics for readings reported in the wrong unit.
///
/// Visibility in meters is never below 200 in practice, and gusts in km/h
/// under 30 are harmless, so small positive values get rescaled.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UnitCoercion {
    pub gust_ms_below: f64,
    pub ms_to_kmh: f64,
    pub visibility_km_below: f64,
    pub km_to_m: f64,
}

impl Default for UnitCoercion {
    fn default() -> Self {
        Self {
            gust_ms_below: GUST_MS_BELOW,
            ms_to_kmh: MS_TO_KMH,
            visibility_km_below: VISIBILITY_KM_BELOW,
            km_to_m: KM_TO_M,
        }
    }
}

/// Power-law dampener applied to the route probability.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Calibration {
    pub exponent: f64,
    pub scale: f64,
}

impl Default for Calibration {
    fn default() -> Self {
        Self {
            exponent: CALIBRATION_EXPONENT,
            scale: CALIBRATION_SCALE,
        }
    }
}

/// Score thresholds shared by the point classifier and the labeler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BandThresholds {
    pub medium: i32,
    pub high: i32,
}

impl Default for BandThresholds {
    fn default() -> Self {
        Self {
            medium: BAND_MEDIUM,
            high: BAND_HIGH,
        }
    }
}

/// Complete set of scoring knobs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub weights: FactorWeights,
    pub ramps: FactorRamps,
    pub defaults: MissingDefaults,
    pub coercion: UnitCoercion,
    pub calibration: Calibration,
    pub bands: BandThresholds,
    pub percentile: f64,
    pub delay_cost_per_minute_cents: u32,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            weights: FactorWeights::default(),
            ramps: FactorRamps::default(),
            defaults: MissingDefaults::default(),
            coercion: UnitCoercion::default(),
            calibration: Calibration::default(),
            bands: BandThresholds::default(),
            percentile: ROUTE_PERCENTILE,
            delay_cost_per_minute_cents: DELAY_COST_PER_MINUTE_CENTS,
        }
    }
}

impl ScoringConfig {
    /// Loads a config from a JSON file at `path`. Keys left out keep their
    /// reference values.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read scoring config {path}"))?;
        Self::from_json(&content).with_context(|| format!("invalid scoring config {path}"))
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let config: ScoringConfig = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects values that would push a factor or probability outside [0, 1]
    /// or turn it into NaN.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.percentile) {
            bail!("percentile must be within [0, 1], got {}", self.percentile);
        }
        if self.bands.medium > self.bands.high {
            bail!(
                "medium band ({}) must not exceed high band ({})",
                self.bands.medium,
                self.bands.high
            );
        }

        let r = &self.ramps;
        for (name, ramp) in [
            ("gust", r.gust),
            ("precip", r.precip),
            ("visibility", r.visibility),
            ("snow", r.snow),
        ] {
            if !ramp.start.is_finite() || !ramp.span.is_finite() || ramp.span == 0.0 {
                bail!(
                    "{name} ramp needs a finite start and a finite non-zero span, got start={} span={}",
                    ramp.start,
                    ramp.span
                );
            }
        }

        let w = &self.weights;
        let c = &self.coercion;
        let d = &self.defaults;
        let finite = [
            ("weights.baseline", w.baseline),
            ("weights.gust", w.gust),
            ("weights.precip", w.precip),
            ("weights.visibility", w.visibility),
            ("weights.snow", w.snow),
            ("weights.ice", w.ice),
            ("weights.prob", w.prob),
            ("ramps.ice_precip_mm", r.ice_precip_mm),
            ("ramps.ice_temp_c", r.ice_temp_c),
            ("calibration.exponent", self.calibration.exponent),
            ("calibration.scale", self.calibration.scale),
            ("coercion.gust_ms_below", c.gust_ms_below),
            ("coercion.ms_to_kmh", c.ms_to_kmh),
            ("coercion.visibility_km_below", c.visibility_km_below),
            ("coercion.km_to_m", c.km_to_m),
            ("defaults.temp_min_c", d.temp_min_c),
            ("defaults.precip_mm", d.precip_mm),
            ("defaults.precip_prob", d.precip_prob),
            ("defaults.snow_mm", d.snow_mm),
            ("defaults.gusts_kmh", d.gusts_kmh),
            ("defaults.visibility_m", d.visibility_m),
        ];
        if let Some((name, value)) = finite.iter().find(|(_, v)| !v.is_finite()) {
            bail!("{name} must be finite, got {value}");
        }
        Ok(())
    }
}
