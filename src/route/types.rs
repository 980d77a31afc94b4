//! Record types of the route model.

use serde::Serialize;
use std::ops::{BitOr, BitOrAssign};

use crate::config::{MAX_NAME_LEN, MAX_REGION_CODE_LEN};

/// Exclusive risk classification of a waypoint or route.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskBand {
    #[default]
    Low,
    Medium,
    High,
}

impl RiskBand {
    pub fn as_str(self) -> &'static str {
        match self {
            RiskBand::Low => "LOW",
            RiskBand::Medium => "MEDIUM",
            RiskBand::High => "HIGH",
        }
    }
}

impl std::fmt::Display for RiskBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Bitmask of concurrent weather conditions on a segment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct WeatherFlags(u32);

impl WeatherFlags {
    pub const NONE: WeatherFlags = WeatherFlags(0);
    pub const RAIN: WeatherFlags = WeatherFlags(1 << 0);
    pub const SNOW: WeatherFlags = WeatherFlags(1 << 1);
    pub const STORM: WeatherFlags = WeatherFlags(1 << 2);
    pub const HIGH_WIND: WeatherFlags = WeatherFlags(1 << 3);
    pub const EXTREME_TEMP: WeatherFlags = WeatherFlags(1 << 4);

    pub fn bits(self) -> u32 {
        self.0
    }

    pub fn contains(self, other: WeatherFlags) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for WeatherFlags {
    type Output = WeatherFlags;

    fn bitor(self, rhs: WeatherFlags) -> WeatherFlags {
        WeatherFlags(self.0 | rhs.0)
    }
}

impl BitOrAssign for WeatherFlags {
    fn bitor_assign(&mut self, rhs: WeatherFlags) {
        self.0 |= rhs.0;
    }
}

/// Cuts `s` so it fits a buffer of `cap` bytes including a terminator,
/// never splitting a character.
pub(crate) fn fit(s: &str, cap: usize) -> String {
    let max = cap.saturating_sub(1);
    if s.len() <= max {
        return s.to_string();
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    s[..end].to_string()
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Region {
    pub code: String,
    pub name: String,
}

impl Region {
    /// Codes keep at most 15 bytes and names 63.
    pub fn new(code: &str, name: &str) -> Self {
        Self {
            code: fit(code, MAX_REGION_CODE_LEN),
            name: fit(name, MAX_NAME_LEN),
        }
    }
}

/// Weather features of one segment, rounded to whole units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct WeatherSummary {
    pub temperature_c: i32,
    pub wind_kph: u32,
    pub precipitation_mm: u32,
    pub visibility_km: u32,
    pub flags: WeatherFlags,
    pub risk: RiskBand,
}

/// Cost outputs per segment, in cents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SegmentCost {
    pub base_cost_cents: u32,
    pub delay_cost_cents: u32,
    pub expected_segment_cost_cents: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RouteSegment {
    pub region: Region,
    pub start_time_utc: u32,
    pub end_time_utc: u32,
    pub distance_km: u32,
    pub weather: WeatherSummary,
    pub expected_delay_minutes: u32,
    pub cost: SegmentCost,
}

impl RouteSegment {
    /// Sets `delay_cost = delay_minutes * rate` and the segment total.
    pub fn recalculate_cost(&mut self, delay_cost_per_minute_cents: u32) {
        self.cost.delay_cost_cents = self
            .expected_delay_minutes
            .saturating_mul(delay_cost_per_minute_cents);
        self.cost.expected_segment_cost_cents = self
            .cost
            .base_cost_cents
            .saturating_add(self.cost.delay_cost_cents);
    }
}

/// Cost outputs for the whole route, in cents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RouteCost {
    pub total_base_cost_cents: u32,
    pub total_delay_cost_cents: u32,
    pub opportunity_cost_cents: u32,
    pub expected_total_cost_cents: u32,
}
