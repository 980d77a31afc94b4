//! Route and segment records with cost, delay, and risk aggregation.
//!
//! The scorer fills one [`RouteSegment`] per waypoint; callers may set the
//! opportunity cost, recalculate totals, and print a summary with
//! [`Route`]'s `Display` impl.

mod types;

pub use types::{
    Region, RiskBand, RouteCost, RouteSegment, SegmentCost, WeatherFlags, WeatherSummary,
};

use serde::Serialize;
use std::fmt;

use crate::config::{MAX_ROUTE_ID_LEN, MAX_SEGMENTS};

/// Money in cents, displayed as `<whole>.<two-digit remainder>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cents(pub u32);

impl fmt::Display for Cents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Route {
    route_id: String,
    segments: Vec<RouteSegment>,
    pub total_distance_km: u32,
    pub total_expected_delay_minutes: u32,
    pub overall_risk: RiskBand,
    pub cost: RouteCost,
}

impl Route {
    /// Creates an empty route. Ids longer than 31 bytes are cut.
    pub fn new(route_id: &str) -> Self {
        Self {
            route_id: types::fit(route_id, MAX_ROUTE_ID_LEN),
            segments: Vec::with_capacity(MAX_SEGMENTS),
            ..Default::default()
        }
    }

    pub fn route_id(&self) -> &str {
        &self.route_id
    }

    pub fn segments(&self) -> &[RouteSegment] {
        &self.segments
    }

    /// Appends a segment. Returns `false` once the route holds
    /// [`MAX_SEGMENTS`] segments.
    pub fn add_segment(&mut self, seg: RouteSegment) -> bool {
        if self.segments.len() >= MAX_SEGMENTS {
            return false;
        }
        self.segments.push(seg);
        true
    }

    pub fn set_opportunity_cost(&mut self, cents: u32) {
        self.cost.opportunity_cost_cents = cents;
    }

    /// Refreshes every segment's cost, then sums distance, delay, and costs
    /// over the segments and takes the worst segment band as the route risk.
    pub fn recalculate_totals(&mut self, delay_cost_per_minute_cents: u32) {
        let mut distance = 0u32;
        let mut delay = 0u32;
        let mut base = 0u32;
        let mut delay_cost = 0u32;
        let mut max_risk = RiskBand::Low;

        for s in &mut self.segments {
            s.recalculate_cost(delay_cost_per_minute_cents);

            distance = distance.saturating_add(s.distance_km);
            delay = delay.saturating_add(s.expected_delay_minutes);
            base = base.saturating_add(s.cost.base_cost_cents);
            delay_cost = delay_cost.saturating_add(s.cost.delay_cost_cents);
            max_risk = max_risk.max(s.weather.risk);
        }

        self.total_distance_km = distance;
        self.total_expected_delay_minutes = delay;
        self.overall_risk = max_risk;
        self.cost.total_base_cost_cents = base;
        self.cost.total_delay_cost_cents = delay_cost;
        self.cost.expected_total_cost_cents = base
            .saturating_add(delay_cost)
            .saturating_add(self.cost.opportunity_cost_cents);
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Route {} ===", self.route_id)?;
        writeln!(f, "Segments: {}", self.segments.len())?;

        for (i, s) in self.segments.iter().enumerate() {
            writeln!(f)?;
            writeln!(f, "Segment {}", i + 1)?;
            writeln!(f, "  Region: {} ({})", s.region.name, s.region.code)?;
            writeln!(
                f,
                "  Time:   {} -> {} (UTC unix)",
                s.start_time_utc, s.end_time_utc
            )?;
            writeln!(f, "  Dist:   {} km", s.distance_km)?;
            writeln!(
                f,
                "  Weather: temp={}C wind={}kph precip={}mm vis={}km flags={} risk={}",
                s.weather.temperature_c,
                s.weather.wind_kph,
                s.weather.precipitation_mm,
                s.weather.visibility_km,
                s.weather.flags.bits(),
                s.weather.risk
            )?;
            writeln!(f, "  Expected delay: {} minutes", s.expected_delay_minutes)?;
            writeln!(f, "  Segment costs:")?;
            writeln!(f, "    Base:  {}", Cents(s.cost.base_cost_cents))?;
            writeln!(f, "    Delay: {}", Cents(s.cost.delay_cost_cents))?;
            writeln!(
                f,
                "    Expected segment total: {}",
                Cents(s.cost.expected_segment_cost_cents)
            )?;
        }

        writeln!(f)?;
        writeln!(f, "--- Route Totals ---")?;
        writeln!(f, "Total distance: {} km", self.total_distance_km)?;
        writeln!(f, "Total delay:    {} minutes", self.total_expected_delay_minutes)?;
        writeln!(f, "Overall risk:   {}", self.overall_risk)?;
        writeln!(f, "Costs:")?;
        writeln!(f, "  Base total:       {}", Cents(self.cost.total_base_cost_cents))?;
        writeln!(f, "  Delay total:      {}", Cents(self.cost.total_delay_cost_cents))?;
        writeln!(f, "  Opportunity cost: {}", Cents(self.cost.opportunity_cost_cents))?;
        writeln!(f, "  Expected total:   {}", Cents(self.cost.expected_total_cost_cents))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segment(
        code: &str,
        distance_km: u32,
        base_cost_cents: u32,
        risk: RiskBand,
        flags: WeatherFlags,
        delay: u32,
    ) -> RouteSegment {
        RouteSegment {
            region: Region::new(code, code),
            distance_km,
            weather: WeatherSummary {
                risk,
                flags,
                ..Default::default()
            },
            expected_delay_minutes: delay,
            cost: SegmentCost {
                base_cost_cents,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    fn two_leg_route() -> Route {
        let mut route = Route::new("ROUTE-001");
        assert!(route.add_segment(segment(
            "EU-WEST",
            800,
            25_000,
            RiskBand::Medium,
            WeatherFlags::RAIN,
            35
        )));
        assert!(route.add_segment(segment(
            "ATL",
            3000,
            90_000,
            RiskBand::High,
            WeatherFlags::STORM | WeatherFlags::HIGH_WIND,
            180
        )));
        route.set_opportunity_cost(5_000);
        route.recalculate_totals(20);
        route
    }

    #[test]
    fn test_new_route_is_empty() {
        let route = Route::new("R");
        assert!(route.segments().is_empty());
        assert_eq!(route.overall_risk, RiskBand::Low);
        assert_eq!(route.cost, RouteCost::default());
    }

    #[test]
    fn test_route_id_truncated() {
        let route = Route::new(&"R".repeat(40));
        assert_eq!(route.route_id().len(), 31);
    }

    #[test]
    fn test_add_segment_respects_cap() {
        let mut route = Route::new("CAP");
        for _ in 0..MAX_SEGMENTS {
            assert!(route.add_segment(RouteSegment::default()));
        }
        assert!(!route.add_segment(RouteSegment::default()));
        assert_eq!(route.segments().len(), MAX_SEGMENTS);
    }

    #[test]
    fn test_recalculate_totals() {
        let route = two_leg_route();
        assert_eq!(route.total_distance_km, 3800);
        assert_eq!(route.total_expected_delay_minutes, 215);
        assert_eq!(route.overall_risk, RiskBand::High);
        assert_eq!(route.cost.total_base_cost_cents, 115_000);
        assert_eq!(route.cost.total_delay_cost_cents, 4_300);
        assert_eq!(route.cost.expected_total_cost_cents, 124_300);
        assert_eq!(route.segments()[1].cost.delay_cost_cents, 3_600);
    }

    #[test]
    fn test_recalculate_is_repeatable() {
        let mut route = two_leg_route();
        let before = route.clone();
        route.recalculate_totals(20);
        assert_eq!(route, before);
    }

    #[test]
    fn test_money_format() {
        assert_eq!(Cents(0).to_string(), "0.00");
        assert_eq!(Cents(5).to_string(), "0.05");
        assert_eq!(Cents(124_300).to_string(), "1243.00");
        assert_eq!(Cents(25_707).to_string(), "257.07");
    }

    #[test]
    fn test_summary_output() {
        let text = two_leg_route().to_string();
        assert!(text.starts_with("=== Route ROUTE-001 ===\nSegments: 2\n"));
        assert!(text.contains("  Region: ATL (ATL)\n"));
        assert!(text.contains("flags=12 risk=HIGH"));
        assert!(text.contains("    Delay: 36.00\n"));
        assert!(text.contains("Overall risk:   HIGH\n"));
        assert!(text.contains("  Opportunity cost: 50.00\n"));
        assert!(text.ends_with("  Expected total:   1243.00\n"));
    }
}
