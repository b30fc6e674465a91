//! # Segments
//!
//! A chain is an ordered list of [`Segment`]s. Index 0 is the most remote
//! segment (the most disadvantaged fixture) and each following segment sits
//! one step closer to the supply. A segment only lists the fixtures it newly
//! introduces; everything upstream in the chain is inherited.
//!
//! ## JSON Example
//!
//! ```json
//! {
//!   "id": "6f1c2f4e-0f4b-4a55-9a8e-3f0b8f1c2d11",
//!   "fixtures": { "shower": 1, "washbasin": 1 },
//!   "length_m": 5.0,
//!   "elevation_delta_m": 3.0,
//!   "fittings": { "elbow90": 2 },
//!   "is_terminal": true
//! }
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::catalog::{Fitting, FixtureType};
use crate::errors::{ensure_finite, CalcError, CalcResult};

/// Fixture counts keyed by catalog entry
pub type FixtureCounts = BTreeMap<FixtureType, u32>;

/// Fitting counts keyed by catalog entry
pub type FittingCounts = BTreeMap<Fitting, u32>;

/// Default length of a new segment (m)
pub const DEFAULT_LENGTH_M: f64 = 5.0;

/// Default rise of the first segment (m)
pub const DEFAULT_FIRST_RISE_M: f64 = 3.0;

/// Largest count accepted for one fixture or fitting kind on a segment
pub const MAX_COUNT_PER_KIND: u32 = 50;

/// One pipe segment of the chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    /// Unique identifier
    pub id: Uuid,

    /// Fixtures newly connected on this segment
    #[serde(default)]
    pub fixtures: FixtureCounts,

    /// Pipe length in meters
    pub length_m: f64,

    /// Elevation change relative to the previous segment (m, + is a rise)
    #[serde(default)]
    pub elevation_delta_m: f64,

    /// Manually counted fittings on this segment
    #[serde(default)]
    pub fittings: FittingCounts,

    /// Whether this segment feeds the most disadvantaged fixture
    #[serde(default)]
    pub is_terminal: bool,
}

impl Segment {
    pub fn new(length_m: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            fixtures: BTreeMap::new(),
            length_m,
            elevation_delta_m: 0.0,
            fittings: BTreeMap::new(),
            is_terminal: false,
        }
    }

    /// Builder: add fixtures
    pub fn with_fixture(mut self, fixture: FixtureType, count: u32) -> Self {
        let entry = self.fixtures.entry(fixture).or_insert(0);
        *entry = entry.saturating_add(count);
        self
    }

    /// Builder: add fittings
    pub fn with_fitting(mut self, fitting: Fitting, count: u32) -> Self {
        let entry = self.fittings.entry(fitting).or_insert(0);
        *entry = entry.saturating_add(count);
        self
    }

    /// Builder: set the elevation change
    pub fn with_elevation(mut self, elevation_delta_m: f64) -> Self {
        self.elevation_delta_m = elevation_delta_m;
        self
    }

    /// Builder: mark as terminal
    pub fn terminal(mut self) -> Self {
        self.is_terminal = true;
        self
    }

    /// Number of fixtures newly connected on this segment
    pub fn new_fixture_count(&self) -> u32 {
        self.fixtures.values().fold(0, |acc, &count| acc.saturating_add(count))
    }

    /// Σζ of all manual fittings
    pub fn fittings_zeta(&self) -> f64 {
        self.fittings
            .iter()
            .map(|(fitting, &count)| fitting.zeta() * f64::from(count))
            .sum()
    }

    /// Σζ of derivation fittings only (tees)
    pub fn derivation_zeta(&self) -> f64 {
        self.fittings
            .iter()
            .filter(|(fitting, _)| fitting.is_derivation())
            .map(|(fitting, &count)| fitting.zeta() * f64::from(count))
            .sum()
    }

    /// Largest minimum connection bore of the new fixtures (mm)
    pub fn required_connection_mm(&self) -> Option<f64> {
        self.fixtures
            .iter()
            .filter(|(_, count)| **count > 0)
            .map(|(fixture, _)| fixture.min_connection_mm())
            .reduce(f64::max)
    }

    /// Validate the segment geometry and counts.
    ///
    /// Each fixture and fitting count is capped at [`MAX_COUNT_PER_KIND`].
    pub fn validate(&self) -> CalcResult<()> {
        ensure_finite("length_m", self.length_m)?;
        if self.length_m <= 0.0 {
            return Err(CalcError::invalid_input(
                "length_m",
                self.length_m.to_string(),
                "Segment length must be positive",
            ));
        }
        ensure_finite("elevation_delta_m", self.elevation_delta_m)?;

        let fixture_counts = self.fixtures.iter().map(|(f, &n)| (f.code(), n));
        let fitting_counts = self.fittings.iter().map(|(f, &n)| (f.code(), n));
        for (code, count) in fixture_counts.chain(fitting_counts) {
            if count > MAX_COUNT_PER_KIND {
                return Err(CalcError::invalid_input(
                    format!("count.{}", code),
                    count.to_string(),
                    format!("At most {} of one kind per segment", MAX_COUNT_PER_KIND),
                ));
            }
        }
        Ok(())
    }
}

/// Running fixture totals along a chain.
///
/// Yields the cumulative fixture set after each segment. Counts only grow.
pub struct CumulativeFixtures<'a> {
    segments: std::slice::Iter<'a, Segment>,
    running: FixtureCounts,
}

impl<'a> CumulativeFixtures<'a> {
    pub fn new(segments: &'a [Segment]) -> Self {
        Self {
            segments: segments.iter(),
            running: BTreeMap::new(),
        }
    }
}

impl Iterator for CumulativeFixtures<'_> {
    type Item = FixtureCounts;

    fn next(&mut self) -> Option<Self::Item> {
        let segment = self.segments.next()?;
        for (&fixture, &count) in &segment.fixtures {
            let total = self.running.entry(fixture).or_insert(0);
            *total = total.saturating_add(count);
        }
        Some(self.running.clone())
    }
}

/// Cumulative fixture set served by the segment at `index`.
pub fn cumulative_fixtures(segments: &[Segment], index: usize) -> FixtureCounts {
    CumulativeFixtures::new(segments)
        .nth(index)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain() -> Vec<Segment> {
        vec![
            Segment::new(5.0).with_fixture(FixtureType::Shower, 1).terminal(),
            Segment::new(3.0).with_fixture(FixtureType::Washbasin, 2),
            Segment::new(4.0).with_fixture(FixtureType::Shower, 1),
        ]
    }

    #[test]
    fn test_cumulative_counts_non_decreasing() {
        let segments = chain();
        let steps: Vec<_> = CumulativeFixtures::new(&segments).collect();
        assert_eq!(steps.len(), 3);
        for pair in steps.windows(2) {
            for (fixture, count) in &pair[0] {
                assert!(pair[1].get(fixture).copied().unwrap_or(0) >= *count);
            }
        }
        assert_eq!(steps[2].get(&FixtureType::Shower), Some(&2));
        assert_eq!(steps[2].get(&FixtureType::Washbasin), Some(&2));
    }

    #[test]
    fn test_cumulative_fixtures_out_of_range() {
        assert!(cumulative_fixtures(&chain(), 10).is_empty());
    }

    #[test]
    fn test_fitting_zeta_sums() {
        let segment = Segment::new(2.0)
            .with_fitting(Fitting::Elbow90, 2)
            .with_fitting(Fitting::BranchTee, 1);
        assert!((segment.fittings_zeta() - 3.5).abs() < 1e-12);
        assert!((segment.derivation_zeta() - 1.5).abs() < 1e-12);
    }

    #[test]
    fn test_required_connection() {
        let segment = Segment::new(1.0)
            .with_fixture(FixtureType::Washbasin, 1)
            .with_fixture(FixtureType::ServiceTapThreeQuarterInch, 1);
        assert_eq!(segment.required_connection_mm(), Some(20.0));
        assert_eq!(Segment::new(1.0).required_connection_mm(), None);
    }

    #[test]
    fn test_validation() {
        assert!(Segment::new(5.0).validate().is_ok());
        assert!(Segment::new(0.0).validate().is_err());
        assert!(Segment::new(f64::NAN).validate().is_err());
        assert!(Segment::new(1.0).with_elevation(f64::INFINITY).validate().is_err());
    }

    #[test]
    fn test_counts_above_cap_rejected() {
        let at_cap = Segment::new(2.0).with_fixture(FixtureType::Shower, MAX_COUNT_PER_KIND);
        assert!(at_cap.validate().is_ok());

        let err = Segment::new(2.0)
            .with_fixture(FixtureType::Shower, u32::MAX)
            .validate()
            .unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");

        let too_many_elbows = Segment::new(2.0).with_fitting(Fitting::Elbow90, MAX_COUNT_PER_KIND + 1);
        assert!(too_many_elbows.validate().is_err());
    }

    #[test]
    fn test_running_totals_saturate() {
        let segments = vec![
            Segment::new(5.0).with_fixture(FixtureType::Shower, u32::MAX),
            Segment::new(5.0).with_fixture(FixtureType::Shower, 1),
        ];
        let last = cumulative_fixtures(&segments, 1);
        assert_eq!(last.get(&FixtureType::Shower), Some(&u32::MAX));
    }

    #[test]
    fn test_json_round_trip() {
        let segment = Segment::new(5.0)
            .with_fixture(FixtureType::Shower, 1)
            .with_fitting(Fitting::Elbow90, 2)
            .terminal();
        let json = serde_json::to_string(&segment).unwrap();
        assert!(json.contains("\"shower\":1"));
        let back: Segment = serde_json::from_str(&json).unwrap();
        assert_eq!(back, segment);
    }

    #[test]
    fn test_unknown_fixture_key_rejected() {
        let json = r#"{"id":"6f1c2f4e-0f4b-4a55-9a8e-3f0b8f1c2d11","fixtures":{"jacuzzi":1},"length_m":5.0}"#;
        assert!(serde_json::from_str::<Segment>(json).is_err());
    }

    #[test]
    fn test_catalog_keys_accept_display_names() {
        let json = r#"{"id":"6f1c2f4e-0f4b-4a55-9a8e-3f0b8f1c2d11","fixtures":{"Duș":1,"Kitchen sink":2},
            "fittings":{"Cot 90° standard":1},"length_m":5.0}"#;
        let segment: Segment = serde_json::from_str(json).unwrap();
        assert_eq!(segment.fixtures.get(&FixtureType::Shower), Some(&1));
        assert_eq!(segment.fixtures.get(&FixtureType::KitchenSink), Some(&2));
        assert_eq!(segment.fittings.get(&Fitting::Elbow90), Some(&1));
    }
}
