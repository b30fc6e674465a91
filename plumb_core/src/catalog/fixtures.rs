//! Sanitary Fixtures (I9-2022 Annex)
//!
//! Each fixture carries its unit flow `q` (L/s), load-unit weight `u`, the
//! minimum pressure it needs at the outlet (mCA), its minimum connection bore
//! and the fittings that come with it when it sits on the terminal segment.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use super::normalize_key;
use crate::errors::{CalcError, CalcResult};

/// Fixture grouping used by presentation layers
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FixtureCategory {
    Bathroom,
    Kitchen,
    Utility,
}

impl FixtureCategory {
    pub fn display_name(&self) -> &'static str {
        match self {
            FixtureCategory::Bathroom => "Bathroom",
            FixtureCategory::Kitchen => "Kitchen",
            FixtureCategory::Utility => "Utility",
        }
    }
}

/// Sanitary fixture catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum FixtureType {
    /// WC with cistern
    WcCistern,
    /// WC with pressure flush valve
    WcFlushValve,
    /// Washbasin
    Washbasin,
    /// Washbasin in a shared washroom
    WashbasinShared,
    /// Bidet
    Bidet,
    /// Shower
    Shower,
    /// Bathtub up to 150 L
    BathtubSmall,
    /// Bathtub over 150 L
    BathtubLarge,
    /// Kitchen sink
    KitchenSink,
    /// Dishwasher
    Dishwasher,
    /// Washing machine
    WashingMachine,
    /// Service tap 1/2"
    ServiceTapHalfInch,
    /// Service tap 3/4"
    ServiceTapThreeQuarterInch,
}

/// (name, ζ) pairs implied by a fixture's connection
pub type ImpliedLosses = &'static [(&'static str, f64)];

const WC_CISTERN_LOSSES: ImpliedLosses = &[
    ("Wall-plate elbow", 1.5),
    ("Angle valve", 10.0),
    ("Angle valve elbow", 1.0),
    ("Angle valve reducer", 0.5),
];
const WC_FLUSH_VALVE_LOSSES: ImpliedLosses = &[
    ("Wall-plate elbow", 1.5),
    ("Flush valve", 10.0),
    ("Elbow", 1.0),
    ("Reducer", 0.5),
];
const WASHBASIN_LOSSES: ImpliedLosses = &[
    ("Wall-plate elbow", 1.5),
    ("Mixer with aerator", 10.0),
    ("Reducer", 0.5),
];
const MIXER_LOSSES: ImpliedLosses = &[
    ("Wall-plate elbow", 1.5),
    ("Mixer tap", 10.0),
    ("Reducer", 0.5),
];
const SHOWER_LOSSES: ImpliedLosses = &[
    ("Wall-plate elbow", 1.5),
    ("Shower mixer", 10.0),
    ("Reducer", 0.5),
];
const BATHTUB_LOSSES: ImpliedLosses = &[
    ("Wall-plate elbow", 1.5),
    ("Bath mixer", 10.0),
    ("Reducer", 0.5),
];
const SINK_LOSSES: ImpliedLosses = &[
    ("Wall-plate elbow", 1.5),
    ("Sink mixer", 10.0),
    ("Reducer", 0.5),
];
const APPLIANCE_LOSSES: ImpliedLosses = &[
    ("Wall-plate elbow", 1.5),
    ("Angle valve", 10.0),
    ("Angle valve expander", 0.5),
];
const SERVICE_TAP_LOSSES: ImpliedLosses = &[("Wall-plate elbow", 1.5), ("Tap", 10.0)];

impl FixtureType {
    /// All fixtures in catalog order
    pub const ALL: [FixtureType; 13] = [
        FixtureType::WcCistern,
        FixtureType::WcFlushValve,
        FixtureType::Washbasin,
        FixtureType::WashbasinShared,
        FixtureType::Bidet,
        FixtureType::Shower,
        FixtureType::BathtubSmall,
        FixtureType::BathtubLarge,
        FixtureType::KitchenSink,
        FixtureType::Dishwasher,
        FixtureType::WashingMachine,
        FixtureType::ServiceTapHalfInch,
        FixtureType::ServiceTapThreeQuarterInch,
    ];

    /// Stable identifier (matches the JSON representation)
    pub fn code(&self) -> &'static str {
        match self {
            FixtureType::WcCistern => "wc_cistern",
            FixtureType::WcFlushValve => "wc_flush_valve",
            FixtureType::Washbasin => "washbasin",
            FixtureType::WashbasinShared => "washbasin_shared",
            FixtureType::Bidet => "bidet",
            FixtureType::Shower => "shower",
            FixtureType::BathtubSmall => "bathtub_small",
            FixtureType::BathtubLarge => "bathtub_large",
            FixtureType::KitchenSink => "kitchen_sink",
            FixtureType::Dishwasher => "dishwasher",
            FixtureType::WashingMachine => "washing_machine",
            FixtureType::ServiceTapHalfInch => "service_tap_half_inch",
            FixtureType::ServiceTapThreeQuarterInch => "service_tap_three_quarter_inch",
        }
    }

    /// English display name
    pub fn display_name(&self) -> &'static str {
        match self {
            FixtureType::WcCistern => "WC with cistern",
            FixtureType::WcFlushValve => "WC with flush valve",
            FixtureType::Washbasin => "Washbasin",
            FixtureType::WashbasinShared => "Washbasin (shared washroom)",
            FixtureType::Bidet => "Bidet",
            FixtureType::Shower => "Shower",
            FixtureType::BathtubSmall => "Bathtub < 150 L",
            FixtureType::BathtubLarge => "Bathtub > 150 L",
            FixtureType::KitchenSink => "Kitchen sink",
            FixtureType::Dishwasher => "Dishwasher",
            FixtureType::WashingMachine => "Washing machine",
            FixtureType::ServiceTapHalfInch => "Service tap 1/2\"",
            FixtureType::ServiceTapThreeQuarterInch => "Service tap 3/4\"",
        }
    }

    /// Name used in the Romanian normative tables
    pub fn local_name(&self) -> &'static str {
        match self {
            FixtureType::WcCistern => "WC cu rezervor",
            FixtureType::WcFlushValve => "WC jet sub presiune",
            FixtureType::Washbasin => "Lavoar",
            FixtureType::WashbasinShared => "Lavoar grup sanitar",
            FixtureType::Bidet => "Bideu",
            FixtureType::Shower => "Duș",
            FixtureType::BathtubSmall => "Cadă < 150L",
            FixtureType::BathtubLarge => "Cadă > 150L",
            FixtureType::KitchenSink => "Spălător vase",
            FixtureType::Dishwasher => "Mașină spălat vase",
            FixtureType::WashingMachine => "Mașină spălat rufe",
            FixtureType::ServiceTapHalfInch => "Robinet serviciu 1/2\"",
            FixtureType::ServiceTapThreeQuarterInch => "Robinet serviciu 3/4\"",
        }
    }

    /// Parse from an identifier, English name or Romanian name
    pub fn from_str_flexible(s: &str) -> CalcResult<Self> {
        let key = normalize_key(s);
        FixtureType::ALL
            .iter()
            .copied()
            .find(|f| {
                normalize_key(f.code()) == key
                    || normalize_key(f.display_name()) == key
                    || normalize_key(f.local_name()) == key
            })
            .ok_or_else(|| CalcError::fixture_not_found(s))
    }

    /// Unit flow rate q (L/s)
    pub fn unit_flow_l_per_s(&self) -> f64 {
        match self {
            FixtureType::WcCistern => 0.12,
            FixtureType::WcFlushValve => 1.5,
            FixtureType::Washbasin => 0.10,
            FixtureType::WashbasinShared => 0.15,
            FixtureType::Bidet => 0.10,
            FixtureType::Shower => 0.20,
            FixtureType::BathtubSmall => 0.25,
            FixtureType::BathtubLarge => 0.33,
            FixtureType::KitchenSink => 0.20,
            FixtureType::Dishwasher => 0.20,
            FixtureType::WashingMachine => 0.20,
            FixtureType::ServiceTapHalfInch => 0.20,
            FixtureType::ServiceTapThreeQuarterInch => 0.42,
        }
    }

    /// Load-unit weight u (dimensionless)
    pub fn load_units(&self) -> f64 {
        match self {
            FixtureType::WcCistern => 1.0,
            FixtureType::WcFlushValve => 15.0,
            FixtureType::Washbasin => 1.5,
            FixtureType::WashbasinShared => 1.5,
            FixtureType::Bidet => 1.0,
            FixtureType::Shower => 2.0,
            FixtureType::BathtubSmall => 3.0,
            FixtureType::BathtubLarge => 4.0,
            FixtureType::KitchenSink => 2.0,
            FixtureType::Dishwasher => 2.0,
            FixtureType::WashingMachine => 2.0,
            FixtureType::ServiceTapHalfInch => 2.0,
            FixtureType::ServiceTapThreeQuarterInch => 4.0,
        }
    }

    /// Minimum outlet pressure p_min (mCA)
    pub fn min_pressure_mca(&self) -> f64 {
        match self {
            FixtureType::WcCistern
            | FixtureType::Washbasin
            | FixtureType::WashbasinShared
            | FixtureType::Bidet => 10.0,
            FixtureType::WcFlushValve => 25.0,
            FixtureType::BathtubSmall | FixtureType::BathtubLarge => 13.0,
            FixtureType::Shower
            | FixtureType::KitchenSink
            | FixtureType::Dishwasher
            | FixtureType::WashingMachine
            | FixtureType::ServiceTapHalfInch
            | FixtureType::ServiceTapThreeQuarterInch => 12.0,
        }
    }

    /// Minimum connection bore (mm)
    pub fn min_connection_mm(&self) -> f64 {
        match self {
            FixtureType::WcCistern
            | FixtureType::WcFlushValve
            | FixtureType::Washbasin
            | FixtureType::WashbasinShared
            | FixtureType::Bidet => 10.0,
            FixtureType::Shower
            | FixtureType::KitchenSink
            | FixtureType::Dishwasher
            | FixtureType::WashingMachine => 12.0,
            FixtureType::BathtubSmall | FixtureType::BathtubLarge => 13.0,
            FixtureType::ServiceTapHalfInch => 15.0,
            FixtureType::ServiceTapThreeQuarterInch => 20.0,
        }
    }

    pub fn category(&self) -> FixtureCategory {
        match self {
            FixtureType::KitchenSink | FixtureType::Dishwasher => FixtureCategory::Kitchen,
            FixtureType::WashingMachine
            | FixtureType::ServiceTapHalfInch
            | FixtureType::ServiceTapThreeQuarterInch => FixtureCategory::Utility,
            _ => FixtureCategory::Bathroom,
        }
    }

    /// Fittings that come with the fixture connection, as (name, ζ)
    pub fn implied_losses(&self) -> ImpliedLosses {
        match self {
            FixtureType::WcCistern => WC_CISTERN_LOSSES,
            FixtureType::WcFlushValve => WC_FLUSH_VALVE_LOSSES,
            FixtureType::Washbasin => WASHBASIN_LOSSES,
            FixtureType::WashbasinShared | FixtureType::Bidet => MIXER_LOSSES,
            FixtureType::Shower => SHOWER_LOSSES,
            FixtureType::BathtubSmall | FixtureType::BathtubLarge => BATHTUB_LOSSES,
            FixtureType::KitchenSink => SINK_LOSSES,
            FixtureType::Dishwasher | FixtureType::WashingMachine => APPLIANCE_LOSSES,
            FixtureType::ServiceTapHalfInch | FixtureType::ServiceTapThreeQuarterInch => {
                SERVICE_TAP_LOSSES
            }
        }
    }

    /// Σζ of the implied fittings for one fixture
    pub fn implied_zeta(&self) -> f64 {
        self.implied_losses().iter().map(|(_, zeta)| zeta).sum()
    }
}

impl std::fmt::Display for FixtureType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Fixtures grouped by category, in catalog order
pub static FIXTURES_BY_CATEGORY: Lazy<BTreeMap<FixtureCategory, Vec<FixtureType>>> = Lazy::new(|| {
    let mut groups: BTreeMap<FixtureCategory, Vec<FixtureType>> = BTreeMap::new();
    for fixture in FixtureType::ALL {
        groups.entry(fixture.category()).or_default().push(fixture);
    }
    groups
});

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_shower_properties() {
        let shower = FixtureType::Shower;
        assert_eq!(shower.unit_flow_l_per_s(), 0.20);
        assert_eq!(shower.load_units(), 2.0);
        assert_eq!(shower.min_pressure_mca(), 12.0);
        assert_eq!(shower.implied_zeta(), 12.0);
    }

    #[test]
    fn test_wc_cistern_implied_zeta() {
        // 1.5 + 10 + 1.0 + 0.5
        assert_eq!(FixtureType::WcCistern.implied_zeta(), 13.0);
    }

    #[test]
    fn test_flexible_parsing() {
        assert_eq!(FixtureType::from_str_flexible("shower").unwrap(), FixtureType::Shower);
        assert_eq!(FixtureType::from_str_flexible("Duș").unwrap(), FixtureType::Shower);
        assert_eq!(FixtureType::from_str_flexible("WC cu rezervor").unwrap(), FixtureType::WcCistern);
        assert_eq!(FixtureType::from_str_flexible("Kitchen Sink").unwrap(), FixtureType::KitchenSink);
        assert_eq!(FixtureType::from_str_flexible("Bathtub > 150 L").unwrap(), FixtureType::BathtubLarge);
    }

    #[test]
    fn test_unknown_fixture_fails() {
        let err = FixtureType::from_str_flexible("Jacuzzi").unwrap_err();
        assert_eq!(err.error_code(), "FIXTURE_NOT_FOUND");
    }

    #[test]
    fn test_codes_are_unique_and_round_trip() {
        for fixture in FixtureType::ALL {
            assert_eq!(FixtureType::from_str_flexible(fixture.code()).unwrap(), fixture);
            let json = serde_json::to_string(&fixture).unwrap();
            assert_eq!(json, format!("\"{}\"", fixture.code()));
        }
    }

    #[test]
    fn test_fixture_map_keys_serialize_as_codes() {
        let mut counts = BTreeMap::new();
        counts.insert(FixtureType::Shower, 2u32);
        counts.insert(FixtureType::WcCistern, 1u32);
        let json = serde_json::to_string(&counts).unwrap();
        assert_eq!(json, r#"{"wc_cistern":1,"shower":2}"#);
    }

    #[test]
    fn test_grouping_by_category() {
        let total: usize = FIXTURES_BY_CATEGORY.values().map(Vec::len).sum();
        assert_eq!(total, FixtureType::ALL.len());
        assert!(FIXTURES_BY_CATEGORY[&FixtureCategory::Kitchen].contains(&FixtureType::Dishwasher));
        assert_eq!(FIXTURES_BY_CATEGORY[&FixtureCategory::Utility].len(), 3);
    }
}
