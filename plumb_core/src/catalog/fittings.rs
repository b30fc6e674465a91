//! Local-Loss Coefficients (ζ)
//!
//! Three groups of fittings contribute to the local loss of a segment:
//!
//! - [`Fitting`] - fittings the designer counts per segment (elbows, tees, valves)
//! - [`AutoFitting`] - fittings assumed on every branch connection
//! - [`BuildingLoss`] - building-wide equipment at the service entry, charged once

use serde::{Deserialize, Serialize};

use super::normalize_key;
use crate::errors::{CalcError, CalcResult};

/// Generic per-segment fitting
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum Fitting {
    Elbow90,
    Elbow45,
    Bend90,
    BranchTee,
    Reducer,
    BallValve,
    GlobeValve,
    Strainer,
    CheckValve,
}

impl Fitting {
    pub const ALL: [Fitting; 9] = [
        Fitting::Elbow90,
        Fitting::Elbow45,
        Fitting::Bend90,
        Fitting::BranchTee,
        Fitting::Reducer,
        Fitting::BallValve,
        Fitting::GlobeValve,
        Fitting::Strainer,
        Fitting::CheckValve,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            Fitting::Elbow90 => "elbow90",
            Fitting::Elbow45 => "elbow45",
            Fitting::Bend90 => "bend90",
            Fitting::BranchTee => "branch_tee",
            Fitting::Reducer => "reducer",
            Fitting::BallValve => "ball_valve",
            Fitting::GlobeValve => "globe_valve",
            Fitting::Strainer => "strainer",
            Fitting::CheckValve => "check_valve",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Fitting::Elbow90 => "Standard 90° elbow",
            Fitting::Elbow45 => "45° elbow",
            Fitting::Bend90 => "90° bend",
            Fitting::BranchTee => "Branch tee",
            Fitting::Reducer => "Reducer",
            Fitting::BallValve => "Ball valve",
            Fitting::GlobeValve => "Globe valve",
            Fitting::Strainer => "Strainer",
            Fitting::CheckValve => "Check valve",
        }
    }

    pub fn local_name(&self) -> &'static str {
        match self {
            Fitting::Elbow90 => "Cot 90° standard",
            Fitting::Elbow45 => "Cot 45°",
            Fitting::Bend90 => "Curbă 90°",
            Fitting::BranchTee => "Teu derivație",
            Fitting::Reducer => "Reducție",
            Fitting::BallValve => "Vană cu bilă",
            Fitting::GlobeValve => "Vană cu ventil",
            Fitting::Strainer => "Filtru",
            Fitting::CheckValve => "Clapetă reținere",
        }
    }

    pub fn from_str_flexible(s: &str) -> CalcResult<Self> {
        let key = normalize_key(s);
        Fitting::ALL
            .iter()
            .copied()
            .find(|f| {
                normalize_key(f.code()) == key
                    || normalize_key(f.display_name()) == key
                    || normalize_key(f.local_name()) == key
            })
            .ok_or_else(|| CalcError::fitting_not_found(s))
    }

    pub fn zeta(&self) -> f64 {
        match self {
            Fitting::Elbow90 => 1.0,
            Fitting::Elbow45 => 0.4,
            Fitting::Bend90 => 0.5,
            Fitting::BranchTee => 1.5,
            Fitting::Reducer => 0.3,
            Fitting::BallValve => 0.2,
            Fitting::GlobeValve => 4.0,
            Fitting::Strainer => 3.0,
            Fitting::CheckValve => 2.0,
        }
    }

    /// Derivation fittings still count on non-terminal segments
    pub fn is_derivation(&self) -> bool {
        matches!(self, Fitting::BranchTee)
    }
}

impl std::fmt::Display for Fitting {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Fittings assumed on each branch connection of the chain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AutoFitting {
    /// Run-through tee at the connection, from the second segment on
    ThroughTee,
    /// Shutoff valve on each branch
    BranchShutoffValve,
}

impl AutoFitting {
    pub fn display_name(&self) -> &'static str {
        match self {
            AutoFitting::ThroughTee => "Through tee at connection",
            AutoFitting::BranchShutoffValve => "Branch shutoff valve",
        }
    }

    pub fn zeta(&self) -> f64 {
        match self {
            AutoFitting::ThroughTee => 0.5,
            AutoFitting::BranchShutoffValve => 0.2,
        }
    }
}

/// Equipment at the service entry, charged on the first segment only
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildingLoss {
    WaterMeter,
    PostMeterFilter,
    MainShutoffValve,
    PressureReducer,
    Manifold,
}

impl BuildingLoss {
    pub const ALL: [BuildingLoss; 5] = [
        BuildingLoss::WaterMeter,
        BuildingLoss::PostMeterFilter,
        BuildingLoss::MainShutoffValve,
        BuildingLoss::PressureReducer,
        BuildingLoss::Manifold,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            BuildingLoss::WaterMeter => "Water meter",
            BuildingLoss::PostMeterFilter => "Filter after meter",
            BuildingLoss::MainShutoffValve => "Service shutoff valve",
            BuildingLoss::PressureReducer => "Pressure reducer",
            BuildingLoss::Manifold => "Distribution manifold",
        }
    }

    pub fn zeta(&self) -> f64 {
        match self {
            BuildingLoss::WaterMeter => 6.0,
            BuildingLoss::PostMeterFilter => 3.0,
            BuildingLoss::MainShutoffValve => 0.2,
            BuildingLoss::PressureReducer => 1.5,
            BuildingLoss::Manifold => 2.0,
        }
    }

    /// Mandatory entries are enabled unless switched off; optional ones the reverse
    pub fn is_mandatory(&self) -> bool {
        matches!(
            self,
            BuildingLoss::WaterMeter | BuildingLoss::PostMeterFilter | BuildingLoss::MainShutoffValve
        )
    }

    pub fn description(&self) -> &'static str {
        match self {
            BuildingLoss::WaterMeter => "Required at the service connection, at most 6 mH2O",
            BuildingLoss::PostMeterFilter => "Protects the installation",
            BuildingLoss::MainShutoffValve => "Ball valve at the service connection",
            BuildingLoss::PressureReducer => "When network pressure exceeds 6 bar",
            BuildingLoss::Manifold => "For installations with a manifold",
        }
    }
}

impl std::fmt::Display for BuildingLoss {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_branch_tee_is_derivation() {
        let derivations: Vec<_> = Fitting::ALL.iter().filter(|f| f.is_derivation()).collect();
        assert_eq!(derivations, vec![&Fitting::BranchTee]);
    }

    #[test]
    fn test_zeta_values() {
        assert_eq!(Fitting::GlobeValve.zeta(), 4.0);
        assert_eq!(AutoFitting::ThroughTee.zeta(), 0.5);
        let mandatory: f64 = BuildingLoss::ALL
            .iter()
            .filter(|b| b.is_mandatory())
            .map(|b| b.zeta())
            .sum();
        assert!((mandatory - 9.2).abs() < 1e-12);
    }

    #[test]
    fn test_flexible_parsing() {
        assert_eq!(Fitting::from_str_flexible("Cot 45°").unwrap(), Fitting::Elbow45);
        assert_eq!(Fitting::from_str_flexible("branch-tee").unwrap(), Fitting::BranchTee);
        assert!(Fitting::from_str_flexible("Gate valve").is_err());
    }

    #[test]
    fn test_fitting_map_key_serialization() {
        let mut counts = std::collections::BTreeMap::new();
        counts.insert(Fitting::Elbow90, 2u32);
        let json = serde_json::to_string(&counts).unwrap();
        assert_eq!(json, r#"{"elbow90":2}"#);
    }
}
