//! # Demand Model
//!
//! Turns the fixtures served by a segment into the normative design flow.
//! Fixtures never run all at once, so every formula grows slower than the
//! plain sum of unit flows once the installation is large enough.
//!
//! ## Formulas
//!
//! | formula | sum | above threshold | below threshold |
//! |---|---|---|---|
//! | Method B | V = Σq·n | a·√V | V |
//! | Method C | E = Σu·n | a·√E (cold) or b·√E (hot) | 0.2·E |
//! | Probabilistic curve | S = Σq·u·n | 0.466·√S (S > 1.6) | see [`DemandFormula::ProbabilisticCurve`] |
//!
//! An optional ×1.1 safety factor is applied after the formula.
//!
//! ## Example
//!
//! ```rust
//! use std::collections::BTreeMap;
//! use plumb_core::catalog::{BuildingClass, FixtureType};
//! use plumb_core::demand::design_flow;
//! use plumb_core::hydraulics::WaterKind;
//!
//! let mut fixtures = BTreeMap::new();
//! fixtures.insert(FixtureType::Shower, 1);
//!
//! let formula = BuildingClass::Residential.demand_formula();
//! let (flow, trace) = design_flow(&fixtures, &formula, WaterKind::Cold, false);
//! assert!((flow - 0.45 * 0.2_f64.sqrt()).abs() < 1e-12);
//! assert_eq!(trace.formula, "0.45 × √0.200");
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::catalog::{BuildingClass, FixtureType};
use crate::hydraulics::WaterKind;

/// Multiplier applied when the safety margin is enabled
pub const SAFETY_FACTOR: f64 = 1.1;

/// Method C linear factor below `E_min`
const METHOD_C_LINEAR_FACTOR: f64 = 0.2;

/// Demand formula with its coefficients as data.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "formula", rename_all = "snake_case")]
pub enum DemandFormula {
    /// SR 1343-1 curve on S = Σq·u·n:
    /// S ≤ 0 → 0, S ≤ 0.2 → S, S ≤ 1.6 → 0.2 + 0.25·√(S − 0.2), else 0.466·√S
    ProbabilisticCurve,
    /// Flow-sum square-root formula
    MethodB { a: f64, v_min: f64 },
    /// Load-unit square-root formula
    MethodC { a: f64, b: f64, e_min: f64 },
}

impl DemandFormula {
    pub fn display_name(&self) -> &'static str {
        match self {
            DemandFormula::ProbabilisticCurve => "Probabilistic curve",
            DemandFormula::MethodB { .. } => "Method B",
            DemandFormula::MethodC { .. } => "Method C",
        }
    }

    /// Apply the formula to precomputed sums. Returns the flow (L/s), the
    /// formula text and whether the below-threshold branch was taken.
    pub fn evaluate(&self, sums: &FixtureSums, water: WaterKind) -> (f64, String, bool) {
        match *self {
            DemandFormula::MethodB { a, v_min } => {
                let v = sums.flow_sum_l_per_s;
                if v >= v_min {
                    (a * v.sqrt(), format!("{} × √{:.3}", a, v), false)
                } else {
                    (v, format!("{:.3} (below threshold)", v), true)
                }
            }
            DemandFormula::MethodC { a, b, e_min } => {
                let e = sums.load_unit_sum;
                let coef = match water {
                    WaterKind::Cold => a,
                    WaterKind::Hot => b,
                };
                if e >= e_min {
                    (coef * e.sqrt(), format!("{} × √{:.1}", coef, e), false)
                } else {
                    (
                        METHOD_C_LINEAR_FACTOR * e,
                        format!("{} × {:.1} (below threshold)", METHOD_C_LINEAR_FACTOR, e),
                        true,
                    )
                }
            }
            DemandFormula::ProbabilisticCurve => {
                let s = sums.probabilistic_sum;
                if s <= 0.0 {
                    (0.0, "0".to_string(), true)
                } else if s <= 0.2 {
                    (s, format!("{:.3}", s), true)
                } else if s <= 1.6 {
                    (
                        0.2 + 0.25 * (s - 0.2).sqrt(),
                        format!("0.2 + 0.25 × √({:.3} − 0.2)", s),
                        false,
                    )
                } else {
                    (0.466 * s.sqrt(), format!("0.466 × √{:.3}", s), false)
                }
            }
        }
    }
}

/// Where the design-flow formula comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DemandMode {
    /// Coefficients of the configured building class (Method B or C)
    #[default]
    BuildingClass,
    /// SR 1343-1 probabilistic curve regardless of building class
    ProbabilisticCurve,
}

impl DemandMode {
    /// Resolve the formula for a building class
    pub fn formula_for(&self, class: BuildingClass) -> DemandFormula {
        match self {
            DemandMode::BuildingClass => class.demand_formula(),
            DemandMode::ProbabilisticCurve => DemandFormula::ProbabilisticCurve,
        }
    }
}

/// Aggregated fixture sums V, E and S
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FixtureSums {
    /// Number of fixtures
    pub fixture_count: u32,
    /// V = Σq·n (L/s)
    pub flow_sum_l_per_s: f64,
    /// E = Σu·n
    pub load_unit_sum: f64,
    /// S = Σq·u·n
    pub probabilistic_sum: f64,
}

impl FixtureSums {
    pub fn from_counts(fixtures: &BTreeMap<FixtureType, u32>) -> Self {
        fixtures
            .iter()
            .fold(FixtureSums::default(), |mut acc, (fixture, &count)| {
                let n = f64::from(count);
                let q = fixture.unit_flow_l_per_s();
                let u = fixture.load_units();
                acc.fixture_count = acc.fixture_count.saturating_add(count);
                acc.flow_sum_l_per_s += q * n;
                acc.load_unit_sum += u * n;
                acc.probabilistic_sum += q * u * n;
                acc
            })
    }
}

/// How a design flow was obtained
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowTrace {
    pub sums: FixtureSums,
    pub formula_name: String,
    /// Human-readable formula, e.g. `0.45 × √0.200 × 1.1`
    pub formula: String,
    pub below_threshold: bool,
    pub safety_applied: bool,
}

/// Compute the design flow (L/s) for a set of fixtures.
pub fn design_flow(
    fixtures: &BTreeMap<FixtureType, u32>,
    formula: &DemandFormula,
    water: WaterKind,
    apply_safety: bool,
) -> (f64, FlowTrace) {
    let sums = FixtureSums::from_counts(fixtures);
    let (mut flow, mut text, below_threshold) = formula.evaluate(&sums, water);

    if apply_safety {
        flow *= SAFETY_FACTOR;
        text.push_str(&format!(" × {}", SAFETY_FACTOR));
    }

    let trace = FlowTrace {
        sums,
        formula_name: formula.display_name().to_string(),
        formula: text,
        below_threshold,
        safety_applied: apply_safety,
    };
    (flow, trace)
}
