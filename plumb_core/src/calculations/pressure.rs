//! # Pressure Balance
//!
//! Compares the head the most disadvantaged fixture needs at the end of the
//! chain with the pressure available at the service connection.
//!
//! ```text
//! Hu = p_min + Σ Δh            useful head
//! Hr = Hu + h_total            required head at the source
//! Hg = Hr - p_available        > 0 → a booster pump must add Hg
//! ```
//!
//! ## Example
//!
//! ```rust
//! use plumb_core::calculations::pressure::evaluate;
//!
//! let balance = evaluate(12.0, 8.5, 9.0, 25.0);
//! assert!(balance.pump_required);
//! assert!((balance.pump_head_deficit_mca - 4.5).abs() < 1e-9);
//! ```

use serde::{Deserialize, Serialize};

use crate::units::{Bar, KiloPascals, MetersWaterColumn};

/// Outcome of the source pressure check (all heads in mCA).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PressureBalance {
    /// Minimum pressure of the governing fixture
    pub min_fixture_pressure_mca: f64,

    /// Σ elevation change along the chain (m)
    pub elevation_sum_m: f64,

    /// Σ friction and fitting losses
    pub total_head_loss_mca: f64,

    /// Pressure available at the service connection
    pub available_pressure_mca: f64,

    /// Hu = p_min + Σ Δh
    pub useful_head_mca: f64,

    /// Hr = Hu + h_total
    pub required_head_mca: f64,

    /// Hg = Hr - available; positive means a shortfall
    pub head_balance_mca: f64,

    pub pump_required: bool,

    /// Head a pump must add (0 when the supply suffices)
    pub pump_head_deficit_mca: f64,

    /// Spare head at the source (0 when a pump is required)
    pub surplus_mca: f64,

    /// Flow the pump must deliver, the design flow nearest the source
    pub pump_flow_l_per_s: Option<f64>,
}

impl PressureBalance {
    /// Attach the pump design flow. Ignored when no pump is required.
    pub fn with_pump_flow(mut self, flow_l_per_s: f64) -> Self {
        self.pump_flow_l_per_s = self.pump_required.then_some(flow_l_per_s);
        self
    }

    pub fn required_head_kpa(&self) -> KiloPascals {
        KiloPascals::from(MetersWaterColumn(self.required_head_mca))
    }

    pub fn required_head_bar(&self) -> Bar {
        Bar::from(MetersWaterColumn(self.required_head_mca))
    }
}

/// Check the available pressure against the chain requirement.
pub fn evaluate(
    min_fixture_pressure_mca: f64,
    total_head_loss_mca: f64,
    elevation_sum_m: f64,
    available_pressure_mca: f64,
) -> PressureBalance {
    let useful = min_fixture_pressure_mca + elevation_sum_m;
    let required = useful + total_head_loss_mca;
    let balance = required - available_pressure_mca;
    let pump_required = balance > 0.0;

    PressureBalance {
        min_fixture_pressure_mca,
        elevation_sum_m,
        total_head_loss_mca,
        available_pressure_mca,
        useful_head_mca: useful,
        required_head_mca: required,
        head_balance_mca: balance,
        pump_required,
        pump_head_deficit_mca: if pump_required { balance } else { 0.0 },
        surplus_mca: if pump_required { 0.0 } else { -balance },
        pump_flow_l_per_s: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_sufficient_pressure() {
        let b = evaluate(12.0, 3.0, 3.0, 30.0);
        assert!(!b.pump_required);
        assert_relative_eq!(b.useful_head_mca, 15.0);
        assert_relative_eq!(b.required_head_mca, 18.0);
        assert_relative_eq!(b.surplus_mca, 12.0);
        assert_eq!(b.pump_head_deficit_mca, 0.0);
    }

    #[test]
    fn test_pump_required() {
        let b = evaluate(25.0, 6.0, 9.0, 30.0).with_pump_flow(1.2);
        assert!(b.pump_required);
        assert_relative_eq!(b.pump_head_deficit_mca, 10.0);
        assert_eq!(b.surplus_mca, 0.0);
        assert_eq!(b.pump_flow_l_per_s, Some(1.2));
    }

    #[test]
    fn test_exact_balance_needs_no_pump() {
        let b = evaluate(10.0, 5.0, 0.0, 15.0).with_pump_flow(0.4);
        assert!(!b.pump_required);
        assert_eq!(b.pump_flow_l_per_s, None);
    }

    #[test]
    fn test_negative_elevation_lowers_requirement() {
        let b = evaluate(12.0, 2.0, -6.0, 10.0);
        assert_relative_eq!(b.required_head_mca, 8.0);
        assert!(!b.pump_required);
    }

    #[test]
    fn test_unit_conversions() {
        let b = evaluate(10.0, 0.0, 0.0, 0.0);
        assert_relative_eq!(b.required_head_kpa().0, 98.1, epsilon = 1e-9);
        assert_relative_eq!(b.required_head_bar().0, 0.981, epsilon = 1e-9);
    }
}
