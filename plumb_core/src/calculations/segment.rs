//! # Segment Sizing
//!
//! Sizes a single pipe segment for a known design flow: picks the commercial
//! bore, then computes velocity, Reynolds number, friction factor and the
//! friction and fitting losses. Elevation is left to the caller.
//!
//! ## Example
//!
//! ```rust
//! use plumb_core::calculations::segment::{size_segment, SegmentSizingInput};
//! use plumb_core::catalog::PipeMaterial;
//!
//! let input = SegmentSizingInput::new(0.2012, 5.0, PipeMaterial::Ppr, 10.0, 12.0);
//! let sizing = size_segment(&input).unwrap().expect("positive flow");
//!
//! assert_eq!(sizing.diameter.nominal_mm, 15);
//! assert!(sizing.velocity_m_per_s <= 2.0);
//! ```

use serde::{Deserialize, Serialize};

use crate::catalog::{select_diameter, DiameterSelection, PipeMaterial};
use crate::errors::{ensure_finite, CalcError, CalcResult};
use crate::hydraulics::{
    kinematic_viscosity, linear_loss, local_loss, mean_velocity, reynolds, unit_friction_loss,
    FrictionMethod,
};
use crate::units::{CubicMetersPerSecond, LitersPerSecond};

/// Input for one segment.
///
/// ## JSON Example
///
/// ```json
/// {
///   "flow_l_per_s": 0.2012,
///   "length_m": 5.0,
///   "material": "ppr",
///   "temperature_c": 10.0,
///   "sum_zeta": 12.0,
///   "friction_method": "haaland"
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SegmentSizingInput {
    /// Design flow (L/s)
    pub flow_l_per_s: f64,

    /// Pipe length (m)
    pub length_m: f64,

    pub material: PipeMaterial,

    /// Water temperature (°C)
    pub temperature_c: f64,

    /// Σζ of the local losses charged to this segment
    pub sum_zeta: f64,

    #[serde(default)]
    pub friction_method: FrictionMethod,
}

impl SegmentSizingInput {
    pub fn new(
        flow_l_per_s: f64,
        length_m: f64,
        material: PipeMaterial,
        temperature_c: f64,
        sum_zeta: f64,
    ) -> Self {
        Self {
            flow_l_per_s,
            length_m,
            material,
            temperature_c,
            sum_zeta,
            friction_method: FrictionMethod::default(),
        }
    }

    /// Builder: choose the friction solver
    pub fn with_friction_method(mut self, method: FrictionMethod) -> Self {
        self.friction_method = method;
        self
    }

    /// Validate input parameters.
    pub fn validate(&self) -> CalcResult<()> {
        ensure_finite("flow_l_per_s", self.flow_l_per_s)?;
        ensure_finite("length_m", self.length_m)?;
        ensure_finite("temperature_c", self.temperature_c)?;
        ensure_finite("sum_zeta", self.sum_zeta)?;
        if self.length_m <= 0.0 {
            return Err(CalcError::invalid_input(
                "length_m",
                self.length_m.to_string(),
                "Segment length must be positive",
            ));
        }
        if self.sum_zeta < 0.0 {
            return Err(CalcError::invalid_input(
                "sum_zeta",
                self.sum_zeta.to_string(),
                "Local-loss coefficients cannot be negative",
            ));
        }
        Ok(())
    }
}

/// Hydraulic state of a sized segment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SegmentSizing {
    /// Design flow (L/s)
    pub flow_l_per_s: f64,

    /// Chosen bore
    pub diameter: DiameterSelection,

    pub velocity_m_per_s: f64,
    pub reynolds: f64,
    pub friction_factor: f64,

    /// Friction loss per meter i = λ·v²/(2gD) (m/m)
    pub unit_loss: f64,

    /// Darcy-Weisbach friction loss (mCA)
    pub linear_loss_mca: f64,

    /// Σζ charged to the segment
    pub sum_zeta: f64,

    /// Fitting loss (mCA)
    pub local_loss_mca: f64,
}

impl SegmentSizing {
    /// Friction plus fitting loss (mCA)
    pub fn total_loss_mca(&self) -> f64 {
        self.linear_loss_mca + self.local_loss_mca
    }

    /// Replace the fitting loss with a flat value, Σζ no longer applies
    pub fn with_flat_local_loss(mut self, local_loss_mca: f64) -> Self {
        self.sum_zeta = 0.0;
        self.local_loss_mca = local_loss_mca;
        self
    }
}

/// Size one segment.
///
/// The input is validated first. `Ok(None)` is a segment without flow, which
/// is an inert segment rather than a failure.
pub fn size_segment(input: &SegmentSizingInput) -> CalcResult<Option<SegmentSizing>> {
    input.validate()?;
    if input.flow_l_per_s <= 0.0 {
        return Ok(None);
    }

    let flow = CubicMetersPerSecond::from(LitersPerSecond(input.flow_l_per_s)).0;
    let diameter = select_diameter(input.material, flow, input.material.max_velocity_m_per_s());
    let d_m = diameter.internal_diameter_m();
    if d_m <= 0.0 {
        return Ok(None);
    }

    let velocity = mean_velocity(flow, d_m);
    let re = reynolds(velocity, d_m, kinematic_viscosity(input.temperature_c));
    let relative_roughness = input.material.roughness_mm() / diameter.internal_diameter_mm;
    let lambda = input.friction_method.friction_factor(re, relative_roughness);

    Ok(Some(SegmentSizing {
        flow_l_per_s: input.flow_l_per_s,
        diameter,
        velocity_m_per_s: velocity,
        reynolds: re,
        friction_factor: lambda,
        unit_loss: unit_friction_loss(lambda, velocity, d_m),
        linear_loss_mca: linear_loss(lambda, input.length_m, d_m, velocity),
        sum_zeta: input.sum_zeta,
        local_loss_mca: local_loss(input.sum_zeta, velocity),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_no_flow_is_inert() {
        let input = SegmentSizingInput::new(0.0, 5.0, PipeMaterial::Ppr, 10.0, 0.0);
        assert_eq!(size_segment(&input), Ok(None));
        let input = SegmentSizingInput::new(-0.1, 5.0, PipeMaterial::Ppr, 10.0, 0.0);
        assert_eq!(size_segment(&input), Ok(None));
    }

    #[test]
    fn test_single_shower_ppr() {
        // 0.2012 L/s through 13.2 mm: v ≈ 1.470 m/s, Re ≈ 14 850
        let input = SegmentSizingInput::new(0.2012, 5.0, PipeMaterial::Ppr, 10.0, 12.0);
        let sizing = size_segment(&input).unwrap().unwrap();

        assert_eq!(sizing.diameter.nominal_mm, 15);
        assert_eq!(sizing.diameter.internal_diameter_mm, 13.2);
        assert!(!sizing.diameter.oversized);
        assert_relative_eq!(sizing.velocity_m_per_s, 1.47025, epsilon = 1e-4);
        assert!(sizing.reynolds > 14_000.0 && sizing.reynolds < 16_000.0);
        assert!(sizing.friction_factor > 0.02 && sizing.friction_factor < 0.035);
    }

    #[test]
    fn test_loss_terms_are_consistent() {
        let input = SegmentSizingInput::new(0.5, 12.0, PipeMaterial::Copper, 55.0, 3.5);
        let s = size_segment(&input).unwrap().unwrap();
        let head = s.velocity_m_per_s.powi(2) / (2.0 * 9.81);
        assert_relative_eq!(s.linear_loss_mca, s.unit_loss * 12.0, epsilon = 1e-12);
        assert_relative_eq!(s.local_loss_mca, 3.5 * head, epsilon = 1e-12);
        assert_relative_eq!(s.total_loss_mca(), s.linear_loss_mca + s.local_loss_mca, epsilon = 1e-12);
        assert!(s.velocity_m_per_s <= PipeMaterial::Copper.max_velocity_m_per_s());
    }

    #[test]
    fn test_oversized_flow_uses_largest_bore() {
        let input = SegmentSizingInput::new(50.0, 5.0, PipeMaterial::PexMultilayer, 10.0, 0.0);
        let s = size_segment(&input).unwrap().unwrap();
        assert!(s.diameter.oversized);
        assert!(s.velocity_m_per_s > 2.0);
    }

    #[test]
    fn test_friction_methods_agree() {
        let base = SegmentSizingInput::new(1.0, 10.0, PipeMaterial::GalvanizedSteel, 10.0, 0.0);
        let haaland = size_segment(&base).unwrap().unwrap();
        let colebrook = size_segment(&base.with_friction_method(FrictionMethod::ColebrookWhite))
            .unwrap()
            .unwrap();
        assert_relative_eq!(haaland.friction_factor, colebrook.friction_factor, max_relative = 0.03);
    }

    #[test]
    fn test_validation() {
        assert!(SegmentSizingInput::new(0.2, 5.0, PipeMaterial::Ppr, 10.0, 0.0).validate().is_ok());
        assert!(SegmentSizingInput::new(0.2, 0.0, PipeMaterial::Ppr, 10.0, 0.0).validate().is_err());
        assert!(SegmentSizingInput::new(f64::NAN, 5.0, PipeMaterial::Ppr, 10.0, 0.0).validate().is_err());
        assert!(SegmentSizingInput::new(0.2, 5.0, PipeMaterial::Ppr, 10.0, -1.0).validate().is_err());
    }

    #[test]
    fn test_sizing_rejects_bad_input() {
        let negative_zeta = SegmentSizingInput::new(0.2, 5.0, PipeMaterial::Ppr, 10.0, -1.0);
        assert_eq!(size_segment(&negative_zeta).unwrap_err().error_code(), "INVALID_INPUT");

        let endless = SegmentSizingInput::new(0.2, f64::INFINITY, PipeMaterial::Ppr, 10.0, 0.0);
        assert!(size_segment(&endless).is_err());

        let no_flow_bad_length = SegmentSizingInput::new(0.0, -2.0, PipeMaterial::Ppr, 10.0, 0.0);
        assert!(size_segment(&no_flow_bad_length).is_err());
    }
}
