//! # Hydraulics
//!
//! Pipe-flow primitives shared by the sizing calculations: water properties,
//! the friction model and the Darcy-Weisbach head-loss terms.
//!
//! All functions take SI base units (m, m/s, m³/s, m²/s) and return heads in
//! meters of water column.

pub mod fluid;
pub mod friction;

pub use fluid::{kinematic_viscosity, WaterKind};
pub use friction::{friction_factor, reynolds, FrictionMethod};

use std::f64::consts::PI;

use crate::units::GRAVITY_M_PER_S2;

/// Cross-section area of a round bore (m²)
pub fn bore_area_m2(internal_diameter_m: f64) -> f64 {
    PI * internal_diameter_m * internal_diameter_m / 4.0
}

/// Mean velocity for a flow through a round bore (m/s)
pub fn mean_velocity(flow_m3_per_s: f64, internal_diameter_m: f64) -> f64 {
    flow_m3_per_s / bore_area_m2(internal_diameter_m)
}

/// Smallest bore that keeps the mean velocity at or below `max_velocity` (m)
///
/// d_min = √(4Q / (π·v_max))
pub fn minimum_bore_m(flow_m3_per_s: f64, max_velocity_m_per_s: f64) -> f64 {
    (4.0 * flow_m3_per_s / (PI * max_velocity_m_per_s)).sqrt()
}

/// Velocity head v²/2g (mCA)
pub fn velocity_head(velocity_m_per_s: f64) -> f64 {
    velocity_m_per_s * velocity_m_per_s / (2.0 * GRAVITY_M_PER_S2)
}

/// Friction loss per meter of pipe, i = λ·v²/(2gD) (m/m)
pub fn unit_friction_loss(
    friction_factor: f64,
    velocity_m_per_s: f64,
    internal_diameter_m: f64,
) -> f64 {
    friction_factor * velocity_head(velocity_m_per_s) / internal_diameter_m
}

/// Darcy-Weisbach linear loss h = λ·(L/D)·v²/2g (mCA)
pub fn linear_loss(
    friction_factor: f64,
    length_m: f64,
    internal_diameter_m: f64,
    velocity_m_per_s: f64,
) -> f64 {
    unit_friction_loss(friction_factor, velocity_m_per_s, internal_diameter_m) * length_m
}

/// Local (fitting) loss h = Σζ·v²/2g (mCA). Zero when there is no flow.
pub fn local_loss(sum_zeta: f64, velocity_m_per_s: f64) -> f64 {
    if velocity_m_per_s <= 0.0 {
        return 0.0;
    }
    sum_zeta * velocity_head(velocity_m_per_s)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_velocity_and_minimum_bore_are_inverse() {
        let q = 0.0003;
        let d = minimum_bore_m(q, 2.0);
        assert_relative_eq!(mean_velocity(q, d), 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_velocity_head() {
        // v = 1.981 m/s → v²/2g = 0.2 m
        assert_relative_eq!(velocity_head(1.981), 0.200018, epsilon = 1e-5);
    }

    #[test]
    fn test_linear_loss() {
        // λ = 0.02, L = 10 m, D = 0.02 m, v = 1 m/s
        // h = 0.02 * 500 * 1/19.62 = 0.50968
        let h = linear_loss(0.02, 10.0, 0.02, 1.0);
        assert_relative_eq!(h, 0.509684, epsilon = 1e-5);
    }

    #[test]
    fn test_local_loss_no_flow() {
        assert_eq!(local_loss(12.0, 0.0), 0.0);
        assert_relative_eq!(local_loss(2.0, 1.0), 2.0 / 19.62, epsilon = 1e-12);
    }
}
