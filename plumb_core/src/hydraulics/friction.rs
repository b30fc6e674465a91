//! Reynolds number and Darcy friction factor.
//!
//! ## Regimes
//!
//! - Re < 2300: laminar, λ = 64/Re
//! - Re ≥ 2300: turbulent, Colebrook-White solved either explicitly with the
//!   Haaland approximation or by fixed-point iteration
//!
//! Turbulent results are clamped to [0.008, 0.1]. Anything outside that band
//! only appears for numerically degenerate inputs. Non-finite intermediates
//! fall back to λ = 0.02.

use serde::{Deserialize, Serialize};

/// Laminar/turbulent transition Reynolds number
pub const RE_LAMINAR_LIMIT: f64 = 2300.0;

/// Friction factor used for no-flow and faulted computations
pub const FALLBACK_FRICTION_FACTOR: f64 = 0.02;

/// Lower clamp for turbulent friction factors
pub const MIN_FRICTION_FACTOR: f64 = 0.008;

/// Upper clamp for turbulent friction factors
pub const MAX_FRICTION_FACTOR: f64 = 0.1;

const COLEBROOK_MAX_ITERATIONS: usize = 100;
const COLEBROOK_TOLERANCE: f64 = 1e-6;

/// Solver used for the turbulent branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrictionMethod {
    /// Haaland explicit approximation (default)
    #[default]
    Haaland,
    /// Colebrook-White fixed-point iteration from λ₀ = 0.02
    ColebrookWhite,
}

impl FrictionMethod {
    pub fn display_name(&self) -> &'static str {
        match self {
            FrictionMethod::Haaland => "Haaland",
            FrictionMethod::ColebrookWhite => "Colebrook-White (iterative)",
        }
    }

    /// Friction factor with this solver for the turbulent branch.
    pub fn friction_factor(&self, reynolds: f64, relative_roughness: f64) -> f64 {
        if reynolds < RE_LAMINAR_LIMIT {
            return laminar(reynolds);
        }
        let lambda = match self {
            FrictionMethod::Haaland => haaland(reynolds, relative_roughness),
            FrictionMethod::ColebrookWhite => colebrook_white(reynolds, relative_roughness),
        };
        if lambda.is_finite() {
            lambda.clamp(MIN_FRICTION_FACTOR, MAX_FRICTION_FACTOR)
        } else {
            FALLBACK_FRICTION_FACTOR
        }
    }
}

/// Reynolds number Re = v·D/ν.
///
/// Returns 0 for zero viscosity, which marks an uninitialized input rather
/// than an error.
pub fn reynolds(velocity_m_per_s: f64, diameter_m: f64, viscosity_m2_per_s: f64) -> f64 {
    if viscosity_m2_per_s == 0.0 {
        return 0.0;
    }
    velocity_m_per_s * diameter_m / viscosity_m2_per_s
}

/// Darcy friction factor using the Haaland approximation.
///
/// # Example
///
/// ```rust
/// use plumb_core::hydraulics::friction_factor;
///
/// // Laminar branch is exact
/// assert_eq!(friction_factor(1000.0, 1e-4), 0.064);
///
/// // Turbulent smooth pipe lands in the usual range
/// let lambda = friction_factor(50_000.0, 1e-4);
/// assert!(lambda > 0.015 && lambda < 0.03);
/// ```
pub fn friction_factor(reynolds: f64, relative_roughness: f64) -> f64 {
    FrictionMethod::Haaland.friction_factor(reynolds, relative_roughness)
}

fn laminar(reynolds: f64) -> f64 {
    if reynolds > 0.0 {
        64.0 / reynolds
    } else {
        FALLBACK_FRICTION_FACTOR
    }
}

fn haaland(reynolds: f64, relative_roughness: f64) -> f64 {
    let roughness_term = (relative_roughness / 3.71).powf(1.11);
    let reynolds_term = 6.9 / reynolds;
    let argument = roughness_term + reynolds_term;
    if argument.is_nan() || argument <= 0.0 {
        return f64::NAN;
    }
    (-1.8 * argument.log10()).powi(-2)
}

fn colebrook_white(reynolds: f64, relative_roughness: f64) -> f64 {
    let mut f_old = FALLBACK_FRICTION_FACTOR;
    for _ in 0..COLEBROOK_MAX_ITERATIONS {
        let argument = relative_roughness / 3.7 + 2.51 / (reynolds * f_old.sqrt());
        if argument.is_nan() || argument <= 0.0 {
            return f64::NAN;
        }
        let f_new = (1.0 / (-2.0 * argument.log10())).powi(2);
        if !f_new.is_finite() {
            return f64::NAN;
        }
        if (f_new - f_old).abs() < COLEBROOK_TOLERANCE {
            return f_new;
        }
        f_old = f_new;
    }
    // Not converged: keep the last iterate
    f_old
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    #[test]
    fn test_reynolds() {
        // 1 m/s in a 20 mm bore at 10 °C
        let re = reynolds(1.0, 0.02, 1.307e-6);
        assert_relative_eq!(re, 15302.2188, epsilon = 1e-3);
    }

    #[test]
    fn test_reynolds_zero_viscosity() {
        assert_eq!(reynolds(1.0, 0.02, 0.0), 0.0);
    }

    #[test]
    fn test_laminar_exact() {
        assert_eq!(friction_factor(1000.0, 1e-4), 0.064);
        assert_eq!(friction_factor(2000.0, 0.5), 0.032);
    }

    #[test]
    fn test_no_flow_fallback() {
        assert_eq!(friction_factor(0.0, 1e-4), FALLBACK_FRICTION_FACTOR);
        assert_eq!(friction_factor(-10.0, 1e-4), FALLBACK_FRICTION_FACTOR);
    }

    #[test]
    fn test_turbulent_clamped() {
        // Absurdly rough pipe would exceed the upper bound
        assert_eq!(friction_factor(1e4, 5.0), MAX_FRICTION_FACTOR);
        // Extreme Reynolds on a perfectly smooth pipe would fall below the lower bound
        assert_eq!(friction_factor(1e12, 0.0), MIN_FRICTION_FACTOR);
    }

    #[test]
    fn test_transition_sanity_bound() {
        // Typical plastic pipe relative roughness
        let rr = 0.0015 / 16.6;
        let below = friction_factor(RE_LAMINAR_LIMIT - 1e-6, rr);
        let above = friction_factor(RE_LAMINAR_LIMIT, rr);
        assert!((above - below).abs() < 0.025, "jump {} -> {}", below, above);
        // Galvanized steel
        let rr_steel = 0.15 / 20.0;
        let above_steel = friction_factor(RE_LAMINAR_LIMIT, rr_steel);
        assert!((above_steel - below).abs() < 0.03);
    }

    #[test]
    fn test_haaland_matches_moody_value() {
        // Re = 1e5, ε/D = 1e-4: Moody chart gives λ ≈ 0.0185
        let lambda = friction_factor(1e5, 1e-4);
        assert_abs_diff_eq!(lambda, 0.0185, epsilon = 0.0008);
    }

    #[test]
    fn test_colebrook_compatible_with_haaland() {
        for &(re, rr) in &[(5e3, 1e-5), (2e4, 1e-4), (1e5, 1e-4), (5e5, 7.5e-3)] {
            let h = FrictionMethod::Haaland.friction_factor(re, rr);
            let c = FrictionMethod::ColebrookWhite.friction_factor(re, rr);
            assert_relative_eq!(h, c, max_relative = 0.03);
        }
    }

    #[test]
    fn test_colebrook_laminar_branch_shared() {
        assert_eq!(FrictionMethod::ColebrookWhite.friction_factor(1000.0, 1e-4), 0.064);
    }

    #[test]
    fn test_method_serialization() {
        let json = serde_json::to_string(&FrictionMethod::ColebrookWhite).unwrap();
        assert_eq!(json, "\"ColebrookWhite\"");
    }
}
