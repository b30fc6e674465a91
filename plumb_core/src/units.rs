//! # Unit Types
//!
//! Lightweight f64 newtypes for the handful of units the sizing engine moves
//! between. Catalog data is tabulated in millimeters and liters per second,
//! while the hydraulics run in SI base units, so the conversions live here.
//!
//! ## Units in use
//!
//! - Flow: liters per second (L/s) for demand, cubic meters per second for hydraulics
//! - Length: millimeters (pipe bores), meters (segment lengths, SI hydraulics)
//! - Pressure head: meters of water column (mCA), with kPa and bar for display
//!
//! ## Example
//!
//! ```rust
//! use plumb_core::units::{CubicMetersPerSecond, LitersPerSecond, Meters, Millimeters};
//!
//! let q: CubicMetersPerSecond = LitersPerSecond(0.5).into();
//! assert!((q.0 - 0.0005).abs() < 1e-12);
//!
//! let bore: Meters = Millimeters(16.6).into();
//! assert!((bore.0 - 0.0166).abs() < 1e-12);
//! ```

use serde::{Deserialize, Serialize};
use std::ops::{Add, Div, Mul, Sub};

/// Standard gravity used by every head-loss formula (m/s²)
pub const GRAVITY_M_PER_S2: f64 = 9.81;

/// Kilopascals per meter of water column
pub const KPA_PER_MCA: f64 = 9.81;

// ============================================================================
// Flow Units
// ============================================================================

/// Volumetric flow in liters per second
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LitersPerSecond(pub f64);

/// Volumetric flow in cubic meters per second
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CubicMetersPerSecond(pub f64);

impl From<LitersPerSecond> for CubicMetersPerSecond {
    fn from(q: LitersPerSecond) -> Self {
        CubicMetersPerSecond(q.0 / 1000.0)
    }
}

impl From<CubicMetersPerSecond> for LitersPerSecond {
    fn from(q: CubicMetersPerSecond) -> Self {
        LitersPerSecond(q.0 * 1000.0)
    }
}

// ============================================================================
// Length Units
// ============================================================================

/// Length in millimeters
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Millimeters(pub f64);

/// Length in meters
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Meters(pub f64);

impl From<Millimeters> for Meters {
    fn from(mm: Millimeters) -> Self {
        Meters(mm.0 / 1000.0)
    }
}

impl From<Meters> for Millimeters {
    fn from(m: Meters) -> Self {
        Millimeters(m.0 * 1000.0)
    }
}

// ============================================================================
// Pressure Units
// ============================================================================

/// Pressure head in meters of water column (mCA)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MetersWaterColumn(pub f64);

/// Pressure in kilopascals
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KiloPascals(pub f64);

/// Pressure in bar
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Bar(pub f64);

impl From<MetersWaterColumn> for KiloPascals {
    fn from(h: MetersWaterColumn) -> Self {
        KiloPascals(h.0 * KPA_PER_MCA)
    }
}

impl From<KiloPascals> for MetersWaterColumn {
    fn from(p: KiloPascals) -> Self {
        MetersWaterColumn(p.0 / KPA_PER_MCA)
    }
}

impl From<KiloPascals> for Bar {
    fn from(p: KiloPascals) -> Self {
        Bar(p.0 / 100.0)
    }
}

impl From<MetersWaterColumn> for Bar {
    fn from(h: MetersWaterColumn) -> Self {
        KiloPascals::from(h).into()
    }
}

// ============================================================================
// Arithmetic Implementations
// ============================================================================

macro_rules! impl_arithmetic {
    ($type:ty) => {
        impl Add for $type {
            type Output = Self;
            fn add(self, rhs: Self) -> Self::Output {
                Self(self.0 + rhs.0)
            }
        }

        impl Sub for $type {
            type Output = Self;
            fn sub(self, rhs: Self) -> Self::Output {
                Self(self.0 - rhs.0)
            }
        }

        impl Mul<f64> for $type {
            type Output = Self;
            fn mul(self, rhs: f64) -> Self::Output {
                Self(self.0 * rhs)
            }
        }

        impl Div<f64> for $type {
            type Output = Self;
            fn div(self, rhs: f64) -> Self::Output {
                Self(self.0 / rhs)
            }
        }

        impl $type {
            /// Get the raw f64 value
            pub fn value(self) -> f64 {
                self.0
            }
        }
    };
}

impl_arithmetic!(LitersPerSecond);
impl_arithmetic!(CubicMetersPerSecond);
impl_arithmetic!(Millimeters);
impl_arithmetic!(Meters);
impl_arithmetic!(MetersWaterColumn);
impl_arithmetic!(KiloPascals);
impl_arithmetic!(Bar);

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_flow_conversion() {
        let q: CubicMetersPerSecond = LitersPerSecond(0.2012).into();
        assert_relative_eq!(q.0, 0.0002012, epsilon = 1e-15);
        let back: LitersPerSecond = q.into();
        assert_relative_eq!(back.0, 0.2012, epsilon = 1e-12);
    }

    #[test]
    fn test_bore_conversion() {
        let m: Meters = Millimeters(20.4).into();
        assert_relative_eq!(m.0, 0.0204, epsilon = 1e-15);
    }

    #[test]
    fn test_head_to_pressure() {
        let p: KiloPascals = MetersWaterColumn(10.0).into();
        assert_relative_eq!(p.0, 98.1, epsilon = 1e-9);
        let bar: Bar = MetersWaterColumn(30.0).into();
        assert_relative_eq!(bar.0, 2.943, epsilon = 1e-9);
    }

    #[test]
    fn test_arithmetic() {
        let a = MetersWaterColumn(12.0);
        let b = MetersWaterColumn(2.5);
        assert_eq!((a + b).0, 14.5);
        assert_eq!((a - b).0, 9.5);
        assert_eq!((a * 2.0).0, 24.0);
        assert_eq!((a / 2.0).value(), 6.0);
    }

    #[test]
    fn test_serialization() {
        let q = LitersPerSecond(0.25);
        let json = serde_json::to_string(&q).unwrap();
        assert_eq!(json, "0.25");
    }
}
