//! Water properties for the sizing engine.
//!
//! Kinematic viscosity is a step function of temperature over tabulated
//! bands. Values between band edges are NOT interpolated: a 15 °C supply uses
//! the 20 °C value.

use serde::{Deserialize, Serialize};

/// Temperature band upper edges (°C) and kinematic viscosity (m²/s).
///
/// The last entry covers everything above 60 °C.
const VISCOSITY_BANDS: [(f64, f64); 6] = [
    (10.0, 1.307e-6),
    (20.0, 1.004e-6),
    (30.0, 0.801e-6),
    (40.0, 0.658e-6),
    (50.0, 0.553e-6),
    (60.0, 0.475e-6),
];

const VISCOSITY_ABOVE_60C: f64 = 0.413e-6;

/// Kinematic viscosity of water (m²/s) for a temperature in °C.
///
/// # Example
///
/// ```rust
/// use plumb_core::hydraulics::kinematic_viscosity;
///
/// assert_eq!(kinematic_viscosity(10.0), 1.307e-6);
/// assert_eq!(kinematic_viscosity(55.0), 0.475e-6);
/// ```
pub fn kinematic_viscosity(temperature_c: f64) -> f64 {
    VISCOSITY_BANDS
        .iter()
        .find(|(upper_c, _)| temperature_c <= *upper_c)
        .map(|(_, nu)| *nu)
        .unwrap_or(VISCOSITY_ABOVE_60C)
}

/// Which supply the chain carries.
///
/// Selects the default design temperature and, for Method C building
/// classes, which square-root coefficient applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WaterKind {
    /// Cold water supply
    #[default]
    Cold,
    /// Domestic hot water supply
    Hot,
}

impl WaterKind {
    pub const ALL: [WaterKind; 2] = [WaterKind::Cold, WaterKind::Hot];

    /// Default design temperature in °C
    pub fn default_temperature_c(&self) -> f64 {
        match self {
            WaterKind::Cold => 10.0,
            WaterKind::Hot => 55.0,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            WaterKind::Cold => "Cold water",
            WaterKind::Hot => "Hot water",
        }
    }
}

impl std::fmt::Display for WaterKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}
