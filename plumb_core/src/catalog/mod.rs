//! # Catalogs
//!
//! Static, immutable reference data for sanitary supply design per I9-2022:
//!
//! - [`fixtures`] - Sanitary fixtures (unit flow, load units, minimum pressure, implied fittings)
//! - [`pipes`] - Commercial pipe materials with bore tables and velocity limits
//! - [`buildings`] - Building classes and their demand-formula coefficients
//! - [`fittings`] - Local-loss coefficients (ζ) for fittings and building-wide equipment
//!
//! Every entry is an enum variant with a stable snake_case identifier used in
//! JSON. Display names live in a separate lookup so labels can change without
//! touching saved projects.
//!
//! ## Example
//!
//! ```rust
//! use plumb_core::catalog::{FixtureType, PipeMaterial};
//!
//! let shower = FixtureType::from_str_flexible("Duș").unwrap();
//! assert_eq!(shower, FixtureType::Shower);
//! assert_eq!(shower.unit_flow_l_per_s(), 0.20);
//!
//! let ppr = PipeMaterial::from_str_flexible("PPR").unwrap();
//! assert_eq!(ppr.max_velocity_m_per_s(), 2.0);
//! ```

pub mod buildings;
pub mod fittings;
pub mod fixtures;
pub mod pipes;

pub use buildings::{BuildingClass, DemandMethod};
pub use fittings::{AutoFitting, BuildingLoss, Fitting};
pub use fixtures::{FixtureCategory, FixtureType, FIXTURES_BY_CATEGORY};
pub use pipes::{select_diameter, DiameterSelection, PipeMaterial};

use crate::errors::{CalcError, CalcResult};

// JSON keys and values use the same lenient lookup as typed input
macro_rules! impl_flexible_try_from {
    ($($type:ty),* $(,)?) => {
        $(
            impl TryFrom<String> for $type {
                type Error = CalcError;

                fn try_from(s: String) -> CalcResult<Self> {
                    <$type>::from_str_flexible(&s)
                }
            }
        )*
    };
}

impl_flexible_try_from!(FixtureType, PipeMaterial, BuildingClass, Fitting);

/// Normalize a user-supplied catalog key for lenient matching.
///
/// Lowercases and drops everything that is not alphanumeric, so
/// `"Wc Cistern"`, `"wc-cistern"` and `"wc_cistern"` all compare equal.
/// Comparison signs survive since they tell size classes apart.
pub(crate) fn normalize_key(s: &str) -> String {
    s.chars()
        .filter(|c| c.is_alphanumeric() || *c == '<' || *c == '>')
        .flat_map(char::to_lowercase)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_key() {
        assert_eq!(normalize_key("Wc Cistern"), "wccistern");
        assert_eq!(normalize_key("wc_cistern"), "wccistern");
        assert_eq!(normalize_key("PEX/Multistrat"), "pexmultistrat");
        assert_eq!(normalize_key("Duș"), "duș");
        assert_ne!(normalize_key("Cadă < 150L"), normalize_key("Cadă > 150L"));
    }
}
