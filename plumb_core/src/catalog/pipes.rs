//! Commercial Pipe Materials
//!
//! Per-material bore tables (nominal size → internal diameter, both mm),
//! absolute roughness and maximum allowed velocity, plus the diameter
//! selection search used by the segment sizer.
//!
//! ## Selection rule
//!
//! The smallest catalog bore whose internal diameter is at least
//! d_min = √(4Q/(π·v_max)) is chosen. When even the largest bore is too small
//! the largest one is returned with `oversized = true`; the calculation carries
//! on and the caller decides how to warn.

use serde::{Deserialize, Serialize};

use super::normalize_key;
use crate::errors::{CalcError, CalcResult};
use crate::hydraulics::minimum_bore_m;
use crate::units::{Meters, Millimeters};

/// (nominal size, internal diameter) in mm, ascending by internal diameter
pub type BoreTable = &'static [(u32, f64)];

const PPR_BORES: BoreTable = &[
    (10, 10.0),
    (15, 13.2),
    (20, 16.6),
    (25, 20.4),
    (32, 26.2),
    (40, 32.6),
    (50, 40.8),
    (63, 51.4),
    (75, 61.2),
    (90, 73.6),
    (110, 90.0),
];

const PPR_GLASS_FIBER_BORES: BoreTable = &[
    (20, 16.6),
    (25, 20.4),
    (32, 26.2),
    (40, 32.6),
    (50, 40.8),
    (63, 51.4),
    (75, 61.2),
    (90, 73.6),
    (110, 90.0),
];

const MULTILAYER_BORES: BoreTable = &[
    (16, 12.0),
    (20, 16.0),
    (25, 20.0),
    (32, 26.0),
    (40, 32.0),
    (50, 40.0),
    (63, 50.0),
];

const COPPER_BORES: BoreTable = &[
    (12, 10.0),
    (15, 13.0),
    (18, 16.0),
    (22, 20.0),
    (28, 26.0),
    (35, 33.0),
    (42, 40.0),
    (54, 52.0),
    (76, 74.0),
    (108, 106.0),
];

const CORRUGATED_STAINLESS_BORES: BoreTable = &[
    (16, 12.0),
    (20, 16.0),
    (25, 20.0),
    (32, 26.0),
    (40, 32.0),
    (50, 40.0),
];

const GALVANIZED_STEEL_BORES: BoreTable = &[
    (15, 12.0),
    (20, 16.0),
    (25, 20.0),
    (32, 26.0),
    (40, 32.0),
    (50, 40.0),
    (65, 52.0),
    (80, 66.0),
    (100, 82.0),
];

/// Standard SDR series for polypropylene pressure pipe
const PPR_SDR_SERIES: [f64; 6] = [6.0, 7.4, 9.0, 11.0, 13.6, 17.0];

/// Pipe material catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum PipeMaterial {
    /// Polypropylene random copolymer
    #[default]
    Ppr,
    /// Glass-fiber reinforced PPR
    PprGlassFiber,
    /// PEX / multilayer composite
    PexMultilayer,
    /// Copper
    Copper,
    /// Corrugated stainless steel
    CorrugatedStainless,
    /// Galvanized steel
    GalvanizedSteel,
}

impl PipeMaterial {
    pub const ALL: [PipeMaterial; 6] = [
        PipeMaterial::Ppr,
        PipeMaterial::PprGlassFiber,
        PipeMaterial::PexMultilayer,
        PipeMaterial::Copper,
        PipeMaterial::CorrugatedStainless,
        PipeMaterial::GalvanizedSteel,
    ];

    /// Stable identifier (matches the JSON representation)
    pub fn code(&self) -> &'static str {
        match self {
            PipeMaterial::Ppr => "ppr",
            PipeMaterial::PprGlassFiber => "ppr_glass_fiber",
            PipeMaterial::PexMultilayer => "pex_multilayer",
            PipeMaterial::Copper => "copper",
            PipeMaterial::CorrugatedStainless => "corrugated_stainless",
            PipeMaterial::GalvanizedSteel => "galvanized_steel",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            PipeMaterial::Ppr => "PPR (polypropylene)",
            PipeMaterial::PprGlassFiber => "PPR glass-fiber reinforced",
            PipeMaterial::PexMultilayer => "PEX / multilayer",
            PipeMaterial::Copper => "Copper",
            PipeMaterial::CorrugatedStainless => "Corrugated stainless steel",
            PipeMaterial::GalvanizedSteel => "Galvanized steel",
        }
    }

    /// Name used on Romanian drawings and bills of quantities
    pub fn local_name(&self) -> &'static str {
        match self {
            PipeMaterial::Ppr => "PPR (Polipropilen)",
            PipeMaterial::PprGlassFiber => "PPR cu fibră de sticlă",
            PipeMaterial::PexMultilayer => "PEX/Multistrat",
            PipeMaterial::Copper => "Cupru",
            PipeMaterial::CorrugatedStainless => "Inox ondulat",
            PipeMaterial::GalvanizedSteel => "Oțel zincat",
        }
    }

    /// Parse from an identifier, a display name or a common short form
    pub fn from_str_flexible(s: &str) -> CalcResult<Self> {
        let key = normalize_key(s);
        let short = match key.as_str() {
            "ppr" | "pp" => Some(PipeMaterial::Ppr),
            "pprgf" | "pprfiber" => Some(PipeMaterial::PprGlassFiber),
            "pex" | "multilayer" | "multistrat" => Some(PipeMaterial::PexMultilayer),
            "cu" => Some(PipeMaterial::Copper),
            "inox" | "stainless" => Some(PipeMaterial::CorrugatedStainless),
            "steel" | "otel" | "galvanized" => Some(PipeMaterial::GalvanizedSteel),
            _ => None,
        };
        short
            .or_else(|| {
                PipeMaterial::ALL.iter().copied().find(|m| {
                    normalize_key(m.code()) == key
                        || normalize_key(m.display_name()) == key
                        || normalize_key(m.local_name()) == key
                })
            })
            .ok_or_else(|| CalcError::material_not_found(s))
    }

    /// Absolute roughness (mm)
    pub fn roughness_mm(&self) -> f64 {
        match self {
            PipeMaterial::Ppr => 0.0015,
            PipeMaterial::PprGlassFiber => 0.001,
            PipeMaterial::PexMultilayer => 0.0015,
            PipeMaterial::Copper => 0.0015,
            PipeMaterial::CorrugatedStainless => 0.002,
            PipeMaterial::GalvanizedSteel => 0.15,
        }
    }

    /// Maximum allowed velocity for this material (m/s)
    pub fn max_velocity_m_per_s(&self) -> f64 {
        match self {
            PipeMaterial::Copper => 2.5,
            _ => 2.0,
        }
    }

    /// Bore table, ascending by internal diameter
    pub fn bores(&self) -> BoreTable {
        match self {
            PipeMaterial::Ppr => PPR_BORES,
            PipeMaterial::PprGlassFiber => PPR_GLASS_FIBER_BORES,
            PipeMaterial::PexMultilayer => MULTILAYER_BORES,
            PipeMaterial::Copper => COPPER_BORES,
            PipeMaterial::CorrugatedStainless => CORRUGATED_STAINLESS_BORES,
            PipeMaterial::GalvanizedSteel => GALVANIZED_STEEL_BORES,
        }
    }

    /// Internal diameter for a nominal size, if the material offers it
    pub fn internal_diameter_mm(&self, nominal: u32) -> Option<f64> {
        self.bores()
            .iter()
            .find(|(dn, _)| *dn == nominal)
            .map(|(_, di)| *di)
    }

    /// Short description of where the material fits
    pub fn notes(&self) -> &'static str {
        match self {
            PipeMaterial::Ppr => "Most common; rated up to 95 °C",
            PipeMaterial::PprGlassFiber => "Fiber layer cuts thermal expansion by about 75%",
            PipeMaterial::PexMultilayer => "Flexible; press or compression fittings",
            PipeMaterial::Copper => "Antibacterial, long service life",
            PipeMaterial::CorrugatedStainless => "Flexible, corrosion resistant",
            PipeMaterial::GalvanizedSteel => "Found in older buildings; corrodes",
        }
    }

    /// Manufacturer-style designation for a nominal size.
    ///
    /// Purely cosmetic. Unknown sizes fall back to `DN<nominal>`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use plumb_core::catalog::PipeMaterial;
    ///
    /// assert_eq!(PipeMaterial::Ppr.display_notation(20), "PPR Ø20×1.7 SDR 11");
    /// assert_eq!(PipeMaterial::GalvanizedSteel.display_notation(25), "DN25 (1\")");
    /// ```
    pub fn display_notation(&self, nominal: u32) -> String {
        let Some(internal) = self.internal_diameter_mm(nominal) else {
            return format!("DN{}", nominal);
        };
        let wall = (nominal as f64 - internal) / 2.0;
        match self {
            PipeMaterial::Ppr | PipeMaterial::PprGlassFiber => {
                let prefix = if *self == PipeMaterial::Ppr { "PPR" } else { "PPR-GF" };
                if wall <= 0.0 {
                    format!("{} Ø{}", prefix, nominal)
                } else {
                    let sdr = nearest_sdr(nominal as f64 / wall);
                    format!("{} Ø{}×{:.1} SDR {}", prefix, nominal, wall, sdr)
                }
            }
            PipeMaterial::PexMultilayer => format!("Ø{}×{:.1}", nominal, wall),
            PipeMaterial::Copper => format!("Cu Ø{}×{:.1}", nominal, wall),
            PipeMaterial::CorrugatedStainless => format!("INOX DN{}", internal.round() as u32),
            PipeMaterial::GalvanizedSteel => match thread_size(nominal) {
                Some(thread) => format!("DN{} ({}\")", nominal, thread),
                None => format!("DN{}", nominal),
            },
        }
    }
}

impl std::fmt::Display for PipeMaterial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

fn nearest_sdr(ratio: f64) -> String {
    let sdr = PPR_SDR_SERIES
        .iter()
        .copied()
        .min_by(|a, b| (a - ratio).abs().total_cmp(&(b - ratio).abs()))
        .unwrap_or(11.0);
    if sdr.fract() == 0.0 {
        format!("{}", sdr as u32)
    } else {
        format!("{}", sdr)
    }
}

/// Gas-thread size for galvanized steel nominal diameters
fn thread_size(nominal: u32) -> Option<&'static str> {
    match nominal {
        15 => Some("1/2"),
        20 => Some("3/4"),
        25 => Some("1"),
        32 => Some("1 1/4"),
        40 => Some("1 1/2"),
        50 => Some("2"),
        65 => Some("2 1/2"),
        80 => Some("3"),
        100 => Some("4"),
        _ => None,
    }
}

/// Outcome of a diameter search.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DiameterSelection {
    /// Nominal size designator (mm)
    pub nominal_mm: u32,
    /// Internal diameter of the chosen size (mm)
    pub internal_diameter_mm: f64,
    /// Theoretical minimum internal diameter for the flow and velocity limit (mm)
    pub required_diameter_mm: f64,
    /// True when no catalog size reaches the required diameter
    pub oversized: bool,
}

impl DiameterSelection {
    /// Chosen internal diameter in meters
    pub fn internal_diameter_m(&self) -> f64 {
        Meters::from(Millimeters(self.internal_diameter_mm)).0
    }
}

/// Pick the smallest bore of `material` that keeps velocity ≤ `max_velocity`.
///
/// `flow_m3_per_s` is the design flow in m³/s. Never fails: an unreachable
/// requirement returns the largest bore flagged as oversized.
///
/// # Example
///
/// ```rust
/// use plumb_core::catalog::{select_diameter, PipeMaterial};
///
/// // 0.2 L/s in PPR at 2 m/s needs at least 11.3 mm → Ø15 (13.2 mm bore)
/// let pick = select_diameter(PipeMaterial::Ppr, 0.0002, 2.0);
/// assert_eq!(pick.nominal_mm, 15);
/// assert!(!pick.oversized);
/// ```
pub fn select_diameter(
    material: PipeMaterial,
    flow_m3_per_s: f64,
    max_velocity_m_per_s: f64,
) -> DiameterSelection {
    let required_m = minimum_bore_m(flow_m3_per_s, max_velocity_m_per_s);
    let required_mm = Millimeters::from(Meters(required_m)).0;
    let bores = material.bores();

    let hit = bores.iter().find(|(_, internal)| *internal >= required_mm);
    match (hit, bores.last()) {
        (Some(&(nominal, internal)), _) => DiameterSelection {
            nominal_mm: nominal,
            internal_diameter_mm: internal,
            required_diameter_mm: required_mm,
            oversized: false,
        },
        (None, Some(&(nominal, internal))) => DiameterSelection {
            nominal_mm: nominal,
            internal_diameter_mm: internal,
            required_diameter_mm: required_mm,
            oversized: true,
        },
        // Every material has a non-empty table; keep the search total anyway
        (None, None) => DiameterSelection {
            nominal_mm: 0,
            internal_diameter_mm: 0.0,
            required_diameter_mm: required_mm,
            oversized: true,
        },
    }
}
