//! # Chain Computation
//!
//! Walks the segment chain from the most remote fixture toward the source.
//! Each segment is sized for the design flow of every fixture connected at or
//! beyond it, so a single running fixture accumulator is enough.
//!
//! ## Local-loss policies
//!
//! Which fittings load a segment is configurable with [`LocalLossPolicy`]:
//!
//! | policy | terminal segment | other segments |
//! |---|---|---|
//! | `TerminalOnly` | implied ζ of its new fixtures + all its fittings | tees only |
//! | `AllFittings` | implied ζ of all served fixtures + fittings + auto tee/valve | same |
//! | `LinearFraction` | 40 % of the friction loss | 5 % of the friction loss |
//!
//! Building-wide equipment (water meter, filter, ...) is charged on the first
//! segment for the ζ-based policies.
//!
//! ## Example
//!
//! ```rust
//! use plumb_core::calculations::chain::compute_chain;
//! use plumb_core::catalog::FixtureType;
//! use plumb_core::project::DesignSettings;
//! use plumb_core::segments::Segment;
//!
//! let segments = vec![
//!     Segment::new(5.0).with_fixture(FixtureType::Shower, 1).terminal(),
//!     Segment::new(3.0).with_fixture(FixtureType::Washbasin, 1),
//! ];
//! let result = compute_chain(&segments, &DesignSettings::default()).unwrap();
//!
//! assert_eq!(result.rows.len(), 2);
//! assert!(result.rows[1].design_flow_l_per_s > result.rows[0].design_flow_l_per_s);
//! ```

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::pressure::{evaluate, PressureBalance};
use super::segment::{size_segment, SegmentSizingInput};
use crate::catalog::{AutoFitting, FixtureType};
use crate::demand::{design_flow, FlowTrace};
use crate::errors::{CalcError, CalcResult};
use crate::project::DesignSettings;
use crate::segments::{CumulativeFixtures, FixtureCounts, Segment};

/// Highest acceptable Σh_loc / Σh_lin
pub const MAX_LOCAL_TO_LINEAR_RATIO: f64 = 0.5;

/// Rule deciding which local losses a segment carries
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum LocalLossPolicy {
    /// Full fitting set on terminal segments, tees elsewhere
    #[default]
    TerminalOnly,
    /// Every segment carries the implied ζ of all fixtures it serves
    AllFittings,
    /// Local loss as a fraction of the segment friction loss
    LinearFraction { terminal: f64, non_terminal: f64 },
}

impl LocalLossPolicy {
    /// Fraction policy with the 40 % / 5 % split
    pub const DEFAULT_FRACTIONS: LocalLossPolicy = LocalLossPolicy::LinearFraction {
        terminal: 0.40,
        non_terminal: 0.05,
    };

    pub fn display_name(&self) -> &'static str {
        match self {
            LocalLossPolicy::TerminalOnly => "Terminal segment only",
            LocalLossPolicy::AllFittings => "All fittings on every segment",
            LocalLossPolicy::LinearFraction { .. } => "Fraction of linear loss",
        }
    }
}

/// Which segments the safety factor applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SafetyMarginScope {
    #[default]
    EverySegment,
    /// Only the segment at the source, which also sets the pump flow
    SourceSegmentOnly,
}

/// Where elevation changes are accounted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElevationScope {
    /// Σ Δh enters only the pressure balance
    #[default]
    PressureBalanceOnly,
    /// Each row's totals also include its Δh
    PerSegment,
}

/// Non-fatal finding raised during a chain computation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SizingWarning {
    /// The segment serves no fixtures and was skipped
    NoFlow { segment_no: usize },
    /// No catalog size reaches the required bore
    OversizedRequest {
        segment_no: usize,
        required_diameter_mm: f64,
        largest_internal_mm: f64,
    },
    /// Velocity above the building class limit
    VelocityAboveLimit {
        segment_no: usize,
        velocity_m_per_s: f64,
        limit_m_per_s: f64,
    },
    /// Chosen bore smaller than a newly connected fixture needs
    ConnectionBelowMinimum {
        segment_no: usize,
        internal_diameter_mm: f64,
        required_mm: f64,
    },
    /// Σh_loc / Σh_lin above 0.5
    LocalLossRatioHigh { ratio: f64, limit: f64 },
}

impl SizingWarning {
    pub fn message(&self) -> String {
        match self {
            SizingWarning::NoFlow { segment_no } => {
                format!("Segment {}: no fixtures served, segment skipped", segment_no)
            }
            SizingWarning::OversizedRequest {
                segment_no,
                required_diameter_mm,
                largest_internal_mm,
            } => format!(
                "Segment {}: needs Ø{:.1} mm, largest available bore is {:.1} mm",
                segment_no, required_diameter_mm, largest_internal_mm
            ),
            SizingWarning::VelocityAboveLimit {
                segment_no,
                velocity_m_per_s,
                limit_m_per_s,
            } => format!(
                "Segment {}: v = {:.2} m/s > {} m/s",
                segment_no, velocity_m_per_s, limit_m_per_s
            ),
            SizingWarning::ConnectionBelowMinimum {
                segment_no,
                internal_diameter_mm,
                required_mm,
            } => format!(
                "Segment {}: bore {:.1} mm below fixture connection {:.0} mm",
                segment_no, internal_diameter_mm, required_mm
            ),
            SizingWarning::LocalLossRatioHigh { ratio, limit } => {
                format!("h_loc/h_lin = {:.2} > {}", ratio, limit)
            }
        }
    }
}

impl std::fmt::Display for SizingWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

/// One result row per sized segment. Heads in mCA.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentRow {
    /// 1-based position in the chain
    pub segment_no: usize,
    pub segment_id: Uuid,
    pub is_terminal: bool,

    pub cumulative_fixture_count: u32,
    pub design_flow_l_per_s: f64,
    pub flow_trace: FlowTrace,

    pub nominal_size_mm: u32,
    /// Manufacturer designation of the chosen size
    pub notation: String,
    pub internal_diameter_mm: f64,
    pub oversized: bool,

    pub velocity_m_per_s: f64,
    pub reynolds: f64,
    pub friction_factor: f64,

    pub length_m: f64,
    /// i (m/m)
    pub unit_loss: f64,
    pub linear_loss: f64,
    pub sum_zeta: f64,
    pub local_loss: f64,
    pub elevation_delta_m: f64,
    pub segment_total_loss: f64,

    pub cumulative_linear_loss: f64,
    pub cumulative_local_loss: f64,
    pub cumulative_total_loss: f64,
}

/// Chain totals and the pressure verdict
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainSummary {
    pub total_linear_loss: f64,
    pub total_local_loss: f64,
    /// Σ Δh of sized segments (m)
    pub total_elevation_m: f64,
    /// Σ linear + Σ local
    pub total_loss: f64,
    /// Σh_loc / Σh_lin, when there is friction loss
    pub local_to_linear_ratio: Option<f64>,
    pub pressure: PressureBalance,
}

impl ChainSummary {
    pub fn required_pressure(&self) -> f64 {
        self.pressure.required_head_mca
    }

    pub fn pump_required(&self) -> bool {
        self.pressure.pump_required
    }

    pub fn pump_head_deficit(&self) -> f64 {
        self.pressure.pump_head_deficit_mca
    }
}

/// Full output of [`compute_chain`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainResult {
    pub rows: Vec<SegmentRow>,
    pub summary: ChainSummary,
    pub warnings: Vec<SizingWarning>,
}

impl ChainResult {
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Pressure the governing fixture needs (mCA).
///
/// The highest `p_min` among the fixtures served by the first terminal
/// segment, or by the first segment when none is flagged.
pub fn governing_fixture_pressure(segments: &[Segment]) -> f64 {
    let index = segments.iter().position(|s| s.is_terminal).unwrap_or(0);
    CumulativeFixtures::new(segments)
        .nth(index)
        .unwrap_or_default()
        .keys()
        .map(FixtureType::min_pressure_mca)
        .fold(0.0, f64::max)
}

fn implied_zeta(fixtures: &FixtureCounts) -> f64 {
    fixtures
        .iter()
        .map(|(fixture, &count)| fixture.implied_zeta() * f64::from(count))
        .sum()
}

/// Σζ charged to the segment at `index` under a ζ-based policy
fn segment_zeta(
    policy: LocalLossPolicy,
    index: usize,
    segment: &Segment,
    cumulative: &FixtureCounts,
    building_zeta: f64,
) -> f64 {
    let entry = if index == 0 { building_zeta } else { 0.0 };
    match policy {
        LocalLossPolicy::TerminalOnly if segment.is_terminal => {
            implied_zeta(&segment.fixtures) + segment.fittings_zeta() + entry
        }
        LocalLossPolicy::TerminalOnly => segment.derivation_zeta() + entry,
        LocalLossPolicy::AllFittings => {
            let through_tee = if index > 0 { AutoFitting::ThroughTee.zeta() } else { 0.0 };
            implied_zeta(cumulative)
                + through_tee
                + AutoFitting::BranchShutoffValve.zeta()
                + segment.fittings_zeta()
                + entry
        }
        LocalLossPolicy::LinearFraction { .. } => 0.0,
    }
}

/// Size every segment of the chain and check the source pressure.
///
/// Segments and settings are validated first; any invalid value aborts the
/// computation before a single segment is sized. Segments serving no
/// fixtures produce no row and a [`SizingWarning::NoFlow`].
pub fn compute_chain(segments: &[Segment], settings: &DesignSettings) -> CalcResult<ChainResult> {
    settings.validate()?;
    if segments.is_empty() {
        return Err(CalcError::invalid_input("segments", "[]", "The chain has no segments"));
    }
    for segment in segments {
        segment.validate()?;
    }

    let formula = settings.demand_formula();
    let temperature_c = settings.temperature_c();
    let building_zeta = settings.building_losses.total_zeta();
    let velocity_limit = settings.building_class.normative_velocity_limit();
    let last_index = segments.len() - 1;

    let mut rows = Vec::with_capacity(segments.len());
    let mut warnings = Vec::new();
    let mut sum_linear = 0.0;
    let mut sum_local = 0.0;
    let mut sum_elevation = 0.0;

    let walk = segments.iter().zip(CumulativeFixtures::new(segments)).enumerate();
    for (index, (segment, cumulative)) in walk {
        let segment_no = index + 1;
        let apply_safety = settings.apply_safety_margin
            && match settings.safety_scope {
                SafetyMarginScope::EverySegment => true,
                SafetyMarginScope::SourceSegmentOnly => index == last_index,
            };
        let (flow, trace) = design_flow(&cumulative, &formula, settings.water_kind, apply_safety);

        let policy = settings.local_loss_policy;
        let sum_zeta = segment_zeta(policy, index, segment, &cumulative, building_zeta);
        let input = SegmentSizingInput::new(
            flow,
            segment.length_m,
            settings.pipe_material,
            temperature_c,
            sum_zeta,
        )
        .with_friction_method(settings.friction_method);

        let Some(mut sizing) = size_segment(&input)? else {
            warnings.push(SizingWarning::NoFlow { segment_no });
            continue;
        };

        if let LocalLossPolicy::LinearFraction { terminal, non_terminal } = policy {
            let fraction = if segment.is_terminal { terminal } else { non_terminal };
            sizing = sizing.with_flat_local_loss(fraction * sizing.linear_loss_mca);
        }

        if sizing.diameter.oversized {
            warnings.push(SizingWarning::OversizedRequest {
                segment_no,
                required_diameter_mm: sizing.diameter.required_diameter_mm,
                largest_internal_mm: sizing.diameter.internal_diameter_mm,
            });
        }
        if sizing.velocity_m_per_s > velocity_limit {
            warnings.push(SizingWarning::VelocityAboveLimit {
                segment_no,
                velocity_m_per_s: sizing.velocity_m_per_s,
                limit_m_per_s: velocity_limit,
            });
        }
        if let Some(required_mm) = segment.required_connection_mm() {
            if sizing.diameter.internal_diameter_mm < required_mm {
                warnings.push(SizingWarning::ConnectionBelowMinimum {
                    segment_no,
                    internal_diameter_mm: sizing.diameter.internal_diameter_mm,
                    required_mm,
                });
            }
        }

        sum_linear += sizing.linear_loss_mca;
        sum_local += sizing.local_loss_mca;
        sum_elevation += segment.elevation_delta_m;

        let (segment_total, cumulative_total) = match settings.elevation_scope {
            ElevationScope::PressureBalanceOnly => (sizing.total_loss_mca(), sum_linear + sum_local),
            ElevationScope::PerSegment => (
                sizing.total_loss_mca() + segment.elevation_delta_m,
                sum_linear + sum_local + sum_elevation,
            ),
        };

        rows.push(SegmentRow {
            segment_no,
            segment_id: segment.id,
            is_terminal: segment.is_terminal,
            cumulative_fixture_count: trace.sums.fixture_count,
            design_flow_l_per_s: flow,
            flow_trace: trace,
            nominal_size_mm: sizing.diameter.nominal_mm,
            notation: settings.pipe_material.display_notation(sizing.diameter.nominal_mm),
            internal_diameter_mm: sizing.diameter.internal_diameter_mm,
            oversized: sizing.diameter.oversized,
            velocity_m_per_s: sizing.velocity_m_per_s,
            reynolds: sizing.reynolds,
            friction_factor: sizing.friction_factor,
            length_m: segment.length_m,
            unit_loss: sizing.unit_loss,
            linear_loss: sizing.linear_loss_mca,
            sum_zeta: sizing.sum_zeta,
            local_loss: sizing.local_loss_mca,
            elevation_delta_m: segment.elevation_delta_m,
            segment_total_loss: segment_total,
            cumulative_linear_loss: sum_linear,
            cumulative_local_loss: sum_local,
            cumulative_total_loss: cumulative_total,
        });
    }

    let local_to_linear_ratio = (sum_linear > 0.0).then(|| sum_local / sum_linear);
    if let Some(ratio) = local_to_linear_ratio {
        if ratio > MAX_LOCAL_TO_LINEAR_RATIO {
            warnings.push(SizingWarning::LocalLossRatioHigh {
                ratio,
                limit: MAX_LOCAL_TO_LINEAR_RATIO,
            });
        }
    }

    let min_pressure = settings
        .min_fixture_pressure_override_mca
        .unwrap_or_else(|| governing_fixture_pressure(segments));
    let total_loss = sum_linear + sum_local;
    let mut pressure = evaluate(
        min_pressure,
        total_loss,
        sum_elevation,
        settings.available_pressure_mca,
    );
    if let Some(source_row) = rows.last() {
        pressure = pressure.with_pump_flow(source_row.design_flow_l_per_s);
    }

    Ok(ChainResult {
        rows,
        summary: ChainSummary {
            total_linear_loss: sum_linear,
            total_local_loss: sum_local,
            total_elevation_m: sum_elevation,
            total_loss,
            local_to_linear_ratio,
            pressure,
        },
        warnings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{BuildingClass, Fitting, PipeMaterial};
    use crate::project::BuildingLossSwitches;
    use approx::assert_relative_eq;

    fn settings() -> DesignSettings {
        DesignSettings {
            apply_safety_margin: false,
            building_losses: BuildingLossSwitches::none(),
            ..DesignSettings::default()
        }
    }

    fn two_segments() -> Vec<Segment> {
        vec![
            Segment::new(5.0)
                .with_fixture(FixtureType::Shower, 1)
                .with_fitting(Fitting::Elbow90, 2)
                .terminal(),
            Segment::new(4.0)
                .with_fixture(FixtureType::KitchenSink, 1)
                .with_fitting(Fitting::Elbow90, 3)
                .with_fitting(Fitting::BranchTee, 1),
        ]
    }

    #[test]
    fn test_terminal_only_policy_zeta() {
        let result = compute_chain(&two_segments(), &settings()).unwrap();
        // shower implied 12 + 2 elbows
        assert_relative_eq!(result.rows[0].sum_zeta, 14.0, epsilon = 1e-12);
        // non-terminal: branch tee only
        assert_relative_eq!(result.rows[1].sum_zeta, 1.5, epsilon = 1e-12);
    }

    #[test]
    fn test_building_losses_on_first_segment() {
        let mut s = settings();
        s.building_losses = BuildingLossSwitches::default();
        let result = compute_chain(&two_segments(), &s).unwrap();
        // + water meter 6.0 + filter 3.0 + shutoff 0.2
        assert_relative_eq!(result.rows[0].sum_zeta, 23.2, epsilon = 1e-12);
        assert_relative_eq!(result.rows[1].sum_zeta, 1.5, epsilon = 1e-12);
    }

    #[test]
    fn test_all_fittings_policy_zeta() {
        let mut s = settings();
        s.local_loss_policy = LocalLossPolicy::AllFittings;
        let result = compute_chain(&two_segments(), &s).unwrap();
        // shower 12 + shutoff 0.2 + 2 elbows
        assert_relative_eq!(result.rows[0].sum_zeta, 14.2, epsilon = 1e-12);
        // shower 12 + sink 12 + through tee 0.5 + shutoff 0.2 + 3 elbows + tee 1.5
        assert_relative_eq!(result.rows[1].sum_zeta, 29.2, epsilon = 1e-12);
    }

    #[test]
    fn test_linear_fraction_policy() {
        let mut s = settings();
        s.local_loss_policy = LocalLossPolicy::DEFAULT_FRACTIONS;
        let result = compute_chain(&two_segments(), &s).unwrap();
        let (first, second) = (&result.rows[0], &result.rows[1]);
        assert_eq!(first.sum_zeta, 0.0);
        assert_relative_eq!(first.local_loss, 0.40 * first.linear_loss, epsilon = 1e-12);
        assert_relative_eq!(second.local_loss, 0.05 * second.linear_loss, epsilon = 1e-12);
    }

    #[test]
    fn test_running_totals() {
        let result = compute_chain(&two_segments(), &settings()).unwrap();
        let rows = &result.rows;
        assert_relative_eq!(
            rows[1].cumulative_linear_loss,
            rows[0].linear_loss + rows[1].linear_loss,
            epsilon = 1e-12
        );
        assert_relative_eq!(
            rows[1].cumulative_total_loss,
            result.summary.total_loss,
            epsilon = 1e-12
        );
        assert_relative_eq!(
            result.summary.total_loss,
            result.summary.total_linear_loss + result.summary.total_local_loss,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_elevation_scope_per_segment() {
        let segments = vec![
            Segment::new(5.0).with_fixture(FixtureType::Shower, 1).with_elevation(3.0).terminal(),
            Segment::new(5.0).with_fixture(FixtureType::Washbasin, 1).with_elevation(2.0),
        ];
        let base = compute_chain(&segments, &settings()).unwrap();
        let mut s = settings();
        s.elevation_scope = ElevationScope::PerSegment;
        let per_segment = compute_chain(&segments, &s).unwrap();

        assert_relative_eq!(
            per_segment.rows[1].cumulative_total_loss,
            base.rows[1].cumulative_total_loss + 5.0,
            epsilon = 1e-12
        );
        assert_relative_eq!(
            per_segment.summary.required_pressure(),
            base.summary.required_pressure(),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_safety_scope_source_only() {
        let mut s = settings();
        s.apply_safety_margin = true;
        s.safety_scope = SafetyMarginScope::SourceSegmentOnly;
        let result = compute_chain(&two_segments(), &s).unwrap();
        assert!(!result.rows[0].flow_trace.safety_applied);
        assert!(result.rows[1].flow_trace.safety_applied);
    }

    #[test]
    fn test_empty_leading_segment_is_skipped() {
        let segments = vec![
            Segment::new(2.0).with_elevation(1.0),
            Segment::new(5.0).with_fixture(FixtureType::Shower, 1).terminal(),
        ];
        let result = compute_chain(&segments, &settings()).unwrap();
        assert_eq!(result.rows.len(), 1);
        assert_eq!(result.rows[0].segment_no, 2);
        assert_eq!(result.warnings[0], SizingWarning::NoFlow { segment_no: 1 });
        assert_eq!(result.summary.total_elevation_m, 0.0);
    }

    #[test]
    fn test_governing_pressure() {
        let segments = vec![
            Segment::new(5.0).with_fixture(FixtureType::Washbasin, 1),
            Segment::new(5.0).with_fixture(FixtureType::BathtubSmall, 1).terminal(),
            Segment::new(5.0).with_fixture(FixtureType::WcFlushValve, 1),
        ];
        // terminal serves washbasin (10) and bathtub (13)
        assert_eq!(governing_fixture_pressure(&segments), 13.0);
        assert_eq!(governing_fixture_pressure(&segments[2..]), 25.0);
        assert_eq!(governing_fixture_pressure(&[]), 0.0);
    }

    #[test]
    fn test_pressure_override() {
        let mut s = settings();
        s.min_fixture_pressure_override_mca = Some(20.0);
        let result = compute_chain(&two_segments(), &s).unwrap();
        assert_eq!(result.summary.pressure.min_fixture_pressure_mca, 20.0);
    }

    #[test]
    fn test_oversized_request_warning() {
        // E = 600 → 2.0·√600 ≈ 49 L/s, beyond the largest PEX bore
        let mut s = settings();
        s.pipe_material = PipeMaterial::PexMultilayer;
        s.building_class = BuildingClass::IndustrialChangingRooms;
        let segments = vec![Segment::new(5.0).with_fixture(FixtureType::WcFlushValve, 40).terminal()];
        let result = compute_chain(&segments, &s).unwrap();
        assert!(result.rows[0].oversized);
        assert!(result
            .warnings
            .iter()
            .any(|w| matches!(w, SizingWarning::OversizedRequest { segment_no: 1, .. })));
    }

    #[test]
    fn test_connection_warning() {
        // one washbasin in PPR picks Ø10 (10 mm bore), a 3/4" tap needs 20 mm
        let segments = vec![Segment::new(5.0)
            .with_fixture(FixtureType::Washbasin, 1)
            .terminal()];
        let result = compute_chain(&segments, &settings()).unwrap();
        assert!(result.warnings.iter().all(|w| !matches!(w, SizingWarning::ConnectionBelowMinimum { .. })));

        let segments = vec![Segment::new(5.0)
            .with_fixture(FixtureType::ServiceTapThreeQuarterInch, 1)
            .terminal()];
        let result = compute_chain(&segments, &settings()).unwrap();
        assert!(result
            .warnings
            .iter()
            .any(|w| matches!(w, SizingWarning::ConnectionBelowMinimum { segment_no: 1, .. })));
    }

    #[test]
    fn test_velocity_limit_warning() {
        // 2 showers → 0.45·√0.4 ≈ 0.285 L/s; copper allows 2.5 m/s so Ø15
        // (13 mm bore) is picked and runs at about 2.14 m/s
        let mut s = settings();
        s.pipe_material = PipeMaterial::Copper;
        let segments = vec![Segment::new(5.0).with_fixture(FixtureType::Shower, 2).terminal()];
        let result = compute_chain(&segments, &s).unwrap();
        let row = &result.rows[0];
        assert_eq!(row.internal_diameter_mm, 13.0);
        assert!(row.velocity_m_per_s > 2.0 && row.velocity_m_per_s <= 2.5);
        assert!(result.warnings.iter().any(|w| matches!(
            w,
            SizingWarning::VelocityAboveLimit { segment_no: 1, limit_m_per_s, .. } if *limit_m_per_s == 2.0
        )));

        s.building_class = BuildingClass::Administrative;
        let result = compute_chain(&segments, &s).unwrap();
        assert!(!result
            .warnings
            .iter()
            .any(|w| matches!(w, SizingWarning::VelocityAboveLimit { .. })));
    }

    #[test]
    fn test_local_loss_ratio_warning() {
        let segments = vec![Segment::new(0.5)
            .with_fixture(FixtureType::Shower, 1)
            .with_fitting(Fitting::Elbow90, 4)
            .terminal()];
        let result = compute_chain(&segments, &settings()).unwrap();
        let ratio = result.summary.local_to_linear_ratio.unwrap();
        assert!(ratio > MAX_LOCAL_TO_LINEAR_RATIO);
        assert!(result
            .warnings
            .iter()
            .any(|w| matches!(w, SizingWarning::LocalLossRatioHigh { .. })));

        let mut s = settings();
        s.local_loss_policy = LocalLossPolicy::DEFAULT_FRACTIONS;
        let result = compute_chain(&segments, &s).unwrap();
        assert!(!result
            .warnings
            .iter()
            .any(|w| matches!(w, SizingWarning::LocalLossRatioHigh { .. })));
    }

    #[test]
    fn test_huge_fixture_count_is_rejected() {
        let segments = vec![
            Segment::new(5.0).with_fixture(FixtureType::Shower, u32::MAX).terminal(),
            Segment::new(5.0).with_fixture(FixtureType::Shower, 1),
        ];
        let err = compute_chain(&segments, &settings()).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
    }

    #[test]
    fn test_invalid_segment_fails_fast() {
        let segments = vec![Segment::new(5.0).with_fixture(FixtureType::Shower, 1), Segment::new(-1.0)];
        let err = compute_chain(&segments, &settings()).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
        assert!(compute_chain(&[], &settings()).is_err());
    }

    #[test]
    fn test_result_serializes() {
        let result = compute_chain(&two_segments(), &settings()).unwrap();
        let json = serde_json::to_string(&result).unwrap();
        assert!(json.contains("\"cumulative_total_loss\""));
        let back: ChainResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back.rows.len(), result.rows.len());
        assert_eq!(back.rows[1].nominal_size_mm, result.rows[1].nominal_size_mm);
        assert_eq!(back.summary.pump_required(), result.summary.pump_required());
    }
}
