//! # Project Data Structures
//!
//! The `Project` struct is the root container of a sizing job. Projects
//! serialize to `.plb` files as human-readable JSON.
//!
//! ## Structure
//!
//! ```text
//! Project
//! ├── meta: ProjectMetadata (version, engineer, job info, timestamps)
//! ├── settings: DesignSettings (building class, material, water, policies)
//! └── segments: Vec<Segment> (ordered chain, most remote first)
//! ```
//!
//! The segment list is owned by the project and edited through it; the
//! calculations only ever borrow it.
//!
//! ## Example
//!
//! ```rust
//! use plumb_core::catalog::FixtureType;
//! use plumb_core::project::Project;
//!
//! let mut project = Project::new("Ana Ionescu", "25-017", "Str. Lalelelor 4");
//! let id = project.add_segment();
//! project.get_segment_mut(&id).unwrap().fixtures.insert(FixtureType::Shower, 1);
//!
//! let result = project.compute().unwrap();
//! assert_eq!(result.rows.len(), 1);
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::calculations::{
    compute_chain, ChainResult, ElevationScope, LocalLossPolicy, SafetyMarginScope,
};
use crate::catalog::{BuildingClass, BuildingLoss, PipeMaterial};
use crate::demand::{DemandFormula, DemandMode};
use crate::errors::{ensure_finite, CalcError, CalcResult};
use crate::hydraulics::{FrictionMethod, WaterKind};
use crate::segments::{
    CumulativeFixtures, FixtureCounts, Segment, DEFAULT_FIRST_RISE_M, DEFAULT_LENGTH_M,
};

/// Current schema version for .plb files
pub const SCHEMA_VERSION: &str = "0.1.0";

/// Default pressure at the service connection (mCA)
pub const DEFAULT_AVAILABLE_PRESSURE_MCA: f64 = 30.0;

/// Root project container.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    /// Project metadata (version, engineer, job info)
    pub meta: ProjectMetadata,

    /// Design settings shared by the whole chain
    #[serde(default)]
    pub settings: DesignSettings,

    /// Segment chain, index 0 is the most remote segment
    #[serde(default)]
    pub segments: Vec<Segment>,
}

impl Project {
    /// Create a new empty project.
    ///
    /// # Example
    ///
    /// ```rust
    /// use plumb_core::project::Project;
    ///
    /// let project = Project::new("John Doe", "25-001", "Block C2");
    /// assert_eq!(project.meta.engineer, "John Doe");
    /// assert!(project.segments.is_empty());
    /// ```
    pub fn new(
        engineer: impl Into<String>,
        job_id: impl Into<String>,
        site: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Project {
            meta: ProjectMetadata {
                version: SCHEMA_VERSION.to_string(),
                engineer: engineer.into(),
                job_id: job_id.into(),
                site: site.into(),
                created: now,
                modified: now,
            },
            settings: DesignSettings::default(),
            segments: Vec::new(),
        }
    }

    /// Append an empty segment with the usual defaults (5 m long, the first
    /// one rising 3 m). Returns its id.
    pub fn add_segment(&mut self) -> Uuid {
        let mut segment = Segment::new(DEFAULT_LENGTH_M);
        if self.segments.is_empty() {
            segment.elevation_delta_m = DEFAULT_FIRST_RISE_M;
        }
        self.push_segment(segment)
    }

    /// Append a prepared segment. Returns its id.
    pub fn push_segment(&mut self, segment: Segment) -> Uuid {
        let id = segment.id;
        self.segments.push(segment);
        self.touch();
        id
    }

    /// Remove a segment by id.
    pub fn remove_segment(&mut self, id: &Uuid) -> CalcResult<Segment> {
        let index = self
            .segments
            .iter()
            .position(|s| s.id == *id)
            .ok_or_else(|| CalcError::SegmentNotFound { id: id.to_string() })?;
        self.touch();
        Ok(self.segments.remove(index))
    }

    /// Remove the segment closest to the source.
    pub fn pop_segment(&mut self) -> Option<Segment> {
        let segment = self.segments.pop();
        if segment.is_some() {
            self.touch();
        }
        segment
    }

    pub fn get_segment(&self, id: &Uuid) -> Option<&Segment> {
        self.segments.iter().find(|s| s.id == *id)
    }

    /// Get a mutable reference to a segment.
    ///
    /// Marks the project as modified when the segment exists.
    pub fn get_segment_mut(&mut self, id: &Uuid) -> Option<&mut Segment> {
        let index = self.segments.iter().position(|s| s.id == *id)?;
        self.meta.modified = Utc::now();
        self.segments.get_mut(index)
    }

    /// Update the modified timestamp.
    pub fn touch(&mut self) {
        self.meta.modified = Utc::now();
    }

    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// Fixtures served by each segment, in chain order
    pub fn cumulative_preview(&self) -> Vec<FixtureCounts> {
        CumulativeFixtures::new(&self.segments).collect()
    }

    /// Check settings and every segment without computing.
    pub fn validate(&self) -> CalcResult<()> {
        self.settings.validate()?;
        self.segments.iter().try_for_each(Segment::validate)
    }

    /// Run the chain computation on this project.
    pub fn compute(&self) -> CalcResult<ChainResult> {
        compute_chain(&self.segments, &self.settings)
    }
}

impl Default for Project {
    fn default() -> Self {
        Project::new("", "", "")
    }
}

/// Project metadata stored in the file header.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectMetadata {
    /// Schema version (for migration compatibility)
    pub version: String,

    /// Name of the responsible engineer
    pub engineer: String,

    /// Job/project number
    pub job_id: String,

    /// Building or site designation
    pub site: String,

    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
}

/// Building-wide local losses charged at the service connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildingLossSwitches {
    pub water_meter: bool,
    pub post_meter_filter: bool,
    pub main_shutoff_valve: bool,
    pub pressure_reducer: bool,
    pub manifold: bool,
}

impl Default for BuildingLossSwitches {
    fn default() -> Self {
        let mut switches = BuildingLossSwitches::none();
        for loss in BuildingLoss::ALL.into_iter().filter(BuildingLoss::is_mandatory) {
            switches.set(loss, true);
        }
        switches
    }
}

impl BuildingLossSwitches {
    /// Everything switched off
    pub fn none() -> Self {
        BuildingLossSwitches {
            water_meter: false,
            post_meter_filter: false,
            main_shutoff_valve: false,
            pressure_reducer: false,
            manifold: false,
        }
    }

    /// Switch one entry on or off
    pub fn set(&mut self, loss: BuildingLoss, enabled: bool) {
        let slot = match loss {
            BuildingLoss::WaterMeter => &mut self.water_meter,
            BuildingLoss::PostMeterFilter => &mut self.post_meter_filter,
            BuildingLoss::MainShutoffValve => &mut self.main_shutoff_valve,
            BuildingLoss::PressureReducer => &mut self.pressure_reducer,
            BuildingLoss::Manifold => &mut self.manifold,
        };
        *slot = enabled;
    }

    pub fn is_enabled(&self, loss: BuildingLoss) -> bool {
        match loss {
            BuildingLoss::WaterMeter => self.water_meter,
            BuildingLoss::PostMeterFilter => self.post_meter_filter,
            BuildingLoss::MainShutoffValve => self.main_shutoff_valve,
            BuildingLoss::PressureReducer => self.pressure_reducer,
            BuildingLoss::Manifold => self.manifold,
        }
    }

    pub fn enabled(&self) -> Vec<BuildingLoss> {
        BuildingLoss::ALL
            .iter()
            .copied()
            .filter(|loss| self.is_enabled(*loss))
            .collect()
    }

    /// Σζ of the enabled entries
    pub fn total_zeta(&self) -> f64 {
        self.enabled().iter().map(BuildingLoss::zeta).sum()
    }
}

/// Design settings for the whole chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DesignSettings {
    pub building_class: BuildingClass,
    pub pipe_material: PipeMaterial,
    pub water_kind: WaterKind,

    /// Replaces the water kind's default temperature (°C)
    pub temperature_override_c: Option<f64>,

    pub demand_mode: DemandMode,

    /// Multiply design flows by 1.1
    pub apply_safety_margin: bool,
    pub safety_scope: SafetyMarginScope,

    pub elevation_scope: ElevationScope,
    pub friction_method: FrictionMethod,
    pub local_loss_policy: LocalLossPolicy,
    pub building_losses: BuildingLossSwitches,

    /// Pressure at the service connection (mCA)
    pub available_pressure_mca: f64,

    /// Replaces the governing fixture pressure derived from the chain (mCA)
    pub min_fixture_pressure_override_mca: Option<f64>,
}

impl Default for DesignSettings {
    fn default() -> Self {
        DesignSettings {
            building_class: BuildingClass::default(),
            pipe_material: PipeMaterial::default(),
            water_kind: WaterKind::default(),
            temperature_override_c: None,
            demand_mode: DemandMode::default(),
            apply_safety_margin: true,
            safety_scope: SafetyMarginScope::default(),
            elevation_scope: ElevationScope::default(),
            friction_method: FrictionMethod::default(),
            local_loss_policy: LocalLossPolicy::default(),
            building_losses: BuildingLossSwitches::default(),
            available_pressure_mca: DEFAULT_AVAILABLE_PRESSURE_MCA,
            min_fixture_pressure_override_mca: None,
        }
    }
}

impl DesignSettings {
    /// Design water temperature (°C)
    pub fn temperature_c(&self) -> f64 {
        self.temperature_override_c
            .unwrap_or_else(|| self.water_kind.default_temperature_c())
    }

    pub fn demand_formula(&self) -> DemandFormula {
        self.demand_mode.formula_for(self.building_class)
    }

    /// Validate settings before a computation.
    pub fn validate(&self) -> CalcResult<()> {
        ensure_finite("available_pressure_mca", self.available_pressure_mca)?;
        if self.available_pressure_mca < 0.0 {
            return Err(CalcError::invalid_input(
                "available_pressure_mca",
                self.available_pressure_mca.to_string(),
                "Available pressure cannot be negative",
            ));
        }
        if let Some(t) = self.temperature_override_c {
            ensure_finite("temperature_override_c", t)?;
            if !(0.0..=100.0).contains(&t) {
                return Err(CalcError::invalid_input(
                    "temperature_override_c",
                    t.to_string(),
                    "Water temperature must be between 0 and 100 °C",
                ));
            }
        }
        if let Some(p) = self.min_fixture_pressure_override_mca {
            ensure_finite("min_fixture_pressure_override_mca", p)?;
            if p < 0.0 {
                return Err(CalcError::invalid_input(
                    "min_fixture_pressure_override_mca",
                    p.to_string(),
                    "Fixture pressure cannot be negative",
                ));
            }
        }
        if let LocalLossPolicy::LinearFraction { terminal, non_terminal } = self.local_loss_policy {
            let fractions = [
                ("local_loss_policy.terminal", terminal),
                ("local_loss_policy.non_terminal", non_terminal),
            ];
            for (field, value) in fractions {
                ensure_finite(field, value)?;
                if value < 0.0 {
                    return Err(CalcError::invalid_input(
                        field,
                        value.to_string(),
                        "Fraction cannot be negative",
                    ));
                }
            }
        }
        Ok(())
    }
}
