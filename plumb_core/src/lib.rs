//! # plumb_core - Sanitary Water-Supply Sizing Engine
//!
//! `plumb_core` sizes the supply pipes of a building per I9-2022 / SR 1343-1.
//! Given fixtures attached cumulatively along a chain of pipe segments it
//! computes the design flow of each segment, picks a commercial pipe size,
//! computes friction, fitting and elevation losses and checks whether the
//! source pressure suffices.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: Pure functions over immutable catalogs and a borrowed chain
//! - **JSON-First**: All inputs and results implement Serialize/Deserialize
//! - **Rich Errors**: Structured error types for bad configuration only;
//!   degenerate hydraulic states come back as results and warnings
//!
//! ## Quick Start
//!
//! ```rust
//! use plumb_core::catalog::FixtureType;
//! use plumb_core::project::Project;
//! use plumb_core::segments::Segment;
//!
//! let mut project = Project::new("John Engineer", "25-001", "Block A");
//! project.push_segment(Segment::new(5.0).with_fixture(FixtureType::Shower, 1).terminal());
//! project.push_segment(
//!     Segment::new(8.0)
//!         .with_fixture(FixtureType::KitchenSink, 1)
//!         .with_elevation(3.0),
//! );
//!
//! let result = project.compute().unwrap();
//! for row in &result.rows {
//!     println!("{}: {} ({:.3} L/s)", row.segment_no, row.notation, row.design_flow_l_per_s);
//! }
//! println!("pump required: {}", result.summary.pump_required());
//! ```
//!
//! ## Modules
//!
//! - [`project`] - Project container, metadata, and design settings
//! - [`segments`] - Segment chain and cumulative fixture sets
//! - [`calculations`] - Segment sizing, chain walk, pressure balance
//! - [`demand`] - Design-flow formulas
//! - [`hydraulics`] - Viscosity, friction factor, head-loss terms
//! - [`catalog`] - Fixtures, pipe materials, building classes, fittings
//! - [`units`] - Type-safe unit wrappers
//! - [`errors`] - Structured error types
//! - [`file_io`] - Atomic project saves and version-checked loads

pub mod calculations;
pub mod catalog;
pub mod demand;
pub mod errors;
pub mod file_io;
pub mod hydraulics;
pub mod project;
pub mod segments;
pub mod units;

// Re-export commonly used types at crate root for convenience
pub use calculations::{compute_chain, ChainResult, SizingWarning};
pub use errors::{CalcError, CalcResult};
pub use file_io::{load_project, save_project};
pub use project::{DesignSettings, Project, ProjectMetadata};
pub use segments::Segment;
