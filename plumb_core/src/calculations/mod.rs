//! # Sizing Calculations
//!
//! Each calculation follows the pattern:
//!
//! - `*Input` or a plain slice of segments - JSON-serializable input
//! - `*Result` / row types - JSON-serializable output
//! - a pure function returning the result (or `CalcResult` when the input is
//!   validated first)
//!
//! ## Available Calculations
//!
//! - [`segment`] - Diameter selection and losses for one segment
//! - [`chain`] - Cumulative walk over the whole segment chain
//! - [`pressure`] - Source pressure check and pump requirement

pub mod chain;
pub mod pressure;
pub mod segment;

pub use chain::{
    compute_chain, governing_fixture_pressure, ChainResult, ChainSummary, ElevationScope,
    LocalLossPolicy, SafetyMarginScope, SegmentRow, SizingWarning,
};
pub use pressure::{evaluate, PressureBalance};
pub use segment::{size_segment, SegmentSizing, SegmentSizingInput};
