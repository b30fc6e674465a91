//! # Error Types
//!
//! Structured error types for plumb_core. Only configuration and I/O problems
//! become errors. Degenerate hydraulic states (an empty segment, zero
//! viscosity, a flow larger than the biggest catalog pipe) are legitimate
//! results and are reported through the result types instead.
//!
//! ## Example
//!
//! ```rust
//! use plumb_core::errors::{CalcError, CalcResult};
//!
//! fn validate_length(length_m: f64) -> CalcResult<()> {
//!     if length_m <= 0.0 {
//!         return Err(CalcError::InvalidInput {
//!             field: "length_m".to_string(),
//!             value: length_m.to_string(),
//!             reason: "Segment length must be positive".to_string(),
//!         });
//!     }
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for plumb_core operations
pub type CalcResult<T> = Result<T, CalcError>;

/// Structured error type for sizing operations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum CalcError {
    /// An input value is invalid (out of range, non-finite, etc.)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// A required field is missing
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    /// Fixture name not present in the fixture catalog
    #[error("Fixture not found: {name}")]
    FixtureNotFound { name: String },

    /// Pipe material not present in the pipe catalog
    #[error("Pipe material not found: {material_name}")]
    MaterialNotFound { material_name: String },

    /// Building class not present in the coefficient table
    #[error("Building class not found: {name}")]
    BuildingClassNotFound { name: String },

    /// Fitting name not present in the local-loss table
    #[error("Fitting not found: {name}")]
    FittingNotFound { name: String },

    /// No segment with the given id exists in the chain
    #[error("Segment not found: {id}")]
    SegmentNotFound { id: String },

    /// File I/O error
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// Schema version mismatch
    #[error("Version mismatch: file version {file_version}, expected {expected_version}")]
    VersionMismatch {
        file_version: String,
        expected_version: String,
    },
}

impl CalcError {
    /// Create an InvalidInput error
    pub fn invalid_input(
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        CalcError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a MissingField error
    pub fn missing_field(field: impl Into<String>) -> Self {
        CalcError::MissingField {
            field: field.into(),
        }
    }

    /// Create a FixtureNotFound error
    pub fn fixture_not_found(name: impl Into<String>) -> Self {
        CalcError::FixtureNotFound { name: name.into() }
    }

    /// Create a MaterialNotFound error
    pub fn material_not_found(material_name: impl Into<String>) -> Self {
        CalcError::MaterialNotFound {
            material_name: material_name.into(),
        }
    }

    /// Create a BuildingClassNotFound error
    pub fn building_class_not_found(name: impl Into<String>) -> Self {
        CalcError::BuildingClassNotFound { name: name.into() }
    }

    /// Create a FittingNotFound error
    pub fn fitting_not_found(name: impl Into<String>) -> Self {
        CalcError::FittingNotFound { name: name.into() }
    }

    /// Create a FileError
    pub fn file_error(
        operation: impl Into<String>,
        path: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        CalcError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Whether the error comes from an unknown catalog key
    pub fn is_catalog_miss(&self) -> bool {
        matches!(
            self,
            CalcError::FixtureNotFound { .. }
                | CalcError::MaterialNotFound { .. }
                | CalcError::BuildingClassNotFound { .. }
                | CalcError::FittingNotFound { .. }
        )
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            CalcError::InvalidInput { .. } => "INVALID_INPUT",
            CalcError::MissingField { .. } => "MISSING_FIELD",
            CalcError::FixtureNotFound { .. } => "FIXTURE_NOT_FOUND",
            CalcError::MaterialNotFound { .. } => "MATERIAL_NOT_FOUND",
            CalcError::BuildingClassNotFound { .. } => "BUILDING_CLASS_NOT_FOUND",
            CalcError::FittingNotFound { .. } => "FITTING_NOT_FOUND",
            CalcError::SegmentNotFound { .. } => "SEGMENT_NOT_FOUND",
            CalcError::FileError { .. } => "FILE_ERROR",
            CalcError::SerializationError { .. } => "SERIALIZATION_ERROR",
            CalcError::VersionMismatch { .. } => "VERSION_MISMATCH",
        }
    }
}

/// Reject NaN and infinite values for a named input field.
pub(crate) fn ensure_finite(field: &str, value: f64) -> CalcResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(CalcError::invalid_input(field, value.to_string(), "Value must be a finite number"))
    }
}
