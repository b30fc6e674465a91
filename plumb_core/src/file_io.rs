//! # File I/O Module
//!
//! Project file operations:
//! - **Validated saves**: only a project that passes validation is written
//! - **Atomic saves**: write to `.tmp`, fsync, rename over the target
//! - **Version validation**: refuse files written by an incompatible schema
//! - **Typed load errors**: unknown catalog entries and missing fields keep
//!   their own error codes
//!
//! ## File Format
//!
//! Projects are saved as `.plb` files containing pretty-printed JSON.
//!
//! ## Example
//!
//! ```rust,no_run
//! use plumb_core::file_io::{save_project, load_project};
//! use plumb_core::project::Project;
//! use std::path::Path;
//!
//! let project = Project::new("Engineer", "25-001", "Block B");
//! let path = Path::new("block_b.plb");
//!
//! save_project(&project, path).unwrap();
//! let loaded = load_project(path).unwrap();
//! assert_eq!(loaded.meta.job_id, "25-001");
//! ```

use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::Path;

use crate::errors::{CalcError, CalcResult};
use crate::project::{Project, SCHEMA_VERSION};

/// Save a project as a `.plb` file.
///
/// The project is validated first, so a saved file always loads and
/// computes. The JSON goes to `<name>.plb.tmp`, is synced, then renamed over
/// the target.
pub fn save_project(project: &Project, path: &Path) -> CalcResult<()> {
    project.validate()?;
    let json = serde_json::to_string_pretty(project).map_err(|e| CalcError::SerializationError {
        reason: e.to_string(),
    })?;
    write_atomic(path, json.as_bytes())
}

fn write_atomic(path: &Path, bytes: &[u8]) -> CalcResult<()> {
    let tmp_path = path.with_extension("plb.tmp");
    let tmp_error = |operation: &str, e: std::io::Error| {
        CalcError::file_error(operation, tmp_path.display().to_string(), e.to_string())
    };

    let mut tmp_file = File::create(&tmp_path).map_err(|e| tmp_error("create temp file", e))?;
    let written = tmp_file
        .write_all(bytes)
        .and_then(|()| tmp_file.sync_all())
        .map_err(|e| tmp_error("write temp file", e));
    drop(tmp_file);

    let result = written.and_then(|()| {
        fs::rename(&tmp_path, path).map_err(|e| {
            CalcError::file_error("rename to final", path.display().to_string(), e.to_string())
        })
    });
    if result.is_err() {
        let _ = fs::remove_file(&tmp_path);
    }
    result
}

/// Load a project from a file.
///
/// # Returns
///
/// * `Err(CalcError::VersionMismatch)` - File version is incompatible
/// * `Err(CalcError::MissingField)` - A required field is absent
/// * `Err(CalcError::FixtureNotFound)` and the other catalog misses - Unknown catalog key
/// * `Err(CalcError::SerializationError)` - Invalid JSON
/// * `Err(CalcError::FileError)` - I/O error
pub fn load_project(path: &Path) -> CalcResult<Project> {
    let io_error = |operation: &str, e: std::io::Error| {
        CalcError::file_error(operation, path.display().to_string(), e.to_string())
    };
    let mut file = File::open(path).map_err(|e| io_error("open", e))?;

    let mut contents = String::new();
    file.read_to_string(&mut contents).map_err(|e| io_error("read", e))?;

    project_from_json(&contents).map_err(|e| match e {
        CalcError::SerializationError { reason } => CalcError::SerializationError {
            reason: format!("Invalid JSON in {}: {}", path.display(), reason),
        },
        other => other,
    })
}

/// Parse and version-check a project from a JSON string.
///
/// Catalog entries may be named by code, English or Romanian name. An
/// unknown entry is reported as the matching `*NotFound` error.
pub fn project_from_json(json: &str) -> CalcResult<Project> {
    let project: Project = serde_json::from_str(json).map_err(|e| {
        let reason = e.to_string();
        if let Some(field) = missing_field_name(&reason) {
            return CalcError::missing_field(field);
        }
        catalog_miss(&reason).unwrap_or(CalcError::SerializationError { reason })
    })?;

    validate_version(&project.meta.version)?;
    Ok(project)
}

/// Extract `name` from serde's "missing field `name`" message
fn missing_field_name(message: &str) -> Option<&str> {
    let rest = message.strip_prefix("missing field `")?;
    rest.split('`').next()
}

/// Rebuild a catalog miss from the message serde carried it in
fn catalog_miss(message: &str) -> Option<CalcError> {
    let message = message.rsplit_once(" at line ").map_or(message, |(head, _)| head);
    let misses: [(&str, fn(&str) -> CalcError); 4] = [
        ("Fixture not found: ", |name| CalcError::fixture_not_found(name)),
        ("Pipe material not found: ", |name| CalcError::material_not_found(name)),
        ("Building class not found: ", |name| CalcError::building_class_not_found(name)),
        ("Fitting not found: ", |name| CalcError::fitting_not_found(name)),
    ];
    misses
        .iter()
        .find_map(|(prefix, make)| message.strip_prefix(prefix).map(|name| make(name)))
}

/// Validate that a file version is compatible with the current schema.
fn validate_version(file_version: &str) -> CalcResult<()> {
    let mismatch = || CalcError::VersionMismatch {
        file_version: file_version.to_string(),
        expected_version: SCHEMA_VERSION.to_string(),
    };

    let file_parts: Vec<u32> = file_version.split('.').filter_map(|p| p.parse().ok()).collect();
    let current_parts: Vec<u32> = SCHEMA_VERSION.split('.').filter_map(|p| p.parse().ok()).collect();

    let (Some(file_major), Some(current_major)) = (file_parts.first(), current_parts.first()) else {
        return Err(mismatch());
    };

    // Major version must match
    if file_major != current_major {
        return Err(mismatch());
    }

    // For 0.x, a file from a newer minor may carry fields we cannot read
    if *current_major == 0 {
        if let (Some(file_minor), Some(current_minor)) = (file_parts.get(1), current_parts.get(1)) {
            if file_minor > current_minor {
                return Err(mismatch());
            }
        }
    }

    Ok(())
}
