//! # File I/O
//!
//! Duct systems are stored as pretty-printed JSON, conventionally with a
//! `.duct.json` extension. Loading checks the schema version written in
//! `meta.version` against [`SCHEMA_VERSION`].
//!
//! Saves are plain writes. There is no locking and no temp-file rename, so
//! callers that share files between processes need their own coordination.
//!
//! ## Example
//!
//! ```rust,no_run
//! use duct_core::file_io::{load_system, save_system};
//! use duct_core::system::DuctSystem;
//! use std::path::Path;
//!
//! let system = DuctSystem::new("Level 2 Supply");
//! let path = Path::new("level2.duct.json");
//! save_system(&system, path)?;
//!
//! let loaded = load_system(path)?;
//! assert_eq!(loaded.name, "Level 2 Supply");
//! # Ok::<(), duct_core::errors::CalcError>(())
//! ```

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::errors::{CalcError, CalcResult};
use crate::system::{DuctSystem, SCHEMA_VERSION};

/// Serialize a system to pretty JSON.
pub fn system_to_json(system: &DuctSystem) -> CalcResult<String> {
    serde_json::to_string_pretty(system).map_err(|e| CalcError::SerializationError { reason: e.to_string() })
}

/// Parse a system from JSON and check its schema version.
pub fn system_from_json(json: &str) -> CalcResult<DuctSystem> {
    let system: DuctSystem =
        serde_json::from_str(json).map_err(|e| CalcError::SerializationError { reason: e.to_string() })?;
    validate_version(&system.meta.version)?;
    Ok(system)
}

/// Write a system to `path`, replacing any existing file.
pub fn save_system(system: &DuctSystem, path: &Path) -> CalcResult<()> {
    let json = system_to_json(system)?;
    fs::write(path, json).map_err(|e| CalcError::file_error("write", path.display().to_string(), e.to_string()))?;
    debug!(path = %path.display(), nodes = system.nodes.len(), "system saved");
    Ok(())
}

/// Read a system from `path`.
///
/// # Errors
///
/// * `FileError` - the file could not be read
/// * `SerializationError` - the contents are not a valid system
/// * `VersionMismatch` - the file was written by an incompatible schema
pub fn load_system(path: &Path) -> CalcResult<DuctSystem> {
    let contents =
        fs::read_to_string(path).map_err(|e| CalcError::file_error("read", path.display().to_string(), e.to_string()))?;
    let system = system_from_json(&contents).map_err(|e| match e {
        CalcError::SerializationError { reason } => CalcError::SerializationError {
            reason: format!("Invalid system file {}: {}", path.display(), reason),
        },
        other => other,
    })?;
    debug!(path = %path.display(), nodes = system.nodes.len(), "system loaded");
    Ok(system)
}

/// Parse `major.minor[.patch]` into numbers
fn major_minor(version: &str) -> Option<(u32, u32)> {
    let mut parts = version.split('.');
    let major = parts.next()?.parse().ok()?;
    let minor = parts.next().map_or(Some(0), |p| p.parse().ok())?;
    Some((major, minor))
}

/// Check a file's schema version against the current one.
///
/// Majors must match. While the schema is 0.x, a file with a newer minor
/// version is also rejected.
pub fn validate_version(file_version: &str) -> CalcResult<()> {
    let mismatch = || CalcError::VersionMismatch {
        file_version: file_version.to_string(),
        expected_version: SCHEMA_VERSION.to_string(),
    };

    let (file_major, file_minor) = major_minor(file_version).ok_or_else(mismatch)?;
    let (major, minor) = major_minor(SCHEMA_VERSION).ok_or_else(mismatch)?;

    if file_major != major || (major == 0 && file_minor > minor) {
        return Err(mismatch());
    }
    Ok(())
}
