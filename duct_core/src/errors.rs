//! # Error Types
//!
//! Structured error types for duct_core. Errors carry enough context for
//! an editor (or an LLM driving one) to point at the offending node,
//! segment or field and fix it programmatically.
//!
//! Recoverable situations inside a solve (unknown fitting ids, dangling
//! node references, velocity over the limit) are *not* errors; they
//! degrade to zero contributions and show up as warnings on the results.
//!
//! ## Example
//!
//! ```rust
//! use duct_core::errors::{CalcError, CalcResult};
//!
//! fn validate_length(length_m: f64) -> CalcResult<()> {
//!     if !(length_m > 0.0) {
//!         return Err(CalcError::invalid_dimension(
//!             "length_m",
//!             length_m,
//!             "Segment length must be positive",
//!         ));
//!     }
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for duct_core operations
pub type CalcResult<T> = Result<T, CalcError>;

/// Structured error type for network editing and calculation.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum CalcError {
    /// An input value is invalid (wrong kind, out of range, etc.)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// A physical dimension (length, width, diameter, thickness) is not
    /// a finite positive number
    #[error("Invalid dimension '{field}': {value} - {reason}")]
    InvalidDimension {
        field: String,
        /// Offending value as text (`NaN` and `inf` included)
        value: String,
        reason: String,
    },

    /// Node id not present in the system
    #[error("Node not found: {node_id}")]
    NodeNotFound { node_id: String },

    /// Segment id not present in the system
    #[error("Segment not found: {segment_id}")]
    SegmentNotFound { segment_id: String },

    /// Fitting id not present in the fitting library
    #[error("Fitting not found: {fitting_id}")]
    FittingNotFound { fitting_id: String },

    /// An edit would break the direction rules of the network
    #[error("Invalid topology for segment '{segment_id}': {reason}")]
    InvalidTopology { segment_id: String, reason: String },

    /// The segment graph contains a cycle through the given node
    #[error("Cyclic topology detected at node '{node_id}'")]
    CyclicTopology { node_id: String },

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
    pub fn invalid_input(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create an InvalidDimension error
    pub fn invalid_dimension(field: impl Into<String>, value: f64, reason: impl Into<String>) -> Self {
        CalcError::InvalidDimension {
            field: field.into(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    /// Create a NodeNotFound error
    pub fn node_not_found(node_id: impl Into<String>) -> Self {
        CalcError::NodeNotFound {
            node_id: node_id.into(),
        }
    }

    /// Create a SegmentNotFound error
    pub fn segment_not_found(segment_id: impl Into<String>) -> Self {
        CalcError::SegmentNotFound {
            segment_id: segment_id.into(),
        }
    }

    /// Create a FittingNotFound error
    pub fn fitting_not_found(fitting_id: impl Into<String>) -> Self {
        CalcError::FittingNotFound {
            fitting_id: fitting_id.into(),
        }
    }

    /// Create an InvalidTopology error
    pub fn invalid_topology(segment_id: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::InvalidTopology {
            segment_id: segment_id.into(),
            reason: reason.into(),
        }
    }

    /// Create a CyclicTopology error
    pub fn cyclic_topology(node_id: impl Into<String>) -> Self {
        CalcError::CyclicTopology {
            node_id: node_id.into(),
        }
    }

    /// Create a FileError
    pub fn file_error(operation: impl Into<String>, path: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Check if the error is caused by the network shape rather than a value
    pub fn is_topological(&self) -> bool {
        matches!(
            self,
            CalcError::InvalidTopology { .. }
                | CalcError::CyclicTopology { .. }
                | CalcError::NodeNotFound { .. }
                | CalcError::SegmentNotFound { .. }
        )
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            CalcError::InvalidInput { .. } => "INVALID_INPUT",
            CalcError::InvalidDimension { .. } => "INVALID_DIMENSION",
            CalcError::NodeNotFound { .. } => "NODE_NOT_FOUND",
            CalcError::SegmentNotFound { .. } => "SEGMENT_NOT_FOUND",
            CalcError::FittingNotFound { .. } => "FITTING_NOT_FOUND",
            CalcError::InvalidTopology { .. } => "INVALID_TOPOLOGY",
            CalcError::CyclicTopology { .. } => "CYCLIC_TOPOLOGY",
            CalcError::FileError { .. } => "FILE_ERROR",
            CalcError::SerializationError { .. } => "SERIALIZATION_ERROR",
            CalcError::VersionMismatch { .. } => "VERSION_MISMATCH",
        }
    }
}

/// Reject anything that is not a finite, strictly positive number.
pub(crate) fn require_positive(field: &str, value: f64) -> CalcResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(CalcError::invalid_dimension(
            field,
            value,
            "Must be a finite positive number",
        ))
    }
}
