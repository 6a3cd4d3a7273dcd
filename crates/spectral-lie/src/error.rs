//! Error types for spectral-lie
//!
//! Fatal conditions only. Numerical degeneracy (near-singular induced metrics,
//! rank deficiency) is absorbed by tolerances and pseudo-inverses and never
//! shows up here.

use thiserror::Error;

/// Result type alias using the library's error type
pub type Result<T> = std::result::Result<T, SpectralLieError>;

/// Errors that can abort an analysis run
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum SpectralLieError {
    /// Structure-constant tensor or matrix with inconsistent dimensions
    #[error("Shape mismatch: expected {expected}, got {actual}")]
    ShapeMismatch {
        /// Expected shape
        expected: String,
        /// Actual shape
        actual: String,
    },

    /// Input document is missing fields or references unknown basis elements
    #[error("Schema error: {0}")]
    Schema(String),

    /// d^2 != 0, the structure constants do not satisfy the Jacobi identity
    #[error("Consistency check failed: d^2 != 0 at degree {degree} (max |d_{{p+1}} d_p| = {defect:.3e}). Verify Jacobi identity and structure constants.")]
    Consistency {
        /// Degree p of the failing composition d_{p+1} d_p
        degree: usize,
        /// Largest absolute entry of the composition
        defect: f64,
    },

    /// Requested input or output format is not recognized
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Classification backend is not available in this build or environment
    #[error("Classification backend '{backend}' is not available. Use the 'structure_json' input format instead.")]
    BackendUnavailable {
        /// Backend name
        backend: String,
    },

    /// Classification backend failed to produce structure constants
    #[error("Classification backend failed for {cartan_type}: {reason}. Try using JSON structure constants instead.")]
    BackendFailure {
        /// Requested Cartan type
        cartan_type: String,
        /// Failure description
        reason: String,
    },

    /// Base metric is not a symmetric n x n matrix
    #[error("Invalid base metric: {0}")]
    InvalidMetric(String),

    /// Configuration document is invalid
    #[error("Configuration error: {0}")]
    Config(String),

    /// A component name was registered twice
    #[error("Component already registered: {0}")]
    DuplicateComponent(String),

    /// I/O failure while reading input or writing results
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization failure
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SpectralLieError {
    /// Create a shape mismatch error
    pub fn shape_mismatch(expected: impl Into<String>, actual: impl Into<String>) -> Self {
        Self::ShapeMismatch {
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// Create a schema error
    pub fn schema(message: impl Into<String>) -> Self {
        Self::Schema(message.into())
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a backend failure error
    pub fn backend_failure(cartan_type: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::BackendFailure {
            cartan_type: cartan_type.into(),
            reason: reason.into(),
        }
    }

    /// Whether the error came from the classification backend
    pub fn is_backend_error(&self) -> bool {
        matches!(
            self,
            Self::BackendUnavailable { .. } | Self::BackendFailure { .. }
        )
    }
}
