//! Error types for MLS operator construction and application.
//!
//! ## Purpose
//!
//! This module defines `MlsError`, the single error type returned by every
//! fallible operation in the crate, and `ErrorKind`, the coarse taxonomy
//! callers can branch on.
//!
//! ## Key concepts
//!
//! * **Configuration**: invalid parameters or inputs detected before any
//!   neighbor query or solve runs.
//! * **Numerical**: a target's weighted local system could not be solved.
//! * **Contract violation**: a caller or collaborator broke an interface
//!   contract (wrong field length, malformed neighbor query result).
//!
//! ## Invariants
//!
//! * Construction errors are atomic: no operator is produced.
//! * Apply errors leave the operator untouched.

use thiserror::Error;

/// Coarse classification of an [`MlsError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Invalid parameters, shapes or execution context.
    Configuration,
    /// A local least-squares system was unsolvable.
    Numerical,
    /// An interface contract was violated at call time.
    ContractViolation,
}

/// Errors produced while building or applying an MLS operator.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MlsError {
    /// Points were supplied with zero coordinates per point.
    #[error("Point dimension must be at least 1")]
    EmptyDimension,

    /// Source and target points live in different dimensions.
    #[error("Dimension mismatch: source points are {source_dim}D, target points are {target_dim}D")]
    DimensionMismatch {
        /// Source point dimension.
        source_dim: usize,
        /// Target point dimension.
        target_dim: usize,
    },

    /// Neighbor count outside `1..=N`.
    #[error("Invalid neighbor count: {k} (must be > 0 and <= {n} source points)")]
    InvalidNeighborCount {
        /// Requested neighbors per target.
        k: usize,
        /// Number of source points.
        n: usize,
    },

    /// Kernel smoothness order with no matching kernel.
    #[error("Invalid kernel order: {0} (supported: 0, 2, 4, 6)")]
    InvalidKernelOrder(usize),

    /// Support radius or radius scale that is not positive and finite.
    #[error("Invalid support radius: {0} (must be > 0 and finite)")]
    InvalidSupportRadius(f64),

    /// Relative eigenvalue cutoff outside `[0, 1)`.
    #[error("Invalid rcond: {0} (must be >= 0 and < 1)")]
    InvalidRcond(f64),

    /// A coordinate or parameter is NaN or infinite.
    #[error("Invalid numeric value: {0}")]
    InvalidNumericValue(String),

    /// A builder setter was called more than once.
    #[error("Parameter '{parameter}' was set multiple times")]
    DuplicateParameter {
        /// Name of the repeated setter.
        parameter: &'static str,
    },

    /// The requested execution context could not be set up.
    #[error("Execution context unavailable: {0}")]
    ExecutionContext(String),

    /// The spatial index returned a result that is not `k` valid neighbors per target.
    #[error("Malformed neighbor query: {0}")]
    MalformedQuery(String),

    /// The weighted local system of a target is unsolvable.
    #[error("Singular local system at target {target}: weights cannot reproduce constants")]
    SingularSystem {
        /// Index of the failing target.
        target: usize,
    },

    /// Field values do not match the number of source points.
    #[error("Length mismatch: operator has {expected} source points, field has {got} values")]
    SourceLengthMismatch {
        /// Number of source points the operator was built with.
        expected: usize,
        /// Length of the supplied field.
        got: usize,
    },
}

impl MlsError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            MlsError::EmptyDimension
            | MlsError::DimensionMismatch { .. }
            | MlsError::InvalidNeighborCount { .. }
            | MlsError::InvalidKernelOrder(_)
            | MlsError::InvalidSupportRadius(_)
            | MlsError::InvalidRcond(_)
            | MlsError::InvalidNumericValue(_)
            | MlsError::DuplicateParameter { .. }
            | MlsError::ExecutionContext(_) => ErrorKind::Configuration,
            MlsError::SingularSystem { .. } => ErrorKind::Numerical,
            MlsError::MalformedQuery(_) | MlsError::SourceLengthMismatch { .. } => {
                ErrorKind::ContractViolation
            }
        }
    }
}
