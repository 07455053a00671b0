//! Input validation for MLS configuration and data.
//!
//! ## Purpose
//!
//! This module provides validation functions for operator configuration,
//! point sets, neighbor query results and field values. Every check runs
//! before the work it guards, so invalid input never reaches a query or a
//! solve.
//!
//! ## Design notes
//!
//! * **Fail-Fast**: Validation stops at the first error encountered.
//! * **Efficiency**: Checks are ordered from cheap to expensive.
//! * **Generics**: Validation is generic over `Float` types.
//!
//! ## Invariants
//!
//! * Validation is deterministic and side-effect free.
//!
//! ## Non-goals
//!
//! * This module does not correct or filter invalid inputs.

use num_traits::Float;

use crate::algorithms::solver::SupportRadius;
use crate::math::neighborhood::KnnQuery;
use crate::primitives::errors::MlsError;

// ============================================================================
// Validator
// ============================================================================

/// Validation utility for MLS configuration and input data.
///
/// All methods return `Result<(), MlsError>` and fail fast upon identifying
/// the first violation.
pub struct Validator;

impl Validator {
    // ========================================================================
    // Geometry Validation
    // ========================================================================

    /// Validate that source and target points share a non-zero dimension.
    pub fn validate_dimensions(source_dim: usize, target_dim: usize) -> Result<(), MlsError> {
        if source_dim == 0 || target_dim == 0 {
            return Err(MlsError::EmptyDimension);
        }
        if source_dim != target_dim {
            return Err(MlsError::DimensionMismatch {
                source_dim,
                target_dim,
            });
        }
        Ok(())
    }

    /// Validate the neighbor count against the number of source points.
    pub fn validate_neighbor_count(k: usize, n_sources: usize) -> Result<(), MlsError> {
        if k == 0 || k > n_sources {
            return Err(MlsError::InvalidNeighborCount { k, n: n_sources });
        }
        Ok(())
    }

    // ========================================================================
    // Parameter Validation
    // ========================================================================

    /// Validate the support radius policy.
    pub fn validate_support_radius<T: Float>(policy: &SupportRadius<T>) -> Result<(), MlsError> {
        let value = match *policy {
            SupportRadius::FarthestNeighbor { scale } => scale,
            SupportRadius::Fixed(radius) => radius,
        };
        if !value.is_finite() || value <= T::zero() {
            return Err(MlsError::InvalidSupportRadius(
                value.to_f64().unwrap_or(f64::NAN),
            ));
        }
        Ok(())
    }

    /// Validate the relative eigenvalue cutoff.
    pub fn validate_rcond<T: Float>(rcond: T) -> Result<(), MlsError> {
        if !rcond.is_finite() || rcond < T::zero() || rcond >= T::one() {
            return Err(MlsError::InvalidRcond(rcond.to_f64().unwrap_or(f64::NAN)));
        }
        Ok(())
    }

    /// Validate the requested worker count.
    pub fn validate_threads(threads: Option<usize>) -> Result<(), MlsError> {
        if threads == Some(0) {
            return Err(MlsError::ExecutionContext(
                "thread count must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Validate that no parameters were set multiple times in the builder.
    pub fn validate_no_duplicates(duplicate_param: Option<&'static str>) -> Result<(), MlsError> {
        if let Some(parameter) = duplicate_param {
            return Err(MlsError::DuplicateParameter { parameter });
        }
        Ok(())
    }

    // ========================================================================
    // Collaborator and Call Validation
    // ========================================================================

    /// Validate that a neighbor query holds exactly `k` in-range source
    /// indices for each of `n_targets` targets.
    pub fn validate_query(
        query: &KnnQuery,
        n_targets: usize,
        k: usize,
        n_sources: usize,
    ) -> Result<(), MlsError> {
        if query.offsets.len() != n_targets + 1 {
            return Err(MlsError::MalformedQuery(format!(
                "{} offsets for {} targets (expected {})",
                query.offsets.len(),
                n_targets,
                n_targets + 1
            )));
        }

        for (t, pair) in query.offsets.windows(2).enumerate() {
            let (start, end) = (pair[0], pair[1]);
            if end < start || end > query.indices.len() {
                return Err(MlsError::MalformedQuery(format!(
                    "target {} has invalid segment [{}, {})",
                    t, start, end
                )));
            }
            if end - start != k {
                return Err(MlsError::MalformedQuery(format!(
                    "target {} has {} neighbors, expected {}",
                    t,
                    end - start,
                    k
                )));
            }
        }

        // Entries outside the segments are padding and never read.
        for t in 0..n_targets {
            if let Some(&bad) = query.segment(t).iter().find(|&&i| i >= n_sources) {
                return Err(MlsError::MalformedQuery(format!(
                    "target {} has source index {} out of range for {} sources",
                    t, bad, n_sources
                )));
            }
        }

        Ok(())
    }

    /// Validate the length of a field passed to `interpolate`.
    pub fn validate_field_len(expected: usize, got: usize) -> Result<(), MlsError> {
        if expected != got {
            return Err(MlsError::SourceLengthMismatch { expected, got });
        }
        Ok(())
    }
}
