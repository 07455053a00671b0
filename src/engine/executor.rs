//! Execution engine for MLS operator construction and application.
//!
//! ## Purpose
//!
//! This module orchestrates the two phases of an MLS operator: the one-time
//! construction (validate, gather neighbors, solve coefficients) and the
//! repeated application of the coefficient table to field values.
//!
//! ## Design notes
//!
//! * **Atomic construction**: Every stage returns `Result`; the first error
//!   aborts the build and no tables are returned.
//! * **Transient inputs**: Flattened points, the spatial index and the
//!   neighbor coordinate table are dropped when construction finishes; only
//!   the index and coefficient tables survive.
//! * **Parallel phases**: Coordinate gather, solve and apply each run as a
//!   parallel-for over targets.
//!
//! ## Invariants
//!
//! * Both output tables are `M * K`, row-major.
//! * Application never mutates the tables.

use num_traits::AsPrimitive;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::algorithms::gather::gather_neighbors;
use crate::algorithms::solver::{CoefficientSolver, SupportRadius};
use crate::engine::validator::Validator;
use crate::math::basis::PolynomialDegree;
use crate::math::kernel::WeightFunction;
use crate::math::linalg::{FloatLinalg, RankPolicy};
use crate::math::neighborhood::SpatialIndex;
use crate::primitives::errors::MlsError;
use crate::primitives::parallel::{for_each_row, install};
use crate::primitives::points::{PointSet, flatten_points};
use crate::primitives::values::FieldValue;

// ============================================================================
// Configuration
// ============================================================================

/// Construction parameters of an MLS operator.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MlsConfig<T> {
    /// Kernel (support weight shape).
    pub weight_function: WeightFunction,

    /// Polynomial exactness order.
    pub polynomial_degree: PolynomialDegree,

    /// Neighbors per target; `None` means the number of basis terms.
    pub neighbors: Option<usize>,

    /// Kernel support radius policy.
    pub support_radius: SupportRadius<T>,

    /// Strategy for ill-conditioned local systems.
    pub rank_policy: RankPolicy,

    /// Relative eigenvalue cutoff; `None` means `P * ε`.
    pub rcond: Option<T>,

    /// Worker count for construction; `None` uses the ambient rayon pool.
    pub threads: Option<usize>,
}

impl<T: FloatLinalg> Default for MlsConfig<T> {
    fn default() -> Self {
        Self {
            weight_function: WeightFunction::default(),
            polynomial_degree: PolynomialDegree::default(),
            neighbors: None,
            support_radius: SupportRadius::default(),
            rank_policy: RankPolicy::default(),
            rcond: None,
            threads: None,
        }
    }
}

impl<T: FloatLinalg> MlsConfig<T> {
    /// Check every parameter that does not depend on the point sets.
    pub fn validate(&self) -> Result<(), MlsError> {
        Validator::validate_support_radius(&self.support_radius)?;
        if let Some(rcond) = self.rcond {
            Validator::validate_rcond(rcond)?;
        }
        Validator::validate_threads(self.threads)?;
        Ok(())
    }
}

// ============================================================================
// Operator Tables
// ============================================================================

/// The two tables an MLS operator retains after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct OperatorTables<T> {
    /// Neighbor source indices, `M * K` row-major.
    pub indices: Vec<usize>,
    /// Interpolation weights, `M * K` row-major.
    pub coefficients: Vec<T>,
    /// Number of source points `N`.
    pub num_sources: usize,
    /// Number of target points `M`.
    pub num_targets: usize,
    /// Neighbors per target `K`.
    pub num_neighbors: usize,
    /// Degree actually fitted (may be below the requested one when `K < P`).
    pub polynomial_degree: PolynomialDegree,
}

// ============================================================================
// Executor
// ============================================================================

/// Orchestrates construction and application of MLS operators.
pub struct MlsExecutor;

impl MlsExecutor {
    /// Build the operator tables for `sources` and `targets` using index `I`.
    pub fn build<T, I, S, G>(
        sources: &S,
        targets: &G,
        config: &MlsConfig<T>,
    ) -> Result<OperatorTables<T>, MlsError>
    where
        T: FloatLinalg,
        I: SpatialIndex<T>,
        S: PointSet + ?Sized,
        G: PointSet + ?Sized,
        S::Coord: AsPrimitive<T>,
        G::Coord: AsPrimitive<T>,
    {
        config.validate()?;

        let dimension = sources.dimension();
        Validator::validate_dimensions(dimension, targets.dimension())?;

        let n = sources.len();
        let m = targets.len();
        let k = config
            .neighbors
            .unwrap_or_else(|| config.polynomial_degree.num_coefficients_nd(dimension));
        Validator::validate_neighbor_count(k, n)?;

        let degree = config.polynomial_degree.clamp_to_terms(dimension, k);
        if degree != config.polynomial_degree {
            log::warn!(
                "{} neighbors cannot determine a degree-{} fit in {}D; fitting degree {}",
                k,
                config.polynomial_degree.value(),
                dimension,
                degree.value()
            );
        }

        let source_flat: Vec<T> = flatten_points(sources, "source")?;
        let target_flat: Vec<T> = flatten_points(targets, "target")?;

        let mut solver = CoefficientSolver::new(
            dimension,
            degree,
            config.weight_function,
            config.support_radius,
            config.rank_policy,
        );
        if let Some(rcond) = config.rcond {
            solver = solver.with_rcond(rcond);
        }

        log::debug!(
            "building MLS operator: {} sources, {} targets, {}D, K={}, P={}, kernel={}, degree={}",
            n,
            m,
            dimension,
            k,
            solver.num_terms(),
            config.weight_function.name(),
            degree.value()
        );

        install(config.threads, || {
            let tables = gather_neighbors::<T, I>(&source_flat, &target_flat, dimension, k)?;

            log::trace!("solving {} local systems", m);
            let coefficients = solver.solve_all(&target_flat, &tables.coordinates, k)?;

            Ok(OperatorTables {
                indices: tables.indices,
                coefficients,
                num_sources: n,
                num_targets: m,
                num_neighbors: k,
                polynomial_degree: degree,
            })
        })?
    }

    /// Compute `out[t] = Σ_j coefficients[t*K + j] · values[indices[t*K + j]]`.
    ///
    /// `out` must already hold one slot per target.
    pub fn apply<T, V>(indices: &[usize], coefficients: &[T], k: usize, values: &[V], out: &mut [V])
    where
        T: FloatLinalg,
        V: FieldValue<T>,
    {
        for_each_row(out, 1, |t, slot| {
            let row_idx = &indices[t * k..(t + 1) * k];
            let row_coeff = &coefficients[t * k..(t + 1) * k];
            let mut acc = V::zeroed();
            for (&src, &w) in row_idx.iter().zip(row_coeff) {
                acc.add_scaled(w, values[src]);
            }
            slot[0] = acc;
        });
    }
}
