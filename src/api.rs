//! High-level API for MLS interpolation operators.
//!
//! ## Purpose
//!
//! This module provides the user-facing entry points: a fluent builder for
//! configuring the operator and the operator itself, which owns the neighbor
//! index and coefficient tables and applies them to field values.
//!
//! ## Design notes
//!
//! * **Ergonomic**: Fluent builder with sensible defaults for all parameters.
//! * **Validated**: Parameters are validated when `.build()` is called; a
//!   parameter set twice is reported instead of silently overwritten.
//! * **Build once, apply many**: Construction does the neighbor search and
//!   every local solve; `interpolate` is a sparse matrix-vector product.
//!
//! ## Key concepts
//!
//! * **Configuration Flow**: `MovingLeastSquares::builder()`, chained setters,
//!   then `.build(&sources, &targets)`.
//! * **Atomic Construction**: Either a complete operator or an error; no
//!   partially built operator is ever returned.
//!
//! ### Configuration Flow
//!
//! 1. Create an [`MlsBuilder`] via `MovingLeastSquares::builder()`.
//! 2. Chain configuration methods (`.degree()`, `.neighbors()`, etc.).
//! 3. Call `.build(&sources, &targets)` to run the search and solve.
//! 4. Call `.interpolate(&values)` as many times as needed.

use num_traits::AsPrimitive;

use crate::engine::executor::{MlsExecutor, OperatorTables};
use crate::engine::validator::Validator;
use crate::math::linalg::FloatLinalg;
use crate::math::neighborhood::{KDTree, SpatialIndex};
use crate::primitives::points::PointSet;
use crate::primitives::values::FieldValue;

// Publicly re-exported types
pub use crate::algorithms::solver::SupportRadius;
pub use crate::engine::executor::MlsConfig;
pub use crate::math::basis::PolynomialDegree;
pub use crate::math::kernel::WeightFunction;
pub use crate::math::linalg::RankPolicy;
pub use crate::math::neighborhood::BruteForce;
pub use crate::primitives::errors::{ErrorKind, MlsError};
pub use crate::primitives::points::FlatPoints;

// ============================================================================
// Builder
// ============================================================================

/// Fluent builder for [`MovingLeastSquares`].
#[derive(Debug, Clone)]
pub struct MlsBuilder<T> {
    /// Kernel (support weight shape).
    pub weight_function: Option<WeightFunction>,

    /// Polynomial exactness order.
    pub polynomial_degree: Option<PolynomialDegree>,

    /// Neighbors per target.
    pub neighbors: Option<usize>,

    /// Support radius policy.
    pub support_radius: Option<SupportRadius<T>>,

    /// Rank-deficiency strategy.
    pub rank_policy: Option<RankPolicy>,

    /// Relative eigenvalue cutoff.
    pub rcond: Option<T>,

    /// Dedicated worker count for construction.
    pub threads: Option<usize>,

    /// First invalid value seen by a setter that cannot fail eagerly.
    #[doc(hidden)]
    pub deferred_error: Option<MlsError>,

    /// Tracks if any parameter was set multiple times (for validation).
    #[doc(hidden)]
    pub duplicate_param: Option<&'static str>,
}

impl<T: FloatLinalg> Default for MlsBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: FloatLinalg> MlsBuilder<T> {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self {
            weight_function: None,
            polynomial_degree: None,
            neighbors: None,
            support_radius: None,
            rank_policy: None,
            rcond: None,
            threads: None,
            deferred_error: None,
            duplicate_param: None,
        }
    }

    /// Set the kernel.
    pub fn kernel(mut self, wf: WeightFunction) -> Self {
        if self.weight_function.is_some() {
            self.duplicate_param = Some("kernel");
        }
        self.weight_function = Some(wf);
        self
    }

    /// Set the kernel by smoothness order (0, 2, 4 or 6).
    ///
    /// An unsupported order is reported by `build`.
    pub fn kernel_order(self, order: usize) -> Self {
        match WeightFunction::from_smoothness(order) {
            Ok(wf) => self.kernel(wf),
            Err(err) => {
                let mut this = self;
                if this.weight_function.is_some() {
                    this.duplicate_param = Some("kernel");
                }
                this.deferred_error.get_or_insert(err);
                this
            }
        }
    }

    /// Set the polynomial degree.
    pub fn degree(mut self, degree: PolynomialDegree) -> Self {
        if self.polynomial_degree.is_some() {
            self.duplicate_param = Some("degree");
        }
        self.polynomial_degree = Some(degree);
        self
    }

    /// Set the number of neighbors per target.
    pub fn neighbors(mut self, k: usize) -> Self {
        if self.neighbors.is_some() {
            self.duplicate_param = Some("neighbors");
        }
        self.neighbors = Some(k);
        self
    }

    /// Set the support radius policy.
    pub fn support_radius(mut self, policy: SupportRadius<T>) -> Self {
        if self.support_radius.is_some() {
            self.duplicate_param = Some("support_radius");
        }
        self.support_radius = Some(policy);
        self
    }

    /// Set the rank-deficiency strategy.
    pub fn rank_policy(mut self, policy: RankPolicy) -> Self {
        if self.rank_policy.is_some() {
            self.duplicate_param = Some("rank_policy");
        }
        self.rank_policy = Some(policy);
        self
    }

    /// Set the relative eigenvalue cutoff.
    pub fn rcond(mut self, rcond: T) -> Self {
        if self.rcond.is_some() {
            self.duplicate_param = Some("rcond");
        }
        self.rcond = Some(rcond);
        self
    }

    /// Run construction on a dedicated pool of `threads` workers.
    pub fn threads(mut self, threads: usize) -> Self {
        if self.threads.is_some() {
            self.duplicate_param = Some("threads");
        }
        self.threads = Some(threads);
        self
    }

    /// Resolve the builder into a plain configuration.
    pub fn into_config(self) -> Result<MlsConfig<T>, MlsError> {
        Validator::validate_no_duplicates(self.duplicate_param)?;
        if let Some(err) = self.deferred_error {
            return Err(err);
        }

        let defaults = MlsConfig::default();
        Ok(MlsConfig {
            weight_function: self.weight_function.unwrap_or(defaults.weight_function),
            polynomial_degree: self.polynomial_degree.unwrap_or(defaults.polynomial_degree),
            neighbors: self.neighbors,
            support_radius: self.support_radius.unwrap_or(defaults.support_radius),
            rank_policy: self.rank_policy.unwrap_or(defaults.rank_policy),
            rcond: self.rcond,
            threads: self.threads,
        })
    }

    /// Build the operator over a KD-tree index.
    pub fn build(
        self,
        sources: &(impl PointSet<Coord: AsPrimitive<T>> + ?Sized),
        targets: &(impl PointSet<Coord: AsPrimitive<T>> + ?Sized),
    ) -> Result<MovingLeastSquares<T>, MlsError> {
        self.build_with_index::<KDTree<T>>(sources, targets)
    }

    /// Build the operator over spatial index `I`.
    pub fn build_with_index<I: SpatialIndex<T>>(
        self,
        sources: &(impl PointSet<Coord: AsPrimitive<T>> + ?Sized),
        targets: &(impl PointSet<Coord: AsPrimitive<T>> + ?Sized),
    ) -> Result<MovingLeastSquares<T>, MlsError> {
        let config = self.into_config()?;
        MovingLeastSquares::with_config_and_index::<I>(sources, targets, &config)
    }
}

// ============================================================================
// Operator
// ============================================================================

/// A moving least squares interpolation operator between two point sets.
///
/// Holds only the `M x K` neighbor index and coefficient tables; the point
/// sets and the spatial index are released once construction finishes.
#[derive(Debug, Clone, PartialEq)]
pub struct MovingLeastSquares<T> {
    indices: Vec<usize>,
    coefficients: Vec<T>,
    num_sources: usize,
    num_targets: usize,
    num_neighbors: usize,
    polynomial_degree: PolynomialDegree,
}

impl<T: FloatLinalg> MovingLeastSquares<T> {
    /// Start configuring an operator.
    pub fn builder() -> MlsBuilder<T> {
        MlsBuilder::new()
    }

    /// Build an operator with default settings.
    pub fn new(
        sources: &(impl PointSet<Coord: AsPrimitive<T>> + ?Sized),
        targets: &(impl PointSet<Coord: AsPrimitive<T>> + ?Sized),
    ) -> Result<Self, MlsError> {
        Self::with_config(sources, targets, &MlsConfig::default())
    }

    /// Build an operator from an explicit configuration.
    pub fn with_config(
        sources: &(impl PointSet<Coord: AsPrimitive<T>> + ?Sized),
        targets: &(impl PointSet<Coord: AsPrimitive<T>> + ?Sized),
        config: &MlsConfig<T>,
    ) -> Result<Self, MlsError> {
        Self::with_config_and_index::<KDTree<T>>(sources, targets, config)
    }

    /// Build an operator from an explicit configuration over index `I`.
    pub fn with_config_and_index<I: SpatialIndex<T>>(
        sources: &(impl PointSet<Coord: AsPrimitive<T>> + ?Sized),
        targets: &(impl PointSet<Coord: AsPrimitive<T>> + ?Sized),
        config: &MlsConfig<T>,
    ) -> Result<Self, MlsError> {
        let tables = MlsExecutor::build::<T, I, _, _>(sources, targets, config)?;
        Ok(Self::from_tables(tables))
    }

    fn from_tables(tables: OperatorTables<T>) -> Self {
        Self {
            indices: tables.indices,
            coefficients: tables.coefficients,
            num_sources: tables.num_sources,
            num_targets: tables.num_targets,
            num_neighbors: tables.num_neighbors,
            polynomial_degree: tables.polynomial_degree,
        }
    }

    // ========================================================================
    // Application
    // ========================================================================

    /// Interpolate a source field onto the targets.
    ///
    /// `values` must hold exactly one value per source point.
    pub fn interpolate<V: FieldValue<T>>(&self, values: &[V]) -> Result<Vec<V>, MlsError> {
        let mut out = Vec::new();
        self.interpolate_into(values, &mut out)?;
        Ok(out)
    }

    /// Interpolate into a caller-owned buffer, resized to the target count.
    ///
    /// On error `out` is left untouched.
    pub fn interpolate_into<V: FieldValue<T>>(
        &self,
        values: &[V],
        out: &mut Vec<V>,
    ) -> Result<(), MlsError> {
        Validator::validate_field_len(self.num_sources, values.len())?;

        log::trace!(
            "applying MLS operator: {} values onto {} targets",
            values.len(),
            self.num_targets
        );
        out.clear();
        out.resize(self.num_targets, V::zeroed());
        MlsExecutor::apply(
            &self.indices,
            &self.coefficients,
            self.num_neighbors,
            values,
            out,
        );
        Ok(())
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Number of source points `N`.
    pub fn num_sources(&self) -> usize {
        self.num_sources
    }

    /// Number of target points `M`.
    pub fn num_targets(&self) -> usize {
        self.num_targets
    }

    /// Neighbors per target `K`.
    pub fn num_neighbors(&self) -> usize {
        self.num_neighbors
    }

    /// Degree of the fitted polynomials.
    pub fn polynomial_degree(&self) -> PolynomialDegree {
        self.polynomial_degree
    }

    /// The `M x K` neighbor index table, row-major.
    pub fn neighbor_indices(&self) -> &[usize] {
        &self.indices
    }

    /// The `M x K` coefficient table, row-major.
    pub fn coefficients(&self) -> &[T] {
        &self.coefficients
    }

    /// Neighbor indices and coefficients of target `t`.
    pub fn row(&self, t: usize) -> Option<(&[usize], &[T])> {
        if t >= self.num_targets {
            return None;
        }
        let k = self.num_neighbors;
        let range = t * k..(t + 1) * k;
        Some((&self.indices[range.clone()], &self.coefficients[range]))
    }
}
