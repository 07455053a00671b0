//! Moving least squares coefficient solve.
//!
//! ## Purpose
//!
//! For each target `p` with neighbors `q_0..q_{K-1}`, this module computes
//! weights `w_j` such that `Σ w_j f(q_j)` reproduces `f(p)` exactly for
//! every polynomial `f` of degree `<= d`.
//!
//! ## Design notes
//!
//! * **Algorithm**: With design matrix `A` (row `j` = basis at `(q_j - p) / h`)
//!   and kernel weights `W = diag(φ(|q_j - p| / h))`, solve
//!   `(AᵗWA) c = e₀` and recover `w_j = W_jj (A c)_j`.
//! * **Scaling**: Displacements are divided by the support radius `h`, which
//!   keeps the Gram matrix entries O(1) without changing the weights.
//! * **Rank-aware**: The Gram solve discards negligible eigenvalues (see
//!   `RankPolicy`), so coplanar or duplicated neighbors still yield a
//!   minimum-norm fit where one exists.
//! * **Independence**: Targets share no state; the batch solve is a
//!   parallel-for over targets with one scratch buffer per worker.
//!
//! ## Invariants
//!
//! * Every returned row sums to 1 within tolerance.
//! * All returned weights are finite.
//!
//! ## Non-goals
//!
//! * This module does not choose the degree or kernel automatically.

use std::sync::atomic::{AtomicUsize, Ordering};

use num_traits::Float;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::math::basis::{PolynomialBasis, PolynomialDegree};
use crate::math::distance::Euclidean;
use crate::math::kernel::WeightFunction;
use crate::math::linalg::{FloatLinalg, GramSolution, RankPolicy};
use crate::primitives::buffer::SolveBuffer;
use crate::primitives::errors::MlsError;
use crate::primitives::parallel::try_for_each_row_init;

// ============================================================================
// Support Radius
// ============================================================================

/// How the kernel support radius `h` of a target is chosen.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SupportRadius<T> {
    /// `h = scale * (distance to the farthest of the K neighbors)`.
    ///
    /// A scale above 1 keeps the farthest neighbor's weight non-zero.
    FarthestNeighbor {
        /// Multiplier on the farthest neighbor distance.
        scale: T,
    },

    /// The same radius for every target.
    Fixed(T),
}

impl<T: Float> SupportRadius<T> {
    /// Scale applied to the farthest neighbor distance by default.
    pub const DEFAULT_SCALE: f64 = 1.1;

    /// The default policy: farthest neighbor distance times 1.1.
    pub fn farthest_neighbor() -> Self {
        SupportRadius::FarthestNeighbor {
            scale: T::from(Self::DEFAULT_SCALE).unwrap_or_else(T::one),
        }
    }

    /// Radius for a target whose farthest neighbor is at `farthest`.
    #[inline]
    pub fn resolve(&self, farthest: T) -> T {
        match *self {
            SupportRadius::FarthestNeighbor { scale } => {
                let h = farthest * scale;
                // Every neighbor sits on the target; any positive radius works.
                if h > T::zero() { h } else { T::one() }
            }
            SupportRadius::Fixed(h) => h,
        }
    }
}

impl<T: Float> Default for SupportRadius<T> {
    fn default() -> Self {
        Self::farthest_neighbor()
    }
}

// ============================================================================
// Coefficient Solver
// ============================================================================

/// Per-target weighted least-squares solver.
#[derive(Debug, Clone)]
pub struct CoefficientSolver<T> {
    basis: PolynomialBasis,
    weight_function: WeightFunction,
    support_radius: SupportRadius<T>,
    rank_policy: RankPolicy,
    rcond: T,
}

impl<T: FloatLinalg> CoefficientSolver<T> {
    /// Create a solver for `dimension`-D points.
    pub fn new(
        dimension: usize,
        degree: PolynomialDegree,
        weight_function: WeightFunction,
        support_radius: SupportRadius<T>,
        rank_policy: RankPolicy,
    ) -> Self {
        let basis = PolynomialBasis::new(dimension, degree);
        let rcond = Self::default_rcond(basis.len());
        Self {
            basis,
            weight_function,
            support_radius,
            rank_policy,
            rcond,
        }
    }

    /// Override the relative eigenvalue cutoff.
    pub fn with_rcond(mut self, rcond: T) -> Self {
        self.rcond = rcond;
        self
    }

    /// Default cutoff for a basis of `n_terms` terms: `n_terms * ε`.
    pub fn default_rcond(n_terms: usize) -> T {
        T::epsilon() * T::from(n_terms.max(1)).unwrap_or_else(T::one)
    }

    /// The polynomial basis.
    pub fn basis(&self) -> &PolynomialBasis {
        &self.basis
    }

    /// Number of basis terms `P`.
    pub fn num_terms(&self) -> usize {
        self.basis.len()
    }

    /// Relative eigenvalue cutoff in use.
    pub fn rcond(&self) -> T {
        self.rcond
    }

    /// Solve one target.
    ///
    /// `neighbors` holds `weights.len()` row-major points around `target`.
    /// On success `weights` holds the interpolation weights.
    pub fn solve_target(
        &self,
        target_index: usize,
        target: &[T],
        neighbors: &[T],
        weights: &mut [T],
    ) -> Result<GramSolution, MlsError> {
        let mut buffer = SolveBuffer::new(weights.len(), self.num_terms(), target.len());
        self.solve_with(&mut buffer, target_index, target, neighbors, weights)
    }

    /// Solve every target, returning the row-major `M x K` weight table.
    ///
    /// `neighbor_coords` holds `K` neighbors per target, row-major. Any
    /// failing target aborts the whole batch.
    pub fn solve_all(
        &self,
        targets: &[T],
        neighbor_coords: &[T],
        k: usize,
    ) -> Result<Vec<T>, MlsError> {
        let d = self.basis.dimension();
        let p = self.num_terms();
        let m = if d == 0 { 0 } else { targets.len() / d };
        let mut coefficients = vec![T::zero(); m * k];
        let rank_deficient = AtomicUsize::new(0);

        try_for_each_row_init(
            &mut coefficients,
            k,
            || SolveBuffer::new(k, p, d),
            |buffer, t, row| {
                let target = &targets[t * d..(t + 1) * d];
                let neighbors = &neighbor_coords[t * k * d..(t + 1) * k * d];
                let solution = self.solve_with(buffer, t, target, neighbors, row)?;
                if solution.rank < p {
                    rank_deficient.fetch_add(1, Ordering::Relaxed);
                }
                Ok(())
            },
        )?;

        let deficient = rank_deficient.into_inner();
        if deficient > 0 {
            log::warn!(
                "{} of {} targets have rank-deficient local systems (coincident or degenerate neighbors); solved with reduced rank",
                deficient,
                m
            );
        }
        Ok(coefficients)
    }

    /// Solve one target with caller-provided scratch.
    pub(crate) fn solve_with(
        &self,
        buffer: &mut SolveBuffer<T>,
        target_index: usize,
        target: &[T],
        neighbors: &[T],
        weights: &mut [T],
    ) -> Result<GramSolution, MlsError> {
        let d = self.basis.dimension();
        let p = self.basis.len();
        let k = weights.len();
        let singular = || MlsError::SingularSystem {
            target: target_index,
        };

        // 1. Distances and support radius
        let mut farthest = T::zero();
        for (j, q) in neighbors.chunks_exact(d).take(k).enumerate() {
            let dist = Euclidean::distance(q, target);
            buffer.kernel_weights[j] = dist;
            farthest = farthest.max(dist);
        }
        let inv_h = T::one() / self.support_radius.resolve(farthest);

        // 2. Kernel weights (diagonal of W)
        let mut any_weight = false;
        for w in buffer.kernel_weights[..k].iter_mut() {
            *w = self.weight_function.evaluate(*w * inv_h);
            any_weight |= *w > T::zero();
        }
        if !any_weight {
            return Err(singular());
        }

        // 3. Design matrix rows at scaled displacements
        for (j, q) in neighbors.chunks_exact(d).take(k).enumerate() {
            for (x, (&qa, &pa)) in buffer.displacement.iter_mut().zip(q.iter().zip(target)) {
                *x = (qa - pa) * inv_h;
            }
            self.basis
                .evaluate(&buffer.displacement, &mut buffer.design[j * p..(j + 1) * p]);
        }

        // 4. Gram matrix AᵗWA (upper triangle, then mirrored)
        let gram = &mut buffer.gram;
        gram.iter_mut().for_each(|g| *g = T::zero());
        for (j, &w) in buffer.kernel_weights[..k].iter().enumerate() {
            if w == T::zero() {
                continue;
            }
            let row = &buffer.design[j * p..(j + 1) * p];
            for a in 0..p {
                let wa = w * row[a];
                for b in a..p {
                    gram[a * p + b] = gram[a * p + b] + wa * row[b];
                }
            }
        }
        for a in 0..p {
            for b in (a + 1)..p {
                gram[b * p + a] = gram[a * p + b];
            }
        }

        // 5. Normal equations (AᵗWA) c = e₀
        let solution = T::solve_gram(
            &buffer.gram,
            p,
            self.rank_policy,
            self.rcond,
            &mut buffer.solution,
        )
        .ok_or_else(singular)?;

        // 6. Weights w_j = W_jj (A c)_j
        let mut sum = T::zero();
        for (j, w) in weights.iter_mut().enumerate() {
            let row = &buffer.design[j * p..(j + 1) * p];
            let ac = row
                .iter()
                .zip(buffer.solution.iter())
                .fold(T::zero(), |acc, (&a, &c)| acc + a * c);
            *w = buffer.kernel_weights[j] * ac;
            sum = sum + *w;
        }

        // 7. Constant exactness check
        let tol = T::epsilon().sqrt() * T::from(p.max(k)).unwrap_or_else(T::one);
        if !sum.is_finite() || (sum - T::one()).abs() > tol {
            return Err(singular());
        }

        Ok(solution)
    }
}
