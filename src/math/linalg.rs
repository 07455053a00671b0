//! Linear algebra backend for the weighted normal equations.
//!
//! ## Purpose
//!
//! This module solves the MLS normal equations `G c = e₀`, where
//! `G = AᵗWA` is a small symmetric positive semi-definite Gram matrix and
//! `e₀` selects the constant basis term.
//!
//! ## Design notes
//!
//! * Bridges generic `Float` types to nalgebra through `FloatLinalg`, so
//!   nalgebra's `RealField` methods never collide with `num_traits::Float`.
//! * Rank-aware: the Gram matrix is symmetric, so its pseudo-inverse comes
//!   from a symmetric eigendecomposition. Eigenvalues with
//!   `|λ| <= rcond · |λ|_max` are discarded, giving the minimum-norm solution
//!   on rank-deficient neighborhoods.
//! * The QR path checks the diagonal of R against the same cutoff before
//!   trusting the solve, and falls back to the eigen pseudo-inverse otherwise.

use core::fmt::Debug;

use num_traits::Float;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

// ============================================================================
// Rank Policy
// ============================================================================

/// Strategy for solving possibly ill-conditioned local systems.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum RankPolicy {
    /// Truncated eigendecomposition pseudo-inverse of the Gram matrix (default).
    #[default]
    PseudoInverse,

    /// Householder QR; eigen pseudo-inverse when R is numerically singular.
    QrWithEigenFallback,
}

/// Outcome of a successful Gram solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GramSolution {
    /// Number of eigenvalues kept above the cutoff.
    pub rank: usize,
}

// ============================================================================
// FloatLinalg Trait
// ============================================================================

/// Helper trait to bridge generic Float types to the nalgebra backend.
pub trait FloatLinalg: Float + Debug + Send + Sync + 'static {
    /// Solve `gram · c = e₀` for a column-major `n x n` symmetric `gram`,
    /// writing `c` into `out`. Returns `None` if the matrix is zero or the
    /// decomposition produced non-finite values.
    fn solve_gram(
        gram: &[Self],
        n: usize,
        policy: RankPolicy,
        rcond: Self,
        out: &mut [Self],
    ) -> Option<GramSolution>;
}

impl FloatLinalg for f64 {
    #[inline]
    fn solve_gram(
        gram: &[Self],
        n: usize,
        policy: RankPolicy,
        rcond: Self,
        out: &mut [Self],
    ) -> Option<GramSolution> {
        nalgebra_backend::solve_gram(gram, n, policy, rcond, f64::EPSILON, out)
    }
}

impl FloatLinalg for f32 {
    #[inline]
    fn solve_gram(
        gram: &[Self],
        n: usize,
        policy: RankPolicy,
        rcond: Self,
        out: &mut [Self],
    ) -> Option<GramSolution> {
        nalgebra_backend::solve_gram(gram, n, policy, rcond, f32::EPSILON, out)
    }
}

// ============================================================================
// Nalgebra Backend Implementation
// ============================================================================

/// Nalgebra-based dense solves.
pub mod nalgebra_backend {
    use super::{GramSolution, RankPolicy};
    use nalgebra::{DMatrix, DVector, RealField};

    /// Sweep limit for the symmetric QR iteration; non-convergence fails the solve.
    const MAX_EIGEN_ITERATIONS: usize = 1000;

    /// Solve `gram · c = e₀` under `policy`.
    ///
    /// `eps` is the machine epsilon of `R`, used as the eigen solver's
    /// convergence threshold.
    pub fn solve_gram<R: RealField + Copy>(
        gram: &[R],
        n: usize,
        policy: RankPolicy,
        rcond: R,
        eps: R,
        out: &mut [R],
    ) -> Option<GramSolution> {
        if !gram[..n * n].iter().all(|v| v.is_finite()) {
            return None;
        }
        let matrix = DMatrix::from_column_slice(n, n, &gram[..n * n]);

        if policy == RankPolicy::QrWithEigenFallback {
            let mut rhs = DVector::<R>::zeros(n);
            rhs[0] = R::one();

            let qr = matrix.clone().qr();
            let diag = qr.r().diagonal().map(|v| v.abs());
            let largest = diag.iter().fold(R::zero(), |acc, &v| acc.max(v));
            let smallest = diag.iter().fold(largest, |acc, &v| acc.min(v));
            if largest > R::zero() && smallest > rcond * largest {
                if let Some(solution) = qr.solve(&rhs) {
                    if solution.iter().all(|v| v.is_finite()) {
                        out[..n].copy_from_slice(solution.as_slice());
                        return Some(GramSolution { rank: n });
                    }
                }
            }
        }

        eigen_pseudo_inverse(matrix, n, rcond, eps, out)
    }

    /// First column of the truncated pseudo-inverse:
    /// `c = Σ_{|λ_i| > cutoff} v_i (v_i)₀ / λ_i`.
    fn eigen_pseudo_inverse<R: RealField + Copy>(
        matrix: DMatrix<R>,
        n: usize,
        rcond: R,
        eps: R,
        out: &mut [R],
    ) -> Option<GramSolution> {
        let eigen = matrix.try_symmetric_eigen(eps, MAX_EIGEN_ITERATIONS)?;
        let lambda_max = eigen
            .eigenvalues
            .iter()
            .fold(R::zero(), |acc, &l| acc.max(l.abs()));
        if !(lambda_max > R::zero()) || !lambda_max.is_finite() {
            return None;
        }

        let cutoff = rcond * lambda_max;
        let solution = &mut out[..n];
        solution.iter_mut().for_each(|c| *c = R::zero());

        let mut rank = 0;
        for (i, &lambda) in eigen.eigenvalues.iter().enumerate() {
            if lambda.abs() <= cutoff {
                continue;
            }
            rank += 1;
            let v = eigen.eigenvectors.column(i);
            let scale = v[0] / lambda;
            for (c, &vj) in solution.iter_mut().zip(v.iter()) {
                *c = *c + scale * vj;
            }
        }

        if !solution.iter().all(|v| v.is_finite()) {
            return None;
        }
        Some(GramSolution { rank })
    }
}
