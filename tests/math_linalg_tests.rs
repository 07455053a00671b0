//! Tests for the rank-aware Gram solve.
//!
//! ## Test Organization
//!
//! 1. **Full Rank** - Both policies agree with the exact inverse
//! 2. **Rank Deficient** - Pseudo-inverse and QR fallback
//! 3. **Scattered Neighborhoods** - Gram matrices `AᵗWA` against LU
//! 4. **Failure** - Zero and non-finite matrices

use approx::assert_relative_eq;
use nalgebra::{DMatrix, DVector};
use rand::prelude::*;

use mls_rs::internals::math::basis::{PolynomialBasis, PolynomialDegree};
use mls_rs::internals::math::kernel::WeightFunction;
use mls_rs::internals::math::linalg::{FloatLinalg, RankPolicy};

const POLICIES: [RankPolicy; 2] = [RankPolicy::PseudoInverse, RankPolicy::QrWithEigenFallback];

// ============================================================================
// Full Rank
// ============================================================================

#[test]
fn test_diagonal_gram() {
    let gram = [2.0_f64, 0.0, 0.0, 4.0];
    for policy in POLICIES {
        let mut out = [0.0; 2];
        let sol = f64::solve_gram(&gram, 2, policy, 1e-12, &mut out).unwrap();
        assert_eq!(sol.rank, 2);
        assert_relative_eq!(out[0], 0.5, epsilon = 1e-14);
        assert_relative_eq!(out[1], 0.0, epsilon = 1e-14);
    }
}

#[test]
fn test_spd_gram_matches_inverse_column() {
    // G = [[4, 1, 0], [1, 3, 1], [0, 1, 2]]; det = 18, first column of G⁻¹ = [5, -2, 1] / 18.
    let gram = [4.0_f64, 1.0, 0.0, 1.0, 3.0, 1.0, 0.0, 1.0, 2.0];
    for policy in POLICIES {
        let mut out = [0.0; 3];
        let sol = f64::solve_gram(&gram, 3, policy, 1e-12, &mut out).unwrap();
        assert_eq!(sol.rank, 3);
        assert_relative_eq!(out[0], 5.0 / 18.0, epsilon = 1e-12);
        assert_relative_eq!(out[1], -2.0 / 18.0, epsilon = 1e-12);
        assert_relative_eq!(out[2], 1.0 / 18.0, epsilon = 1e-12);
    }
}

#[test]
fn test_f32_solve() {
    let gram = [2.0_f32, 0.0, 0.0, 1.0];
    let mut out = [0.0_f32; 2];
    let sol = f32::solve_gram(&gram, 2, RankPolicy::PseudoInverse, 1e-6, &mut out).unwrap();
    assert_eq!(sol.rank, 2);
    assert_relative_eq!(out[0], 0.5, epsilon = 1e-6);
}

// ============================================================================
// Rank Deficient
// ============================================================================

#[test]
fn test_rank_one_pseudo_inverse() {
    // G = [[1, 1], [1, 1]]; G⁺ = G / 4.
    let gram = [1.0_f64, 1.0, 1.0, 1.0];
    for policy in POLICIES {
        let mut out = [0.0; 2];
        let sol = f64::solve_gram(&gram, 2, policy, 1e-12, &mut out).unwrap();
        assert_eq!(sol.rank, 1);
        assert_relative_eq!(out[0], 0.25, epsilon = 1e-12);
        assert_relative_eq!(out[1], 0.25, epsilon = 1e-12);
    }
}

#[test]
fn test_rcond_truncates_small_singular_values() {
    let gram = [1.0_f64, 0.0, 0.0, 1e-14];
    let mut out = [0.0; 2];
    let sol = f64::solve_gram(&gram, 2, RankPolicy::PseudoInverse, 1e-10, &mut out).unwrap();
    assert_eq!(sol.rank, 1);
    assert_relative_eq!(out[0], 1.0, epsilon = 1e-12);

    let sol = f64::solve_gram(&gram, 2, RankPolicy::PseudoInverse, 1e-16, &mut out).unwrap();
    assert_eq!(sol.rank, 2);
}

// ============================================================================
// Scattered Neighborhoods
// ============================================================================

/// Row-major `AᵗWA` for `k` random displacements in `[-1, 1]^dims`, scaled
/// so the farthest sits at `1 / 1.1` of the support radius.
fn scattered_gram(
    rng: &mut StdRng,
    dims: usize,
    k: usize,
    degree: PolynomialDegree,
) -> (Vec<f64>, usize) {
    let basis = PolynomialBasis::new(dims, degree);
    let p = basis.len();

    let points: Vec<Vec<f64>> = (0..k)
        .map(|_| (0..dims).map(|_| rng.random_range(-1.0..1.0)).collect())
        .collect();
    let norm = |x: &[f64]| x.iter().map(|v| v * v).sum::<f64>().sqrt();
    let h = 1.1 * points.iter().map(|x| norm(x)).fold(0.0, f64::max);

    let mut gram = vec![0.0; p * p];
    let mut row = vec![0.0; p];
    for x in &points {
        let w = WeightFunction::Wendland0.evaluate(norm(x) / h);
        let scaled: Vec<f64> = x.iter().map(|v| v / h).collect();
        basis.evaluate(&scaled, &mut row);
        for a in 0..p {
            for b in 0..p {
                gram[a * p + b] += w * row[a] * row[b];
            }
        }
    }
    (gram, p)
}

#[test]
fn test_scattered_grams_match_lu() {
    let mut rng = StdRng::seed_from_u64(2024);
    let cases = [
        (2, 6, PolynomialDegree::Quadratic),
        (2, 12, PolynomialDegree::Quadratic),
        (3, 10, PolynomialDegree::Quadratic),
        (3, 20, PolynomialDegree::Quadratic),
        (2, 15, PolynomialDegree::Cubic),
    ];

    for (dims, k, degree) in cases {
        for _ in 0..25 {
            let (gram, p) = scattered_gram(&mut rng, dims, k, degree);
            let g = DMatrix::from_row_slice(p, p, &gram);
            let mut e0 = DVector::<f64>::zeros(p);
            e0[0] = 1.0;
            let reference = g.clone().lu().solve(&e0).unwrap();
            let scale = reference.amax();
            let eigenvalues = g.clone().symmetric_eigenvalues();
            let cond = eigenvalues.amax() / eigenvalues.amin();
            // Forward error of any stable solve grows like cond · ε.
            let tol = 1e-13 * cond.max(1.0);

            for policy in POLICIES {
                let mut out = vec![0.0; p];
                let rcond = p as f64 * f64::EPSILON;
                let sol = f64::solve_gram(&gram, p, policy, rcond, &mut out).unwrap();
                assert_eq!(sol.rank, p, "dims={} k={} {:?}", dims, k, policy);

                for (c, r) in out.iter().zip(reference.iter()) {
                    assert!(
                        (c - r).abs() <= tol * scale,
                        "dims={} k={} {:?}: {} vs {}",
                        dims,
                        k,
                        policy,
                        c,
                        r
                    );
                }

                // Constant reproduction hinges on the first residual entry.
                let residual = &g * DVector::from_column_slice(&out) - &e0;
                assert!(residual[0].abs() <= tol, "residual {}", residual[0]);
            }
        }
    }
}

// ============================================================================
// Failure
// ============================================================================

#[test]
fn test_zero_gram_fails() {
    let gram = [0.0_f64; 4];
    for policy in POLICIES {
        let mut out = [0.0; 2];
        assert!(f64::solve_gram(&gram, 2, policy, 1e-12, &mut out).is_none());
    }
}

#[test]
fn test_non_finite_gram_fails() {
    let gram = [1.0_f64, f64::NAN, f64::NAN, 1.0];
    for policy in POLICIES {
        let mut out = [0.0; 2];
        assert!(f64::solve_gram(&gram, 2, policy, 1e-12, &mut out).is_none());
    }
}
