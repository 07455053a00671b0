//! Monomial basis for local polynomial fits.
//!
//! ## Purpose
//!
//! This module enumerates the monomials of total degree `<= d` in `D`
//! variables and evaluates them at a displacement vector. Row `j` of an MLS
//! design matrix is this basis evaluated at `q_j - p`.
//!
//! ## Design notes
//!
//! * **Graded order**: Terms are ordered by degree, then lexicographically
//!   by non-decreasing axis: `1, x, y, x², xy, y², ...`. Term 0 is always the
//!   constant.
//! * **Recurrence**: Each term of degree `g > 0` is a term of degree `g - 1`
//!   times one coordinate. The (parent, axis) pairs are computed once, so
//!   evaluation costs one multiply per term.
//!
//! ## Invariants
//!
//! * `len() == C(D + d, d)`.
//! * `evaluate` writes exactly `len()` values, the first being `1`.

use num_traits::Float;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

// ============================================================================
// Polynomial Degree
// ============================================================================

/// Polynomial degree of the local fit (the exactness order).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PolynomialDegree {
    /// Degree 0: reproduces constants (Shepard-like weights)
    Constant,

    /// Degree 1: reproduces linear fields
    Linear,

    /// Degree 2: reproduces quadratic fields (default)
    #[default]
    Quadratic,

    /// Degree 3: reproduces cubic fields
    Cubic,

    /// Degree 4: reproduces quartic fields
    Quartic,
}

impl PolynomialDegree {
    /// Get the numeric degree value.
    #[inline]
    pub const fn value(&self) -> usize {
        match self {
            PolynomialDegree::Constant => 0,
            PolynomialDegree::Linear => 1,
            PolynomialDegree::Quadratic => 2,
            PolynomialDegree::Cubic => 3,
            PolynomialDegree::Quartic => 4,
        }
    }

    /// Number of basis terms in `dimensions` variables: `C(dimensions + d, d)`.
    #[inline]
    pub const fn num_coefficients_nd(&self, dimensions: usize) -> usize {
        let d = self.value();
        // Multiplicative binomial; every partial product divides exactly.
        let mut acc = 1;
        let mut i = 1;
        while i <= d {
            acc = acc * (dimensions + i) / i;
            i += 1;
        }
        acc
    }

    /// The degree one below this one, saturating at `Constant`.
    #[inline]
    pub const fn lower(&self) -> Self {
        match self {
            PolynomialDegree::Constant | PolynomialDegree::Linear => PolynomialDegree::Constant,
            PolynomialDegree::Quadratic => PolynomialDegree::Linear,
            PolynomialDegree::Cubic => PolynomialDegree::Quadratic,
            PolynomialDegree::Quartic => PolynomialDegree::Cubic,
        }
    }

    /// Highest degree `<= self` whose basis has at most `max_terms` terms in
    /// `dimensions` variables. `Constant` always fits.
    pub fn clamp_to_terms(&self, dimensions: usize, max_terms: usize) -> Self {
        let mut degree = *self;
        while degree != PolynomialDegree::Constant
            && degree.num_coefficients_nd(dimensions) > max_terms
        {
            degree = degree.lower();
        }
        degree
    }
}

// ============================================================================
// Polynomial Basis
// ============================================================================

/// Monomial basis of a fixed dimension and degree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolynomialBasis {
    dimension: usize,
    degree: PolynomialDegree,
    /// For term `t > 0`: term `t` = term `parent` * x[`axis`].
    recurrence: Vec<(usize, usize)>,
}

impl PolynomialBasis {
    /// Build the basis for `dimension` variables.
    pub fn new(dimension: usize, degree: PolynomialDegree) -> Self {
        let n_terms = degree.num_coefficients_nd(dimension);
        let mut recurrence = Vec::with_capacity(n_terms);
        // Last (largest) axis of each term; the constant has none.
        let mut last_axis: Vec<usize> = Vec::with_capacity(n_terms);

        recurrence.push((0, 0));
        last_axis.push(0);

        // Terms of the previous degree occupy [prev_start, prev_end).
        let mut prev_start = 0;
        let mut prev_end = 1;
        for g in 1..=degree.value() {
            for parent in prev_start..prev_end {
                let first_axis = if g == 1 { 0 } else { last_axis[parent] };
                for axis in first_axis..dimension {
                    recurrence.push((parent, axis));
                    last_axis.push(axis);
                }
            }
            prev_start = prev_end;
            prev_end = recurrence.len();
        }

        debug_assert_eq!(recurrence.len(), n_terms);
        Self {
            dimension,
            degree,
            recurrence,
        }
    }

    /// Number of basis terms `P`.
    #[inline]
    pub fn len(&self) -> usize {
        self.recurrence.len()
    }

    /// Always false: the constant term is present for every degree.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.recurrence.is_empty()
    }

    /// Number of variables.
    #[inline]
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Polynomial degree.
    #[inline]
    pub fn degree(&self) -> PolynomialDegree {
        self.degree
    }

    /// Exponent of each axis in term `t`.
    pub fn exponents(&self, t: usize) -> Vec<usize> {
        let mut exps = vec![0; self.dimension];
        let mut term = t;
        while term != 0 {
            let (parent, axis) = self.recurrence[term];
            exps[axis] += 1;
            term = parent;
        }
        exps
    }

    /// Evaluate every term at `x`, writing `len()` values into `out`.
    #[inline]
    pub fn evaluate<T: Float>(&self, x: &[T], out: &mut [T]) {
        debug_assert_eq!(x.len(), self.dimension);
        debug_assert!(out.len() >= self.len());

        out[0] = T::one();
        for (t, &(parent, axis)) in self.recurrence.iter().enumerate().skip(1) {
            out[t] = out[parent] * x[axis];
        }
    }
}
