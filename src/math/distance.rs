//! Distance computation between nD points.
//!
//! ## Purpose
//!
//! This module provides the Euclidean metric used for neighbor search and
//! kernel weighting, and the `PointDistance` trait the KD-tree is generic
//! over.
//!
//! ## Design notes
//!
//! * **Squared comparisons**: Search compares squared distances and takes
//!   the square root only for reported distances.
//! * **Decoupling**: Distance is separate from kernel evaluation; the kernel
//!   only sees distances normalized by the support radius.
//!
//! ## Invariants
//!
//! * Distance is always non-negative.
//! * Distance is zero if and only if the points are identical.

use num_traits::Float;

// ============================================================================
// PointDistance Trait
// ============================================================================

/// Distance calculations used by the KD-tree search.
pub trait PointDistance<T: Float> {
    /// Squared distance between two points (comparison space).
    fn distance_squared(&self, a: &[T], b: &[T]) -> T;

    /// Squared distance from the query to a splitting plane along `dim`.
    fn split_distance_squared(&self, dim: usize, split_val: T, query_val: T) -> T;

    /// Map a comparison-space distance back to the metric space.
    fn post_process_distance(&self, d: T) -> T;
}

// ============================================================================
// Euclidean
// ============================================================================

/// Standard Euclidean distance: √(Σ(xᵢ - yᵢ)²)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Euclidean;

impl Euclidean {
    /// Squared Euclidean distance.
    #[inline]
    pub fn squared<T: Float>(a: &[T], b: &[T]) -> T {
        debug_assert_eq!(a.len(), b.len(), "Points must have same dimension");
        a.iter()
            .zip(b.iter())
            .map(|(&ai, &bi)| {
                let diff = ai - bi;
                diff * diff
            })
            .fold(T::zero(), |acc, x| acc + x)
    }

    /// Euclidean distance.
    #[inline]
    pub fn distance<T: Float>(a: &[T], b: &[T]) -> T {
        Self::squared(a, b).sqrt()
    }
}

impl<T: Float> PointDistance<T> for Euclidean {
    #[inline]
    fn distance_squared(&self, a: &[T], b: &[T]) -> T {
        Euclidean::squared(a, b)
    }

    #[inline]
    fn split_distance_squared(&self, _dim: usize, split_val: T, query_val: T) -> T {
        let diff = query_val - split_val;
        diff * diff
    }

    #[inline]
    fn post_process_distance(&self, d: T) -> T {
        d.sqrt()
    }
}
