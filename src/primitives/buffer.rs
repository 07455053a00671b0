//! Per-worker scratch space for neighbor search and local solves.
//!
//! ## Purpose
//!
//! Each worker in a parallel-for owns one of these buffers, so the hot loops
//! over targets run without allocating. Buffers are sized once for the fixed
//! neighbor count and basis size of an operator.
//!
//! ## Invariants
//!
//! * Buffers are only logically cleared between targets, never shrunk.
//! * One buffer per worker; buffers are never shared between threads.

use std::collections::BinaryHeap;

use num_traits::Float;

// ============================================================================
// Search Buffer
// ============================================================================

/// Reusable heap and traversal stack for KD-tree k-nearest searches.
pub struct NeighborhoodSearchBuffer<N> {
    pub(crate) heap: BinaryHeap<N>,
    pub(crate) stack: Vec<(usize, usize)>,
}

impl<N: Ord> NeighborhoodSearchBuffer<N> {
    /// Create a search buffer for `k` neighbors.
    pub fn new(k: usize) -> Self {
        // Stack depth tracks tree height; 32 covers ~4 billion points.
        Self {
            heap: BinaryHeap::with_capacity(k),
            stack: Vec::with_capacity(32),
        }
    }

    /// Clear all internal buffers for reuse.
    pub fn clear(&mut self) {
        self.heap.clear();
        self.stack.clear();
    }
}

// ============================================================================
// Solve Buffer
// ============================================================================

/// Scratch for one weighted local least-squares solve.
#[derive(Debug, Clone)]
pub struct SolveBuffer<T> {
    /// Kernel weight per neighbor (the diagonal of W).
    pub kernel_weights: Vec<T>,
    /// Design matrix A, row-major `K x P`.
    pub design: Vec<T>,
    /// Gram matrix AᵗWA, `P x P`.
    pub gram: Vec<T>,
    /// Solution c of the normal equations.
    pub solution: Vec<T>,
    /// Scaled displacement of one neighbor.
    pub displacement: Vec<T>,
}

impl<T: Float> SolveBuffer<T> {
    /// Allocate scratch for `k` neighbors, `n_terms` basis terms and `dims` coordinates.
    pub fn new(k: usize, n_terms: usize, dims: usize) -> Self {
        Self {
            kernel_weights: vec![T::zero(); k],
            design: vec![T::zero(); k * n_terms],
            gram: vec![T::zero(); n_terms * n_terms],
            solution: vec![T::zero(); n_terms],
            displacement: vec![T::zero(); dims],
        }
    }
}
