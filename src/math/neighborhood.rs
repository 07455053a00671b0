//! Spatial indices for batched k-nearest neighbor queries.
//!
//! ## Purpose
//!
//! This module defines the `SpatialIndex` interface the neighbor gatherer
//! drives, its compressed (CSR) query result, and two exact implementations:
//! a KD-tree for general use and a brute-force index for small inputs and
//! cross-checking.
//!
//! ## Design notes
//!
//! * **Static Construction**: Indices are built once over the source points
//!   and only queried afterwards.
//! * **Eytzinger Layout**: KD-tree nodes are stored as a left-complete binary
//!   tree in an array; children of node `i` are `2i+1` and `2i+2`.
//! * **Batched Queries**: One call answers all targets; each target is
//!   searched independently on the parallel-for with a per-worker buffer.
//!
//! ## Key concepts
//!
//! * **Splitting Plane**: The axis and value used to split points at each node.
//! * **Pruning**: Skipping branches that cannot contain nearer neighbors.
//! * **CSR result**: flat neighbor indices plus `M + 1` offsets.
//!
//! ## Invariants
//!
//! * Queries return exact nearest neighbors (no approximation).
//! * A query for `k` neighbors returns `min(k, len())` per target.
//! * Order within a target's segment is unspecified, as is tie-breaking
//!   among equidistant points.
//!
//! ## Non-goals
//!
//! * Dynamic insertions or deletions.
//! * Approximate nearest neighbor search.

use core::cmp::Ordering::{self, Equal};

use num_traits::Float;

use crate::math::distance::{Euclidean, PointDistance};
use crate::primitives::buffer::NeighborhoodSearchBuffer;
use crate::primitives::parallel::for_each_row_init;

// ============================================================================
// Query Result
// ============================================================================

/// Compressed result of a batched k-nearest query.
///
/// Neighbors of target `i` are `indices[offsets[i]..offsets[i + 1]]`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct KnnQuery {
    /// Source indices of all neighbors, segment by segment.
    pub indices: Vec<usize>,
    /// Segment boundaries, length `num_targets + 1`.
    pub offsets: Vec<usize>,
}

impl KnnQuery {
    /// Build a result where each of `num_targets` targets has exactly `k`
    /// consecutive neighbors.
    pub fn uniform(indices: Vec<usize>, num_targets: usize, k: usize) -> Self {
        debug_assert_eq!(indices.len(), num_targets * k);
        let offsets = (0..=num_targets).map(|i| i * k).collect();
        Self { indices, offsets }
    }

    /// Number of targets answered.
    pub fn num_targets(&self) -> usize {
        self.offsets.len().saturating_sub(1)
    }

    /// Neighbors of target `i`.
    pub fn segment(&self, i: usize) -> &[usize] {
        &self.indices[self.offsets[i]..self.offsets[i + 1]]
    }
}

// ============================================================================
// SpatialIndex Trait
// ============================================================================

/// Search structure over a fixed point set.
pub trait SpatialIndex<T: Float>: Sized {
    /// Build the index over row-major `points` of the given dimension.
    fn build(points: &[T], dimensions: usize) -> Self;

    /// Number of indexed points.
    fn len(&self) -> usize;

    /// Returns true if no points are indexed.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Find the `k` nearest indexed points of every row-major target.
    fn query_knn(&self, targets: &[T], k: usize) -> KnnQuery;
}

// ============================================================================
// Helper Types
// ============================================================================

/// Max-heap entry for k-nearest search, ordered by distance (second field).
#[derive(Debug, Clone, Copy)]
pub struct NodeDistance<T>(pub usize, pub T);

impl<T: PartialEq> PartialEq for NodeDistance<T> {
    fn eq(&self, other: &Self) -> bool {
        self.1 == other.1
    }
}
impl<T: PartialEq> Eq for NodeDistance<T> {}

impl<T: PartialOrd> PartialOrd for NodeDistance<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl<T: PartialOrd> Ord for NodeDistance<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.1.partial_cmp(&other.1).unwrap_or(Equal)
    }
}

// ============================================================================
// KD-Tree Implementation
// ============================================================================

/// KD-tree over nD points in Eytzinger layout.
#[derive(Debug, Clone)]
pub struct KDTree<T: Float> {
    /// Original index of the point stored at each tree slot.
    nodes: Vec<usize>,
    /// Points permuted into tree order for cache locality.
    points: Vec<T>,
    /// Dimensionality of the data.
    dimensions: usize,
}

impl<T: Float> KDTree<T> {
    /// Build a KD-tree from a flattened data array.
    pub fn new(points: &[T], dimensions: usize) -> Self {
        if dimensions == 0 {
            return Self {
                nodes: Vec::new(),
                points: Vec::new(),
                dimensions,
            };
        }

        let n = points.len() / dimensions;
        let mut order: Vec<usize> = (0..n).collect();
        let mut nodes = vec![0; n];
        let mut permuted = vec![T::zero(); n * dimensions];

        Self::build_recursive(points, dimensions, &mut order, 0, &mut nodes, &mut permuted, 0);

        Self {
            nodes,
            points: permuted,
            dimensions,
        }
    }

    /// Dimensionality of the indexed points.
    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// Find the `k` nearest points to `query`, writing their original indices
    /// into `out` (unordered). Returns the distance to the farthest of them.
    pub fn find_k_nearest<D: PointDistance<T>>(
        &self,
        query: &[T],
        k: usize,
        dist_calc: &D,
        buffer: &mut NeighborhoodSearchBuffer<NodeDistance<T>>,
        out: &mut [usize],
    ) -> T {
        buffer.clear();
        if k == 0 || self.nodes.is_empty() {
            return T::zero();
        }

        self.search(query, k, dist_calc, buffer);

        for (slot, &NodeDistance(idx, _)) in out.iter_mut().zip(buffer.heap.iter()) {
            *slot = idx;
        }
        let raw_max = buffer.heap.peek().map(|nd| nd.1).unwrap_or_else(T::zero);
        dist_calc.post_process_distance(raw_max)
    }

    /// Recursively place the median of `order` along `axis` at `slot`.
    fn build_recursive(
        points: &[T],
        dims: usize,
        order: &mut [usize],
        depth: usize,
        nodes: &mut [usize],
        permuted: &mut [T],
        slot: usize,
    ) {
        if order.is_empty() {
            return;
        }

        let axis = depth % dims;
        // Pivot rank that keeps the tree left-complete.
        let median = Self::calculate_left_subtree_size(order.len());
        order.select_nth_unstable_by(median, |&a, &b| {
            points[a * dims + axis]
                .partial_cmp(&points[b * dims + axis])
                .unwrap_or(Equal)
        });

        let point_idx = order[median];
        nodes[slot] = point_idx;
        permuted[slot * dims..(slot + 1) * dims]
            .copy_from_slice(&points[point_idx * dims..(point_idx + 1) * dims]);

        let (left, rest) = order.split_at_mut(median);
        let right = &mut rest[1..];
        Self::build_recursive(points, dims, left, depth + 1, nodes, permuted, 2 * slot + 1);
        Self::build_recursive(points, dims, right, depth + 1, nodes, permuted, 2 * slot + 2);
    }

    /// Iterative depth-first search with an explicit `(slot, axis)` stack.
    fn search<D: PointDistance<T>>(
        &self,
        query: &[T],
        k: usize,
        dist_calc: &D,
        buffer: &mut NeighborhoodSearchBuffer<NodeDistance<T>>,
    ) {
        let d = self.dimensions;
        let n_nodes = self.nodes.len();
        let heap = &mut buffer.heap;
        let stack = &mut buffer.stack;

        let mut max_dist = T::infinity();
        stack.push((0, 0));

        while let Some((slot, axis)) = stack.pop() {
            let node_point = &self.points[slot * d..(slot + 1) * d];

            let dist = dist_calc.distance_squared(query, node_point);
            if heap.len() < k {
                heap.push(NodeDistance(self.nodes[slot], dist));
                if heap.len() == k {
                    max_dist = heap.peek().map(|nd| nd.1).unwrap_or_else(T::infinity);
                }
            } else if dist < max_dist {
                if let Some(mut top) = heap.peek_mut() {
                    *top = NodeDistance(self.nodes[slot], dist);
                }
                max_dist = heap.peek().map(|nd| nd.1).unwrap_or_else(T::infinity);
            }

            let left = 2 * slot + 1;
            if left >= n_nodes {
                continue;
            }
            let right = left + 1;
            let has_right = right < n_nodes;
            let next_axis = if axis + 1 == d { 0 } else { axis + 1 };

            let split_val = node_point[axis];
            let query_left = query[axis] <= split_val;
            let (near, far) = if query_left { (left, right) } else { (right, left) };
            let near_exists = query_left || has_right;
            let far_exists = !query_left || has_right;

            // Far side first so the near side is popped next.
            if far_exists {
                let plane = dist_calc.split_distance_squared(axis, split_val, query[axis]);
                if heap.len() < k || plane < max_dist {
                    stack.push((far, next_axis));
                }
            }
            if near_exists {
                stack.push((near, next_axis));
            }
        }
    }

    /// Number of nodes in the left subtree of a left-complete tree of size `n`.
    pub fn calculate_left_subtree_size(n: usize) -> usize {
        if n <= 1 {
            return 0;
        }
        // Height of the last level: h = floor(log2(n))
        let h = (usize::BITS - n.leading_zeros() - 1) as usize;
        let last_level_capacity = 1 << h;
        let last_level_count = n - (last_level_capacity - 1);

        let left_leaves = last_level_count.min(last_level_capacity / 2);
        (last_level_capacity / 2 - 1) + left_leaves
    }
}

impl<T: Float + Send + Sync> SpatialIndex<T> for KDTree<T> {
    fn build(points: &[T], dimensions: usize) -> Self {
        KDTree::new(points, dimensions)
    }

    fn len(&self) -> usize {
        self.nodes.len()
    }

    fn query_knn(&self, targets: &[T], k: usize) -> KnnQuery {
        let d = self.dimensions;
        let k = k.min(self.nodes.len());
        let m = if d == 0 { 0 } else { targets.len() / d };
        let mut indices = vec![0; m * k];

        for_each_row_init(
            &mut indices,
            k,
            || NeighborhoodSearchBuffer::new(k),
            |buffer, t, row| {
                let query = &targets[t * d..(t + 1) * d];
                self.find_k_nearest(query, k, &Euclidean, buffer, row);
            },
        );

        KnnQuery::uniform(indices, m, k)
    }
}

// ============================================================================
// Brute Force
// ============================================================================

/// Exhaustive exact k-nearest search; O(N) per target.
#[derive(Debug, Clone)]
pub struct BruteForce<T> {
    points: Vec<T>,
    dimensions: usize,
}

impl<T: Float + Send + Sync> SpatialIndex<T> for BruteForce<T> {
    fn build(points: &[T], dimensions: usize) -> Self {
        Self {
            points: points.to_vec(),
            dimensions,
        }
    }

    fn len(&self) -> usize {
        if self.dimensions == 0 {
            0
        } else {
            self.points.len() / self.dimensions
        }
    }

    fn query_knn(&self, targets: &[T], k: usize) -> KnnQuery {
        let d = self.dimensions;
        let n = self.len();
        let k = k.min(n);
        let m = if d == 0 { 0 } else { targets.len() / d };
        let mut indices = vec![0; m * k];

        for_each_row_init(
            &mut indices,
            k,
            || Vec::with_capacity(n),
            |scratch: &mut Vec<NodeDistance<T>>, t, row| {
                let query = &targets[t * d..(t + 1) * d];
                scratch.clear();
                scratch.extend(self.points.chunks_exact(d).enumerate().map(|(i, p)| {
                    NodeDistance(i, Euclidean::squared(query, p))
                }));
                scratch.select_nth_unstable(k - 1);
                for (slot, nd) in row.iter_mut().zip(scratch.iter()) {
                    *slot = nd.0;
                }
            },
        );

        KnnQuery::uniform(indices, m, k)
    }
}
