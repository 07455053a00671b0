//! Neighbor gathering for MLS construction.
//!
//! ## Purpose
//!
//! This module drives a `SpatialIndex` over the source points, issues one
//! batched k-nearest query for all targets, and reshapes the compressed
//! result into two dense row-major tables: neighbor source indices and
//! neighbor coordinates.
//!
//! ## Design notes
//!
//! * **Validate first**: The neighbor count is checked before the index is
//!   built, and the query result is checked before any table is filled.
//! * **Contiguous tables**: Both tables are single `M * K` (and `M * K * D`)
//!   buffers with stride indexing.
//!
//! ## Invariants
//!
//! * Every row holds exactly `K` in-range source indices.
//! * `coordinates` row `t`, slot `j` is the source point `indices[t * K + j]`.
//! * Order within a row is unspecified.
//!
//! ## Non-goals
//!
//! * This module does not sort neighbors by distance.

use num_traits::Float;

use crate::engine::validator::Validator;
use crate::math::neighborhood::{KnnQuery, SpatialIndex};
use crate::primitives::errors::MlsError;
use crate::primitives::parallel::for_each_row;

// ============================================================================
// Neighbor Tables
// ============================================================================

/// Dense per-target neighbor layout produced by [`gather_neighbors`].
#[derive(Debug, Clone, PartialEq)]
pub struct NeighborTables<T> {
    /// Source index of neighbor `j` of target `t` at `t * K + j`.
    pub indices: Vec<usize>,
    /// Coordinates of neighbor `j` of target `t` at `(t * K + j) * D`.
    pub coordinates: Vec<T>,
    /// Number of targets `M`.
    pub num_targets: usize,
    /// Neighbors per target `K`.
    pub num_neighbors: usize,
    /// Point dimension `D`.
    pub dimension: usize,
}

impl<T> NeighborTables<T> {
    /// Source indices of target `t`'s neighbors.
    pub fn row_indices(&self, t: usize) -> &[usize] {
        let k = self.num_neighbors;
        &self.indices[t * k..(t + 1) * k]
    }

    /// Flattened coordinates of target `t`'s neighbors.
    pub fn row_coordinates(&self, t: usize) -> &[T] {
        let stride = self.num_neighbors * self.dimension;
        &self.coordinates[t * stride..(t + 1) * stride]
    }
}

// ============================================================================
// Gathering
// ============================================================================

/// Find the `k` nearest sources of every target and lay them out densely.
///
/// `sources` and `targets` are row-major with `dimension` coordinates per
/// point. Fails with `InvalidNeighborCount` before building the index when
/// `k` is zero or exceeds the number of sources.
pub fn gather_neighbors<T, I>(
    sources: &[T],
    targets: &[T],
    dimension: usize,
    k: usize,
) -> Result<NeighborTables<T>, MlsError>
where
    T: Float + Send + Sync,
    I: SpatialIndex<T>,
{
    if dimension == 0 {
        return Err(MlsError::EmptyDimension);
    }
    let n = sources.len() / dimension;
    let m = targets.len() / dimension;
    Validator::validate_neighbor_count(k, n)?;

    log::trace!("building spatial index over {} sources", n);
    let index = I::build(sources, dimension);

    log::trace!("querying {} nearest neighbors for {} targets", k, m);
    let query = index.query_knn(targets, k);
    Validator::validate_query(&query, m, k, n)?;

    let indices = compact_rows(query, m, k);

    let mut coordinates = vec![T::zero(); m * k * dimension];
    for_each_row(&mut coordinates, k * dimension, |t, row| {
        let neighbors = &indices[t * k..(t + 1) * k];
        for (slot, &src) in row.chunks_exact_mut(dimension).zip(neighbors) {
            slot.copy_from_slice(&sources[src * dimension..(src + 1) * dimension]);
        }
    });

    Ok(NeighborTables {
        indices,
        coordinates,
        num_targets: m,
        num_neighbors: k,
        dimension,
    })
}

/// Turn a validated query into a dense `m * k` table, reusing its buffer
/// when the segments are already packed.
fn compact_rows(query: KnnQuery, m: usize, k: usize) -> Vec<usize> {
    let packed = query.indices.len() == m * k && query.offsets.first() == Some(&0);
    if packed {
        return query.indices;
    }

    let mut table = Vec::with_capacity(m * k);
    for t in 0..m {
        table.extend_from_slice(query.segment(t));
    }
    table
}
