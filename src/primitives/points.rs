//! Point set access for source and target clouds.
//!
//! ## Purpose
//!
//! This module defines the `PointSet` trait through which the operator reads
//! coordinates, plus the flattening step that converts any point set into the
//! row-major buffer of calculation-precision values used internally.
//!
//! ## Design notes
//!
//! * **Storage-agnostic**: Coordinates may be stored in any primitive type
//!   (`f32`, `f64`, integers) and are converted with `AsPrimitive`.
//! * **Flat layout**: Internally, points are `n * dimension` values, row-major,
//!   the same layout the KD-tree consumes.
//!
//! ## Invariants
//!
//! * Flattened coordinates are finite.
//! * Dimension is at least 1.

use num_traits::{AsPrimitive, Float};

use crate::primitives::errors::MlsError;

// ============================================================================
// PointSet Trait
// ============================================================================

/// Read access to an ordered set of fixed-dimension points.
///
/// The position of a point in the set is its canonical index.
pub trait PointSet {
    /// Coordinate storage type.
    type Coord: Copy;

    /// Number of coordinates per point.
    fn dimension(&self) -> usize;

    /// Number of points.
    fn len(&self) -> usize;

    /// Returns true if the set holds no points.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Coordinate `axis` of point `index`.
    fn coordinate(&self, index: usize, axis: usize) -> Self::Coord;
}

impl<C: Copy, const D: usize> PointSet for [[C; D]] {
    type Coord = C;

    fn dimension(&self) -> usize {
        D
    }

    fn len(&self) -> usize {
        <[[C; D]]>::len(self)
    }

    fn coordinate(&self, index: usize, axis: usize) -> C {
        self[index][axis]
    }
}

impl<C: Copy, const D: usize> PointSet for Vec<[C; D]> {
    type Coord = C;

    fn dimension(&self) -> usize {
        D
    }

    fn len(&self) -> usize {
        Vec::len(self)
    }

    fn coordinate(&self, index: usize, axis: usize) -> C {
        self[index][axis]
    }
}

impl<C: Copy, const D: usize, const N: usize> PointSet for [[C; D]; N] {
    type Coord = C;

    fn dimension(&self) -> usize {
        D
    }

    fn len(&self) -> usize {
        N
    }

    fn coordinate(&self, index: usize, axis: usize) -> C {
        self[index][axis]
    }
}

impl<P: PointSet + ?Sized> PointSet for &P {
    type Coord = P::Coord;

    fn dimension(&self) -> usize {
        (**self).dimension()
    }

    fn len(&self) -> usize {
        (**self).len()
    }

    fn coordinate(&self, index: usize, axis: usize) -> Self::Coord {
        (**self).coordinate(index, axis)
    }
}

// ============================================================================
// FlatPoints
// ============================================================================

/// Borrowed row-major coordinate buffer: point `i` is
/// `coords[i * dimension..(i + 1) * dimension]`.
#[derive(Debug, Clone, Copy)]
pub struct FlatPoints<'a, C> {
    coords: &'a [C],
    dimension: usize,
}

impl<'a, C: Copy> FlatPoints<'a, C> {
    /// Wrap a flat coordinate slice.
    ///
    /// Fails if `dimension` is zero or does not divide the slice length.
    pub fn new(coords: &'a [C], dimension: usize) -> Result<Self, MlsError> {
        if dimension == 0 {
            return Err(MlsError::EmptyDimension);
        }
        if coords.len() % dimension != 0 {
            return Err(MlsError::InvalidNumericValue(format!(
                "{} coordinates cannot be split into {}D points",
                coords.len(),
                dimension
            )));
        }
        Ok(Self { coords, dimension })
    }

    /// The underlying flat slice.
    pub fn as_slice(&self) -> &'a [C] {
        self.coords
    }
}

impl<C: Copy> PointSet for FlatPoints<'_, C> {
    type Coord = C;

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn len(&self) -> usize {
        self.coords.len() / self.dimension
    }

    fn coordinate(&self, index: usize, axis: usize) -> C {
        self.coords[index * self.dimension + axis]
    }
}

// ============================================================================
// Flattening
// ============================================================================

/// Copy a point set into a row-major buffer of calculation-precision values.
///
/// `label` names the set in error messages.
pub fn flatten_points<T, P>(points: &P, label: &str) -> Result<Vec<T>, MlsError>
where
    T: Float + 'static,
    P: PointSet + ?Sized,
    P::Coord: AsPrimitive<T>,
{
    let dims = points.dimension();
    if dims == 0 {
        return Err(MlsError::EmptyDimension);
    }

    let n = points.len();
    let mut flat = Vec::with_capacity(n * dims);
    for i in 0..n {
        for axis in 0..dims {
            let val: T = points.coordinate(i, axis).as_();
            if !val.is_finite() {
                return Err(MlsError::InvalidNumericValue(format!(
                    "{}[{}][{}]={}",
                    label,
                    i,
                    axis,
                    val.to_f64().unwrap_or(f64::NAN)
                )));
            }
            flat.push(val);
        }
    }
    Ok(flat)
}
