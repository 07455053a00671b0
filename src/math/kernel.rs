//! Compactly supported radial kernels for MLS weighting.
//!
//! ## Purpose
//!
//! This module provides the Wendland family of compactly supported radial
//! basis functions. A kernel maps a normalized distance `r = |q - p| / h` to
//! a non-negative weight that vanishes for `r >= 1`.
//!
//! ## Key concepts
//!
//! * **Smoothness order**: Wendland kernel `k` is C^k at the support boundary
//!   (orders 0, 2, 4, 6).
//! * **Scale-free**: Kernels are not normalized; MLS weights are invariant to
//!   a constant factor on the kernel.
//!
//! ## Invariants
//!
//! * `evaluate(0) > 0` and `evaluate(r) == 0` for `r >= 1`.
//! * Weights are monotonically non-increasing on `[0, 1]`.

use num_traits::Float;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::primitives::errors::MlsError;

/// Compactly supported weight function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum WeightFunction {
    /// Wendland C0: (1-r)²
    #[default]
    Wendland0,

    /// Wendland C2: (1-r)⁴ (4r + 1)
    Wendland2,

    /// Wendland C4: (1-r)⁶ (35r² + 18r + 3)
    Wendland4,

    /// Wendland C6: (1-r)⁸ (32r³ + 25r² + 8r + 1)
    Wendland6,
}

impl WeightFunction {
    /// Select the kernel with the given boundary smoothness.
    pub fn from_smoothness(order: usize) -> Result<Self, MlsError> {
        match order {
            0 => Ok(WeightFunction::Wendland0),
            2 => Ok(WeightFunction::Wendland2),
            4 => Ok(WeightFunction::Wendland4),
            6 => Ok(WeightFunction::Wendland6),
            _ => Err(MlsError::InvalidKernelOrder(order)),
        }
    }

    /// Boundary smoothness order of this kernel.
    #[inline]
    pub const fn smoothness(&self) -> usize {
        match self {
            WeightFunction::Wendland0 => 0,
            WeightFunction::Wendland2 => 2,
            WeightFunction::Wendland4 => 4,
            WeightFunction::Wendland6 => 6,
        }
    }

    /// Human-readable name.
    pub const fn name(&self) -> &'static str {
        match self {
            WeightFunction::Wendland0 => "Wendland0",
            WeightFunction::Wendland2 => "Wendland2",
            WeightFunction::Wendland4 => "Wendland4",
            WeightFunction::Wendland6 => "Wendland6",
        }
    }

    /// Evaluate the kernel at normalized distance `r`.
    #[inline]
    pub fn evaluate<T: Float>(&self, r: T) -> T {
        let r = r.abs();
        if r >= T::one() {
            return T::zero();
        }

        let c = |v: f64| T::from(v).unwrap_or_else(T::zero);
        let s = T::one() - r;
        let s2 = s * s;
        match self {
            WeightFunction::Wendland0 => s2,
            WeightFunction::Wendland2 => {
                let s4 = s2 * s2;
                s4 * (c(4.0) * r + T::one())
            }
            WeightFunction::Wendland4 => {
                let s6 = s2 * s2 * s2;
                s6 * ((c(35.0) * r + c(18.0)) * r + c(3.0))
            }
            WeightFunction::Wendland6 => {
                let s4 = s2 * s2;
                let s8 = s4 * s4;
                s8 * (((c(32.0) * r + c(25.0)) * r + c(8.0)) * r + T::one())
            }
        }
    }
}
