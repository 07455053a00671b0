//! # mls-rs: Moving Least Squares interpolation operators for Rust
//!
//! Transfer scalar and vector fields between two scattered point clouds with
//! a reusable, polynomial-exact interpolation operator.
//!
//! ## What is MLS?
//!
//! Moving least squares is a local weighted polynomial regression re-fitted
//! independently at each query point. For a target `p` with `K` nearest
//! source points `q_j`, it picks the weights `w_j` of the best local
//! polynomial fit, weighted by a compactly supported kernel of the distance
//! `|q_j - p|`. The result `Σ w_j f(q_j)` reproduces every polynomial field of
//! degree `<= d` exactly.
//!
//! **Key properties:**
//! - Exact for polynomials up to the chosen degree (constants always)
//! - Every weight row sums to 1
//! - Geometry-only construction: the weights do not depend on the field
//! - Works in any dimension, with any number of targets
//!
//! **Common applications:**
//! - Mesh-to-mesh field transfer in coupled simulations
//! - Remapping particle data onto grids and back
//! - Resampling scattered measurements
//!
//! **How it works:**
//!
//! 1. Build a spatial index over the source points and query the `K`
//!    nearest sources of every target
//! 2. For each target, solve a small weighted normal-equations system
//! 3. Keep only the `M x K` neighbor and coefficient tables
//! 4. Apply the tables to any number of source fields
//!
//! ## Quick Start
//!
//! ```rust
//! use mls_rs::prelude::*;
//!
//! // Five sources on a line carrying f(x) = x²
//! let sources: Vec<[f64; 1]> = (0..5).map(|i| [i as f64]).collect();
//! let values: Vec<f64> = sources.iter().map(|p| p[0] * p[0]).collect();
//! let targets = vec![[2.5_f64]];
//!
//! // Build the operator once
//! let mls = MovingLeastSquares::<f64>::builder()
//!     .degree(Quadratic)
//!     .neighbors(3)
//!     .build(&sources, &targets)?;
//!
//! // Apply it to as many fields as needed
//! let approx = mls.interpolate(&values)?;
//! assert!((approx[0] - 6.25).abs() < 1e-10);
//! # Result::<(), MlsError>::Ok(())
//! ```
//!
//! ### Full Configuration
//!
//! ```rust
//! use mls_rs::prelude::*;
//!
//! let sources: Vec<[f64; 2]> = (0..100)
//!     .map(|i| [(i % 10) as f64 * 0.1, (i / 10) as f64 * 0.1])
//!     .collect();
//! let targets = vec![[0.45, 0.45], [0.12, 0.83]];
//!
//! let mls = MovingLeastSquares::<f64>::builder()
//!     .kernel(Wendland2)                                  // C2 Wendland kernel
//!     .degree(Linear)                                     // Linear exactness
//!     .neighbors(8)                                       // 8 neighbors per target
//!     .support_radius(SupportRadius::farthest_neighbor()) // h = 1.1 x farthest
//!     .rank_policy(PseudoInverse)                         // Eigen pseudo-inverse solve
//!     .threads(2)                                         // Dedicated pool
//!     .build(&sources, &targets)?;
//!
//! // Vector fields are transferred component-wise
//! let field: Vec<[f64; 2]> = sources.iter().map(|p| [p[0], 2.0 * p[1]]).collect();
//! let approx = mls.interpolate(&field)?;
//! assert!((approx[0][0] - 0.45).abs() < 1e-10);
//! assert!((approx[0][1] - 0.90).abs() < 1e-10);
//! # Result::<(), MlsError>::Ok(())
//! ```
//!
//! ### Result and Error Handling
//!
//! Construction returns `Result<MovingLeastSquares<T>, MlsError>`: a failed
//! build yields no operator at all. `interpolate` checks the field length and
//! leaves the operator usable after an error.
//!
//! ```rust
//! use mls_rs::prelude::*;
//!
//! let sources = vec![[0.0_f64], [1.0], [2.0]];
//! let targets = vec![[0.5_f64]];
//!
//! // More neighbors than sources
//! let err = MovingLeastSquares::<f64>::builder()
//!     .neighbors(4)
//!     .build(&sources, &targets)
//!     .unwrap_err();
//! assert_eq!(err.kind(), ErrorKind::Configuration);
//!
//! let mls = MovingLeastSquares::<f64>::new(&sources, &targets)?;
//! let err = mls.interpolate(&[1.0, 2.0]).unwrap_err();
//! assert_eq!(err.kind(), ErrorKind::ContractViolation);
//! assert!(mls.interpolate(&[7.0, 7.0, 7.0]).is_ok());
//! # Result::<(), MlsError>::Ok(())
//! ```
//!
//! ## Parameters
//!
//! | Parameter          | Default                        | Range/Options                     | Description                         |
//! |--------------------|--------------------------------|-----------------------------------|-------------------------------------|
//! | **kernel**         | `Wendland0`                    | `Wendland0/2/4/6`                 | Compactly supported weight shape    |
//! | **kernel_order**   | 0                              | 0, 2, 4, 6                        | Same, by smoothness order           |
//! | **degree**         | `Quadratic`                    | `Constant` .. `Quartic`           | Polynomial exactness order          |
//! | **neighbors**      | number of basis terms `P`      | [1, N]                            | Neighbors per target `K`            |
//! | **support_radius** | `FarthestNeighbor { 1.1 }`     | `FarthestNeighbor`, `Fixed`       | Kernel support radius per target    |
//! | **rank_policy**    | `PseudoInverse`                | `PseudoInverse`, `QrWithEigenFallback` | Ill-conditioned system handling  |
//! | **rcond**          | `P * ε`                        | [0, 1)                            | Relative eigenvalue cutoff          |
//! | **threads**        | ambient rayon pool             | [1, ∞)                            | Dedicated construction pool size    |
//!
//! When `neighbors` is below the number of basis terms of the requested
//! degree, the operator fits the highest degree those neighbors determine
//! (reported by [`MovingLeastSquares::polynomial_degree`]).
//!
//! ## Point Sets
//!
//! Any [`PointSet`](prelude::PointSet) works: `Vec<[C; D]>`, `&[[C; D]]`, or
//! a flat row-major slice wrapped in [`FlatPoints`](prelude::FlatPoints).
//! The coordinate type `C` may differ from the calculation type `T`.
//!
//! ```rust
//! use mls_rs::prelude::*;
//!
//! let coords = [0.0_f32, 0.0, 1.0, 0.0, 0.0, 1.0, 1.0, 1.0];
//! let sources = FlatPoints::new(&coords, 2)?;
//! let targets = vec![[0.5_f32, 0.5]];
//!
//! let mls = MovingLeastSquares::<f64>::builder()
//!     .degree(Linear)
//!     .neighbors(4)
//!     .build(&sources, &targets)?;
//! let approx = mls.interpolate(&[1.0_f64, 2.0, 3.0, 4.0])?;
//! assert!((approx[0] - 2.5).abs() < 1e-10);
//! # Result::<(), MlsError>::Ok(())
//! ```
//!
//! ## Spatial Indices
//!
//! The default index is an exact KD-tree. Any type implementing
//! [`SpatialIndex`](prelude::SpatialIndex) can be used instead through
//! `build_with_index`:
//!
//! ```rust
//! use mls_rs::prelude::*;
//!
//! let sources: Vec<[f64; 1]> = (0..10).map(|i| [i as f64]).collect();
//! let targets = vec![[4.2_f64]];
//!
//! let mls = MovingLeastSquares::<f64>::builder()
//!     .degree(Linear)
//!     .build_with_index::<BruteForce<f64>>(&sources, &targets)?;
//! assert_eq!(mls.num_neighbors(), 2);
//! # Result::<(), MlsError>::Ok(())
//! ```
//!
//! ## Logging
//!
//! The crate logs through the `log` facade and never installs a logger:
//! `debug` for the construction summary, `trace` per phase, and `warn` when
//! local systems are rank deficient but still solvable.
//!
//! ## Features
//!
//! - `parallel` (default): run the per-target phases on rayon.
//! - `serde`: `Serialize`/`Deserialize` for [`MlsConfig`](prelude::MlsConfig)
//!   and the configuration enums.
//!
//! ## References
//!
//! - Lancaster, P. & Salkauskas, K. (1981). "Surfaces Generated by Moving Least Squares Methods"
//! - Wendland, H. (1995). "Piecewise polynomial, positive definite and compactly supported radial functions of minimal degree"

#![deny(missing_docs)]

// ============================================================================
// Internal Modules
// ============================================================================

// Layer 1: Primitives - data structures and basic utilities.
//
// Contains error types, point set access, field value accumulation,
// scratch buffers and parallel-for helpers.
mod primitives;

// Layer 2: Math - pure mathematical functions.
//
// Contains kernels, the polynomial basis, distances, spatial indices and
// dense linear algebra.
mod math;

// Layer 3: Algorithms - core MLS algorithms.
//
// Contains neighbor gathering and the per-target coefficient solve.
mod algorithms;

// Layer 4: Engine - orchestration and execution control.
//
// Contains construction orchestration, application and validation.
mod engine;

// High-level fluent API for MLS operators.
//
// Provides the `MovingLeastSquares` operator and its builder.
mod api;

pub use api::{MlsBuilder, MovingLeastSquares};

// ============================================================================
// Prelude
// ============================================================================

/// Standard MLS prelude.
///
/// This module is intended to be wildcard-imported for convenient access
/// to the most commonly used types:
///
/// ```
/// use mls_rs::prelude::*;
/// ```
pub mod prelude {
    pub use crate::api::{
        BruteForce, ErrorKind, FlatPoints, MlsBuilder, MlsConfig, MlsError, MovingLeastSquares,
        PolynomialDegree,
        PolynomialDegree::{Constant, Cubic, Linear, Quadratic, Quartic},
        RankPolicy,
        RankPolicy::{PseudoInverse, QrWithEigenFallback},
        SupportRadius, WeightFunction,
        WeightFunction::{Wendland0, Wendland2, Wendland4, Wendland6},
    };
    pub use crate::math::neighborhood::{KDTree, KnnQuery, SpatialIndex};
    pub use crate::primitives::points::PointSet;
    pub use crate::primitives::values::FieldValue;
}

// ============================================================================
// Internals
// ============================================================================

/// Internal modules for advanced use and testing.
///
/// Exposes the layers behind the operator: the gatherer, the coefficient
/// solver, the spatial indices and the validator.
///
/// **Warning**: These are implementation details and may change without notice.
pub mod internals {
    /// Internal primitive types and utilities.
    pub mod primitives {
        pub use crate::primitives::*;
    }
    /// Internal math functions.
    pub mod math {
        pub use crate::math::*;
    }
    /// Internal core algorithms.
    pub mod algorithms {
        pub use crate::algorithms::*;
    }
    /// Internal execution engine.
    pub mod engine {
        pub use crate::engine::*;
    }
    /// Internal API.
    pub mod api {
        pub use crate::api::*;
    }
}
