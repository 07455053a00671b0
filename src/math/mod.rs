//! Layer 2: Math
//!
//! # Purpose
//!
//! This layer provides the mathematical collaborators of the MLS operator:
//! - Compactly supported kernels for distance-based weighting
//! - The monomial basis of the local polynomial fit
//! - Euclidean distance
//! - Spatial indices for k-nearest neighbor search
//! - Dense linear algebra for the normal equations
//!
//! These are reusable mathematical building blocks with no algorithm-specific logic.
//!
//! # Architecture
//!
//! ```text
//! Layer 5: API
//!   ↓
//! Layer 4: Engine
//!   ↓
//! Layer 3: Algorithms
//!   ↓
//! Layer 2: Math ← You are here
//!   ↓
//! Layer 1: Primitives
//! ```

/// Compactly supported radial kernels.
pub mod kernel;

/// Polynomial basis enumeration and evaluation.
pub mod basis;

/// Distance metrics.
pub mod distance;

/// KD-tree and brute-force k-nearest neighbor indices.
pub mod neighborhood;

/// Rank-aware dense solves.
pub mod linalg;
