//! Layer 3: Algorithms
//!
//! # Purpose
//!
//! The two construction-time algorithms of an MLS operator:
//! - Neighbor gathering (k-nearest query reshaped into dense tables)
//! - The per-target weighted least-squares coefficient solve
//!
//! # Architecture
//!
//! ```text
//! Layer 5: API
//!   ↓
//! Layer 4: Engine
//!   ↓
//! Layer 3: Algorithms ← You are here
//!   ↓
//! Layer 2: Math
//!   ↓
//! Layer 1: Primitives
//! ```

/// Dense neighbor tables from a spatial index query.
pub mod gather;

/// Per-target MLS coefficient solve.
pub mod solver;
