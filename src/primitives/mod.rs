//! Layer 1: Primitives
//!
//! # Purpose
//!
//! Data structures and low-level utilities shared by every other layer:
//! - Error types
//! - Point set access and flattening
//! - Field value accumulation
//! - Per-worker scratch buffers
//! - Parallel-for helpers
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
//! Layer 2: Math
//!   ↓
//! Layer 1: Primitives ← You are here
//! ```

/// Error types.
pub mod errors;

/// Point set trait and flattening.
pub mod points;

/// Field value trait for `interpolate`.
pub mod values;

/// Scratch buffers for search and solve.
pub mod buffer;

/// Parallel-for over table rows.
pub mod parallel;
