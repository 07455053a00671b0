//! Layer 4: Engine
//!
//! # Purpose
//!
//! Orchestration of operator construction and application, and the
//! fail-fast checks that guard both.
//!
//! # Architecture
//!
//! ```text
//! Layer 5: API
//!   ↓
//! Layer 4: Engine ← You are here
//!   ↓
//! Layer 3: Algorithms
//!   ↓
//! Layer 2: Math
//!   ↓
//! Layer 1: Primitives
//! ```

/// Construction and application.
pub mod executor;

/// Input validation.
pub mod validator;
