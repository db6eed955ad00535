// src/dag/mod.rs

//! Dependency graph and readiness waves.
//!
//! - [`graph`] validates a submission (duplicates, unknown dependencies,
//!   cycles) and keeps adjacency information.
//! - [`waves`] hands out Kahn-style readiness waves for one run.

pub mod graph;
pub mod waves;

pub use graph::TaskGraph;
pub use waves::WavePlanner;
