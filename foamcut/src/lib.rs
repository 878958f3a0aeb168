//! Geometry, entities and SVG output shared by the foam nesting tools.
//!
//! All computations in this crate are pure: the same input always yields the same output.

/// Entities describing nesting demand (items, parts) and its outcome (sheets, results)
pub mod entities;
/// Geometric primitives and transformations
pub mod geometry;
/// External (serde) representation of instances and solutions, and SVG generation
pub mod io;
/// Helpers for approximate float comparison
pub mod util;
