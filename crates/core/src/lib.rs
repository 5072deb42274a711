//! # U-Loading Core
//!
//! Core traits and abstractions for the u-loading container loading engine.
//!
//! This crate provides the foundational types shared between the stack solver
//! (3D items reduced to floor footprints) and the floor packer (2D placement).
//!
//! ## Core Components
//!
//! - **Geometry primitives**: centered rectangles and circles with strict overlap tests
//! - **Bounds**: axis-aligned bounding boxes
//! - **SA framework**: per-step cooling Simulated Annealing with seeded parallel runs
//! - **Solver trait and parameters**: common interface and the packing parameter bundle
//! - **Results**: placements, solve results and summaries
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serialization/deserialization support

pub mod bounds;
pub mod error;
pub mod geometry;
pub mod placement;
pub mod result;
pub mod sa;
pub mod solver;

// Re-exports
pub use bounds::AABB2D;
pub use error::{Error, Result};
pub use geometry::{Geometry, GeometryId, Shape, ShapeKind, EPSILON};
pub use placement::{Placement, PlacementStats};
pub use result::{SolveResult, SolveSummary};
pub use sa::{
    derive_seed, NeighborhoodOperator, OperatorWeights, SaConfig, SaProblem, SaResult, SaRunner,
    SaSolution,
};
pub use solver::{PackingParams, Solver, Strategy};
