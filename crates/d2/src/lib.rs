//! # U-Loading 2D
//!
//! Floor packing for the u-loading container loading engine.
//!
//! Rectangles and circles are placed on a rectangular floor without overlap.
//! The packer seeds the floor with the largest object, then alternates
//! parallel Simulated Annealing refinement of the current layout with a
//! global best-fit insertion of the next object until the pool is empty or
//! nothing else fits.

pub mod boundary;
pub mod cost;
pub mod geometry;
pub mod insertion;
pub mod jiggle;
pub mod layout;
pub mod packer;
pub mod sa_floor;

// Re-exports
pub use boundary::FloorArea;
pub use cost::{layout_cost, CostWeights};
pub use geometry::PlacementObject;
pub use insertion::{placement_metric, InsertionOutcome};
pub use jiggle::{jiggle, JiggleConfig};
pub use layout::{FloorLayout, PlacedObject};
pub use packer::{pack_floor, FloorPackResult, FloorPacker, FloorPlacement, StopReason};
pub use sa_floor::{refine_layout, Refinement, SaFloorProblem};
pub use u_loading_core::{Error, PackingParams, Result, Solver};
