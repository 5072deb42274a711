//! # U-Loading
//!
//! Container loading of boxes and upright cylinders.
//!
//! This crate provides:
//! - **Stack solving**: items are grouped into stacks that fit under the container height
//! - **Floor packing**: the stack footprints are arranged on the container floor
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use u_loading::d3::{Container, Item};
//! use u_loading::LoadPlanner;
//!
//! let container = Container::new(2.4, 6.0, 2.6).with_max_weight(10_000.0);
//! let items = vec![
//!     Item::new_box("pallet", 1.2, 0.8, 1.0).with_weight(300.0),
//!     Item::cylinder("drum", 0.3, 0.9).with_weight(180.0),
//! ];
//!
//! let plan = LoadPlanner::default().plan(&items, &container)?;
//! println!("{} of {} items placed", plan.result.placed_count(), items.len());
//! ```
//!
//! ## Feature Flags
//!
//! - `d2` (default): floor packing
//! - `d3` (default): stack solving and the combined planner
//! - `serde`: Serialization support

/// Core traits and abstractions.
pub use u_loading_core as core;

/// Floor packing.
#[cfg(feature = "d2")]
pub use u_loading_d2 as d2;

/// Stack solving.
#[cfg(feature = "d3")]
pub use u_loading_d3 as d3;

#[cfg(feature = "d3")]
pub mod pipeline;

#[cfg(feature = "d3")]
pub use pipeline::{LoadPlan, LoadPlanner};

// Re-export commonly used types at root level
pub use u_loading_core::{
    Error, PackingParams, Placement, Result, SolveResult, SolveSummary, Solver, Strategy,
};
