//! # U-Loading 3D
//!
//! Stack solving for the u-loading container loading engine.
//!
//! Boxes and upright cylinders are grouped into stacks that fit under the
//! container height. A support graph and a longest-chain table drive a
//! bounded greedy selection of disjoint stacks; each stack is then aggregated
//! into one floor footprint for the 2D packer.

pub mod aggregate;
pub mod boundary;
pub mod geometry;
pub mod stacker;
pub mod support;

// Re-exports
pub use aggregate::StackFootprint;
pub use boundary::Container;
pub use geometry::{Item, ItemShape};
pub use stacker::{
    solve_stacks, ChainEntry, Stack, StackConfig, StackPhase, StackSolution, StackSolver,
    SupportGraph, TiePolicy,
};
pub use support::{ExactFootprintRule, FootprintAreaRule, SupportRule, SupportRuleKind};
pub use u_loading_core::{Error, Result, Solver};
