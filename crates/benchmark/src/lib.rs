//! Benchmark suite for u-loading
//!
//! This crate provides:
//! - Instance files describing a container and the objects to load
//! - A seeded generator of synthetic instances
//! - A benchmark runner around the load planner
//! - Result recording and comparison

mod dataset;
mod generator;
mod parser;
mod result;
mod runner;

pub use dataset::{ContainerSpec, Form, Instance, InstanceInfo, ObjectSpec};
pub use generator::{InstanceGenerator, Preset};
pub use parser::{InstanceParser, ParseError};
pub use result::{BenchmarkResult, InstanceSummary, RunResult};
pub use runner::{BenchmarkConfig, BenchmarkRunner};
