//! Benchmark result recording.

use crate::parser::ParseError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

/// Outcome of one planner run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunResult {
    /// Instance name
    pub instance: String,
    /// Run number within the instance
    pub run: usize,
    /// Base seed of the run
    pub seed: u64,
    /// Items in the instance
    pub items: usize,
    /// Stacks built
    pub stacks: usize,
    /// Items placed
    pub placed: usize,
    /// Items left out
    pub unplaced: usize,
    /// Highest stack level in use (0 = nothing stacked)
    pub max_level: usize,
    /// Items turned by 90 degrees
    pub rotated: usize,
    /// Placed footprint area over floor area
    pub utilization: f64,
    /// Loaded weight
    pub total_weight: f64,
    /// Refinement rounds of the floor packer
    pub rounds: usize,
    /// Why floor packing ended
    pub stop_reason: String,
    /// Wall-clock time in milliseconds
    pub time_ms: u64,
    /// Error message if the run failed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RunResult {
    /// Returns true if the run produced a plan.
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Aggregate over all runs of one instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstanceSummary {
    /// Instance name
    pub instance: String,
    /// Successful runs
    pub run_count: usize,
    /// Mean utilization
    pub avg_utilization: f64,
    /// Best utilization
    pub best_utilization: f64,
    /// Mean placed items
    pub avg_placed: f64,
    /// Mean time in milliseconds
    pub avg_time_ms: u64,
}

/// Collected benchmark runs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BenchmarkResult {
    /// Seconds since the Unix epoch when the collection was created
    pub created_at: u64,
    /// Individual runs
    pub runs: Vec<RunResult>,
}

impl BenchmarkResult {
    /// Creates an empty collection.
    pub fn new() -> Self {
        let created_at = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        Self {
            created_at,
            runs: Vec::new(),
        }
    }

    /// Adds a run.
    pub fn add_run(&mut self, run: RunResult) {
        self.runs.push(run);
    }

    /// Summarizes successful runs per instance, in first-seen order.
    pub fn summary_by_instance(&self) -> Vec<InstanceSummary> {
        let mut names: Vec<&str> = Vec::new();
        for run in &self.runs {
            if !names.contains(&run.instance.as_str()) {
                names.push(&run.instance);
            }
        }

        names
            .into_iter()
            .map(|name| {
                let runs: Vec<&RunResult> = self
                    .runs
                    .iter()
                    .filter(|r| r.instance == name && r.is_ok())
                    .collect();
                let n = runs.len().max(1) as f64;
                InstanceSummary {
                    instance: name.to_string(),
                    run_count: runs.len(),
                    avg_utilization: runs.iter().map(|r| r.utilization).sum::<f64>() / n,
                    best_utilization: runs.iter().map(|r| r.utilization).fold(0.0, f64::max),
                    avg_placed: runs.iter().map(|r| r.placed as f64).sum::<f64>() / n,
                    avg_time_ms: (runs.iter().map(|r| r.time_ms).sum::<u64>() as f64 / n) as u64,
                }
            })
            .collect()
    }

    /// Prints a table of all runs.
    pub fn print_summary(&self) {
        println!(
            "\n{:<20} {:>4} {:>6} {:>6} {:>7} {:>6} {:>8} {:>7} {:>9}",
            "instance", "run", "items", "stacks", "placed", "level", "util", "rounds", "time"
        );
        println!("{:-<81}", "");
        for run in &self.runs {
            match &run.error {
                Some(error) => println!("{:<20} {:>4} error: {}", run.instance, run.run, error),
                None => println!(
                    "{:<20} {:>4} {:>6} {:>6} {:>7} {:>6} {:>7.1}% {:>7} {:>7}ms",
                    run.instance,
                    run.run,
                    run.items,
                    run.stacks,
                    run.placed,
                    run.max_level,
                    run.utilization * 100.0,
                    run.rounds,
                    run.time_ms
                ),
            }
        }
    }

    /// Saves the collection as pretty JSON.
    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<(), ParseError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Saves the runs as CSV.
    pub fn save_csv(&self, path: impl AsRef<Path>) -> Result<(), ParseError> {
        let mut out = String::from(
            "instance,run,seed,items,stacks,placed,unplaced,max_level,rotated,utilization,total_weight,rounds,stop_reason,time_ms\n",
        );
        for r in &self.runs {
            out.push_str(&format!(
                "{},{},{},{},{},{},{},{},{},{:.6},{:.3},{},{},{}\n",
                r.instance,
                r.run,
                r.seed,
                r.items,
                r.stacks,
                r.placed,
                r.unplaced,
                r.max_level,
                r.rotated,
                r.utilization,
                r.total_weight,
                r.rounds,
                r.stop_reason,
                r.time_ms
            ));
        }
        fs::write(path, out)?;
        Ok(())
    }
}
