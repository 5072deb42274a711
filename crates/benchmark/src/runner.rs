//! Benchmark runner.

use crate::dataset::Instance;
use crate::result::{BenchmarkResult, RunResult};
use log::{info, warn};
use std::time::{Duration, Instant};
use u_loading::{LoadPlanner, PackingParams};
use u_loading_core::derive_seed;
use u_loading_d3::StackConfig;

/// Configuration for benchmark runs.
#[derive(Debug, Clone)]
pub struct BenchmarkConfig {
    /// Runs per instance, each with its own seed
    pub runs_per_instance: usize,
    /// Base seed
    pub seed: u64,
    /// Annealing workers per round (None = packer default)
    pub sa_runs: Option<usize>,
    /// Proposals per annealing worker
    pub iter_limit: u64,
    /// Random trial points per insertion
    pub placement_tries: usize,
    /// Stack solver budget
    pub stack_timeout: Duration,
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        Self {
            runs_per_instance: 1,
            seed: 1,
            sa_runs: None,
            iter_limit: 20_000,
            placement_tries: 3_000,
            stack_timeout: Duration::from_secs(180),
        }
    }
}

impl BenchmarkConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Short runs for smoke testing.
    pub fn quick() -> Self {
        Self {
            iter_limit: 2_000,
            placement_tries: 500,
            sa_runs: Some(4),
            ..Self::default()
        }
    }

    /// Sets runs per instance.
    pub fn with_runs_per_instance(mut self, runs: usize) -> Self {
        self.runs_per_instance = runs.max(1);
        self
    }

    /// Sets the base seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Sets the number of annealing workers.
    pub fn with_sa_runs(mut self, runs: usize) -> Self {
        self.sa_runs = Some(runs);
        self
    }

    /// Sets the proposals per annealing worker.
    pub fn with_iter_limit(mut self, limit: u64) -> Self {
        self.iter_limit = limit;
        self
    }

    /// Sets the insertion trial count.
    pub fn with_placement_tries(mut self, tries: usize) -> Self {
        self.placement_tries = tries;
        self
    }

    fn params(&self, seed: u64) -> PackingParams {
        let params = PackingParams::new()
            .with_iter_limit(self.iter_limit)
            .with_placement_tries(self.placement_tries)
            .with_seed(seed);
        match self.sa_runs {
            Some(runs) => params.with_sa_runs(runs),
            None => params,
        }
    }
}

/// Runs the load planner on instances.
#[derive(Debug, Clone, Default)]
pub struct BenchmarkRunner {
    config: BenchmarkConfig,
}

impl BenchmarkRunner {
    /// Creates a new runner.
    pub fn new(config: BenchmarkConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &BenchmarkConfig {
        &self.config
    }

    /// Runs every configured repetition on `instance`.
    pub fn run_instance(&self, instance: &Instance) -> BenchmarkResult {
        let mut result = BenchmarkResult::new();
        for run in 0..self.config.runs_per_instance {
            result.add_run(self.run_once(instance, run));
        }
        result
    }

    /// Runs all instances.
    pub fn run_all(&self, instances: &[Instance]) -> BenchmarkResult {
        let mut result = BenchmarkResult::new();
        for instance in instances {
            for run in self.run_instance(instance).runs {
                result.add_run(run);
            }
        }
        result
    }

    fn run_once(&self, instance: &Instance, run: usize) -> RunResult {
        let seed = derive_seed(self.config.seed, &[run as u64]);
        let items = instance.expand_items();
        let container = instance.container();
        let planner = LoadPlanner::new(
            StackConfig::new().with_timeout(self.config.stack_timeout),
            self.config.params(seed),
        );

        info!(
            "Running '{}' ({} items), run {} seed {}",
            instance.name,
            items.len(),
            run,
            seed
        );

        let start = Instant::now();
        let mut record = RunResult {
            instance: instance.name.clone(),
            run,
            seed,
            items: items.len(),
            stacks: 0,
            placed: 0,
            unplaced: items.len(),
            max_level: 0,
            rotated: 0,
            utilization: 0.0,
            total_weight: 0.0,
            rounds: 0,
            stop_reason: String::new(),
            time_ms: 0,
            error: None,
        };

        match planner.plan(&items, &container) {
            Ok(plan) => {
                record.stacks = plan.stacks.stack_count();
                record.placed = plan.result.placed_count();
                record.unplaced = plan.result.unplaced_count();
                let stats = plan.result.placement_stats();
                record.max_level = stats.max_level;
                record.rotated = stats.rotated_count;
                record.utilization = plan.result.utilization;
                record.total_weight = plan.result.total_weight;
                record.rounds = plan.result.rounds;
                record.stop_reason = format!("{:?}", plan.stop_reason);
            }
            Err(e) => {
                warn!("Run {} of '{}' failed: {}", run, instance.name, e);
                record.error = Some(e.to_string());
            }
        }
        record.time_ms = start.elapsed().as_millis() as u64;
        record
    }
}
