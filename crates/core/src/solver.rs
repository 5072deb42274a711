//! Solver trait and the floor packing parameter bundle.

use crate::sa::{OperatorWeights, SaConfig};
use crate::{Error, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Optimization strategy reported in results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Strategy {
    /// Stack solving only.
    StackOnly,
    /// Largest-first seeding, annealing refinement and best-fit insertion.
    #[default]
    AnnealedBestFit,
    /// Stack solving followed by annealed best-fit floor packing.
    StackAndPack,
}

impl Strategy {
    /// Returns the strategy name used in reports.
    pub fn name(&self) -> &'static str {
        match self {
            Strategy::StackOnly => "stack-only",
            Strategy::AnnealedBestFit => "annealed-best-fit",
            Strategy::StackAndPack => "stack-and-pack",
        }
    }
}

/// Parameters of the floor packer.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PackingParams {
    /// Number of annealing workers per refinement round.
    pub num_sa_runs: usize,
    /// Proposals per annealing worker.
    pub iter_limit: u64,
    /// Initial annealing temperature.
    pub initial_temp: f64,
    /// Cooling factor applied after an accepted move.
    pub cooling_rate: f64,
    /// Probability of a swap move.
    pub swap_prob: f64,
    /// Probability of a teleport move.
    pub teleport_prob: f64,
    /// Probability of a rotate move.
    pub rotate_prob: f64,
    /// Scales the translate step with the temperature.
    pub max_move_multiplier: f64,
    /// Cost weight of area-weighted y positions.
    pub weight_y: f64,
    /// Cost weight of area-weighted x positions.
    pub weight_x: f64,
    /// Cost weight of the layout bounding-box area.
    pub weight_box_area: f64,
    /// Cost weight of the same-type spread.
    pub weight_grouping: f64,
    /// Random trial points per object during insertion.
    pub max_placement_tries: usize,
    /// Initial compaction step.
    pub jiggle_step: f64,
    /// Step shrink factor per compaction pass.
    pub jiggle_shrink: f64,
    /// Maximum compaction passes.
    pub jiggle_max_iterations: usize,
    /// Base seed of every random stream.
    pub seed: u64,
}

impl Default for PackingParams {
    fn default() -> Self {
        let cores = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);

        Self {
            num_sa_runs: cores * 2,
            iter_limit: 100_000,
            initial_temp: 1.0,
            cooling_rate: 0.9997,
            swap_prob: 0.20,
            teleport_prob: 0.15,
            rotate_prob: 0.10,
            max_move_multiplier: 8.0,
            weight_y: 1.0,
            weight_x: 1.0,
            weight_box_area: 500.0,
            weight_grouping: 0.5,
            max_placement_tries: 3000,
            jiggle_step: 1.0,
            jiggle_shrink: 0.98,
            jiggle_max_iterations: 500,
            seed: 1,
        }
    }
}

impl PackingParams {
    /// Creates a new parameter set with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the number of annealing workers per round.
    pub fn with_sa_runs(mut self, runs: usize) -> Self {
        self.num_sa_runs = runs.max(1);
        self
    }

    /// Sets the proposals per annealing worker.
    pub fn with_iter_limit(mut self, iterations: u64) -> Self {
        self.iter_limit = iterations;
        self
    }

    /// Sets the initial temperature.
    pub fn with_initial_temp(mut self, temp: f64) -> Self {
        self.initial_temp = temp;
        self
    }

    /// Sets the cooling rate.
    pub fn with_cooling_rate(mut self, rate: f64) -> Self {
        self.cooling_rate = rate;
        self
    }

    /// Sets the swap, teleport and rotate probabilities.
    pub fn with_move_probabilities(mut self, swap: f64, teleport: f64, rotate: f64) -> Self {
        self.swap_prob = swap;
        self.teleport_prob = teleport;
        self.rotate_prob = rotate;
        self
    }

    /// Sets the translate step multiplier.
    pub fn with_max_move_multiplier(mut self, multiplier: f64) -> Self {
        self.max_move_multiplier = multiplier;
        self
    }

    /// Sets the cost weights.
    pub fn with_cost_weights(mut self, y: f64, x: f64, box_area: f64, grouping: f64) -> Self {
        self.weight_y = y;
        self.weight_x = x;
        self.weight_box_area = box_area;
        self.weight_grouping = grouping;
        self
    }

    /// Sets the insertion trial count.
    pub fn with_placement_tries(mut self, tries: usize) -> Self {
        self.max_placement_tries = tries.max(1);
        self
    }

    /// Sets the compaction step, shrink factor and pass limit.
    pub fn with_jiggle(mut self, step: f64, shrink: f64, max_iterations: usize) -> Self {
        self.jiggle_step = step;
        self.jiggle_shrink = shrink;
        self.jiggle_max_iterations = max_iterations;
        self
    }

    /// Sets the base seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Probability of a translate move.
    pub fn translate_prob(&self) -> f64 {
        self.operator_weights().translate()
    }

    /// Returns the annealing configuration of one worker.
    pub fn sa_config(&self) -> SaConfig {
        SaConfig::default()
            .with_initial_temp(self.initial_temp)
            .with_cooling_rate(self.cooling_rate)
            .with_max_iterations(self.iter_limit)
    }

    /// Returns the move selection probabilities.
    pub fn operator_weights(&self) -> OperatorWeights {
        OperatorWeights::new(self.swap_prob, self.teleport_prob, self.rotate_prob)
    }

    /// Validates the parameters.
    pub fn validate(&self) -> Result<()> {
        let probs = [self.swap_prob, self.teleport_prob, self.rotate_prob];
        if probs.iter().any(|p| !(0.0..=1.0).contains(p)) || probs.iter().sum::<f64>() > 1.0 {
            return Err(Error::ConfigError(format!(
                "move probabilities must lie in [0, 1] and sum to at most 1, got {:?}",
                probs
            )));
        }
        if !(self.cooling_rate > 0.0 && self.cooling_rate < 1.0) {
            return Err(Error::ConfigError(format!(
                "cooling rate must lie in (0, 1), got {}",
                self.cooling_rate
            )));
        }
        if self.initial_temp <= 0.0 {
            return Err(Error::ConfigError(format!(
                "initial temperature must be positive, got {}",
                self.initial_temp
            )));
        }
        if !(self.jiggle_shrink > 0.0 && self.jiggle_shrink < 1.0) || self.jiggle_step <= 0.0 {
            return Err(Error::ConfigError(format!(
                "jiggle step must be positive and shrink in (0, 1), got {} / {}",
                self.jiggle_step, self.jiggle_shrink
            )));
        }
        Ok(())
    }
}

/// Trait for the stacking and packing solvers.
pub trait Solver {
    /// The items this solver consumes.
    type Input;
    /// The boundary the items are solved against.
    type Boundary;
    /// The solution type.
    type Output;

    /// Solves the problem.
    fn solve(&self, input: &[Self::Input], boundary: &Self::Boundary) -> Result<Self::Output>;
}
