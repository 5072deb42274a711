//! Simulated Annealing framework for minimization problems.
//!
//! The runner cools after every proposal rather than per temperature level:
//! an accepted move multiplies the temperature by `cooling_rate`, a rejected
//! or infeasible one by `cooling_rate^rejection_exponent`, so the search keeps
//! moving even when most proposals collide.

use rand::prelude::*;
use rayon::prelude::*;
use std::time::{Duration, Instant};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Configuration for Simulated Annealing.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SaConfig {
    /// Initial temperature.
    pub initial_temp: f64,
    /// Cooling factor applied after an accepted move.
    pub cooling_rate: f64,
    /// Exponent applied to `cooling_rate` after a rejected or infeasible move.
    pub rejection_exponent: f64,
    /// Temperature floor used in the Metropolis criterion.
    pub min_temp: f64,
    /// Number of proposals per run.
    pub max_iterations: u64,
    /// Sampling interval of the cost history (0 = no history).
    pub history_interval: u64,
}

impl Default for SaConfig {
    fn default() -> Self {
        Self {
            initial_temp: 1.0,
            cooling_rate: 0.9997,
            rejection_exponent: 0.01,
            min_temp: 1e-8,
            max_iterations: 100_000,
            history_interval: 1_000,
        }
    }
}

impl SaConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the initial temperature.
    pub fn with_initial_temp(mut self, temp: f64) -> Self {
        self.initial_temp = temp.max(1e-6);
        self
    }

    /// Sets the cooling rate.
    pub fn with_cooling_rate(mut self, rate: f64) -> Self {
        self.cooling_rate = rate.clamp(0.001, 0.999_999);
        self
    }

    /// Sets the exponent of the rejection cooling factor.
    pub fn with_rejection_exponent(mut self, exponent: f64) -> Self {
        self.rejection_exponent = exponent.max(0.0);
        self
    }

    /// Sets the number of proposals per run.
    pub fn with_max_iterations(mut self, iterations: u64) -> Self {
        self.max_iterations = iterations;
        self
    }

    /// Sets the cost history sampling interval.
    pub fn with_history_interval(mut self, interval: u64) -> Self {
        self.history_interval = interval;
        self
    }

    /// Cooling factor applied after a rejected or infeasible proposal.
    pub fn rejection_factor(&self) -> f64 {
        self.cooling_rate.powf(self.rejection_exponent)
    }
}

/// Trait for solutions in Simulated Annealing.
pub trait SaSolution: Clone + Send + Sync {
    /// Returns the cost of this solution. Lower values are better.
    fn cost(&self) -> f64;

    /// Sets the cost.
    fn set_cost(&mut self, value: f64);
}

/// Neighborhood operator types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum NeighborhoodOperator {
    /// Exchange the positions of two elements.
    Swap,
    /// Move one element to a uniformly random position.
    Teleport,
    /// Turn one element by 90 degrees in place.
    Rotation,
    /// Shift one element by a temperature-bounded offset.
    Translate,
}

/// Selection probabilities of the neighborhood operators.
///
/// `Translate` receives whatever probability mass remains.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OperatorWeights {
    /// Probability of a swap.
    pub swap: f64,
    /// Probability of a teleport.
    pub teleport: f64,
    /// Probability of a rotation.
    pub rotation: f64,
}

impl Default for OperatorWeights {
    fn default() -> Self {
        Self {
            swap: 0.20,
            teleport: 0.15,
            rotation: 0.10,
        }
    }
}

impl OperatorWeights {
    /// Creates weights from the three explicit probabilities.
    pub fn new(swap: f64, teleport: f64, rotation: f64) -> Self {
        Self {
            swap: swap.max(0.0),
            teleport: teleport.max(0.0),
            rotation: rotation.max(0.0),
        }
    }

    /// Probability of a translate move.
    pub fn translate(&self) -> f64 {
        (1.0 - self.swap - self.teleport - self.rotation).max(0.0)
    }

    /// Picks an operator by weighted random selection.
    pub fn select<R: Rng>(&self, rng: &mut R) -> NeighborhoodOperator {
        let r = rng.gen::<f64>();
        if r < self.swap {
            NeighborhoodOperator::Swap
        } else if r < self.swap + self.teleport {
            NeighborhoodOperator::Teleport
        } else if r < self.swap + self.teleport + self.rotation {
            NeighborhoodOperator::Rotation
        } else {
            NeighborhoodOperator::Translate
        }
    }
}

/// Trait for problem-specific SA operations.
pub trait SaProblem: Send + Sync {
    /// The solution type for this problem.
    type Solution: SaSolution;

    /// Creates the starting solution of a run.
    fn initial_solution<R: Rng>(&self, rng: &mut R) -> Self::Solution;

    /// Proposes a neighbor using the given operator.
    ///
    /// Returns `None` when the proposal is infeasible; the runner then rejects
    /// it without evaluating a cost.
    fn neighbor<R: Rng>(
        &self,
        solution: &Self::Solution,
        operator: NeighborhoodOperator,
        temperature: f64,
        rng: &mut R,
    ) -> Option<Self::Solution>;

    /// Evaluates and stores the cost of a solution.
    fn evaluate(&self, solution: &mut Self::Solution);

    /// Returns the operator selection probabilities.
    fn operator_weights(&self) -> OperatorWeights {
        OperatorWeights::default()
    }

    /// Called at every history sample (for progress reporting).
    fn on_progress(&self, _iteration: u64, _temperature: f64, _best: &Self::Solution) {
        // Default: do nothing
    }
}

/// Result of a SA run.
#[derive(Debug, Clone)]
pub struct SaResult<S: SaSolution> {
    /// The best solution found.
    pub best: S,
    /// Cost of the best solution.
    pub best_cost: f64,
    /// Final temperature reached.
    pub final_temperature: f64,
    /// Total proposals performed.
    pub iterations: u64,
    /// Number of accepted proposals.
    pub accepted: u64,
    /// Number of infeasible proposals.
    pub infeasible: u64,
    /// Total elapsed time.
    pub elapsed: Duration,
    /// Best cost history (sampled every `history_interval` proposals).
    pub history: Vec<f64>,
}

impl<S: SaSolution> SaResult<S> {
    /// Fraction of proposals that were accepted.
    pub fn acceptance_rate(&self) -> f64 {
        if self.iterations == 0 {
            0.0
        } else {
            self.accepted as f64 / self.iterations as f64
        }
    }
}

/// Mixes a base seed with stream identifiers (SplitMix64 finalizer).
///
/// Used to give every parallel worker its own decorrelated but reproducible
/// random stream.
pub fn derive_seed(base: u64, streams: &[u64]) -> u64 {
    let mut z = base;
    for &s in streams {
        z = z
            .wrapping_add(0x9E37_79B9_7F4A_7C15)
            .wrapping_add(s.wrapping_mul(0xD1B5_4A32_D192_ED03));
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^= z >> 31;
    }
    z
}

/// Simulated Annealing runner.
pub struct SaRunner<P: SaProblem> {
    config: SaConfig,
    problem: P,
}

impl<P: SaProblem> SaRunner<P> {
    /// Creates a new SA runner.
    pub fn new(config: SaConfig, problem: P) -> Self {
        Self { config, problem }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &SaConfig {
        &self.config
    }

    /// Returns the problem.
    pub fn problem(&self) -> &P {
        &self.problem
    }

    /// Runs the algorithm with an RNG seeded from `seed`.
    pub fn run_seeded(&self, seed: u64) -> SaResult<P::Solution> {
        self.run_with_rng(&mut StdRng::seed_from_u64(seed))
    }

    /// Runs the Simulated Annealing algorithm with a specific RNG.
    pub fn run_with_rng<R: Rng>(&self, rng: &mut R) -> SaResult<P::Solution> {
        let start = Instant::now();
        let mut history = Vec::new();

        let mut current = self.problem.initial_solution(rng);
        self.problem.evaluate(&mut current);
        let mut best = current.clone();

        let weights = self.problem.operator_weights();
        let rejection_factor = self.config.rejection_factor();
        let mut temperature = self.config.initial_temp;
        let mut accepted = 0u64;
        let mut infeasible = 0u64;
        let mut iteration = 0u64;

        while iteration < self.config.max_iterations {
            iteration += 1;

            let operator = weights.select(rng);
            match self.problem.neighbor(&current, operator, temperature, rng) {
                None => {
                    infeasible += 1;
                    temperature *= rejection_factor;
                }
                Some(mut candidate) => {
                    self.problem.evaluate(&mut candidate);
                    let delta = current.cost() - candidate.cost();

                    let accept = delta > 0.0 || {
                        let t = temperature.max(self.config.min_temp);
                        rng.gen::<f64>() < (delta / t).exp()
                    };

                    if accept {
                        accepted += 1;
                        current = candidate;
                        temperature *= self.config.cooling_rate;
                        if current.cost() < best.cost() {
                            best = current.clone();
                        }
                    } else {
                        temperature *= rejection_factor;
                    }
                }
            }

            if self.config.history_interval > 0 && iteration % self.config.history_interval == 0 {
                history.push(best.cost());
                self.problem.on_progress(iteration, temperature, &best);
            }
        }

        history.push(best.cost());

        SaResult {
            best_cost: best.cost(),
            best,
            final_temperature: temperature,
            iterations: iteration,
            accepted,
            infeasible,
            elapsed: start.elapsed(),
            history,
        }
    }

    /// Runs one independent SA instance per seed in parallel.
    ///
    /// Results are returned in seed order; the call returns only after every
    /// run has finished.
    pub fn run_batch(&self, seeds: &[u64]) -> Vec<SaResult<P::Solution>> {
        seeds
            .par_iter()
            .map(|&seed| self.run_seeded(seed))
            .collect()
    }

    /// Runs `num_runs` instances in parallel and returns the lowest-cost result.
    ///
    /// Run `i` is seeded with `derive_seed(base_seed, &[i])`. Ties resolve to the
    /// lowest run index.
    pub fn run_parallel(&self, num_runs: usize, base_seed: u64) -> Option<SaResult<P::Solution>> {
        let seeds: Vec<u64> = (0..num_runs.max(1) as u64)
            .map(|i| derive_seed(base_seed, &[i]))
            .collect();

        self.run_batch(&seeds)
            .into_iter()
            .reduce(|best, r| if r.best_cost < best.best_cost { r } else { best })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Minimizes (x - 3)^2 on x >= 0; negative positions are infeasible.
    #[derive(Clone)]
    struct Parabola;

    #[derive(Debug, Clone)]
    struct Point {
        x: f64,
        cost: f64,
    }

    impl SaSolution for Point {
        fn cost(&self) -> f64 {
            self.cost
        }

        fn set_cost(&mut self, value: f64) {
            self.cost = value;
        }
    }

    impl SaProblem for Parabola {
        type Solution = Point;

        fn initial_solution<R: Rng>(&self, _rng: &mut R) -> Self::Solution {
            Point {
                x: 10.0,
                cost: f64::INFINITY,
            }
        }

        fn neighbor<R: Rng>(
            &self,
            solution: &Self::Solution,
            operator: NeighborhoodOperator,
            temperature: f64,
            rng: &mut R,
        ) -> Option<Self::Solution> {
            let x = match operator {
                NeighborhoodOperator::Teleport => rng.gen_range(-5.0..20.0),
                _ => {
                    let step = (4.0 * temperature).max(0.1);
                    solution.x + rng.gen_range(-step..step)
                }
            };
            (x >= 0.0).then_some(Point { x, cost: 0.0 })
        }

        fn evaluate(&self, solution: &mut Self::Solution) {
            solution.set_cost((solution.x - 3.0).powi(2));
        }
    }

    #[test]
    fn test_sa_converges() {
        let config = SaConfig::default()
            .with_initial_temp(5.0)
            .with_cooling_rate(0.999)
            .with_max_iterations(5_000);

        let runner = SaRunner::new(config, Parabola);
        let result = runner.run_seeded(7);

        assert!(result.best_cost < 0.05, "best cost {}", result.best_cost);
        assert!(result.best.x >= 0.0);
        assert_eq!(result.iterations, 5_000);
        assert!(result.accepted > 0);
    }

    #[test]
    fn test_infeasible_proposals_are_counted() {
        let config = SaConfig::default().with_max_iterations(2_000);
        let result = SaRunner::new(config, Parabola).run_seeded(3);

        // Teleports land in [-5, 0) a fifth of the time.
        assert!(result.infeasible > 0);
        assert!(result.accepted + result.infeasible <= result.iterations);
    }

    #[test]
    fn test_cooling_is_per_step() {
        let config = SaConfig::default()
            .with_initial_temp(1.0)
            .with_cooling_rate(0.99)
            .with_max_iterations(100);
        let result = SaRunner::new(config, Parabola).run_seeded(11);

        // Every step cools by at least the rejection factor and at most the full rate.
        let slowest = 0.99_f64.powf(0.01 * 100.0);
        let fastest = 0.99_f64.powi(100);
        assert!(result.final_temperature <= slowest + 1e-12);
        assert!(result.final_temperature >= fastest - 1e-12);
    }

    #[test]
    fn test_seeded_runs_are_reproducible() {
        let config = SaConfig::default().with_max_iterations(500);
        let runner = SaRunner::new(config, Parabola);

        let a = runner.run_seeded(42);
        let b = runner.run_seeded(42);
        assert_eq!(a.best_cost, b.best_cost);
        assert_eq!(a.accepted, b.accepted);
    }

    #[test]
    fn test_run_parallel_picks_minimum() {
        let config = SaConfig::default().with_max_iterations(300);
        let runner = SaRunner::new(config, Parabola);

        let seeds: Vec<u64> = (0..4).map(|i| derive_seed(9, &[i])).collect();
        let batch = runner.run_batch(&seeds);
        let min = batch
            .iter()
            .map(|r| r.best_cost)
            .fold(f64::INFINITY, f64::min);

        let best = runner.run_parallel(4, 9).unwrap();
        assert_eq!(best.best_cost, min);
    }

    #[test]
    fn test_operator_selection_respects_weights() {
        let weights = OperatorWeights::new(0.0, 0.0, 1.0);
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..50 {
            assert_eq!(weights.select(&mut rng), NeighborhoodOperator::Rotation);
        }

        let defaults = OperatorWeights::default();
        assert!((defaults.translate() - 0.55).abs() < 1e-12);
    }

    #[test]
    fn test_derive_seed_decorrelates_streams() {
        let a = derive_seed(1, &[0, 0]);
        let b = derive_seed(1, &[0, 1]);
        let c = derive_seed(1, &[1, 0]);
        assert_ne!(a, b);
        assert_ne!(a, c);
        assert_ne!(b, c);
        assert_eq!(a, derive_seed(1, &[0, 0]));
    }
}
