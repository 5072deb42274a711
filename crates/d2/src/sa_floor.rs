//! Simulated Annealing refinement of a floor layout.
//!
//! Each worker starts from its own copy of the current layout, compacts it
//! with [`jiggle`](crate::jiggle::jiggle) and then anneals it with four moves:
//!
//! - **Swap**: exchange the centers of two objects
//! - **Teleport**: move one object to a uniformly random position
//! - **Rotation**: turn a non-square rectangle by 90 degrees in place
//! - **Translate**: shift one object by at most `multiplier * temperature`
//!
//! Every move clamps the moved objects onto the floor; a move that makes an
//! object collide is infeasible and is discarded without computing its cost.

use crate::boundary::FloorArea;
use crate::cost::{layout_cost, CostWeights};
use crate::jiggle::{jiggle, JiggleConfig};
use crate::layout::FloorLayout;
use rand::prelude::*;
use u_loading_core::sa::{
    derive_seed, NeighborhoodOperator, OperatorWeights, SaProblem, SaRunner, SaSolution,
};
use u_loading_core::solver::PackingParams;

/// SA problem definition for floor layouts.
#[derive(Debug, Clone)]
pub struct SaFloorProblem {
    /// Layout every worker starts from.
    start: FloorLayout,
    /// The floor.
    floor: FloorArea,
    /// Cost weights.
    weights: CostWeights,
    /// Move probabilities.
    operators: OperatorWeights,
    /// Compaction applied before annealing.
    jiggle: JiggleConfig,
    /// Scales the translate step with the temperature.
    max_move_multiplier: f64,
}

impl SaFloorProblem {
    /// Creates a new problem from the current layout.
    pub fn new(start: FloorLayout, floor: FloorArea, params: &PackingParams) -> Self {
        Self {
            start,
            floor,
            weights: CostWeights::from(params),
            operators: params.operator_weights(),
            jiggle: JiggleConfig {
                step: params.jiggle_step,
                shrink: params.jiggle_shrink,
                max_iterations: params.jiggle_max_iterations,
            },
            max_move_multiplier: params.max_move_multiplier,
        }
    }

    /// Returns the floor.
    pub fn floor(&self) -> &FloorArea {
        &self.floor
    }

    /// Returns the cost weights.
    pub fn weights(&self) -> &CostWeights {
        &self.weights
    }

    fn swap<R: Rng>(&self, layout: &mut FloorLayout, rng: &mut R) -> bool {
        let n = layout.len();
        let a = rng.gen_range(0..n);
        let mut b = rng.gen_range(0..n - 1);
        if b >= a {
            b += 1;
        }

        layout.swap_centers(a, b);
        for i in [a, b] {
            if let Some(member) = layout.get_mut(i) {
                let c = member.center;
                member.move_to(&self.floor, c.x, c.y);
            }
        }
        !layout.member_collides(a) && !layout.member_collides(b)
    }

    fn teleport<R: Rng>(&self, layout: &mut FloorLayout, rng: &mut R) -> bool {
        let i = rng.gen_range(0..layout.len());
        let Some(member) = layout.get_mut(i) else {
            return false;
        };
        let Some(((x0, x1), (y0, y1))) = self
            .floor
            .center_range(member.object.width(), member.object.height())
        else {
            return false;
        };

        let x = rng.gen_range(x0..=x1);
        let y = rng.gen_range(y0..=y1);
        member.move_to(&self.floor, x, y);
        !layout.member_collides(i)
    }

    // Infeasible when only circles and squares are placed.
    fn rotate<R: Rng>(&self, layout: &mut FloorLayout, rng: &mut R) -> bool {
        let rotatable: Vec<usize> = (0..layout.len())
            .filter(|&i| layout.get(i).is_some_and(|p| p.object.is_rotatable()))
            .collect();
        let Some(&i) = rotatable.choose(rng) else {
            return false;
        };

        let Some(member) = layout.get_mut(i) else {
            return false;
        };
        member.object.rotate();
        let c = member.center;
        member.move_to(&self.floor, c.x, c.y);
        !layout.member_collides(i)
    }

    fn translate<R: Rng>(&self, layout: &mut FloorLayout, temperature: f64, rng: &mut R) -> bool {
        let i = rng.gen_range(0..layout.len());
        let max_move =
            (self.max_move_multiplier * temperature * (0.8 + 0.2 * rng.gen::<f64>())).max(0.1);
        let dx = rng.gen_range(-max_move..=max_move);
        let dy = rng.gen_range(-max_move..=max_move);

        let Some(member) = layout.get_mut(i) else {
            return false;
        };
        let c = member.center;
        member.move_to(&self.floor, c.x + dx, c.y + dy);
        !layout.member_collides(i)
    }
}

impl SaProblem for SaFloorProblem {
    type Solution = FloorLayout;

    fn initial_solution<R: Rng>(&self, _rng: &mut R) -> Self::Solution {
        let mut layout = self.start.clone();
        jiggle(&mut layout, &self.floor, &self.jiggle);
        layout
    }

    fn neighbor<R: Rng>(
        &self,
        solution: &Self::Solution,
        operator: NeighborhoodOperator,
        temperature: f64,
        rng: &mut R,
    ) -> Option<Self::Solution> {
        if solution.len() < 2 {
            return None;
        }

        let mut candidate = solution.clone();
        let feasible = match operator {
            NeighborhoodOperator::Swap => self.swap(&mut candidate, rng),
            NeighborhoodOperator::Teleport => self.teleport(&mut candidate, rng),
            NeighborhoodOperator::Rotation => self.rotate(&mut candidate, rng),
            NeighborhoodOperator::Translate => self.translate(&mut candidate, temperature, rng),
        };

        feasible.then_some(candidate)
    }

    fn evaluate(&self, solution: &mut Self::Solution) {
        solution.set_cost(layout_cost(solution, &self.weights));
    }

    fn operator_weights(&self) -> OperatorWeights {
        self.operators
    }

    fn on_progress(&self, iteration: u64, temperature: f64, best: &Self::Solution) {
        log::trace!(
            "SA iteration {}: temperature={:.6}, best_cost={:.3}",
            iteration,
            temperature,
            best.cost()
        );
    }
}

/// Outcome of one refinement round.
#[derive(Debug, Clone)]
pub struct Refinement {
    /// The adopted (minimum-cost) layout.
    pub layout: FloorLayout,
    /// Its cost.
    pub cost: f64,
    /// Index of the worker that produced it.
    pub worker: usize,
    /// Accepted proposals summed over all workers.
    pub accepted: u64,
    /// Infeasible proposals summed over all workers.
    pub infeasible: u64,
}

/// Runs `params.num_sa_runs` independent workers on copies of `layout` and
/// adopts the lowest-cost result.
///
/// Worker `w` of round `round` is seeded with
/// `derive_seed(params.seed, &[round, w])`. The call blocks until every
/// worker has finished.
pub fn refine_layout(
    layout: &FloorLayout,
    floor: &FloorArea,
    params: &PackingParams,
    round: u64,
) -> Refinement {
    let problem = SaFloorProblem::new(layout.clone(), floor.clone(), params);
    let runner = SaRunner::new(params.sa_config().with_history_interval(0), problem);

    let seeds: Vec<u64> = (0..params.num_sa_runs.max(1) as u64)
        .map(|w| derive_seed(params.seed, &[round, w]))
        .collect();
    let results = runner.run_batch(&seeds);

    let accepted = results.iter().map(|r| r.accepted).sum();
    let infeasible = results.iter().map(|r| r.infeasible).sum();

    let best = results
        .into_iter()
        .enumerate()
        .reduce(|best, r| if r.1.best_cost < best.1.best_cost { r } else { best });

    match best {
        Some((worker, result)) => Refinement {
            cost: result.best_cost,
            layout: result.best,
            worker,
            accepted,
            infeasible,
        },
        None => {
            let mut layout = layout.clone();
            runner.problem().evaluate(&mut layout);
            Refinement {
                cost: layout.cost(),
                layout,
                worker: 0,
                accepted,
                infeasible,
            }
        }
    }
}
