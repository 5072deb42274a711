//! Stack solving followed by floor packing.

use crate::core::{
    Error, PackingParams, Placement, Result, SolveResult, SolveSummary, Solver, Strategy,
};
use crate::d2::{pack_floor, FloorPlacement, PlacedObject, StopReason};
use crate::d3::{Container, Item, StackConfig, StackSolution, StackSolver};
use log::info;
use std::time::Instant;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A complete loading plan.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LoadPlan {
    /// Per-item 3D placements and run statistics.
    pub result: SolveResult<f64>,
    /// Floor records of the placed stacks.
    pub floor: Vec<FloorPlacement>,
    /// The stacks the items were grouped into.
    pub stacks: StackSolution,
    /// Why floor packing ended.
    pub stop_reason: StopReason,
}

impl LoadPlan {
    /// Returns the run summary.
    pub fn summary(&self) -> SolveSummary {
        SolveSummary::from(&self.result)
    }
}

/// Plans a container load: stacks items, then packs the stacks on the floor.
#[derive(Debug, Clone, Default)]
pub struct LoadPlanner {
    stack_config: StackConfig,
    params: PackingParams,
}

impl LoadPlanner {
    /// Creates a planner.
    pub fn new(stack_config: StackConfig, params: PackingParams) -> Self {
        Self {
            stack_config,
            params,
        }
    }

    /// Returns the stack solver configuration.
    pub fn stack_config(&self) -> &StackConfig {
        &self.stack_config
    }

    /// Returns the floor packing parameters.
    pub fn params(&self) -> &PackingParams {
        &self.params
    }

    /// Plans the load of `items` into `container`.
    ///
    /// Items that do not fit on the floor are reported in
    /// `result.unplaced`; only invalid input is an error.
    pub fn plan(&self, items: &[Item], container: &Container) -> Result<LoadPlan> {
        let start = Instant::now();
        container.validate()?;
        self.params.validate()?;

        let stacks = StackSolver::new(self.stack_config.clone()).stack(items, container.height())?;

        let floor = container.floor();
        let packed = pack_floor(&stacks.objects, &floor, &self.params)?;

        let mut result = SolveResult::new().with_strategy(Strategy::StackAndPack);
        for placed in packed.layout.placed() {
            result
                .placements
                .extend(project_stack(placed, &stacks, items)?);
        }
        for object in &packed.unplaced {
            match object.source().and_then(|s| stacks.stacks.get(s)) {
                Some(stack) => result
                    .unplaced
                    .extend(stack.members().iter().map(|&m| items[m].name().to_string())),
                None => result.unplaced.push(object.label().to_string()),
            }
        }

        result.utilization = packed.utilization(&floor);
        result.total_weight = packed.total_weight;
        result.stack_count = packed.layout.len();
        result.rounds = packed.rounds;
        result.cost_history = packed.cost_history.clone();
        result.computation_time_ms = start.elapsed().as_millis() as u64;
        if packed.best_cost.is_finite() {
            result = result.with_best_cost(packed.best_cost);
        }

        info!(
            "Load plan: {}/{} items in {} stacks, utilization {}, {} ms",
            result.placed_count(),
            items.len(),
            result.stack_count,
            result.utilization_percent(),
            result.computation_time_ms
        );

        Ok(LoadPlan {
            floor: packed.records(),
            stop_reason: packed.stop_reason,
            result,
            stacks,
        })
    }
}

impl Solver for LoadPlanner {
    type Input = Item;
    type Boundary = Container;
    type Output = LoadPlan;

    fn solve(&self, input: &[Item], boundary: &Container) -> Result<LoadPlan> {
        self.plan(input, boundary)
    }
}

/// Expands one placed stack into per-item placements, bottom first.
fn project_stack(
    placed: &PlacedObject,
    stacks: &StackSolution,
    items: &[Item],
) -> Result<Vec<Placement<f64>>> {
    let index = placed.object.source().ok_or_else(|| {
        Error::Internal(format!("Floor object {} has no stack", placed.object.label()))
    })?;
    let stack = stacks
        .stacks
        .get(index)
        .ok_or_else(|| Error::Internal(format!("Stack index {} out of range", index)))?;

    let turned_stack = placed.object.rotated();
    let mut z = 0.0;
    let placements = stack
        .members()
        .iter()
        .zip(&stack.footprint().turned)
        .enumerate()
        .map(|(level, (&m, &turned))| {
            let placement = Placement::new_3d(
                items[m].name().to_string(),
                placed.center.x,
                placed.center.y,
                z,
                turned_stack ^ turned,
            )
            .with_stack(index, level);
            z += items[m].height();
            placement
        })
        .collect();

    Ok(placements)
}
