//! Solve result representation.

use crate::geometry::GeometryId;
use crate::placement::{Placement, PlacementStats};
use crate::solver::Strategy;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Result of a complete loading run.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SolveResult<S> {
    /// Placements of all successfully loaded items.
    pub placements: Vec<Placement<S>>,

    /// Names of items that could not be loaded.
    pub unplaced: Vec<GeometryId>,

    /// Floor utilization ratio (0.0 - 1.0).
    /// Calculated as: placed footprint area / floor area
    pub utilization: f64,

    /// Total weight of the loaded items.
    pub total_weight: f64,

    /// Number of stacks the items were grouped into.
    pub stack_count: usize,

    /// Number of refinement rounds performed by the floor packer.
    pub rounds: usize,

    /// Cost of the final floor layout.
    pub best_cost: Option<f64>,

    /// Best cost after every refinement round (for analysis).
    pub cost_history: Vec<f64>,

    /// Computation time in milliseconds.
    pub computation_time_ms: u64,

    /// Strategy used for solving.
    pub strategy: Option<Strategy>,
}

impl<S> SolveResult<S> {
    /// Creates a new empty result.
    pub fn new() -> Self {
        Self {
            placements: Vec::new(),
            unplaced: Vec::new(),
            utilization: 0.0,
            total_weight: 0.0,
            stack_count: 0,
            rounds: 0,
            best_cost: None,
            cost_history: Vec::new(),
            computation_time_ms: 0,
            strategy: None,
        }
    }

    /// Returns true if all items were placed.
    pub fn all_placed(&self) -> bool {
        self.unplaced.is_empty()
    }

    /// Returns the number of placed items.
    pub fn placed_count(&self) -> usize {
        self.placements.len()
    }

    /// Returns the number of unplaced items.
    pub fn unplaced_count(&self) -> usize {
        self.unplaced.len()
    }

    /// Returns true if at least one item was placed.
    pub fn is_successful(&self) -> bool {
        !self.placements.is_empty()
    }

    /// Sets the strategy.
    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = Some(strategy);
        self
    }

    /// Sets the best cost.
    pub fn with_best_cost(mut self, cost: f64) -> Self {
        self.best_cost = Some(cost);
        self
    }

    /// Computes placement statistics.
    pub fn placement_stats(&self) -> PlacementStats {
        PlacementStats::from_placements(&self.placements)
    }

    /// Returns utilization as a percentage string.
    pub fn utilization_percent(&self) -> String {
        format!("{:.1}%", self.utilization * 100.0)
    }
}

impl<S> Default for SolveResult<S> {
    fn default() -> Self {
        Self::new()
    }
}

/// Summary statistics for a solve result.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SolveSummary {
    /// Total items requested.
    pub total_requested: usize,
    /// Total items placed.
    pub total_placed: usize,
    /// Number of stacks.
    pub stacks: usize,
    /// Utilization percentage.
    pub utilization_percent: f64,
    /// Total loaded weight.
    pub total_weight: f64,
    /// Computation time in milliseconds.
    pub time_ms: u64,
    /// Strategy used.
    pub strategy: String,
}

impl<S> From<&SolveResult<S>> for SolveSummary {
    fn from(result: &SolveResult<S>) -> Self {
        Self {
            total_requested: result.placements.len() + result.unplaced.len(),
            total_placed: result.placements.len(),
            stacks: result.stack_count,
            utilization_percent: result.utilization * 100.0,
            total_weight: result.total_weight,
            time_ms: result.computation_time_ms,
            strategy: result
                .strategy
                .map(|s| s.name().to_string())
                .unwrap_or_else(|| "unknown".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_new() {
        let result: SolveResult<f64> = SolveResult::new();
        assert!(result.placements.is_empty());
        assert_eq!(result.utilization, 0.0);
        assert!(result.all_placed());
        assert!(!result.is_successful());
    }

    #[test]
    fn test_result_with_unplaced() {
        let mut result: SolveResult<f64> = SolveResult::new();
        result
            .placements
            .push(Placement::new_2d("Stack_1".to_string(), 1.0, 1.0, false));
        result.unplaced.push("Stack_2".to_string());
        result.unplaced.push("Stack_3".to_string());
        result.utilization = 0.85;

        assert!(!result.all_placed());
        assert_eq!(result.unplaced_count(), 2);
        assert_eq!(result.placed_count(), 1);
        assert_eq!(result.utilization_percent(), "85.0%");
    }

    #[test]
    fn test_solve_summary() {
        let mut result: SolveResult<f64> =
            SolveResult::new().with_strategy(Strategy::StackAndPack);
        result
            .placements
            .push(Placement::new_3d("a".to_string(), 0.0, 0.0, 0.0, false).with_stack(0, 0));
        result.unplaced.push("b".to_string());
        result.utilization = 0.75;
        result.stack_count = 1;
        result.total_weight = 12.5;
        result.computation_time_ms = 100;

        let summary = SolveSummary::from(&result);
        assert_eq!(summary.total_requested, 2);
        assert_eq!(summary.total_placed, 1);
        assert_eq!(summary.utilization_percent, 75.0);
        assert_eq!(summary.strategy, "stack-and-pack");
    }
}
