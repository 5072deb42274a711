//! The stack solver: reduces 3D items to stacked floor footprints.
//!
//! A run walks through four phases:
//!
//! 1. **Graph build**: a directed support graph over all items, with an edge
//!    `lower -> upper` whenever the support rule allows `upper` on `lower`.
//! 2. **DP**: for every item, the longest chain of supported items starting at
//!    it whose total height stays within the limit.
//! 3. **Greedy selection**: the top-K chain bases, ranked by chain length per
//!    footprint area, are reconstructed in rank order. Items claimed by an
//!    earlier stack are skipped, which truncates later chains.
//! 4. **Aggregation**: every stack becomes one placement object. Unclaimed
//!    items become singleton stacks.

use crate::aggregate::{assign_type_ids, to_placement_object, StackFootprint};
use crate::boundary::Container;
use crate::geometry::Item;
use crate::support::{SupportRule, SupportRuleKind};
use log::{debug, info, warn};
use std::fmt;
use std::time::{Duration, Instant};
use u_loading_core::geometry::{Geometry, EPSILON};
use u_loading_core::{Error, Result, Solver};
use u_loading_d2::PlacementObject;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Default number of ranked stack bases that are reconstructed.
pub const DEFAULT_TOP_K: usize = 12;

/// Default wall-clock budget of the greedy selection.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(180);

/// How equal-footprint items that support each other are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TiePolicy {
    /// Keep only the edge from the earlier to the later item in descending
    /// area order, so identical items still stack.
    #[default]
    InputOrder,
    /// Drop both edges.
    NonStackable,
}

/// Configuration of the stack solver.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StackConfig {
    /// Number of ranked stack bases considered by the greedy selection.
    pub top_k: usize,
    /// Wall-clock budget, measured from the start of the run.
    pub timeout: Duration,
    /// Support predicate.
    pub rule: SupportRuleKind,
    /// Treatment of mutual support edges.
    pub tie_policy: TiePolicy,
}

impl Default for StackConfig {
    fn default() -> Self {
        Self {
            top_k: DEFAULT_TOP_K,
            timeout: DEFAULT_TIMEOUT,
            rule: SupportRuleKind::default(),
            tie_policy: TiePolicy::default(),
        }
    }
}

impl StackConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the number of ranked bases.
    pub fn with_top_k(mut self, k: usize) -> Self {
        self.top_k = k;
        self
    }

    /// Sets the wall-clock budget.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the support rule.
    pub fn with_rule(mut self, rule: SupportRuleKind) -> Self {
        self.rule = rule;
        self
    }

    /// Sets the tie policy.
    pub fn with_tie_policy(mut self, policy: TiePolicy) -> Self {
        self.tie_policy = policy;
        self
    }
}

/// Phase of a stack solver run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum StackPhase {
    /// Input validated.
    Init,
    /// Support graph built.
    GraphBuilt,
    /// Chain table computed.
    DpComplete,
    /// Reconstructing stacks from ranked bases.
    GreedySelecting,
    /// All items assigned.
    Done,
}

impl fmt::Display for StackPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StackPhase::Init => "init",
            StackPhase::GraphBuilt => "graph-built",
            StackPhase::DpComplete => "dp-complete",
            StackPhase::GreedySelecting => "greedy-selecting",
            StackPhase::Done => "done",
        };
        f.write_str(name)
    }
}

/// Directed support graph. `successors(lower)` lists the items that may stand
/// directly on `lower`, in ascending index order.
#[derive(Debug, Clone)]
pub struct SupportGraph {
    successors: Vec<Vec<usize>>,
}

impl SupportGraph {
    /// Checks every ordered pair of distinct items against `rule`.
    pub fn build<R: SupportRule + ?Sized>(items: &[Item], rule: &R) -> Self {
        let successors = items
            .iter()
            .enumerate()
            .map(|(i, lower)| {
                items
                    .iter()
                    .enumerate()
                    .filter(|&(j, upper)| i != j && rule.supports(lower, upper))
                    .map(|(j, _)| j)
                    .collect()
            })
            .collect();
        Self { successors }
    }

    /// Returns the number of nodes.
    pub fn len(&self) -> usize {
        self.successors.len()
    }

    /// Returns true if the graph has no nodes.
    pub fn is_empty(&self) -> bool {
        self.successors.is_empty()
    }

    /// Returns the items that may stand on `lower`.
    pub fn successors(&self, lower: usize) -> &[usize] {
        &self.successors[lower]
    }

    /// Returns true if `upper` may stand on `lower`.
    pub fn has_edge(&self, lower: usize, upper: usize) -> bool {
        self.successors[lower].binary_search(&upper).is_ok()
    }

    /// Returns the total number of edges.
    pub fn edge_count(&self) -> usize {
        self.successors.iter().map(Vec::len).sum()
    }

    /// Returns every pair `(a, b)`, `a < b`, with edges in both directions.
    pub fn mutual_pairs(&self) -> Vec<(usize, usize)> {
        self.successors
            .iter()
            .enumerate()
            .flat_map(|(a, succ)| {
                succ.iter()
                    .filter(move |&&b| a < b && self.has_edge(b, a))
                    .map(move |&b| (a, b))
            })
            .collect()
    }
}

/// One row of the chain table: the longest height-feasible chain starting at
/// an item.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChainEntry {
    /// Number of items in the chain, including the start.
    pub count: usize,
    /// Total height of the chain.
    pub height: f64,
    /// Next item up, if any.
    pub successor: Option<usize>,
}

/// An ordered set of items, bottom first, whose heights fit the limit.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Stack {
    members: Vec<usize>,
    total_height: f64,
    total_weight: f64,
    footprint: StackFootprint,
}

impl Stack {
    fn from_members(items: &[Item], members: Vec<usize>) -> Self {
        let total_height = members.iter().map(|&m| items[m].height()).sum();
        let total_weight = members.iter().map(|&m| items[m].weight()).sum();
        let footprint = StackFootprint::of(items, &members);
        Self {
            members,
            total_height,
            total_weight,
            footprint,
        }
    }

    /// Returns the item indices, bottom first.
    pub fn members(&self) -> &[usize] {
        &self.members
    }

    /// Returns the number of items.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Returns true if the stack has no items.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Returns the bottom item index.
    pub fn base(&self) -> Option<usize> {
        self.members.first().copied()
    }

    /// Returns the sum of member heights.
    pub fn total_height(&self) -> f64 {
        self.total_height
    }

    /// Returns the sum of member weights.
    pub fn total_weight(&self) -> f64 {
        self.total_weight
    }

    /// Returns the aggregated floor footprint.
    pub fn footprint(&self) -> &StackFootprint {
        &self.footprint
    }
}

/// Result of a stack solver run.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StackSolution {
    /// Stacks partitioning the input items.
    pub stacks: Vec<Stack>,
    /// One placement object per stack, same order.
    pub objects: Vec<PlacementObject>,
    /// Sum of the aggregated footprint areas.
    pub total_footprint_area: f64,
    /// Phase in which the wall-clock budget expired, if it did.
    pub timed_out_at: Option<StackPhase>,
    /// Wall-clock time of the run.
    pub elapsed: Duration,
}

impl StackSolution {
    /// Returns the number of stacks.
    pub fn stack_count(&self) -> usize {
        self.stacks.len()
    }

    /// Returns the number of stacked items.
    pub fn item_count(&self) -> usize {
        self.stacks.iter().map(Stack::len).sum()
    }

    /// Returns true if the greedy selection was cut short.
    pub fn timed_out(&self) -> bool {
        self.timed_out_at.is_some()
    }
}

/// Stack solver.
#[derive(Debug, Clone, Default)]
pub struct StackSolver {
    config: StackConfig,
}

impl StackSolver {
    /// Creates a solver with the given configuration.
    pub fn new(config: StackConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &StackConfig {
        &self.config
    }

    /// Partitions `items` into stacks no taller than `max_height`.
    pub fn stack(&self, items: &[Item], max_height: f64) -> Result<StackSolution> {
        self.stack_with_rule(items, max_height, &self.config.rule)
    }

    /// Like [`StackSolver::stack`], with an explicit support rule.
    pub fn stack_with_rule(
        &self,
        items: &[Item],
        max_height: f64,
        rule: &dyn SupportRule,
    ) -> Result<StackSolution> {
        let start = Instant::now();

        validate_input(items, max_height)?;
        log_phase(StackPhase::Init, items.len());

        let graph = SupportGraph::build(items, rule);
        log_phase(StackPhase::GraphBuilt, graph.edge_count());

        let mutual = graph.mutual_pairs();
        if !mutual.is_empty() {
            warn!(
                "{} equal-footprint item pairs support each other, resolved by {:?}",
                mutual.len(),
                self.config.tie_policy
            );
        }

        let order = descending_area_order(items);
        let table = chain_table(items, &graph, &order, max_height, self.config.tie_policy);
        log_phase(StackPhase::DpComplete, items.len());

        log_phase(StackPhase::GreedySelecting, self.config.top_k);
        let (mut chains, timed_out_at) =
            self.select_chains(items, &table, &order, max_height, start);

        let mut claimed = vec![false; items.len()];
        for &m in chains.iter().flatten() {
            claimed[m] = true;
        }
        let leftovers: Vec<usize> = order.iter().copied().filter(|&i| !claimed[i]).collect();
        if !leftovers.is_empty() {
            debug!(
                "{} items not used by ranked stacks, packed as singletons",
                leftovers.len()
            );
        }
        chains.extend(leftovers.into_iter().map(|i| vec![i]));

        let stacks: Vec<Stack> = chains
            .into_iter()
            .map(|members| Stack::from_members(items, members))
            .collect();
        let objects = aggregate(&stacks);
        let total_footprint_area = objects.iter().map(|o| o.area()).sum();
        log_phase(StackPhase::Done, stacks.len());

        info!(
            "Stacked {} items into {} stacks (footprint area {:.2}, rule {})",
            items.len(),
            stacks.len(),
            total_footprint_area,
            rule.name()
        );

        Ok(StackSolution {
            stacks,
            objects,
            total_footprint_area,
            timed_out_at,
            elapsed: start.elapsed(),
        })
    }

    /// Reconstructs chains from the top-K ranked bases.
    fn select_chains(
        &self,
        items: &[Item],
        table: &[ChainEntry],
        order: &[usize],
        max_height: f64,
        start: Instant,
    ) -> (Vec<Vec<usize>>, Option<StackPhase>) {
        // Every item competes for a slot; a count-1 base stays a singleton.
        let mut candidates: Vec<usize> = order.to_vec();
        candidates.sort_by(|&a, &b| {
            let score_a = table[a].count as f64 / items[a].footprint_area();
            let score_b = table[b].count as f64 / items[b].footprint_area();
            score_b.total_cmp(&score_a)
        });
        candidates.truncate(self.config.top_k);

        let mut available = vec![true; items.len()];
        let mut chains = Vec::new();
        let mut warned_stale = false;

        for base in candidates {
            if start.elapsed() >= self.config.timeout {
                warn!(
                    "Stack selection timed out after {:?}; remaining items become singletons",
                    self.config.timeout
                );
                return (chains, Some(StackPhase::GreedySelecting));
            }
            if !available[base] {
                continue;
            }

            available[base] = false;
            let mut chain = vec![base];
            let mut height = items[base].height();
            let mut next = table[base].successor;

            while let Some(upper) = next {
                if available[upper] && height + items[upper].height() <= max_height + EPSILON {
                    available[upper] = false;
                    chain.push(upper);
                    height += items[upper].height();
                    next = table[upper].successor;
                } else {
                    if !warned_stale {
                        warn!(
                            "Chain from '{}' truncated at '{}': item already stacked",
                            items[base].name(),
                            items[upper].name()
                        );
                        warned_stale = true;
                    }
                    break;
                }
            }

            debug!(
                "Stack {} from base '{}': {} items, height {:.3}",
                chains.len() + 1,
                items[base].name(),
                chain.len(),
                height
            );
            chains.push(chain);
        }

        (chains, None)
    }
}

impl Solver for StackSolver {
    type Input = Item;
    type Boundary = Container;
    type Output = StackSolution;

    fn solve(&self, input: &[Item], boundary: &Container) -> Result<StackSolution> {
        boundary.validate()?;
        self.stack(input, boundary.height())
    }
}

/// Stacks `items` under `max_height` with the default configuration.
pub fn solve_stacks(items: &[Item], max_height: f64) -> Result<StackSolution> {
    StackSolver::default().stack(items, max_height)
}

/// Indices sorted by footprint area, largest first; ties keep input order.
pub fn descending_area_order(items: &[Item]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..items.len()).collect();
    order.sort_by(|&a, &b| {
        items[b]
            .footprint_area()
            .total_cmp(&items[a].footprint_area())
    });
    order
}

/// Computes the chain table.
///
/// Items are visited in ascending area order, so every successor row is final
/// before it is read. Edges towards an earlier position in `order` are
/// ignored, which keeps the walk acyclic when equal areas support each other.
pub fn chain_table(
    items: &[Item],
    graph: &SupportGraph,
    order: &[usize],
    max_height: f64,
    tie_policy: TiePolicy,
) -> Vec<ChainEntry> {
    let mut rank = vec![0; items.len()];
    for (position, &i) in order.iter().enumerate() {
        rank[i] = position;
    }

    let mut table: Vec<ChainEntry> = items
        .iter()
        .map(|item| ChainEntry {
            count: 1,
            height: item.height(),
            successor: None,
        })
        .collect();

    for &lower in order.iter().rev() {
        let own_height = items[lower].height();
        let mut best = ChainEntry {
            count: 1,
            height: own_height,
            successor: None,
        };

        for &upper in graph.successors(lower) {
            if rank[upper] <= rank[lower] {
                continue;
            }
            if tie_policy == TiePolicy::NonStackable && graph.has_edge(upper, lower) {
                continue;
            }

            let above = table[upper];
            let height = own_height + above.height;
            if height <= max_height + EPSILON && above.count + 1 > best.count {
                best = ChainEntry {
                    count: above.count + 1,
                    height,
                    successor: Some(upper),
                };
            }
        }

        table[lower] = best;
    }

    table
}

fn validate_input(items: &[Item], max_height: f64) -> Result<()> {
    if !max_height.is_finite() || max_height <= 0.0 {
        return Err(Error::InvalidBoundary(format!(
            "Maximum stack height must be positive, got {}",
            max_height
        )));
    }

    for item in items {
        item.validate()?;
        if item.height() > max_height + EPSILON {
            return Err(Error::ItemTooTall {
                item: item.name().to_string(),
                height: item.height(),
                max_height,
            });
        }
    }

    Ok(())
}

fn aggregate(stacks: &[Stack]) -> Vec<PlacementObject> {
    let signatures: Vec<(&StackFootprint, f64)> = stacks
        .iter()
        .map(|s| (s.footprint(), s.total_height()))
        .collect();
    let type_ids = assign_type_ids(&signatures);

    stacks
        .iter()
        .zip(type_ids)
        .enumerate()
        .map(|(index, (stack, type_id))| {
            to_placement_object(
                index,
                stack.footprint(),
                stack.total_height(),
                stack.total_weight(),
                type_id,
            )
        })
        .collect()
}

fn log_phase(phase: StackPhase, count: usize) {
    debug!("Stack solver phase {} ({})", phase, count);
}
