//! Floor packer: largest-first seeding, annealing refinement rounds and
//! global best-fit insertion.

use crate::boundary::FloorArea;
use crate::geometry::PlacementObject;
use crate::insertion::{select_best_fit, InsertionOutcome};
use crate::layout::{FloorLayout, PlacedObject};
use crate::sa_floor::refine_layout;
use std::collections::HashSet;
use std::time::Instant;
use u_loading_core::geometry::{Geometry, GeometryId};
use u_loading_core::solver::{PackingParams, Solver};
use u_loading_core::{Error, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Why the outer packing loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum StopReason {
    /// Every object in the pool was placed. Objects too large for the floor
    /// are still reported as unplaced.
    AllPlaced,
    /// No remaining object had a collision-free position.
    NoFeasiblePosition,
    /// No object could be placed and at least one would have exceeded the
    /// weight limit.
    WeightLimit,
}

/// Export record of one placed object.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FloorPlacement {
    /// Run-local object index.
    pub id: usize,
    /// Object name.
    pub label: GeometryId,
    /// Grouping type id.
    pub type_id: usize,
    /// Stack the object represents.
    pub source: Option<usize>,
    /// Bottom-left corner x.
    pub x: f64,
    /// Bottom-left corner y.
    pub y: f64,
    /// Center x.
    pub center_x: f64,
    /// Center y.
    pub center_y: f64,
    /// Bounding width as placed.
    pub width: f64,
    /// Bounding height as placed.
    pub height: f64,
    /// Whether the object is turned by 90 degrees.
    pub rotated: bool,
}

impl From<&PlacedObject> for FloorPlacement {
    fn from(p: &PlacedObject) -> Self {
        let (w, h) = (p.object.width(), p.object.height());
        Self {
            id: p.object.index(),
            label: p.object.label().to_string(),
            type_id: p.object.type_id(),
            source: p.object.source(),
            x: p.center.x - w / 2.0,
            y: p.center.y - h / 2.0,
            center_x: p.center.x,
            center_y: p.center.y,
            width: w,
            height: h,
            rotated: p.object.rotated(),
        }
    }
}

/// Result of a floor packing run.
#[derive(Debug, Clone)]
pub struct FloorPackResult {
    /// The final layout.
    pub layout: FloorLayout,
    /// Objects that were not placed.
    pub unplaced: Vec<PlacementObject>,
    /// Total weight of the placed objects.
    pub total_weight: f64,
    /// Number of refinement rounds.
    pub rounds: usize,
    /// Cost of the final layout.
    pub best_cost: f64,
    /// Adopted cost after every round.
    pub cost_history: Vec<f64>,
    /// Why the loop ended.
    pub stop_reason: StopReason,
    /// Computation time in milliseconds.
    pub computation_time_ms: u64,
}

impl FloorPackResult {
    fn empty(unplaced: Vec<PlacementObject>, start: Instant) -> Self {
        let stop_reason = if unplaced.is_empty() {
            StopReason::AllPlaced
        } else {
            StopReason::NoFeasiblePosition
        };
        Self {
            layout: FloorLayout::new(),
            unplaced,
            total_weight: 0.0,
            rounds: 0,
            best_cost: 0.0,
            cost_history: Vec::new(),
            stop_reason,
            computation_time_ms: start.elapsed().as_millis() as u64,
        }
    }

    /// Returns the export records of all placed objects.
    pub fn records(&self) -> Vec<FloorPlacement> {
        self.layout.placed().iter().map(FloorPlacement::from).collect()
    }

    /// Returns true if every object was placed.
    pub fn all_placed(&self) -> bool {
        self.unplaced.is_empty()
    }

    /// Placed footprint area divided by the floor area.
    pub fn utilization(&self, floor: &FloorArea) -> f64 {
        if floor.area() > 0.0 {
            self.layout.footprint_area() / floor.area()
        } else {
            0.0
        }
    }
}

/// 2D floor packing solver.
#[derive(Debug, Clone, Default)]
pub struct FloorPacker {
    params: PackingParams,
}

impl FloorPacker {
    /// Creates a new packer with the given parameters.
    pub fn new(params: PackingParams) -> Self {
        Self { params }
    }

    /// Returns the parameters.
    pub fn params(&self) -> &PackingParams {
        &self.params
    }

    /// Packs `pool` onto `floor`.
    ///
    /// Fails only on invalid input or when the largest object alone is
    /// heavier than the floor may carry; running out of room yields a partial
    /// result with the remainder in `unplaced`.
    pub fn pack(&self, pool: &[PlacementObject], floor: &FloorArea) -> Result<FloorPackResult> {
        let start = Instant::now();
        self.params.validate()?;
        floor.validate()?;

        let mut seen = HashSet::new();
        for object in pool {
            object.validate()?;
            if !seen.insert(object.index()) {
                return Err(Error::InvalidGeometry(format!(
                    "duplicate object index {} ({})",
                    object.index(),
                    object.label()
                )));
            }
        }

        let mut pool = pool.to_vec();
        pool.sort_by(|a, b| {
            b.area()
                .total_cmp(&a.area())
                .then_with(|| a.index().cmp(&b.index()))
        });

        let (mut pool, mut unplaced): (Vec<_>, Vec<_>) = pool.into_iter().partition(|o| {
            o.fits_floor(floor.width(), floor.height())
                || o.rotated_copy().fits_floor(floor.width(), floor.height())
        });
        for object in &unplaced {
            log::warn!(
                "Object {} ({}x{}) does not fit the {}x{} floor in any orientation",
                object.label(),
                object.width(),
                object.height(),
                floor.width(),
                floor.height()
            );
        }

        if pool.is_empty() {
            return Ok(FloorPackResult::empty(unplaced, start));
        }

        let mut seed = pool.remove(0);
        if seed.weight() > floor.weight_capacity() {
            return Err(Error::TooHeavy {
                item: seed.label().to_string(),
                weight: seed.weight(),
                max_weight: floor.weight_capacity(),
            });
        }
        if !seed.fits_floor(floor.width(), floor.height()) {
            seed.rotate();
        }

        let (cx, cy) = floor.center();
        let mut current_weight = seed.weight();
        let mut layout = FloorLayout::new();
        log::info!(
            "Packing {} objects on a {}x{} floor, seeded with {}",
            pool.len() + 1,
            floor.width(),
            floor.height(),
            seed.label()
        );
        layout.push(PlacedObject::new(seed, cx, cy));

        let mut cost_history = Vec::new();
        let mut round = 0u64;
        let stop_reason = loop {
            let refinement = refine_layout(&layout, floor, &self.params, round);
            log::debug!(
                "Round {}: {} placed, weight {:.2}, cost {:.3} (worker {}, {} accepted, {} infeasible)",
                round + 1,
                refinement.layout.len(),
                current_weight,
                refinement.cost,
                refinement.worker,
                refinement.accepted,
                refinement.infeasible
            );
            layout = refinement.layout;
            cost_history.push(refinement.cost);
            round += 1;

            if pool.is_empty() {
                break StopReason::AllPlaced;
            }

            match select_best_fit(
                &pool,
                &layout,
                floor,
                current_weight,
                self.params.max_placement_tries,
                self.params.seed,
                round,
            ) {
                InsertionOutcome::Placed(insertion) => {
                    let object = pool.remove(insertion.pool_index);
                    current_weight += object.weight();
                    log::debug!(
                        "Inserted {} at ({:.3}, {:.3}), metric {:.3}{}",
                        object.label(),
                        insertion.x,
                        insertion.y,
                        insertion.metric,
                        if insertion.object.rotated() { ", rotated" } else { "" }
                    );
                    layout.push(insertion.into_placed());
                }
                InsertionOutcome::NoFeasiblePosition => break StopReason::NoFeasiblePosition,
                InsertionOutcome::WeightLimit => break StopReason::WeightLimit,
            }
        };

        log::info!(
            "Floor packing finished after {} rounds: {} placed, {} left ({:?})",
            round,
            layout.len(),
            pool.len() + unplaced.len(),
            stop_reason
        );

        unplaced.extend(pool);
        Ok(FloorPackResult {
            best_cost: cost_history.last().copied().unwrap_or(0.0),
            layout,
            unplaced,
            total_weight: current_weight,
            rounds: round as usize,
            cost_history,
            stop_reason,
            computation_time_ms: start.elapsed().as_millis() as u64,
        })
    }
}

impl Solver for FloorPacker {
    type Input = PlacementObject;
    type Boundary = FloorArea;
    type Output = FloorPackResult;

    fn solve(&self, input: &[PlacementObject], boundary: &FloorArea) -> Result<FloorPackResult> {
        self.pack(input, boundary)
    }
}

/// Packs `pool` onto `floor` with the given parameters.
pub fn pack_floor(
    pool: &[PlacementObject],
    floor: &FloorArea,
    params: &PackingParams,
) -> Result<FloorPackResult> {
    FloorPacker::new(params.clone()).pack(pool, floor)
}
