//! Global best-fit insertion of pool objects into a layout.

use crate::boundary::FloorArea;
use crate::geometry::PlacementObject;
use crate::layout::{FloorLayout, PlacedObject};
use rand::prelude::*;
use rayon::prelude::*;
use u_loading_core::geometry::EPSILON;
use u_loading_core::sa::derive_seed;

/// Stream tag separating insertion trials from annealing workers.
const INSERTION_STREAM: u64 = 0x5EED_1A5E_7000_0001;

/// Bottom-left biased position score. Lower is better.
pub fn placement_metric(x: f64, y: f64) -> f64 {
    y + 0.1 * x
}

/// A feasible insertion found for a pool object.
#[derive(Debug, Clone, PartialEq)]
pub struct Insertion {
    /// Index into the pool.
    pub pool_index: usize,
    /// The object in the orientation it will be placed in.
    pub object: PlacementObject,
    /// Center x.
    pub x: f64,
    /// Center y.
    pub y: f64,
    /// Position score.
    pub metric: f64,
}

impl Insertion {
    /// Converts the insertion into a placed object.
    pub fn into_placed(self) -> PlacedObject {
        PlacedObject::new(self.object, self.x, self.y)
    }
}

/// Result of one insertion phase.
#[derive(Debug, Clone, PartialEq)]
pub enum InsertionOutcome {
    /// The globally best object and position.
    Placed(Insertion),
    /// Every eligible object collided at every trial point.
    NoFeasiblePosition,
    /// No object was placed and at least one was skipped for its weight.
    WeightLimit,
}

/// Samples `tries` uniform center points and returns the best
/// collision-free one as `(x, y, metric)`.
pub fn find_best_position<R: Rng>(
    object: &PlacementObject,
    layout: &FloorLayout,
    floor: &FloorArea,
    tries: usize,
    rng: &mut R,
) -> Option<(f64, f64, f64)> {
    let ((x0, x1), (y0, y1)) = floor.center_range(object.width(), object.height())?;

    let mut best: Option<(f64, f64, f64)> = None;
    for _ in 0..tries {
        let x = rng.gen_range(x0..=x1);
        let y = rng.gen_range(y0..=y1);
        if layout.collides(&object.shape_at(x, y), None) {
            continue;
        }
        let metric = placement_metric(x, y);
        if best.map_or(true, |(_, _, m)| metric < m) {
            best = Some((x, y, metric));
        }
    }
    best
}

/// Evaluates an object as given and, for non-square rectangles, turned by
/// 90 degrees; keeps the better orientation (the original one on ties).
pub fn best_orientation<R: Rng>(
    pool_index: usize,
    object: &PlacementObject,
    layout: &FloorLayout,
    floor: &FloorArea,
    tries: usize,
    rng: &mut R,
) -> Option<Insertion> {
    let upright = find_best_position(object, layout, floor, tries, rng).map(|(x, y, metric)| {
        Insertion {
            pool_index,
            object: object.clone(),
            x,
            y,
            metric,
        }
    });

    if !object.is_rotatable() {
        return upright;
    }

    let turned_object = object.rotated_copy();
    let turned = find_best_position(&turned_object, layout, floor, tries, rng).map(
        |(x, y, metric)| Insertion {
            pool_index,
            object: turned_object,
            x,
            y,
            metric,
        },
    );

    match (upright, turned) {
        (Some(a), Some(b)) => Some(if a.metric <= b.metric { a } else { b }),
        (a, b) => a.or(b),
    }
}

/// Picks the single best object and position among all pool objects that
/// still fit the remaining weight budget.
///
/// Trials for each object use their own random stream derived from `seed`,
/// the round and the object index, so the outcome does not depend on how
/// rayon schedules the evaluations. Ties go to the earlier pool entry.
pub fn select_best_fit(
    pool: &[PlacementObject],
    layout: &FloorLayout,
    floor: &FloorArea,
    current_weight: f64,
    tries: usize,
    seed: u64,
    round: u64,
) -> InsertionOutcome {
    let capacity = floor.weight_capacity();
    let (eligible, too_heavy): (Vec<usize>, Vec<usize>) = (0..pool.len())
        .partition(|&j| current_weight + pool[j].weight() <= capacity + EPSILON);

    let candidates: Vec<Insertion> = eligible
        .par_iter()
        .filter_map(|&j| {
            let object = &pool[j];
            let stream = derive_seed(seed, &[round, INSERTION_STREAM, object.index() as u64]);
            let mut rng = StdRng::seed_from_u64(stream);
            best_orientation(j, object, layout, floor, tries, &mut rng)
        })
        .collect();

    let best = candidates
        .into_iter()
        .reduce(|best, c| if c.metric < best.metric { c } else { best });

    match best {
        Some(insertion) => InsertionOutcome::Placed(insertion),
        None if !too_heavy.is_empty() => InsertionOutcome::WeightLimit,
        None => InsertionOutcome::NoFeasiblePosition,
    }
}
