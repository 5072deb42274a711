//! Local compaction ("jiggle") toward the origin corner.

use crate::boundary::FloorArea;
use crate::layout::FloorLayout;
use nalgebra::{Point2, Vector2};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Step schedule of the compaction pass.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct JiggleConfig {
    /// Initial step length.
    pub step: f64,
    /// Step multiplier applied after every pass.
    pub shrink: f64,
    /// Maximum number of passes.
    pub max_iterations: usize,
}

impl Default for JiggleConfig {
    fn default() -> Self {
        Self {
            step: 1.0,
            shrink: 0.98,
            max_iterations: 500,
        }
    }
}

/// Repeatedly nudges every member down, left and diagonally, keeping each
/// move that leaves the layout valid.
///
/// Stops after a pass without any successful move or after
/// `max_iterations` passes. Returns the number of passes performed.
pub fn jiggle(layout: &mut FloorLayout, floor: &FloorArea, config: &JiggleConfig) -> usize {
    let mut step = config.step;
    let mut passes = 0;
    let mut moved = true;

    while moved && passes < config.max_iterations {
        moved = false;
        passes += 1;

        let moves = [
            Vector2::new(0.0, -step),
            Vector2::new(-step, 0.0),
            Vector2::new(-step, -step),
        ];

        for i in 0..layout.len() {
            for delta in &moves {
                let Some(member) = layout.get(i) else {
                    continue;
                };
                let target: Point2<f64> = member.center + *delta;
                let shape = member.object.shape_at(target.x, target.y);

                if floor.contains(&shape) && !layout.collides(&shape, Some(i)) {
                    if let Some(member) = layout.get_mut(i) {
                        member.center = target;
                        moved = true;
                    }
                }
            }
        }

        step *= config.shrink;
    }

    passes
}
