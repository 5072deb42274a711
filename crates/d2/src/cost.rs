//! Layout cost: compaction toward the origin, a small bounding box and
//! spatial grouping of same-type objects.

use crate::layout::FloorLayout;
use std::collections::HashMap;
use u_loading_core::solver::PackingParams;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Weights of the cost terms.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CostWeights {
    /// Area-weighted y positions.
    pub y: f64,
    /// Area-weighted x positions.
    pub x: f64,
    /// Bounding-box area of the whole layout.
    pub box_area: f64,
    /// Mean squared distance to the type centroid.
    pub grouping: f64,
}

impl Default for CostWeights {
    fn default() -> Self {
        Self::from(&PackingParams::default())
    }
}

impl From<&PackingParams> for CostWeights {
    fn from(params: &PackingParams) -> Self {
        Self {
            y: params.weight_y,
            x: params.weight_x,
            box_area: params.weight_box_area,
            grouping: params.weight_grouping,
        }
    }
}

/// Computes the cost of a layout. Lower is better; an empty layout costs 0.
pub fn layout_cost(layout: &FloorLayout, weights: &CostWeights) -> f64 {
    if layout.is_empty() {
        return 0.0;
    }

    let position: f64 = layout
        .placed()
        .iter()
        .map(|p| {
            let area = p.object.area();
            weights.y * area * p.center.y + weights.x * area * p.center.x
        })
        .sum();

    let bbox = layout.bounding_box().map(|b| b.area()).unwrap_or(0.0);

    let grouping = if weights.grouping > 0.0 {
        grouping_spread(layout)
    } else {
        0.0
    };

    position + weights.box_area * bbox + weights.grouping * grouping
}

/// Sum of squared distances to the type centroid over all types with at least
/// two members, divided by the member count.
pub fn grouping_spread(layout: &FloorLayout) -> f64 {
    let mut centroids: HashMap<usize, (f64, f64, usize)> = HashMap::new();
    for p in layout.placed() {
        let entry = centroids.entry(p.object.type_id()).or_insert((0.0, 0.0, 0));
        entry.0 += p.center.x;
        entry.1 += p.center.y;
        entry.2 += 1;
    }

    let spread: f64 = layout
        .placed()
        .iter()
        .filter_map(|p| {
            let (sx, sy, n) = centroids.get(&p.object.type_id()).copied()?;
            if n < 2 {
                return None;
            }
            let dx = p.center.x - sx / n as f64;
            let dy = p.center.y - sy / n as f64;
            Some(dx * dx + dy * dy)
        })
        .sum();

    spread / layout.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::PlacementObject;
    use crate::layout::PlacedObject;
    use approx::assert_relative_eq;

    fn layout(items: &[(usize, f64, f64)]) -> FloorLayout {
        let mut layout = FloorLayout::new();
        for (i, &(type_id, x, y)) in items.iter().enumerate() {
            layout.push(PlacedObject::new(
                PlacementObject::rect(i, format!("R{}", i), 2.0, 2.0).with_type_id(type_id),
                x,
                y,
            ));
        }
        layout
    }

    #[test]
    fn test_empty_layout_costs_nothing() {
        assert_eq!(layout_cost(&FloorLayout::new(), &CostWeights::default()), 0.0);
    }

    #[test]
    fn test_cost_terms() {
        let l = layout(&[(0, 1.0, 1.0), (0, 5.0, 1.0), (1, 3.0, 5.0)]);
        let weights = CostWeights {
            y: 1.0,
            x: 1.0,
            box_area: 0.0,
            grouping: 0.0,
        };
        // area 4 each: 4*(1+1) + 4*(5+1) + 4*(3+5)
        assert_relative_eq!(layout_cost(&l, &weights), 64.0);

        let weights = CostWeights {
            y: 0.0,
            x: 0.0,
            box_area: 1.0,
            grouping: 0.0,
        };
        // bbox [0,6] x [0,6]
        assert_relative_eq!(layout_cost(&l, &weights), 36.0);
    }

    #[test]
    fn test_grouping_ignores_singleton_types() {
        let l = layout(&[(0, 1.0, 1.0), (0, 5.0, 1.0), (1, 30.0, 50.0)]);
        // Type 0 centroid (3, 1): two members at distance 2.
        assert_relative_eq!(grouping_spread(&l), 8.0 / 3.0);
    }

    #[test]
    fn test_compaction_lowers_cost() {
        let weights = CostWeights::default();
        let near = layout(&[(0, 1.0, 1.0), (0, 3.0, 1.0)]);
        let far = layout(&[(0, 1.0, 1.0), (0, 7.0, 5.0)]);
        assert!(layout_cost(&near, &weights) < layout_cost(&far, &weights));
    }
}
