//! Aggregation of stacks into floor placement objects.
//!
//! A homogeneous stack keeps the footprint of its base: a box stack becomes a
//! rectangle, a cylinder stack a circle. A mixed stack becomes the smallest
//! axis-aligned rectangle enclosing every member, where box members may be
//! turned so their long side follows the long axis of the base.

use crate::geometry::{Item, ItemShape};
use u_loading_core::geometry::{ShapeKind, EPSILON};
use u_loading_d2::PlacementObject;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Floor footprint of a stack in its unrotated orientation.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StackFootprint {
    /// Rectangle or circle.
    pub kind: ShapeKind,
    /// Extent along x.
    pub width: f64,
    /// Extent along y.
    pub height: f64,
    /// Per member (bottom to top): turned 90° relative to its input orientation.
    pub turned: Vec<bool>,
}

impl StackFootprint {
    /// Computes the footprint of the stack `members` (bottom first).
    pub fn of(items: &[Item], members: &[usize]) -> Self {
        let Some(&base_index) = members.first() else {
            return Self {
                kind: ShapeKind::Rect,
                width: 0.0,
                height: 0.0,
                turned: Vec::new(),
            };
        };
        let base = &items[base_index];
        let unturned = vec![false; members.len()];

        let all_boxes = members.iter().all(|&m| items[m].shape().is_box());
        let all_cylinders = members.iter().all(|&m| items[m].shape().is_cylinder());

        if all_boxes || all_cylinders {
            let (width, height) = base.shape().extents();
            return Self {
                kind: base.shape().kind(),
                width,
                height,
                turned: unturned,
            };
        }

        let as_given = enclosing(items, members, &unturned);

        let (base_x, base_y) = base.shape().extents();
        let long_along_x = base_x >= base_y;
        let aligned: Vec<bool> = members
            .iter()
            .enumerate()
            .map(|(level, &m)| match *items[m].shape() {
                ItemShape::Box { length, width } if level > 0 => {
                    if long_along_x {
                        length < width
                    } else {
                        length > width
                    }
                }
                _ => false,
            })
            .collect();
        let turned_fit = enclosing(items, members, &aligned);

        if turned_fit.0 * turned_fit.1 < as_given.0 * as_given.1 - EPSILON {
            Self {
                kind: ShapeKind::Rect,
                width: turned_fit.0,
                height: turned_fit.1,
                turned: aligned,
            }
        } else {
            Self {
                kind: ShapeKind::Rect,
                width: as_given.0,
                height: as_given.1,
                turned: unturned,
            }
        }
    }

    /// Returns the footprint area.
    pub fn area(&self) -> f64 {
        match self.kind {
            ShapeKind::Rect => self.width * self.height,
            ShapeKind::Circle => {
                let r = 0.5 * self.width;
                std::f64::consts::PI * r * r
            }
        }
    }

    /// Returns true if both footprints have the same kind and extents.
    fn same_signature(&self, other: &StackFootprint) -> bool {
        self.kind == other.kind
            && (self.width - other.width).abs() <= EPSILON
            && (self.height - other.height).abs() <= EPSILON
    }
}

/// Bounding extents of the members with the given turn flags.
fn enclosing(items: &[Item], members: &[usize], turned: &[bool]) -> (f64, f64) {
    members
        .iter()
        .zip(turned)
        .fold((0.0_f64, 0.0_f64), |(w, h), (&m, &turn)| {
            let (x, y) = items[m].shape().extents();
            let (x, y) = if turn { (y, x) } else { (x, y) };
            (w.max(x), h.max(y))
        })
}

/// Assigns grouping type ids: stacks with the same footprint and total
/// height share an id. Ids are dense and follow first appearance.
pub fn assign_type_ids(footprints: &[(&StackFootprint, f64)]) -> Vec<usize> {
    let mut signatures: Vec<(&StackFootprint, f64)> = Vec::new();
    footprints
        .iter()
        .map(|&(footprint, load_height)| {
            match signatures.iter().position(|(known, h)| {
                known.same_signature(footprint) && (h - load_height).abs() <= EPSILON
            }) {
                Some(id) => id,
                None => {
                    signatures.push((footprint, load_height));
                    signatures.len() - 1
                }
            }
        })
        .collect()
}

/// Builds the placement object for stack `index`.
pub fn to_placement_object(
    index: usize,
    footprint: &StackFootprint,
    load_height: f64,
    weight: f64,
    type_id: usize,
) -> PlacementObject {
    let label = format!("Stack_{}", index + 1);
    let object = match footprint.kind {
        ShapeKind::Rect => PlacementObject::rect(index, label, footprint.width, footprint.height),
        ShapeKind::Circle => PlacementObject::circle(index, label, 0.5 * footprint.width),
    };
    object
        .with_type_id(type_id)
        .with_load_height(load_height)
        .with_weight(weight)
        .with_source(index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_homogeneous_box_stack_keeps_base() {
        let items = vec![
            Item::new_box("a", 4.0, 3.0, 1.0),
            Item::new_box("b", 2.0, 2.0, 1.0),
        ];
        let fp = StackFootprint::of(&items, &[0, 1]);
        assert_eq!(fp.kind, ShapeKind::Rect);
        assert_relative_eq!(fp.width, 4.0);
        assert_relative_eq!(fp.height, 3.0);
        assert_eq!(fp.turned, vec![false, false]);
    }

    #[test]
    fn test_homogeneous_cylinder_stack_is_circle() {
        let items = vec![Item::cylinder("a", 2.0, 1.0), Item::cylinder("b", 1.0, 1.0)];
        let fp = StackFootprint::of(&items, &[0, 1]);
        assert_eq!(fp.kind, ShapeKind::Circle);
        assert_relative_eq!(fp.width, 4.0);
        assert_relative_eq!(fp.area(), std::f64::consts::PI * 4.0);
    }

    #[test]
    fn test_mixed_stack_encloses_members() {
        let items = vec![
            Item::new_box("base", 5.0, 2.0, 1.0),
            Item::cylinder("c", 1.2, 1.0),
        ];
        let fp = StackFootprint::of(&items, &[0, 1]);
        assert_eq!(fp.kind, ShapeKind::Rect);
        assert_relative_eq!(fp.width, 5.0);
        assert_relative_eq!(fp.height, 2.4);
    }

    #[test]
    fn test_mixed_stack_turns_box_along_base() {
        // As given the 2 x 7 box sticks out along y; turned it lies inside 8 x 2.
        let items = vec![
            Item::new_box("base", 8.0, 2.0, 1.0),
            Item::cylinder("c", 1.0, 1.0),
            Item::new_box("tall", 2.0, 7.0, 1.0),
        ];
        let fp = StackFootprint::of(&items, &[0, 1, 2]);
        assert_relative_eq!(fp.width, 8.0);
        assert_relative_eq!(fp.height, 2.0);
        assert_eq!(fp.turned, vec![false, false, true]);
    }

    #[test]
    fn test_type_ids_group_lookalikes() {
        let a = StackFootprint {
            kind: ShapeKind::Rect,
            width: 2.0,
            height: 1.0,
            turned: vec![false],
        };
        let b = StackFootprint {
            kind: ShapeKind::Circle,
            width: 2.0,
            height: 2.0,
            turned: vec![false],
        };
        let ids = assign_type_ids(&[(&a, 3.0), (&b, 3.0), (&a, 3.0), (&a, 1.0)]);
        assert_eq!(ids, vec![0, 1, 0, 2]);
    }

    #[test]
    fn test_placement_object_carries_totals() {
        let fp = StackFootprint {
            kind: ShapeKind::Circle,
            width: 3.0,
            height: 3.0,
            turned: vec![false, false],
        };
        let obj = to_placement_object(4, &fp, 6.5, 12.0, 2);
        assert_eq!(obj.label(), "Stack_5");
        assert_eq!(obj.source(), Some(4));
        assert_eq!(obj.type_id(), 2);
        assert_relative_eq!(obj.radius().unwrap(), 1.5);
        assert_relative_eq!(obj.load_height(), 6.5);
        assert_relative_eq!(obj.weight(), 12.0);
    }
}
