//! Floor layouts: a set of placed objects with center positions.

use crate::boundary::FloorArea;
use crate::geometry::PlacementObject;
use nalgebra::Point2;
use u_loading_core::bounds::AABB2D;
use u_loading_core::geometry::{Shape, EPSILON};
use u_loading_core::sa::SaSolution;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An object together with its current center.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PlacedObject {
    /// The object, in its current orientation.
    pub object: PlacementObject,
    /// Center of the footprint.
    pub center: Point2<f64>,
}

impl PlacedObject {
    /// Places `object` with its center at (x, y).
    pub fn new(object: PlacementObject, x: f64, y: f64) -> Self {
        Self {
            object,
            center: Point2::new(x, y),
        }
    }

    /// Returns the positioned shape.
    pub fn shape(&self) -> Shape {
        self.object.shape_at(self.center.x, self.center.y)
    }

    /// Returns the bounding box.
    pub fn aabb(&self) -> AABB2D<f64> {
        self.shape().aabb()
    }

    /// Moves the center, clamped onto the floor.
    pub fn move_to(&mut self, floor: &FloorArea, x: f64, y: f64) {
        let (x, y) = floor.clamp_center(self.object.width(), self.object.height(), x, y);
        self.center = Point2::new(x, y);
    }
}

/// One candidate arrangement of objects on the floor.
///
/// Members are stored in insertion order; their index is the handle the
/// mutation operators work with.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FloorLayout {
    placed: Vec<PlacedObject>,
    #[cfg_attr(feature = "serde", serde(skip))]
    cost: f64,
}

impl FloorLayout {
    /// Creates an empty layout.
    pub fn new() -> Self {
        Self {
            placed: Vec::new(),
            cost: f64::INFINITY,
        }
    }

    /// Returns the number of placed objects.
    pub fn len(&self) -> usize {
        self.placed.len()
    }

    /// Returns true if nothing is placed.
    pub fn is_empty(&self) -> bool {
        self.placed.is_empty()
    }

    /// Returns the placed objects.
    pub fn placed(&self) -> &[PlacedObject] {
        &self.placed
    }

    /// Returns the member at `index`.
    pub fn get(&self, index: usize) -> Option<&PlacedObject> {
        self.placed.get(index)
    }

    /// Returns the member at `index` mutably.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut PlacedObject> {
        self.placed.get_mut(index)
    }

    /// Appends a placed object. The caller is responsible for validity.
    pub fn push(&mut self, placed: PlacedObject) {
        self.placed.push(placed);
    }

    /// Swaps the centers of two members.
    pub fn swap_centers(&mut self, a: usize, b: usize) {
        if a < self.placed.len() && b < self.placed.len() && a != b {
            let ca = self.placed[a].center;
            self.placed[a].center = self.placed[b].center;
            self.placed[b].center = ca;
        }
    }

    /// Returns the total weight of all members.
    pub fn total_weight(&self) -> f64 {
        self.placed.iter().map(|p| p.object.weight()).sum()
    }

    /// Returns the total footprint area of all members.
    pub fn footprint_area(&self) -> f64 {
        self.placed.iter().map(|p| p.object.area()).sum()
    }

    /// Returns true if `shape` overlaps any member other than `skip`.
    pub fn collides(&self, shape: &Shape, skip: Option<usize>) -> bool {
        self.placed
            .iter()
            .enumerate()
            .filter(|(j, _)| Some(*j) != skip)
            .any(|(_, other)| shape.overlaps(&other.shape()))
    }

    /// Returns true if member `index` overlaps any other member.
    pub fn member_collides(&self, index: usize) -> bool {
        match self.placed.get(index) {
            Some(p) => self.collides(&p.shape(), Some(index)),
            None => false,
        }
    }

    /// Returns the bounding box of all members.
    pub fn bounding_box(&self) -> Option<AABB2D<f64>> {
        AABB2D::enclosing(self.placed.iter().map(PlacedObject::aabb))
    }

    /// Checks every layout invariant: bounds, pairwise non-overlap and weight.
    pub fn is_valid(&self, floor: &FloorArea) -> bool {
        if self.total_weight() > floor.weight_capacity() + EPSILON {
            return false;
        }
        self.placed.iter().enumerate().all(|(i, p)| {
            let shape = p.shape();
            floor.contains(&shape)
                && self.placed[i + 1..]
                    .iter()
                    .all(|other| !shape.overlaps(&other.shape()))
        })
    }

    /// Consumes the layout and returns its members.
    pub fn into_placed(self) -> Vec<PlacedObject> {
        self.placed
    }
}

impl Default for FloorLayout {
    fn default() -> Self {
        Self::new()
    }
}

impl SaSolution for FloorLayout {
    fn cost(&self) -> f64 {
        self.cost
    }

    fn set_cost(&mut self, value: f64) {
        self.cost = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn two_boxes() -> FloorLayout {
        let mut layout = FloorLayout::new();
        layout.push(PlacedObject::new(
            PlacementObject::rect(0, "A", 2.0, 2.0).with_weight(5.0),
            1.0,
            1.0,
        ));
        layout.push(PlacedObject::new(
            PlacementObject::rect(1, "B", 2.0, 4.0).with_weight(3.0),
            3.0,
            2.0,
        ));
        layout
    }

    #[test]
    fn test_valid_layout() {
        let layout = two_boxes();
        let floor = FloorArea::new(10.0, 10.0);
        assert!(layout.is_valid(&floor));
        assert!(!layout.member_collides(0));
        assert_relative_eq!(layout.total_weight(), 8.0);

        let bb = layout.bounding_box().unwrap();
        assert_relative_eq!(bb.area(), 16.0);
    }

    #[test]
    fn test_weight_limit_invalidates() {
        let layout = two_boxes();
        assert!(!layout.is_valid(&FloorArea::new(10.0, 10.0).with_max_weight(7.0)));
        assert!(layout.is_valid(&FloorArea::new(10.0, 10.0).with_max_weight(8.0)));
    }

    #[test]
    fn test_out_of_bounds_invalidates() {
        let layout = two_boxes();
        assert!(!layout.is_valid(&FloorArea::new(3.5, 10.0)));
    }

    #[test]
    fn test_collision_detection() {
        let mut layout = two_boxes();
        layout.get_mut(1).unwrap().center = Point2::new(2.5, 2.0);
        assert!(layout.member_collides(1));
        assert!(layout.member_collides(0));
        assert!(!layout.is_valid(&FloorArea::new(10.0, 10.0)));
    }

    #[test]
    fn test_swap_centers_and_clamp() {
        let mut layout = two_boxes();
        let floor = FloorArea::new(10.0, 10.0);
        layout.swap_centers(0, 1);
        assert_eq!(layout.get(0).unwrap().center, Point2::new(3.0, 2.0));

        let b = layout.get_mut(1).unwrap();
        b.move_to(&floor, 1.0, -5.0);
        assert_eq!(b.center, Point2::new(1.0, 2.0));
    }
}
