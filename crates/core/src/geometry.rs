//! Geometry primitives for floor placement.
//!
//! Every shape is centered: a rectangle is described by its center and its
//! axis-aligned side lengths, a circle by its center and radius. The overlap
//! predicates are strict, so shapes that merely touch (shared edge, tangent
//! circles) do not overlap and compaction can push items flush against each
//! other and against the boundary.

use crate::bounds::AABB2D;
use crate::Result;
use nalgebra::Point2;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Identifier of a geometry (item name, stack label).
pub type GeometryId = String;

/// Tolerance used by the strict comparisons.
///
/// Touching shapes computed in floating point may miss exact equality by a few
/// ulps; this slack keeps them on the non-overlapping side.
pub const EPSILON: f64 = 1e-9;

/// Common interface of everything that occupies floor space.
pub trait Geometry {
    /// Returns the identifier.
    fn id(&self) -> &GeometryId;

    /// Returns the footprint area.
    fn measure(&self) -> f64;

    /// Returns the (width, height) of the axis-aligned footprint bounding box.
    fn footprint(&self) -> (f64, f64);

    /// Validates the geometry.
    fn validate(&self) -> Result<()>;
}

/// The kind of a floor footprint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ShapeKind {
    /// Axis-aligned rectangle.
    #[default]
    Rect,
    /// Circle.
    Circle,
}

/// A positioned floor shape.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Shape {
    /// Axis-aligned rectangle centered at `center`.
    Rect {
        /// Center point.
        center: Point2<f64>,
        /// Extent along x.
        width: f64,
        /// Extent along y.
        height: f64,
    },
    /// Circle centered at `center`.
    Circle {
        /// Center point.
        center: Point2<f64>,
        /// Radius.
        radius: f64,
    },
}

impl Shape {
    /// Creates a rectangle centered at (x, y).
    pub fn rect(x: f64, y: f64, width: f64, height: f64) -> Self {
        Shape::Rect {
            center: Point2::new(x, y),
            width,
            height,
        }
    }

    /// Creates a circle centered at (x, y).
    pub fn circle(x: f64, y: f64, radius: f64) -> Self {
        Shape::Circle {
            center: Point2::new(x, y),
            radius,
        }
    }

    /// Returns the shape kind.
    pub fn kind(&self) -> ShapeKind {
        match self {
            Shape::Rect { .. } => ShapeKind::Rect,
            Shape::Circle { .. } => ShapeKind::Circle,
        }
    }

    /// Returns the center point.
    pub fn center(&self) -> Point2<f64> {
        match *self {
            Shape::Rect { center, .. } | Shape::Circle { center, .. } => center,
        }
    }

    /// Returns the half extents of the bounding box.
    pub fn half_extents(&self) -> (f64, f64) {
        match *self {
            Shape::Rect { width, height, .. } => (width / 2.0, height / 2.0),
            Shape::Circle { radius, .. } => (radius, radius),
        }
    }

    /// Returns the area of the shape itself (not of its bounding box).
    pub fn area(&self) -> f64 {
        match *self {
            Shape::Rect { width, height, .. } => width * height,
            Shape::Circle { radius, .. } => std::f64::consts::PI * radius * radius,
        }
    }

    /// Returns the axis-aligned bounding box.
    pub fn aabb(&self) -> AABB2D<f64> {
        let (hw, hh) = self.half_extents();
        AABB2D::from_center(self.center(), hw, hh)
    }

    /// Returns true if the bounding box lies inside `[0, width] x [0, height]`.
    pub fn is_within(&self, width: f64, height: f64) -> bool {
        let (hw, hh) = self.half_extents();
        let c = self.center();
        c.x >= hw - EPSILON
            && c.x <= width - hw + EPSILON
            && c.y >= hh - EPSILON
            && c.y <= height - hh + EPSILON
    }

    /// Returns true if the interiors of the two shapes intersect.
    pub fn overlaps(&self, other: &Shape) -> bool {
        match (*self, *other) {
            (
                Shape::Rect {
                    center: c1,
                    width: w1,
                    height: h1,
                },
                Shape::Rect {
                    center: c2,
                    width: w2,
                    height: h2,
                },
            ) => rects_overlap(c1, w1 / 2.0, h1 / 2.0, c2, w2 / 2.0, h2 / 2.0),
            (
                Shape::Circle {
                    center: c1,
                    radius: r1,
                },
                Shape::Circle {
                    center: c2,
                    radius: r2,
                },
            ) => circles_overlap(c1, r1, c2, r2),
            (
                Shape::Rect {
                    center,
                    width,
                    height,
                },
                Shape::Circle {
                    center: cc,
                    radius,
                },
            )
            | (
                Shape::Circle {
                    center: cc,
                    radius,
                },
                Shape::Rect {
                    center,
                    width,
                    height,
                },
            ) => rect_circle_overlap(center, width / 2.0, height / 2.0, cc, radius),
        }
    }
}

/// Separating-axis test on half extents.
pub fn rects_overlap(
    c1: Point2<f64>,
    hw1: f64,
    hh1: f64,
    c2: Point2<f64>,
    hw2: f64,
    hh2: f64,
) -> bool {
    (c1.x - c2.x).abs() < hw1 + hw2 - EPSILON && (c1.y - c2.y).abs() < hh1 + hh2 - EPSILON
}

/// Squared center distance against the squared sum of radii.
pub fn circles_overlap(c1: Point2<f64>, r1: f64, c2: Point2<f64>, r2: f64) -> bool {
    let reach = r1 + r2;
    nalgebra::distance_squared(&c1, &c2) < reach * reach - EPSILON
}

/// Clamps the circle center onto the rectangle and compares the distance
/// to the closest point with the radius.
pub fn rect_circle_overlap(
    rect_center: Point2<f64>,
    hw: f64,
    hh: f64,
    circle_center: Point2<f64>,
    radius: f64,
) -> bool {
    let closest = Point2::new(
        circle_center
            .x
            .clamp(rect_center.x - hw, rect_center.x + hw),
        circle_center
            .y
            .clamp(rect_center.y - hh, rect_center.y + hh),
    );
    nalgebra::distance_squared(&closest, &circle_center) < radius * radius - EPSILON
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_touching_rects_do_not_overlap() {
        let a = Shape::rect(1.0, 1.0, 2.0, 2.0);
        let b = Shape::rect(3.0, 1.0, 2.0, 2.0);
        assert!(!a.overlaps(&b));
        assert!(!b.overlaps(&a));

        let c = Shape::rect(2.9, 1.0, 2.0, 2.0);
        assert!(a.overlaps(&c));
    }

    #[test]
    fn test_rects_separated_on_one_axis() {
        let a = Shape::rect(0.0, 0.0, 4.0, 4.0);
        let b = Shape::rect(1.0, 5.0, 4.0, 4.0);
        assert!(!a.overlaps(&b));
    }

    #[test]
    fn test_tangent_circles_do_not_overlap() {
        let a = Shape::circle(2.0, 2.0, 2.0);
        let b = Shape::circle(6.0, 2.0, 2.0);
        assert!(!a.overlaps(&b));

        let c = Shape::circle(5.9, 2.0, 2.0);
        assert!(a.overlaps(&c));
    }

    #[test]
    fn test_rect_circle_corner_gap() {
        // The circle sits diagonally off the corner: bounding boxes overlap,
        // the shapes themselves do not.
        let rect = Shape::rect(1.0, 1.0, 2.0, 2.0);
        let circle = Shape::circle(2.8, 2.8, 1.0);
        assert!(rect.aabb().intersection(&circle.aabb()).is_some());
        assert!(!rect.overlaps(&circle));
        assert!(!circle.overlaps(&rect));

        let touching_side = Shape::circle(3.0, 1.0, 1.0);
        assert!(!rect.overlaps(&touching_side));

        let inside = Shape::circle(1.5, 1.5, 0.2);
        assert!(rect.overlaps(&inside));
    }

    #[test]
    fn test_is_within_bounds() {
        assert!(Shape::rect(1.0, 1.5, 2.0, 3.0).is_within(10.0, 10.0));
        assert!(Shape::rect(9.0, 8.5, 2.0, 3.0).is_within(10.0, 10.0));
        assert!(!Shape::rect(0.9, 5.0, 2.0, 3.0).is_within(10.0, 10.0));
        assert!(Shape::circle(2.0, 8.0, 2.0).is_within(10.0, 10.0));
        assert!(!Shape::circle(2.0, 8.5, 2.0).is_within(10.0, 10.0));
    }

    #[test]
    fn test_shape_area_and_kind() {
        assert_relative_eq!(Shape::rect(0.0, 0.0, 3.0, 4.0).area(), 12.0);
        assert_relative_eq!(
            Shape::circle(0.0, 0.0, 2.0).area(),
            4.0 * std::f64::consts::PI
        );
        assert_eq!(Shape::circle(0.0, 0.0, 1.0).kind(), ShapeKind::Circle);
        assert_eq!(Shape::circle(0.0, 0.0, 1.0).half_extents(), (1.0, 1.0));
    }
}
