//! Placement objects: the units the floor packer arranges.

use u_loading_core::geometry::{Geometry, GeometryId, Shape, ShapeKind, EPSILON};
use u_loading_core::{Error, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A floor footprint to be placed: a loose item or a whole stack.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PlacementObject {
    /// Unique index within one packing run.
    id: usize,

    /// Display name.
    label: GeometryId,

    /// Objects with equal type ids are pulled together by the grouping cost.
    type_id: usize,

    /// Footprint kind.
    kind: ShapeKind,

    /// Bounding width in the current orientation.
    width: f64,

    /// Bounding height in the current orientation.
    height: f64,

    /// Bounding width as created.
    original_width: f64,

    /// Bounding height as created.
    original_height: f64,

    /// Vertical extent of the load (stack height).
    load_height: f64,

    /// Weight.
    weight: f64,

    /// Footprint area.
    area: f64,

    /// Index of the stack this object represents.
    source: Option<usize>,
}

impl PlacementObject {
    /// Creates a rectangular object.
    pub fn rect(id: usize, label: impl Into<GeometryId>, width: f64, height: f64) -> Self {
        Self {
            id,
            label: label.into(),
            type_id: 0,
            kind: ShapeKind::Rect,
            width,
            height,
            original_width: width,
            original_height: height,
            load_height: 0.0,
            weight: 0.0,
            area: width * height,
            source: None,
        }
    }

    /// Creates a circular object.
    pub fn circle(id: usize, label: impl Into<GeometryId>, radius: f64) -> Self {
        let diameter = 2.0 * radius;
        Self {
            id,
            label: label.into(),
            type_id: 0,
            kind: ShapeKind::Circle,
            width: diameter,
            height: diameter,
            original_width: diameter,
            original_height: diameter,
            load_height: 0.0,
            weight: 0.0,
            area: std::f64::consts::PI * radius * radius,
            source: None,
        }
    }

    /// Sets the grouping type id.
    pub fn with_type_id(mut self, type_id: usize) -> Self {
        self.type_id = type_id;
        self
    }

    /// Sets the load height.
    pub fn with_load_height(mut self, height: f64) -> Self {
        self.load_height = height;
        self
    }

    /// Sets the weight.
    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    /// Sets the source stack index.
    pub fn with_source(mut self, stack: usize) -> Self {
        self.source = Some(stack);
        self
    }

    /// Returns the run-local index.
    pub fn index(&self) -> usize {
        self.id
    }

    /// Returns the display name.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Returns the grouping type id.
    pub fn type_id(&self) -> usize {
        self.type_id
    }

    /// Returns the footprint kind.
    pub fn kind(&self) -> ShapeKind {
        self.kind
    }

    /// Returns the bounding width in the current orientation.
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Returns the bounding height in the current orientation.
    pub fn height(&self) -> f64 {
        self.height
    }

    /// Returns the bounding size as created.
    pub fn original_size(&self) -> (f64, f64) {
        (self.original_width, self.original_height)
    }

    /// Returns the radius of a circular object.
    pub fn radius(&self) -> Option<f64> {
        match self.kind {
            ShapeKind::Circle => Some(self.width / 2.0),
            ShapeKind::Rect => None,
        }
    }

    /// Returns the load height.
    pub fn load_height(&self) -> f64 {
        self.load_height
    }

    /// Returns the weight.
    pub fn weight(&self) -> f64 {
        self.weight
    }

    /// Returns the footprint area.
    pub fn area(&self) -> f64 {
        self.area
    }

    /// Returns the source stack index.
    pub fn source(&self) -> Option<usize> {
        self.source
    }

    /// Returns true for rectangles whose sides differ.
    pub fn is_rotatable(&self) -> bool {
        self.kind == ShapeKind::Rect && (self.width - self.height).abs() > EPSILON
    }

    /// Turns the object by 90 degrees. Circles and squares are unaffected.
    pub fn rotate(&mut self) {
        if self.is_rotatable() {
            std::mem::swap(&mut self.width, &mut self.height);
        }
    }

    /// Returns a copy turned by 90 degrees.
    pub fn rotated_copy(&self) -> Self {
        let mut copy = self.clone();
        copy.rotate();
        copy
    }

    /// Returns true if the current orientation differs from the original one.
    pub fn rotated(&self) -> bool {
        self.kind == ShapeKind::Rect && (self.width - self.original_width).abs() > EPSILON
    }

    /// Returns true if the object fits the floor in its current orientation.
    pub fn fits_floor(&self, floor_width: f64, floor_height: f64) -> bool {
        self.width <= floor_width + EPSILON && self.height <= floor_height + EPSILON
    }

    /// Returns the shape of the object centered at (x, y).
    pub fn shape_at(&self, x: f64, y: f64) -> Shape {
        match self.kind {
            ShapeKind::Rect => Shape::rect(x, y, self.width, self.height),
            ShapeKind::Circle => Shape::circle(x, y, self.width / 2.0),
        }
    }
}

impl Geometry for PlacementObject {
    fn id(&self) -> &GeometryId {
        &self.label
    }

    fn measure(&self) -> f64 {
        self.area
    }

    fn footprint(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    fn validate(&self) -> Result<()> {
        if !(self.width.is_finite() && self.height.is_finite())
            || self.width <= 0.0
            || self.height <= 0.0
        {
            return Err(Error::InvalidGeometry(format!(
                "object {} has non-positive footprint {}x{}",
                self.label, self.width, self.height
            )));
        }
        if !self.weight.is_finite() || self.weight < 0.0 {
            return Err(Error::InvalidGeometry(format!(
                "object {} has invalid weight {}",
                self.label, self.weight
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_rotation_round_trip() {
        let mut obj = PlacementObject::rect(0, "P", 4.0, 2.0);
        let area = obj.area();

        obj.rotate();
        assert_eq!((obj.width(), obj.height()), (2.0, 4.0));
        assert!(obj.rotated());

        obj.rotate();
        assert_eq!((obj.width(), obj.height()), (4.0, 2.0));
        assert_eq!(obj.original_size(), (4.0, 2.0));
        assert!(!obj.rotated());
        assert_relative_eq!(obj.area(), area);
        assert_relative_eq!(obj.width() * obj.height(), area);
    }

    #[test]
    fn test_squares_and_circles_do_not_rotate() {
        let mut square = PlacementObject::rect(0, "S", 3.0, 3.0);
        assert!(!square.is_rotatable());
        square.rotate();
        assert!(!square.rotated());

        let mut circle = PlacementObject::circle(1, "C", 1.5);
        assert!(!circle.is_rotatable());
        circle.rotate();
        assert!(!circle.rotated());
        assert_eq!(circle.radius(), Some(1.5));
        assert_relative_eq!(circle.area(), std::f64::consts::PI * 2.25);
        assert_eq!(circle.footprint(), (3.0, 3.0));
    }

    #[test]
    fn test_shape_at() {
        let obj = PlacementObject::rect(0, "P", 4.0, 2.0);
        let shape = obj.shape_at(2.0, 1.0);
        assert!(shape.is_within(4.0, 2.0));
        assert!(!obj.rotated_copy().fits_floor(4.0, 2.0));
    }

    #[test]
    fn test_validate() {
        assert!(PlacementObject::rect(0, "ok", 1.0, 1.0)
            .with_weight(3.0)
            .validate()
            .is_ok());
        assert!(PlacementObject::rect(0, "flat", 0.0, 1.0).validate().is_err());
        assert!(PlacementObject::circle(0, "neg", 1.0)
            .with_weight(-1.0)
            .validate()
            .is_err());
    }
}
