//! 3D items: boxes and upright cylinders.

use u_loading_core::geometry::{Geometry, GeometryId, ShapeKind};
use u_loading_core::{Error, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Footprint of an item.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ItemShape {
    /// Cuboid standing on its `length × width` face.
    Box {
        /// Extent along the floor x axis.
        length: f64,
        /// Extent along the floor y axis.
        width: f64,
    },
    /// Upright cylinder.
    Cylinder {
        /// Base radius.
        radius: f64,
    },
}

impl ItemShape {
    /// Returns the footprint area.
    pub fn area(&self) -> f64 {
        match *self {
            ItemShape::Box { length, width } => length * width,
            ItemShape::Cylinder { radius } => std::f64::consts::PI * radius * radius,
        }
    }

    /// Returns the floor shape kind.
    pub fn kind(&self) -> ShapeKind {
        match self {
            ItemShape::Box { .. } => ShapeKind::Rect,
            ItemShape::Cylinder { .. } => ShapeKind::Circle,
        }
    }

    /// Returns the axis-aligned bounding extents `(x, y)` of the footprint.
    pub fn extents(&self) -> (f64, f64) {
        match *self {
            ItemShape::Box { length, width } => (length, width),
            ItemShape::Cylinder { radius } => (2.0 * radius, 2.0 * radius),
        }
    }

    /// Returns true for boxes.
    pub fn is_box(&self) -> bool {
        matches!(self, ItemShape::Box { .. })
    }

    /// Returns true for cylinders.
    pub fn is_cylinder(&self) -> bool {
        matches!(self, ItemShape::Cylinder { .. })
    }
}

/// A 3D item to be loaded.
///
/// Items are immutable; the footprint area is computed once at construction.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Item {
    /// Unique name.
    name: GeometryId,

    /// Footprint.
    shape: ItemShape,

    /// Vertical extent.
    height: f64,

    /// Weight.
    weight: f64,

    /// Cached footprint area.
    footprint_area: f64,
}

impl Item {
    /// Creates an item with the given footprint.
    pub fn new(name: impl Into<GeometryId>, shape: ItemShape, height: f64) -> Self {
        Self {
            name: name.into(),
            shape,
            height,
            weight: 0.0,
            footprint_area: shape.area(),
        }
    }

    /// Creates a box item.
    pub fn new_box(name: impl Into<GeometryId>, length: f64, width: f64, height: f64) -> Self {
        Self::new(name, ItemShape::Box { length, width }, height)
    }

    /// Creates an upright cylinder item.
    pub fn cylinder(name: impl Into<GeometryId>, radius: f64, height: f64) -> Self {
        Self::new(name, ItemShape::Cylinder { radius }, height)
    }

    /// Sets the weight.
    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    /// Returns the name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the footprint.
    pub fn shape(&self) -> &ItemShape {
        &self.shape
    }

    /// Returns the height.
    pub fn height(&self) -> f64 {
        self.height
    }

    /// Returns the weight.
    pub fn weight(&self) -> f64 {
        self.weight
    }

    /// Returns the footprint area.
    pub fn footprint_area(&self) -> f64 {
        self.footprint_area
    }
}

impl Geometry for Item {
    fn id(&self) -> &GeometryId {
        &self.name
    }

    fn measure(&self) -> f64 {
        self.footprint_area
    }

    fn footprint(&self) -> (f64, f64) {
        self.shape.extents()
    }

    fn validate(&self) -> Result<()> {
        let dims_ok = match self.shape {
            ItemShape::Box { length, width } => {
                length.is_finite() && width.is_finite() && length > 0.0 && width > 0.0
            }
            ItemShape::Cylinder { radius } => radius.is_finite() && radius > 0.0,
        };
        if !dims_ok {
            return Err(Error::InvalidGeometry(format!(
                "Footprint dimensions for '{}' must be positive",
                self.name
            )));
        }

        if !self.height.is_finite() || self.height <= 0.0 {
            return Err(Error::InvalidGeometry(format!(
                "Height for '{}' must be positive",
                self.name
            )));
        }

        if !self.weight.is_finite() || self.weight < 0.0 {
            return Err(Error::InvalidGeometry(format!(
                "Weight for '{}' cannot be negative",
                self.name
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
    fn test_box_item() {
        let item = Item::new_box("B1", 4.0, 3.0, 2.0).with_weight(7.5);
        assert_eq!(item.name(), "B1");
        assert_relative_eq!(item.footprint_area(), 12.0);
        assert_relative_eq!(item.weight(), 7.5);
        assert_eq!(item.footprint(), (4.0, 3.0));
        assert_eq!(item.shape().kind(), ShapeKind::Rect);
    }

    #[test]
    fn test_cylinder_item() {
        let item = Item::cylinder("C1", 1.5, 2.0);
        assert_relative_eq!(item.footprint_area(), std::f64::consts::PI * 2.25);
        assert_eq!(item.footprint(), (3.0, 3.0));
        assert!(item.shape().is_cylinder());
    }

    #[test]
    fn test_validation() {
        assert!(Item::new_box("ok", 1.0, 1.0, 1.0).validate().is_ok());
        assert!(Item::new_box("flat", 1.0, 1.0, 0.0).validate().is_err());
        assert!(Item::cylinder("r0", 0.0, 1.0).validate().is_err());
        assert!(Item::new_box("neg", 1.0, 1.0, 1.0)
            .with_weight(-1.0)
            .validate()
            .is_err());
    }
}
