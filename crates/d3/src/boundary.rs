//! The container.

use nalgebra::Vector3;
use u_loading_core::{Error, Result};
use u_loading_d2::FloorArea;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A container with a rectangular floor, a height limit and an optional
/// weight limit.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Container {
    /// Dimensions (width, length, height).
    dimensions: Vector3<f64>,

    /// Maximum total weight allowed.
    max_weight: Option<f64>,
}

impl Container {
    /// Creates a new container with the given dimensions.
    pub fn new(width: f64, length: f64, height: f64) -> Self {
        Self {
            dimensions: Vector3::new(width, length, height),
            max_weight: None,
        }
    }

    /// Sets the maximum allowed weight.
    pub fn with_max_weight(mut self, weight: f64) -> Self {
        self.max_weight = Some(weight);
        self
    }

    /// Returns the dimensions (width, length, height).
    pub fn dimensions(&self) -> &Vector3<f64> {
        &self.dimensions
    }

    /// Returns the floor extent along x.
    pub fn width(&self) -> f64 {
        self.dimensions.x
    }

    /// Returns the floor extent along y.
    pub fn length(&self) -> f64 {
        self.dimensions.y
    }

    /// Returns the height, which bounds every stack.
    pub fn height(&self) -> f64 {
        self.dimensions.z
    }

    /// Returns the maximum weight.
    pub fn max_weight(&self) -> Option<f64> {
        self.max_weight
    }

    /// Returns the volume.
    pub fn volume(&self) -> f64 {
        self.dimensions.x * self.dimensions.y * self.dimensions.z
    }

    /// Returns the floor as a 2D packing area.
    pub fn floor(&self) -> FloorArea {
        let floor = FloorArea::new(self.width(), self.length());
        match self.max_weight {
            Some(weight) => floor.with_max_weight(weight),
            None => floor,
        }
    }

    /// Validates the container.
    pub fn validate(&self) -> Result<()> {
        if self.dimensions.iter().any(|d| !d.is_finite() || *d <= 0.0) {
            return Err(Error::InvalidBoundary(
                "All container dimensions must be positive".into(),
            ));
        }

        if let Some(weight) = self.max_weight {
            if weight.is_nan() || weight <= 0.0 {
                return Err(Error::InvalidBoundary(
                    "Maximum weight must be positive".into(),
                ));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_container_volume() {
        let container = Container::new(10.0, 20.0, 3.0);
        assert_relative_eq!(container.volume(), 600.0, epsilon = 0.001);
    }

    #[test]
    fn test_floor_carries_weight_limit() {
        let container = Container::new(10.0, 20.0, 3.0).with_max_weight(500.0);
        let floor = container.floor();
        assert_relative_eq!(floor.width(), 10.0);
        assert_relative_eq!(floor.height(), 20.0);
        assert_eq!(floor.max_weight(), Some(500.0));

        assert_eq!(Container::new(1.0, 1.0, 1.0).floor().max_weight(), None);
    }

    #[test]
    fn test_validation() {
        assert!(Container::new(10.0, 8.0, 5.0).validate().is_ok());
        assert!(Container::new(-10.0, 8.0, 5.0).validate().is_err());
        assert!(Container::new(10.0, 8.0, 5.0)
            .with_max_weight(0.0)
            .validate()
            .is_err());
    }
}
