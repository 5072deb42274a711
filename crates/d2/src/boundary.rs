//! The container floor.

use u_loading_core::geometry::Shape;
use u_loading_core::{Error, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Rectangular floor `[0, width] x [0, height]` with an optional weight limit.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FloorArea {
    width: f64,
    height: f64,
    max_weight: Option<f64>,
}

impl FloorArea {
    /// Creates a floor without weight limit.
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            max_weight: None,
        }
    }

    /// Sets the maximum total weight.
    pub fn with_max_weight(mut self, weight: f64) -> Self {
        self.max_weight = Some(weight);
        self
    }

    /// Returns the width.
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Returns the height.
    pub fn height(&self) -> f64 {
        self.height
    }

    /// Returns the weight limit.
    pub fn max_weight(&self) -> Option<f64> {
        self.max_weight
    }

    /// Returns the weight limit, `f64::INFINITY` when unlimited.
    pub fn weight_capacity(&self) -> f64 {
        self.max_weight.unwrap_or(f64::INFINITY)
    }

    /// Returns the floor area.
    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// Returns the floor center.
    pub fn center(&self) -> (f64, f64) {
        (self.width / 2.0, self.height / 2.0)
    }

    /// Returns true if the shape lies fully on the floor.
    pub fn contains(&self, shape: &Shape) -> bool {
        shape.is_within(self.width, self.height)
    }

    /// Clamps a center so that a `w x h` bounding box stays on the floor.
    pub fn clamp_center(&self, w: f64, h: f64, x: f64, y: f64) -> (f64, f64) {
        (
            x.max(w / 2.0).min(self.width - w / 2.0),
            y.max(h / 2.0).min(self.height - h / 2.0),
        )
    }

    /// Returns the admissible center range for a `w x h` bounding box.
    pub fn center_range(&self, w: f64, h: f64) -> Option<((f64, f64), (f64, f64))> {
        let x = (w / 2.0, self.width - w / 2.0);
        let y = (h / 2.0, self.height - h / 2.0);
        (x.0 <= x.1 && y.0 <= y.1).then_some((x, y))
    }

    /// Validates the floor.
    pub fn validate(&self) -> Result<()> {
        let finite = self.width.is_finite() && self.height.is_finite();
        if !(finite && self.width > 0.0 && self.height > 0.0) {
            return Err(Error::InvalidBoundary(format!(
                "floor must have positive finite size, got {}x{}",
                self.width, self.height
            )));
        }
        if let Some(w) = self.max_weight {
            if w.is_nan() || w < 0.0 {
                return Err(Error::InvalidBoundary(format!(
                    "maximum weight must be non-negative, got {}",
                    w
                )));
            }
        }
        Ok(())
    }
}
