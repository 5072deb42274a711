//! Placement representation for positioned items.

use crate::geometry::GeometryId;
use nalgebra::{Point2, Point3, Scalar};
use std::collections::HashMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Position of one item in the container.
///
/// Coordinates are footprint centers on the floor plane; for 3D placements
/// `z` is the height of the item's underside.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Placement<S> {
    /// The ID of the placed item.
    pub geometry_id: GeometryId,

    /// Position coordinates (x, y for 2D; x, y, z for 3D).
    pub position: Vec<S>,

    /// Whether the footprint is turned by 90 degrees.
    pub rotated: bool,

    /// Index of the stack the item belongs to.
    pub stack_index: Option<usize>,

    /// Position within the stack, 0 being the base.
    pub level: usize,
}

impl<S: Copy + Default> Placement<S> {
    /// Creates a new 2D placement.
    pub fn new_2d(geometry_id: GeometryId, x: S, y: S, rotated: bool) -> Self {
        Self {
            geometry_id,
            position: vec![x, y],
            rotated,
            stack_index: None,
            level: 0,
        }
    }

    /// Creates a new 3D placement.
    pub fn new_3d(geometry_id: GeometryId, x: S, y: S, z: S, rotated: bool) -> Self {
        Self {
            geometry_id,
            position: vec![x, y, z],
            rotated,
            stack_index: None,
            level: 0,
        }
    }

    /// Sets the stack membership.
    pub fn with_stack(mut self, index: usize, level: usize) -> Self {
        self.stack_index = Some(index);
        self.level = level;
        self
    }

    /// Returns true if this is a 2D placement.
    pub fn is_2d(&self) -> bool {
        self.position.len() == 2
    }

    /// Returns true if this is a 3D placement.
    pub fn is_3d(&self) -> bool {
        self.position.len() == 3
    }

    /// Returns the x coordinate.
    pub fn x(&self) -> S {
        self.position.first().copied().unwrap_or_default()
    }

    /// Returns the y coordinate.
    pub fn y(&self) -> S {
        self.position.get(1).copied().unwrap_or_default()
    }

    /// Returns the z coordinate (for 3D placements).
    pub fn z(&self) -> Option<S> {
        self.position.get(2).copied()
    }
}

impl<S: Scalar + Copy + Default> Placement<S> {
    /// Returns the floor position as a point.
    pub fn floor_point(&self) -> Point2<S> {
        Point2::new(self.x(), self.y())
    }

    /// Returns the position as a 3D point (z = 0 for 2D placements).
    pub fn point_3d(&self) -> Point3<S> {
        Point3::new(self.x(), self.y(), self.z().unwrap_or_default())
    }
}

/// Placement statistics for a set of placements.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PlacementStats {
    /// Total number of placements.
    pub count: usize,
    /// Number of rotated placements.
    pub rotated_count: usize,
    /// Number of items per stack.
    pub stack_distribution: HashMap<usize, usize>,
    /// Highest stack level in use.
    pub max_level: usize,
}

impl PlacementStats {
    /// Computes statistics from a set of placements.
    pub fn from_placements<S>(placements: &[Placement<S>]) -> Self {
        let mut stats = Self {
            count: placements.len(),
            ..Default::default()
        };

        for p in placements {
            if p.rotated {
                stats.rotated_count += 1;
            }

            if let Some(stack) = p.stack_index {
                *stats.stack_distribution.entry(stack).or_insert(0) += 1;
            }

            stats.max_level = stats.max_level.max(p.level);
        }

        stats
    }

    /// Returns the number of distinct stacks.
    pub fn stack_count(&self) -> usize {
        self.stack_distribution.len()
    }
}
