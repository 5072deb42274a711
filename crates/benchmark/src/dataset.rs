//! Benchmark instance types.

use serde::{Deserialize, Serialize};
use u_loading_d3::{Container, Item};

/// Summary of an instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstanceInfo {
    /// Instance name
    pub name: String,
    /// Number of object types
    pub object_types: usize,
    /// Total items when quantities are expanded
    pub total_items: usize,
    /// Sum of item footprint areas
    pub total_footprint_area: f64,
    /// Container floor area
    pub floor_area: f64,
}

/// A loading instance: one container and the objects to load.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Instance {
    /// Instance name
    pub name: String,
    /// Container dimensions
    pub container: ContainerSpec,
    /// Object types to load
    pub objects: Vec<ObjectSpec>,
    /// Seed the instance was generated with, if synthetic
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Instance {
    /// Returns instance information.
    pub fn info(&self) -> InstanceInfo {
        let items = self.expand_items();
        InstanceInfo {
            name: self.name.clone(),
            object_types: self.objects.len(),
            total_items: items.len(),
            total_footprint_area: items.iter().map(Item::footprint_area).sum(),
            floor_area: self.container.width * self.container.length,
        }
    }

    /// Returns the container.
    pub fn container(&self) -> Container {
        let container = Container::new(
            self.container.width,
            self.container.length,
            self.container.height,
        );
        match self.container.max_weight {
            Some(weight) => container.with_max_weight(weight),
            None => container,
        }
    }

    /// Expands object types by quantity.
    /// Copies are named `<name>#<k>` when the quantity exceeds one.
    pub fn expand_items(&self) -> Vec<Item> {
        let mut items = Vec::new();
        for object in &self.objects {
            for k in 0..object.quantity {
                let name = if object.quantity > 1 {
                    format!("{}#{}", object.name, k + 1)
                } else {
                    object.name.clone()
                };
                let item = match object.form {
                    Form::Box {
                        length,
                        width,
                        height,
                    } => Item::new_box(name, length, width, height),
                    Form::Cylinder { radius, height } => Item::cylinder(name, radius, height),
                };
                items.push(item.with_weight(object.weight));
            }
        }
        items
    }
}

/// Container dimensions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContainerSpec {
    /// Floor extent along x
    pub width: f64,
    /// Floor extent along y
    pub length: f64,
    /// Inner height
    pub height: f64,
    /// Weight limit
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_weight: Option<f64>,
}

/// An object type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectSpec {
    /// Product name
    pub name: String,
    /// Shape and dimensions
    pub form: Form,
    /// Weight of one copy
    #[serde(default)]
    pub weight: f64,
    /// Number of copies
    #[serde(default = "default_quantity")]
    pub quantity: usize,
}

fn default_quantity() -> usize {
    1
}

/// Shape of an object type.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Form {
    /// Cuboid
    Box {
        /// Extent along x
        length: f64,
        /// Extent along y
        width: f64,
        /// Vertical extent
        height: f64,
    },
    /// Upright cylinder
    Cylinder {
        /// Base radius
        radius: f64,
        /// Vertical extent
        height: f64,
    },
}

impl Form {
    /// Returns the vertical extent.
    pub fn height(&self) -> f64 {
        match *self {
            Form::Box { height, .. } | Form::Cylinder { height, .. } => height,
        }
    }
}
