//! Seeded synthetic instance generation.

use crate::dataset::{ContainerSpec, Form, Instance, ObjectSpec};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Instance size presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Preset {
    /// A handful of object types in a small van.
    Small,
    /// A 20 ft container.
    Medium,
    /// A 40 ft container with many object types.
    Large,
}

impl Preset {
    /// Returns the preset name.
    pub fn name(&self) -> &'static str {
        match self {
            Preset::Small => "small",
            Preset::Medium => "medium",
            Preset::Large => "large",
        }
    }

    /// Number of object types.
    pub fn object_types(&self) -> usize {
        match self {
            Preset::Small => 6,
            Preset::Medium => 15,
            Preset::Large => 30,
        }
    }

    /// Maximum copies per object type.
    pub fn max_quantity(&self) -> usize {
        match self {
            Preset::Small => 2,
            Preset::Medium => 4,
            Preset::Large => 6,
        }
    }

    /// Container of the preset.
    pub fn container(&self) -> ContainerSpec {
        let (width, length, height, max_weight) = match self {
            Preset::Small => (1.7, 3.0, 1.8, 1_200.0),
            Preset::Medium => (2.35, 5.9, 2.39, 28_000.0),
            Preset::Large => (2.35, 12.0, 2.39, 26_500.0),
        };
        ContainerSpec {
            width,
            length,
            height,
            max_weight: Some(max_weight),
        }
    }
}

/// Generates synthetic instances of boxes and cylinders.
#[derive(Debug, Clone)]
pub struct InstanceGenerator {
    seed: u64,
    cylinder_share: f64,
}

impl InstanceGenerator {
    /// Creates a generator with the given seed.
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            cylinder_share: 0.3,
        }
    }

    /// Sets the probability that an object type is a cylinder.
    pub fn with_cylinder_share(mut self, share: f64) -> Self {
        self.cylinder_share = share.clamp(0.0, 1.0);
        self
    }

    /// Generates an instance for the preset.
    pub fn generate(&self, preset: Preset) -> Instance {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let container = preset.container();
        // Objects never exceed half the floor width or the container height.
        let max_side = 0.5 * container.width;

        let objects = (0..preset.object_types())
            .map(|i| {
                let height = rng.gen_range(0.2..container.height);
                let form = if rng.gen_bool(self.cylinder_share) {
                    Form::Cylinder {
                        radius: rng.gen_range(0.1..0.5 * max_side),
                        height,
                    }
                } else {
                    Form::Box {
                        length: rng.gen_range(0.2..max_side),
                        width: rng.gen_range(0.2..max_side),
                        height,
                    }
                };
                ObjectSpec {
                    name: format!("P{:02}", i + 1),
                    form,
                    weight: rng.gen_range(5.0..120.0),
                    quantity: rng.gen_range(1..=preset.max_quantity()),
                }
            })
            .collect();

        Instance {
            name: format!("{}-{}", preset.name(), self.seed),
            container,
            objects,
            seed: Some(self.seed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_is_seeded() {
        let a = InstanceGenerator::new(7).generate(Preset::Medium);
        let b = InstanceGenerator::new(7).generate(Preset::Medium);
        assert_eq!(a.objects.len(), Preset::Medium.object_types());
        let forms_a: Vec<Form> = a.objects.iter().map(|o| o.form).collect();
        let forms_b: Vec<Form> = b.objects.iter().map(|o| o.form).collect();
        assert_eq!(forms_a, forms_b);
        assert_eq!(a.name, "medium-7");
    }

    #[test]
    fn test_generated_items_fit_container() {
        for preset in [Preset::Small, Preset::Medium, Preset::Large] {
            let instance = InstanceGenerator::new(3).generate(preset);
            let container = &instance.container;
            for object in &instance.objects {
                assert!(object.form.height() < container.height);
                assert!(object.quantity >= 1 && object.quantity <= preset.max_quantity());
            }
        }
    }

    #[test]
    fn test_cylinder_share() {
        let boxes_only = InstanceGenerator::new(1)
            .with_cylinder_share(0.0)
            .generate(Preset::Small);
        assert!(boxes_only
            .objects
            .iter()
            .all(|o| matches!(o.form, Form::Box { .. })));
    }
}
