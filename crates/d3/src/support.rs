//! Support predicates: may one item stand directly on another?

use crate::geometry::{Item, ItemShape};
use u_loading_core::geometry::EPSILON;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Decides whether `upper` may be placed directly on top of `lower`.
pub trait SupportRule: Send + Sync {
    /// Returns true if `lower` can carry `upper` without overhang.
    fn supports(&self, lower: &Item, upper: &Item) -> bool;

    /// Short name for logs and reports.
    fn name(&self) -> &'static str;
}

/// Footprint-area approximation: the upper footprint is not larger than the
/// lower one.
#[derive(Debug, Clone, Copy, Default)]
pub struct FootprintAreaRule;

impl SupportRule for FootprintAreaRule {
    fn supports(&self, lower: &Item, upper: &Item) -> bool {
        upper.footprint_area() <= lower.footprint_area()
    }

    fn name(&self) -> &'static str {
        "footprint-area"
    }
}

/// Exact containment of the upper footprint in the lower one, both centered
/// and unrotated.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExactFootprintRule;

impl SupportRule for ExactFootprintRule {
    fn supports(&self, lower: &Item, upper: &Item) -> bool {
        match (*upper.shape(), *lower.shape()) {
            (ItemShape::Cylinder { radius: r_up }, ItemShape::Cylinder { radius: r_low }) => {
                r_up <= r_low + EPSILON
            }
            (
                ItemShape::Box {
                    length: l_up,
                    width: w_up,
                },
                ItemShape::Box {
                    length: l_low,
                    width: w_low,
                },
            ) => l_up <= l_low + EPSILON && w_up <= w_low + EPSILON,
            (ItemShape::Cylinder { radius }, ItemShape::Box { length, width }) => {
                let diameter = 2.0 * radius;
                diameter <= length + EPSILON && diameter <= width + EPSILON
            }
            (ItemShape::Box { length, width }, ItemShape::Cylinder { radius }) => {
                0.5 * length.hypot(width) <= radius + EPSILON
            }
        }
    }

    fn name(&self) -> &'static str {
        "exact-footprint"
    }
}

/// Configurable choice of support rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SupportRuleKind {
    /// [`FootprintAreaRule`].
    #[default]
    FootprintArea,
    /// [`ExactFootprintRule`].
    ExactFootprint,
}

impl SupportRule for SupportRuleKind {
    fn supports(&self, lower: &Item, upper: &Item) -> bool {
        match self {
            SupportRuleKind::FootprintArea => FootprintAreaRule.supports(lower, upper),
            SupportRuleKind::ExactFootprint => ExactFootprintRule.supports(lower, upper),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            SupportRuleKind::FootprintArea => FootprintAreaRule.name(),
            SupportRuleKind::ExactFootprint => ExactFootprintRule.name(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_area_rule_ignores_shape() {
        let wide = Item::new_box("wide", 8.0, 1.0, 1.0);
        let square = Item::new_box("square", 2.0, 2.0, 1.0);
        assert!(FootprintAreaRule.supports(&wide, &square));
        assert!(!FootprintAreaRule.supports(&square, &wide));
        // Equal areas support each other.
        let twin = Item::new_box("twin", 2.0, 2.0, 3.0);
        assert!(FootprintAreaRule.supports(&square, &twin));
        assert!(FootprintAreaRule.supports(&twin, &square));
    }

    #[test]
    fn test_exact_rule_box_on_box() {
        let wide = Item::new_box("wide", 8.0, 1.0, 1.0);
        let square = Item::new_box("square", 2.0, 2.0, 1.0);
        assert!(!ExactFootprintRule.supports(&wide, &square));
        assert!(ExactFootprintRule.supports(&square, &Item::new_box("s", 2.0, 1.0, 1.0)));
    }

    #[test]
    fn test_exact_rule_mixed() {
        let cyl = Item::cylinder("c", 1.0, 1.0);
        let big_box = Item::new_box("b", 2.0, 2.0, 1.0);
        let small_box = Item::new_box("sb", 1.2, 1.2, 1.0);

        // Diameter 2 fits exactly on the 2 x 2 box.
        assert!(ExactFootprintRule.supports(&big_box, &cyl));
        // Half-diagonal of 1.2 x 1.2 is ~0.85 <= 1.
        assert!(ExactFootprintRule.supports(&cyl, &small_box));
        // Half-diagonal of 2 x 2 is ~1.41 > 1.
        assert!(!ExactFootprintRule.supports(&cyl, &big_box));
        assert!(ExactFootprintRule.supports(&cyl, &Item::cylinder("c2", 0.5, 1.0)));
    }

    #[test]
    fn test_rule_kind_dispatch() {
        let wide = Item::new_box("wide", 8.0, 1.0, 1.0);
        let square = Item::new_box("square", 2.0, 2.0, 1.0);
        assert!(SupportRuleKind::default().supports(&wide, &square));
        assert!(!SupportRuleKind::ExactFootprint.supports(&wide, &square));
        assert_eq!(SupportRuleKind::ExactFootprint.name(), "exact-footprint");
    }
}
