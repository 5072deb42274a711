//! Integration tests for u-loading-core.

use rand::prelude::*;
use u_loading_core::bounds::AABB2D;
use u_loading_core::geometry::Shape;
use u_loading_core::placement::{Placement, PlacementStats};
use u_loading_core::result::{SolveResult, SolveSummary};
use u_loading_core::sa::{derive_seed, SaConfig};
use u_loading_core::solver::{PackingParams, Strategy};

fn random_shape(rng: &mut StdRng) -> Shape {
    let x = rng.gen_range(0.0..20.0);
    let y = rng.gen_range(0.0..20.0);
    if rng.gen_bool(0.5) {
        Shape::rect(x, y, rng.gen_range(0.5..6.0), rng.gen_range(0.5..6.0))
    } else {
        Shape::circle(x, y, rng.gen_range(0.25..3.0))
    }
}

mod overlap_tests {
    use super::*;

    #[test]
    fn test_overlap_is_symmetric() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..2_000 {
            let a = random_shape(&mut rng);
            let b = random_shape(&mut rng);
            assert_eq!(a.overlaps(&b), b.overlaps(&a), "{:?} vs {:?}", a, b);
        }
    }

    #[test]
    fn test_overlap_implies_bbox_intersection() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..2_000 {
            let a = random_shape(&mut rng);
            let b = random_shape(&mut rng);
            if a.overlaps(&b) {
                assert!(a.aabb().intersection(&b.aabb()).is_some());
            }
        }
    }

    #[test]
    fn test_concentric_shapes_overlap() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..200 {
            let a = random_shape(&mut rng);
            let c = a.center();
            let dot = Shape::circle(c.x, c.y, 0.01);
            assert!(a.overlaps(&dot));
        }
    }

    #[test]
    fn test_flush_rect_row_has_no_overlap() {
        let row: Vec<Shape> = (0..10)
            .map(|i| Shape::rect(0.3 * i as f64 + 0.15, 0.5, 0.3, 1.0))
            .collect();
        for (i, a) in row.iter().enumerate() {
            assert!(a.is_within(3.0, 1.0));
            for b in row.iter().skip(i + 1) {
                assert!(!a.overlaps(b));
            }
        }
    }
}

mod aabb_tests {
    use super::*;

    #[test]
    fn test_aabb_of_circle() {
        let bb = Shape::circle(5.0, 5.0, 2.0).aabb();
        assert_eq!(bb, AABB2D::new(3.0, 3.0, 7.0, 7.0));
        assert!((bb.area() - 16.0).abs() < 1e-12);
    }
}

mod placement_tests {
    use super::*;

    #[test]
    fn test_stats_over_result() {
        let mut result: SolveResult<f64> =
            SolveResult::new().with_strategy(Strategy::StackAndPack);
        result.placements = vec![
            Placement::new_3d("a".to_string(), 1.0, 1.0, 0.0, false).with_stack(0, 0),
            Placement::new_3d("b".to_string(), 1.0, 1.0, 3.0, false).with_stack(0, 1),
            Placement::new_3d("c".to_string(), 4.0, 1.0, 0.0, true).with_stack(1, 0),
        ];
        result.stack_count = 2;

        let stats: PlacementStats = result.placement_stats();
        assert_eq!(stats.stack_count(), 2);
        assert_eq!(stats.rotated_count, 1);

        let summary = SolveSummary::from(&result);
        assert_eq!(summary.stacks, 2);
        assert_eq!(summary.total_placed, 3);
    }
}

mod config_tests {
    use super::*;

    #[test]
    fn test_sa_config_builder_clamping() {
        let config = SaConfig::new()
            .with_initial_temp(-1.0)
            .with_cooling_rate(2.0)
            .with_rejection_exponent(-0.5);
        assert!(config.initial_temp > 0.0);
        assert!(config.cooling_rate < 1.0);
        assert_eq!(config.rejection_exponent, 0.0);
        assert_eq!(config.rejection_factor(), 1.0);
    }

    #[test]
    fn test_params_feed_worker_config() {
        let params = PackingParams::new()
            .with_initial_temp(2.0)
            .with_iter_limit(10)
            .with_move_probabilities(0.1, 0.1, 0.1);
        let sa = params.sa_config();
        assert_eq!(sa.initial_temp, 2.0);
        assert_eq!(sa.max_iterations, 10);
        assert!((params.operator_weights().translate() - 0.7).abs() < 1e-12);
    }

    #[test]
    fn test_worker_seeds_are_distinct() {
        let seeds: std::collections::HashSet<u64> = (0..64)
            .flat_map(|round| (0..16).map(move |worker| derive_seed(1, &[round, worker])))
            .collect();
        assert_eq!(seeds.len(), 64 * 16);
    }
}
