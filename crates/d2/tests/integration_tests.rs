//! Integration tests for u-loading-d2.

use approx::assert_relative_eq;
use u_loading_core::geometry::EPSILON;
use u_loading_d2::{
    pack_floor, FloorArea, FloorPackResult, PackingParams, PlacementObject, StopReason,
};

fn quick_params(seed: u64) -> PackingParams {
    PackingParams::new()
        .with_sa_runs(3)
        .with_iter_limit(1_500)
        .with_placement_tries(1_000)
        .with_seed(seed)
}

fn assert_layout_invariants(result: &FloorPackResult, floor: &FloorArea) {
    let placed = result.layout.placed();
    for (i, a) in placed.iter().enumerate() {
        let shape = a.shape();
        assert!(floor.contains(&shape), "{} out of bounds", a.object.label());
        for b in &placed[i + 1..] {
            assert!(
                !shape.overlaps(&b.shape()),
                "{} overlaps {}",
                a.object.label(),
                b.object.label()
            );
        }
    }
    assert!(result.total_weight <= floor.weight_capacity() + EPSILON);
    assert_relative_eq!(result.total_weight, result.layout.total_weight(), epsilon = 1e-9);
}

mod scenario_tests {
    use super::*;

    #[test]
    fn test_two_circles_in_square() {
        let pool = vec![
            PlacementObject::circle(0, "C1", 2.0),
            PlacementObject::circle(1, "C2", 2.0),
        ];
        let floor = FloorArea::new(10.0, 10.0);
        let result = pack_floor(&pool, &floor, &quick_params(1)).unwrap();

        assert!(result.all_placed());
        assert_eq!(result.stop_reason, StopReason::AllPlaced);
        assert_eq!(result.layout.len(), 2);

        let a = result.layout.get(0).unwrap().center;
        let b = result.layout.get(1).unwrap().center;
        assert!(nalgebra::distance(&a, &b) >= 4.0 - 1e-6);
        assert_layout_invariants(&result, &floor);
    }

    #[test]
    fn test_full_floor_leaves_remainder() {
        let pool = vec![
            PlacementObject::rect(0, "Slab", 5.0, 5.0),
            PlacementObject::rect(1, "Crate", 1.0, 1.0),
            PlacementObject::circle(2, "Drum", 0.5),
        ];
        let floor = FloorArea::new(5.0, 5.0);
        let result = pack_floor(&pool, &floor, &quick_params(2)).unwrap();

        assert_eq!(result.layout.len(), 1);
        assert_eq!(result.unplaced.len(), 2);
        assert_eq!(result.stop_reason, StopReason::NoFeasiblePosition);
        assert_layout_invariants(&result, &floor);
    }

    #[test]
    fn test_heavy_largest_object_is_fatal() {
        let pool = vec![PlacementObject::rect(0, "Only", 2.0, 2.0).with_weight(1_000.0)];
        let floor = FloorArea::new(10.0, 10.0).with_max_weight(999.0);
        let err = pack_floor(&pool, &floor, &quick_params(3)).unwrap_err();
        assert!(err.is_fatal_input());
    }
}

mod property_tests {
    use super::*;
    use rand::prelude::*;

    fn random_pool(seed: u64, n: usize) -> Vec<PlacementObject> {
        let mut rng = StdRng::seed_from_u64(seed);
        (0..n)
            .map(|i| {
                let object = if rng.gen_bool(0.3) {
                    PlacementObject::circle(i, format!("D{}", i), rng.gen_range(0.5..1.5))
                } else {
                    PlacementObject::rect(
                        i,
                        format!("B{}", i),
                        rng.gen_range(1.0..4.0),
                        rng.gen_range(1.0..4.0),
                    )
                };
                object
                    .with_type_id(i % 3)
                    .with_weight(rng.gen_range(1.0..20.0))
            })
            .collect()
    }

    #[test]
    fn test_random_pools_keep_invariants() {
        for seed in 0..3 {
            let pool = random_pool(seed, 10);
            let floor = FloorArea::new(12.0, 8.0).with_max_weight(80.0);
            let result = pack_floor(&pool, &floor, &quick_params(seed)).unwrap();

            assert_layout_invariants(&result, &floor);
            assert_eq!(result.layout.len() + result.unplaced.len(), pool.len());
            assert_eq!(result.rounds, result.cost_history.len());
        }
    }

    #[test]
    fn test_same_seed_same_layout() {
        let pool = random_pool(9, 6);
        let floor = FloorArea::new(10.0, 10.0);
        let a = pack_floor(&pool, &floor, &quick_params(4)).unwrap();
        let b = pack_floor(&pool, &floor, &quick_params(4)).unwrap();
        assert_eq!(a.records(), b.records());
    }

    #[test]
    fn test_rotation_round_trip_preserves_area() {
        for object in random_pool(5, 20) {
            let twice = object.rotated_copy().rotated_copy();
            assert_eq!(twice.width(), object.width());
            assert_eq!(twice.height(), object.height());
            assert_relative_eq!(twice.width() * twice.height(), object.width() * object.height());
            assert!(!twice.rotated());
        }
    }

    #[test]
    fn test_records_describe_layout() {
        let pool = random_pool(12, 5);
        let floor = FloorArea::new(10.0, 10.0);
        let result = pack_floor(&pool, &floor, &quick_params(6)).unwrap();

        for (record, placed) in result.records().iter().zip(result.layout.placed()) {
            assert_relative_eq!(record.x + record.width / 2.0, placed.center.x);
            assert_relative_eq!(record.y + record.height / 2.0, placed.center.y);
            assert!(record.x >= -EPSILON && record.y >= -EPSILON);
            assert_eq!(record.rotated, placed.object.rotated());
        }
    }
}
