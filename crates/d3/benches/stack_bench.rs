//! Benchmarks for the stack solver.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use u_loading_d3::{solve_stacks, Item, SupportGraph, SupportRuleKind};

fn random_items(count: usize, seed: u64) -> Vec<Item> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|i| {
            let height = rng.gen_range(0.2..1.2);
            let item = if rng.gen_bool(0.3) {
                Item::cylinder(format!("C{}", i), rng.gen_range(0.2..0.8), height)
            } else {
                Item::new_box(
                    format!("B{}", i),
                    rng.gen_range(0.4..2.0),
                    rng.gen_range(0.4..2.0),
                    height,
                )
            };
            item.with_weight(rng.gen_range(1.0..50.0))
        })
        .collect()
}

fn stack_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("solve_stacks");
    for count in [50usize, 200, 500] {
        let items = random_items(count, 42);
        group.bench_with_input(BenchmarkId::from_parameter(count), &items, |b, items| {
            b.iter(|| {
                let result = solve_stacks(black_box(items), black_box(2.6));
                black_box(result)
            })
        });
    }
    group.finish();

    let items = random_items(500, 7);
    c.bench_function("support_graph_500", |b| {
        b.iter(|| {
            let graph = SupportGraph::build(black_box(&items), &SupportRuleKind::FootprintArea);
            black_box(graph.edge_count())
        })
    });
}

criterion_group!(benches, stack_benchmark);
criterion_main!(benches);
