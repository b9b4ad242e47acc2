use criterion::{BatchSize, BenchmarkId, Criterion, criterion_group, criterion_main};
use orca::crossing_reduction;
use orca::model::HierarchyModel;
use orca::LayoutConfig;
use std::hint::black_box;
use std::time::Duration;

#[derive(Debug, Clone)]
struct LayerSpec {
    ranks: usize,
    per_rank: usize,
    edges: Vec<(usize, usize, usize)>,
}

impl LayerSpec {
    fn build(&self) -> HierarchyModel {
        let mut model = HierarchyModel::new();
        let mut nodes = Vec::new();
        for rank in 0..self.ranks {
            for i in 0..self.per_rank {
                nodes.push(model.add_vertex(format!("n{rank}_{i}"), rank));
            }
        }
        for &(rank, from, to) in &self.edges {
            let source = nodes[rank * self.per_rank + from];
            let target = nodes[(rank + 1) * self.per_rank + to];
            model.add_edge(source, target, vec![format!("e{rank}_{from}_{to}")]);
        }
        model.fix_ranks();
        model
    }
}

fn build_layer_spec(ranks: usize, per_rank: usize, fanout: usize) -> LayerSpec {
    // A small multiplicative congruential sequence keeps the edge pattern
    // scrambled but reproducible.
    let mut state: u64 = 0x2545_f491_4f6c_dd1d;
    let mut next = move |bound: usize| {
        state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        ((state >> 33) as usize) % bound
    };

    let mut edges = Vec::new();
    for rank in 0..ranks - 1 {
        for from in 0..per_rank {
            for _ in 0..fanout {
                edges.push((rank, from, next(per_rank)));
            }
        }
    }
    LayerSpec {
        ranks,
        per_rank,
        edges,
    }
}

fn bench_crossing_reduction(c: &mut Criterion) {
    let mut group = c.benchmark_group("crossing_reduction");
    group.measurement_time(Duration::from_secs(10));

    let cases = [
        ("ranks_5x10_f2", 5usize, 10usize, 2usize),
        ("ranks_10x20_f2", 10, 20, 2),
        ("ranks_20x30_f3", 20, 30, 3),
    ];

    for (name, ranks, per_rank, fanout) in cases {
        let spec = build_layer_spec(ranks, per_rank, fanout);
        group.bench_with_input(
            BenchmarkId::new("crossing_reduction::run", name),
            &spec,
            |b, spec| {
                b.iter_batched(
                    || spec.build(),
                    |mut model| {
                        crossing_reduction::run(black_box(&mut model), &LayoutConfig::default());
                        black_box(model.ranks.len());
                    },
                    BatchSize::LargeInput,
                )
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_crossing_reduction);
criterion_main!(benches);
