//! Benchmarks the brute-force recommendation scan at catalog sizes.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use tagrec_core::recommend::score_candidates;
use tagrec_core::vocab::Vocabulary;
use tagrec_core::TwoTowerModel;

fn build_model(n_items: usize, dim: usize) -> TwoTowerModel {
    let items: Vec<String> = (0..n_items).map(|i| format!("r{i:06}")).collect();
    TwoTowerModel::new(
        Vocabulary::from_ids(["tag::query"]),
        Vocabulary::from_ids(items),
        dim,
        42,
    )
}

fn bench_score_candidates(c: &mut Criterion) {
    let mut group = c.benchmark_group("score_candidates");

    for &n_items in &[1_000usize, 10_000, 50_000] {
        let model = build_model(n_items, 64);
        let query: Vec<f32> = model.user_tower().lookup("tag::query").to_vec();

        group.bench_with_input(
            BenchmarkId::from_parameter(n_items),
            &n_items,
            |b, _| {
                b.iter(|| {
                    let ranked = score_candidates(black_box(&model), black_box(&query));
                    black_box(ranked.len())
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_score_candidates);
criterion_main!(benches);
