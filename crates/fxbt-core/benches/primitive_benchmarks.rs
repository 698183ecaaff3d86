use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use fxbt_core::primitives::{Ewma, TimeWeightedHistogram, TimeWeightedWindow};

fn bench_rolling_window_update(c: &mut Criterion) {
    let mut group = c.benchmark_group("rolling_window_update");

    for &n in &[1_000usize, 10_000, 100_000] {
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            b.iter_batched_ref(
                || TimeWeightedWindow::new(60.0),
                |window| {
                    for i in 0..n {
                        let t = i as f64 * 0.1;
                        window.update(t, 0.1, 1.1 + (i % 7) as f64 * 0.0001);
                    }
                    black_box(window.stats());
                },
                criterion::BatchSize::LargeInput,
            );
        });
    }

    group.finish();
}

fn bench_ewma_update(c: &mut Criterion) {
    c.bench_function("ewma_update_10k", |b| {
        b.iter_batched_ref(
            || Ewma::new(10.0, 1),
            |ewma| {
                let mut t = 0.0;
                for i in 0..10_000 {
                    ewma.update(t, 1.1 + (i % 5) as f64 * 0.0001);
                    t += 0.1;
                }
                black_box(ewma.current());
            },
            criterion::BatchSize::LargeInput,
        );
    });
}

fn bench_histogram_percentile_rank(c: &mut Criterion) {
    c.bench_function("histogram_add_and_rank_10k", |b| {
        b.iter_batched_ref(
            || {
                let edges: Vec<f64> = (0..=32).map(|i| i as f64 * 1e-6).collect();
                TimeWeightedHistogram::new(edges, 300.0)
            },
            |hist| {
                let mut t = 0.0;
                for i in 0..10_000 {
                    let v = (i % 32) as f64 * 1e-6;
                    hist.add(t, t + 0.1, v);
                    hist.trim(t + 0.1);
                    t += 0.1;
                }
                black_box(hist.percentile_rank(1.5e-5));
            },
            criterion::BatchSize::LargeInput,
        );
    });
}

criterion_group!(
    benches,
    bench_rolling_window_update,
    bench_ewma_update,
    bench_histogram_percentile_rank
);
criterion_main!(benches);
