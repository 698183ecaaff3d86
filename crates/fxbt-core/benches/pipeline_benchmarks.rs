use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use fxbt_core::engines::{EntryEngine, ReversionEngine};
use fxbt_core::indicators::{EwmaMetric, EwmaVol, Metric, PriceField, Spread, ThresholdReversion, TickRate, ZScore};
use fxbt_core::manager::MetricsManager;
use fxbt_core::pipeline::{DefaultExitDistances, SymbolPipeline};
use fxbt_core::predicates::PredicateList;
use fxbt_core::Tick;

fn build_pipeline() -> SymbolPipeline {
    let metrics: Vec<Box<dyn Metric>> = vec![
        Box::new(EwmaMetric::new("e", 30.0, None, PriceField::Mid).unwrap()),
        Box::new(ZScore::new("z", 60.0).unwrap()),
        Box::new(EwmaVol::new("v", 30.0, 300.0, 16, 0.0005, 3.0).unwrap()),
        Box::new(Spread::new("s", 0.0001, 60.0).unwrap()),
        Box::new(TickRate::new("r", 60.0).unwrap()),
        Box::new(ThresholdReversion::new("rv", 0.0001, 10.0, 10.0, 10.0, 0.0, 60.0).unwrap()),
    ];
    let engine: Box<dyn EntryEngine> = Box::new(ReversionEngine::new("rv").unwrap());
    SymbolPipeline::new(
        1,
        0.0001,
        30.0,
        600.0,
        DefaultExitDistances { tp_pips: 10.0, sl_pips: 10.0 },
        MetricsManager::new(metrics),
        PredicateList::new(vec![]),
        PredicateList::new(vec![]),
        engine,
    )
}

fn bench_pipeline_on_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline_on_tick");

    for &n in &[1_000usize, 10_000, 100_000] {
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            b.iter_batched_ref(
                build_pipeline,
                |pipeline| {
                    let mut t = 0.0;
                    for i in 0..n {
                        let mid = 1.1000 + ((i % 200) as f64 - 100.0) * 0.00001;
                        let tick = Tick::new(1, t, mid - 0.00005, mid + 0.00005);
                        pipeline.on_tick(black_box(&tick)).unwrap();
                        t += 1.0;
                    }
                    black_box(pipeline.trades().len());
                },
                criterion::BatchSize::LargeInput,
            );
        });
    }

    group.finish();
}

criterion_group!(benches, bench_pipeline_on_tick);
criterion_main!(benches);
