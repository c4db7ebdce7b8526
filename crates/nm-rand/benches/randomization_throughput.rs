use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use nm_core::rng::RngHandle;
use nm_graph::gen_gnp;
use nm_rand::{
    CurveballConfig, DegreeIntervalConfig, EdgeSwitchingConfig, EngineConfig,
    GlobalCurveballConfig, IntervalSpec, Randomization,
};

fn randomization_bench(c: &mut Criterion) {
    let mut rng = RngHandle::from_seed(2024);
    let graph = gen_gnp(2_000, 0.005, false, &mut rng).unwrap();

    let engines = [
        ("curveball", EngineConfig::Curveball(CurveballConfig::default())),
        (
            "global_curveball",
            EngineConfig::GlobalCurveball(GlobalCurveballConfig::default()),
        ),
        (
            "edge_switching",
            EngineConfig::EdgeSwitching(EdgeSwitchingConfig {
                switches_per_edge: 1.0,
                pre_shuffle: false,
            }),
        ),
        (
            "degree_interval_switching",
            EngineConfig::DegreeIntervalSwitching(DegreeIntervalConfig {
                switches_per_edge: 1.0,
                intervals: IntervalSpec::Relative { below: 2, above: 2 },
                ..DegreeIntervalConfig::default()
            }),
        ),
        ("degree_preserving_shuffle", EngineConfig::DegreePreservingShuffle),
    ];

    for (name, config) in engines {
        c.bench_function(name, |b| {
            b.iter_batched(
                || config.build(&graph, RngHandle::from_seed(1)).unwrap(),
                |mut engine| {
                    engine.run().unwrap();
                    black_box(engine.graph().number_of_edges())
                },
                BatchSize::SmallInput,
            );
        });
    }
}

criterion_group!(benches, randomization_bench);
criterion_main!(benches);
