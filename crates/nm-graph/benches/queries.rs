use nm_core::rng::RngHandle;
use nm_graph::gen_gnp;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn queries_bench(c: &mut Criterion) {
    let mut rng = RngHandle::from_seed(7);
    let graph = gen_gnp(2_000, 0.005, false, &mut rng).unwrap();
    let edges = graph.edge_list();
    let nodes: Vec<_> = graph.nodes().collect();

    c.bench_function("has_edge", |b| {
        b.iter(|| {
            for edge in &edges {
                black_box(graph.has_edge(edge.v, edge.u));
            }
        });
    });

    c.bench_function("degree_queries", |b| {
        b.iter(|| {
            for node in &nodes {
                black_box(graph.degree(*node));
            }
        });
    });

    c.bench_function("edge_iteration", |b| {
        b.iter(|| black_box(graph.edges().count()));
    });
}

criterion_group!(benches, queries_bench);
criterion_main!(benches);
