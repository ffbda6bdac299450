//! Benchmarks search-engine throughput over a generated host graph, named
//! after what it measures per this lineage's benchmark-naming convention.
#![allow(clippy::expect_used)]

use criterion::{Criterion, criterion_group, criterion_main};
use grandiso_core::{AttributeBag, AttributeGraph, SearchConfig, find_motifs};
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;

fn random_directed_graph(rng: &mut StdRng, n: usize, edge_prob: f64) -> AttributeGraph<usize> {
    let mut g = AttributeGraph::new(true);
    for i in 0..n {
        g.add_vertex(i, AttributeBag::new()).expect("unique vertex id");
    }
    for i in 0..n {
        for j in 0..n {
            if i != j && rng.gen_bool(edge_prob) {
                g.add_edge(&i, &j, AttributeBag::new())
                    .expect("both endpoints already inserted");
            }
        }
    }
    g
}

fn bench_subgraph_search(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(42);
    let host = random_directed_graph(&mut rng, 40, 0.15);
    let motif = random_directed_graph(&mut rng, 5, 0.5);
    let config = SearchConfig {
        directed: Some(true),
        ..SearchConfig::default()
    };

    c.bench_function("find_motifs_40_vertex_host_5_vertex_motif", |b| {
        b.iter(|| find_motifs(&motif, &host, &config).expect("search succeeds"))
    });

    let count_config = SearchConfig {
        directed: Some(true),
        count_only: true,
        ..SearchConfig::default()
    };
    c.bench_function("find_motifs_count_only_40_vertex_host_5_vertex_motif", |b| {
        b.iter(|| find_motifs(&motif, &host, &count_config).expect("search succeeds"))
    });
}

criterion_group!(benches, bench_subgraph_search);
criterion_main!(benches);
