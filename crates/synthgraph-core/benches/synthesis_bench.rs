//! # Synthesis Benchmarks
//!
//! Performance benchmarks for synthgraph-core graph and search operations.
//!
//! Run with: `cargo bench -p synthgraph-core`

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use synthgraph_core::{
    EdgeWeight, Graph, Inventory, Session, SynthesisEngine, render_dot, session_to_bytes,
};

fn label(index: usize) -> String {
    format!("N{index}")
}

/// N items in a line, every other recipe gated on `key`.
fn create_chain_graph(size: usize) -> Graph {
    let mut graph = Graph::new();
    for i in 0..size {
        graph.add_node(&label(i)).expect("add");
    }
    for i in 1..size {
        let condition = if i % 2 == 0 { "key" } else { "" };
        graph
            .add_edge(&label(i - 1), &label(i), EdgeWeight::new(1), condition)
            .expect("edge");
    }
    graph
}

/// A side x side grid with right and down recipes; the down ones are gated.
fn create_lattice_graph(side: usize) -> Graph {
    let mut graph = Graph::new();
    for i in 0..side * side {
        graph.add_node(&label(i)).expect("add");
    }
    for row in 0..side {
        for col in 0..side {
            let here = row * side + col;
            if col + 1 < side {
                graph
                    .add_edge(&label(here), &label(here + 1), EdgeWeight::new(3), "")
                    .expect("edge");
            }
            if row + 1 < side {
                graph
                    .add_edge(&label(here), &label(here + side), EdgeWeight::new(1), "a&b|c")
                    .expect("edge");
            }
        }
    }
    graph
}

// =============================================================================
// BENCHMARKS
// =============================================================================

fn bench_node_insertion(c: &mut Criterion) {
    let mut group = c.benchmark_group("node_insertion");

    for size in [100, 1000, 10000].iter() {
        let labels: Vec<String> = (0..*size).map(label).collect();
        group.bench_with_input(BenchmarkId::from_parameter(size), &labels, |b, labels| {
            b.iter(|| {
                let mut graph = Graph::new();
                for name in labels {
                    let _ = graph.add_node(name);
                }
                black_box(graph)
            });
        });
    }

    group.finish();
}

fn bench_synthesis_chain(c: &mut Criterion) {
    let mut group = c.benchmark_group("synthesis_chain");
    let inventory: Inventory = ["key"].into_iter().collect();

    for size in [100, 500, 1000].iter() {
        let graph = create_chain_graph(*size);
        let goal = label(*size - 1);

        group.bench_with_input(BenchmarkId::from_parameter(size), &goal, |b, goal| {
            b.iter(|| black_box(SynthesisEngine::new(&graph, &inventory).run("N0", goal)));
        });
    }

    group.finish();
}

fn bench_synthesis_lattice(c: &mut Criterion) {
    let mut group = c.benchmark_group("synthesis_lattice");

    for side in [10, 20, 30].iter() {
        let graph = create_lattice_graph(*side);
        let goal = label(side * side - 1);

        for (name, inventory) in [
            ("gated", Inventory::new()),
            ("open", ["c"].into_iter().collect::<Inventory>()),
        ] {
            group.bench_with_input(BenchmarkId::new(name, side), &goal, |b, goal| {
                b.iter(|| black_box(SynthesisEngine::new(&graph, &inventory).run("N0", goal)));
            });
        }
    }

    group.finish();
}

fn bench_snapshot(c: &mut Criterion) {
    let mut group = c.benchmark_group("snapshot");

    for side in [10, 30].iter() {
        let session = Session::with_parts(create_lattice_graph(*side), Inventory::new());

        group.bench_with_input(BenchmarkId::new("encode", side), &session, |b, session| {
            b.iter(|| black_box(session_to_bytes(session)));
        });
        group.bench_with_input(BenchmarkId::new("dot", side), &session, |b, session| {
            b.iter(|| black_box(render_dot(session)));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_node_insertion,
    bench_synthesis_chain,
    bench_synthesis_lattice,
    bench_snapshot,
);

criterion_main!(benches);
