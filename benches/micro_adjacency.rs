#![forbid(unsafe_code)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use penumbra::{Dir, Edge, Graph, Vertex, VertexId};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

const VERTEX_COUNT: usize = 8_192;
const EDGE_COUNT: usize = 65_536;

fn micro_adjacency(c: &mut Criterion) {
    let mut group = c.benchmark_group("micro/adjacency");
    group.sample_size(40);
    group.throughput(Throughput::Elements(1));

    let mut harness = GraphHarness::new(VERTEX_COUNT, EDGE_COUNT);
    for dir in [Dir::Out, Dir::In, Dir::Both] {
        group.bench_with_input(
            BenchmarkId::new("edges", format!("{dir:?}")),
            &dir,
            |b, dir| {
                b.iter(|| black_box(harness.edges(*dir)));
            },
        );
        group.bench_with_input(
            BenchmarkId::new("far_ends", format!("{dir:?}")),
            &dir,
            |b, dir| {
                b.iter(|| black_box(harness.far_ends(*dir)));
            },
        );
    }
    group.bench_function("has_edge_from_to", |b| {
        b.iter(|| black_box(harness.probe()));
    });
    group.finish();

    let mut group = c.benchmark_group("micro/mutation");
    group.sample_size(20);
    group.bench_function("clone_then_write", |b| {
        b.iter(|| {
            let mut copy = harness.graph.clone();
            black_box(copy.add_vertex())
        });
    });
    group.bench_function("remove_vertex_cascade", |b| {
        b.iter_batched(
            || harness.graph.clone(),
            |mut graph| {
                let vertex = harness.nodes[0];
                black_box(graph.remove_vertex(vertex).expect("vertex"))
            },
            criterion::BatchSize::LargeInput,
        );
    });
    group.finish();
}

struct GraphHarness {
    graph: Graph,
    nodes: Vec<VertexId>,
    cursor: usize,
}

impl GraphHarness {
    fn new(vertex_count: usize, edge_count: usize) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(0xDEADBEEF);
        let mut graph = Graph::new();
        let nodes: Vec<_> = (0..vertex_count)
            .map(|_| {
                graph
                    .insert_vertex(Vertex::with_rng(&mut rng))
                    .expect("vertex")
            })
            .collect();
        for _ in 0..edge_count {
            let tail = nodes[rng.gen_range(0..nodes.len())];
            let head = nodes[rng.gen_range(0..nodes.len())];
            graph
                .insert_edge(Edge::with_rng(tail, head, &mut rng))
                .expect("edge");
        }
        Self {
            graph,
            nodes,
            cursor: 0,
        }
    }

    fn edges(&mut self, dir: Dir) -> usize {
        let vertex = self.next_vertex();
        let edges = match dir {
            Dir::Out => self.graph.out_edges(vertex),
            Dir::In => self.graph.in_edges(vertex),
            Dir::Both => self.graph.incident_edges(vertex),
        };
        edges.expect("edges").len()
    }

    fn far_ends(&mut self, dir: Dir) -> usize {
        let vertex = self.next_vertex();
        let ends = match dir {
            Dir::Out => self.graph.successors(vertex),
            Dir::In => self.graph.predecessors(vertex),
            Dir::Both => self.graph.neighbors(vertex),
        };
        ends.expect("vertices").len()
    }

    fn probe(&mut self) -> bool {
        let tail = self.next_vertex();
        let head = self.next_vertex();
        self.graph.has_edge_from_to(tail, head).expect("probe")
    }

    fn next_vertex(&mut self) -> VertexId {
        if self.cursor >= self.nodes.len() {
            self.cursor = 0;
        }
        let vertex = self.nodes[self.cursor];
        self.cursor += 1;
        vertex
    }
}

criterion_group!(benches, micro_adjacency);
criterion_main!(benches);
