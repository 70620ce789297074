//! Benchmarks for the CAN partition manager
//!
//! Measures performance of:
//! - Node joins (split + neighbor rebuild)
//! - Greedy key lookups at different partition sizes
//! - PUT/GET round trips

use can_dht::{NodeId, Partition};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Build a partition with `n` nodes from a fixed seed.
fn partition_with(n: usize) -> Partition {
    let mut can = Partition::default();
    let mut rng = StdRng::seed_from_u64(42);
    while can.len() < n {
        // A too-small owner zone just skips this draw.
        let _ = can.add_random_node(&mut rng);
    }
    can
}

fn bench_joins(c: &mut Criterion) {
    let mut group = c.benchmark_group("joins");
    group.sample_size(20);

    for &n in &[16usize, 64, 128] {
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            b.iter(|| partition_with(black_box(n)))
        });
    }
    group.finish();
}

/// Lookups always start at the first node so hop counts grow with size.
fn bench_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("lookup");

    for &n in &[16usize, 64, 256] {
        let can = partition_with(n);
        let points: Vec<_> = (0..64).map(|i| can.hash(&format!("key-{i}"))).collect();
        let start = can.node_ids().first().copied().unwrap_or(NodeId::FIRST);

        group.throughput(Throughput::Elements(points.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n), &points, |b, points| {
            b.iter(|| {
                points
                    .iter()
                    .map(|&p| can.lookup(black_box(p), start).map(|r| r.hops()).unwrap_or(0))
                    .sum::<usize>()
            })
        });
    }
    group.finish();
}

fn bench_put_get(c: &mut Criterion) {
    let mut can = partition_with(64);
    for i in 0..256 {
        let _ = can.put(format!("key-{i}"), "value");
    }

    c.bench_function("get_64_nodes", |b| {
        let mut i = 0usize;
        b.iter(|| {
            i = (i + 1) % 256;
            black_box(can.get(&format!("key-{i}")).ok())
        })
    });
}

criterion_group!(benches, bench_joins, bench_lookup, bench_put_get);
criterion_main!(benches);
