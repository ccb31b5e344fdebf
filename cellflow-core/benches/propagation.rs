//! Propagation benchmarks: full sweeps against affected-only sweeps.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use cellflow_core::{InputCell, Reactor, ReactorConfig, SweepStrategy};

const STRATEGIES: [SweepStrategy; 2] = [SweepStrategy::Full, SweepStrategy::Affected];

/// Many independent inputs, each with one compute cell. A write touches one
/// of them.
fn wide_graph(sweep: SweepStrategy, width: usize) -> (Reactor<i64>, InputCell<i64>) {
    let reactor = Reactor::with_config(ReactorConfig::new().with_sweep(sweep));
    let mut first = None;
    for _ in 0..width {
        let input = reactor.create_input(0);
        reactor.create_compute1(&input, |v| v * 2).unwrap();
        first.get_or_insert(input);
    }
    (reactor, first.unwrap())
}

/// A single chain of compute cells hanging off one input.
fn chain(sweep: SweepStrategy, length: usize) -> (Reactor<i64>, InputCell<i64>) {
    let reactor = Reactor::with_config(ReactorConfig::new().with_sweep(sweep));
    let input = reactor.create_input(0);
    let mut tail = reactor.create_compute1(&input, |v| v + 1).unwrap();
    for _ in 1..length {
        tail = reactor.create_compute1(&tail, |v| v + 1).unwrap();
    }
    tail.add_callback(|value| {
        black_box(value);
    });
    (reactor, input)
}

fn bench_wide(c: &mut Criterion) {
    let mut group = c.benchmark_group("wide_graph");
    for sweep in STRATEGIES {
        for width in [10, 100, 1_000] {
            let (_reactor, input) = wide_graph(sweep, width);
            let mut next = 0;
            group.bench_with_input(
                BenchmarkId::new(format!("{sweep:?}"), width),
                &width,
                |b, _| {
                    b.iter(|| {
                        next += 1;
                        input.set_value(black_box(next)).unwrap();
                    })
                },
            );
        }
    }
    group.finish();
}

fn bench_chain(c: &mut Criterion) {
    let mut group = c.benchmark_group("chain");
    for sweep in STRATEGIES {
        for length in [4, 16, 64] {
            let (_reactor, input) = chain(sweep, length);
            let mut next = 0;
            group.bench_with_input(
                BenchmarkId::new(format!("{sweep:?}"), length),
                &length,
                |b, _| {
                    b.iter(|| {
                        next += 1;
                        input.set_value(black_box(next)).unwrap();
                    })
                },
            );
        }
    }
    group.finish();
}

criterion_group!(benches, bench_wide, bench_chain);
criterion_main!(benches);
