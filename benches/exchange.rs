//! Performance benchmarks for the exchange checks.
//!
//! Run with: `cargo bench --bench exchange`
//!
//! ## Performance Targets
//!
//! | Operation | Target | Notes |
//! |-----------|--------|-------|
//! | describe | <1µs | Four metadata calls, no allocation |
//! | check_set | Linear in grid size | Sentinel fill + read-back |
//! | check_get | Linear in grid size | Sentinel fill, copy, compare |

use criterion::{
    black_box, criterion_group, criterion_main,
    BenchmarkId, Criterion, Throughput,
};

use bmi_tester::{
    BufferOracle, ConformanceSuite, ExchangeVerifier, HarnessConfig, ModelCapabilities,
    ProtocolVersion, ReferenceBehavior, ReferenceModel,
};

/// Create a model with one float and one integer variable on a grid of `nodes` nodes.
fn make_model(nodes: usize) -> ReferenceModel {
    ReferenceModel::new("bench")
        .with_grid(0, nodes, nodes * 2, nodes / 2)
        .with_exchange("temperature", "float64", 0, "node")
        .with_exchange("flow", "int32", 0, "edge")
}

/// Benchmark buffer sizing.
fn bench_describe(c: &mut Criterion) {
    let model = make_model(1_000);

    let mut group = c.benchmark_group("describe");
    for version in [ProtocolVersion::V1_0, ProtocolVersion::V2_0] {
        let oracle = BufferOracle::for_version(version);
        group.bench_with_input(
            BenchmarkId::new("version", version),
            &model,
            |b, model| b.iter(|| oracle.describe(black_box(model), black_box("flow"))),
        );
    }
    group.finish();
}

/// Benchmark check_set across grid sizes.
fn bench_check_set(c: &mut Criterion) {
    let verifier = ExchangeVerifier::for_version(ProtocolVersion::V2_0);

    let mut group = c.benchmark_group("check_set");
    for nodes in [100, 10_000, 1_000_000] {
        let mut model = make_model(nodes);

        group.throughput(Throughput::Elements(nodes as u64));
        group.bench_function(BenchmarkId::new("nodes", nodes), |b| {
            b.iter(|| verifier.check_set(&mut model, black_box("temperature")))
        });
    }
    group.finish();
}

/// Benchmark check_get for both calling conventions.
fn bench_check_get(c: &mut Criterion) {
    let verifier = ExchangeVerifier::for_version(ProtocolVersion::V1_0);
    let nodes = 10_000;

    let mut group = c.benchmark_group("check_get");
    group.throughput(Throughput::Elements(nodes as u64));

    let mut in_place = make_model(nodes);
    group.bench_function("in_place", |b| {
        b.iter(|| verifier.check_get(&mut in_place, black_box("temperature")))
    });

    let mut returning = make_model(nodes).with_behavior(ReferenceBehavior {
        capabilities: ModelCapabilities::legacy(),
        ..Default::default()
    });
    group.bench_function("returning", |b| {
        b.iter(|| verifier.check_get(&mut returning, black_box("temperature")))
    });

    group.finish();
}

/// Benchmark a full suite run, including model construction per check.
fn bench_suite(c: &mut Criterion) {
    let suite = ConformanceSuite::new(&HarnessConfig::default());

    c.bench_function("suite_run", |b| {
        b.iter(|| suite.run(|| make_model(black_box(1_000))))
    });
}

criterion_group!(
    benches,
    bench_describe,
    bench_check_set,
    bench_check_get,
    bench_suite,
);
criterion_main!(benches);
