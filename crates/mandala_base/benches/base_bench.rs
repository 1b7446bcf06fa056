use criterion::{Criterion, black_box, criterion_group, criterion_main};
use mandala_base::{ClassificationRule, GateSet, gate_from_longitude, resolve_channels};

fn gate_bench(c: &mut Criterion) {
    let mut group = c.benchmark_group("gate");
    group.bench_function("gate_from_longitude", |b| {
        b.iter(|| gate_from_longitude(black_box(123.456)))
    });
    group.bench_function("gate_from_longitude_negative", |b| {
        b.iter(|| gate_from_longitude(black_box(-721.25)))
    });
    group.finish();
}

fn channel_bench(c: &mut Criterion) {
    let gates: GateSet = [10, 20, 34, 57, 64, 47, 3, 60, 19, 49, 41, 30, 1, 8, 25, 51, 2, 14]
        .into_iter()
        .collect();

    let mut group = c.benchmark_group("channels");
    group.bench_function("resolve_channels", |b| {
        b.iter(|| resolve_channels(black_box(&gates)))
    });
    let resolution = resolve_channels(&gates);
    group.bench_function("classify_simplified", |b| {
        b.iter(|| {
            ClassificationRule::Simplified
                .classifier()
                .classify(black_box(&resolution))
        })
    });
    group.bench_function("classify_full", |b| {
        b.iter(|| {
            ClassificationRule::Full
                .classifier()
                .classify(black_box(&resolution))
        })
    });
    group.finish();
}

criterion_group!(benches, gate_bench, channel_bench);
criterion_main!(benches);
