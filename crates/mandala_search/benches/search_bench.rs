use criterion::{Criterion, black_box, criterion_group, criterion_main};
use mandala_core::{LongitudeContext, MeanElementsProvider};
use mandala_search::{BirthInput, ChartAssembler, ChartConfig, DesignConfig, resolve_design_epoch};
use mandala_time::{FixedOffset, NaiveDate, NaiveTime, UtcEpoch, UtcTime};

fn birth() -> Option<BirthInput> {
    Some(BirthInput::new(
        NaiveDate::from_ymd_opt(1988, 8, 8)?,
        NaiveTime::from_hms_opt(20, 8, 0)?,
        FixedOffset::east_opt(8 * 3600)?,
    ))
}

fn design_bench(c: &mut Criterion) {
    let provider = MeanElementsProvider::new();
    let personality = UtcEpoch::from_utc(&UtcTime::new(1990, 1, 15, 6, 30, 0.0));
    let root_find = DesignConfig::root_find();

    let mut group = c.benchmark_group("design_epoch");
    group.bench_function("root_find", |b| {
        b.iter(|| {
            let mut ctx = LongitudeContext::new(&provider);
            resolve_design_epoch(&mut ctx, black_box(personality), &root_find)
        })
    });
    group.finish();
}

fn chart_bench(c: &mut Criterion) {
    let Some(input) = birth() else { return };
    let root_find = ChartAssembler::new(MeanElementsProvider::new());
    let fixed = match ChartAssembler::with_config(
        MeanElementsProvider::new(),
        ChartConfig {
            design: DesignConfig::fixed_offset(),
            ..ChartConfig::default()
        },
    ) {
        Ok(a) => a,
        Err(_) => return,
    };

    let mut group = c.benchmark_group("chart");
    group.sample_size(50);
    group.bench_function("assemble_root_find", |b| {
        b.iter(|| root_find.assemble(black_box(&input)))
    });
    group.bench_function("assemble_fixed_offset", |b| {
        b.iter(|| fixed.assemble(black_box(&input)))
    });
    group.finish();
}

criterion_group!(benches, design_bench, chart_bench);
criterion_main!(benches);
