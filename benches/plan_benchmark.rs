use chrono::NaiveDate;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use trailfuel::config::PlanParameters;
use trailfuel::services::generate_plan;

fn benchmark_generate_plan(c: &mut Criterion) {
    let params = PlanParameters::default();
    let far_past = NaiveDate::from_ymd_opt(2020, 1, 1).expect("valid date");
    let mid_plan = NaiveDate::from_ymd_opt(2026, 4, 1).expect("valid date");

    let mut group = c.benchmark_group("generate_plan");

    group.bench_function("full_horizon", |b| {
        b.iter(|| generate_plan(black_box(10), &params, far_past))
    });

    group.bench_function("mid_plan_cutoff", |b| {
        b.iter(|| generate_plan(black_box(10), &params, mid_plan))
    });

    group.finish();
}

criterion_group!(benches, benchmark_generate_plan);
criterion_main!(benches);
