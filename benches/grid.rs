//! Run these benches with `cargo bench --bench grid -- --verbose`
use climate_wrangler::{crop_domain, nearest_gridpoint, Domain, GroupingSpec, Resample};
use criterion::{criterion_group, criterion_main, Criterion};

mod utils;

fn build_tester() -> Criterion {
    Criterion::default()
        .sample_size(100)
        .measurement_time(std::time::Duration::from_secs(10))
        .noise_threshold(0.03)
        .significance_level(0.01)
}

criterion_main!(grid_benches);

criterion_group!(
    name = grid_benches;
    config = build_tester();
    targets = nearest_gridpoint_bench, crop_bench, group_bench
);

fn nearest_gridpoint_bench(c: &mut Criterion) {
    let lats: Vec<f64> = (0..721).map(|j| 90.0 - 0.25 * j as f64).collect();
    let lons: Vec<f64> = (0..1440).map(|k| -180.0 + 0.25 * k as f64).collect();

    c.bench_function("nearest_gridpoint", |b| {
        b.iter(|| nearest_gridpoint(&lats, &lons, 41.66, -1.0).unwrap());
    });
}

fn crop_bench(c: &mut Criterion) {
    let ds = utils::hourly_grid(31, 60, 80);
    let domain = Domain::new(38.0, 43.0, -8.0, 0.0).with_buffer(2, 2);

    c.bench_function("crop_domain", |b| {
        b.iter(|| crop_domain(&ds, &domain).unwrap());
    });
}

fn group_bench(c: &mut Criterion) {
    let ds = utils::hourly_grid(31, 60, 80);
    let spec: GroupingSpec = "1D_max".parse().unwrap();

    c.bench_function("group_grid_daily_max", |b| {
        b.iter(|| ds.group(&spec).unwrap());
    });
}
