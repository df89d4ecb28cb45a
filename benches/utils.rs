use chrono::{Duration, NaiveDate, NaiveDateTime};
use climate_wrangler::{GriddedDataset, ObservationSeries};
use ndarray::{Array, IxDyn};

fn start() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2000, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .unwrap()
}

fn hourly_times(ndays: usize) -> Vec<NaiveDateTime> {
    (0..ndays * 24)
        .map(|h| start() + Duration::hours(h as i64))
        .collect()
}

#[allow(dead_code)]
pub fn hourly_series(ndays: usize) -> ObservationSeries {
    let pairs = hourly_times(ndays)
        .into_iter()
        .enumerate()
        .map(|(i, t)| (t, 280.0 + 10.0 * (i as f64 / 24.0 * std::f64::consts::TAU).sin()))
        .collect();

    ObservationSeries::from_pairs("TMPA", pairs)
}

#[allow(dead_code)]
pub fn hourly_grid(ndays: usize, nlat: usize, nlon: usize) -> GriddedDataset {
    let times = hourly_times(ndays);
    let lats: Vec<f64> = (0..nlat).map(|j| 45.0 - 0.25 * j as f64).collect();
    let lons: Vec<f64> = (0..nlon).map(|k| -10.0 + 0.25 * k as f64).collect();

    let data = Array::from_shape_fn(IxDyn(&[times.len(), nlat, nlon]), |i| {
        (i[0] % 24) as f32 + 0.1 * i[1] as f32 - 0.1 * i[2] as f32
    });

    GriddedDataset::new(lats, lons)
        .with_time(times)
        .and_then(|ds| ds.with_variable("t2m", data))
        .unwrap()
}
