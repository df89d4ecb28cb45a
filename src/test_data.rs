//! Data used in tests.

use crate::{grid::GriddedDataset, series::ObservationSeries};
use chrono::{Duration, NaiveDate, NaiveDateTime};
use ndarray::{Array, IxDyn};

pub fn day(year: i32, month: u32, day: u32) -> NaiveDateTime {
    hour(year, month, day, 0)
}

pub fn hour(year: i32, month: u32, day: u32, hour: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|d| d.and_hms_opt(hour, 0, 0))
        .expect("valid test date")
}

fn hourly_index(ndays: usize) -> Vec<NaiveDateTime> {
    let start = day(2000, 1, 1);
    (0..ndays * 24)
        .map(|h| start + Duration::hours(h as i64))
        .collect()
}

/// Hourly temperatures starting 2000-01-01 00:00, every value distinct.
pub fn hourly_series(ndays: usize) -> ObservationSeries {
    let pairs = hourly_index(ndays)
        .into_iter()
        .enumerate()
        .map(|(i, t)| (t, 270.0 + i as f64 * 0.25))
        .collect();

    ObservationSeries::from_pairs("TMPA", pairs)
}

/// Hourly `t2m` on a 3 x 4 grid with descending latitudes, every value distinct.
pub fn hourly_grid(ndays: usize) -> GriddedDataset {
    let time = hourly_index(ndays);
    let nt = time.len();

    let data = Array::from_shape_fn(IxDyn(&[nt, 3, 4]), |idx| {
        (idx[0] * 100 + idx[1] * 10 + idx[2]) as f32
    });

    GriddedDataset::new(vec![2.0, 1.0, 0.0], vec![0.0, 1.0, 2.0, 3.0])
        .with_time(time)
        .and_then(|ds| ds.with_variable("t2m", data))
        .expect("valid test grid")
}

/// A 2-D `t2m` field on latitudes 50 to 47 and longitudes -5 to -3, with no time dimension.
pub fn descending_grid() -> GriddedDataset {
    let data = Array::from_shape_fn(IxDyn(&[4, 3]), |idx| (idx[0] * 3 + idx[1]) as f32);

    GriddedDataset::new(vec![50.0, 49.0, 48.0, 47.0], vec![-5.0, -4.0, -3.0])
        .with_variable("t2m", data)
        .expect("valid test grid")
}
