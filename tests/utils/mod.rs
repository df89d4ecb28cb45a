use chrono::{NaiveDate, NaiveDateTime};
use std::path::PathBuf;

pub fn test_data_path(name: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("test_data");
    path.push(name);
    path
}

#[allow(dead_code)]
pub fn station_dir() -> PathBuf {
    test_data_path("station_9434")
}

#[allow(dead_code)]
pub fn aemet_dir() -> PathBuf {
    test_data_path("aemet")
}

#[allow(dead_code)]
pub fn day(year: i32, month: u32, day: u32) -> NaiveDateTime {
    hour(year, month, day, 0)
}

#[allow(dead_code)]
pub fn hour(year: i32, month: u32, day: u32, hour: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|d| d.and_hms_opt(hour, 0, 0))
        .expect("valid test date")
}
