//! Windows of dates around a test date, used to pick validation periods.
use crate::error::{Result, WranglerError};
use chrono::{Duration, NaiveDateTime};
use std::str::FromStr;

/// Where the test date sits inside its window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WindowType {
    /// The test date is the last date of the window.
    Forward,
    /// The test date is the first date of the window.
    Back,
    /// The test date is in the center of the window.
    Centered,
}

impl Default for WindowType {
    fn default() -> Self {
        WindowType::Centered
    }
}

impl FromStr for WindowType {
    type Err = WranglerError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "forward" => Ok(WindowType::Forward),
            "back" => Ok(WindowType::Back),
            "centered" => Ok(WindowType::Centered),
            _ => Err(WranglerError::InvalidWindowType(s.to_owned())),
        }
    }
}

/// Dates of `dates` inside a window of `window_size` days around `test_date`.
///
/// The window size does not count the test date itself, so a centered window of 4 days spans
/// from 2 days before to 2 days after. An odd centered window puts the extra day before. The
/// window advances in whole days from its first date, and the result is sorted.
pub fn validation_window(
    test_date: NaiveDateTime,
    dates: &[NaiveDateTime],
    window_size: u32,
    window_type: WindowType,
) -> Vec<NaiveDateTime> {
    let size = i64::from(window_size);

    let (initial, last) = match window_type {
        WindowType::Forward => (test_date - Duration::days(size), test_date),
        WindowType::Back => (test_date, test_date + Duration::days(size)),
        WindowType::Centered => (
            test_date - Duration::days((size + 1) / 2),
            test_date + Duration::days(size / 2),
        ),
    };

    let mut window: Vec<NaiveDateTime> = dates
        .iter()
        .filter(|&&d| d >= initial && d <= last && (d - initial).num_seconds() % 86_400 == 0)
        .cloned()
        .collect();

    window.sort();
    window.dedup();
    window
}
