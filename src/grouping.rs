//! Grouping directives: an optional hour of day filter followed by resampling of the time axis.
//!
//! A directive is written `[{N}hour_]{frequency}_{method}`, for example `12hour_1D_mean` takes
//! the 12:00 values and averages them per day, while `1M_sum` sums every value per month.
use crate::{
    error::{Result, WranglerError},
    series::ObservationSeries,
    utility::optioned,
};
use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use optional::{none, Optioned};
use std::{convert::TryFrom, fmt, ops::Range, str::FromStr};

/// How the values falling in one resampling bin are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Aggregation {
    /// Sum of the values, 0 for an empty bin.
    Sum,
    /// Arithmetic mean.
    Mean,
    /// Minimum value.
    Min,
    /// Maximum value.
    Max,
}

impl Aggregation {
    /// Combine values, skipping `NaN`s. Empty bins are missing except for a sum, which is 0.
    pub fn apply<I>(self, values: I) -> Optioned<f64>
    where
        I: IntoIterator<Item = f64>,
    {
        let mut iter = values.into_iter().filter(|v| !v.is_nan());

        match self {
            Aggregation::Sum => optioned(iter.sum()),
            Aggregation::Mean => {
                let (sum, count) = iter.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
                if count == 0 {
                    none()
                } else {
                    optioned(sum / count as f64)
                }
            }
            Aggregation::Min => iter
                .next()
                .map_or_else(none, |first| optioned(iter.fold(first, f64::min))),
            Aggregation::Max => iter
                .next()
                .map_or_else(none, |first| optioned(iter.fold(first, f64::max))),
        }
    }
}

impl FromStr for Aggregation {
    type Err = WranglerError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "sum" => Ok(Aggregation::Sum),
            "mean" => Ok(Aggregation::Mean),
            "min" => Ok(Aggregation::Min),
            "max" => Ok(Aggregation::Max),
            _ => Err(WranglerError::InvalidAggregation(s.to_owned())),
        }
    }
}

impl fmt::Display for Aggregation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Aggregation::Sum => "sum",
            Aggregation::Mean => "mean",
            Aggregation::Min => "min",
            Aggregation::Max => "max",
        };
        f.write_str(name)
    }
}

/// Width of a resampling bin.
///
/// Hour and day bins are anchored at midnight of the first timestamp's day, month and year bins
/// at the first timestamp's month or year. Bins are labelled by their start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Frequency {
    /// Every `n` hours.
    Hours(u32),
    /// Every `n` days.
    Days(u32),
    /// Every `n` calendar months.
    Months(u32),
    /// Every `n` calendar years.
    Years(u32),
}

impl Frequency {
    /// One bin per day.
    pub const DAILY: Frequency = Frequency::Days(1);

    fn step(self) -> u32 {
        match self {
            Frequency::Hours(n)
            | Frequency::Days(n)
            | Frequency::Months(n)
            | Frequency::Years(n) => n,
        }
    }

    // Start of the bin holding `t` for bins anchored at `origin`. None if the date arithmetic
    // leaves the representable range.
    fn bin_start(self, origin: NaiveDateTime, t: NaiveDateTime) -> Option<NaiveDateTime> {
        let n = i64::from(self.step());
        let midnight = origin.date().and_time(NaiveTime::MIN);

        match self {
            Frequency::Hours(_) => {
                let k = (t - midnight).num_hours().div_euclid(n);
                midnight.checked_add_signed(Duration::try_hours(k.checked_mul(n)?)?)
            }
            Frequency::Days(_) => {
                let k = (t - midnight).num_days().div_euclid(n);
                midnight.checked_add_signed(Duration::try_days(k.checked_mul(n)?)?)
            }
            Frequency::Months(_) => {
                let first = month_number(origin);
                let k = (month_number(t) - first).div_euclid(n);
                month_start(first.checked_add(k.checked_mul(n)?)?)
            }
            Frequency::Years(_) => {
                let first = i64::from(origin.year());
                let k = (i64::from(t.year()) - first).div_euclid(n);
                month_start(first.checked_add(k.checked_mul(n)?)?.checked_mul(12)?)
            }
        }
    }

    // Start of the bin after `bin`. None if it lies past the last representable date.
    fn next_bin(self, bin: NaiveDateTime) -> Option<NaiveDateTime> {
        let n = i64::from(self.step());
        match self {
            Frequency::Hours(_) => bin.checked_add_signed(Duration::try_hours(n)?),
            Frequency::Days(_) => bin.checked_add_signed(Duration::try_days(n)?),
            Frequency::Months(_) => month_start(month_number(bin).checked_add(n)?),
            Frequency::Years(_) => month_start(month_number(bin).checked_add(n.checked_mul(12)?)?),
        }
    }
}

// Months since year 0.
fn month_number(t: NaiveDateTime) -> i64 {
    i64::from(t.year()) * 12 + i64::from(t.month0())
}

fn month_start(month_number: i64) -> Option<NaiveDateTime> {
    let year = i32::try_from(month_number.div_euclid(12)).ok()?;
    let month = month_number.rem_euclid(12) as u32 + 1;
    NaiveDate::from_ymd_opt(year, month, 1).map(|d| d.and_time(NaiveTime::MIN))
}

impl FromStr for Frequency {
    type Err = WranglerError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "hourly" => return Ok(Frequency::Hours(1)),
            "daily" => return Ok(Frequency::Days(1)),
            "monthly" => return Ok(Frequency::Months(1)),
            "yearly" => return Ok(Frequency::Years(1)),
            _ => {}
        }

        let bad = || WranglerError::InvalidFrequency(s.to_owned());

        let split = s.find(|c: char| !c.is_ascii_digit()).ok_or_else(bad)?;
        let (count, unit) = s.split_at(split);
        let count: u32 = if count.is_empty() {
            1
        } else {
            count.parse().map_err(|_| bad())?
        };
        if count == 0 {
            return Err(bad());
        }

        match unit {
            "H" | "h" => Ok(Frequency::Hours(count)),
            "D" | "d" => Ok(Frequency::Days(count)),
            "M" | "MS" => Ok(Frequency::Months(count)),
            "Y" | "YS" | "A" | "AS" => Ok(Frequency::Years(count)),
            _ => Err(bad()),
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Frequency::Hours(n) => write!(f, "{}H", n),
            Frequency::Days(n) => write!(f, "{}D", n),
            Frequency::Months(n) => write!(f, "{}M", n),
            Frequency::Years(n) => write!(f, "{}Y", n),
        }
    }
}

/// Split a sorted time axis into consecutive resampling bins.
///
/// Every bin between the first and last timestamp is returned, including empty ones, together
/// with the range of positions falling inside it. A bin whose end lies past the last
/// representable date holds all the remaining timestamps.
pub(crate) fn resample_bins(
    times: &[NaiveDateTime],
    frequency: Frequency,
) -> Result<Vec<(NaiveDateTime, Range<usize>)>> {
    let (first, last) = match (times.first(), times.last()) {
        (Some(&first), Some(&last)) => (first, last),
        _ => return Ok(vec![]),
    };

    let mut bins = Vec::new();
    let mut start = frequency
        .bin_start(first, first)
        .ok_or_else(|| WranglerError::InvalidFrequency(frequency.to_string()))?;
    let mut pos = 0;
    while start <= last {
        let begin = pos;
        match frequency.next_bin(start) {
            Some(end) => {
                while pos < times.len() && times[pos] < end {
                    pos += 1;
                }
                bins.push((start, begin..pos));
                start = end;
            }
            None => {
                bins.push((start, begin..times.len()));
                break;
            }
        }
    }

    Ok(bins)
}

/// A validated grouping directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GroupingSpec {
    /// Keep only timestamps at this hour of the day before resampling.
    pub hour: Option<u32>,
    /// Resampling bin width.
    pub frequency: Frequency,
    /// How values in a bin are combined.
    pub aggregation: Aggregation,
}

impl GroupingSpec {
    /// Create a directive, checking the hour filter is a valid hour of day.
    pub fn new(hour: Option<u32>, frequency: Frequency, aggregation: Aggregation) -> Result<Self> {
        if let Some(h) = hour {
            if h > 23 {
                return Err(WranglerError::InvalidFrequency(format!("{}hour", h)));
            }
        }

        Ok(GroupingSpec {
            hour,
            frequency,
            aggregation,
        })
    }

    /// True if the timestamp passes the hour filter.
    #[inline]
    pub fn keeps(&self, t: &NaiveDateTime) -> bool {
        self.hour.map_or(true, |h| t.hour() == h)
    }
}

/// The noon value of each day.
impl Default for GroupingSpec {
    fn default() -> Self {
        GroupingSpec {
            hour: Some(12),
            frequency: Frequency::DAILY,
            aggregation: Aggregation::Mean,
        }
    }
}

impl FromStr for GroupingSpec {
    type Err = WranglerError;

    /// Parse a directive.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use climate_wrangler::{Aggregation, Frequency, GroupingSpec};
    ///
    /// let spec: GroupingSpec = "12hour_1D_mean".parse().unwrap();
    /// assert_eq!(spec, GroupingSpec::default());
    ///
    /// let spec: GroupingSpec = "1M_sum".parse().unwrap();
    /// assert_eq!(spec.hour, None);
    /// assert_eq!(spec.frequency, Frequency::Months(1));
    /// assert_eq!(spec.aggregation, Aggregation::Sum);
    ///
    /// assert!("1D".parse::<GroupingSpec>().is_err());
    /// assert!("1D_median".parse::<GroupingSpec>().is_err());
    /// ```
    fn from_str(s: &str) -> Result<Self> {
        let tokens: Vec<&str> = s.split('_').collect();

        let (hour, frequency, method) = match tokens.as_slice() {
            [hour, frequency, method] => (Some(*hour), *frequency, *method),
            [frequency, method] => (None, *frequency, *method),
            _ => return Err(WranglerError::InvalidGrouping(s.to_owned())),
        };

        let hour = hour
            .map(|h| {
                h.strip_suffix("hour")
                    .and_then(|h| h.parse::<u32>().ok())
                    .ok_or_else(|| WranglerError::InvalidFrequency(h.to_owned()))
            })
            .transpose()?;

        GroupingSpec::new(hour, frequency.parse()?, method.parse()?)
    }
}

impl fmt::Display for GroupingSpec {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if let Some(h) = self.hour {
            write!(f, "{}hour_", h)?;
        }
        write!(f, "{}_{}", self.frequency, self.aggregation)
    }
}

/// Data with a time axis that can be filtered by hour and resampled.
pub trait Resample: Sized {
    /// Apply a grouping directive.
    fn group(&self, spec: &GroupingSpec) -> Result<Self>;
}

impl Resample for ObservationSeries {
    fn group(&self, spec: &GroupingSpec) -> Result<Self> {
        let filtered = self.filter_index(|t| spec.keeps(t));
        let bins = resample_bins(filtered.index(), spec.frequency)?;

        let index = bins.iter().map(|(start, _)| *start).collect();
        let mut grouped = ObservationSeries::with_index(index)?;

        let names: Vec<String> = filtered.column_names().map(str::to_owned).collect();
        for name in names {
            let col = filtered.require(&name)?;
            let values = bins
                .iter()
                .map(|(_, rows)| {
                    spec.aggregation
                        .apply(col[rows.clone()].iter().filter_map(|v| v.into_option()))
                })
                .collect();
            grouped.insert_column(name, values)?;
        }

        Ok(grouped)
    }
}
