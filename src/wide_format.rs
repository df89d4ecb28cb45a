//! Parser for wide observation tables with one row per month (or day) and one column per day
//! (or hour).
//!
//! Rows are identified by the `AÑO` and `MES` columns, plus `DIA` for hourly tables. Every other
//! column named like `TMAX01` or `HU07` holds the value of one variable on one day (or hour) of
//! that row. Files are `;` delimited and may be Latin-1 encoded.
use crate::{
    error::{Result, WranglerError},
    keys::Variable,
    observations::unique_matching_file,
    series::ObservationSeries,
    utility::optioned,
};
use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, Timelike};
use csv::{ReaderBuilder, StringRecord};
use itertools::izip;
use log::debug;
use optional::{none, Optioned};
use regex::Regex;
use std::{
    collections::{BTreeMap, BTreeSet, HashMap},
    convert::TryFrom,
    fs,
    path::Path,
};

const YEAR_COLUMN: &str = "AÑO";
const MONTH_COLUMN: &str = "MES";
const DAY_COLUMN: &str = "DIA";
const VALUE_COLUMN_PATTERN: &str = r"([A-Z]{1,4})(\d{1,2})";
const EXCLUDED_PREFIX: &str = "MET";

/// The substring identifying the wide file of a variable.
pub fn file_substring(variable: Variable) -> Result<&'static str> {
    match variable {
        Variable::PCNR => Ok("Precipitacion"),
        Variable::TMPA => Ok("Temperaturas"),
        Variable::WSPD => Ok("viento"),
        Variable::RHMA => Ok("Humedad"),
        other => Err(WranglerError::UnknownVariable(other.acronym().to_owned())),
    }
}

/// How the daily mean temperature is derived from the extremes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeanFormula {
    /// `(max + min) / 2`
    Midpoint,
    /// `(max - min) / 2`, the half range. Only useful to reproduce older outputs.
    HalfRange,
}

impl Default for MeanFormula {
    fn default() -> Self {
        MeanFormula::Midpoint
    }
}

impl MeanFormula {
    /// Combine a maximum and a minimum.
    #[inline]
    pub fn apply(self, max: f64, min: f64) -> f64 {
        match self {
            MeanFormula::Midpoint => (max + min) / 2.0,
            MeanFormula::HalfRange => (max - min) / 2.0,
        }
    }
}

/// Options for [`open_wide_observations`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WideFormatOptions {
    mean_formula: MeanFormula,
}

impl WideFormatOptions {
    /// Default options.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to set the formula for `TMEAN`.
    pub fn with_mean_formula(self, mean_formula: MeanFormula) -> Self {
        WideFormatOptions { mean_formula }
    }

    /// The formula used for `TMEAN`.
    #[inline]
    pub fn mean_formula(&self) -> MeanFormula {
        self.mean_formula
    }
}

/// Open the wide file of one variable found in `dir` as a long time series.
///
/// Temperatures and precipitation are stored in tenths and are scaled to whole units. When both
/// `TMAX` and `TMIN` are present a `TMEAN` column is added. Precipitation `P` is renamed `PCNR`
/// and humidity `HU` is renamed `RHMA`. Cells that cannot be found or read are missing values.
pub fn open_wide_observations<P: AsRef<Path>>(
    dir: P,
    variable: Variable,
    options: &WideFormatOptions,
) -> Result<ObservationSeries> {
    let path = unique_matching_file(dir, file_substring(variable)?)?;
    let text = decode(&fs::read(&path)?);

    let layout = if variable == Variable::RHMA {
        Layout::Hourly
    } else {
        Layout::Daily
    };

    let mut series = WideTable::parse(&text, layout)?.into_series()?;
    apply_corrections(&mut series, options.mean_formula)?;

    Ok(series)
}

/// Decode text that is UTF-8 when possible and Latin-1 otherwise.
fn decode(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_owned(),
        Err(_) => bytes.iter().map(|&b| char::from(b)).collect(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Layout {
    /// One row per month, columns are days.
    Daily,
    /// One row per day, columns are hours.
    Hourly,
}

// (year, month, day); day is 0 in daily tables.
type RowKey = (i32, u32, u32);

struct WideTable {
    layout: Layout,
    records: Vec<StringRecord>,
    rows: HashMap<RowKey, usize>,
    first: Option<RowKey>,
    last: Option<RowKey>,
    // prefix -> encoded day or hour -> column position
    columns: BTreeMap<String, BTreeMap<u32, usize>>,
}

impl WideTable {
    fn parse(text: &str, layout: Layout) -> Result<Self> {
        let mut reader = ReaderBuilder::new()
            .delimiter(b';')
            .flexible(true)
            .from_reader(text.as_bytes());

        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim().trim_start_matches('\u{feff}').to_owned())
            .collect();

        let position = |name: &str| {
            headers
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| WranglerError::MissingColumns(vec![name.to_owned()]))
        };
        let year_col = position(YEAR_COLUMN)?;
        let month_col = position(MONTH_COLUMN)?;
        let day_col = match layout {
            Layout::Daily => None,
            Layout::Hourly => Some(position(DAY_COLUMN)?),
        };

        let re = Regex::new(VALUE_COLUMN_PATTERN).map_err(|e| WranglerError::Parse(e.to_string()))?;
        let mut columns: BTreeMap<String, BTreeMap<u32, usize>> = BTreeMap::new();
        for (pos, header) in headers.iter().enumerate() {
            let caps = match re.captures(header) {
                Some(caps) => caps,
                None => continue,
            };
            if &caps[1] == EXCLUDED_PREFIX {
                continue;
            }
            let idx: u32 = caps[2]
                .parse()
                .map_err(|_| WranglerError::Parse(format!("column {}", header)))?;

            columns
                .entry(caps[1].to_owned())
                .or_default()
                .entry(idx)
                .or_insert(pos);
        }

        let mut records = Vec::new();
        let mut rows = HashMap::new();
        let (mut first, mut last) = (None, None);
        for record in reader.records() {
            let record = record?;
            let key = match row_key(&record, year_col, month_col, day_col) {
                Some(key) => key,
                None => {
                    debug!("skipping row without a valid date: {:?}", record);
                    continue;
                }
            };

            first.get_or_insert(key);
            last = Some(key);
            rows.entry(key).or_insert(records.len());
            records.push(record);
        }

        Ok(WideTable {
            layout,
            records,
            rows,
            first,
            last,
            columns,
        })
    }

    fn dates(&self) -> Vec<NaiveDateTime> {
        let (first, last) = match (self.first, self.last) {
            (Some(first), Some(last)) => (first, last),
            _ => return vec![],
        };
        let encoded: BTreeSet<u32> = self
            .columns
            .values()
            .flat_map(|by_idx| by_idx.keys().cloned())
            .collect();

        match self.layout {
            Layout::Daily => {
                let max_day = encoded.iter().next_back().cloned().unwrap_or(0).min(31);
                let mut dates = Vec::new();
                let (mut year, mut month) = (first.0, first.1);
                while (year, month) <= (last.0, last.1) {
                    dates.extend(
                        (1..=max_day)
                            .filter_map(|d| NaiveDate::from_ymd_opt(year, month, d))
                            .filter_map(|d| d.and_hms_opt(0, 0, 0)),
                    );

                    month += 1;
                    if month > 12 {
                        month = 1;
                        year += 1;
                    }
                }
                dates
            }
            Layout::Hourly => {
                let start = NaiveDate::from_ymd_opt(first.0, first.1, first.2);
                let end = NaiveDate::from_ymd_opt(last.0, last.1, last.2);
                let (mut date, end) = match (start, end) {
                    (Some(start), Some(end)) => (start, end),
                    _ => return vec![],
                };

                let mut dates = Vec::new();
                while date <= end {
                    dates.extend(encoded.iter().filter_map(|&h| date.and_hms_opt(h, 0, 0)));
                    date += Duration::days(1);
                }
                dates
            }
        }
    }

    fn value(&self, prefix: &str, time: &NaiveDateTime) -> Optioned<f64> {
        let (key, idx) = match self.layout {
            Layout::Daily => ((time.year(), time.month(), 0), time.day()),
            Layout::Hourly => ((time.year(), time.month(), time.day()), time.hour()),
        };

        let cell = self
            .rows
            .get(&key)
            .and_then(|&row| {
                let pos = self.columns.get(prefix)?.get(&idx)?;
                self.records[row].get(*pos)
            })
            .map(str::trim)
            .filter(|cell| !cell.is_empty());

        match cell.and_then(|cell| cell.replace(',', ".").parse::<f64>().ok()) {
            Some(v) => optioned(v),
            None => {
                debug!("no value for {} at {}", prefix, time);
                none()
            }
        }
    }

    fn into_series(self) -> Result<ObservationSeries> {
        let dates = self.dates();
        let mut series = ObservationSeries::with_index(dates.clone())?;

        for prefix in self.columns.keys() {
            let values = dates.iter().map(|t| self.value(prefix, t)).collect();
            series.insert_column(prefix.as_str(), values)?;
        }

        Ok(series)
    }
}

fn row_key(
    record: &StringRecord,
    year_col: usize,
    month_col: usize,
    day_col: Option<usize>,
) -> Option<RowKey> {
    let field = |i: usize| record.get(i).and_then(|v| v.trim().parse::<i64>().ok());

    let year = i32::try_from(field(year_col)?).ok()?;
    let month = u32::try_from(field(month_col)?)
        .ok()
        .filter(|m| (1..=12).contains(m))?;
    let day = match day_col {
        Some(col) => u32::try_from(field(col)?)
            .ok()
            .filter(|d| (1..=31).contains(d))?,
        None => 0,
    };

    Some((year, month, day))
}

fn apply_corrections(series: &mut ObservationSeries, formula: MeanFormula) -> Result<()> {
    let has_extremes = series.column("TMAX").is_some() && series.column("TMIN").is_some();
    let has_precip = series.column("P").is_some();

    if has_extremes {
        let mean: Vec<Optioned<f64>> = izip!(series.require("TMAX")?, series.require("TMIN")?)
            .map(|(max, min)| match (max.into_option(), min.into_option()) {
                (Some(max), Some(min)) => optioned(formula.apply(max, min)),
                _ => none(),
            })
            .collect();
        series.insert_column("TMEAN", mean)?;
    }

    if has_extremes || has_precip {
        series.map_values(|v| v / 10.0);
    }

    series.rename_column("P", Variable::PCNR.acronym());
    series.rename_column("HU", Variable::RHMA.acronym());

    Ok(())
}
