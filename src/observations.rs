//! Discovery and loading of per-variable station observation files.
//!
//! A station directory holds one CSV file per variable, recognized by the variable acronym in
//! its file name. The first column of each file is the timestamp and the second the value.
use crate::{
    error::{Result, WranglerError},
    keys::Variable,
    series::ObservationSeries,
};
use chrono::{NaiveDate, NaiveDateTime};
use csv::ReaderBuilder;
use log::{debug, warn};
use std::{
    fs,
    path::{Path, PathBuf},
};

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%Y%m%d"];

/// Parse a timestamp in one of the usual ISO-like layouts. A bare date means midnight.
pub fn parse_datetime(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();

    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// Files directly inside `dir` whose name contains `pattern`, sorted by name.
pub fn matching_files<P: AsRef<Path>>(dir: P, pattern: &str) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir.as_ref())? {
        let path = entry?.path();
        let matches = path
            .file_name()
            .and_then(|n| n.to_str())
            .map_or(false, |n| n.contains(pattern));
        if matches && path.is_file() {
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}

/// The single file in `dir` whose name contains `pattern`.
///
/// No match and several matches are both errors, so the choice never depends on the order of
/// the directory listing.
pub fn unique_matching_file<P: AsRef<Path>>(dir: P, pattern: &str) -> Result<PathBuf> {
    let dir = dir.as_ref();
    let mut files = matching_files(dir, pattern)?;

    match files.len() {
        0 => Err(WranglerError::NoMatchingFiles {
            dir: dir.to_path_buf(),
            variable: pattern.to_owned(),
        }),
        1 => Ok(files.remove(0)),
        _ => Err(WranglerError::AmbiguousFiles {
            variable: pattern.to_owned(),
            files,
        }),
    }
}

/// Read one observation CSV into a single column series named `name`.
///
/// Rows with an unreadable timestamp are skipped, unreadable values are missing.
pub fn read_observation_csv<P: AsRef<Path>>(path: P, name: &str) -> Result<ObservationSeries> {
    let path = path.as_ref();
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;

    let mut pairs = Vec::new();
    for record in reader.records() {
        let record = record?;
        let time = match record.get(0).and_then(parse_datetime) {
            Some(t) => t,
            None => {
                debug!("skipping row {:?} of {}", record, path.display());
                continue;
            }
        };
        let value = record
            .get(1)
            .and_then(|v| v.trim().parse::<f64>().ok())
            .unwrap_or(f64::NAN);

        pairs.push((time, value));
    }

    Ok(ObservationSeries::from_pairs(name, pairs))
}

/// Load and merge the observation files of several variables found in one directory.
///
/// Variables without a file are skipped. If nothing at all could be loaded the result is an
/// [`EmptyData`](WranglerError::EmptyData) error.
pub fn open_observations<P: AsRef<Path>>(
    dir: P,
    variables: &[Variable],
) -> Result<ObservationSeries> {
    let dir = dir.as_ref();
    let mut data: Option<ObservationSeries> = None;

    for variable in variables {
        let path = match unique_matching_file(dir, variable.acronym()) {
            Ok(path) => path,
            Err(WranglerError::NoMatchingFiles { .. }) => {
                debug!("no {} file in {}", variable, dir.display());
                continue;
            }
            Err(err) => return Err(err),
        };

        let series = read_observation_csv(&path, variable.acronym())?;
        data = Some(match data {
            Some(acc) => acc.merge(&series)?,
            None => series,
        });
    }

    match data {
        Some(data) if !data.is_empty() => Ok(data),
        _ => {
            warn!("Empty data. Files may not exist in {}", dir.display());
            Err(WranglerError::EmptyData(dir.to_path_buf()))
        }
    }
}
