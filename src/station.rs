//! Observation stations: their metadata and their data directory.
use crate::{
    error::{Result, WranglerError},
    grid::nearest_gridpoint,
    grouping::{Aggregation, Frequency, GroupingSpec, Resample},
    keys::Variable,
    observations::open_observations,
    series::ObservationSeries,
};
use csv::Reader;
use metfor::Meters;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the metadata file in a station directory.
pub const META_FILE: &str = "meta.csv";

/// One row of a station metadata table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct StationRecord {
    code: String,
    name: String,
    longitude: f64,
    latitude: f64,
    altitude: f64,
}

/// A station and the directory holding its observation files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Station {
    code: String,
    name: String,
    longitude: f64,
    latitude: f64,
    altitude: f64,
    path: PathBuf,
}

impl Station {
    fn from_record(record: StationRecord, path: PathBuf) -> Self {
        let StationRecord {
            code,
            name,
            longitude,
            latitude,
            altitude,
        } = record;

        Station {
            code,
            name,
            longitude,
            latitude,
            altitude,
            path,
        }
    }

    /// Load a station from the `meta.csv` file in its directory. Only the first row is used.
    pub fn from_meta_file<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref();
        let meta = dir.join(META_FILE);

        let record = Reader::from_path(&meta)?
            .deserialize::<StationRecord>()
            .next()
            .ok_or_else(|| WranglerError::EmptyData(meta.clone()))??;

        Ok(Station::from_record(record, dir.to_path_buf()))
    }

    /// Look up a station by code in a network table with the same columns as `meta.csv`.
    ///
    /// The returned station reads its observations from `data_dir`.
    pub fn from_network<P, Q>(stations_csv: P, code: &str, data_dir: Q) -> Result<Self>
    where
        P: AsRef<Path>,
        Q: AsRef<Path>,
    {
        let mut reader = Reader::from_path(stations_csv.as_ref())?;

        for record in reader.deserialize() {
            let record: StationRecord = record?;
            if record.code.trim() == code {
                return Ok(Station::from_record(record, data_dir.as_ref().to_path_buf()));
            }
        }

        Err(WranglerError::StationNotFound(code.to_owned()))
    }

    /// Station code.
    #[inline]
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Full name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Longitude in degrees.
    #[inline]
    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Latitude in degrees.
    #[inline]
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Altitude above sea level in meters.
    #[inline]
    pub fn altitude(&self) -> f64 {
        self.altitude
    }

    /// Altitude as a typed length.
    #[inline]
    pub fn elevation(&self) -> Meters {
        Meters(self.altitude)
    }

    /// Directory holding the observation files.
    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Daily values of one variable: precipitation is summed over each day, anything else
    /// averaged.
    pub fn daily_data(&self, variable: Variable) -> Result<ObservationSeries> {
        let aggregation = match variable {
            Variable::PCNR => Aggregation::Sum,
            _ => Aggregation::Mean,
        };
        let spec = GroupingSpec::new(None, Frequency::DAILY, aggregation)?;

        open_observations(&self.path, &[variable])?.group(&spec)
    }

    /// The grid coordinates `(latitude, longitude)` nearest the station.
    pub fn gridpoint(&self, latitudes: &[f64], longitudes: &[f64]) -> Result<(f64, f64)> {
        let (ilat, ilon) = nearest_gridpoint(latitudes, longitudes, self.latitude, self.longitude)?;
        Ok((latitudes[ilat], longitudes[ilon]))
    }
}
