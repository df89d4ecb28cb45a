#![warn(missing_docs)]
//! Functions and data types for wrangling climate data: station observations, gridded
//! reanalysis fields and the quantities derived from them.
//!
//! Station observations are loaded into an [`ObservationSeries`], either from one CSV file per
//! variable ([`open_observations`], [`Station::daily_data`]) or from wide month-per-row tables
//! ([`open_wide_observations`]). Gridded data is located on disk with [`grid_files`] and decoded
//! by a [`GridReader`] into a [`GriddedDataset`] through [`open_data`].
//!
//! Both kinds of data can be resampled in time with a [`GroupingSpec`] directive such as
//! `"12hour_1D_mean"` via the [`Resample`] trait. Gridded data can be cropped to a [`Domain`] or
//! searched for the gridpoint nearest a station.
//!
//! ```rust
//! use climate_wrangler::{GroupingSpec, Frequency, Aggregation};
//!
//! let spec: GroupingSpec = "12hour_1D_mean".parse().unwrap();
//! assert_eq!(spec.hour, Some(12));
//! assert_eq!(spec.frequency, Frequency::Days(1));
//! assert_eq!(spec.aggregation, Aggregation::Mean);
//! ```

//
// API
//
pub use crate::{
    config::{open_yaml, open_yaml_as},
    error::{Result, WranglerError},
    grid::{
        crop_domain, grid_files, nearest_gridpoint, open_data, separate_concatenated_components,
        Dim, Domain, GridReader, GriddedDataset, OpenOptions, Selection,
    },
    grouping::{Aggregation, Frequency, GroupingSpec, Resample},
    keys::Variable,
    observations::{open_observations, read_observation_csv},
    series::{common_index, ObservationSeries},
    station::Station,
    utility::{load_object, save_object, timed},
    wide_format::{open_wide_observations, MeanFormula, WideFormatOptions},
    window::{validation_window, WindowType},
};

pub mod derived;

//
// Internal use only
//

// Modules
mod config;
mod error;
mod grid;
mod grouping;
mod keys;
mod observations;
mod series;
mod station;
mod utility;
mod wide_format;
mod window;

#[cfg(test)]
mod test_data;
