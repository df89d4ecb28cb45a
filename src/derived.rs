//! Quantities derived from observed variables.
//!
//! Each quantity has a pure function on plain values, a function returning a new
//! [`ObservationSeries`](crate::ObservationSeries) with the derived column added, and an
//! `_in_place` variant modifying the caller's series.
pub use self::humidity::{
    humidity_precipitation_threshold, relative_humidity, relative_humidity_in_place,
    with_relative_humidity, HumidityDistribution, DEFAULT_MIN_PRECIPITATION,
};
pub use self::radiance::{
    clear_low_radiance, clear_low_radiance_in_place, DEFAULT_RADIANCE_THRESHOLD, RADIANCE_COLUMN,
};
pub use self::wind::{wind_components, wind_components_in_place, with_wind_components};

mod humidity;
mod radiance;
mod wind;
