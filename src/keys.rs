//! Canonical acronyms for the meteorological variables handled by this crate.
use crate::error::{Result, WranglerError};
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

/// A meteorological variable identified by its four letter acronym.
///
/// The acronym is also the column name used for the variable in an
/// [`ObservationSeries`](crate::ObservationSeries).
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    EnumIter,
    EnumString,
    Display,
    AsRefStr,
)]
pub enum Variable {
    /// Air temperature
    TMPA,
    /// Dew point temperature
    TDEW,
    /// Precipitation
    PCNR,
    /// Relative humidity
    RHMA,
    /// Wind speed
    WSPD,
    /// Wind direction, degrees clockwise from north
    WDIR,
}

impl Variable {
    /// Parse an acronym such as `"TMPA"`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use climate_wrangler::Variable;
    ///
    /// assert_eq!(Variable::from_acronym("PCNR").unwrap(), Variable::PCNR);
    /// assert!(Variable::from_acronym("XXXX").is_err());
    /// ```
    pub fn from_acronym(acronym: &str) -> Result<Self> {
        acronym
            .parse()
            .map_err(|_| WranglerError::UnknownVariable(acronym.to_owned()))
    }

    /// Parse a long descriptive name such as `"wind_speed"`.
    pub fn from_long_name(name: &str) -> Result<Self> {
        use strum::IntoEnumIterator;

        Variable::iter()
            .find(|v| v.long_name() == name)
            .ok_or_else(|| WranglerError::UnknownVariable(name.to_owned()))
    }

    /// The acronym as a string slice.
    #[inline]
    pub fn acronym(self) -> &'static str {
        match self {
            Variable::TMPA => "TMPA",
            Variable::TDEW => "TDEW",
            Variable::PCNR => "PCNR",
            Variable::RHMA => "RHMA",
            Variable::WSPD => "WSPD",
            Variable::WDIR => "WDIR",
        }
    }

    /// Long descriptive name of the variable.
    pub fn long_name(self) -> &'static str {
        match self {
            Variable::TMPA => "temperature",
            Variable::TDEW => "dewpoint_temperature",
            Variable::PCNR => "precipitation",
            Variable::RHMA => "relative_humidity",
            Variable::WSPD => "wind_speed",
            Variable::WDIR => "wind_direction",
        }
    }

    /// Short name of the variable in ERA reanalysis files, if it is distributed there.
    pub fn era_name(self) -> Option<&'static str> {
        match self {
            Variable::TMPA => Some("t2m"),
            Variable::TDEW => Some("d2m"),
            Variable::PCNR => Some("tp"),
            Variable::RHMA => Some("r"),
            Variable::WSPD | Variable::WDIR => None,
        }
    }

    /// Level and parameter codes used to name the reanalysis files of this variable.
    ///
    /// Wind speed is stored as two files, one per component. Wind direction has no files.
    pub fn reanalysis_codes(self) -> &'static [&'static str] {
        match self {
            Variable::TMPA => &["SURF_167"],
            Variable::PCNR => &["SURF_228"],
            Variable::TDEW => &["SURF_168"],
            Variable::WSPD => &["SURF_165", "SURF_166"],
            Variable::RHMA => &["950_157"],
            Variable::WDIR => &[],
        }
    }
}
