//! Error types for the climate-wrangler crate.
use std::path::PathBuf;

/// Error type for the crate.
#[derive(Debug, thiserror::Error)]
pub enum WranglerError {
    /// An acronym that has no known meaning for the requested operation.
    #[error("unknown variable acronym: {0}")]
    UnknownVariable(String),
    /// A grouping directive with the wrong number of tokens.
    #[error("grouping directive `{0}` must have between 2 and 3 elements separated by _")]
    InvalidGrouping(String),
    /// A grouping directive naming an aggregation that does not exist.
    #[error("grouping method ({0}) does not exist")]
    InvalidAggregation(String),
    /// A resampling frequency or hour filter that could not be parsed.
    #[error("invalid resampling frequency: {0}")]
    InvalidFrequency(String),
    /// A validation window type that does not exist.
    #[error("{0} window does not exist")]
    InvalidWindowType(String),
    /// A derived quantity was requested from a series lacking its inputs.
    #[error("must have {}", .0.join(", "))]
    MissingColumns(Vec<String>),
    /// The configuration file does not exist.
    #[error("the configuration file {} does not exist", .0.display())]
    MissingConfig(PathBuf),

    /// No file in the directory matched the requested variable.
    #[error("no file for {variable} in {}", dir.display())]
    NoMatchingFiles {
        /// Directory searched.
        dir: PathBuf,
        /// The file name substring that was looked for.
        variable: String,
    },
    /// More than one file in the directory matched the requested variable.
    #[error("{} files match {variable}: {files:?}", files.len())]
    AmbiguousFiles {
        /// The file name substring that was looked for.
        variable: String,
        /// Every matching file, sorted by name.
        files: Vec<PathBuf>,
    },
    /// Nothing could be loaded.
    #[error("empty data, files may not exist in {}", .0.display())]
    EmptyData(PathBuf),
    /// A coordinate array with no values.
    #[error("coordinate `{0}` is empty")]
    EmptyCoordinates(&'static str),
    /// No row of a station network table has the requested code.
    #[error("station {0} not found")]
    StationNotFound(String),
    /// Not enough valid data left for the analysis.
    #[error("not enough data available for analysis")]
    NotEnoughData,
    /// The requested ensemble member is not in the dataset.
    #[error("ensemble member {0} not found")]
    MemberNotFound(i64),
    /// A named variable is not in the dataset.
    #[error("variable `{0}` not found")]
    MissingVariable(String),
    /// Array shapes or coordinates do not line up.
    #[error("shape mismatch: {0}")]
    ShapeMismatch(String),
    /// A value in an input file could not be interpreted.
    #[error("parse error: {0}")]
    Parse(String),

    /// Forward an I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Forward an error from the csv crate.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    /// Forward an error from the serde_yaml crate.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    /// Forward an error from the serde_json crate.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    /// Forward an error from ndarray.
    #[error("array error: {0}")]
    Shape(#[from] ndarray::ShapeError),
}

/// Shorthand for results.
pub type Result<T> = ::std::result::Result<T, WranglerError>;

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn missing_columns_lists_every_name() {
        let e = WranglerError::MissingColumns(vec!["WSPD".to_owned(), "WDIR".to_owned()]);
        assert_eq!(e.to_string(), "must have WSPD, WDIR");
    }

    #[test]
    fn aggregation_message() {
        let e = WranglerError::InvalidAggregation("median".to_owned());
        assert_eq!(e.to_string(), "grouping method (median) does not exist");
    }

    #[test]
    fn error_is_std_error() {
        fn assert_impl<T: std::error::Error + Send + Sync>() {}
        assert_impl::<WranglerError>();
    }
}
