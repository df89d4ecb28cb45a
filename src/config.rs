//! Reading YAML configuration files.
use crate::error::{Result, WranglerError};
use serde::de::DeserializeOwned;
use std::{fs::File, io::BufReader, path::Path};

/// Read a YAML file into a generic document.
pub fn open_yaml<P: AsRef<Path>>(path: P) -> Result<serde_yaml::Value> {
    open_yaml_as(path)
}

/// Read a YAML file into a typed configuration.
///
/// A missing file is a [`MissingConfig`](WranglerError::MissingConfig) error and malformed YAML
/// is a [`Yaml`](WranglerError::Yaml) error.
pub fn open_yaml_as<T, P>(path: P) -> Result<T>
where
    T: DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    if !path.exists() {
        return Err(WranglerError::MissingConfig(path.to_path_buf()));
    }

    let reader = BufReader::new(File::open(path)?);
    Ok(serde_yaml::from_reader(reader)?)
}
