//! Finding gridded files on disk and assembling them into one dataset.
//!
//! Files are laid out one per year and variable as `{root}/y_{year}/{year}_{variable}{extension}`.
//! Decoding the files themselves (GRIB, NetCDF, ...) is left to a [`GridReader`].
use super::{Domain, GriddedDataset};
use crate::{
    error::{Result, WranglerError},
    grouping::{GroupingSpec, Resample},
    utility::timed,
};
use log::warn;
use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

/// Decodes gridded files into a dataset.
pub trait GridReader {
    /// Read and concatenate in time all the files of one variable.
    fn read(&self, variable: &str, paths: &[PathBuf]) -> Result<GriddedDataset>;
}

impl<F> GridReader for F
where
    F: Fn(&str, &[PathBuf]) -> Result<GriddedDataset>,
{
    fn read(&self, variable: &str, paths: &[PathBuf]) -> Result<GriddedDataset> {
        self(variable, paths)
    }
}

/// Paths of the existing files for each variable and year.
///
/// Missing files are logged and skipped. Every requested variable has an entry, possibly empty.
pub fn grid_files<P, S>(
    root: P,
    variables: &[S],
    years: &[i32],
    extension: &str,
) -> BTreeMap<String, Vec<PathBuf>>
where
    P: AsRef<Path>,
    S: AsRef<str>,
{
    let root = root.as_ref();

    timed("grid_files", || {
        variables
            .iter()
            .map(|variable| {
                let variable = variable.as_ref();
                let paths = years
                    .iter()
                    .map(|year| {
                        root.join(format!("y_{}", year))
                            .join(format!("{}_{}{}", year, variable, extension))
                    })
                    .filter(|path| {
                        let exists = path.is_file();
                        if !exists {
                            warn!("{} does not exist", path.display());
                        }
                        exists
                    })
                    .collect();

                (variable.to_owned(), paths)
            })
            .collect()
    })
}

/// Options for [`open_data`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct OpenOptions {
    grouping: Option<GroupingSpec>,
    member: Option<i64>,
    domain: Option<Domain>,
}

impl OpenOptions {
    /// Default options: the noon value of each day, all members, whole grid.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to set the grouping directive.
    pub fn with_grouping(self, grouping: GroupingSpec) -> Self {
        OpenOptions {
            grouping: Some(grouping),
            ..self
        }
    }

    /// Builder method to keep only one ensemble member.
    pub fn with_member(self, member: i64) -> Self {
        OpenOptions {
            member: Some(member),
            ..self
        }
    }

    /// Builder method to crop the data to a domain.
    pub fn with_domain(self, domain: Domain) -> Self {
        OpenOptions {
            domain: Some(domain),
            ..self
        }
    }

    /// The grouping directive that will be applied.
    #[inline]
    pub fn grouping(&self) -> GroupingSpec {
        self.grouping.unwrap_or_default()
    }
}

/// Load the files of several variables and combine them in one dataset.
///
/// Each variable is read, reduced to the requested ensemble member, cleaned of scalar
/// coordinates, grouped and cropped before all variables are merged. Files that vanished since
/// they were listed are skipped with a warning, as are variables left without files.
pub fn open_data<R: GridReader>(
    reader: &R,
    files: &BTreeMap<String, Vec<PathBuf>>,
    options: &OpenOptions,
) -> Result<GriddedDataset> {
    timed("open_data", || {
        let grouping = options.grouping();
        let mut datasets = Vec::with_capacity(files.len());

        for (variable, paths) in files {
            let paths: Vec<PathBuf> = paths
                .iter()
                .filter(|path| {
                    let exists = path.is_file();
                    if !exists {
                        warn!("The file {} does not exist", path.display());
                    }
                    exists
                })
                .cloned()
                .collect();

            if paths.is_empty() {
                warn!("No files to open for {}", variable);
                continue;
            }

            let mut ds = reader.read(variable, &paths)?;
            if let Some(member) = options.member {
                ds = ds.select_member(member)?;
            }
            let mut ds = ds.clean_coordinates().group(&grouping)?;
            if let Some(domain) = options.domain {
                ds = ds.crop(&domain)?;
            }

            datasets.push(ds);
        }

        if datasets.is_empty() {
            let dir = files
                .values()
                .flatten()
                .next()
                .and_then(|p| p.parent())
                .map(Path::to_path_buf)
                .unwrap_or_default();
            return Err(WranglerError::EmptyData(dir));
        }

        GriddedDataset::merge(datasets)
    })
}
