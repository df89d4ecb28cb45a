//! Gridded datasets on regular latitude/longitude grids.
//!
//! A [`GriddedDataset`] holds named variables sharing the same dimensions, always stored in the
//! order time, ensemble member, latitude, longitude. Time and member are optional, latitude and
//! longitude are always present. Latitudes may run north to south or south to north.

use crate::{
    error::{Result, WranglerError},
    grouping::{resample_bins, GroupingSpec, Resample},
};
use chrono::NaiveDateTime;
use ndarray::{Array1, ArrayD, Axis, IxDyn, Slice};
use std::collections::BTreeMap;
use strum_macros::{AsRefStr, Display};

mod components;
mod domain;
mod files;

pub use components::separate_concatenated_components;
pub use domain::{crop_domain, nearest_gridpoint, Domain, Selection};
pub use files::{grid_files, open_data, GridReader, OpenOptions};

/// A dimension of a gridded variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum Dim {
    /// Valid time
    Time,
    /// Ensemble member number
    Number,
    /// Latitude in degrees
    Latitude,
    /// Longitude in degrees
    Longitude,
}

/// Named variables on a shared grid.
#[derive(Clone, Debug, PartialEq)]
pub struct GriddedDataset {
    dims: Vec<Dim>,
    time: Vec<NaiveDateTime>,
    number: Vec<i64>,
    latitude: Array1<f64>,
    longitude: Array1<f64>,
    variables: BTreeMap<String, ArrayD<f32>>,
    // Coordinates that are not dimensions, e.g. forecast step or level.
    aux_coords: BTreeMap<String, ArrayD<f64>>,
}

impl GriddedDataset {
    /// Create a dataset with only the spatial dimensions and no variables.
    pub fn new(latitude: Vec<f64>, longitude: Vec<f64>) -> Self {
        GriddedDataset {
            dims: vec![Dim::Latitude, Dim::Longitude],
            time: vec![],
            number: vec![],
            latitude: Array1::from(latitude),
            longitude: Array1::from(longitude),
            variables: BTreeMap::new(),
            aux_coords: BTreeMap::new(),
        }
    }

    /// Builder method adding a time dimension. Must be called before adding variables.
    ///
    /// The times must be sorted.
    pub fn with_time(mut self, time: Vec<NaiveDateTime>) -> Result<Self> {
        self.check_no_variables("time")?;
        if time.windows(2).any(|w| w[0] >= w[1]) {
            return Err(WranglerError::ShapeMismatch(
                "time coordinate is not strictly increasing".to_owned(),
            ));
        }

        self.time = time;
        if !self.dims.contains(&Dim::Time) {
            self.dims.insert(0, Dim::Time);
        }
        Ok(self)
    }

    /// Builder method adding an ensemble member dimension. Must be called before adding
    /// variables.
    pub fn with_members(mut self, number: Vec<i64>) -> Result<Self> {
        self.check_no_variables("number")?;

        self.number = number;
        if !self.dims.contains(&Dim::Number) {
            let pos = if self.dims[0] == Dim::Time { 1 } else { 0 };
            self.dims.insert(pos, Dim::Number);
        }
        Ok(self)
    }

    fn check_no_variables(&self, dim: &str) -> Result<()> {
        if self.variables.is_empty() {
            Ok(())
        } else {
            Err(WranglerError::ShapeMismatch(format!(
                "cannot add dimension {} to a dataset with variables",
                dim
            )))
        }
    }

    /// Builder method adding a variable. Its shape must match the dataset dimensions.
    pub fn with_variable<S: Into<String>>(mut self, name: S, data: ArrayD<f32>) -> Result<Self> {
        self.insert_variable(name, data)?;
        Ok(self)
    }

    /// Add or replace a variable. Its shape must match the dataset dimensions.
    pub fn insert_variable<S: Into<String>>(&mut self, name: S, data: ArrayD<f32>) -> Result<()> {
        let name = name.into();
        let expected = self.shape();
        if data.shape() != expected.as_slice() {
            return Err(WranglerError::ShapeMismatch(format!(
                "variable {} has shape {:?}, expected {:?}",
                name,
                data.shape(),
                expected
            )));
        }

        self.variables.insert(name, data);
        Ok(())
    }

    /// Builder method attaching a coordinate that is not a dimension.
    pub fn with_aux_coord<S: Into<String>>(mut self, name: S, values: ArrayD<f64>) -> Self {
        self.aux_coords.insert(name.into(), values);
        self
    }

    /// The dimensions in storage order.
    #[inline]
    pub fn dims(&self) -> &[Dim] {
        &self.dims
    }

    /// Length of each dimension, in storage order.
    pub fn shape(&self) -> Vec<usize> {
        self.dims.iter().map(|&d| self.dim_len(d)).collect()
    }

    fn dim_len(&self, dim: Dim) -> usize {
        match dim {
            Dim::Time => self.time.len(),
            Dim::Number => self.number.len(),
            Dim::Latitude => self.latitude.len(),
            Dim::Longitude => self.longitude.len(),
        }
    }

    /// The axis holding a dimension, if the dataset has it.
    #[inline]
    pub fn axis(&self, dim: Dim) -> Option<Axis> {
        self.dims.iter().position(|&d| d == dim).map(Axis)
    }

    fn spatial_axes(&self) -> (Axis, Axis) {
        // Latitude and longitude are always the last two dimensions.
        let n = self.dims.len();
        (Axis(n - 2), Axis(n - 1))
    }

    /// Latitude coordinate.
    #[inline]
    pub fn latitude(&self) -> &Array1<f64> {
        &self.latitude
    }

    /// Longitude coordinate.
    #[inline]
    pub fn longitude(&self) -> &Array1<f64> {
        &self.longitude
    }

    /// Time coordinate, empty if there is no time dimension.
    #[inline]
    pub fn time(&self) -> &[NaiveDateTime] {
        &self.time
    }

    /// Ensemble member numbers, empty if there is no member dimension.
    #[inline]
    pub fn members(&self) -> &[i64] {
        &self.number
    }

    /// Get a variable by name.
    #[inline]
    pub fn variable(&self, name: &str) -> Option<&ArrayD<f32>> {
        self.variables.get(name)
    }

    /// Names of the variables in sorted order.
    pub fn variable_names(&self) -> impl Iterator<Item = &str> {
        self.variables.keys().map(|k| k.as_str())
    }

    /// Names of the auxiliary coordinates in sorted order.
    pub fn aux_coord_names(&self) -> impl Iterator<Item = &str> {
        self.aux_coords.keys().map(|k| k.as_str())
    }

    /// Delete single valued auxiliary coordinates and squeeze a length 1 member dimension,
    /// which otherwise get in the way of merging datasets.
    ///
    /// The time dimension is kept whatever its length, since it is the axis grouping resamples.
    /// Latitude and longitude are never squeezed.
    pub fn clean_coordinates(mut self) -> Self {
        self.aux_coords.retain(|_, v| v.len() != 1);

        if let Some(axis) = self.axis(Dim::Number) {
            if self.number.len() == 1 {
                for data in self.variables.values_mut() {
                    *data = data.index_axis(axis, 0).to_owned();
                }
                self.dims.remove(axis.index());
                self.number.clear();
            }
        }

        self
    }

    /// Keep a single ensemble member, removing the member dimension.
    pub fn select_member(mut self, number: i64) -> Result<Self> {
        let axis = self
            .axis(Dim::Number)
            .ok_or(WranglerError::MemberNotFound(number))?;
        let pos = self
            .number
            .iter()
            .position(|&n| n == number)
            .ok_or(WranglerError::MemberNotFound(number))?;

        for data in self.variables.values_mut() {
            *data = data.index_axis(axis, pos).to_owned();
        }
        self.dims.remove(axis.index());
        self.number.clear();

        Ok(self)
    }

    /// Keep the inclusive index ranges of latitude and longitude.
    pub(crate) fn slice_spatial(
        &self,
        lat: (usize, usize),
        lon: (usize, usize),
    ) -> GriddedDataset {
        let (lat_axis, lon_axis) = self.spatial_axes();
        let lat_slice = Slice::from(lat.0..lat.1 + 1);
        let lon_slice = Slice::from(lon.0..lon.1 + 1);

        let variables = self
            .variables
            .iter()
            .map(|(name, data)| {
                let view = data
                    .slice_axis(lat_axis, lat_slice)
                    .slice_axis(lon_axis, lon_slice)
                    .to_owned();
                (name.clone(), view)
            })
            .collect();

        GriddedDataset {
            dims: self.dims.clone(),
            time: self.time.clone(),
            number: self.number.clone(),
            latitude: self.latitude.slice_axis(Axis(0), lat_slice).to_owned(),
            longitude: self.longitude.slice_axis(Axis(0), lon_slice).to_owned(),
            variables,
            aux_coords: self.aux_coords.clone(),
        }
    }

    /// Crop to a domain. See [`crop_domain`].
    #[inline]
    pub fn crop(&self, domain: &Domain) -> Result<GriddedDataset> {
        crop_domain(self, domain)
    }

    /// Combine the variables of several datasets defined on the same coordinates.
    pub fn merge(datasets: Vec<GriddedDataset>) -> Result<GriddedDataset> {
        let mut iter = datasets.into_iter();
        let mut merged = match iter.next() {
            Some(first) => first,
            None => return Err(WranglerError::NotEnoughData),
        };

        for ds in iter {
            if ds.dims != merged.dims
                || ds.time != merged.time
                || ds.number != merged.number
                || ds.latitude != merged.latitude
                || ds.longitude != merged.longitude
            {
                return Err(WranglerError::ShapeMismatch(
                    "datasets do not share coordinates".to_owned(),
                ));
            }

            for (name, data) in ds.variables {
                if merged.variables.contains_key(&name) {
                    return Err(WranglerError::ShapeMismatch(format!(
                        "variable {} present in more than one dataset",
                        name
                    )));
                }
                merged.variables.insert(name, data);
            }
            merged.aux_coords.extend(ds.aux_coords);
        }

        Ok(merged)
    }
}

impl Resample for GriddedDataset {
    fn group(&self, spec: &GroupingSpec) -> Result<Self> {
        let time_axis = self.axis(Dim::Time).ok_or_else(|| {
            WranglerError::ShapeMismatch("dataset has no time dimension".to_owned())
        })?;
        debug_assert_eq!(time_axis.index(), 0);

        let kept: Vec<usize> = self
            .time
            .iter()
            .enumerate()
            .filter(|(_, t)| spec.keeps(t))
            .map(|(i, _)| i)
            .collect();
        let kept_times: Vec<NaiveDateTime> = kept.iter().map(|&i| self.time[i]).collect();
        let bins = resample_bins(&kept_times, spec.frequency)?;

        let mut grouped = GriddedDataset {
            dims: self.dims.clone(),
            time: bins.iter().map(|(start, _)| *start).collect(),
            number: self.number.clone(),
            latitude: self.latitude.clone(),
            longitude: self.longitude.clone(),
            variables: BTreeMap::new(),
            aux_coords: self.aux_coords.clone(),
        };

        for (name, data) in &self.variables {
            let n_time = data.shape()[0];
            let rest: usize = data.shape()[1..].iter().product();
            let standard = data.as_standard_layout();
            let table = standard.view().into_shape((n_time, rest))?;

            let mut values = Vec::with_capacity(bins.len() * rest);
            for (_, range) in &bins {
                for j in 0..rest {
                    let bin_values = kept[range.clone()]
                        .iter()
                        .map(|&i| f64::from(table[[i, j]]));
                    let agg = spec.aggregation.apply(bin_values);
                    values.push(agg.into_option().map_or(f32::NAN, |v| v as f32));
                }
            }

            let mut shape = data.shape().to_vec();
            shape[0] = bins.len();
            grouped
                .variables
                .insert(name.clone(), ArrayD::from_shape_vec(IxDyn(&shape), values)?);
        }

        Ok(grouped)
    }
}
