//! Nearest gridpoint lookup and cropping of gridded data to a bounding box.
//!
//! These routines assume a regular rectilinear grid, so the nearest latitude and the nearest
//! longitude can be searched independently.
use super::GriddedDataset;
use crate::error::{Result, WranglerError};

/// Indexes `(ilat, ilon)` of the grid coordinates nearest a point.
///
/// Each axis is searched on its own and the first index with the minimum absolute difference
/// wins ties.
///
/// # Examples
///
/// ```rust
/// use climate_wrangler::nearest_gridpoint;
///
/// let lats = [44.0, 43.5, 43.0, 42.5];
/// let lons = [-3.0, -2.5, -2.0];
///
/// assert_eq!(nearest_gridpoint(&lats, &lons, 43.1, -2.75).unwrap(), (2, 0));
/// assert!(nearest_gridpoint(&[], &lons, 43.1, -2.7).is_err());
/// ```
pub fn nearest_gridpoint(
    latitudes: &[f64],
    longitudes: &[f64],
    latitude: f64,
    longitude: f64,
) -> Result<(usize, usize)> {
    let ilat = nearest_index(latitudes, latitude)
        .ok_or(WranglerError::EmptyCoordinates("latitude"))?;
    let ilon = nearest_index(longitudes, longitude)
        .ok_or(WranglerError::EmptyCoordinates("longitude"))?;
    Ok((ilat, ilon))
}

fn nearest_index(coords: &[f64], target: f64) -> Option<usize> {
    coords
        .iter()
        .map(|c| (c - target).abs())
        .enumerate()
        .fold(None, |best: Option<(usize, f64)>, (i, dist)| match best {
            Some((_, best_dist)) if best_dist <= dist => best,
            _ => Some((i, dist)),
        })
        .map(|(i, _)| i)
}

/// A geographic bounding box with an optional margin of extra grid cells.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Domain {
    /// Southern edge in degrees.
    pub lat_min: f64,
    /// Northern edge in degrees.
    pub lat_max: f64,
    /// Western edge in degrees.
    pub lon_min: f64,
    /// Eastern edge in degrees.
    pub lon_max: f64,
    /// Grid cells added beyond the nearest gridpoints on each side, in latitude.
    pub buffer_lat: usize,
    /// Grid cells added beyond the nearest gridpoints on each side, in longitude.
    pub buffer_lon: usize,
}

impl Domain {
    /// Create a box with no buffer.
    pub fn new(lat_min: f64, lat_max: f64, lon_min: f64, lon_max: f64) -> Self {
        Domain {
            lat_min,
            lat_max,
            lon_min,
            lon_max,
            buffer_lat: 0,
            buffer_lon: 0,
        }
    }

    /// A degenerate box selecting the gridpoint nearest a location.
    pub fn point(latitude: f64, longitude: f64) -> Self {
        Domain::new(latitude, latitude, longitude, longitude)
    }

    /// Builder method to set the buffer in grid cells.
    pub fn with_buffer(self, buffer_lat: usize, buffer_lon: usize) -> Self {
        Domain {
            buffer_lat,
            buffer_lon,
            ..self
        }
    }

    /// Work out which part of a grid this domain selects.
    ///
    /// The indexes of the two corners are found with [`nearest_gridpoint`], then widened by the
    /// buffer without going past the edges of the grid. Both corners are included, whichever
    /// way the latitudes are ordered.
    pub fn selection(&self, latitudes: &[f64], longitudes: &[f64]) -> Result<Selection> {
        let (ilat_a, ilon_a) =
            nearest_gridpoint(latitudes, longitudes, self.lat_min, self.lon_min)?;
        let (ilat_b, ilon_b) =
            nearest_gridpoint(latitudes, longitudes, self.lat_max, self.lon_max)?;

        let lat = widen(ilat_a, ilat_b, self.buffer_lat, latitudes.len());
        let lon = widen(ilon_a, ilon_b, self.buffer_lon, longitudes.len());

        Ok(match (lat.0 == lat.1, lon.0 == lon.1) {
            (true, true) => Selection::Point {
                lat: lat.0,
                lon: lon.0,
            },
            (true, false) => Selection::LongitudeTransect { lat: lat.0, lon },
            (false, true) => Selection::LatitudeTransect { lat, lon: lon.0 },
            (false, false) => Selection::Rectangle { lat, lon },
        })
    }
}

impl From<[f64; 4]> for Domain {
    /// From `[lat_min, lat_max, lon_min, lon_max]`.
    fn from(bounds: [f64; 4]) -> Self {
        Domain::new(bounds[0], bounds[1], bounds[2], bounds[3])
    }
}

fn widen(a: usize, b: usize, buffer: usize, len: usize) -> (usize, usize) {
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    (lo.saturating_sub(buffer), (hi + buffer).min(len - 1))
}

/// The part of a grid selected by a [`Domain`]. Index ranges are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// A single gridpoint.
    Point {
        /// Latitude index.
        lat: usize,
        /// Longitude index.
        lon: usize,
    },
    /// A line of gridpoints along a fixed latitude.
    LongitudeTransect {
        /// Latitude index.
        lat: usize,
        /// First and last longitude index.
        lon: (usize, usize),
    },
    /// A line of gridpoints along a fixed longitude.
    LatitudeTransect {
        /// First and last latitude index.
        lat: (usize, usize),
        /// Longitude index.
        lon: usize,
    },
    /// A 2-D block of gridpoints.
    Rectangle {
        /// First and last latitude index.
        lat: (usize, usize),
        /// First and last longitude index.
        lon: (usize, usize),
    },
}

impl Selection {
    /// First and last latitude index.
    pub fn latitude_range(&self) -> (usize, usize) {
        match *self {
            Selection::Point { lat, .. } | Selection::LongitudeTransect { lat, .. } => (lat, lat),
            Selection::LatitudeTransect { lat, .. } | Selection::Rectangle { lat, .. } => lat,
        }
    }

    /// First and last longitude index.
    pub fn longitude_range(&self) -> (usize, usize) {
        match *self {
            Selection::Point { lon, .. } | Selection::LatitudeTransect { lon, .. } => (lon, lon),
            Selection::LongitudeTransect { lon, .. } | Selection::Rectangle { lon, .. } => lon,
        }
    }
}

/// Crop a dataset to a domain.
///
/// Degenerate selections keep their latitude and longitude dimensions with length 1, so a point
/// yields a dataset whose coordinates each hold a single value.
pub fn crop_domain(data: &GriddedDataset, domain: &Domain) -> Result<GriddedDataset> {
    let lats = data.latitude().to_vec();
    let lons = data.longitude().to_vec();

    let selection = domain.selection(&lats, &lons)?;
    log::debug!("cropping to {:?}", selection);

    Ok(data.slice_spatial(selection.latitude_range(), selection.longitude_range()))
}
