//! Splitting wind components stored side by side along longitude.
use super::GriddedDataset;
use crate::error::{Result, WranglerError};
use ndarray::{ArrayD, Slice, Zip};

/// Split a vector variable stored as its two components side by side along longitude.
///
/// The first half of the longitudes holds `u` and the second half `v`. The result has `u`, `v`
/// and their magnitude `module` on the longitudes of the first half.
pub fn separate_concatenated_components(
    data: &GriddedDataset,
    variable: &str,
) -> Result<GriddedDataset> {
    let values = data
        .variable(variable)
        .ok_or_else(|| WranglerError::MissingVariable(variable.to_owned()))?;

    let n_lon = data.longitude().len();
    if n_lon == 0 || n_lon % 2 != 0 || data.latitude().is_empty() {
        return Err(WranglerError::ShapeMismatch(format!(
            "{} longitudes cannot hold two equal components",
            n_lon
        )));
    }
    let middle = n_lon / 2;
    let (_, lon_axis) = data.spatial_axes();

    let u: ArrayD<f32> = values.slice_axis(lon_axis, Slice::from(0..middle)).to_owned();
    let v: ArrayD<f32> = values
        .slice_axis(lon_axis, Slice::from(middle..n_lon))
        .to_owned();
    let module = Zip::from(&u).and(&v).map_collect(|&u, &v| u.hypot(v));

    let mut template = data.slice_spatial((0, data.latitude().len() - 1), (0, middle - 1));
    template.variables.clear();

    template
        .with_variable("u", u)?
        .with_variable("v", v)?
        .with_variable("module", module)
}
