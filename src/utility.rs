//! Small helpers shared by the rest of the crate: missing value handling, quantiles, timing and
//! snapshots.
use crate::error::Result;
use optional::{none, some, Optioned};
use serde::{de::DeserializeOwned, Serialize};
use std::{
    fs::File,
    io::{BufReader, BufWriter},
    path::Path,
    time::Instant,
};

/// Wrap a float, treating `NaN` as a missing value.
#[inline]
pub fn optioned(val: f64) -> Optioned<f64> {
    if val.is_nan() {
        none()
    } else {
        some(val)
    }
}

/// Apply `f` to a present value. A result of `NaN` becomes a missing value.
#[inline]
pub fn map_optioned<F>(val: Optioned<f64>, f: F) -> Optioned<f64>
where
    F: Fn(f64) -> f64,
{
    val.into_option().map_or_else(none, |v| optioned(f(v)))
}

/// Linear interpolation quantile (R type 7, also the numpy/pandas default).
///
/// **Expects pre-sorted input.** Returns `None` if `sorted` is empty.
pub fn quantile(sorted: &[f64], p: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }

    let n = sorted.len();
    let h = (n - 1) as f64 * p;
    let lo = h.floor() as usize;
    let hi = (lo + 1).min(n - 1);
    Some(sorted[lo] + (h - h.floor()) * (sorted[hi] - sorted[lo]))
}

/// Run `f`, logging how long it took under the given name.
pub fn timed<T, F>(name: &str, f: F) -> T
where
    F: FnOnce() -> T,
{
    let start = Instant::now();
    let result = f();
    log::debug!(
        "Function {:?} executed in {:.4}s",
        name,
        start.elapsed().as_secs_f64()
    );
    result
}

/// Save a snapshot of any serializable value, overwriting an existing file.
pub fn save_object<T: Serialize, P: AsRef<Path>>(obj: &T, path: P) -> Result<()> {
    let writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer(writer, obj)?;
    Ok(())
}

/// Load a snapshot written by [`save_object`].
pub fn load_object<T: DeserializeOwned, P: AsRef<Path>>(path: P) -> Result<T> {
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}
