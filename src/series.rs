//! A time indexed table of observations with one column per variable.

use crate::{
    error::{Result, WranglerError},
    utility::map_optioned,
};
use chrono::NaiveDateTime;
use itertools::Itertools;
use optional::{none, Optioned};
use std::collections::BTreeMap;

/// Observations of several variables on a shared, strictly increasing time index.
///
/// Each column is a vector parallel to the index. Missing values are stored as `none`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ObservationSeries {
    index: Vec<NaiveDateTime>,
    columns: BTreeMap<String, Vec<Optioned<f64>>>,
}

impl ObservationSeries {
    /// Create an empty series. This is a proxy for default with a clearer name.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a series with the given index and no columns.
    ///
    /// The index must be strictly increasing.
    pub fn with_index(index: Vec<NaiveDateTime>) -> Result<Self> {
        if let Some((a, b)) = index.iter().tuple_windows().find(|(a, b)| a >= b) {
            return Err(WranglerError::ShapeMismatch(format!(
                "index is not strictly increasing at {} -> {}",
                a, b
            )));
        }

        Ok(ObservationSeries {
            index,
            columns: BTreeMap::new(),
        })
    }

    /// Build a single column series from unordered `(time, value)` pairs.
    ///
    /// The pairs are sorted by time. When a timestamp repeats, the first value read wins.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use chrono::NaiveDate;
    /// use climate_wrangler::ObservationSeries;
    ///
    /// let t0 = NaiveDate::from_ymd_opt(2000, 1, 2).unwrap().and_hms_opt(0, 0, 0).unwrap();
    /// let t1 = NaiveDate::from_ymd_opt(2000, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
    ///
    /// let series = ObservationSeries::from_pairs("TMPA", vec![(t0, 2.0), (t1, 1.0)]);
    /// assert_eq!(series.index(), &[t1, t0]);
    /// assert_eq!(series.column("TMPA").unwrap()[0].unpack(), 1.0);
    /// ```
    pub fn from_pairs<S: Into<String>>(name: S, mut pairs: Vec<(NaiveDateTime, f64)>) -> Self {
        pairs.sort_by_key(|&(t, _)| t);

        let (index, values): (Vec<_>, Vec<_>) = pairs
            .into_iter()
            .dedup_by(|a, b| a.0 == b.0)
            .map(|(t, v)| (t, crate::utility::optioned(v)))
            .unzip();

        let mut columns = BTreeMap::new();
        columns.insert(name.into(), values);
        ObservationSeries { index, columns }
    }

    /// Builder method to add a column.
    pub fn with_column<S: Into<String>>(
        mut self,
        name: S,
        values: Vec<Optioned<f64>>,
    ) -> Result<Self> {
        self.insert_column(name, values)?;
        Ok(self)
    }

    /// Add or replace a column. The column must be as long as the index.
    pub fn insert_column<S: Into<String>>(
        &mut self,
        name: S,
        values: Vec<Optioned<f64>>,
    ) -> Result<()> {
        let name = name.into();
        if values.len() != self.index.len() {
            return Err(WranglerError::ShapeMismatch(format!(
                "column {} has {} values for an index of {}",
                name,
                values.len(),
                self.index.len()
            )));
        }

        self.columns.insert(name, values);
        Ok(())
    }

    /// Remove a column, returning its values if it was present.
    #[inline]
    pub fn remove_column(&mut self, name: &str) -> Option<Vec<Optioned<f64>>> {
        self.columns.remove(name)
    }

    /// Rename a column. Does nothing if `from` is not present.
    pub fn rename_column(&mut self, from: &str, to: &str) {
        if let Some(values) = self.columns.remove(from) {
            self.columns.insert(to.to_owned(), values);
        }
    }

    /// The time index.
    #[inline]
    pub fn index(&self) -> &[NaiveDateTime] {
        &self.index
    }

    /// Get a column by name.
    #[inline]
    pub fn column(&self, name: &str) -> Option<&[Optioned<f64>]> {
        self.columns.get(name).map(|c| c.as_slice())
    }

    /// Get a column by name, failing with a configuration error when it is absent.
    pub fn require(&self, name: &str) -> Result<&[Optioned<f64>]> {
        self.column(name)
            .ok_or_else(|| WranglerError::MissingColumns(vec![name.to_owned()]))
    }

    /// Check all the named columns are present, listing every absent one in the error.
    pub fn require_all(&self, names: &[&str]) -> Result<()> {
        let missing: Vec<String> = names
            .iter()
            .filter(|n| !self.columns.contains_key(**n))
            .map(|n| (*n).to_owned())
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(WranglerError::MissingColumns(missing))
        }
    }

    /// A new series holding only the named columns.
    pub fn select_columns(&self, names: &[&str]) -> Result<Self> {
        self.require_all(names)?;

        let columns = names
            .iter()
            .map(|&n| (n.to_owned(), self.columns[n].clone()))
            .collect();

        Ok(ObservationSeries {
            index: self.index.clone(),
            columns,
        })
    }

    /// Column names in sorted order.
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(|k| k.as_str())
    }

    /// Number of rows.
    #[inline]
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// True if there are no rows.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Number of columns.
    #[inline]
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// Apply a function to every present value of one column.
    pub fn map_column<F>(&mut self, name: &str, f: F)
    where
        F: Fn(f64) -> f64,
    {
        if let Some(values) = self.columns.get_mut(name) {
            for v in values.iter_mut() {
                *v = map_optioned(*v, &f);
            }
        }
    }

    /// Apply a function to every present value of every column.
    pub fn map_values<F>(&mut self, f: F)
    where
        F: Fn(f64) -> f64,
    {
        for values in self.columns.values_mut() {
            for v in values.iter_mut() {
                *v = map_optioned(*v, &f);
            }
        }
    }

    /// Keep only the rows at the given positions, in the given order.
    pub(crate) fn take_rows(&self, rows: &[usize]) -> Self {
        let index = rows.iter().map(|&i| self.index[i]).collect();
        let columns = self
            .columns
            .iter()
            .map(|(k, col)| (k.clone(), rows.iter().map(|&i| col[i]).collect()))
            .collect();

        ObservationSeries { index, columns }
    }

    /// Keep the rows whose timestamp satisfies the predicate.
    pub fn filter_index<F>(&self, pred: F) -> Self
    where
        F: Fn(&NaiveDateTime) -> bool,
    {
        let rows: Vec<usize> = self
            .index
            .iter()
            .enumerate()
            .filter(|(_, t)| pred(t))
            .map(|(i, _)| i)
            .collect();

        self.take_rows(&rows)
    }

    /// Outer join of two series on their indexes.
    ///
    /// Rows present in only one series get missing values in the other's columns. A column
    /// name present in both is an error.
    pub fn merge(&self, other: &ObservationSeries) -> Result<Self> {
        if let Some(dup) = self.columns.keys().find(|k| other.columns.contains_key(*k)) {
            return Err(WranglerError::ShapeMismatch(format!(
                "column {} present in both series",
                dup
            )));
        }

        let index: Vec<NaiveDateTime> = self
            .index
            .iter()
            .merge(other.index.iter())
            .dedup()
            .cloned()
            .collect();

        let mut merged = ObservationSeries {
            index,
            columns: BTreeMap::new(),
        };

        for src in &[self, other] {
            let positions = merged.positions_of(&src.index);
            for (name, col) in &src.columns {
                let mut values = vec![none(); merged.index.len()];
                for (&pos, &v) in positions.iter().zip(col) {
                    values[pos] = v;
                }
                merged.columns.insert(name.clone(), values);
            }
        }

        Ok(merged)
    }

    // Position of each of the given timestamps in this index. Every timestamp must be present.
    fn positions_of(&self, times: &[NaiveDateTime]) -> Vec<usize> {
        let mut positions = Vec::with_capacity(times.len());
        let mut j = 0;
        for t in times {
            while self.index[j] != *t {
                j += 1;
            }
            positions.push(j);
        }
        positions
    }

    /// Drop every row holding a missing or infinite value in any column.
    pub fn clean(&self) -> Self {
        let rows: Vec<usize> = (0..self.index.len())
            .filter(|&i| {
                self.columns
                    .values()
                    .all(|col| col[i].into_option().map_or(false, f64::is_finite))
            })
            .collect();

        self.take_rows(&rows)
    }

    /// Rows whose timestamps appear in `times`, which must be sorted.
    pub(crate) fn select_sorted(&self, times: &[NaiveDateTime]) -> Self {
        let rows: Vec<usize> = self
            .index
            .iter()
            .enumerate()
            .filter(|(_, t)| times.binary_search(t).is_ok())
            .map(|(i, _)| i)
            .collect();

        self.take_rows(&rows)
    }
}

/// Reduce two series to their common valid data.
///
/// Both are cleaned of missing and infinite values and then restricted to the timestamps they
/// share.
pub fn common_index(
    first: &ObservationSeries,
    second: &ObservationSeries,
) -> (ObservationSeries, ObservationSeries) {
    let first = first.clean();
    let second = second.clean();

    let common: Vec<NaiveDateTime> = first
        .index
        .iter()
        .merge_join_by(second.index.iter(), |a, b| a.cmp(b))
        .filter_map(|either| match either {
            itertools::EitherOrBoth::Both(t, _) => Some(*t),
            _ => None,
        })
        .collect();

    (first.select_sorted(&common), second.select_sorted(&common))
}
