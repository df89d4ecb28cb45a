//! Relative humidity and the humidity below which it does not rain.
use crate::{
    error::{Result, WranglerError},
    keys::Variable,
    series::{common_index, ObservationSeries},
    utility::{optioned, quantile},
};
use itertools::izip;
use metfor::{Kelvin, Quantity};
use optional::{none, some, Optioned};
use serde::{Deserialize, Serialize};

/// Latent heat of vaporization over the water vapor gas constant, K.
const L_RV: f64 = 5423.0;
/// Reference temperature of the vapor pressure approximation, K.
const T0: f64 = 273.0;

/// Precipitation below this amount is not considered a precipitation event.
pub const DEFAULT_MIN_PRECIPITATION: f64 = 0.25;

/// Relative humidity in percent from the dew point and air temperature.
///
/// Uses the Clausius-Clapeyron approximation `e = e0 exp(L/Rv (1/T0 - 1/T))`. The reference
/// pressure `e0` cancels out in the ratio.
#[inline]
pub fn relative_humidity(dew_point: Kelvin, temperature: Kelvin) -> f64 {
    let vapor = |t: f64| (L_RV * (1.0 / T0 - 1.0 / t)).exp();

    100.0 * vapor(dew_point.unpack()) / vapor(temperature.unpack())
}

/// A copy of the series with an `RHMA` column computed from `TDEW` and `TMPA` in kelvin.
pub fn with_relative_humidity(series: &ObservationSeries) -> Result<ObservationSeries> {
    let mut series = series.clone();
    relative_humidity_in_place(&mut series)?;
    Ok(series)
}

/// Add an `RHMA` column computed from `TDEW` and `TMPA` in kelvin to the series.
pub fn relative_humidity_in_place(series: &mut ObservationSeries) -> Result<()> {
    let dew_name = Variable::TDEW.acronym();
    let temp_name = Variable::TMPA.acronym();
    series.require_all(&[dew_name, temp_name])?;

    let rh: Vec<Optioned<f64>> = izip!(series.require(dew_name)?, series.require(temp_name)?)
        .map(|(dp, t)| match (dp.into_option(), t.into_option()) {
            (Some(dp), Some(t)) => optioned(relative_humidity(Kelvin(dp), Kelvin(t))),
            _ => none(),
        })
        .collect();

    series.insert_column(Variable::RHMA.acronym(), rh)
}

/// Summary of the humidity observed while it was precipitating.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HumidityDistribution {
    /// First quartile.
    pub q1: f64,
    /// Third quartile.
    pub q3: f64,
    /// Interquartile range.
    pub iqr: f64,
    /// `q1 - 1.5 iqr`, the humidity threshold for precipitation.
    pub lower_adjacent_value: f64,
    /// The humidity samples the summary was computed from, sorted.
    pub samples: Vec<f64>,
}

/// Distribution of the humidity at the times precipitation reached `min_precipitation`.
///
/// `humidity` must have an `RHMA` column and `precipitation` a `PCNR` column. Both are restricted
/// to the timestamps where they have valid data.
pub fn humidity_precipitation_threshold(
    humidity: &ObservationSeries,
    precipitation: &ObservationSeries,
    min_precipitation: f64,
) -> Result<HumidityDistribution> {
    let humidity = humidity.select_columns(&[Variable::RHMA.acronym()])?;
    let mut precipitation = precipitation.select_columns(&[Variable::PCNR.acronym()])?;
    precipitation.map_values(|p| if p < min_precipitation { f64::NAN } else { p });

    let (humidity, _) = common_index(&humidity, &precipitation);

    let mut samples: Vec<f64> = humidity
        .require(Variable::RHMA.acronym())?
        .iter()
        .filter_map(|v| v.into_option())
        .collect();
    samples.sort_by(|a, b| a.total_cmp(b));

    let q1 = quantile(&samples, 0.25).ok_or(WranglerError::NotEnoughData)?;
    let q3 = quantile(&samples, 0.75).ok_or(WranglerError::NotEnoughData)?;
    let iqr = q3 - q1;

    Ok(HumidityDistribution {
        q1,
        q3,
        iqr,
        lower_adjacent_value: q1 - 1.5 * iqr,
        samples,
    })
}

impl HumidityDistribution {
    /// Fraction of the samples below the lower adjacent value.
    pub fn outlier_fraction(&self) -> Optioned<f64> {
        if self.samples.is_empty() {
            return none();
        }

        let below = self
            .samples
            .iter()
            .filter(|&&h| h < self.lower_adjacent_value)
            .count();
        some(below as f64 / self.samples.len() as f64)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::test_data::day;
    use approx::assert_relative_eq;
    use chrono::Duration;

    #[test]
    fn saturated_air() {
        for &t in &[250.0, 273.15, 300.0] {
            assert_relative_eq!(relative_humidity(Kelvin(t), Kelvin(t)), 100.0);
        }
        assert!(relative_humidity(Kelvin(280.0), Kelvin(290.0)) < 100.0);
    }

    #[test]
    fn series_humidity() {
        let idx = vec![day(2000, 1, 1), day(2000, 1, 2)];
        let series = ObservationSeries::with_index(idx)
            .unwrap()
            .with_column("TDEW", vec![some(280.0), none()])
            .unwrap()
            .with_column("TMPA", vec![some(280.0), some(285.0)])
            .unwrap();

        let out = with_relative_humidity(&series).unwrap();
        assert_relative_eq!(out.column("RHMA").unwrap()[0].unpack(), 100.0);
        assert!(out.column("RHMA").unwrap()[1].is_none());
        assert!(series.column("RHMA").is_none());

        let mut missing = series.clone();
        missing.remove_column("TDEW");
        assert!(matches!(
            relative_humidity_in_place(&mut missing),
            Err(WranglerError::MissingColumns(_))
        ));
    }

    #[test]
    fn threshold_from_rainy_days() {
        let days: Vec<_> = (0..10).map(|d| day(2000, 1, 1) + Duration::days(d)).collect();
        let rh: Vec<f64> = vec![40.0, 50.0, 60.0, 70.0, 80.0, 90.0, 95.0, 99.0, 30.0, 20.0];
        // Only the first eight days rain enough.
        let pcnr: Vec<f64> = vec![1.0, 0.3, 2.0, 5.0, 0.25, 3.0, 10.0, 1.5, 0.1, 0.0];

        let humidity =
            ObservationSeries::from_pairs("RHMA", days.iter().cloned().zip(rh).collect());
        let precipitation =
            ObservationSeries::from_pairs("PCNR", days.iter().cloned().zip(pcnr).collect());

        let dist =
            humidity_precipitation_threshold(&humidity, &precipitation, DEFAULT_MIN_PRECIPITATION)
                .unwrap();

        // Samples 40 50 60 70 80 90 95 99
        assert_eq!(dist.samples.len(), 8);
        assert_relative_eq!(dist.q1, 57.5);
        assert_relative_eq!(dist.q3, 91.25);
        assert_relative_eq!(dist.iqr, 33.75);
        assert_relative_eq!(dist.lower_adjacent_value, 6.875);
        assert_eq!(dist.outlier_fraction().unpack(), 0.0);
    }

    #[test]
    fn no_rain_is_not_enough_data() {
        let days: Vec<_> = (0..3).map(|d| day(2000, 1, 1) + Duration::days(d)).collect();
        let humidity =
            ObservationSeries::from_pairs("RHMA", days.iter().map(|&d| (d, 50.0)).collect());
        let precipitation =
            ObservationSeries::from_pairs("PCNR", days.iter().map(|&d| (d, 0.0)).collect());

        assert!(matches!(
            humidity_precipitation_threshold(&humidity, &precipitation, 0.25),
            Err(WranglerError::NotEnoughData)
        ));
    }
}
