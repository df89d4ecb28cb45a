//! Masking night time radiance.
use crate::{error::Result, series::ObservationSeries};

/// Column holding the incoming shortwave radiance.
pub const RADIANCE_COLUMN: &str = "RADS01";

/// Radiance below this value, in W/m², is considered night time.
pub const DEFAULT_RADIANCE_THRESHOLD: f64 = 200.0;

/// A copy of the series with the radiance below `threshold` set missing.
pub fn clear_low_radiance(series: &ObservationSeries, threshold: f64) -> Result<ObservationSeries> {
    let mut series = series.clone();
    clear_low_radiance_in_place(&mut series, threshold)?;
    Ok(series)
}

/// Set missing the radiance values below `threshold`.
pub fn clear_low_radiance_in_place(series: &mut ObservationSeries, threshold: f64) -> Result<()> {
    series.require(RADIANCE_COLUMN)?;
    series.map_column(RADIANCE_COLUMN, |r| if r >= threshold { r } else { f64::NAN });
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::test_data::hour;
    use optional::{none, some};

    #[test]
    fn night_is_cleared() {
        let index = vec![hour(2000, 6, 1, 3), hour(2000, 6, 1, 12), hour(2000, 6, 1, 19)];
        let series = ObservationSeries::with_index(index)
            .unwrap()
            .with_column(RADIANCE_COLUMN, vec![some(0.0), some(850.0), some(200.0)])
            .unwrap()
            .with_column("TMPA", vec![some(12.0), some(25.0), some(19.0)])
            .unwrap();

        let out = clear_low_radiance(&series, DEFAULT_RADIANCE_THRESHOLD).unwrap();
        assert_eq!(
            out.column(RADIANCE_COLUMN).unwrap(),
            &[none(), some(850.0), some(200.0)]
        );
        assert_eq!(out.column("TMPA"), series.column("TMPA"));
    }

    #[test]
    fn needs_radiance() {
        let mut series = ObservationSeries::new();
        assert!(clear_low_radiance_in_place(&mut series, 200.0).is_err());
    }
}
