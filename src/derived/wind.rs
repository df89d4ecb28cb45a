//! Wind speed and direction to U and V components.
use crate::{
    error::Result,
    keys::Variable,
    series::ObservationSeries,
    utility::optioned,
};
use itertools::izip;
use metfor::{MetersPSec, Quantity, WindUV};
use optional::{none, Optioned};

/// Split a wind into its U (eastward) and V (northward) components.
///
/// `direction` is where the wind blows from, in degrees clockwise from north.
///
/// # Examples
///
/// ```rust
/// use climate_wrangler::derived::wind_components;
/// use metfor::{MetersPSec, Quantity};
///
/// // A westerly wind blows towards the east.
/// let wind = wind_components(MetersPSec(10.0), 270.0);
/// assert!((wind.u.unpack() - 10.0).abs() < 1.0e-9);
/// assert!(wind.v.unpack().abs() < 1.0e-9);
/// ```
#[inline]
pub fn wind_components(speed: MetersPSec, direction: f64) -> WindUV<MetersPSec> {
    let angle = (270.0 - direction).to_radians();

    WindUV {
        u: speed * angle.cos(),
        v: speed * angle.sin(),
    }
}

/// A copy of the series with `U` and `V` columns computed from `WSPD` and `WDIR`.
///
/// With `substitute` the speed and direction columns are dropped.
pub fn with_wind_components(
    series: &ObservationSeries,
    substitute: bool,
) -> Result<ObservationSeries> {
    let mut series = series.clone();
    wind_components_in_place(&mut series, substitute)?;
    Ok(series)
}

/// Add `U` and `V` columns computed from `WSPD` and `WDIR` to the series.
///
/// A component is missing where either the speed or the direction is.
pub fn wind_components_in_place(series: &mut ObservationSeries, substitute: bool) -> Result<()> {
    let speed_name = Variable::WSPD.acronym();
    let dir_name = Variable::WDIR.acronym();
    series.require_all(&[speed_name, dir_name])?;

    let (u, v): (Vec<Optioned<f64>>, Vec<Optioned<f64>>) =
        izip!(series.require(speed_name)?, series.require(dir_name)?)
            .map(|(spd, dir)| match (spd.into_option(), dir.into_option()) {
                (Some(spd), Some(dir)) => {
                    let WindUV { u, v } = wind_components(MetersPSec(spd), dir);
                    (optioned(u.unpack()), optioned(v.unpack()))
                }
                _ => (none(), none()),
            })
            .unzip();

    series.insert_column("U", u)?;
    series.insert_column("V", v)?;

    if substitute {
        series.remove_column(speed_name);
        series.remove_column(dir_name);
    }

    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{error::WranglerError, test_data::day};
    use approx::assert_relative_eq;
    use optional::some;

    fn wind_series() -> ObservationSeries {
        ObservationSeries::with_index(vec![day(2000, 1, 1), day(2000, 1, 2), day(2000, 1, 3)])
            .unwrap()
            .with_column("WSPD", vec![some(3.0), some(5.0), none()])
            .unwrap()
            .with_column("WDIR", vec![some(0.0), some(135.0), some(90.0)])
            .unwrap()
    }

    #[test]
    fn speed_and_direction_are_preserved() {
        for &(spd, dir) in &[(1.0, 0.0), (7.5, 45.0), (3.2, 180.0), (12.0, 271.0), (0.5, 359.0)] {
            let WindUV { u, v } = wind_components(MetersPSec(spd), dir);
            let (u, v) = (u.unpack(), v.unpack());

            assert_relative_eq!(u.hypot(v), spd, epsilon = 1.0e-9);

            let back = (-u).atan2(-v).to_degrees();
            let diff = (back - dir + 180.0).rem_euclid(360.0) - 180.0;
            assert!(diff.abs() < 1.0e-9);
        }
    }

    #[test]
    fn northerly_blows_south() {
        let WindUV { u, v } = wind_components(MetersPSec(4.0), 0.0);
        assert_relative_eq!(u.unpack(), 0.0, epsilon = 1.0e-9);
        assert_relative_eq!(v.unpack(), -4.0, epsilon = 1.0e-9);
    }

    #[test]
    fn series_components() {
        let src = wind_series();
        let out = with_wind_components(&src, false).unwrap();

        assert_eq!(src.width(), 2);
        assert_eq!(out.column_names().collect::<Vec<_>>(), vec!["U", "V", "WDIR", "WSPD"]);
        assert_relative_eq!(out.column("V").unwrap()[0].unpack(), -3.0, epsilon = 1.0e-9);
        assert!(out.column("U").unwrap()[2].is_none());

        let mut subst = src.clone();
        wind_components_in_place(&mut subst, true).unwrap();
        assert_eq!(subst.column_names().collect::<Vec<_>>(), vec!["U", "V"]);
    }

    #[test]
    fn missing_direction() {
        let mut src = wind_series();
        src.remove_column("WDIR");
        match with_wind_components(&src, false) {
            Err(WranglerError::MissingColumns(cols)) => assert_eq!(cols, vec!["WDIR"]),
            other => panic!("unexpected {:?}", other),
        }
    }
}
