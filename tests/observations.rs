use approx::assert_relative_eq;
use climate_wrangler::{
    open_observations, GroupingSpec, Resample, Station, Variable, WranglerError,
};

mod utils;
use utils::{day, hour, station_dir, test_data_path};

#[test]
fn station_files_are_merged() {
    let obs = open_observations(station_dir(), &[Variable::TMPA, Variable::PCNR]).unwrap();

    assert_eq!(obs.column_names().collect::<Vec<_>>(), vec!["PCNR", "TMPA"]);
    assert_eq!(obs.index()[0], day(2000, 1, 1));
    assert_eq!(obs.index().last(), Some(&hour(2000, 1, 3, 18)));

    let tmpa = obs.column("TMPA").unwrap();
    let pcnr = obs.column("PCNR").unwrap();
    // Temperature at midnight, no precipitation reading then.
    assert_relative_eq!(tmpa[0].unpack(), 2.1);
    assert!(pcnr[0].is_none());
}

#[test]
fn absent_variable_is_an_error() {
    assert!(matches!(
        open_observations(station_dir(), &[Variable::WSPD]),
        Err(WranglerError::EmptyData(_))
    ));
}

#[test]
fn noon_values() {
    let obs = open_observations(station_dir(), &[Variable::TMPA]).unwrap();
    let noon = obs.group(&GroupingSpec::default()).unwrap();

    assert_eq!(noon.index(), &[day(2000, 1, 1), day(2000, 1, 2), day(2000, 1, 3)]);
    let col = noon.column("TMPA").unwrap();
    assert_relative_eq!(col[0].unpack(), 8.3);
    assert_relative_eq!(col[1].unpack(), 6.6);
    assert_relative_eq!(col[2].unpack(), 9.1);
}

#[test]
fn station_daily_data() {
    let station = Station::from_meta_file(station_dir()).unwrap();
    assert_eq!(station.code(), "9434");

    let pcnr = station.daily_data(Variable::PCNR).unwrap();
    let col = pcnr.column("PCNR").unwrap();
    assert_eq!(pcnr.len(), 3);
    assert_relative_eq!(col[0].unpack(), 1.2);
    assert_relative_eq!(col[1].unpack(), 0.5);
    assert_relative_eq!(col[2].unpack(), 3.0);

    let tmpa = station.daily_data(Variable::TMPA).unwrap();
    let col = tmpa.column("TMPA").unwrap();
    assert_relative_eq!(col[0].unpack(), (2.1 + 0.4 + 8.3 + 5.2) / 4.0);
    // The missing midnight value is skipped.
    assert_relative_eq!(col[2].unpack(), 9.1);
}

#[test]
fn network_table() {
    let station =
        Station::from_network(test_data_path("stations.csv"), "9771C", station_dir()).unwrap();
    assert_eq!(station.name(), "Lleida");
    assert_relative_eq!(station.altitude(), 192.0);

    assert!(matches!(
        Station::from_network(test_data_path("stations.csv"), "0000", station_dir()),
        Err(WranglerError::StationNotFound(_))
    ));
}
