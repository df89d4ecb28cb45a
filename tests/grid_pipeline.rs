use climate_wrangler::{
    grid_files, load_object, nearest_gridpoint, open_data, save_object,
    separate_concatenated_components, Domain, GriddedDataset, OpenOptions, Result, Station,
    Variable, WranglerError,
};
use ndarray::{Array, IxDyn};
use std::{fs, path::PathBuf};

mod utils;
use utils::{day, hour, station_dir};

const LATS: [f64; 3] = [42.0, 41.75, 41.5];
const LONS: [f64; 4] = [-1.5, -1.25, -1.0, -0.75];

/// Build a tree of empty yearly files, `y_{year}/{year}_{code}.grib`.
fn grid_tree(codes: &[&str], years: &[i32]) -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    for year in years {
        let ydir = dir.path().join(format!("y_{}", year));
        fs::create_dir_all(&ydir).unwrap();
        for code in codes {
            fs::write(ydir.join(format!("{}_{}.grib", year, code)), b"").unwrap();
        }
    }
    dir
}

/// Stands in for a GRIB decoder: the first day of each file's year, hourly, two members.
///
/// Values encode member, time step, latitude and longitude index as `m tt j k`.
fn synthetic_reader(variable: &str, paths: &[PathBuf]) -> Result<GriddedDataset> {
    let mut times = Vec::new();
    for path in paths {
        let name = path.file_name().and_then(|n| n.to_str()).unwrap();
        let year: i32 = name[..4].parse().unwrap();
        times.extend((0..24).map(|h| hour(year, 1, 1, h)));
    }

    let data = Array::from_shape_fn(IxDyn(&[times.len(), 2, LATS.len(), LONS.len()]), |i| {
        (i[1] * 10_000 + i[0] * 100 + i[2] * 10 + i[3]) as f32
    });

    GriddedDataset::new(LATS.to_vec(), LONS.to_vec())
        .with_time(times)?
        .with_members(vec![0, 1])?
        .with_variable(variable, data)
}

#[test]
fn reanalysis_file_layout() {
    let codes = Variable::WSPD.reanalysis_codes();
    let dir = grid_tree(codes, &[2000, 2001]);
    fs::remove_file(dir.path().join("y_2001").join("2001_SURF_166.grib")).unwrap();

    let files = grid_files(dir.path(), codes, &[2000, 2001, 2002], ".grib");
    assert_eq!(files.len(), 2);
    assert_eq!(files["SURF_165"].len(), 2);
    assert_eq!(files["SURF_166"].len(), 1);
    assert!(files["SURF_165"][1].ends_with("y_2001/2001_SURF_165.grib"));
}

#[test]
fn open_select_group_and_crop() {
    let codes = ["SURF_167", "SURF_168"];
    let dir = grid_tree(&codes, &[2000, 2001]);
    let files = grid_files(dir.path(), &codes, &[2000, 2001], ".grib");

    let options = OpenOptions::new()
        .with_member(1)
        .with_grouping("12hour_1Y_mean".parse().unwrap())
        .with_domain(Domain::new(41.5, 41.75, -1.25, -1.0));
    let ds = open_data(&synthetic_reader, &files, &options).unwrap();

    assert_eq!(ds.variable_names().collect::<Vec<_>>(), codes.to_vec());
    assert_eq!(ds.time(), &[day(2000, 1, 1), day(2001, 1, 1)]);
    assert!(ds.members().is_empty());
    assert_eq!(ds.latitude().to_vec(), vec![41.75, 41.5]);
    assert_eq!(ds.longitude().to_vec(), vec![-1.25, -1.0]);

    let t = ds.variable("SURF_167").unwrap();
    assert_eq!(t.shape(), &[2, 2, 2]);
    // Member 1, noon of 2000-01-01 is step 12, noon of 2001-01-01 is step 36.
    assert_eq!(t[[0, 0, 0]], 11_211.0);
    assert_eq!(t[[1, 1, 1]], 13_622.0);
}

#[test]
fn unknown_member() {
    let dir = grid_tree(&["SURF_167"], &[2000]);
    let files = grid_files(dir.path(), &["SURF_167"], &[2000], ".grib");

    let options = OpenOptions::new().with_member(7);
    assert!(matches!(
        open_data(&synthetic_reader, &files, &options),
        Err(WranglerError::MemberNotFound(7))
    ));
}

#[test]
fn concatenated_wind_components() {
    let dir = grid_tree(&["950_131"], &[2000]);
    let files = grid_files(dir.path(), &["950_131"], &[2000], ".grib");

    let options = OpenOptions::new().with_member(0);
    let ds = open_data(&synthetic_reader, &files, &options).unwrap();
    let split = separate_concatenated_components(&ds, "950_131").unwrap();

    assert_eq!(split.longitude().to_vec(), vec![-1.5, -1.25]);
    let u = split.variable("u").unwrap();
    let v = split.variable("v").unwrap();
    let module = split.variable("module").unwrap();
    assert_eq!(u.shape(), &[1, 3, 2]);
    // Noon is step 12 of the day.
    assert_eq!(u[[0, 2, 1]], 1_221.0);
    assert_eq!(v[[0, 2, 1]], 1_223.0);
    assert_eq!(module[[0, 2, 1]], (1_221.0f32).hypot(1_223.0));
}

#[test]
fn station_gridpoint() {
    let station = Station::from_meta_file(station_dir()).unwrap();

    let (lat, lon) = station.gridpoint(&LATS, &LONS).unwrap();
    assert_eq!((lat, lon), (41.75, -1.0));
    assert_eq!(
        nearest_gridpoint(&LATS, &LONS, station.latitude(), station.longitude()).unwrap(),
        (1, 2)
    );
}

#[test]
fn station_snapshot() {
    let station = Station::from_meta_file(station_dir()).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("station.json");
    save_object(&station, &path).unwrap();
    let back: Station = load_object(&path).unwrap();

    assert_eq!(back, station);
}
