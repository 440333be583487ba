mod util;

use hydro_sieve::io::result::read_snapshot;
use hydro_sieve::mesh_error::HydroSieveError;
use hydro_sieve::prelude::*;
use std::fs;
use util::*;

#[test]
fn writes_once_per_interval() {
    let dir = tempfile::tempdir().unwrap();
    let mut writer = ResultWriter::new(dir.path(), 1.0).unwrap();
    for (t, due) in [
        (0.0, false),
        (0.3, false),
        (0.6, false),
        (0.9, false),
        (1.2, true),
        (1.5, false),
        (1.9, false),
    ] {
        assert_eq!(writer.is_time_to_write(t), due, "t = {t}");
    }

    // skipped intervals still trigger once
    let mut fresh = ResultWriter::new(dir.path(), 1.0).unwrap();
    assert!(fresh.is_time_to_write(2.0));
    assert!(fresh.is_time_to_write(4.5));
    assert!(!fresh.is_time_to_write(4.9));
    assert!(fresh.is_time_to_write(6.0));
}

#[test]
fn snapshot_files_are_named_after_time() {
    let dir = tempfile::tempdir().unwrap();
    let writer = ResultWriter::new(dir.path().join("out"), 0.5).unwrap();
    assert!(dir.path().join("out").is_dir());
    assert_eq!(
        writer.snapshot_path(0.000234),
        dir.path().join("out").join("result_2.340000e-04.raw")
    );
    assert_eq!(
        writer.snapshot_path(124.3255).file_name().unwrap().to_str(),
        Some("result_1.243255e+02.raw")
    );
}

#[test]
fn saves_one_line_per_cell() {
    let dir = tempfile::tempdir().unwrap();
    let mesh = grid(2, 1);
    let mut state = State::uniform(&mesh, CellState::new(1.0, 0.0, 0.0));
    state.real_mut()[1] = CellState::new(0.25, -1.5, 2.0);

    let mut writer = ResultWriter::new(dir.path(), 1.0).unwrap();
    writer.save(&mesh, &state, 1.0).unwrap();
    assert_eq!(writer.snapshots().len(), 1);
    let path = &writer.snapshots()[0].path;
    assert_eq!(fs::read_to_string(path).unwrap(), "1 1 0 0\n2 0.25 -1.5 2\n");

    let rows = read_snapshot(fs::File::open(path).unwrap()).unwrap();
    assert_eq!(rows[1], (2, CellState::new(0.25, -1.5, 2.0)));
}

#[test]
fn colliding_file_names_keep_one_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    let mesh = grid(1, 1);
    let mut writer = ResultWriter::new(dir.path(), 1e-9).unwrap();
    // identical to 7 significant digits
    assert_eq!(writer.snapshot_path(1.0), writer.snapshot_path(1.00000001));
    writer
        .save(&mesh, &State::uniform(&mesh, CellState::new(1.0, 0.0, 0.0)), 1.0)
        .unwrap();
    writer
        .save(&mesh, &State::uniform(&mesh, CellState::new(2.0, 0.0, 0.0)), 1.00000001)
        .unwrap();

    assert_eq!(writer.snapshots().len(), 1);
    assert_eq!(writer.snapshots()[0].time, 1.00000001);
    let raw = fs::read_to_string(&writer.snapshots()[0].path).unwrap();
    assert_eq!(raw, "1 2 0 0\n");
}

#[test]
fn rejects_bad_interval_and_file_folder() {
    let dir = tempfile::tempdir().unwrap();
    for interval in [0.0, -1.0, f64::NAN, f64::INFINITY] {
        assert!(matches!(
            ResultWriter::new(dir.path(), interval),
            Err(HydroSieveError::InvalidWriteInterval(_))
        ));
    }
    let file = dir.path().join("taken");
    fs::write(&file, "").unwrap();
    assert!(matches!(
        ResultWriter::new(&file, 1.0),
        Err(HydroSieveError::InvalidConfig { .. })
    ));
}

#[test]
fn converts_snapshots_to_gnuplot_and_vtk() {
    let dir = tempfile::tempdir().unwrap();
    let mesh = grid(2, 1);
    let bathymetry = Bathymetry::flat(&mesh, 0.5);
    let state = State::uniform(&mesh, CellState::new(1.0, 2.0, 0.0));

    let mut writer = ResultWriter::new(dir.path(), 1.0).unwrap();
    writer.save(&mesh, &state, 1.0).unwrap();
    writer.save(&mesh, &state, 2.0).unwrap();

    writer
        .convert_all(&mesh, &bathymetry, OutputMode::Raw)
        .unwrap();
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 2);

    writer
        .convert_all(&mesh, &bathymetry, OutputMode::Gnuplot)
        .unwrap();
    let dat = fs::read_to_string(dir.path().join("result_1.000000e+00.dat")).unwrap();
    assert_eq!(dat, "# x y bed h u v\n0.5 0.5 0.5 1 2 0\n1.5 0.5 0.5 1 2 0\n");

    writer
        .convert_all(&mesh, &bathymetry, OutputMode::Vtk)
        .unwrap();
    let vtk = fs::read_to_string(dir.path().join("result_2.000000e+00.vtk")).unwrap();
    assert!(vtk.starts_with("# vtk DataFile Version 3.0\n"));
    assert!(vtk.contains("POINTS 6 double"));
    assert!(vtk.contains("CELLS 2 10"));
    assert!(vtk.contains("VECTORS velocity double\n2 0 0\n2 0 0\n"));
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 6);
}
