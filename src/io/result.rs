//! Periodic snapshots of the simulation state.
//!
//! [`ResultWriter`] writes one `result_<t>.raw` file per snapshot into its
//! result folder, `t` formatted as `%.6e` with a signed two-digit exponent
//! (`result_2.340000e-04.raw`). Each line holds `id h u v` for one real cell.
//! At the end of a run the saved snapshots can be converted to gnuplot or VTK.

use crate::data::{Bathymetry, CellState, State};
use crate::io::gnuplot::write_gnuplot;
use crate::io::vtk::VtkWriter;
use crate::io::{RelevantLines, parse_token, read_all};
use crate::mesh_error::HydroSieveError;
use crate::topology::Mesh;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Final format of the saved snapshots.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    /// Keep the raw `id h u v` files only.
    #[default]
    Raw,
    /// Add `x y bed h u v` files next to every snapshot.
    Gnuplot,
    /// Add legacy VTK files next to every snapshot.
    Vtk,
}

impl FromStr for OutputMode {
    type Err = HydroSieveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "raw" => Ok(OutputMode::Raw),
            "gnuplot" => Ok(OutputMode::Gnuplot),
            "vtk" => Ok(OutputMode::Vtk),
            other => Err(HydroSieveError::InvalidConfig {
                key: "output-mode".into(),
                value: other.to_string(),
                reason: "expected raw, gnuplot or vtk".into(),
            }),
        }
    }
}

/// Destination of simulation snapshots.
pub trait ResultSink {
    /// Whether a snapshot is due at time `t`. Calling this consumes the
    /// trigger: it answers `true` at most once per write interval.
    fn is_time_to_write(&mut self, t: f64) -> bool;
    /// Persist `state` at time `t`.
    fn save(&mut self, mesh: &Mesh, state: &State, t: f64) -> Result<(), HydroSieveError>;
    /// Convert every saved snapshot to `mode`.
    fn convert_all(
        &mut self,
        mesh: &Mesh,
        bathymetry: &Bathymetry,
        mode: OutputMode,
    ) -> Result<(), HydroSieveError>;
}

/// One saved snapshot.
#[derive(Clone, Debug, PartialEq)]
pub struct Snapshot {
    /// Simulated time of the save.
    pub time: f64,
    /// Raw file holding the snapshot.
    pub path: PathBuf,
}

/// File-backed [`ResultSink`].
#[derive(Clone, Debug)]
pub struct ResultWriter {
    folder: PathBuf,
    interval: f64,
    last_quotient: i64,
    snapshots: Vec<Snapshot>,
}

impl ResultWriter {
    /// Writer into `folder` (created if missing) every `interval` time units.
    pub fn new(folder: impl Into<PathBuf>, interval: f64) -> Result<Self, HydroSieveError> {
        if !(interval.is_finite() && interval > 0.0) {
            return Err(HydroSieveError::InvalidWriteInterval(interval));
        }
        let folder = folder.into();
        if folder.is_file() {
            return Err(HydroSieveError::InvalidConfig {
                key: "result-path".into(),
                value: folder.display().to_string(),
                reason: "points to a file, expected a folder".into(),
            });
        }
        std::fs::create_dir_all(&folder)?;
        Ok(Self {
            folder,
            interval,
            last_quotient: 0,
            snapshots: Vec::new(),
        })
    }

    /// Result folder.
    pub fn folder(&self) -> &Path {
        &self.folder
    }

    /// Time between snapshots.
    pub fn interval(&self) -> f64 {
        self.interval
    }

    /// Snapshots saved so far, in save order. A save whose file name repeats
    /// an earlier one replaces that entry.
    pub fn snapshots(&self) -> &[Snapshot] {
        &self.snapshots
    }

    /// Path of the raw snapshot for time `t`.
    pub fn snapshot_path(&self, t: f64) -> PathBuf {
        self.folder.join(format!("result_{}.raw", format_time(t)))
    }
}

impl ResultSink for ResultWriter {
    fn is_time_to_write(&mut self, t: f64) -> bool {
        let quotient = (t / self.interval).floor() as i64;
        if quotient > self.last_quotient {
            self.last_quotient = quotient;
            true
        } else {
            false
        }
    }

    fn save(&mut self, mesh: &Mesh, state: &State, t: f64) -> Result<(), HydroSieveError> {
        let path = self.snapshot_path(t);
        let mut out = BufWriter::new(File::create(&path)?);
        for (cell, s) in mesh.cells().iter().zip(state.real()) {
            writeln!(out, "{} {} {} {}", cell.id(), s.h, s.u, s.v)?;
        }
        out.flush()?;
        log::debug!("saved snapshot t={t} to {}", path.display());
        match self.snapshots.iter_mut().find(|s| s.path == path) {
            Some(previous) => {
                log::warn!(
                    "snapshot t={t} overwrites t={} in {}: times differ past 7 significant digits",
                    previous.time,
                    path.display()
                );
                previous.time = t;
            }
            None => self.snapshots.push(Snapshot { time: t, path }),
        }
        Ok(())
    }

    fn convert_all(
        &mut self,
        mesh: &Mesh,
        bathymetry: &Bathymetry,
        mode: OutputMode,
    ) -> Result<(), HydroSieveError> {
        let extension = match mode {
            OutputMode::Raw => return Ok(()),
            OutputMode::Gnuplot => "dat",
            OutputMode::Vtk => "vtk",
        };
        for snapshot in &self.snapshots {
            let rows = read_snapshot(BufReader::new(File::open(&snapshot.path)?))?;
            let target = snapshot.path.with_extension(extension);
            let mut out = BufWriter::new(File::create(&target)?);
            match mode {
                OutputMode::Gnuplot => write_gnuplot(&mut out, mesh, bathymetry, &rows)?,
                OutputMode::Vtk => VtkWriter.write(&mut out, mesh, bathymetry, &rows, snapshot.time)?,
                OutputMode::Raw => {}
            }
            out.flush()?;
        }
        log::info!(
            "converted {} snapshots to {:?} in {}",
            self.snapshots.len(),
            mode,
            self.folder.display()
        );
        Ok(())
    }
}

/// Read a raw snapshot back as `(cell id, state)` rows.
pub fn read_snapshot<R: Read>(reader: R) -> Result<Vec<(i64, CellState)>, HydroSieveError> {
    let contents = read_all(reader)?;
    let mut lines = RelevantLines::new(&contents);
    let mut rows = Vec::new();
    while let Some((line, t)) = lines.next_tokens() {
        let id = parse_token(&t, 0, "cell id", line)?;
        let state = CellState {
            h: parse_token(&t, 1, "h", line)?,
            u: parse_token(&t, 2, "u", line)?,
            v: parse_token(&t, 3, "v", line)?,
        };
        rows.push((id, state));
    }
    Ok(rows)
}

/// `%.6e` formatting with a signed exponent of at least two digits.
pub fn format_time(t: f64) -> String {
    let s = format!("{t:.6e}");
    match s.split_once('e') {
        Some((mantissa, exp)) => {
            let (sign, digits) = match exp.strip_prefix('-') {
                Some(d) => ('-', d),
                None => ('+', exp),
            };
            format!("{mantissa}e{sign}{digits:0>2}")
        }
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_format_matches_printf() {
        assert_eq!(format_time(0.0), "0.000000e+00");
        assert_eq!(format_time(0.000234), "2.340000e-04");
        assert_eq!(format_time(124.3255), "1.243255e+02");
        assert_eq!(format_time(1.23456789), "1.234568e+00");
        assert_eq!(format_time(1.0e123), "1.000000e+123");
    }

    #[test]
    fn output_mode_parses_case_insensitively() {
        assert_eq!("VTK".parse::<OutputMode>().unwrap(), OutputMode::Vtk);
        assert!("csv".parse::<OutputMode>().is_err());
    }

    #[test]
    fn snapshot_rows_round_trip_text() {
        let rows = read_snapshot("1 0.5 1 -2\n2 1 0 0\n".as_bytes()).unwrap();
        assert_eq!(rows[0], (1, CellState::new(0.5, 1.0, -2.0)));
        assert_eq!(rows.len(), 2);
    }
}
