//! Gnuplot-friendly snapshot columns: `x y bed h u v` per cell.

use crate::data::{Bathymetry, CellState};
use crate::mesh_error::HydroSieveError;
use crate::topology::{CellRef, Mesh};
use std::io::Write;

pub fn write_gnuplot<W: Write>(
    mut writer: W,
    mesh: &Mesh,
    bathymetry: &Bathymetry,
    rows: &[(i64, CellState)],
) -> Result<(), HydroSieveError> {
    writeln!(writer, "# x y bed h u v")?;
    for &(id, s) in rows {
        let c = mesh.cell_by_id(id).ok_or(HydroSieveError::MissingCell(id))?;
        let [x, y] = mesh.cells()[c].center();
        let bed = bathymetry[CellRef::Real(c)];
        writeln!(writer, "{x} {y} {bed} {} {} {}", s.h, s.u, s.v)?;
    }
    Ok(())
}
