//! Legacy VTK (`.vtk`) writer for snapshots.
//!
//! Writes an ASCII `UNSTRUCTURED_GRID` with the mesh vertices, the real cells
//! as triangles/quads, and per-cell data (`h`, `bed`, `surface`, `velocity`).
//! The external cell ids and the snapshot time are preserved as `FIELD`
//! arrays.

use crate::data::{Bathymetry, CellState};
use crate::mesh_error::HydroSieveError;
use crate::topology::Mesh;
use std::io::Write;

const FIELD_CELL_IDS: &str = "hydro_sieve:cell_ids";
const FIELD_TIME: &str = "TIME";

#[derive(Debug, Default, Clone)]
pub struct VtkWriter;

impl VtkWriter {
    fn write_field_array<W: Write>(
        writer: &mut W,
        name: &str,
        num_tuples: usize,
        data_type: &str,
        values: &[String],
    ) -> Result<(), HydroSieveError> {
        writeln!(writer, "{name} 1 {num_tuples} {data_type}")?;
        let mut line_len = 0usize;
        for value in values {
            if line_len + value.len() + 1 > 70 {
                writeln!(writer)?;
                line_len = 0;
            }
            if line_len > 0 {
                write!(writer, " ")?;
                line_len += 1;
            }
            write!(writer, "{value}")?;
            line_len += value.len();
        }
        writeln!(writer)?;
        Ok(())
    }

    fn write_scalars<W: Write>(
        writer: &mut W,
        name: &str,
        values: impl Iterator<Item = f64>,
    ) -> Result<(), HydroSieveError> {
        writeln!(writer, "SCALARS {name} double 1")?;
        writeln!(writer, "LOOKUP_TABLE default")?;
        for value in values {
            writeln!(writer, "{value}")?;
        }
        Ok(())
    }

    /// Write one snapshot. `rows` may list cells in any order; cells missing
    /// from `rows` are written dry and at rest.
    pub fn write<W: Write>(
        &self,
        mut writer: W,
        mesh: &Mesh,
        bathymetry: &Bathymetry,
        rows: &[(i64, CellState)],
        time: f64,
    ) -> Result<(), HydroSieveError> {
        let mut values = vec![CellState::default(); mesh.cell_count()];
        for &(id, s) in rows {
            let c = mesh.cell_by_id(id).ok_or(HydroSieveError::MissingCell(id))?;
            values[c] = s;
        }

        writeln!(writer, "# vtk DataFile Version 3.0")?;
        writeln!(writer, "hydro-sieve t={time}")?;
        writeln!(writer, "ASCII")?;
        writeln!(writer, "DATASET UNSTRUCTURED_GRID")?;
        writeln!(writer, "FIELD FieldData 1")?;
        Self::write_field_array(&mut writer, FIELD_TIME, 1, "double", &[time.to_string()])?;

        writeln!(writer, "POINTS {} double", mesh.vertex_count())?;
        for v in mesh.vertices() {
            let [x, y] = v.coords();
            writeln!(writer, "{x} {y} 0")?;
        }

        let total: usize = mesh.cells().iter().map(|c| c.vertices().len() + 1).sum();
        writeln!(writer, "CELLS {} {}", mesh.cell_count(), total)?;
        for cell in mesh.cells() {
            write!(writer, "{}", cell.vertices().len())?;
            for idx in cell.vertices() {
                write!(writer, " {idx}")?;
            }
            writeln!(writer)?;
        }
        writeln!(writer, "CELL_TYPES {}", mesh.cell_count())?;
        for cell in mesh.cells() {
            writeln!(writer, "{}", cell.shape().vtk_code())?;
        }

        writeln!(writer, "CELL_DATA {}", mesh.cell_count())?;
        Self::write_scalars(&mut writer, "h", values.iter().map(|s| s.h))?;
        Self::write_scalars(&mut writer, "bed", bathymetry.real().iter().copied())?;
        Self::write_scalars(&mut writer, "surface", mesh.cells().iter().map(|c| c.surface()))?;
        writeln!(writer, "VECTORS velocity double")?;
        for s in &values {
            writeln!(writer, "{} {} 0", s.u, s.v)?;
        }

        writeln!(writer, "FIELD FieldData 1")?;
        let ids: Vec<String> = mesh.cells().iter().map(|c| c.id().to_string()).collect();
        Self::write_field_array(&mut writer, FIELD_CELL_IDS, ids.len(), "long", &ids)?;
        Ok(())
    }
}
