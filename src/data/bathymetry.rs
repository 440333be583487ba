//! Bed elevation of real and ghost cells.

use crate::mesh_error::HydroSieveError;
use crate::topology::{BoundaryOrigins, CellRef, Mesh};
use std::ops::Index;

/// Bed elevation per cell.
///
/// A ghost takes the elevation of the real cell it mirrors unless its
/// boundary came from an inlet/outlet record, which supplies its own value.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Bathymetry {
    real: Vec<f64>,
    ghost: Vec<f64>,
}

impl Bathymetry {
    /// Build from one elevation per real cell, in mesh order.
    pub fn new(
        mesh: &Mesh,
        cell_beds: Vec<f64>,
        origins: &BoundaryOrigins,
    ) -> Result<Self, HydroSieveError> {
        if cell_beds.len() != mesh.cell_count() {
            return Err(HydroSieveError::InvariantViolation(format!(
                "{} bed elevations for {} cells",
                cell_beds.len(),
                mesh.cell_count()
            )));
        }
        let ghost = (0..mesh.ghost_count())
            .map(|b| {
                origins
                    .ghost_bed(b)
                    .unwrap_or(cell_beds[mesh.ghost_owner(b)])
            })
            .collect();
        Ok(Self {
            real: cell_beds,
            ghost,
        })
    }

    /// Replace the elevation of the cells named in an `id bed` table.
    ///
    /// `cell_beds` is in mesh order; an id absent from the mesh is an error.
    pub fn override_cell_beds(
        mesh: &Mesh,
        cell_beds: &mut [f64],
        table: &[(i64, f64)],
    ) -> Result<(), HydroSieveError> {
        for &(id, bed) in table {
            let cell = mesh.cell_by_id(id).ok_or(HydroSieveError::MissingCell(id))?;
            cell_beds[cell] = bed;
        }
        Ok(())
    }

    /// Constant bed elevation everywhere.
    pub fn flat(mesh: &Mesh, z: f64) -> Self {
        Self {
            real: vec![z; mesh.cell_count()],
            ghost: vec![z; mesh.ghost_count()],
        }
    }

    /// Elevation of `cell`, if it exists.
    pub fn get(&self, cell: CellRef) -> Option<f64> {
        match cell {
            CellRef::Real(i) => self.real.get(i).copied(),
            CellRef::Ghost(b) => self.ghost.get(b).copied(),
        }
    }

    /// Real cell elevations in mesh order.
    pub fn real(&self) -> &[f64] {
        &self.real
    }

    /// Ghost elevations in boundary order.
    pub fn ghosts(&self) -> &[f64] {
        &self.ghost
    }
}

impl Index<CellRef> for Bathymetry {
    type Output = f64;

    fn index(&self, cell: CellRef) -> &f64 {
        match cell {
            CellRef::Real(i) => &self.real[i],
            CellRef::Ghost(b) => &self.ghost[b],
        }
    }
}
