//! Structural invariant checks for [`Mesh`].

use crate::debug_invariants::{DebugInvariants, ensure};
use crate::mesh_error::HydroSieveError;
use crate::topology::mesh::{CellRef, Mesh};
use hashbrown::HashSet;

const SURFACE_TOL: f64 = 1e-9;

impl DebugInvariants for Mesh {
    fn debug_assert_invariants(&self) {
        crate::debug_invariants!(self.validate_invariants(), "Mesh");
    }

    fn validate_invariants(&self) -> Result<(), HydroSieveError> {
        check_vertices(self)?;
        check_edges(self)?;
        check_cells(self)?;
        check_boundaries(self)?;
        check_surface(self)
    }
}

fn check_vertices(mesh: &Mesh) -> Result<(), HydroSieveError> {
    ensure(mesh.vertex_index.len() == mesh.vertices.len(), || {
        format!(
            "{} vertices but {} distinct ids",
            mesh.vertices.len(),
            mesh.vertex_index.len()
        )
    })
}

fn check_edges(mesh: &Mesh) -> Result<(), HydroSieveError> {
    let mut seen = HashSet::with_capacity(mesh.edges.len());
    for edge in &mesh.edges {
        let [a, b] = edge.vertices;
        let (ia, ib) = (mesh.vertices[a].id, mesh.vertices[b].id);
        let key = if ia <= ib { (ia, ib) } else { (ib, ia) };
        ensure(seen.insert(key), || format!("duplicate edge for vertices {key:?}"))?;

        let [s0, s1] = edge.cells;
        ensure(s0 != s1, || format!("edge {} has identical cell slots", edge.id))?;
        ensure(!s0.is_ghost(), || {
            format!("edge {} has a ghost in its first slot", edge.id)
        })?;
        ensure(edge.is_boundary() == s1.is_ghost(), || {
            format!("edge {} boundary flag disagrees with its second slot", edge.id)
        })?;
        if let Some(b) = edge.boundary {
            ensure(s1 == CellRef::Ghost(b), || {
                format!("edge {} is boundary {b} but its ghost is {s1:?}", edge.id)
            })?;
        }
    }
    Ok(())
}

fn check_cells(mesh: &Mesh) -> Result<(), HydroSieveError> {
    for (c, cell) in mesh.cells.iter().enumerate() {
        let n = cell.vertices.len();
        ensure(cell.edges.len() == n && cell.neighbors.len() == n, || {
            format!(
                "cell {} has {} vertices, {} edges, {} neighbours",
                cell.id,
                n,
                cell.edges.len(),
                cell.neighbors.len()
            )
        })?;
        let mut boundary = false;
        for (k, &e) in cell.edges.iter().enumerate() {
            let edge = &mesh.edges[e];
            let expected = [cell.vertices[k], cell.vertices[(k + 1) % n]];
            let reversed = [expected[1], expected[0]];
            ensure(edge.vertices == expected || edge.vertices == reversed, || {
                format!(
                    "cell {} local edge {} does not join vertices {} and {}",
                    cell.id,
                    k + 1,
                    k + 1,
                    (k + 1) % n + 1
                )
            })?;
            ensure(edge.cells.contains(&CellRef::Real(c)), || {
                format!(
                    "cell {} lists edge {} which does not reference it",
                    cell.id, edge.id
                )
            })?;
            boundary |= edge.is_boundary();
        }
        ensure(boundary == cell.boundary, || {
            format!(
                "cell {} boundary flag is {} but its edges say {}",
                cell.id, cell.boundary, boundary
            )
        })?;
    }
    Ok(())
}

fn check_boundaries(mesh: &Mesh) -> Result<(), HydroSieveError> {
    ensure(mesh.ghost_owners.len() == mesh.boundaries.len(), || {
        format!(
            "{} ghosts for {} boundaries",
            mesh.ghost_owners.len(),
            mesh.boundaries.len()
        )
    })?;
    for (b, boundary) in mesh.boundaries.iter().enumerate() {
        let edge = &mesh.edges[boundary.edge];
        ensure(edge.boundary == Some(b), || {
            format!("boundary {b} points at edge {} which does not own it", edge.id)
        })?;
        ensure(edge.cells[0] == CellRef::Real(mesh.ghost_owners[b]), || {
            format!("ghost {b} does not mirror the inner cell of edge {}", edge.id)
        })?;
    }
    Ok(())
}

fn check_surface(mesh: &Mesh) -> Result<(), HydroSieveError> {
    let sum: f64 = mesh.cells.iter().map(|c| c.surface).sum();
    ensure(
        (sum - mesh.surface).abs() <= SURFACE_TOL * sum.abs().max(1.0),
        || format!("mesh surface {} differs from cell sum {}", mesh.surface, sum),
    )
}
