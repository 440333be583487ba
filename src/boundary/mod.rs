//! Ghost-cell boundary conditions.
//!
//! Every boundary edge of a mesh owns a ghost cell. Boundaries are grouped by
//! the group number of their inlet/outlet record (walls default to group 0)
//! and each group is driven by one [`BoundaryCondition`], which rewrites the
//! ghost entries of the state before every time step.

pub mod discharge;
pub mod rating_curve;
pub mod registry;
pub mod wall;

pub use discharge::Discharge1;
pub use rating_curve::RatingCurve;
pub use registry::{
    BoundaryConstructor, BoundaryDescription, BoundaryRegistry, BoundarySetup, GroupDescription,
};
pub use wall::Wall;

use crate::data::{Bathymetry, State};
use crate::topology::{BoundaryKind, BoundaryOrigins, Mesh};
use std::collections::BTreeMap;

/// Depth floor used when distributing a discharge.
pub const MIN_DEPTH: f64 = 1e-4;

/// A condition applied to one group of boundaries.
pub trait BoundaryCondition {
    /// Boundary classification this condition is meant for.
    fn kind(&self) -> BoundaryKind;
    fn group(&self) -> u32;
    /// Boundary indices driven by this condition.
    fn boundaries(&self) -> &[usize];
    /// Write the ghost entries of `state` for time `t`.
    fn update(&self, mesh: &Mesh, bathymetry: &Bathymetry, state: &mut State, t: f64);
}

/// Boundaries partitioned by group number.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BoundaryGroups {
    groups: BTreeMap<u32, Vec<usize>>,
}

impl BoundaryGroups {
    /// Group every boundary of `mesh` by its origin's group number.
    pub fn from_origins(mesh: &Mesh, origins: &BoundaryOrigins) -> Self {
        let mut groups: BTreeMap<u32, Vec<usize>> = BTreeMap::new();
        for b in 0..mesh.boundary_count() {
            groups.entry(origins.group(b)).or_default().push(b);
        }
        Self { groups }
    }

    /// Build from explicit `(boundary, group)` pairs.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (usize, u32)>) -> Self {
        let mut groups: BTreeMap<u32, Vec<usize>> = BTreeMap::new();
        for (b, g) in pairs {
            groups.entry(g).or_default().push(b);
        }
        Self { groups }
    }

    pub fn get(&self, group: u32) -> Option<&[usize]> {
        self.groups.get(&group).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Groups in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &[usize])> {
        self.groups.iter().map(|(&g, b)| (g, b.as_slice()))
    }
}

/// `h^(5/3) * length` of boundary `b`.
pub(crate) fn distribution_weight(h: f64, mesh: &Mesh, b: usize) -> f64 {
    let edge = &mesh.edges()[mesh.boundaries()[b].edge()];
    h.powf(5.0 / 3.0) * edge.length()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::CellState;
    use crate::topology::{BoundaryRecord, CellRef, MeshBuilder};

    // Unit square; local edge 4 (x = 0) is an inlet, local edge 2 (x = 1) an outlet.
    fn square() -> (Mesh, BoundaryOrigins) {
        let mut b = MeshBuilder::new();
        b.add_vertex(1, 0.0, 0.0)
            .add_vertex(2, 1.0, 0.0)
            .add_vertex(3, 1.0, 1.0)
            .add_vertex(4, 0.0, 1.0)
            .add_cell(1, [1, 2, 3, 4])
            .add_inlet(BoundaryRecord {
                cell: 1,
                local_edge: 4,
                ghost_bed: 0.0,
                group: 1,
            })
            .add_outlet(BoundaryRecord {
                cell: 1,
                local_edge: 2,
                ghost_bed: 0.0,
                group: 2,
            });
        b.build_with_origins().unwrap()
    }

    fn boundary_of(mesh: &Mesh, local_edge: usize) -> usize {
        mesh.edges()[mesh.cells()[0].edges()[local_edge - 1]]
            .boundary()
            .unwrap()
    }

    #[test]
    fn groups_follow_origins() {
        let (mesh, origins) = square();
        let groups = BoundaryGroups::from_origins(&mesh, &origins);
        assert_eq!(groups.len(), 3);
        assert_eq!(groups.get(0).unwrap().len(), 2);
        assert_eq!(groups.get(1).unwrap(), &[boundary_of(&mesh, 4)]);
        assert_eq!(groups.get(2).unwrap(), &[boundary_of(&mesh, 2)]);
    }

    #[test]
    fn discharge_points_into_the_domain() {
        let (mesh, _) = square();
        let inlet = boundary_of(&mesh, 4);
        let mut state = State::uniform(&mesh, CellState::new(1.0, 0.0, 0.0));
        let bathy = Bathymetry::flat(&mesh, 0.0);
        let hydrograph = crate::data::ForcingSeries::constant(2.0);
        Discharge1::new(1, vec![inlet], hydrograph).update(&mesh, &bathy, &mut state, 0.0);
        // normal is (-1, 0); q = 2 over a unit edge at h = 1
        let g = state[CellRef::Ghost(inlet)];
        assert!((g.u - 2.0).abs() < 1e-12);
        assert!(g.v.abs() < 1e-12);
    }

    #[test]
    fn rating_curve_uses_ghost_depth() {
        let (mesh, _) = square();
        let outlet = boundary_of(&mesh, 2);
        let mut state = State::uniform(&mesh, CellState::new(1.0, 0.0, 0.0));
        state[CellRef::Ghost(outlet)].h = 8.0;
        let bathy = Bathymetry::flat(&mesh, 0.0);
        RatingCurve::new(2, vec![outlet], crate::data::ForcingSeries::constant(3.0))
            .update(&mesh, &bathy, &mut state, 0.0);
        // 3 * 8^(2/3) / 8^(5/3) = 3 / 8
        assert!((state[CellRef::Ghost(outlet)].u - 0.375).abs() < 1e-12);
    }
}
