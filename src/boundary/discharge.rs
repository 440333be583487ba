//! Imposed inflow discharge distributed over an inlet group.

use crate::boundary::{BoundaryCondition, MIN_DEPTH, distribution_weight};
use crate::data::{Bathymetry, ForcingSeries, State};
use crate::topology::{BoundaryKind, CellRef, Mesh};

/// Inflow condition driven by a hydrograph `q(t)`.
///
/// The discharge is split across the group's edges in proportion to
/// `h^(2/3)` of the inner cells, normalised by `sum(h^(5/3) * length)`.
#[derive(Clone, Debug)]
pub struct Discharge1 {
    group: u32,
    boundaries: Vec<usize>,
    hydrograph: ForcingSeries,
}

impl Discharge1 {
    pub fn new(group: u32, boundaries: Vec<usize>, hydrograph: ForcingSeries) -> Self {
        Self {
            group,
            boundaries,
            hydrograph,
        }
    }

    pub fn hydrograph(&self) -> &ForcingSeries {
        &self.hydrograph
    }
}

impl BoundaryCondition for Discharge1 {
    fn kind(&self) -> BoundaryKind {
        BoundaryKind::Inflow
    }

    fn group(&self) -> u32 {
        self.group
    }

    fn boundaries(&self) -> &[usize] {
        &self.boundaries
    }

    fn update(&self, mesh: &Mesh, _bathymetry: &Bathymetry, state: &mut State, t: f64) {
        let q = self.hydrograph.value_at(t);
        let depth = |b: usize, state: &State| state[mesh.boundary_cell(b)].h.max(MIN_DEPTH);
        let sum_pow: f64 = self
            .boundaries
            .iter()
            .map(|&b| distribution_weight(depth(b, state), mesh, b))
            .sum();
        for &b in &self.boundaries {
            let h = depth(b, state);
            let inflow = -q * h.powf(2.0 / 3.0) / sum_pow;
            let [nx, ny] = mesh.edges()[mesh.boundaries()[b].edge()].normal();
            let g = &mut state[CellRef::Ghost(b)];
            let v = g.v;
            g.u = nx * inflow - ny * v;
            g.v = ny * inflow - nx * v;
        }
    }
}
