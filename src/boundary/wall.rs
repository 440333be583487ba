//! Reflective wall condition.

use crate::boundary::BoundaryCondition;
use crate::data::{Bathymetry, State};
use crate::topology::{BoundaryKind, CellRef, Mesh};

/// Mirrors the inner cell into the ghost: the free surface is continued and
/// the x velocity is reflected.
#[derive(Clone, Debug)]
pub struct Wall {
    group: u32,
    boundaries: Vec<usize>,
}

impl Wall {
    pub fn new(group: u32, boundaries: Vec<usize>) -> Self {
        Self { group, boundaries }
    }
}

impl BoundaryCondition for Wall {
    fn kind(&self) -> BoundaryKind {
        BoundaryKind::Wall
    }

    fn group(&self) -> u32 {
        self.group
    }

    fn boundaries(&self) -> &[usize] {
        &self.boundaries
    }

    fn update(&self, mesh: &Mesh, bathymetry: &Bathymetry, state: &mut State, _t: f64) {
        for &b in &self.boundaries {
            let inner = mesh.boundary_cell(b);
            let ghost = CellRef::Ghost(b);
            let left = state[inner];
            let h = left.h + bathymetry[inner] - bathymetry[ghost];
            let g = &mut state[ghost];
            g.h = h;
            g.u = -left.u;
            g.v = left.v;
        }
    }
}
