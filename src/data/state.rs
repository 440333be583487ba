//! Per-cell hydraulic state.

use crate::debug_invariants::{DebugInvariants, ensure};
use crate::mesh_error::HydroSieveError;
use crate::topology::{CellRef, Mesh};
use std::ops::{Index, IndexMut};

/// Water depth and depth-averaged velocity of one cell.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CellState {
    /// Water depth.
    pub h: f64,
    /// Velocity along x.
    pub u: f64,
    /// Velocity along y.
    pub v: f64,
}

impl CellState {
    /// Construct a cell state.
    pub const fn new(h: f64, u: f64, v: f64) -> Self {
        Self { h, u, v }
    }
}

/// State of every real and ghost cell of a mesh at one instant.
///
/// Real cells are stored in mesh order and ghosts in boundary order, so a
/// [`CellRef`] indexes the state directly.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct State {
    real: Vec<CellState>,
    ghost: Vec<CellState>,
}

impl State {
    /// Seed a state from one entry per real cell; ghosts start at rest and dry.
    pub fn new(mesh: &Mesh, initial: Vec<CellState>) -> Result<Self, HydroSieveError> {
        if initial.len() != mesh.cell_count() {
            return Err(HydroSieveError::InitialStateLength {
                expected: mesh.cell_count(),
                found: initial.len(),
            });
        }
        Ok(Self {
            real: initial,
            ghost: vec![CellState::default(); mesh.ghost_count()],
        })
    }

    /// Uniform state over every real cell.
    pub fn uniform(mesh: &Mesh, value: CellState) -> Self {
        Self {
            real: vec![value; mesh.cell_count()],
            ghost: vec![CellState::default(); mesh.ghost_count()],
        }
    }

    /// Assemble a state from already sized parts.
    pub fn from_parts(real: Vec<CellState>, ghost: Vec<CellState>) -> Self {
        Self { real, ghost }
    }

    /// Real cell entries in mesh order.
    pub fn real(&self) -> &[CellState] {
        &self.real
    }

    /// Mutable real cell entries.
    pub fn real_mut(&mut self) -> &mut [CellState] {
        &mut self.real
    }

    /// Ghost entries in boundary order.
    pub fn ghosts(&self) -> &[CellState] {
        &self.ghost
    }

    /// Entry for `cell`, if it exists.
    pub fn get(&self, cell: CellRef) -> Option<&CellState> {
        match cell {
            CellRef::Real(i) => self.real.get(i),
            CellRef::Ghost(b) => self.ghost.get(b),
        }
    }

    /// Mutable entry for `cell`, if it exists.
    pub fn get_mut(&mut self, cell: CellRef) -> Option<&mut CellState> {
        match cell {
            CellRef::Real(i) => self.real.get_mut(i),
            CellRef::Ghost(b) => self.ghost.get_mut(b),
        }
    }
}

impl Index<CellRef> for State {
    type Output = CellState;

    fn index(&self, cell: CellRef) -> &CellState {
        match cell {
            CellRef::Real(i) => &self.real[i],
            CellRef::Ghost(b) => &self.ghost[b],
        }
    }
}

impl IndexMut<CellRef> for State {
    fn index_mut(&mut self, cell: CellRef) -> &mut CellState {
        match cell {
            CellRef::Real(i) => &mut self.real[i],
            CellRef::Ghost(b) => &mut self.ghost[b],
        }
    }
}

impl DebugInvariants for State {
    fn debug_assert_invariants(&self) {
        crate::debug_invariants!(self.validate_invariants(), "State");
    }

    /// Real cells must carry a finite, non-negative depth and finite
    /// velocities. Ghost entries are left to their boundary conditions.
    fn validate_invariants(&self) -> Result<(), HydroSieveError> {
        for (i, s) in self.real.iter().enumerate() {
            ensure(s.h.is_finite() && s.h >= 0.0, || {
                format!("cell slot {i} has depth {}", s.h)
            })?;
            ensure(s.u.is_finite() && s.v.is_finite(), || {
                format!("cell slot {i} has velocity ({}, {})", s.u, s.v)
            })?;
        }
        Ok(())
    }
}
