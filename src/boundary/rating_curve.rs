//! Outflow discharge imposed through a rating curve.

use crate::boundary::{BoundaryCondition, MIN_DEPTH, distribution_weight};
use crate::data::{Bathymetry, ForcingSeries, State};
use crate::topology::{BoundaryKind, CellRef, Mesh};

/// Outflow condition driven by a time series `q(t)`.
///
/// Weights use the ghost depth and only the ghost x velocity is written.
#[derive(Clone, Debug)]
pub struct RatingCurve {
    group: u32,
    boundaries: Vec<usize>,
    curve: ForcingSeries,
}

impl RatingCurve {
    pub fn new(group: u32, boundaries: Vec<usize>, curve: ForcingSeries) -> Self {
        Self {
            group,
            boundaries,
            curve,
        }
    }

    pub fn curve(&self) -> &ForcingSeries {
        &self.curve
    }
}

impl BoundaryCondition for RatingCurve {
    fn kind(&self) -> BoundaryKind {
        BoundaryKind::Outflow
    }

    fn group(&self) -> u32 {
        self.group
    }

    fn boundaries(&self) -> &[usize] {
        &self.boundaries
    }

    fn update(&self, mesh: &Mesh, _bathymetry: &Bathymetry, state: &mut State, t: f64) {
        let q = self.curve.value_at(t);
        let depth = |b: usize, state: &State| state[CellRef::Ghost(b)].h.max(MIN_DEPTH);
        let sum_pow: f64 = self
            .boundaries
            .iter()
            .map(|&b| distribution_weight(depth(b, state), mesh, b))
            .sum();
        for &b in &self.boundaries {
            let h = depth(b, state);
            state[CellRef::Ghost(b)].u = q * h.powf(2.0 / 3.0) / sum_pow;
        }
    }
}
