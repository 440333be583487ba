//! Time-step selection.

use crate::data::State;
use crate::mesh_error::HydroSieveError;
use crate::solver::euler::DRY_DEPTH;
use crate::topology::Mesh;

/// Chooses the next time step from the current state.
pub trait TimeStepPolicy {
    fn estimate(&self, state: &State, mesh: &Mesh) -> Result<f64, HydroSieveError>;
}

/// Always the same step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FixedTimeStep(pub f64);

impl TimeStepPolicy for FixedTimeStep {
    fn estimate(&self, _state: &State, _mesh: &Mesh) -> Result<f64, HydroSieveError> {
        checked_step(self.0)
    }
}

/// Courant-Friedrichs-Lewy step: `cfl * min(L / (|u| + sqrt(g h)))` over wet
/// cells, with the characteristic length `L = 2 * surface / perimeter`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CflTimeStep {
    pub cfl: f64,
    pub gravity: f64,
    /// Step used when no cell carries a wave.
    pub fallback: f64,
}

impl TimeStepPolicy for CflTimeStep {
    fn estimate(&self, state: &State, mesh: &Mesh) -> Result<f64, HydroSieveError> {
        let min_ratio = mesh
            .cells()
            .iter()
            .zip(state.real())
            .filter(|(_, s)| s.h > DRY_DEPTH)
            .filter_map(|(cell, s)| {
                let wave = s.u.hypot(s.v) + (self.gravity * s.h).sqrt();
                (wave > 0.0).then(|| 2.0 * cell.surface() / cell.perimeter() / wave)
            })
            .fold(f64::INFINITY, f64::min);
        let dt = if min_ratio.is_finite() {
            self.cfl * min_ratio
        } else {
            self.fallback
        };
        checked_step(dt)
    }
}

/// Reject zero, negative and non-finite steps.
pub fn checked_step(dt: f64) -> Result<f64, HydroSieveError> {
    if dt.is_finite() && dt > 0.0 {
        Ok(dt)
    } else {
        Err(HydroSieveError::NonPositiveTimeStep(dt))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::CellState;
    use crate::topology::MeshBuilder;

    fn square() -> Mesh {
        let mut b = MeshBuilder::new();
        b.add_vertex(1, 0.0, 0.0)
            .add_vertex(2, 2.0, 0.0)
            .add_vertex(3, 2.0, 2.0)
            .add_vertex(4, 0.0, 2.0)
            .add_cell(1, [1, 2, 3, 4]);
        b.build().unwrap()
    }

    #[test]
    fn cfl_matches_closed_form() {
        let mesh = square();
        let g = 9.81;
        let state = State::uniform(&mesh, CellState::new(1.0, 3.0, 4.0));
        let policy = CflTimeStep {
            cfl: 0.5,
            gravity: g,
            fallback: 1.0,
        };
        // L = 2 * 4 / 8 = 1
        let expected = 0.5 / (5.0 + g.sqrt());
        assert!((policy.estimate(&state, &mesh).unwrap() - expected).abs() < 1e-12);
    }

    #[test]
    fn dry_mesh_uses_fallback() {
        let mesh = square();
        let state = State::uniform(&mesh, CellState::default());
        let policy = CflTimeStep {
            cfl: 0.8,
            gravity: 9.81,
            fallback: 0.25,
        };
        assert_eq!(policy.estimate(&state, &mesh).unwrap(), 0.25);
    }

    #[test]
    fn non_positive_steps_are_rejected() {
        let mesh = square();
        let state = State::uniform(&mesh, CellState::default());
        for dt in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                FixedTimeStep(dt).estimate(&state, &mesh),
                Err(HydroSieveError::NonPositiveTimeStep(_))
            ));
        }
    }
}
