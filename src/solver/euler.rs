//! First-order explicit finite volume scheme.
//!
//! Interface fluxes use the Rusanov (local Lax-Friedrichs) approximate Riemann
//! solver on hydrostatically reconstructed depths, which keeps a lake at rest
//! exactly at rest over a non-flat bed. Cells shallower than the dry threshold
//! carry no velocity.
//!
//! # Open boundaries
//! Wall ghosts are used as their boundary condition wrote them. Behind an
//! edge driven by an inflow or outflow condition (the mesh classification
//! unless [`ResolutionMethod::set_boundary_kinds`] says otherwise) the ghost
//! only imposes the normal velocity. The ghost takes the inner water level
//! (never shallower than the depth the condition weighted its discharge
//! with) and the inner tangential velocity. Its normal velocity is mirrored
//! so that the interface mass flux is the depth-weighted discharge the
//! condition distributed: over a flat wet bed the mass through an inflow
//! group is exactly the hydrograph discharge. The inner water level is
//! written back as the ghost depth so rating curves weigh with it on the
//! next step.
//!
//! # Friction
//! Manning bed friction is applied semi-implicitly after the flux update:
//! `q /= 1 + dt * g * n^2 * |V| / h^(4/3)`.

use crate::boundary::MIN_DEPTH;
use crate::data::{Bathymetry, CellState, Manning, State};
use crate::mesh_error::HydroSieveError;
use crate::solver::resolution::ResolutionMethod;
use crate::topology::{BoundaryKind, CellRef, Mesh};

/// Default depth below which a cell is dry.
pub const DRY_DEPTH: f64 = 1e-6;

/// Explicit Euler step with a first-order Rusanov flux.
#[derive(Clone, Debug, PartialEq)]
pub struct EulerFirstOrder {
    gravity: f64,
    dry_depth: f64,
    manning: Manning,
    boundary_kinds: Vec<BoundaryKind>,
}

impl EulerFirstOrder {
    /// Frictionless resolver with the default dry threshold.
    pub fn new(gravity: f64) -> Self {
        Self {
            gravity,
            dry_depth: DRY_DEPTH,
            manning: Manning::none(),
            boundary_kinds: Vec::new(),
        }
    }

    /// Replace the dry threshold.
    pub fn with_dry_depth(mut self, dry_depth: f64) -> Self {
        self.dry_depth = dry_depth;
        self
    }

    /// Enable Manning bed friction.
    pub fn with_manning(mut self, manning: Manning) -> Self {
        self.manning = manning;
        self
    }

    /// Gravitational acceleration.
    pub fn gravity(&self) -> f64 {
        self.gravity
    }

    /// Per-cell roughness; empty when friction is off.
    pub fn manning(&self) -> &Manning {
        &self.manning
    }

    fn boundary_kind(&self, mesh: &Mesh, b: usize) -> BoundaryKind {
        self.boundary_kinds
            .get(b)
            .copied()
            .unwrap_or_else(|| mesh.boundaries()[b].kind())
    }

    fn velocity(&self, s: &CellState) -> (f64, f64) {
        if s.h > self.dry_depth { (s.u, s.v) } else { (0.0, 0.0) }
    }

    /// Ghost seen by the flux behind an inflow/outflow edge.
    fn open_ghost(
        &self,
        kind: BoundaryKind,
        inner: CellState,
        ghost: CellState,
        z: (f64, f64),
        n: [f64; 2],
    ) -> CellState {
        // depth the condition used to weigh its discharge
        let weight = match kind {
            BoundaryKind::Outflow => ghost.h,
            _ => inner.h,
        }
        .max(MIN_DEPTH);
        let h = (inner.h + z.0 - z.1).max(weight);
        let (u, v) = self.velocity(&inner);
        let un_inner = u * n[0] + v * n[1];
        let ut = -u * n[1] + v * n[0];
        let un_imposed = ghost.u * n[0] + ghost.v * n[1];
        let un = 2.0 * weight * un_imposed / h - un_inner;
        CellState::new(h, un * n[0] - ut * n[1], un * n[1] + ut * n[0])
    }

    /// Rusanov flux of `(h, hu, hv)` across normal `n`.
    fn rusanov(&self, left: (f64, f64, f64), right: (f64, f64, f64), n: [f64; 2]) -> [f64; 3] {
        let g = self.gravity;
        let physical = |(h, u, v): (f64, f64, f64)| {
            let un = u * n[0] + v * n[1];
            let p = 0.5 * g * h * h;
            [h * un, h * u * un + p * n[0], h * v * un + p * n[1]]
        };
        let speed = |(h, u, v): (f64, f64, f64)| (u * n[0] + v * n[1]).abs() + (g * h).sqrt();
        let s = speed(left).max(speed(right));
        let fl = physical(left);
        let fr = physical(right);
        let ul = [left.0, left.0 * left.1, left.0 * left.2];
        let ur = [right.0, right.0 * right.1, right.0 * right.2];
        std::array::from_fn(|k| 0.5 * (fl[k] + fr[k]) - 0.5 * s * (ur[k] - ul[k]))
    }

    /// Semi-implicit Manning damping factor for one cell.
    fn friction_factor(&self, n: f64, h: f64, u: f64, v: f64, dt: f64) -> f64 {
        if n <= 0.0 || h <= self.dry_depth {
            return 1.0;
        }
        1.0 + dt * self.gravity * n * n * u.hypot(v) / h.powf(4.0 / 3.0)
    }
}

impl ResolutionMethod for EulerFirstOrder {
    fn resolve(
        &self,
        mut state: State,
        dt: f64,
        mesh: &Mesh,
        bathymetry: &Bathymetry,
    ) -> Result<State, HydroSieveError> {
        let g = self.gravity;
        let mut outflux = vec![[0.0f64; 3]; mesh.cell_count()];
        let mut open_depths = Vec::new();

        for edge in mesh.edges() {
            let [l, r] = edge.cells();
            let n = edge.normal();
            let (zl, zr) = (bathymetry[l], bathymetry[r]);
            let sl = state[l];
            let sr = match r {
                CellRef::Ghost(b) => match self.boundary_kind(mesh, b) {
                    BoundaryKind::Wall => state[r],
                    kind => {
                        open_depths.push((r, l, zl - zr));
                        self.open_ghost(kind, sl, state[r], (zl, zr), n)
                    }
                },
                CellRef::Real(_) => state[r],
            };
            let z_star = zl.max(zr);
            let hl = (sl.h + zl - z_star).max(0.0);
            let hr = (sr.h + zr - z_star).max(0.0);
            let (ul, vl) = self.velocity(&sl);
            let (ur, vr) = self.velocity(&sr);
            let f = self.rusanov((hl, ul, vl), (hr, ur, vr), n);
            let len = edge.length();

            if let Some(c) = l.real() {
                let dp = 0.5 * g * (sl.h.max(0.0).powi(2) - hl * hl);
                let acc = &mut outflux[c];
                acc[0] += len * f[0];
                acc[1] += len * (f[1] + dp * n[0]);
                acc[2] += len * (f[2] + dp * n[1]);
            }
            if let Some(c) = r.real() {
                let dp = 0.5 * g * (sr.h.max(0.0).powi(2) - hr * hr);
                let acc = &mut outflux[c];
                acc[0] -= len * f[0];
                acc[1] -= len * (f[1] + dp * n[0]);
                acc[2] -= len * (f[2] + dp * n[1]);
            }
        }

        for (c, ((cell, s), flux)) in mesh
            .cells()
            .iter()
            .zip(state.real_mut())
            .zip(&outflux)
            .enumerate()
        {
            let k = dt / cell.surface();
            let (u, v) = self.velocity(s);
            let h = s.h - k * flux[0];
            let hu = s.h * u - k * flux[1];
            let hv = s.h * v - k * flux[2];
            *s = if h > self.dry_depth {
                let (u, v) = (hu / h, hv / h);
                let damping = self.friction_factor(self.manning.coefficient(c), h, u, v, dt);
                CellState::new(h, u / damping, v / damping)
            } else {
                CellState::new(h.max(0.0), 0.0, 0.0)
            };
        }
        for (ghost, inner, dz) in open_depths {
            state[ghost].h = (state[inner].h + dz).max(0.0);
        }
        Ok(state)
    }

    fn set_boundary_kinds(&mut self, kinds: &[BoundaryKind]) {
        self.boundary_kinds = kinds.to_vec();
    }
}
