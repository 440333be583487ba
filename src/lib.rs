#![cfg_attr(docsrs, feature(doc_cfg))]
//! # hydro-sieve
//!
//! hydro-sieve simulates two-dimensional shallow-water flow on unstructured
//! triangle/quadrilateral meshes with a cell-centred finite volume method. It
//! provides mesh topology with ghost cells behind every boundary edge,
//! group-based boundary conditions driven by forcing series, and a
//! time-stepping loop with a pluggable resolver.
//!
//! ## Features
//! - Arena-based [`topology::Mesh`] built from raw vertex/cell/inlet/outlet
//!   records by [`topology::MeshBuilder`], with invariant checking
//! - Wall, imposed discharge and rating-curve [`boundary`] conditions selected
//!   per boundary group through a string-keyed registry
//! - First-order Rusanov resolver with hydrostatic reconstruction, open
//!   inflow/outflow boundaries and semi-implicit Manning friction; fixed and
//!   CFL time steps
//! - Readers for `.geo` meshes, boundary descriptions, forcing series and
//!   initial states; raw, gnuplot and legacy VTK snapshots
//! - JSON or YAML configuration via `serde`
//!
//! ## Determinism
//!
//! Mesh construction and the time loop are single-threaded and deterministic:
//! edges and boundaries are numbered in creation order and boundary groups
//! are visited in ascending order.
//!
//! ## Usage
//!
//! ```no_run
//! use hydro_sieve::prelude::*;
//!
//! # fn main() -> Result<(), HydroSieveError> {
//! let config = SimulationConfig::from_path("case/config.json")?;
//! let mut model = ShallowWaterModel::from_config(&config)?;
//! let summary = model.run()?;
//! println!("reached t={} in {} steps", summary.final_time, summary.steps);
//! # Ok(())
//! # }
//! ```

pub mod boundary;
pub mod config;
pub mod data;
pub mod debug_invariants;
pub mod geometry;
pub mod io;
pub mod mesh_error;
pub mod solver;
pub mod topology;

pub use debug_invariants::DebugInvariants;

/// A convenient prelude to import the most-used traits & types:
pub mod prelude {
    pub use crate::boundary::{
        BoundaryCondition, BoundaryDescription, BoundaryGroups, BoundaryRegistry,
    };
    pub use crate::config::SimulationConfig;
    pub use crate::data::{Bathymetry, CellState, ForcingSeries, ForcingSource, Manning, State};
    pub use crate::debug_invariants::DebugInvariants;
    pub use crate::io::{OutputMode, ResultSink, ResultWriter};
    pub use crate::mesh_error::HydroSieveError;
    pub use crate::solver::{
        LoopListener, ModelParts, ResolutionMethod, RunSummary, ShallowWaterModel, TimeStepPolicy,
    };
    pub use crate::topology::{BoundaryKind, CellRef, Mesh, MeshBuilder};
}
