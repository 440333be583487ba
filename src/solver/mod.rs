//! Time stepping for the shallow-water equations.
//!
//! - [`model`]: the init/loop/finalize driver
//! - [`resolution`]: the pluggable resolver interface and scheme selection
//! - [`euler`]: first-order Rusanov resolver
//! - [`timestep`]: fixed and CFL step policies

pub mod euler;
pub mod model;
pub mod resolution;
pub mod timestep;

pub use euler::EulerFirstOrder;
pub use model::{LoopListener, ModelParts, RunSummary, ShallowWaterModel};
pub use resolution::{
    ResolutionMethod, SpatialScheme, TemporalScheme, ensure_supported, resolution_method,
};
pub use timestep::{CflTimeStep, FixedTimeStep, TimeStepPolicy};
