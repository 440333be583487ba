//! Data module: cell state, bed elevation, roughness and forcing series
#![warn(missing_docs)]

pub mod bathymetry;
pub mod forcing;
pub mod manning;
pub mod state;

pub use bathymetry::Bathymetry;
pub use forcing::{ForcingSeries, ForcingSource, InlineForcing};
pub use manning::Manning;
pub use state::{CellState, State};
