//! Mesh topology for hydro-sieve.
//!
//! This module provides the unstructured mesh used by the solver:
//! - [`Mesh`] arenas of vertices, cells, edges and boundaries
//! - [`MeshBuilder`] to construct a mesh from raw records
//! - [`CellRef`] handles distinguishing real and ghost cells
//! - structural invariant checks through [`crate::DebugInvariants`]

pub mod builder;
pub mod cell_type;
pub mod mesh;
pub mod validation;

pub use builder::{BoundaryOrigin, BoundaryOrigins, BoundaryRecord, MeshBuilder, RawCell, RawVertex};
pub use cell_type::CellShape;
pub use mesh::{Boundary, BoundaryKind, Cell, CellRef, CellView, Edge, GHOST_CELL_ID, Mesh, Vertex};
