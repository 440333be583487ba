//! HydroSieveError: Unified error type for hydro-sieve public APIs
//!
//! Every fallible operation in the crate (resource parsing, mesh construction,
//! boundary setup, configuration and the time loop) reports through this type so
//! that callers only have one error to propagate.

use thiserror::Error;

/// Unified error type for hydro-sieve operations.
#[derive(Debug, Error)]
pub enum HydroSieveError {
    /// A text resource could not be parsed.
    #[error("Parse error: {0}")]
    MeshIoParse(String),
    /// Underlying I/O failure while reading or writing a resource.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Two raw vertices share the same id.
    #[error("Topology error: duplicate vertex id {0}")]
    DuplicateVertex(u64),
    /// Two raw cells share the same id.
    #[error("Topology error: duplicate cell id {0}")]
    DuplicateCell(i64),
    /// A real cell id is zero or negative; those ids are reserved for ghosts.
    #[error("Topology error: cell id {0} must be positive")]
    InvalidCellId(i64),
    /// A cell references a vertex id that was never declared.
    #[error("Topology error: cell {cell} references unknown vertex {vertex}")]
    MissingVertex { cell: i64, vertex: u64 },
    /// An inlet/outlet record references an unknown cell id.
    #[error("Topology error: unknown cell id {0}")]
    MissingCell(i64),
    /// A cell does not resolve to 3 or 4 distinct vertices.
    #[error("Topology error: cell {cell} has degenerate vertex list {vertices:?}")]
    DegenerateCell { cell: i64, vertices: Vec<u64> },
    /// More than two cells share one edge.
    #[error("Topology error: edge ({0}, {1}) is shared by more than two cells")]
    NonManifoldEdge(u64, u64),
    /// A 1-based local edge index is outside the cell's edge list.
    #[error("Topology error: local edge {index} out of range for cell {cell} with {len} edges")]
    LocalEdgeOutOfRange { cell: i64, index: usize, len: usize },
    /// A boundary group requests a namespace with no registered constructor.
    #[error("Configuration error: unknown boundary namespace `{0}`")]
    UnknownBoundaryNamespace(String),
    /// A boundary namespace is missing one of its arguments.
    #[error("Configuration error: group {group} (`{namespace}`) is missing argument `{argument}`")]
    MissingBoundaryArgument {
        group: u32,
        namespace: String,
        argument: &'static str,
    },
    /// The boundary description lists the same group twice.
    #[error("Configuration error: boundary group {0} is described more than once")]
    DuplicateBoundaryGroup(u32),
    /// A forcing series was selected but holds no entries.
    #[error("Configuration error: forcing series {0} has no entries")]
    EmptyForcingSeries(usize),
    /// The requested 1-based forcing series does not exist.
    #[error("Configuration error: forcing series {requested} requested but resource holds {available}")]
    ForcingSeriesIndex { requested: usize, available: usize },
    /// No resolver implements the requested scheme combination.
    #[error("Configuration error: temporal scheme `{temporal}` with spatial scheme `{spatial}` is not supported")]
    UnsupportedScheme { temporal: String, spatial: String },
    /// Snapshot interval must be strictly positive.
    #[error("Configuration error: write interval must be > 0, got {0}")]
    InvalidWriteInterval(f64),
    /// A time step was zero, negative or not finite.
    #[error("Time step must be finite and > 0, got {0}")]
    NonPositiveTimeStep(f64),
    /// A configuration key holds an unusable value.
    #[error("Configuration error: invalid value `{value}` for `{key}`: {reason}")]
    InvalidConfig {
        key: String,
        value: String,
        reason: String,
    },
    /// The initial-state resource does not cover every real cell.
    #[error("Initial state holds {found} entries, mesh has {expected} cells")]
    InitialStateLength { expected: usize, found: usize },
    /// A mesh invariant does not hold.
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),
}

impl From<serde_json::Error> for HydroSieveError {
    fn from(err: serde_json::Error) -> Self {
        HydroSieveError::MeshIoParse(format!("configuration: {err}"))
    }
}

impl From<serde_yaml::Error> for HydroSieveError {
    fn from(err: serde_yaml::Error) -> Self {
        HydroSieveError::MeshIoParse(format!("configuration: {err}"))
    }
}
