//! Immutable unstructured mesh with ghost cells.
//!
//! All entities live in index arenas owned by [`Mesh`]. Cells are addressed by
//! [`CellRef`], which distinguishes real cells from the ghost cells created
//! behind every boundary edge. Ghost `i` always belongs to boundary `i`.

use crate::geometry::Point2;
use crate::topology::cell_type::CellShape;
use hashbrown::HashMap;

/// Id reported by every ghost cell.
pub const GHOST_CELL_ID: i64 = -1;

/// Handle to a cell slot: a real cell index or a ghost (boundary) index.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Ord, PartialOrd)]
pub enum CellRef {
    Real(usize),
    Ghost(usize),
}

impl CellRef {
    #[inline]
    pub fn is_ghost(self) -> bool {
        matches!(self, CellRef::Ghost(_))
    }

    /// Real cell index, if this is a real cell.
    #[inline]
    pub fn real(self) -> Option<usize> {
        match self {
            CellRef::Real(i) => Some(i),
            CellRef::Ghost(_) => None,
        }
    }
}

/// Mesh vertex.
#[derive(Clone, Debug, PartialEq)]
pub struct Vertex {
    pub(crate) id: u64,
    pub(crate) coords: Point2,
    pub(crate) boundary: bool,
}

impl Vertex {
    /// External id from the mesh resource.
    pub fn id(&self) -> u64 {
        self.id
    }
    /// `[x, y]` coordinates.
    pub fn coords(&self) -> Point2 {
        self.coords
    }
    /// True once an incident edge is a boundary edge.
    pub fn is_boundary(&self) -> bool {
        self.boundary
    }
}

/// Real mesh cell.
#[derive(Clone, Debug, PartialEq)]
pub struct Cell {
    pub(crate) id: i64,
    pub(crate) shape: CellShape,
    pub(crate) vertices: Vec<usize>,
    pub(crate) edges: Vec<usize>,
    pub(crate) neighbors: Vec<CellRef>,
    pub(crate) boundary: bool,
    pub(crate) surface: f64,
    pub(crate) perimeter: f64,
    pub(crate) center: Point2,
}

impl Cell {
    /// External id from the mesh resource, always positive.
    pub fn id(&self) -> i64 {
        self.id
    }
    /// Triangle or quadrilateral.
    pub fn shape(&self) -> CellShape {
        self.shape
    }
    /// Vertex indices in input order.
    pub fn vertices(&self) -> &[usize] {
        &self.vertices
    }
    /// Edge indices ordered by local edge index: local edge `k` joins vertex
    /// `k` and vertex `k + 1` (wrapping).
    pub fn edges(&self) -> &[usize] {
        &self.edges
    }
    /// One neighbour per edge, aligned with [`Cell::edges`].
    pub fn neighbors(&self) -> &[CellRef] {
        &self.neighbors
    }
    /// True when at least one edge is a boundary edge.
    pub fn is_boundary(&self) -> bool {
        self.boundary
    }
    /// Polygon area.
    pub fn surface(&self) -> f64 {
        self.surface
    }
    /// Sum of edge lengths.
    pub fn perimeter(&self) -> f64 {
        self.perimeter
    }
    /// Arithmetic mean of the vertex coordinates.
    pub fn center(&self) -> Point2 {
        self.center
    }
}

/// Read-only view of either a real cell or a ghost cell.
///
/// A ghost view reports [`GHOST_CELL_ID`] and answers every geometric query
/// with the values of the real cell it mirrors.
#[derive(Clone, Copy, Debug)]
pub struct CellView<'a> {
    cell: &'a Cell,
    ghost: bool,
}

impl<'a> CellView<'a> {
    /// Real cell id, or [`GHOST_CELL_ID`] for a ghost.
    pub fn id(&self) -> i64 {
        if self.ghost { GHOST_CELL_ID } else { self.cell.id }
    }
    pub fn is_ghost(&self) -> bool {
        self.ghost
    }
    pub fn is_boundary(&self) -> bool {
        self.cell.boundary
    }
    pub fn surface(&self) -> f64 {
        self.cell.surface
    }
    pub fn perimeter(&self) -> f64 {
        self.cell.perimeter
    }
    pub fn center(&self) -> Point2 {
        self.cell.center
    }
    pub fn vertices(&self) -> &'a [usize] {
        &self.cell.vertices
    }
    pub fn edges(&self) -> &'a [usize] {
        &self.cell.edges
    }
    pub fn neighbors(&self) -> &'a [CellRef] {
        &self.cell.neighbors
    }
    /// The wrapped real cell.
    pub fn real(&self) -> &'a Cell {
        self.cell
    }
}

/// Mesh edge between two vertices.
#[derive(Clone, Debug, PartialEq)]
pub struct Edge {
    pub(crate) id: u64,
    pub(crate) vertices: [usize; 2],
    pub(crate) cells: [CellRef; 2],
    pub(crate) length: f64,
    pub(crate) center: Point2,
    pub(crate) normal: Point2,
    pub(crate) flux_direction: Point2,
    pub(crate) boundary: Option<usize>,
}

impl Edge {
    /// 1-based creation order.
    pub fn id(&self) -> u64 {
        self.id
    }
    /// Vertex indices in the order the first cell lists them.
    pub fn vertices(&self) -> [usize; 2] {
        self.vertices
    }
    /// Cell slots. For a boundary edge the second slot is the ghost cell.
    pub fn cells(&self) -> [CellRef; 2] {
        self.cells
    }
    pub fn length(&self) -> f64 {
        self.length
    }
    /// Midpoint.
    pub fn center(&self) -> Point2 {
        self.center
    }
    /// Unit normal pointing away from the first slot's centre.
    pub fn normal(&self) -> Point2 {
        self.normal
    }
    /// Second slot centre minus first slot centre.
    pub fn flux_direction(&self) -> Point2 {
        self.flux_direction
    }
    pub fn is_boundary(&self) -> bool {
        self.boundary.is_some()
    }
    /// Index of the owning boundary, if any.
    pub fn boundary(&self) -> Option<usize> {
        self.boundary
    }
    /// Ghost cell behind a boundary edge.
    pub fn ghost(&self) -> Option<CellRef> {
        self.boundary.map(CellRef::Ghost)
    }
}

/// Boundary classification.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum BoundaryKind {
    #[default]
    Wall,
    Inflow,
    Outflow,
}

/// A boundary edge together with its classification.
#[derive(Clone, Debug, PartialEq)]
pub struct Boundary {
    pub(crate) edge: usize,
    pub(crate) kind: BoundaryKind,
}

impl Boundary {
    /// Index of the boundary edge.
    pub fn edge(&self) -> usize {
        self.edge
    }
    /// Classification after inlet/outlet reconciliation.
    pub fn kind(&self) -> BoundaryKind {
        self.kind
    }
}

/// Immutable mesh produced by [`crate::topology::builder::MeshBuilder`].
#[derive(Clone, Debug)]
pub struct Mesh {
    pub(crate) vertices: Vec<Vertex>,
    pub(crate) cells: Vec<Cell>,
    pub(crate) edges: Vec<Edge>,
    pub(crate) boundaries: Vec<Boundary>,
    /// Real cell mirrored by each ghost.
    pub(crate) ghost_owners: Vec<usize>,
    pub(crate) vertex_index: HashMap<u64, usize>,
    pub(crate) cell_index: HashMap<i64, usize>,
    pub(crate) surface: f64,
}

impl Mesh {
    /// Vertices in input order.
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }
    /// Real cells in input order.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }
    /// Edges in creation order; edge `i` has id `i + 1`.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }
    /// Boundaries in creation order; boundary `i` owns ghost `i`.
    pub fn boundaries(&self) -> &[Boundary] {
        &self.boundaries
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }
    pub fn boundary_count(&self) -> usize {
        self.boundaries.len()
    }
    /// One ghost cell per boundary.
    pub fn ghost_count(&self) -> usize {
        self.boundaries.len()
    }

    /// Sum of real cell surfaces.
    pub fn surface(&self) -> f64 {
        self.surface
    }

    /// Index of the vertex with external id `id`.
    pub fn vertex_by_id(&self, id: u64) -> Option<usize> {
        self.vertex_index.get(&id).copied()
    }

    /// Index of the real cell with external id `id`.
    pub fn cell_by_id(&self, id: i64) -> Option<usize> {
        self.cell_index.get(&id).copied()
    }

    /// Index of the edge with id `id`.
    pub fn edge_by_id(&self, id: u64) -> Option<usize> {
        let idx = usize::try_from(id).ok()?.checked_sub(1)?;
        (idx < self.edges.len()).then_some(idx)
    }

    /// View a real or ghost cell.
    ///
    /// # Panics
    /// Panics if the index is out of range for this mesh.
    pub fn view(&self, cell: CellRef) -> CellView<'_> {
        match cell {
            CellRef::Real(i) => CellView {
                cell: &self.cells[i],
                ghost: false,
            },
            CellRef::Ghost(b) => CellView {
                cell: &self.cells[self.ghost_owner(b)],
                ghost: true,
            },
        }
    }

    /// Real cell mirrored by ghost `b`.
    pub fn ghost_owner(&self, b: usize) -> usize {
        self.ghost_owners[b]
    }

    /// Real cell on the inner side of boundary `b`.
    pub fn boundary_cell(&self, b: usize) -> CellRef {
        CellRef::Real(self.ghost_owners[b])
    }

    /// Every real cell followed by every ghost cell.
    pub fn cell_refs(&self) -> impl Iterator<Item = CellRef> + '_ {
        (0..self.cells.len())
            .map(CellRef::Real)
            .chain((0..self.boundaries.len()).map(CellRef::Ghost))
    }

    /// Coordinates of a real cell's vertices, in order.
    pub fn cell_points(&self, cell: usize) -> Vec<Point2> {
        self.cells[cell]
            .vertices
            .iter()
            .map(|&v| self.vertices[v].coords)
            .collect()
    }

    /// Vector from the centre of `edge` to the centre of `cell`.
    pub fn vector_to_cell_center(&self, edge: usize, cell: CellRef) -> Point2 {
        let c = self.view(cell).center();
        let e = self.edges[edge].center;
        [c[0] - e[0], c[1] - e[1]]
    }
}
