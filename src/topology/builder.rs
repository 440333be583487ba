//! Mesh construction from raw vertex, cell and inlet/outlet records.
//!
//! [`MeshBuilder`] turns the flat lists a mesh reader produces into a fully
//! connected [`Mesh`]: it resolves triangle/quadrilateral cells, derives their
//! geometry, discovers edges from consecutive vertex pairs, creates a ghost cell
//! behind every unshared edge and finally classifies inlet and outlet
//! boundaries.
//!
//! Construction is all-or-nothing: any error aborts the build and no partial
//! mesh is returned.

use crate::debug_invariants::DebugInvariants;
use crate::geometry::{
    Point2, distance, midpoint, polygon_area, polygon_center, polygon_perimeter,
    unit_outward_normal,
};
use crate::mesh_error::HydroSieveError;
use crate::topology::cell_type::CellShape;
use crate::topology::mesh::{Boundary, BoundaryKind, Cell, CellRef, Edge, Mesh, Vertex};
use hashbrown::HashMap;
use hashbrown::hash_map::Entry;
use itertools::Itertools;

/// Vertex as read from a mesh resource.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RawVertex {
    pub id: u64,
    pub x: f64,
    pub y: f64,
}

/// Cell as read from a mesh resource.
///
/// A fourth vertex id of `0`, or equal to the first id, marks a triangle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RawCell {
    pub id: i64,
    pub vertices: [u64; 4],
}

/// One inlet or outlet record.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundaryRecord {
    /// External id of the boundary cell.
    pub cell: i64,
    /// 1-based local edge index within the cell.
    pub local_edge: usize,
    /// Bed elevation of the ghost cell behind the edge.
    pub ghost_bed: f64,
    /// Boundary group number.
    pub group: u32,
}

/// Where a classified boundary came from.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundaryOrigin {
    /// `Inflow` for an inlet record, `Outflow` for an outlet record.
    pub kind: BoundaryKind,
    /// Group number carried by the record.
    pub group: u32,
    /// Bed elevation the record assigns to the ghost cell.
    pub ghost_bed: f64,
}

/// Inlet/outlet origin of every boundary, indexed by boundary.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BoundaryOrigins {
    origins: Vec<Option<BoundaryOrigin>>,
}

impl BoundaryOrigins {
    /// Origins for a mesh with `boundaries` boundaries and no inlet/outlet.
    pub fn empty(boundaries: usize) -> Self {
        Self {
            origins: vec![None; boundaries],
        }
    }

    /// Record behind `boundary`, or `None` for a plain wall.
    pub fn get(&self, boundary: usize) -> Option<&BoundaryOrigin> {
        self.origins.get(boundary).and_then(Option::as_ref)
    }

    /// Group number of `boundary`; walls not named by any record are group 0.
    pub fn group(&self, boundary: usize) -> u32 {
        self.get(boundary).map_or(0, |o| o.group)
    }

    /// Ghost bed given by the inlet/outlet record, if any.
    pub fn ghost_bed(&self, boundary: usize) -> Option<f64> {
        self.get(boundary).map(|o| o.ghost_bed)
    }

    /// Number of boundaries covered, named or not.
    pub fn len(&self) -> usize {
        self.origins.len()
    }

    /// True for a mesh without boundaries.
    pub fn is_empty(&self) -> bool {
        self.origins.is_empty()
    }

    /// Boundaries that were named by an inlet or outlet record.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &BoundaryOrigin)> {
        self.origins
            .iter()
            .enumerate()
            .filter_map(|(b, o)| o.as_ref().map(|o| (b, o)))
    }
}

/// Collects raw records and builds a [`Mesh`].
#[derive(Clone, Debug, Default)]
pub struct MeshBuilder {
    vertices: Vec<RawVertex>,
    cells: Vec<RawCell>,
    inlets: Vec<BoundaryRecord>,
    outlets: Vec<BoundaryRecord>,
}

impl MeshBuilder {
    /// Empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder seeded with records produced by a mesh reader.
    pub fn from_raw(
        vertices: Vec<RawVertex>,
        cells: Vec<RawCell>,
        inlets: Vec<BoundaryRecord>,
        outlets: Vec<BoundaryRecord>,
    ) -> Self {
        Self {
            vertices,
            cells,
            inlets,
            outlets,
        }
    }

    /// Append a vertex record.
    pub fn add_vertex(&mut self, id: u64, x: f64, y: f64) -> &mut Self {
        self.vertices.push(RawVertex { id, x, y });
        self
    }

    /// Append a cell record. Ids must be positive; a fourth vertex of `0`
    /// marks a triangle.
    pub fn add_cell(&mut self, id: i64, vertices: [u64; 4]) -> &mut Self {
        self.cells.push(RawCell { id, vertices });
        self
    }

    /// Append an inlet record.
    pub fn add_inlet(&mut self, record: BoundaryRecord) -> &mut Self {
        self.inlets.push(record);
        self
    }

    /// Append an outlet record.
    pub fn add_outlet(&mut self, record: BoundaryRecord) -> &mut Self {
        self.outlets.push(record);
        self
    }

    /// Build the mesh, discarding boundary origins.
    pub fn build(&self) -> Result<Mesh, HydroSieveError> {
        self.build_with_origins().map(|(mesh, _)| mesh)
    }

    /// Build the mesh and report the inlet/outlet record behind each boundary.
    pub fn build_with_origins(&self) -> Result<(Mesh, BoundaryOrigins), HydroSieveError> {
        // 1. vertices
        let mut vertex_index = HashMap::with_capacity(self.vertices.len());
        let mut vertices = Vec::with_capacity(self.vertices.len());
        for raw in &self.vertices {
            if vertex_index.insert(raw.id, vertices.len()).is_some() {
                return Err(HydroSieveError::DuplicateVertex(raw.id));
            }
            vertices.push(Vertex {
                id: raw.id,
                coords: [raw.x, raw.y],
                boundary: false,
            });
        }

        // 2. cells and their geometry
        let mut cell_index = HashMap::with_capacity(self.cells.len());
        let mut cells = Vec::with_capacity(self.cells.len());
        for raw in &self.cells {
            if raw.id <= 0 {
                return Err(HydroSieveError::InvalidCellId(raw.id));
            }
            if cell_index.insert(raw.id, cells.len()).is_some() {
                return Err(HydroSieveError::DuplicateCell(raw.id));
            }
            cells.push(resolve_cell(raw, &vertex_index, &vertices)?);
        }

        // 3. edges from consecutive vertex pairs
        let mut edge_index: HashMap<(u64, u64), usize> = HashMap::new();
        let mut edges: Vec<Edge> = Vec::new();
        for (c, cell) in cells.iter_mut().enumerate() {
            let center = cell.center;
            for (a, b) in cell.vertices.iter().copied().circular_tuple_windows() {
                let key = edge_key(vertices[a].id, vertices[b].id);
                let e = match edge_index.entry(key) {
                    Entry::Vacant(slot) => {
                        let e = edges.len();
                        slot.insert(e);
                        edges.push(new_edge(e, [a, b], c, center, &vertices));
                        e
                    }
                    Entry::Occupied(slot) => {
                        let e = *slot.get();
                        let edge = &mut edges[e];
                        if edge.cells[0] != edge.cells[1] {
                            return Err(HydroSieveError::NonManifoldEdge(key.0, key.1));
                        }
                        edge.cells[1] = CellRef::Real(c);
                        e
                    }
                };
                // 5. local edge order follows vertex order
                cell.edges.push(e);
            }
        }

        // 4. unshared edges become wall boundaries with a ghost
        let mut boundaries = Vec::new();
        let mut ghost_owners = Vec::new();
        for (e, edge) in edges.iter_mut().enumerate() {
            if edge.cells[0] != edge.cells[1] {
                continue;
            }
            let CellRef::Real(owner) = edge.cells[0] else {
                continue;
            };
            let b = boundaries.len();
            boundaries.push(Boundary {
                edge: e,
                kind: BoundaryKind::Wall,
            });
            ghost_owners.push(owner);
            edge.cells[1] = CellRef::Ghost(b);
            edge.boundary = Some(b);
            cells[owner].boundary = true;
            for v in edge.vertices {
                vertices[v].boundary = true;
            }
        }

        for edge in &mut edges {
            let first = cell_center(&cells, &ghost_owners, edge.cells[0]);
            let second = cell_center(&cells, &ghost_owners, edge.cells[1]);
            edge.flux_direction = [second[0] - first[0], second[1] - first[1]];
        }

        // 6. neighbours
        for (c, cell) in cells.iter_mut().enumerate() {
            let me = CellRef::Real(c);
            cell.neighbors = cell
                .edges
                .iter()
                .map(|&e| {
                    let [s0, s1] = edges[e].cells;
                    if s0 == me { s1 } else { s0 }
                })
                .collect();
        }

        let surface = cells.iter().map(|c| c.surface).sum();
        let mut mesh = Mesh {
            vertices,
            cells,
            edges,
            boundaries,
            ghost_owners,
            vertex_index,
            cell_index,
            surface,
        };

        // 7. inlet/outlet reconciliation
        let mut origins = BoundaryOrigins::empty(mesh.boundaries.len());
        for (records, kind) in [
            (&self.inlets, BoundaryKind::Inflow),
            (&self.outlets, BoundaryKind::Outflow),
        ] {
            for record in records {
                reconcile(&mut mesh, &mut origins, record, kind)?;
            }
        }

        crate::debug_invariants!(mesh.validate_invariants(), "MeshBuilder::build");
        log::debug!(
            "built mesh: {} vertices, {} cells, {} edges, {} boundaries",
            mesh.vertex_count(),
            mesh.cell_count(),
            mesh.edge_count(),
            mesh.boundary_count()
        );
        Ok((mesh, origins))
    }
}

#[inline]
fn edge_key(a: u64, b: u64) -> (u64, u64) {
    if a <= b { (a, b) } else { (b, a) }
}

fn resolve_cell(
    raw: &RawCell,
    vertex_index: &HashMap<u64, usize>,
    vertices: &[Vertex],
) -> Result<Cell, HydroSieveError> {
    let [v1, .., v4] = raw.vertices;
    let ids: &[u64] = if v4 == 0 || v4 == v1 {
        &raw.vertices[..3]
    } else {
        &raw.vertices[..]
    };
    let indices = ids
        .iter()
        .map(|&id| {
            vertex_index
                .get(&id)
                .copied()
                .ok_or(HydroSieveError::MissingVertex {
                    cell: raw.id,
                    vertex: id,
                })
        })
        .collect::<Result<Vec<_>, _>>()?;
    if !ids.iter().all_unique() {
        return Err(HydroSieveError::DegenerateCell {
            cell: raw.id,
            vertices: ids.to_vec(),
        });
    }
    let shape =
        CellShape::from_vertex_count(indices.len()).ok_or_else(|| HydroSieveError::DegenerateCell {
            cell: raw.id,
            vertices: ids.to_vec(),
        })?;
    let points: Vec<Point2> = indices.iter().map(|&v| vertices[v].coords).collect();
    Ok(Cell {
        id: raw.id,
        shape,
        edges: Vec::with_capacity(indices.len()),
        neighbors: Vec::new(),
        vertices: indices,
        boundary: false,
        surface: polygon_area(&points),
        perimeter: polygon_perimeter(&points),
        center: polygon_center(&points),
    })
}

fn new_edge(e: usize, ends: [usize; 2], cell: usize, cell_center: Point2, vertices: &[Vertex]) -> Edge {
    let a = vertices[ends[0]].coords;
    let b = vertices[ends[1]].coords;
    Edge {
        id: e as u64 + 1,
        vertices: ends,
        cells: [CellRef::Real(cell); 2],
        length: distance(a, b),
        center: midpoint(a, b),
        normal: unit_outward_normal(a, b, cell_center),
        flux_direction: [0.0, 0.0],
        boundary: None,
    }
}

fn cell_center(cells: &[Cell], ghost_owners: &[usize], cell: CellRef) -> Point2 {
    match cell {
        CellRef::Real(c) => cells[c].center,
        CellRef::Ghost(b) => cells[ghost_owners[b]].center,
    }
}

fn reconcile(
    mesh: &mut Mesh,
    origins: &mut BoundaryOrigins,
    record: &BoundaryRecord,
    kind: BoundaryKind,
) -> Result<(), HydroSieveError> {
    let c = mesh
        .cell_by_id(record.cell)
        .ok_or(HydroSieveError::MissingCell(record.cell))?;
    let edges = &mesh.cells[c].edges;
    let e = record
        .local_edge
        .checked_sub(1)
        .and_then(|k| edges.get(k).copied())
        .ok_or(HydroSieveError::LocalEdgeOutOfRange {
            cell: record.cell,
            index: record.local_edge,
            len: edges.len(),
        })?;
    match mesh.edges[e].boundary {
        Some(b) => {
            mesh.boundaries[b].kind = kind;
            origins.origins[b] = Some(BoundaryOrigin {
                kind,
                group: record.group,
                ghost_bed: record.ghost_bed,
            });
        }
        None => log::warn!(
            "{:?} record for cell {} edge {} names an interior edge; ignored",
            kind,
            record.cell,
            record.local_edge
        ),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_square() -> MeshBuilder {
        let mut b = MeshBuilder::new();
        b.add_vertex(1, 0.0, 0.0)
            .add_vertex(2, 1.0, 0.0)
            .add_vertex(3, 1.0, 1.0)
            .add_vertex(4, 0.0, 1.0)
            .add_cell(1, [1, 2, 3, 4]);
        b
    }

    #[test]
    fn single_quad_has_four_boundary_edges() {
        let mesh = unit_square().build().unwrap();
        assert_eq!(mesh.edge_count(), 4);
        assert_eq!(mesh.boundary_count(), 4);
        assert!(mesh.cells()[0].is_boundary());
        assert!(mesh.vertices().iter().all(|v| v.is_boundary()));
        assert!((mesh.surface() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn local_edges_follow_vertex_order() {
        let mesh = unit_square().build().unwrap();
        let cell = &mesh.cells()[0];
        for (k, &e) in cell.edges().iter().enumerate() {
            let [a, b] = mesh.edges()[e].vertices();
            assert_eq!(a, cell.vertices()[k]);
            assert_eq!(b, cell.vertices()[(k + 1) % 4]);
        }
    }

    #[test]
    fn fourth_vertex_equal_to_first_is_triangle() {
        let mut b = MeshBuilder::new();
        b.add_vertex(1, 0.0, 0.0)
            .add_vertex(2, 1.0, 0.0)
            .add_vertex(3, 0.0, 1.0)
            .add_cell(7, [1, 2, 3, 1]);
        let mesh = b.build().unwrap();
        assert_eq!(mesh.cells()[0].shape(), CellShape::Triangle);
        assert_eq!(mesh.edge_count(), 3);
    }

    #[test]
    fn repeated_vertex_is_degenerate() {
        let mut b = MeshBuilder::new();
        b.add_vertex(1, 0.0, 0.0)
            .add_vertex(2, 1.0, 0.0)
            .add_vertex(3, 0.0, 1.0)
            .add_cell(1, [1, 2, 2, 3]);
        assert!(matches!(
            b.build(),
            Err(HydroSieveError::DegenerateCell { cell: 1, .. })
        ));
    }

    #[test]
    fn non_positive_cell_ids_are_rejected() {
        for id in [0, -1, -7] {
            let mut b = MeshBuilder::new();
            b.add_vertex(1, 0.0, 0.0)
                .add_vertex(2, 1.0, 0.0)
                .add_vertex(3, 0.0, 1.0)
                .add_cell(id, [1, 2, 3, 0]);
            assert!(matches!(b.build(), Err(HydroSieveError::InvalidCellId(bad)) if bad == id));
        }
    }

    #[test]
    fn interior_inlet_is_ignored() {
        let mut b = unit_square();
        b.add_vertex(5, 2.0, 0.0)
            .add_vertex(6, 2.0, 1.0)
            .add_cell(2, [2, 5, 6, 3])
            .add_inlet(BoundaryRecord {
                cell: 1,
                local_edge: 2,
                ghost_bed: 0.0,
                group: 1,
            });
        let (mesh, origins) = b.build_with_origins().unwrap();
        assert!(
            mesh.boundaries()
                .iter()
                .all(|b| b.kind() == BoundaryKind::Wall)
        );
        assert_eq!(origins.iter().count(), 0);
    }
}
