#![allow(dead_code)]
use hydro_sieve::prelude::*;
use hydro_sieve::topology::{BoundaryRecord, RawCell, RawVertex};

pub const TOL: f64 = 1e-12;

pub fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() <= TOL * a.abs().max(b.abs()).max(1.0)
}

/// Records of an `nx` x `ny` grid of unit squares.
///
/// Vertex `(i, j)` has id `j * (nx + 1) + i + 1`; cell `(i, j)` has id
/// `j * nx + i + 1` and lists its vertices counter-clockwise from the lower
/// left corner, so local edge 1 is the bottom side, 2 the right side, 3 the
/// top side and 4 the left side.
pub fn grid_records(nx: u64, ny: u64) -> (Vec<RawVertex>, Vec<RawCell>) {
    let vid = |i: u64, j: u64| j * (nx + 1) + i + 1;
    let mut vertices = Vec::new();
    for j in 0..=ny {
        for i in 0..=nx {
            vertices.push(RawVertex {
                id: vid(i, j),
                x: i as f64,
                y: j as f64,
            });
        }
    }
    let mut cells = Vec::new();
    for j in 0..ny {
        for i in 0..nx {
            cells.push(RawCell {
                id: (j * nx + i + 1) as i64,
                vertices: [vid(i, j), vid(i + 1, j), vid(i + 1, j + 1), vid(i, j + 1)],
            });
        }
    }
    (vertices, cells)
}

pub fn grid(nx: u64, ny: u64) -> Mesh {
    let (v, c) = grid_records(nx, ny);
    MeshBuilder::from_raw(v, c, Vec::new(), Vec::new())
        .build()
        .unwrap()
}

pub fn record(cell: i64, local_edge: usize, ghost_bed: f64, group: u32) -> BoundaryRecord {
    BoundaryRecord {
        cell,
        local_edge,
        ghost_bed,
        group,
    }
}

/// 2 x 2 channel: inflow (group 1) on the left side, outflow (group 2) on
/// the right side, walls elsewhere.
pub fn channel() -> MeshBuilder {
    let (v, c) = grid_records(2, 2);
    MeshBuilder::from_raw(
        v,
        c,
        vec![record(1, 4, 0.0, 1), record(3, 4, 0.0, 1)],
        vec![record(2, 2, 0.0, 2), record(4, 2, 0.0, 2)],
    )
}

/// Boundary behind local edge `local_edge` (1-based) of cell `cell_id`.
pub fn boundary_at(mesh: &Mesh, cell_id: i64, local_edge: usize) -> usize {
    let c = mesh.cell_by_id(cell_id).unwrap();
    let e = mesh.cells()[c].edges()[local_edge - 1];
    mesh.edges()[e].boundary().unwrap()
}

/// `.geo` text for the 2 x 2 channel.
pub const CHANNEL_GEO: &str = "\
# 2 x 2 channel
9 4 1.0
1 0.0 0.0 0.0
2 1.0 0.0 0.0
3 2.0 0.0 0.0
4 0.0 1.0 0.0
5 1.0 1.0 0.0
6 2.0 1.0 0.0
7 0.0 2.0 0.0
8 1.0 2.0 0.0
9 2.0 2.0 0.0
# id v1 v2 v3 v4 manning bed
1 1 2 5 4 1 0.
2 2 3 6 5 1 0.
3 4 5 8 7 1 0.
4 5 6 9 8 1 0.
INLET 2 1
1 4 1 0.0 1
3 4 1 0.0 1
OUTLET 2 1
2 2 1 0.0 2
4 2 1 0.0 2
";
