//! Reader for the `.geo` mesh description.
//!
//! # Format
//! ```text
//! nv nc [scale]
//! id x y [bed]                              (nv lines)
//! id v1 v2 v3 [v4 [manning [bed]]]          (nc lines, v4 = 0 or v1 for triangles)
//! INLET count [group_count]
//! cell edge legacy ghost_bed [group]        (count lines, or `cell edge ghost_bed`)
//! OUTLET count [group_count]
//! cell edge legacy ghost_bed [group]
//! ```
//!
//! The `INLET` and `OUTLET` sections may be left out at the end of the file.
//! Inlet records default to group 1. Outlet records default to the group
//! following the inlet groups, counted from the `INLET` header when given.
//!
//! The scale factor is kept on [`GeoMesh`] but not applied to coordinates.

use crate::io::{RelevantLines, parse_optional, parse_token, read_all};
use crate::mesh_error::HydroSieveError;
use crate::topology::{BoundaryRecord, MeshBuilder, RawCell, RawVertex};
use hashbrown::HashSet;
use std::io::Read;
use std::path::Path;

/// Group given to inlet records without an explicit group.
pub const DEFAULT_INLET_GROUP: u32 = 1;

/// Raw content of a `.geo` resource.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GeoMesh {
    pub scale: f64,
    pub vertices: Vec<RawVertex>,
    /// Optional bed elevation per vertex, aligned with `vertices`.
    pub vertex_beds: Vec<Option<f64>>,
    pub cells: Vec<RawCell>,
    /// Bed elevation per cell, aligned with `cells`.
    pub cell_beds: Vec<f64>,
    /// Optional land-use patch per cell, aligned with `cells`; resolved to
    /// Manning coefficients through a patch table.
    pub manning: Vec<Option<u32>>,
    pub inlets: Vec<BoundaryRecord>,
    pub outlets: Vec<BoundaryRecord>,
}

impl GeoMesh {
    /// Builder seeded with every record of this resource.
    pub fn builder(&self) -> MeshBuilder {
        MeshBuilder::from_raw(
            self.vertices.clone(),
            self.cells.clone(),
            self.inlets.clone(),
            self.outlets.clone(),
        )
    }
}

/// `.geo` mesh reader.
#[derive(Debug, Default, Clone)]
pub struct GeoMeshReader;

impl GeoMeshReader {
    /// Parse a `.geo` resource.
    pub fn read<R: Read>(&self, reader: R) -> Result<GeoMesh, HydroSieveError> {
        let contents = read_all(reader)?;
        let mut lines = RelevantLines::new(&contents);

        let (line, header) = lines.expect_tokens("mesh header")?;
        let nv: usize = parse_token(&header, 0, "vertex count", line)?;
        let nc: usize = parse_token(&header, 1, "cell count", line)?;
        let scale = parse_optional(&header, 2, "scale", line)?.unwrap_or(1.0);

        let mut mesh = GeoMesh {
            scale,
            ..GeoMesh::default()
        };
        let mut bed_by_vertex = hashbrown::HashMap::with_capacity(nv);
        for _ in 0..nv {
            let (line, t) = lines.expect_tokens("vertex record")?;
            let id: u64 = parse_token(&t, 0, "vertex id", line)?;
            let x = parse_token(&t, 1, "x coordinate", line)?;
            let y = parse_token(&t, 2, "y coordinate", line)?;
            let bed: Option<f64> = parse_optional(&t, 3, "vertex bed", line)?;
            mesh.vertices.push(RawVertex { id, x, y });
            mesh.vertex_beds.push(bed);
            bed_by_vertex.insert(id, bed);
        }

        for _ in 0..nc {
            let (line, t) = lines.expect_tokens("cell record")?;
            let id: i64 = parse_token(&t, 0, "cell id", line)?;
            let v1 = parse_token(&t, 1, "vertex 1", line)?;
            let v2 = parse_token(&t, 2, "vertex 2", line)?;
            let v3 = parse_token(&t, 3, "vertex 3", line)?;
            let v4 = parse_optional(&t, 4, "vertex 4", line)?.unwrap_or(0);
            let manning = parse_optional(&t, 5, "manning patch", line)?;
            let bed = match parse_optional::<f64>(&t, 6, "cell bed", line)? {
                Some(bed) => bed,
                None => mean_vertex_bed(&[v1, v2, v3, v4], &bed_by_vertex),
            };
            mesh.cells.push(RawCell {
                id,
                vertices: [v1, v2, v3, v4],
            });
            mesh.cell_beds.push(bed);
            mesh.manning.push(manning);
        }

        let mut inlet_groups = None;
        if let Some((line, t)) = lines.next_tokens() {
            let (count, declared) = section_header(&t, "INLET", line)?;
            mesh.inlets = read_records(&mut lines, count, DEFAULT_INLET_GROUP)?;
            inlet_groups = Some(declared.unwrap_or_else(|| {
                let distinct: HashSet<u32> = mesh.inlets.iter().map(|r| r.group).collect();
                distinct.len() as u32
            }));
        }
        if let Some((line, t)) = lines.next_tokens() {
            let (count, _) = section_header(&t, "OUTLET", line)?;
            let default_group = inlet_groups.unwrap_or(0) + 1;
            mesh.outlets = read_records(&mut lines, count, default_group)?;
        }
        if let Some((line, _)) = lines.next_tokens() {
            log::warn!("ignoring trailing content from line {line} of mesh resource");
        }
        Ok(mesh)
    }

    /// Parse the `.geo` file at `path`.
    pub fn read_path(&self, path: impl AsRef<Path>) -> Result<GeoMesh, HydroSieveError> {
        let file = std::fs::File::open(path)?;
        self.read(std::io::BufReader::new(file))
    }
}

fn mean_vertex_bed(ids: &[u64; 4], beds: &hashbrown::HashMap<u64, Option<f64>>) -> f64 {
    let [v1, .., v4] = *ids;
    let used = if v4 == 0 || v4 == v1 { &ids[..3] } else { &ids[..] };
    let found: Option<Vec<f64>> = used.iter().map(|id| beds.get(id).copied().flatten()).collect();
    match found {
        Some(b) => b.iter().sum::<f64>() / b.len() as f64,
        None => 0.0,
    }
}

fn section_header(tokens: &[&str], keyword: &str, line: usize) -> Result<(usize, Option<u32>), HydroSieveError> {
    if !tokens[0].eq_ignore_ascii_case(keyword) {
        return Err(HydroSieveError::MeshIoParse(format!(
            "line {line}: expected {keyword} section, found `{}`",
            tokens[0]
        )));
    }
    let count = parse_token(tokens, 1, "record count", line)?;
    let groups = parse_optional(tokens, 2, "group count", line)?;
    Ok((count, groups))
}

fn read_records(
    lines: &mut RelevantLines<'_>,
    count: usize,
    default_group: u32,
) -> Result<Vec<BoundaryRecord>, HydroSieveError> {
    let mut records = Vec::with_capacity(count);
    for _ in 0..count {
        let (line, t) = lines.expect_tokens("boundary record")?;
        let cell = parse_token(&t, 0, "boundary cell", line)?;
        let local_edge = parse_token(&t, 1, "local edge", line)?;
        let (ghost_bed, group) = match t.len() {
            0..=2 => {
                return Err(HydroSieveError::MeshIoParse(format!(
                    "line {line}: boundary record needs at least 3 fields"
                )));
            }
            3 => (parse_token(&t, 2, "ghost bed", line)?, default_group),
            4 => (parse_token(&t, 3, "ghost bed", line)?, default_group),
            _ => (
                parse_token(&t, 3, "ghost bed", line)?,
                parse_token(&t, 4, "group", line)?,
            ),
        };
        records.push(BoundaryRecord {
            cell,
            local_edge,
            ghost_bed,
            group,
        });
    }
    Ok(records)
}
