//! Cell shape metadata for mesh cells.

/// Shapes a mesh cell may take.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum CellShape {
    /// Three distinct vertices.
    Triangle,
    /// Four distinct vertices.
    Quadrilateral,
}

impl CellShape {
    /// Shape for a resolved vertex count, if supported.
    pub fn from_vertex_count(count: usize) -> Option<Self> {
        match count {
            3 => Some(CellShape::Triangle),
            4 => Some(CellShape::Quadrilateral),
            _ => None,
        }
    }

    /// Number of vertices (and edges) of the shape.
    pub fn vertex_count(self) -> usize {
        match self {
            CellShape::Triangle => 3,
            CellShape::Quadrilateral => 4,
        }
    }

    /// Legacy VTK cell type code.
    pub fn vtk_code(self) -> i32 {
        match self {
            CellShape::Triangle => 5,
            CellShape::Quadrilateral => 9,
        }
    }
}
