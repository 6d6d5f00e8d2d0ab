//! Nodes, elements, and index types of the mesh topology.
//!
//! Kept small and explicit; geometry lives in `topology` and `interp`.

use nalgebra::Vector2;

use crate::error::MeshError;

/// Mesh vertex: coordinates plus the identifier it had in the source file.
///
/// Equality compares coordinates only.
#[derive(Clone, Copy, Debug)]
pub struct Node {
    pub xy: Vector2<f64>,
    pub id: i64,
}

impl Node {
    #[inline]
    pub fn new(id: i64, x: f64, y: f64) -> Self {
        Self {
            xy: Vector2::new(x, y),
            id,
        }
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.xy == other.xy
    }
}

/// Tag of an element shape.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Undefined,
    Line,
    Triangle,
    Quad,
    Polygon,
}

/// Element geometry as node indices; the arity is fixed by the variant.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Shape {
    /// Placeholder slot without geometry.
    Undefined,
    Line([usize; 2]),
    Triangle([usize; 3]),
    Quad([usize; 4]),
    /// Generic simple polygon, at least 3 nodes.
    Polygon(Vec<usize>),
}

/// Mesh cell with its external identifier.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Element {
    pub id: i64,
    shape: Shape,
}

impl Element {
    #[inline]
    pub fn undefined(id: i64) -> Self {
        Self {
            id,
            shape: Shape::Undefined,
        }
    }
    #[inline]
    pub fn line(id: i64, nodes: [usize; 2]) -> Self {
        Self {
            id,
            shape: Shape::Line(nodes),
        }
    }
    #[inline]
    pub fn triangle(id: i64, nodes: [usize; 3]) -> Self {
        Self {
            id,
            shape: Shape::Triangle(nodes),
        }
    }
    #[inline]
    pub fn quad(id: i64, nodes: [usize; 4]) -> Self {
        Self {
            id,
            shape: Shape::Quad(nodes),
        }
    }

    pub fn polygon(id: i64, nodes: Vec<usize>) -> Result<Self, MeshError> {
        if nodes.len() < 3 {
            return Err(MeshError::PolygonTooSmall(nodes.len()));
        }
        Ok(Self {
            id,
            shape: Shape::Polygon(nodes),
        })
    }

    /// Pick the shape from the node count: 0 undefined, 2 line, 3 triangle,
    /// 4 quad, more than 4 polygon.
    pub fn from_nodes(id: i64, nodes: &[usize]) -> Result<Self, MeshError> {
        match nodes {
            [] => Ok(Self::undefined(id)),
            [_] => Err(MeshError::SingleNode),
            &[a, b] => Ok(Self::line(id, [a, b])),
            &[a, b, c] => Ok(Self::triangle(id, [a, b, c])),
            &[a, b, c, d] => Ok(Self::quad(id, [a, b, c, d])),
            _ => Self::polygon(id, nodes.to_vec()),
        }
    }

    #[inline]
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn kind(&self) -> ElementKind {
        match self.shape {
            Shape::Undefined => ElementKind::Undefined,
            Shape::Line(_) => ElementKind::Line,
            Shape::Triangle(_) => ElementKind::Triangle,
            Shape::Quad(_) => ElementKind::Quad,
            Shape::Polygon(_) => ElementKind::Polygon,
        }
    }

    /// Node indices in element order (empty for `Undefined`).
    pub fn nodes(&self) -> &[usize] {
        match &self.shape {
            Shape::Undefined => &[],
            Shape::Line(n) => n,
            Shape::Triangle(n) => n,
            Shape::Quad(n) => n,
            Shape::Polygon(n) => n,
        }
    }

    #[inline]
    pub fn node_count(&self) -> usize {
        self.nodes().len()
    }

    #[inline]
    pub fn is_undefined(&self) -> bool {
        matches!(self.shape, Shape::Undefined)
    }
}

/// Index of a dataset in its mesh's collection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DatasetId(pub usize);

/// Address of one output: owning dataset plus step index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct OutputRef {
    pub dataset: DatasetId,
    pub step: usize,
}
