//! Canonical meshes used in tests, benchmarks, and the CLI demo.
//!
//! - `unit_square_quad`: one quad over [0,1]².
//! - `grid`: structured `nx × ny` cells of quads or split triangles.
//! - `mixed`: one element of every kind (quad, triangle, convex pentagon,
//!   line, undefined) sharing nodes.

use super::topology::Mesh;
use super::types::{Element, Node};

/// Cell split used by [`grid`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GridCells {
    Quads,
    /// Each cell split along its lower-left → upper-right diagonal.
    Triangles,
}

/// Quad with nodes (0,0), (1,0), (1,1), (0,1).
pub fn unit_square_quad() -> Mesh {
    let nodes = vec![
        Node::new(1, 0.0, 0.0),
        Node::new(2, 1.0, 0.0),
        Node::new(3, 1.0, 1.0),
        Node::new(4, 0.0, 1.0),
    ];
    let elements = vec![Element::quad(1, [0, 1, 2, 3])];
    Mesh::new(nodes, elements).expect("node indices in range")
}

/// Structured grid with origin (0,0) and spacing `h`.
///
/// Nodes are numbered row-major: node `(i, j)` has index `j * (nx + 1) + i`.
pub fn grid(nx: usize, ny: usize, h: f64, cells: GridCells) -> Mesh {
    let mut nodes = Vec::with_capacity((nx + 1) * (ny + 1));
    for j in 0..=ny {
        for i in 0..=nx {
            let id = nodes.len() as i64 + 1;
            nodes.push(Node::new(id, i as f64 * h, j as f64 * h));
        }
    }
    let idx = |i: usize, j: usize| j * (nx + 1) + i;
    let mut elements = Vec::new();
    for j in 0..ny {
        for i in 0..nx {
            let (a, b, c, d) = (idx(i, j), idx(i + 1, j), idx(i + 1, j + 1), idx(i, j + 1));
            let id = elements.len() as i64 + 1;
            match cells {
                GridCells::Quads => elements.push(Element::quad(id, [a, b, c, d])),
                GridCells::Triangles => {
                    elements.push(Element::triangle(id, [a, b, c]));
                    elements.push(Element::triangle(id + 1, [a, c, d]));
                }
            }
        }
    }
    Mesh::new(nodes, elements).expect("node indices in range")
}

/// Five elements, one per kind, in this order: quad, triangle, pentagon,
/// line, undefined.
pub fn mixed() -> Mesh {
    let nodes = vec![
        Node::new(10, 0.0, 0.0),
        Node::new(11, 1.0, 0.0),
        Node::new(12, 1.0, 1.0),
        Node::new(13, 0.0, 1.0),
        Node::new(14, 2.0, 0.0),
        Node::new(15, 3.0, 0.5),
        Node::new(16, 2.5, 1.5),
        Node::new(17, 1.5, 1.8),
    ];
    let elements = vec![
        Element::quad(1, [0, 1, 2, 3]),
        Element::triangle(2, [1, 4, 2]),
        Element::polygon(3, vec![2, 4, 5, 6, 7]).expect("five nodes"),
        Element::line(4, [3, 0]),
        Element::undefined(5),
    ];
    Mesh::new(nodes, elements).expect("node indices in range")
}
