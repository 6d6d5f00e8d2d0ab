//! Mesh topology, reprojection, and the interpolation engine.
//!
//! Purpose
//! - Hold nodes and elements as loaded, cache per-element and whole-mesh
//!   bounding boxes, and answer "which element holds this point / what is the
//!   value there" for any output defined on the mesh.
//!
//! Design
//! - Element kinds are a closed enum (`Shape`) carrying fixed-size node arrays,
//!   so arity is checked at construction and dispatch is a single `match`.
//! - Reprojection resolves coordinates once per transform change; query code
//!   reads `node_xy`/`bbox` and never branches on "is a transform active".
//! - The mesh owns its datasets; outputs are addressed by `(DatasetId, step)`.
//!
//! Code cross-refs: `geom2` (kernels), `dataset::{Dataset, Output}`

mod interp;
pub mod special;
mod topology;
mod transform;
mod types;

pub use interp::{InterpCfg, NoDataPolicy, NodeWeights};
pub use topology::Mesh;
pub use transform::{CoordTransform, FnTransform};
pub use types::{DatasetId, Element, ElementKind, Node, OutputRef, Shape};

#[cfg(test)]
mod tests;
