//! 2D geometry kernel over plain vertex slices.
//!
//! Purpose
//! - Containment (`point_in_polygon`, `contains`), centroids, and local
//!   coordinates (triangle barycentric, quad inverse-bilinear, generalized
//!   barycentric for simple polygons) used by the mesh interpolation engine.
//! - Functions take `&[Vector2<f64>]` and return `Option`/`bool`; the mesh
//!   decides which coordinates (raw or projected) to feed in.
//!
//! Numerics
//! - Tolerances live in `GeomCfg`. Boundary points (on a vertex or an edge)
//!   are snapped explicitly before any cotangent or division is evaluated.
//!
//! Code cross-refs: `mesh::interp`, `types::{GeomCfg, BBox, Affine2}`

mod local;
mod polygon;
pub mod rand;
mod types;
mod util;

pub use local::{bilinear_weights, quad_local_coords, triangle_barycentric};
pub use polygon::{
    centroid, contains, generalized_barycentric, locate_on_boundary, point_in_polygon,
    BoundaryHit,
};
pub use types::{Affine2, BBox, GeomCfg};
pub use util::convex_hull;
