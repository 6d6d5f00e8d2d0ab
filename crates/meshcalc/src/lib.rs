//! Mesh interpolation and time-varying dataset algebra.
//!
//! Layers, leaf-first:
//! - `geom2`: point-in-polygon, centroids, barycentric and bilinear local
//!   coordinates over plain vertex slices.
//! - `mesh`: nodes, elements, cached bounding boxes, optional reprojection,
//!   and the per-element interpolation engine.
//! - `dataset`: outputs (one time step each) grouped into named datasets.
//! - `calc`: operators that derive new datasets from existing ones.
//!
//! No-data handling
//! - Values equal to [`NODATA`] mean "unknown". Derived datasets propagate the
//!   sentinel; it is never replaced by a default.
//!
//! Threading
//! - A loaded mesh is read-only for queries; attaching a dataset needs
//!   `&mut Mesh`, so the single-writer rule is enforced by the borrow checker.

pub mod calc;
pub mod dataset;
pub mod error;
pub mod geom2;
pub mod mesh;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use dataset::{is_nodata, Centering, Dataset, Output, NODATA, NODATA_VEC};
pub use error::{CalcError, DatasetError, MeshError, TransformError};
pub use nalgebra::Vector2 as Vec2;

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::calc::{AggrOp, BinaryOp, CalcCfg, DatasetCalc, UnaryOp};
    pub use crate::dataset::{is_nodata, Centering, Dataset, Output, NODATA, NODATA_VEC};
    pub use crate::geom2::{Affine2, BBox, GeomCfg};
    pub use crate::mesh::{
        CoordTransform, DatasetId, Element, ElementKind, FnTransform, InterpCfg, Mesh,
        NoDataPolicy, Node, OutputRef, Shape,
    };
    pub use nalgebra::Vector2 as Vec2;
}
