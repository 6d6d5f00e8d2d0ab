//! Datasets: named time series of outputs defined on a mesh.
//!
//! - `Output`: one time step, node- or element-centered, scalar or vector,
//!   plus per-element active flags.
//! - `Dataset`: ordered outputs sharing centering and vector-ness; exactly one
//!   output when static.
//!
//! No-data
//! - `NODATA` (−9999) marks an unknown scalar, `NODATA_VEC` an unknown vector.
//!   Vector outputs keep magnitudes in the scalar channel; an unknown vector
//!   has magnitude `NODATA`.

mod output;
mod types;

pub use output::Output;
pub use types::{Centering, Dataset};

use nalgebra::Vector2;

/// Reserved "no data" scalar.
pub const NODATA: f64 = -9999.0;

/// Reserved "no data" vector.
pub const NODATA_VEC: Vector2<f64> = nalgebra::vector![NODATA, NODATA];

/// Exact comparison with the sentinel.
#[inline]
pub fn is_nodata(v: f64) -> bool {
    v == NODATA
}

#[cfg(test)]
mod tests;
