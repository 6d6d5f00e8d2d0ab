//! Coordinate transform boundary (source frame → destination frame).
//!
//! The mesh calls the transform once per node when it is installed; all spatial
//! queries afterwards read the resolved coordinates.

use nalgebra::Vector2;

use crate::geom2::Affine2;

/// Maps a node coordinate into the destination frame; `None` on failure.
pub trait CoordTransform: Send + Sync {
    fn transform(&self, p: Vector2<f64>) -> Option<Vector2<f64>>;
}

impl CoordTransform for Affine2 {
    #[inline]
    fn transform(&self, p: Vector2<f64>) -> Option<Vector2<f64>> {
        Some(self.apply(p))
    }
}

/// Adapter for closures (e.g. a wrapped projection library call).
#[derive(Clone, Copy, Debug)]
pub struct FnTransform<F>(pub F);

impl<F> CoordTransform for FnTransform<F>
where
    F: Fn(Vector2<f64>) -> Option<Vector2<f64>> + Send + Sync,
{
    #[inline]
    fn transform(&self, p: Vector2<f64>) -> Option<Vector2<f64>> {
        (self.0)(p)
    }
}
