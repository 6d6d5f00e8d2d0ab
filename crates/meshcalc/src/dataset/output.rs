use nalgebra::Vector2;

use super::types::Centering;
use super::{NODATA, NODATA_VEC};
use crate::error::DatasetError;
use crate::mesh::Mesh;

/// One time step of a dataset.
///
/// Invariants:
/// - `values.len()` is the node count (node-centered) or the element count
///   (element-centered) of the mesh it was built for.
/// - `vectors`, when present, has the same length as `values`, and
///   `values[i]` is the magnitude of `vectors[i]` (or `NODATA`).
/// - `active` has one flag per mesh element.
#[derive(Clone, Debug, PartialEq)]
pub struct Output {
    time: f64,
    centering: Centering,
    values: Vec<f64>,
    vectors: Option<Vec<Vector2<f64>>>,
    active: Vec<bool>,
}

impl Output {
    /// Zero-initialized output sized to `mesh`, all elements active, time 0.
    ///
    /// Every derived dataset allocates its outputs through this path.
    pub fn zeroed(mesh: &Mesh, centering: Centering, vector: bool) -> Self {
        let len = mesh.location_count(centering);
        Self {
            time: 0.0,
            centering,
            values: vec![0.0; len],
            vectors: vector.then(|| vec![Vector2::zeros(); len]),
            active: vec![true; mesh.element_count()],
        }
    }

    #[inline]
    pub fn node(mesh: &Mesh, vector: bool) -> Self {
        Self::zeroed(mesh, Centering::Node, vector)
    }

    #[inline]
    pub fn element(mesh: &Mesh, vector: bool) -> Self {
        Self::zeroed(mesh, Centering::Element, vector)
    }

    /// Scalar output from loader data; length must match the mesh.
    pub fn from_scalars(
        mesh: &Mesh,
        centering: Centering,
        time: f64,
        values: Vec<f64>,
    ) -> Result<Self, DatasetError> {
        let mut o = Self::zeroed(mesh, centering, false);
        check_len(o.values.len(), values.len())?;
        o.values = values;
        o.time = time;
        Ok(o)
    }

    /// Vector output from loader data; magnitudes are derived.
    pub fn from_vectors(
        mesh: &Mesh,
        centering: Centering,
        time: f64,
        vectors: Vec<Vector2<f64>>,
    ) -> Result<Self, DatasetError> {
        let mut o = Self::zeroed(mesh, centering, true);
        check_len(o.values.len(), vectors.len())?;
        for (i, v) in vectors.into_iter().enumerate() {
            o.set_vector(i, v);
        }
        o.time = time;
        Ok(o)
    }

    #[inline]
    pub fn with_time(mut self, time: f64) -> Self {
        self.time = time;
        self
    }

    /// Replace the active flags; one per mesh element.
    pub fn with_active(mut self, active: Vec<bool>) -> Result<Self, DatasetError> {
        if active.len() != self.active.len() {
            return Err(DatasetError::ActiveSizeMismatch {
                got: active.len(),
                expected: self.active.len(),
            });
        }
        self.active = active;
        Ok(self)
    }

    #[inline]
    pub fn time(&self) -> f64 {
        self.time
    }
    #[inline]
    pub fn centering(&self) -> Centering {
        self.centering
    }
    #[inline]
    pub fn is_vector(&self) -> bool {
        self.vectors.is_some()
    }
    /// Number of locations (nodes or elements).
    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Scalar values (magnitudes for vector outputs).
    #[inline]
    pub fn values(&self) -> &[f64] {
        &self.values
    }
    #[inline]
    pub fn value(&self, i: usize) -> f64 {
        self.values[i]
    }
    #[inline]
    pub fn vectors(&self) -> Option<&[Vector2<f64>]> {
        self.vectors.as_deref()
    }
    #[inline]
    pub fn vector(&self, i: usize) -> Option<Vector2<f64>> {
        self.vectors.as_ref().map(|v| v[i])
    }

    #[inline]
    pub fn active(&self) -> &[bool] {
        &self.active
    }
    /// Out-of-range elements count as inactive.
    #[inline]
    pub fn is_active(&self, elem: usize) -> bool {
        self.active.get(elem).copied().unwrap_or(false)
    }

    /// Store a scalar. No-op for vector outputs, whose scalar channel holds
    /// the magnitudes written by `set_vector`.
    #[inline]
    pub fn set_value(&mut self, i: usize, v: f64) {
        if self.vectors.is_none() {
            self.values[i] = v;
        }
    }

    /// Writable scalar channel of a scalar output (the operators' fill path).
    #[inline]
    pub(crate) fn values_mut(&mut self) -> &mut [f64] {
        debug_assert!(self.vectors.is_none(), "scalar channel of a vector output");
        &mut self.values
    }

    /// Store a vector and its magnitude. No-op for scalar outputs.
    pub fn set_vector(&mut self, i: usize, v: Vector2<f64>) {
        if let Some(vs) = self.vectors.as_mut() {
            vs[i] = v;
            self.values[i] = if v == NODATA_VEC { NODATA } else { v.norm() };
        }
    }

    #[inline]
    pub fn set_active(&mut self, elem: usize, active: bool) {
        self.active[elem] = active;
    }
}

fn check_len(expected: usize, got: usize) -> Result<(), DatasetError> {
    if expected != got {
        return Err(DatasetError::SizeMismatch {
            dataset: String::new(),
            step: 0,
            got,
            expected,
        });
    }
    Ok(())
}
