//! Point location and value interpolation per element kind.
//!
//! - Triangle: area-ratio barycentric weights.
//! - Quad: bilinear weights from inverse iso-parametric coordinates.
//! - Polygon: generalized barycentric weights.
//! - Line / Undefined: never located by area queries.
//!
//! Element-centered outputs return the stored element value once the point is
//! inside the element's box and passes the containment test. Node-centered
//! outputs blend node values with the element's weights; elements flagged
//! inactive in the output yield no value.
//!
//! `None` means "point not in this element"; a returned `NODATA` means the
//! point is located but its value is unknown. Callers check both.

use nalgebra::Vector2;

use super::topology::Mesh;
use super::types::Shape;
use crate::dataset::{is_nodata, Centering, Output, NODATA, NODATA_VEC};
use crate::geom2::{
    bilinear_weights, contains, generalized_barycentric, quad_local_coords, triangle_barycentric,
};

/// How sentinel node values enter an interpolation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum NoDataPolicy {
    /// Blend sentinel values like any other number (historic behavior).
    #[default]
    PassThrough,
    /// Any sentinel among the element's nodes makes the result the sentinel.
    Propagate,
}

/// Interpolation configuration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InterpCfg {
    pub nodata: NoDataPolicy,
}

/// Node weights of one located query point: `(node index, weight)`.
pub type NodeWeights = Vec<(usize, f64)>;

impl Mesh {
    /// Containment test of `p` (query frame) in element `elem`.
    pub fn contains_point(&self, elem: usize, p: Vector2<f64>) -> bool {
        if elem >= self.element_count() || !self.bbox(elem).contains(p) {
            return false;
        }
        match self.elements()[elem].shape() {
            Shape::Undefined | Shape::Line(_) => false,
            Shape::Triangle(n) => {
                let [a, b, c] = n.map(|i| self.node_xy(i));
                triangle_barycentric(a, b, c, p, self.geom).is_some()
            }
            Shape::Quad(_) | Shape::Polygon(_) => {
                contains(&self.element_xy(elem), p, self.geom.eps_edge)
            }
        }
    }

    /// Interpolation weights of `p` over the nodes of element `elem`.
    pub fn node_weights(&self, elem: usize, p: Vector2<f64>) -> Option<NodeWeights> {
        if elem >= self.element_count() || !self.bbox(elem).contains(p) {
            return None;
        }
        match self.elements()[elem].shape() {
            Shape::Undefined | Shape::Line(_) => None,
            Shape::Triangle(n) => {
                let [a, b, c] = n.map(|i| self.node_xy(i));
                let l = triangle_barycentric(a, b, c, p, self.geom)?;
                Some(n.iter().copied().zip(l).collect())
            }
            Shape::Quad(n) => {
                let corners = n.map(|i| self.node_xy(i));
                if !contains(&corners, p, self.geom.eps_edge) {
                    return None;
                }
                let (u, v) = quad_local_coords(&corners, p, self.geom)?;
                Some(n.iter().copied().zip(bilinear_weights(u, v)).collect())
            }
            Shape::Polygon(n) => {
                let w = generalized_barycentric(&self.element_xy(elem), p, self.geom)?;
                Some(n.iter().copied().zip(w).collect())
            }
        }
    }

    fn contaminated(&self, weights: &NodeWeights, output: &Output) -> bool {
        self.interp.nodata == NoDataPolicy::Propagate
            && weights.iter().any(|&(n, _)| is_nodata(output.value(n)))
    }

    /// Scalar value of `output` at `p` inside element `elem`.
    ///
    /// For vector outputs this is the interpolated magnitude channel.
    pub fn element_value(&self, elem: usize, p: Vector2<f64>, output: &Output) -> Option<f64> {
        match output.centering() {
            Centering::Element => self
                .contains_point(elem, p)
                .then(|| output.value(elem)),
            Centering::Node => {
                if !output.is_active(elem) {
                    return None;
                }
                let w = self.node_weights(elem, p)?;
                if self.contaminated(&w, output) {
                    return Some(NODATA);
                }
                Some(w.iter().map(|&(n, wi)| wi * output.value(n)).sum())
            }
        }
    }

    /// Vector value of `output` at `p` inside element `elem`; components are
    /// blended independently with the same weights. `None` for scalar outputs.
    pub fn element_vector_value(
        &self,
        elem: usize,
        p: Vector2<f64>,
        output: &Output,
    ) -> Option<Vector2<f64>> {
        let vectors = output.vectors()?;
        match output.centering() {
            Centering::Element => self.contains_point(elem, p).then(|| vectors[elem]),
            Centering::Node => {
                if !output.is_active(elem) {
                    return None;
                }
                let w = self.node_weights(elem, p)?;
                if self.contaminated(&w, output) {
                    return Some(NODATA_VEC);
                }
                Some(
                    w.iter()
                        .fold(Vector2::zeros(), |acc, &(n, wi)| acc + vectors[n] * wi),
                )
            }
        }
    }

    /// First element (in index order) locating `p`, with its value; `NODATA`
    /// when no element does.
    pub fn value_at(&self, output: &Output, p: Vector2<f64>) -> f64 {
        (0..self.element_count())
            .filter(|&i| self.bbox(i).contains(p))
            .find_map(|i| self.element_value(i, p, output))
            .unwrap_or(NODATA)
    }

    /// Vector counterpart of [`Mesh::value_at`]; `NODATA_VEC` when not located
    /// or the output is scalar.
    pub fn vector_value_at(&self, output: &Output, p: Vector2<f64>) -> Vector2<f64> {
        (0..self.element_count())
            .filter(|&i| self.bbox(i).contains(p))
            .find_map(|i| self.element_vector_value(i, p, output))
            .unwrap_or(NODATA_VEC)
    }
}
