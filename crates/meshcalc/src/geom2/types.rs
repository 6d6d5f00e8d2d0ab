//! Basic 2D types and tolerances.
//!
//! - `GeomCfg`: centralizes epsilons for determinants, boundary snapping, and
//!   barycentric acceptance.
//! - `BBox`: closed axis-aligned box, inclusive membership.
//! - `Affine2`: 2D affine map; also serves as a mesh coordinate transform.

use nalgebra::{Matrix2, Vector2};

/// Geometry configuration (tolerances).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GeomCfg {
    /// Relative degeneracy threshold: a cross product `a × b` at or below
    /// `eps_det * |a| |b|` is treated as zero. Dimensionless, so it holds for
    /// any coordinate units.
    pub eps_det: f64,
    /// Distance under which a query point is snapped to a vertex or an edge.
    /// Absolute, in mesh units; tune it for geographic coordinates.
    pub eps_edge: f64,
    /// Slack for barycentric and bilinear coordinates slightly outside [0, 1].
    pub eps_bary: f64,
}

impl Default for GeomCfg {
    fn default() -> Self {
        Self {
            eps_det: 1e-12,
            eps_edge: 1e-9,
            eps_bary: 1e-9,
        }
    }
}

/// Closed axis-aligned bounding box. An empty box has `min > max`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BBox {
    pub min: Vector2<f64>,
    pub max: Vector2<f64>,
}

impl Default for BBox {
    fn default() -> Self {
        Self::empty()
    }
}

impl BBox {
    #[inline]
    pub fn empty() -> Self {
        Self {
            min: Vector2::repeat(f64::INFINITY),
            max: Vector2::repeat(f64::NEG_INFINITY),
        }
    }

    pub fn from_points<I>(points: I) -> Self
    where
        I: IntoIterator<Item = Vector2<f64>>,
    {
        let mut b = Self::empty();
        for p in points {
            b.extend(p);
        }
        b
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y
    }

    #[inline]
    pub fn extend(&mut self, p: Vector2<f64>) {
        self.min = self.min.inf(&p);
        self.max = self.max.sup(&p);
    }

    #[inline]
    pub fn union(&self, other: &BBox) -> BBox {
        BBox {
            min: self.min.inf(&other.min),
            max: self.max.sup(&other.max),
        }
    }

    /// Inclusive membership; always false for an empty box.
    #[inline]
    pub fn contains(&self, p: Vector2<f64>) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    #[inline]
    pub fn width(&self) -> f64 {
        (self.max.x - self.min.x).max(0.0)
    }

    #[inline]
    pub fn height(&self) -> f64 {
        (self.max.y - self.min.y).max(0.0)
    }
}

/// 2D affine map: `x ↦ M x + t`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Affine2 {
    pub m: Matrix2<f64>,
    pub t: Vector2<f64>,
}

impl Affine2 {
    #[inline]
    pub fn identity() -> Self {
        Self {
            m: Matrix2::identity(),
            t: Vector2::zeros(),
        }
    }

    #[inline]
    pub fn translation(t: Vector2<f64>) -> Self {
        Self {
            m: Matrix2::identity(),
            t,
        }
    }

    #[inline]
    pub fn apply(&self, p: Vector2<f64>) -> Vector2<f64> {
        self.m * p + self.t
    }

    /// Inverse map; `None` if `M` is singular.
    #[inline]
    pub fn inverse(&self) -> Option<Self> {
        self.m.try_inverse().map(|minv| Self {
            m: minv,
            t: -minv * self.t,
        })
    }

    /// Composition `self ∘ other`.
    #[inline]
    pub fn compose(&self, other: &Self) -> Self {
        Self {
            m: self.m * other.m,
            t: self.m * other.t + self.t,
        }
    }
}
