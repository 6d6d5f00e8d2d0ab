//! Simple polygons given as ordered vertex slices (closing edge implicit).
//!
//! - `point_in_polygon`: even-odd ray casting.
//! - `locate_on_boundary` / `contains`: boundary-inclusive membership.
//! - `generalized_barycentric`: cotangent (Wachspress) weights with explicit
//!   vertex/edge snapping and a mean-value fallback for interior points that
//!   are collinear with an edge of a non-convex polygon.

use nalgebra::Vector2;

use super::types::GeomCfg;
use super::util::cross2;

/// Where a query point touches a polygon boundary.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum BoundaryHit {
    /// Coincides with vertex `i`.
    Vertex(usize),
    /// Lies on the edge `start → start+1` at parameter `t ∈ (0, 1)`.
    Edge { start: usize, t: f64 },
}

/// Even-odd rule ray casting (ray towards +x).
///
/// Edges are evaluated bottom-up so the crossing abscissa does not depend on
/// traversal direction; horizontal edges never satisfy the straddle test and
/// so are neither divided by nor double counted.
pub fn point_in_polygon(vertices: &[Vector2<f64>], p: Vector2<f64>) -> bool {
    let n = vertices.len();
    if n < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let (a, b) = (vertices[i], vertices[j]);
        if (a.y > p.y) != (b.y > p.y) {
            let (lo, hi) = if a.y < b.y { (a, b) } else { (b, a) };
            let x = lo.x + (p.y - lo.y) * (hi.x - lo.x) / (hi.y - lo.y);
            if p.x < x {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// Snap `p` to a vertex or an edge within `eps`. Vertices take precedence.
pub fn locate_on_boundary(vertices: &[Vector2<f64>], p: Vector2<f64>, eps: f64) -> Option<BoundaryHit> {
    let n = vertices.len();
    if let Some(i) = vertices.iter().position(|v| (v - p).norm_squared() <= eps * eps) {
        return Some(BoundaryHit::Vertex(i));
    }
    for i in 0..n {
        let a = vertices[i];
        let e = vertices[(i + 1) % n] - a;
        let len2 = e.norm_squared();
        if len2 <= eps * eps {
            continue;
        }
        let t = (p - a).dot(&e) / len2;
        if !(0.0..=1.0).contains(&t) {
            continue;
        }
        if cross2(e, p - a).abs() / len2.sqrt() <= eps {
            return Some(BoundaryHit::Edge { start: i, t });
        }
    }
    None
}

/// Boundary-inclusive containment.
#[inline]
pub fn contains(vertices: &[Vector2<f64>], p: Vector2<f64>, eps: f64) -> bool {
    vertices.len() >= 3
        && (locate_on_boundary(vertices, p, eps).is_some() || point_in_polygon(vertices, p))
}

/// Arithmetic mean of the vertices; origin for an empty slice.
pub fn centroid(vertices: &[Vector2<f64>]) -> Vector2<f64> {
    if vertices.is_empty() {
        return Vector2::zeros();
    }
    let sum = vertices.iter().fold(Vector2::zeros(), |acc, v| acc + v);
    sum / vertices.len() as f64
}

/// Cotangent of the angle at `v` between `p - v` and `n - v`, as dot/|cross|.
///
/// `None` when the three points are collinear.
#[inline]
fn cotangent(p: Vector2<f64>, v: Vector2<f64>, n: Vector2<f64>, eps: f64) -> Option<f64> {
    let a = v - p;
    let b = v - n;
    let cp = cross2(b, a).abs();
    if cp <= eps * a.norm() * b.norm() {
        return None;
    }
    Some(b.dot(&a) / cp)
}

fn cotangent_weights(vertices: &[Vector2<f64>], p: Vector2<f64>, eps: f64) -> Option<Vec<f64>> {
    let n = vertices.len();
    let mut w = Vec::with_capacity(n);
    for i in 0..n {
        let v = vertices[i];
        let prev = vertices[(i + n - 1) % n];
        let next = vertices[(i + 1) % n];
        let cot_prev = cotangent(p, v, prev, eps)?;
        let cot_next = cotangent(p, v, next, eps)?;
        w.push((cot_prev + cot_next) / (v - p).norm_squared());
    }
    Some(w)
}

/// Mean value weights; well defined for any point strictly inside a simple polygon.
fn mean_value_weights(vertices: &[Vector2<f64>], p: Vector2<f64>) -> Vec<f64> {
    let n = vertices.len();
    let d: Vec<Vector2<f64>> = vertices.iter().map(|v| v - p).collect();
    let r: Vec<f64> = d.iter().map(|di| di.norm()).collect();
    // tan(α_i / 2) for the angle at p between d_i and d_{i+1} (signed)
    let tan_half: Vec<f64> = (0..n)
        .map(|i| {
            let j = (i + 1) % n;
            cross2(d[i], d[j]) / (r[i] * r[j] + d[i].dot(&d[j]))
        })
        .collect();
    (0..n)
        .map(|i| (tan_half[(i + n - 1) % n] + tan_half[i]) / r[i])
        .collect()
}

/// Generalized barycentric coordinates of `p` in a simple polygon.
///
/// Pre: at least 3 vertices. Post: one weight per vertex, summing to 1, with
/// `Σ w_i v_i = p`; non-negative for convex polygons. `None` when `p` is
/// outside or the polygon is degenerate.
pub fn generalized_barycentric(
    vertices: &[Vector2<f64>],
    p: Vector2<f64>,
    cfg: GeomCfg,
) -> Option<Vec<f64>> {
    let n = vertices.len();
    if n < 3 {
        return None;
    }
    if let Some(hit) = locate_on_boundary(vertices, p, cfg.eps_edge) {
        let mut w = vec![0.0; n];
        match hit {
            BoundaryHit::Vertex(i) => w[i] = 1.0,
            BoundaryHit::Edge { start, t } => {
                w[start] = 1.0 - t;
                w[(start + 1) % n] = t;
            }
        }
        return Some(w);
    }
    if !point_in_polygon(vertices, p) {
        return None;
    }
    let mut w = cotangent_weights(vertices, p, cfg.eps_det)
        .unwrap_or_else(|| mean_value_weights(vertices, p));
    let sum: f64 = w.iter().sum();
    let mass: f64 = w.iter().map(|x| x.abs()).sum();
    if !sum.is_finite() || sum.abs() <= cfg.eps_det * mass {
        return None;
    }
    for wi in &mut w {
        *wi /= sum;
    }
    Some(w)
}
