//! Local coordinates for the fixed-size element shapes.

use nalgebra::Vector2;

use super::types::GeomCfg;
use super::util::cross2;

/// Area-ratio barycentric coordinates `(λa, λb, λc)` of `p` in triangle `abc`.
///
/// Returns `None` for a degenerate triangle (sine of the angle at `a` at or
/// below `cfg.eps_det`) or a point outside by more than `cfg.eps_bary`. At a
/// vertex the matching coordinate is exactly 1.
pub fn triangle_barycentric(
    a: Vector2<f64>,
    b: Vector2<f64>,
    c: Vector2<f64>,
    p: Vector2<f64>,
    cfg: GeomCfg,
) -> Option<[f64; 3]> {
    let (ab, ac) = (b - a, c - a);
    let det = cross2(ab, ac);
    if det.abs() <= cfg.eps_det * ab.norm() * ac.norm() {
        return None;
    }
    let la = cross2(b - p, c - p) / det;
    let lb = cross2(c - p, a - p) / det;
    let lc = 1.0 - la - lb;
    if la < -cfg.eps_bary || lb < -cfg.eps_bary || lc < -cfg.eps_bary {
        return None;
    }
    Some([la, lb, lc])
}

/// Inverse of the bilinear map `(u, v) ↦ a + e u + f v + g u v` spanned by the
/// quad corners `[a, b, c, d]` (with `e = b − a`, `f = d − a`, `g = a − b + c − d`).
///
/// Returns `(u, v)` clamped to `[0, 1]²`, or `None` if no root lies inside the
/// unit square (within `cfg.eps_bary`).
pub fn quad_local_coords(corners: &[Vector2<f64>; 4], p: Vector2<f64>, cfg: GeomCfg) -> Option<(f64, f64)> {
    let [a, b, c, d] = *corners;
    let e = b - a;
    let f = d - a;
    let g = a - b + c - d;
    let h = p - a;

    let k2 = cross2(g, f);
    let k1 = cross2(e, f) + cross2(h, g);
    let k0 = cross2(h, e);

    // tolerances relative to the element size
    let len = e.norm().max(f.norm());
    let area = len * len;

    let in_range = |x: f64| x >= -cfg.eps_bary && x <= 1.0 + cfg.eps_bary;
    // u from v, dividing by the better-conditioned component
    let solve_u = |v: f64| -> Option<f64> {
        let dx = e.x + g.x * v;
        let dy = e.y + g.y * v;
        if dx.abs() >= dy.abs() {
            (dx.abs() > cfg.eps_det * len).then(|| (h.x - f.x * v) / dx)
        } else {
            (dy.abs() > cfg.eps_det * len).then(|| (h.y - f.y * v) / dy)
        }
    };

    let candidates: [Option<f64>; 2] = if k2.abs() <= cfg.eps_det * area {
        // parallelogram up to rounding: k2 v² is below the noise of k1 v
        if k1.abs() <= cfg.eps_det * area {
            return None;
        }
        [Some(-k0 / k1), None]
    } else {
        let disc = k1 * k1 - 4.0 * k0 * k2;
        if disc < 0.0 {
            return None;
        }
        // cancellation-free pair of roots
        let q = -0.5 * (k1 + k1.signum() * disc.sqrt());
        if q == 0.0 {
            [Some(0.0), None]
        } else {
            [Some(q / k2), Some(k0 / q)]
        }
    };

    for v in candidates.into_iter().flatten() {
        if !in_range(v) {
            continue;
        }
        if let Some(u) = solve_u(v) {
            if in_range(u) {
                return Some((u.clamp(0.0, 1.0), v.clamp(0.0, 1.0)));
            }
        }
    }
    None
}

/// Corner weights of the bilinear map at local coordinates `(u, v)`, in corner order.
#[inline]
pub fn bilinear_weights(u: f64, v: f64) -> [f64; 4] {
    [
        (1.0 - u) * (1.0 - v),
        u * (1.0 - v),
        u * v,
        (1.0 - u) * v,
    ]
}
