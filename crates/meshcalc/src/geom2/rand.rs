//! Random convex polygons and interior points (radial jitter + replay tokens).
//!
//! Purpose
//! - Deterministic samples for property tests and benchmarks of the
//!   interpolation kernel. Draws are reproducible from a `(seed, index)` token.
//!
//! Model
//! - Start from `n` equally spaced angles on [0, 2π), add bounded angular and
//!   radial jitter, then take the convex hull (CCW).
//! - Interior points are strictly positive convex combinations of the vertices.

use nalgebra::Vector2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::util::convex_hull;

/// Vertex count distribution.
#[derive(Clone, Copy, Debug)]
pub enum VertexCount {
    Fixed(usize),
    Uniform { min: usize, max: usize },
}
impl VertexCount {
    fn sample<R: Rng>(&self, rng: &mut R) -> usize {
        match *self {
            VertexCount::Fixed(n) => n.max(3),
            VertexCount::Uniform { min, max } => {
                let lo = min.max(3);
                let hi = max.max(lo);
                rng.gen_range(lo..=hi)
            }
        }
    }
}

/// Radial-jitter sampler configuration.
#[derive(Clone, Copy, Debug)]
pub struct RadialCfg {
    pub vertex_count: VertexCount,
    /// Angular jitter as a fraction of the base spacing Δ=2π/n. Clamped to [0, 0.49].
    pub angle_jitter_frac: f64,
    /// Radii = `base_radius * (1 + u)`, with `u∈[-radial_jitter, radial_jitter]`.
    pub radial_jitter: f64,
    pub base_radius: f64,
    /// Polygon center.
    pub center: Vector2<f64>,
    pub random_phase: bool,
}
impl Default for RadialCfg {
    fn default() -> Self {
        Self {
            vertex_count: VertexCount::Fixed(6),
            angle_jitter_frac: 0.3,
            radial_jitter: 0.25,
            base_radius: 1.0,
            center: Vector2::zeros(),
            random_phase: true,
        }
    }
}

/// Replay token to make draws reproducible and indexable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReplayToken {
    pub seed: u64,
    pub index: u64,
}
impl ReplayToken {
    #[inline]
    pub fn to_std_rng(self) -> StdRng {
        // SplitMix64-style mixing, cheap and stable.
        fn mix(mut x: u64) -> u64 {
            x ^= x >> 30;
            x = x.wrapping_mul(0xbf58476d1ce4e5b9);
            x ^= x >> 27;
            x = x.wrapping_mul(0x94d049bb133111eb);
            x ^ (x >> 31)
        }
        let k = mix(self.seed ^ mix(self.index.wrapping_add(0x9e3779b97f4a7c15)));
        StdRng::seed_from_u64(k)
    }

    /// Token for the next draw in the same stream.
    #[inline]
    pub fn next(self) -> Self {
        Self {
            seed: self.seed,
            index: self.index.wrapping_add(1),
        }
    }
}

/// Draw a random convex polygon (CCW vertices) via radial jitter + convex hull.
///
/// Hull may drop jittered points, so the vertex count can be below the draw.
pub fn draw_polygon_radial(cfg: RadialCfg, tok: ReplayToken) -> Option<Vec<Vector2<f64>>> {
    let mut rng = tok.to_std_rng();
    let n = cfg.vertex_count.sample(&mut rng).max(3);
    let aj = cfg.angle_jitter_frac.clamp(0.0, 0.49);
    let rj = cfg.radial_jitter.clamp(0.0, 0.9);
    let r0 = cfg.base_radius.max(1e-9);
    let delta = 2.0 * std::f64::consts::PI / (n as f64);
    let phase = if cfg.random_phase {
        rng.gen::<f64>() * 2.0 * std::f64::consts::PI
    } else {
        0.0
    };
    let pts: Vec<Vector2<f64>> = (0..n)
        .map(|k| {
            let th = phase + (k as f64) * delta + (rng.gen::<f64>() * 2.0 - 1.0) * aj * delta;
            let u = (rng.gen::<f64>() * 2.0 - 1.0) * rj;
            let r = (1.0 + u) * r0;
            cfg.center + Vector2::new(th.cos() * r, th.sin() * r)
        })
        .collect();
    convex_hull(&pts)
}

/// Strictly positive convex combination of `vertices` (interior for convex input).
pub fn draw_interior_point(vertices: &[Vector2<f64>], tok: ReplayToken) -> Option<Vector2<f64>> {
    if vertices.is_empty() {
        return None;
    }
    let mut rng = tok.to_std_rng();
    let w: Vec<f64> = vertices.iter().map(|_| rng.gen_range(0.05..1.0)).collect();
    let total: f64 = w.iter().sum();
    let p = vertices
        .iter()
        .zip(&w)
        .fold(Vector2::zeros(), |acc, (v, wi)| acc + v * *wi);
    Some(p / total)
}

/// `count` values drawn uniformly from `[lo, hi)`.
pub fn draw_values(count: usize, lo: f64, hi: f64, tok: ReplayToken) -> Vec<f64> {
    let mut rng = tok.to_std_rng();
    (0..count).map(|_| rng.gen_range(lo..hi)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom2::point_in_polygon;

    #[test]
    fn reproducible_draw() {
        let cfg = RadialCfg {
            vertex_count: VertexCount::Fixed(10),
            angle_jitter_frac: 0.2,
            radial_jitter: 0.1,
            ..RadialCfg::default()
        };
        let tok = ReplayToken { seed: 42, index: 7 };
        let p1 = draw_polygon_radial(cfg, tok).expect("poly");
        let p2 = draw_polygon_radial(cfg, tok).expect("poly");
        assert_eq!(p1.len(), p2.len());
        for (a, b) in p1.iter().zip(p2.iter()) {
            assert!((a - b).norm() < 1e-12);
        }
    }

    #[test]
    fn interior_points_are_inside() {
        let cfg = RadialCfg {
            center: Vector2::new(3.0, -2.0),
            ..RadialCfg::default()
        };
        let mut tok = ReplayToken { seed: 9, index: 0 };
        for _ in 0..50 {
            let poly = draw_polygon_radial(cfg, tok).unwrap();
            let p = draw_interior_point(&poly, tok.next()).unwrap();
            assert!(point_in_polygon(&poly, p));
            tok = tok.next().next();
        }
    }
}
