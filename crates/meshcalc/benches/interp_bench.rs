//! Criterion benchmarks for point location and interpolation.
//! Focus sizes: grid side n in {8, 32, 128}; polygon vertex count in {5, 10, 20}.
//! Results: by default under target/criterion; to store under data/bench, run:
//!   CARGO_TARGET_DIR=data/bench cargo bench -p meshcalc

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use meshcalc::geom2::rand::{draw_interior_point, draw_polygon_radial, RadialCfg, ReplayToken, VertexCount};
use meshcalc::geom2::{generalized_barycentric, GeomCfg};
use meshcalc::mesh::special::{grid, GridCells};
use meshcalc::mesh::Mesh;
use meshcalc::{Centering, Output};
use nalgebra::Vector2;
use rand::{rngs::StdRng, Rng, SeedableRng};

fn queries(n: usize, side: f64, seed: u64) -> Vec<Vector2<f64>> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|_| Vector2::new(rng.gen_range(0.0..side), rng.gen_range(0.0..side)))
        .collect()
}

fn field(mesh: &Mesh) -> Output {
    let values = mesh.nodes().iter().map(|n| n.xy.x * n.xy.y).collect();
    Output::from_scalars(mesh, Centering::Node, 0.0, values).expect("sized to mesh")
}

fn bench_value_at(c: &mut Criterion) {
    let mut group = c.benchmark_group("value_at");
    for &n in &[8usize, 32, 128] {
        for (label, cells) in [("quads", GridCells::Quads), ("triangles", GridCells::Triangles)] {
            let mesh = grid(n, n, 1.0, cells);
            let o = field(&mesh);
            let pts = queries(64, n as f64, 11);
            group.bench_with_input(BenchmarkId::new(label, n), &n, |b, _| {
                b.iter(|| pts.iter().map(|&p| mesh.value_at(&o, p)).sum::<f64>())
            });
        }
    }
    group.finish();
}

fn bench_gbc(c: &mut Criterion) {
    let mut group = c.benchmark_group("generalized_barycentric");
    let cfg = GeomCfg::default();
    for &k in &[5usize, 10, 20] {
        let tok = ReplayToken { seed: 5, index: k as u64 };
        let radial = RadialCfg {
            vertex_count: VertexCount::Fixed(k),
            angle_jitter_frac: 0.1,
            radial_jitter: 0.05,
            ..RadialCfg::default()
        };
        let poly = draw_polygon_radial(radial, tok).expect("hull of >= 3 points");
        let p = draw_interior_point(&poly, tok.next()).expect("non-empty polygon");
        group.bench_with_input(BenchmarkId::new("interior", k), &k, |b, _| {
            b.iter(|| generalized_barycentric(&poly, p, cfg))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_value_at, bench_gbc);
criterion_main!(benches);
