use super::special::{grid, mixed, unit_square_quad, GridCells};
use super::*;
use crate::dataset::{Centering, Dataset, Output, NODATA, NODATA_VEC};
use crate::error::{DatasetError, MeshError, TransformError};
use crate::geom2::Affine2;
use nalgebra::{vector, Vector2};
use proptest::prelude::*;

fn node_output(mesh: &Mesh, values: Vec<f64>) -> Output {
    Output::from_scalars(mesh, Centering::Node, 0.0, values).unwrap()
}

fn linear(p: Vector2<f64>) -> f64 {
    2.0 * p.x - 3.0 * p.y + 1.0
}

fn sample_linear(mesh: &Mesh) -> Output {
    let values = mesh.nodes().iter().map(|n| linear(n.xy)).collect();
    node_output(mesh, values)
}

#[test]
fn quad_center_is_bilinear_average() {
    let mesh = unit_square_quad();
    let o = node_output(&mesh, vec![0.0, 1.0, 1.0, 0.0]);
    assert!((mesh.value_at(&o, vector![0.5, 0.5]) - 0.5).abs() < 1e-12);
    assert!((mesh.value_at(&o, vector![0.25, 0.9]) - 0.25).abs() < 1e-12);
    let v = mesh.element_value(0, vector![0.5, 0.5], &o).unwrap();
    assert!((v - 0.5).abs() < 1e-12);
}

#[test]
fn nearly_rectangular_quad_is_bilinear() {
    // corner c sits one rounding step off the rectangle
    for (size, jitter) in [(1000.0, 1e-12), (1.0, 2e-12)] {
        let nodes = vec![
            Node::new(1, 0.0, 0.0),
            Node::new(2, size, 0.0),
            Node::new(3, size + jitter, size),
            Node::new(4, 0.0, size),
        ];
        let mesh = Mesh::new(nodes, vec![Element::quad(1, [0, 1, 2, 3])]).unwrap();
        let o = node_output(&mesh, vec![0.0, 0.0, 1.0, 1.0]);
        let v = mesh.element_value(0, vector![0.25 * size, 0.5 * size], &o).unwrap();
        assert!((v - 0.5).abs() < 1e-9, "size {size}: {v}");
    }
}

#[test]
fn small_triangle_in_degree_units_is_located() {
    let nodes = vec![
        Node::new(1, 14.0, 50.0),
        Node::new(2, 14.0 + 1e-6, 50.0),
        Node::new(3, 14.0, 50.0 + 1e-6),
    ];
    let mesh = Mesh::new(nodes, vec![Element::triangle(1, [0, 1, 2])]).unwrap();
    let o = node_output(&mesh, vec![0.0, 1.0, 2.0]);
    let v = mesh.value_at(&o, vector![14.0 + 0.25e-6, 50.0 + 0.25e-6]);
    assert!((v - 0.75).abs() < 1e-6, "{v}");
}

#[test]
fn outside_point_is_not_located() {
    let mesh = unit_square_quad();
    let o = node_output(&mesh, vec![0.0, 1.0, 1.0, 0.0]);
    assert_eq!(mesh.element_value(0, vector![1.5, 0.5], &o), None);
    assert_eq!(mesh.value_at(&o, vector![1.5, 0.5]), NODATA);
    assert_eq!(mesh.value_at(&o, vector![-1e-3, 0.5]), NODATA);
    // out-of-range element index
    assert_eq!(mesh.element_value(7, vector![0.5, 0.5], &o), None);
}

#[test]
fn triangles_reproduce_node_values() {
    let mesh = grid(2, 2, 1.0, GridCells::Triangles);
    let values: Vec<f64> = (0..mesh.node_count()).map(|i| i as f64 * 1.5 - 2.0).collect();
    let o = node_output(&mesh, values.clone());
    for (i, n) in mesh.nodes().iter().enumerate() {
        let v = mesh.value_at(&o, n.xy);
        assert!((v - values[i]).abs() < 1e-12, "node {i}: {v} vs {}", values[i]);
    }
}

#[test]
fn element_centered_returns_stored_value() {
    let mesh = grid(2, 1, 1.0, GridCells::Quads);
    let o = Output::from_scalars(&mesh, Centering::Element, 0.0, vec![4.0, 7.0]).unwrap();
    assert_eq!(mesh.value_at(&o, vector![0.3, 0.3]), 4.0);
    assert_eq!(mesh.value_at(&o, vector![1.7, 0.3]), 7.0);
    assert_eq!(mesh.value_at(&o, vector![2.7, 0.3]), NODATA);
    // shared edge: first element in index order wins
    assert_eq!(mesh.value_at(&o, vector![1.0, 0.5]), 4.0);
}

#[test]
fn line_and_undefined_are_never_located() {
    let mesh = mixed();
    let o = node_output(&mesh, vec![1.0; mesh.node_count()]);
    // (0, 0.5) lies on the line element 3 → 0; only the quad may claim it.
    assert!(!mesh.contains_point(3, vector![0.0, 0.5]));
    assert!(!mesh.contains_point(4, vector![0.0, 0.5]));
    assert_eq!(mesh.element_value(3, vector![0.0, 0.5], &o), None);
    assert_eq!(mesh.element_value(4, vector![0.0, 0.5], &o), None);
    assert!(mesh.bbox(4).is_empty());
    assert_eq!(mesh.value_at(&o, vector![0.0, 0.5]), 1.0);
}

#[test]
fn pentagon_reproduces_linear_field() {
    let mesh = mixed();
    let o = sample_linear(&mesh);
    let c = mesh.element_centroid(2);
    assert!(mesh.contains_point(2, c));
    assert!(!mesh.contains_point(0, c));
    assert!(!mesh.contains_point(1, c));
    let v = mesh.value_at(&o, c);
    assert!((v - linear(c)).abs() < 1e-9, "{v} vs {}", linear(c));
    let w = mesh.node_weights(2, c).unwrap();
    let total: f64 = w.iter().map(|&(_, wi)| wi).sum();
    assert!((total - 1.0).abs() < 1e-12);
    assert_eq!(
        w.iter().map(|&(n, _)| n).collect::<Vec<_>>(),
        vec![2, 4, 5, 6, 7]
    );
}

#[test]
fn element_counts_per_kind() {
    let mesh = mixed();
    assert_eq!(mesh.element_count(), 5);
    for kind in [
        ElementKind::Quad,
        ElementKind::Triangle,
        ElementKind::Polygon,
        ElementKind::Line,
        ElementKind::Undefined,
    ] {
        assert_eq!(mesh.element_count_for_kind(kind), 1, "{kind:?}");
    }
    let g = grid(3, 2, 1.0, GridCells::Triangles);
    assert_eq!(g.element_count_for_kind(ElementKind::Triangle), 12);
    assert_eq!(g.element_count_for_kind(ElementKind::Quad), 0);
}

#[test]
fn inactive_element_yields_nothing() {
    let mesh = grid(2, 1, 1.0, GridCells::Quads);
    let o = sample_linear(&mesh).with_active(vec![false, true]).unwrap();
    assert_eq!(mesh.element_value(0, vector![0.5, 0.5], &o), None);
    assert_eq!(mesh.value_at(&o, vector![0.5, 0.5]), NODATA);
    // the shared edge is still reachable through the active neighbour
    let p = vector![1.0, 0.5];
    assert!((mesh.value_at(&o, p) - linear(p)).abs() < 1e-12);
}

#[test]
fn nodata_policy_controls_blending() {
    let mut mesh = unit_square_quad();
    let o = node_output(&mesh, vec![1.0, 1.0, NODATA, 1.0]);
    let p = vector![0.25, 0.25];
    let blended = mesh.value_at(&o, p);
    assert_ne!(blended, NODATA);
    assert!(blended < 0.0);

    mesh.set_interp_cfg(InterpCfg {
        nodata: NoDataPolicy::Propagate,
    });
    assert_eq!(mesh.value_at(&o, p), NODATA);
    // a located point with an all-valid element is unaffected
    let clean = node_output(&mesh, vec![1.0; 4]);
    assert!((mesh.value_at(&clean, p) - 1.0).abs() < 1e-12);
}

#[test]
fn vector_values_blend_components() {
    let mesh = unit_square_quad();
    let vectors = vec![
        vector![1.0, 0.0],
        vector![3.0, 0.0],
        vector![3.0, 4.0],
        vector![1.0, 4.0],
    ];
    let o = Output::from_vectors(&mesh, Centering::Node, 0.0, vectors).unwrap();
    let magnitudes = [1.0, 3.0, 5.0, 17f64.sqrt()];
    for (m, expected) in o.values().iter().zip(magnitudes) {
        assert!((m - expected).abs() < 1e-12);
    }
    let v = mesh.vector_value_at(&o, vector![0.5, 0.5]);
    assert!((v - vector![2.0, 2.0]).norm() < 1e-12);
    assert_eq!(mesh.vector_value_at(&o, vector![2.0, 2.0]), NODATA_VEC);

    let scalar = node_output(&mesh, vec![0.0; 4]);
    assert_eq!(mesh.element_vector_value(0, vector![0.5, 0.5], &scalar), None);
    assert_eq!(mesh.vector_value_at(&scalar, vector![0.5, 0.5]), NODATA_VEC);
}

#[test]
fn affine_transform_moves_queries() {
    let mut mesh = unit_square_quad();
    let o = node_output(&mesh, vec![0.0, 1.0, 1.0, 0.0]);
    mesh.set_transform(Affine2::translation(vector![10.0, 0.0]))
        .unwrap();
    assert!(mesh.has_transform());
    assert_eq!(mesh.extent().min, vector![10.0, 0.0]);
    assert_eq!(mesh.raw_extent().min, vector![0.0, 0.0]);
    assert_eq!(mesh.raw_bbox(0).max, vector![1.0, 1.0]);
    assert!((mesh.value_at(&o, vector![10.5, 0.5]) - 0.5).abs() < 1e-12);
    assert_eq!(mesh.value_at(&o, vector![0.5, 0.5]), NODATA);

    mesh.clear_transform();
    assert!(!mesh.has_transform());
    assert!((mesh.value_at(&o, vector![0.5, 0.5]) - 0.5).abs() < 1e-12);
}

#[test]
fn failing_transform_falls_back_to_raw() {
    let mut mesh = unit_square_quad();
    mesh.set_transform(Affine2::translation(vector![5.0, 5.0]))
        .unwrap();
    let reject_far = FnTransform(|p: Vector2<f64>| (p.x < 0.5).then_some(p));
    assert_eq!(
        mesh.set_transform(reject_far),
        Err(TransformError::NodeFailed { node: 1 })
    );
    assert!(!mesh.has_transform());
    assert_eq!(mesh.extent(), mesh.raw_extent());
    assert_eq!(mesh.node_xy(2), vector![1.0, 1.0]);

    let nan = FnTransform(|_: Vector2<f64>| Some(vector![f64::NAN, 0.0]));
    assert!(mesh.set_transform(nan).is_err());
    assert!(!mesh.has_transform());
}

#[test]
fn construction_checks_node_indices() {
    let nodes = vec![Node::new(1, 0.0, 0.0), Node::new(2, 1.0, 0.0)];
    let err = Mesh::new(nodes, vec![Element::triangle(1, [0, 1, 2])]).unwrap_err();
    assert_eq!(
        err,
        MeshError::NodeOutOfRange {
            element: 0,
            node: 2,
            node_count: 2,
        }
    );
}

#[test]
fn element_from_node_count() {
    assert_eq!(Element::from_nodes(1, &[]).unwrap().kind(), ElementKind::Undefined);
    assert_eq!(Element::from_nodes(1, &[0]), Err(MeshError::SingleNode));
    assert_eq!(Element::from_nodes(1, &[0, 1]).unwrap().kind(), ElementKind::Line);
    assert_eq!(
        Element::from_nodes(1, &[0, 1, 2]).unwrap().kind(),
        ElementKind::Triangle
    );
    assert_eq!(
        Element::from_nodes(1, &[0, 1, 2, 3]).unwrap().kind(),
        ElementKind::Quad
    );
    let p = Element::from_nodes(9, &[0, 1, 2, 3, 4]).unwrap();
    assert_eq!(p.kind(), ElementKind::Polygon);
    assert_eq!(p.node_count(), 5);
    assert_eq!(Element::polygon(1, vec![0, 1]), Err(MeshError::PolygonTooSmall(2)));
}

#[test]
fn datasets_are_addressed_by_id_and_step() {
    let mut mesh = unit_square_quad();
    let mut ds = Dataset::new("depth", false, true);
    for t in [0.0, 60.0] {
        ds.add_output(node_output(&mesh, vec![t; 4]).with_time(t))
            .unwrap();
    }
    let id = mesh.add_dataset(ds).unwrap();
    assert_eq!(mesh.dataset_id("depth"), Some(id));
    assert_eq!(mesh.dataset_id("other"), None);
    let r = OutputRef {
        dataset: id,
        step: 1,
    };
    assert_eq!(mesh.output(r).unwrap().time(), 60.0);
    assert!(mesh.output(OutputRef { step: 2, ..r }).is_none());
    assert_eq!(mesh.dataset_by_id(id).unwrap().name(), "depth");
}

#[test]
fn add_dataset_rejects_foreign_sizes() {
    let other = grid(2, 1, 1.0, GridCells::Quads);
    let mut mesh = unit_square_quad();
    let mut ds = Dataset::new("foreign", false, false);
    ds.add_output(node_output(&other, vec![0.0; 6])).unwrap();
    assert_eq!(
        mesh.add_dataset(ds),
        Err(DatasetError::SizeMismatch {
            dataset: "foreign".into(),
            step: 0,
            got: 6,
            expected: 4,
        })
    );
    assert!(mesh.datasets().is_empty());
}

proptest! {
    #[test]
    fn linear_field_reproduced_on_grids(
        x in 0.0f64..2.0,
        y in 0.0f64..2.0,
        triangles in any::<bool>(),
    ) {
        let cells = if triangles { GridCells::Triangles } else { GridCells::Quads };
        let mesh = grid(4, 4, 0.5, cells);
        let o = sample_linear(&mesh);
        let p = vector![x, y];
        let v = mesh.value_at(&o, p);
        prop_assert!((v - linear(p)).abs() < 1e-9, "{} vs {}", v, linear(p));
    }

    #[test]
    fn translation_commutes_with_value_at(
        x in 0.0f64..1.0,
        y in 0.0f64..1.0,
        dx in -100.0f64..100.0,
        dy in -100.0f64..100.0,
    ) {
        let mut mesh = unit_square_quad();
        let o = node_output(&mesh, vec![0.0, 1.0, 3.0, 2.0]);
        let before = mesh.value_at(&o, vector![x, y]);
        mesh.set_transform(Affine2::translation(vector![dx, dy])).unwrap();
        let after = mesh.value_at(&o, vector![x + dx, y + dy]);
        prop_assert!((before - after).abs() < 1e-9, "{} vs {}", before, after);
    }
}
