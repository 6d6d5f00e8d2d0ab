use super::*;
use crate::error::DatasetError;
use crate::mesh::special::{grid, unit_square_quad, GridCells};
use nalgebra::vector;

#[test]
fn zeroed_output_is_sized_to_mesh() {
    let mesh = grid(3, 2, 1.0, GridCells::Quads);
    let n = Output::node(&mesh, false);
    assert_eq!(n.len(), 12);
    assert_eq!(n.active().len(), 6);
    assert!(n.active().iter().all(|&a| a));
    assert!(n.values().iter().all(|&v| v == 0.0));
    assert_eq!(n.time(), 0.0);
    assert!(!n.is_vector());

    let e = Output::element(&mesh, true);
    assert_eq!(e.len(), 6);
    assert_eq!(e.centering(), Centering::Element);
    assert_eq!(e.vectors().map(<[_]>::len), Some(6));
}

#[test]
fn loader_values_must_fit() {
    let mesh = unit_square_quad();
    assert!(Output::from_scalars(&mesh, Centering::Node, 0.0, vec![0.0; 4]).is_ok());
    assert!(matches!(
        Output::from_scalars(&mesh, Centering::Node, 0.0, vec![0.0; 3]),
        Err(DatasetError::SizeMismatch { got: 3, expected: 4, .. })
    ));
    assert_eq!(
        Output::node(&mesh, false).with_active(vec![true, false]),
        Err(DatasetError::ActiveSizeMismatch {
            got: 2,
            expected: 1
        })
    );
}

#[test]
fn vector_magnitudes_track_components() {
    let mesh = unit_square_quad();
    let mut o = Output::node(&mesh, true);
    o.set_vector(1, vector![3.0, 4.0]);
    o.set_vector(2, NODATA_VEC);
    assert_eq!(o.value(1), 5.0);
    assert_eq!(o.value(2), NODATA);
    assert_eq!(o.vector(1), Some(vector![3.0, 4.0]));

    let mut s = Output::node(&mesh, false);
    s.set_vector(0, vector![1.0, 0.0]);
    assert_eq!(s.value(0), 0.0);
    assert_eq!(s.vector(0), None);
    s.set_value(0, 2.5);
    assert_eq!(s.value(0), 2.5);
}

#[test]
fn scalar_writes_leave_vector_magnitudes_alone() {
    let mesh = unit_square_quad();
    let mut o = Output::node(&mesh, true);
    o.set_vector(1, vector![3.0, 4.0]);
    o.set_value(1, 9.0);
    o.set_value(0, 9.0);
    assert_eq!(o.value(1), 5.0);
    assert_eq!(o.value(0), 0.0);
    assert_eq!(o.vector(1), Some(vector![3.0, 4.0]));
}

#[test]
fn active_flags_out_of_range_are_inactive() {
    let mesh = unit_square_quad();
    let mut o = Output::element(&mesh, false);
    assert!(o.is_active(0));
    o.set_active(0, false);
    assert!(!o.is_active(0));
    assert!(!o.is_active(1));
}

#[test]
fn static_dataset_holds_one_output() {
    let mesh = unit_square_quad();
    let mut ds = Dataset::new("bed", false, false);
    assert_eq!(ds.add_output(Output::node(&mesh, false)), Ok(0));
    assert_eq!(
        ds.add_output(Output::node(&mesh, false)),
        Err(DatasetError::StaticOverflow {
            dataset: "bed".into()
        })
    );
    assert_eq!(ds.output_count(), 1);
    assert_eq!(ds.centering(), Some(Centering::Node));
}

#[test]
fn outputs_share_centering_and_kind() {
    let mesh = unit_square_quad();
    let mut ds = Dataset::new("depth", false, true);
    assert_eq!(ds.centering(), None);
    ds.add_output(Output::node(&mesh, false)).unwrap();
    assert!(matches!(
        ds.add_output(Output::element(&mesh, false)),
        Err(DatasetError::CenteringMismatch { .. })
    ));
    assert!(matches!(
        ds.add_output(Output::node(&mesh, true)),
        Err(DatasetError::VectorMismatch { .. })
    ));
    let step = ds
        .add_output(Output::node(&mesh, false).with_time(3600.0))
        .unwrap();
    assert_eq!(step, 1);
    assert_eq!(ds.times(), vec![0.0, 3600.0]);
}

#[test]
fn transfer_moves_everything_or_nothing() {
    let mesh = unit_square_quad();
    let mut target = Dataset::new("depth", false, true);
    target.add_output(Output::node(&mesh, false)).unwrap();

    let mut staged = Dataset::new("staging", false, true);
    for t in [1.0, 2.0] {
        staged
            .add_output(Output::node(&mesh, false).with_time(t))
            .unwrap();
    }
    target.transfer_outputs(&mut staged).unwrap();
    assert_eq!(target.times(), vec![0.0, 1.0, 2.0]);
    assert_eq!(staged.output_count(), 0);

    let mut wrong = Dataset::new("wrong", false, true);
    wrong.add_output(Output::element(&mesh, false)).unwrap();
    assert!(target.transfer_outputs(&mut wrong).is_err());
    assert_eq!(target.output_count(), 3);
    assert_eq!(wrong.output_count(), 1);

    let mut fixed = Dataset::new("fixed", false, false);
    let mut two = Dataset::new("two", false, true);
    two.add_output(Output::node(&mesh, false)).unwrap();
    two.add_output(Output::node(&mesh, false)).unwrap();
    assert!(matches!(
        fixed.transfer_outputs(&mut two),
        Err(DatasetError::StaticOverflow { .. })
    ));
    assert_eq!(two.output_count(), 2);
}

#[test]
fn sentinel_is_exact() {
    assert!(is_nodata(NODATA));
    assert!(is_nodata(-9999.0));
    assert!(!is_nodata(-9999.0001));
    assert!(!is_nodata(f64::NAN));
}
