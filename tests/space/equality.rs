use std::sync::Arc;

use nalgebra::{DMatrix, DVector};
use ndarray::{Array2, ArrayView2, Axis, array};
use searchspace::constraint::ConstraintFunction;
use searchspace::prelude::*;

fn unit_box() -> Space {
    BoxSpace::new(vec![0.0, 0.0], vec![1.0, 1.0]).unwrap().into()
}

#[test]
fn equal_descriptions_compare_equal() {
    assert_eq!(unit_box(), unit_box());
    assert_ne!(
        unit_box(),
        Space::from(BoxSpace::new(vec![0.0, 0.0], vec![1.0, 2.0]).unwrap())
    );

    let rows = array![[0.0, 1.0], [2.0, 3.0]];
    let flipped = array![[2.0, 3.0], [0.0, 1.0]];
    assert_eq!(
        DiscreteSearchSpace::new(rows).unwrap(),
        DiscreteSearchSpace::new(flipped).unwrap()
    );
}

#[test]
fn different_kinds_are_never_equal() {
    let categorical: Space = CategoricalSearchSpace::new(2).unwrap().into();
    let discrete: Space = DiscreteSearchSpace::new(array![[0.0], [1.0]]).unwrap().into();
    assert_ne!(categorical, discrete);
    assert_eq!(categorical.kind(), SpaceKind::Categorical);
}

#[test]
fn rejection_budget_does_not_affect_equality() {
    let config = RejectionConfig::builder().max_rounds(5).build().unwrap();
    let tuned = BoxSpace::new(vec![0.0], vec![1.0]).unwrap().with_rejection_config(config);
    assert_eq!(tuned, BoxSpace::new(vec![0.0], vec![1.0]).unwrap());
}

#[test]
fn constrained_boxes_compare_constraints() {
    let linear = |high: f64| {
        LinearConstraint::new(
            DMatrix::identity(2, 2),
            DVector::from_element(2, 0.0),
            DVector::from_element(2, high),
        )
        .unwrap()
    };
    let boxed = |c: LinearConstraint| {
        BoxSpace::with_constraints(vec![0.0, 0.0], vec![1.0, 1.0], vec![c.into()]).unwrap()
    };
    assert_eq!(boxed(linear(0.5)), boxed(linear(0.5)));
    assert_ne!(boxed(linear(0.5)), boxed(linear(0.6)));
}

#[test]
fn nonlinear_constraints_compare_by_function_identity() {
    fn norm(x: ArrayView2<'_, f64>) -> Array2<f64> {
        x.map_axis(Axis(1), |p| p.dot(&p)).insert_axis(Axis(1))
    }
    let shared: ConstraintFunction = Arc::new(norm);
    let a = NonlinearConstraint::from_shared(Arc::clone(&shared), 0.0, 1.0);
    let b = NonlinearConstraint::from_shared(shared, 0.0, 1.0);
    let c = NonlinearConstraint::new(norm, 0.0, 1.0);
    assert_eq!(a, b);
    assert_ne!(a, c);
}

#[test]
fn multiplication_follows_operand_kinds() {
    let boxes = (unit_box() * unit_box()).unwrap();
    assert_eq!(boxes.kind(), SpaceKind::Box);
    assert_eq!(boxes.dimension(), 4);

    let discrete: Space = DiscreteSearchSpace::new(array![[0.0], [1.0]]).unwrap().into();
    let mixed = (&unit_box() * &discrete).unwrap();
    assert_eq!(mixed.kind(), SpaceKind::Product);
    assert_eq!(mixed.dimension(), 3);
}

#[test]
fn power_repeats_the_space() {
    let cube = unit_box().power(3).unwrap();
    assert_eq!(cube.dimension(), 6);
    assert_eq!(unit_box().power(1).unwrap(), unit_box());
    assert!(matches!(unit_box().power(0), Err(Error::InvalidExponent(0))));
}
