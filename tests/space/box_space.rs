use std::collections::HashSet;

use nalgebra::{DMatrix, DVector};
use ndarray::{Axis, array};
use searchspace::prelude::*;

fn unit_square() -> BoxSpace {
    BoxSpace::new(vec![0.0, 0.0], vec![1.0, 1.0]).unwrap()
}

fn with_linear_window(low: f64, high: f64) -> BoxSpace {
    let window = LinearConstraint::new(
        DMatrix::identity(2, 2),
        DVector::from_element(2, low),
        DVector::from_element(2, high),
    )
    .unwrap();
    BoxSpace::with_constraints(vec![0.0, 0.0], vec![1.0, 1.0], vec![window.into()]).unwrap()
}

fn centred_cube() -> BoxSpace {
    let window = LinearConstraint::new(
        DMatrix::identity(3, 3),
        DVector::from_element(3, 0.3),
        DVector::from_element(3, 0.7),
    )
    .unwrap();
    BoxSpace::with_constraints(vec![0.0; 3], vec![1.0; 3], vec![window.into()]).unwrap()
}

fn all(flags: &ndarray::ArrayD<bool>) -> bool {
    flags.iter().all(|&f| f)
}

fn distinct_rows(samples: &Tensor) -> usize {
    samples
        .values()
        .outer_iter()
        .map(|row| row.iter().map(|v| v.to_bits()).collect::<Vec<_>>())
        .collect::<HashSet<_>>()
        .len()
}

fn assert_hundred_feasible(space: &BoxSpace, samples: &Tensor) {
    assert_eq!(samples.shape(), &[100, 3]);
    assert!(all(&space.is_feasible(samples).unwrap()));
    assert!(all(&space.contains(samples).unwrap()));
    assert_eq!(distinct_rows(samples), 100);
}

#[test]
fn bounds_validation() {
    let err = BoxSpace::new(vec![0.0, 2.0], vec![1.0, 1.0]).unwrap_err();
    assert!(matches!(err, Error::InvalidBounds { index: 1, .. }));
    assert_eq!(
        BoxSpace::new(vec![0.0], vec![1.0, 1.0]).unwrap_err().kind(),
        ErrorKind::Shape
    );
    assert_eq!(
        BoxSpace::new(Tensor::from(array![[0.0]]), Tensor::from(array![[1.0]]))
            .unwrap_err()
            .kind(),
        ErrorKind::Shape
    );
    let int_bounds = Tensor::new(array![0.0], DType::Int32);
    assert_eq!(
        BoxSpace::new(int_bounds.clone(), int_bounds).unwrap_err().kind(),
        ErrorKind::Type
    );
}

#[test]
fn membership_includes_the_boundary() {
    let space = BoxSpace::new(vec![-1.0, -2.0], vec![2.0, 3.0]).unwrap();
    let points = Tensor::from(array![[-1.0, 3.0], [2.0, -2.0], [2.1, 0.0], [0.0, -2.1]]);
    assert_eq!(
        space.contains(&points).unwrap(),
        array![true, true, false, false].into_dyn()
    );
}

#[test]
fn uniform_samples_stay_inside() {
    let space = BoxSpace::new(vec![-1.0, -2.0], vec![2.0, 3.0]).unwrap();
    let samples = space.sample(100, Some(11)).unwrap();
    assert_eq!(samples.shape(), &[100, 2]);
    assert!(all(&space.contains(&samples).unwrap()));
}

#[cfg(feature = "sobol")]
#[test]
fn sobol_samples_stay_inside_and_repeat_with_skip() {
    let space = BoxSpace::new(vec![-1.0, -2.0], vec![2.0, 3.0]).unwrap();
    let samples = space.sample_sobol(64, Some(5)).unwrap();
    assert!(all(&space.contains(&samples).unwrap()));
    assert_eq!(samples, space.sample_sobol(64, Some(5)).unwrap());
    assert_ne!(samples, space.sample_sobol(64, Some(6)).unwrap());
}

#[test]
fn halton_samples_stay_inside_and_repeat_with_seed() {
    let space = BoxSpace::new(vec![-1.0, -2.0, 0.0], vec![2.0, 3.0, 0.5]).unwrap();
    let samples = space.sample_halton(64, Some(5)).unwrap();
    assert_eq!(samples.shape(), &[64, 3]);
    assert!(all(&space.contains(&samples).unwrap()));
    assert_eq!(samples, space.sample_halton(64, Some(5)).unwrap());
}

#[cfg(feature = "sobol")]
#[test]
fn quasi_random_samples_cover_the_box_evenly() {
    let space = unit_square();
    let samples = space.sample_sobol(256, Some(0)).unwrap();
    let means = samples.values().mean_axis(Axis(0)).unwrap();
    for mean in means.iter() {
        assert!((mean - 0.5).abs() < 0.05, "mean {mean} too far from centre");
    }
}

#[test]
fn residuals_are_lower_then_upper() {
    let space = with_linear_window(0.3, 0.7);
    let residuals = space
        .constraints_residuals(&Tensor::from(array![[0.5, 0.1]]))
        .unwrap();
    let expected = [0.2, -0.2, 0.2, 0.6];
    for (got, want) in residuals.to_vec().iter().zip(expected) {
        assert!((got - want).abs() < 1e-12);
    }
    assert_eq!(
        space.is_feasible(&Tensor::from(array![[0.5, 0.1], [0.4, 0.6]])).unwrap(),
        array![false, true].into_dyn()
    );
}

#[test]
fn residuals_concatenate_constraints_in_order() {
    let linear = LinearConstraint::new(
        DMatrix::from_row_slice(1, 2, &[1.0, 1.0]),
        DVector::from_element(1, 0.0),
        DVector::from_element(1, 1.0),
    )
    .unwrap();
    let nonlinear = NonlinearConstraint::new(
        |x| x.map_axis(Axis(1), |p| p.dot(&p)).insert_axis(Axis(1)),
        0.0,
        0.25,
    );
    let space = BoxSpace::with_constraints(
        vec![0.0, 0.0],
        vec![1.0, 1.0],
        vec![linear.into(), nonlinear.into()],
    )
    .unwrap();
    let residuals = space.constraints_residuals(&Tensor::from(array![[0.3, 0.4]])).unwrap();
    assert_eq!(residuals.shape(), &[1, 4]);
    let expected = [0.7, 0.3, 0.25, 0.0];
    for (got, want) in residuals.to_vec().iter().zip(expected) {
        assert!((got - want).abs() < 1e-12);
    }
}

#[test]
fn feasible_uniform_fills_the_request() {
    let space = centred_cube();
    for seed in [Some(1), None] {
        assert_hundred_feasible(&space, &space.sample_feasible(100, seed).unwrap());
    }
}

#[cfg(feature = "sobol")]
#[test]
fn feasible_sobol_fills_the_request() {
    let space = centred_cube();
    for skip in [Some(1), Some((1 << 16) - 50), None] {
        assert_hundred_feasible(&space, &space.sample_sobol_feasible(100, skip).unwrap());
    }
}

#[test]
fn feasible_halton_fills_the_request() {
    let space = centred_cube();
    for seed in [Some(1), None] {
        assert_hundred_feasible(&space, &space.sample_halton_feasible(100, seed).unwrap());
    }
}

#[cfg(feature = "sobol")]
#[test]
fn unseeded_sobol_never_runs_off_the_sequence() {
    let space = unit_square();
    for _ in 0..50 {
        let samples = space.sample_sobol(2000, None).unwrap();
        assert_eq!(samples.shape(), &[2000, 2]);
    }
    let large = space.sample_sobol(70_000, Some(0)).unwrap();
    assert_eq!(distinct_rows(&large), 70_000);
    assert!(all(&space.contains(&large).unwrap()));
}

#[test]
fn negative_counts_are_rejected_by_every_sampler() {
    let space = centred_cube();
    let results = [
        space.sample(-1, None),
        space.sample_feasible(-1, None),
        space.sample_halton(-1, None),
        space.sample_halton_feasible(-1, Some(0)),
    ];
    for result in results {
        assert!(matches!(result, Err(Error::InvalidSampleSize(-1))));
    }
}

#[cfg(feature = "sobol")]
#[test]
fn negative_counts_are_rejected_by_sobol() {
    let space = centred_cube();
    assert!(matches!(space.sample_sobol(-3, None), Err(Error::InvalidSampleSize(-3))));
    assert!(matches!(
        space.sample_sobol_feasible(-3, Some(0)),
        Err(Error::InvalidSampleSize(-3))
    ));
}

#[test]
fn unseeded_draws_differ() {
    let space = unit_square();
    assert_ne!(space.sample(100, None).unwrap(), space.sample(100, None).unwrap());
    assert_ne!(
        space.sample_halton(100, None).unwrap(),
        space.sample_halton(100, None).unwrap()
    );
}

#[cfg(feature = "sobol")]
#[test]
fn unseeded_sobol_draws_differ() {
    let space = unit_square();
    assert_ne!(
        space.sample_sobol(100, None).unwrap(),
        space.sample_sobol(100, None).unwrap()
    );
}

#[cfg(feature = "sobol")]
#[test]
fn empty_sobol_draw_keeps_float32() {
    let space = BoxSpace::new(
        Tensor::new(array![0.0, 0.0, 0.0], DType::Float32),
        Tensor::new(array![1.0, 1.0, 1.0], DType::Float32),
    )
    .unwrap();
    let empty = space.sample_sobol(0, None).unwrap();
    assert_eq!(empty.shape(), &[0, 3]);
    assert_eq!(empty.dtype(), DType::Float32);
    assert_eq!(space.sample_sobol_feasible(0, Some(4)).unwrap().dtype(), DType::Float32);
}

#[test]
fn unconstrained_feasible_sampling_is_plain_sampling() {
    let space = unit_square();
    assert!(all(&space.is_feasible(&space.sample(8, Some(0)).unwrap()).unwrap()));
    assert_eq!(space.sample_feasible(8, Some(0)).unwrap().shape(), &[8, 2]);
}

#[test]
fn infeasible_constraints_report_exhaustion() {
    let config = RejectionConfig::builder().max_rounds(3).max_batch_size(16).build().unwrap();
    let space = with_linear_window(2.0, 3.0).with_rejection_config(config);
    let err = space.sample_feasible(4, Some(0)).unwrap_err();
    assert!(matches!(
        err,
        Error::FeasibleSamplingExhausted { requested: 4, accepted: 0, rounds: 3 }
    ));
}

#[test]
fn product_concatenates_bounds() {
    let left = BoxSpace::new(vec![-1.0], vec![2.0]).unwrap();
    let right = BoxSpace::new(vec![-2.0, 0.0], vec![3.0, 1.0]).unwrap();
    let product = left.product(&right).unwrap();
    assert_eq!(product.lower_bound().to_vec(), vec![-1.0, -2.0, 0.0]);
    assert_eq!(product.upper_bound().to_vec(), vec![2.0, 3.0, 1.0]);
    assert!(with_linear_window(0.3, 0.7).product(&left).is_err());
}

#[test]
fn discretize_constrained_box_is_unsupported() {
    let err = with_linear_window(0.3, 0.7).discretize(4).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Capability);
    assert_eq!(unit_square().discretize(4).unwrap().len(), 4);
}
