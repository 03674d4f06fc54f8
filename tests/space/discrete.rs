use ndarray::{Array2, array};
use searchspace::prelude::*;

fn square_corners() -> DiscreteSearchSpace {
    DiscreteSearchSpace::new(array![[-0.5, -0.3], [-0.2, 0.3], [0.2, -0.3], [0.5, 0.3]]).unwrap()
}

#[test]
fn points_must_be_rank_two() {
    let err = DiscreteSearchSpace::new(Tensor::from_vec(vec![0.0, 1.0])).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Shape);
    assert!(DiscreteSearchSpace::from_rows(&[vec![0.0, 1.0], vec![2.0]]).is_err());
}

#[test]
fn bounds_are_column_extremes() {
    let space = square_corners();
    assert_eq!(space.lower().unwrap().to_vec(), vec![-0.5, -0.3]);
    assert_eq!(space.upper().unwrap().to_vec(), vec![0.5, 0.3]);
    assert!(space.has_bounds());
}

#[test]
fn contains_is_exact_row_membership() {
    let space = square_corners();
    assert!(space.contains_point(&Tensor::from_vec(vec![-0.2, 0.3])).unwrap());
    assert!(!space.contains_point(&Tensor::from_vec(vec![-0.2, 0.31])).unwrap());

    let batch = Tensor::from(array![[[0.5, 0.3], [0.0, 0.0]], [[0.2, -0.3], [-0.5, -0.3]]]);
    assert_eq!(
        space.contains(&batch).unwrap(),
        array![[true, false], [true, true]].into_dyn()
    );
}

#[test]
fn contains_rejects_wrong_width() {
    let space = square_corners();
    let err = space.contains(&Tensor::from(array![[0.0, 0.0, 0.0]])).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Shape);
}

#[test]
fn samples_are_members_and_repeatable() {
    let space = square_corners();
    let samples = space.sample(20, Some(7)).unwrap();
    assert_eq!(samples.shape(), &[20, 2]);
    assert!(space.contains(&samples).unwrap().iter().all(|&inside| inside));
    assert_eq!(samples, space.sample(20, Some(7)).unwrap());
}

#[test]
fn zero_and_negative_sample_counts() {
    let space = square_corners();
    assert_eq!(space.sample(0, None).unwrap().shape(), &[0, 2]);
    assert!(matches!(space.sample(-1, None), Err(Error::InvalidSampleSize(-1))));
}

#[test]
fn product_is_row_major_cartesian() {
    let left = DiscreteSearchSpace::new(array![[0.0], [1.0]]).unwrap();
    let right = DiscreteSearchSpace::new(array![[10.0, 20.0], [30.0, 40.0], [50.0, 60.0]]).unwrap();
    let product = left.product(&right).unwrap();
    assert_eq!(
        product.points(),
        &Tensor::from(array![
            [0.0, 10.0, 20.0],
            [0.0, 30.0, 40.0],
            [0.0, 50.0, 60.0],
            [1.0, 10.0, 20.0],
            [1.0, 30.0, 40.0],
            [1.0, 50.0, 60.0]
        ])
    );
}

#[test]
fn single_empty_row_is_the_product_identity() {
    let space = square_corners();
    let identity = DiscreteSearchSpace::new(Array2::<f64>::zeros((1, 0))).unwrap();
    assert_eq!(space.product(&identity).unwrap(), space);
    assert_eq!(identity.product(&space).unwrap(), space);

    let as_space: Space = space.clone().into();
    assert_eq!((as_space * identity.into()).unwrap(), Space::from(space));
}

#[test]
fn product_with_no_rows_has_no_rows() {
    let space = square_corners();
    let empty = DiscreteSearchSpace::new(Array2::<f64>::zeros((0, 3))).unwrap();
    for product in [space.product(&empty).unwrap(), empty.product(&space).unwrap()] {
        assert!(product.is_empty());
        assert_eq!(product.points().shape(), &[0, 5]);
        assert_eq!(product.dimension(), 5);
    }
}

#[test]
fn product_requires_matching_dtype() {
    let float = DiscreteSearchSpace::new(array![[0.0]]).unwrap();
    let int = DiscreteSearchSpace::new(Tensor::new(array![[1.0]], DType::Int32)).unwrap();
    let err = float.product(&int).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Type);
}

#[test]
fn discretize_returns_members() {
    let space = square_corners();
    let discrete = space.discretize(5).unwrap();
    assert_eq!(discrete.len(), 5);
    assert!(space.contains(discrete.points()).unwrap().iter().all(|&inside| inside));
}
