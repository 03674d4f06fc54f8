use ndarray::array;
use searchspace::prelude::*;

#[test]
fn counts_and_labels_build_the_same_space() {
    let by_count = CategoricalSearchSpace::new(3).unwrap();
    let by_label = CategoricalSearchSpace::new(vec!["0", "1", "2"]).unwrap();
    assert_eq!(by_count, by_label);
    assert_eq!(by_count.dimension(), 1);
    assert_eq!(by_count.points().to_vec(), vec![0.0, 1.0, 2.0]);
}

#[test]
fn multi_dimensional_grid_enumerates_every_code() {
    let space = CategoricalSearchSpace::new(vec![vec!["R", "G", "B"], vec!["Y", "N"]]).unwrap();
    assert_eq!(space.dimension(), 2);
    assert_eq!(space.num_categories(), vec![3, 2]);
    assert_eq!(
        space.points(),
        &Tensor::from(array![[0.0, 0.0], [0.0, 1.0], [1.0, 0.0], [1.0, 1.0], [2.0, 0.0], [2.0, 1.0]])
    );
}

#[test]
fn invalid_descriptions() {
    assert_eq!(CategoricalSearchSpace::new(0).unwrap_err().kind(), ErrorKind::Value);
    assert_eq!(CategoricalSearchSpace::new(vec![2, -1]).unwrap_err().kind(), ErrorKind::Value);
    let mixed = vec![CategoryDim::Count(2), CategoryDim::Labels(vec!["a".into()])];
    assert!(matches!(CategoricalSearchSpace::new(mixed), Err(Error::MixedCategoryKinds)));
}

#[test]
fn empty_description_has_no_sub_dimensions() {
    let space = CategoricalSearchSpace::new(Vec::<i64>::new()).unwrap();
    assert_eq!(space.dimension(), 0);
    assert_eq!(space.points().shape(), &[0, 0]);
}

#[test]
fn categorical_spaces_are_unbounded() {
    let space = CategoricalSearchSpace::new(vec!["A", "B"]).unwrap();
    assert!(!space.has_bounds());
    assert_eq!(space.lower().unwrap_err().kind(), ErrorKind::Capability);
    assert_eq!(space.upper().unwrap_err().kind(), ErrorKind::Capability);
}

#[test]
fn codes_map_back_to_tags() {
    let space = CategoricalSearchSpace::new(vec![vec!["R", "G", "B"], vec!["Y", "N"]]).unwrap();
    let tags = space.to_tags(&Tensor::from(array![[2.0, 0.0], [0.0, 1.0]])).unwrap();
    assert_eq!(
        tags,
        array![["B".to_owned(), "Y".to_owned()], ["R".to_owned(), "N".to_owned()]].into_dyn()
    );
    assert!(space.to_tags(&Tensor::from(array![[3.0, 0.0]])).is_err());
    assert!(space.to_tags(&Tensor::from(array![[0.5, 0.0]])).is_err());
}

#[test]
fn samples_are_valid_codes() {
    let space = CategoricalSearchSpace::new(vec![4, 3]).unwrap();
    let samples = space.sample(50, Some(3)).unwrap();
    assert_eq!(samples.shape(), &[50, 2]);
    assert!(space.contains(&samples).unwrap().iter().all(|&inside| inside));
}

#[test]
fn integer_dtype_is_kept() {
    let space = CategoricalSearchSpace::with_dtype(3, DType::Int64).unwrap();
    assert_eq!(space.dtype(), DType::Int64);
    assert_eq!(space.sample(4, Some(0)).unwrap().dtype(), DType::Int64);
}

#[test]
fn product_concatenates_tags() {
    let left = CategoricalSearchSpace::new(vec!["A", "B"]).unwrap();
    let right = CategoricalSearchSpace::new(3).unwrap();
    let product = left.product(&right).unwrap();
    assert_eq!(product.dimension(), 2);
    assert_eq!(product.num_categories(), vec![2, 3]);
    assert_eq!(product.points().len(), 6);
}
