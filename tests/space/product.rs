use std::collections::HashSet;

use ndarray::array;
use searchspace::prelude::*;

fn decision_and_context() -> TaggedProductSearchSpace {
    TaggedProductSearchSpace::with_tags(
        vec![
            BoxSpace::new(vec![-1.0, -2.0], vec![2.0, 3.0]).unwrap().into(),
            DiscreteSearchSpace::new(array![[-0.5, 0.5], [0.5, -0.5]]).unwrap().into(),
        ],
        ["decision", "context"],
    )
    .unwrap()
}

#[test]
fn dimension_and_bounds_concatenate() {
    let space = decision_and_context();
    assert_eq!(space.dimension(), 4);
    assert_eq!(space.lower().unwrap().to_vec(), vec![-1.0, -2.0, -0.5, -0.5]);
    assert_eq!(space.upper().unwrap().to_vec(), vec![2.0, 3.0, 0.5, 0.5]);
    assert_eq!(space.subspace_tags(), &["decision", "context"]);
}

#[test]
fn subspace_lookup() {
    let space = decision_and_context();
    assert!(space.get_subspace("decision").unwrap().as_box().is_some());
    let err = space.get_subspace("missing").unwrap_err();
    assert!(matches!(err, Error::UnknownSubspace(ref tag) if tag == "missing"));
}

#[test]
fn components_are_column_slices() {
    let space = decision_and_context();
    let points = Tensor::from(array![[0.0, 1.0, -0.5, 0.5], [1.0, 2.0, 0.5, -0.5]]);
    assert_eq!(
        space.get_subspace_component("context", &points).unwrap(),
        Tensor::from(array![[-0.5, 0.5], [0.5, -0.5]])
    );
    assert!(space
        .get_subspace_component("context", &Tensor::from(array![[0.0, 1.0]]))
        .is_err());
}

#[test]
fn samples_are_members() {
    let space = decision_and_context();
    let samples = space.sample(30, Some(9)).unwrap();
    assert_eq!(samples.shape(), &[30, 4]);
    assert!(space.contains(&samples).unwrap().iter().all(|&inside| inside));
}

#[test]
fn negative_sample_count_is_rejected() {
    let space = decision_and_context();
    assert!(matches!(space.sample(-1, None), Err(Error::InvalidSampleSize(-1))));
    assert!(matches!(space.sample(-7, Some(3)), Err(Error::InvalidSampleSize(-7))));
}

#[test]
fn seeded_samples_are_distinct() {
    let space = TaggedProductSearchSpace::with_tags(
        vec![
            BoxSpace::new(vec![0.0], vec![1.0]).unwrap().into(),
            BoxSpace::new(vec![0.0, 0.0], vec![1.0, 1.0]).unwrap().into(),
        ],
        ["a", "b"],
    )
    .unwrap();
    let samples = space.sample(100, Some(5)).unwrap();
    let distinct: HashSet<Vec<u64>> = samples
        .values()
        .outer_iter()
        .map(|row| row.iter().map(|v| v.to_bits()).collect())
        .collect();
    assert_eq!(distinct.len(), 100);
}

#[test]
fn fixing_a_subspace_restricts_samples() {
    let space = decision_and_context();
    let fixed = space.fix_subspace("decision", array![[0.25, 0.75]]).unwrap();
    let samples = fixed.sample(10, Some(2)).unwrap();
    let decision = fixed.get_subspace_component("decision", &samples).unwrap();
    for row in decision.iter_rows() {
        assert_eq!(row.to_vec(), vec![0.25, 0.75]);
    }
}

#[test]
fn categorical_member_makes_the_product_unbounded() {
    let space = TaggedProductSearchSpace::new(vec![
        BoxSpace::new(vec![0.0], vec![1.0]).unwrap().into(),
        CategoricalSearchSpace::new(3).unwrap().into(),
    ])
    .unwrap();
    assert!(!space.has_bounds());
    assert!(space.lower().is_err());
}

#[test]
fn product_of_products_nests() {
    let space = decision_and_context();
    let nested = space.product(&space).unwrap();
    assert_eq!(nested.num_subspaces(), 2);
    assert_eq!(nested.dimension(), 8);
    assert!(nested.get_subspace("0").unwrap().as_product().is_some());
}

#[test]
fn tag_errors() {
    let unit: Space = BoxSpace::new(vec![0.0], vec![1.0]).unwrap().into();
    let err = TaggedProductSearchSpace::with_tags(vec![unit.clone(), unit.clone()], ["A"]).unwrap_err();
    assert!(matches!(err, Error::TagCountMismatch { tags: 1, spaces: 2 }));
    let err = TaggedProductSearchSpace::with_tags(vec![unit.clone(), unit], ["A", "A"]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Lookup);
}
