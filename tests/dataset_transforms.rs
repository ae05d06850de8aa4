//! Engine-level properties of the dataset transforms.

use web_playground_rs::dataset::{apply, baseline, Category, Transform};

#[test]
fn reset_after_any_sequence_reproduces_the_baseline() {
    let sequences = [
        vec![Transform::Shuffle, Transform::Reverse],
        vec![Transform::FilterFruit, Transform::SortByPrice],
        vec![
            Transform::SortByName,
            Transform::Shuffle,
            Transform::FilterVegetable,
        ],
    ];

    for sequence in sequences {
        for transform in sequence {
            let _ = apply(transform);
        }
        let outcome = apply(Transform::Reset);
        assert_eq!(outcome.records, baseline());
        assert_eq!(outcome.total, 6.0);
    }
}

#[test]
fn shuffle_is_always_a_permutation() {
    let mut baseline_ids: Vec<u32> = baseline().iter().map(|r| r.id).collect();
    baseline_ids.sort_unstable();

    for _ in 0..50 {
        let outcome = apply(Transform::Shuffle);
        let mut ids: Vec<u32> = outcome.records.iter().map(|r| r.id).collect();
        ids.sort_unstable();
        assert_eq!(ids, baseline_ids);
        assert_eq!(outcome.total, 6.0);
    }
}

#[test]
fn filters_return_exactly_the_matching_subset_in_order() {
    let outcome = apply(Transform::FilterFruit);

    let expected: Vec<u32> = baseline()
        .iter()
        .filter(|r| r.category == Category::Fruit)
        .map(|r| r.id)
        .collect();
    let actual: Vec<u32> = outcome.records.iter().map(|r| r.id).collect();
    assert_eq!(actual, expected);

    let expected_total: f64 = baseline()
        .iter()
        .filter(|r| r.category == Category::Fruit)
        .map(|r| r.price)
        .sum();
    assert_eq!(outcome.total, expected_total);
}

#[test]
fn permutations_preserve_the_total() {
    assert_eq!(apply(Transform::Reverse).total, 6.0);
    assert_eq!(apply(Transform::SortByName).total, 6.0);
    assert_eq!(apply(Transform::SortByPrice).total, 6.0);
}

#[test]
fn example_scenario_sort_by_price() {
    // Five records with prices {1.50, 0.75, 0.50, 2.00, 1.25} come back
    // ordered [0.50, 0.75, 1.25, 1.50, 2.00] with total 6.00.
    let outcome = apply(Transform::SortByPrice);
    let prices: Vec<f64> = outcome.records.iter().map(|r| r.price).collect();
    assert_eq!(prices, vec![0.5, 0.75, 1.25, 1.5, 2.0]);
    assert_eq!(outcome.total, 6.0);
    assert_eq!(outcome.records.len(), baseline().len());
}

#[test]
fn descriptions_do_not_affect_records() {
    let a = apply(Transform::Reverse);
    let b = apply(Transform::Reverse);
    assert_eq!(a.records, b.records);
    assert_eq!(a.description, b.description);
    assert!(!a.description.is_empty());
}
