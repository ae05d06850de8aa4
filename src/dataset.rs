//! Pure transforms over the fixed demo dataset.
//!
//! Every operation starts from the baseline, so transforms never compound:
//! `reset` after anything reproduces the baseline exactly.

use std::cmp::Ordering;

use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

/// One record of the demo dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: u32,
    pub name: String,
    pub price: f64,
    pub category: Category,
}

/// Product category. Serialized lowercase on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Fruit,
    Vegetable,
}

fn product(id: u32, name: &str, price: f64, category: Category) -> Product {
    Product {
        id,
        name: name.to_string(),
        price,
        category,
    }
}

/// The immutable reference sequence every transform is computed against.
pub fn baseline() -> Vec<Product> {
    vec![
        product(1, "Apple", 1.5, Category::Fruit),
        product(2, "Banana", 0.75, Category::Fruit),
        product(3, "Carrot", 0.5, Category::Vegetable),
        product(4, "Date", 2.0, Category::Fruit),
        product(5, "Eggplant", 1.25, Category::Vegetable),
    ]
}

/// The closed set of named dataset operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transform {
    Reset,
    Shuffle,
    Reverse,
    SortByPrice,
    SortByName,
    FilterFruit,
    FilterVegetable,
}

impl Transform {
    /// Resolve an action name; anything unrecognized falls back to `Reset`.
    pub fn from_action(action: &str) -> Self {
        match action {
            "shuffle" => Transform::Shuffle,
            "reverse" => Transform::Reverse,
            "sort_by_price" => Transform::SortByPrice,
            "sort_by_name" => Transform::SortByName,
            "filter_fruit" => Transform::FilterFruit,
            "filter_vegetable" => Transform::FilterVegetable,
            _ => Transform::Reset,
        }
    }

    /// Short human-readable label of what the operation does.
    pub fn description(&self) -> &'static str {
        match self {
            Transform::Reset => "Array reset to original state",
            Transform::Shuffle => "Array shuffled randomly",
            Transform::Reverse => "Array reversed",
            Transform::SortByPrice => "Sorted by price ascending",
            Transform::SortByName => "Sorted alphabetically",
            Transform::FilterFruit => "Filtered to fruit",
            Transform::FilterVegetable => "Filtered to vegetables",
        }
    }
}

/// Result of applying one transform to the baseline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransformOutcome {
    pub records: Vec<Product>,
    pub total: f64,
    pub description: String,
}

/// Apply `transform` to a fresh copy of the baseline.
///
/// Sorts are stable, so ties keep baseline order; filters preserve relative
/// order. `total` is computed after the transform, over the returned records.
pub fn apply(transform: Transform) -> TransformOutcome {
    let mut records = baseline();
    match transform {
        Transform::Reset => {}
        Transform::Shuffle => records.shuffle(&mut rand::thread_rng()),
        Transform::Reverse => records.reverse(),
        Transform::SortByPrice => records.sort_by(|a, b| {
            a.price.partial_cmp(&b.price).unwrap_or(Ordering::Equal)
        }),
        Transform::SortByName => records.sort_by(|a, b| a.name.cmp(&b.name)),
        Transform::FilterFruit => records.retain(|r| r.category == Category::Fruit),
        Transform::FilterVegetable => records.retain(|r| r.category == Category::Vegetable),
    }

    let total = records.iter().map(|r| r.price).sum();
    TransformOutcome {
        records,
        total,
        description: transform.description().to_string(),
    }
}
