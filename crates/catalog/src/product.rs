use serde::{Deserialize, Serialize};

use smokehouse_core::{Grams, ProductId};
use smokehouse_pricing::{parse_weight_grams, price_per_kg};

/// Nutrition facts per 100 g, as printed on the menu card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Nutrition {
    pub kcal: u32,
    pub proteins: f32,
    pub fats: f32,
    pub carbohydrates: f32,
}

/// A menu product.
///
/// Immutable input from the catalog. Carts share it behind an `Arc` and never
/// modify it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Price in whole currency units for the labeled `weight`.
    pub price: u64,
    /// Human-readable base weight, e.g. `"350 г"` or `"1.2 кг"`.
    pub weight: String,
    #[serde(default)]
    pub image: String,
    pub category: String,
    #[serde(default)]
    pub is_popular: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heating_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nutrition: Option<Nutrition>,
}

impl Product {
    /// Minimal product; descriptive fields left empty.
    pub fn new(
        id: ProductId,
        name: impl Into<String>,
        price: u64,
        weight: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            description: String::new(),
            price,
            weight: weight.into(),
            image: String::new(),
            category: category.into(),
            is_popular: false,
            heating_time: None,
            nutrition: None,
        }
    }

    /// Gram amount the `price` is quoted for. Zero if the label is unusable.
    pub fn base_weight(&self) -> Grams {
        parse_weight_grams(&self.weight)
    }

    pub fn price_per_kg(&self) -> u64 {
        price_per_kg(self.price, self.base_weight())
    }

    /// `false` when the weight label can't be turned into grams, which would
    /// make every selection of this product cost nothing.
    pub fn is_priced_by_weight(&self) -> bool {
        !self.base_weight().is_zero()
    }
}
