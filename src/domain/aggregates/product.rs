//! Product Aggregate
//!
//! Catalog records are reference data: they are loaded once and never
//! mutated while the storefront runs.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use crate::domain::value_objects::{Money, ProductId};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    pub description: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub image: String,
    pub sizes: Vec<String>,
    pub colors: Vec<String>,
    pub category: String,
    pub tags: Vec<String>,
    pub rating: f32,
    pub reviews: u32,
    pub in_stock: bool,
}

impl Product {
    pub fn unit_price(&self) -> Money { Money::inr(self.price) }

    pub fn has_tag(&self, tag: &str) -> bool { self.tags.iter().any(|t| t == tag) }

    /// Default (size, color) a product page preselects: the first of each list.
    pub fn default_variant(&self) -> (Option<&str>, Option<&str>) {
        (self.sizes.first().map(String::as_str), self.colors.first().map(String::as_str))
    }

    pub fn offers_size(&self, size: &str) -> bool { self.sizes.iter().any(|s| s == size) }
    pub fn offers_color(&self, color: &str) -> bool { self.colors.iter().any(|c| c == color) }
}
