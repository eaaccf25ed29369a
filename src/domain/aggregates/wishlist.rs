//! Wishlist Aggregate

use serde::{Deserialize, Serialize};
use crate::domain::aggregates::product::Product;
use crate::domain::value_objects::ProductId;

/// Products saved for later, unique by id, in insertion order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Wishlist {
    items: Vec<Product>,
}

impl Wishlist {
    pub fn new() -> Self { Self::default() }

    pub fn items(&self) -> &[Product] { &self.items }
    pub fn len(&self) -> usize { self.items.len() }
    pub fn is_empty(&self) -> bool { self.items.is_empty() }

    pub fn contains(&self, id: ProductId) -> bool { self.items.iter().any(|p| p.id == id) }

    /// Removes the product if present, else appends it. Returns whether the
    /// product is in the wishlist afterwards.
    pub fn toggle(&mut self, product: Product) -> bool {
        if self.contains(product.id) {
            self.items.retain(|p| p.id != product.id);
            false
        } else {
            self.items.push(product);
            true
        }
    }
}
