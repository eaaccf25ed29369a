//! Cart Aggregate

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use crate::domain::aggregates::product::Product;
use crate::domain::value_objects::{Money, ProductId};
use crate::pricing::{self, PriceBreakdown};

/// One cart line: a product snapshot plus the chosen variant and quantity.
///
/// Serializes flat, the product fields alongside `quantity`,
/// `selectedSize` and `selectedColor`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    #[serde(flatten)]
    pub product: Product,
    pub quantity: u32,
    pub selected_size: String,
    pub selected_color: String,
}

impl CartItem {
    pub fn new(product: Product, size: impl Into<String>, color: impl Into<String>) -> Self {
        Self { product, quantity: 1, selected_size: size.into(), selected_color: color.into() }
    }

    pub fn with_quantity(mut self, quantity: u32) -> Self { self.quantity = quantity; self }

    pub fn key(&self) -> LineKey {
        LineKey {
            product_id: self.product.id,
            size: self.selected_size.clone(),
            color: self.selected_color.clone(),
        }
    }

    fn matches(&self, key: &LineKey) -> bool {
        self.product.id == key.product_id && self.selected_size == key.size && self.selected_color == key.color
    }

    pub fn line_total(&self) -> Money { self.product.unit_price().multiply(self.quantity) }
}

/// Identity of a cart line: (product id, size, color).
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineKey {
    pub product_id: ProductId,
    pub size: String,
    pub color: String,
}

impl fmt::Display for LineKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.product_id, self.size, self.color)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    pub fn new() -> Self { Self::default() }

    pub fn items(&self) -> &[CartItem] { &self.items }
    pub fn line_count(&self) -> usize { self.items.len() }
    pub fn is_empty(&self) -> bool { self.items.is_empty() }

    /// Total units across all lines.
    pub fn item_count(&self) -> u32 { self.items.iter().map(|i| i.quantity).sum() }

    /// Merges into an existing line with the same key (quantity + 1, the
    /// supplied quantity is ignored) or appends a new line.
    pub fn add_item(&mut self, item: CartItem) {
        let key = item.key();
        if let Some(existing) = self.items.iter_mut().find(|i| i.matches(&key)) {
            existing.quantity = existing.quantity.saturating_add(1);
        } else {
            let quantity = item.quantity.max(1);
            self.items.push(item.with_quantity(quantity));
        }
    }

    /// Removes every line for the product, whatever its size or color.
    /// Returns the number of lines removed.
    pub fn remove_product(&mut self, product_id: ProductId) -> usize {
        let before = self.items.len();
        self.items.retain(|i| i.product.id != product_id);
        before - self.items.len()
    }

    pub fn remove_line(&mut self, key: &LineKey) -> Result<CartItem, CartError> {
        let pos = self.items.iter().position(|i| i.matches(key)).ok_or_else(|| CartError::LineNotFound(key.clone()))?;
        Ok(self.items.remove(pos))
    }

    /// Sets a line's quantity; zero removes the line.
    pub fn update_quantity(&mut self, key: &LineKey, quantity: u32) -> Result<(), CartError> {
        if quantity == 0 {
            return self.remove_line(key).map(|_| ());
        }
        let item = self.items.iter_mut().find(|i| i.matches(key)).ok_or_else(|| CartError::LineNotFound(key.clone()))?;
        item.quantity = quantity;
        Ok(())
    }

    pub fn clear(&mut self) { self.items.clear(); }

    pub fn pricing(&self) -> PriceBreakdown { pricing::price_lines(&self.items) }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CartError {
    #[error("cart line {0} not found")]
    LineNotFound(LineKey),
}
