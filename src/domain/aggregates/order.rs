//! Order Aggregate

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use crate::domain::aggregates::cart::CartItem;
use crate::domain::value_objects::{Money, OrderId};
use crate::pricing::PriceBreakdown;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    id: OrderId,
    user_id: String,
    items: Vec<CartItem>,
    subtotal: Money,
    gst: Money,
    shipping: Money,
    total: Money,
    status: OrderStatus,
    shipping_address: ShippingAddress,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingAddress {
    pub full_name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub pincode: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Pending,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 5] = [Self::Pending, Self::Processing, Self::Shipped, Self::Delivered, Self::Cancelled];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Shipped => "shipped",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

impl FromStr for OrderStatus {
    type Err = OrderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL.into_iter().find(|st| st.as_str() == s).ok_or_else(|| OrderError::UnknownStatus(s.to_string()))
    }
}

impl Order {
    /// Places a `pending` order. `items` is taken by value so the order owns
    /// its own copy of every product snapshot.
    pub fn place(
        id: OrderId,
        user_id: impl Into<String>,
        items: Vec<CartItem>,
        pricing: PriceBreakdown,
        shipping_address: ShippingAddress,
    ) -> Self {
        let now = Utc::now();
        Self {
            id, user_id: user_id.into(), items,
            subtotal: pricing.subtotal, gst: pricing.gst, shipping: pricing.shipping, total: pricing.total,
            status: OrderStatus::Pending, shipping_address, created_at: now, updated_at: now,
        }
    }

    pub fn id(&self) -> &OrderId { &self.id }
    pub fn user_id(&self) -> &str { &self.user_id }
    pub fn items(&self) -> &[CartItem] { &self.items }
    pub fn total(&self) -> &Money { &self.total }
    pub fn subtotal(&self) -> &Money { &self.subtotal }
    pub fn gst(&self) -> &Money { &self.gst }
    pub fn shipping(&self) -> &Money { &self.shipping }
    pub fn status(&self) -> OrderStatus { self.status }
    pub fn shipping_address(&self) -> &ShippingAddress { &self.shipping_address }
    pub fn created_at(&self) -> DateTime<Utc> { self.created_at }
    pub fn updated_at(&self) -> DateTime<Utc> { self.updated_at }

    /// Any status may follow any other.
    pub fn set_status(&mut self, status: OrderStatus) {
        self.status = status;
        self.touch();
    }

    fn touch(&mut self) { self.updated_at = Utc::now(); }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum OrderError {
    #[error("unknown order status `{0}`")]
    UnknownStatus(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::aggregates::product::fixtures::product;
    use crate::pricing::price_lines;

    fn sample() -> Order {
        let items = vec![CartItem::new(product(1, 1000), "M", "Black")];
        let pricing = price_lines(&items);
        Order::place(OrderId::new("ORD1"), "a@example.com", items, pricing, ShippingAddress::default())
    }

    #[test]
    fn test_new_order_is_pending() {
        let order = sample();
        assert_eq!(order.status(), OrderStatus::Pending);
        assert_eq!(order.total().amount(), rust_decimal::Decimal::from(1379));
        assert_eq!(order.created_at(), order.updated_at());
    }

    #[test]
    fn test_any_transition_allowed() {
        let mut order = sample();
        order.set_status(OrderStatus::Delivered);
        order.set_status(OrderStatus::Pending);
        assert_eq!(order.status(), OrderStatus::Pending);
        assert!(order.updated_at() >= order.created_at());
    }

    #[test]
    fn test_status_parse() {
        assert_eq!("shipped".parse::<OrderStatus>(), Ok(OrderStatus::Shipped));
        assert!("lost".parse::<OrderStatus>().is_err());
    }
}
