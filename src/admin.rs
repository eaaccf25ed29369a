//! Admin panel queries over the store and catalog.

use std::collections::{BTreeMap, HashSet};

use rust_decimal::Decimal;
use serde::Serialize;

use crate::catalog::Catalog;
use crate::domain::aggregates::{Order, OrderStatus};
use crate::domain::value_objects::Money;

const RECENT_ORDERS: usize = 5;

/// Orders matching a status filter plus a count for every status.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderListing<'a> {
    pub orders: Vec<&'a Order>,
    pub counts: BTreeMap<&'static str, usize>,
}

/// `None` lists every order.
pub fn list_orders(orders: &[Order], status: Option<OrderStatus>) -> OrderListing<'_> {
    let counts = OrderStatus::ALL
        .into_iter()
        .map(|s| (s.as_str(), orders.iter().filter(|o| o.status() == s).count()))
        .collect();
    let orders = orders.iter().filter(|o| status.map_or(true, |s| o.status() == s)).collect();
    OrderListing { orders, counts }
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminStats<'a> {
    pub total_orders: usize,
    pub total_revenue: Money,
    pub total_users: usize,
    pub total_products: usize,
    pub recent_orders: Vec<&'a Order>,
    pub category_data: Vec<CategoryCount<'a>>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CategoryCount<'a> {
    pub name: &'a str,
    pub value: usize,
}

/// Dashboard figures. Revenue excludes cancelled orders; users are the
/// distinct owners of at least one order.
pub fn stats<'a>(orders: &'a [Order], catalog: &'a Catalog) -> AdminStats<'a> {
    let revenue: Decimal = orders
        .iter()
        .filter(|o| o.status() != OrderStatus::Cancelled)
        .map(|o| o.total().amount())
        .sum();
    let users: HashSet<&str> = orders.iter().map(Order::user_id).collect();

    let mut recent: Vec<&Order> = orders.iter().collect();
    recent.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
    recent.truncate(RECENT_ORDERS);

    let category_data = catalog
        .categories()
        .into_iter()
        .map(|name| CategoryCount { name, value: catalog.by_category(name).len() })
        .collect();

    AdminStats {
        total_orders: orders.len(),
        total_revenue: Money::inr(revenue),
        total_users: users.len(),
        total_products: catalog.len(),
        recent_orders: recent,
        category_data,
    }
}
