//! Cart routes.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::domain::aggregates::{Cart, CartItem, LineKey};
use crate::domain::value_objects::ProductId;
use crate::error::AppError;
use crate::pricing::PriceBreakdown;
use crate::state::AppState;
use crate::StorefrontError;

/// Cart contents with totals. An empty cart carries no pricing.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    pub items: Vec<CartItem>,
    pub item_count: u32,
    pub empty: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pricing: Option<PriceBreakdown>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_display: Option<String>,
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        let pricing = (!cart.is_empty()).then(|| cart.pricing());
        Self {
            items: cart.items().to_vec(),
            item_count: cart.item_count(),
            empty: cart.is_empty(),
            total_display: pricing.as_ref().map(|p| p.total.to_string()),
            pricing,
        }
    }
}

/// Size and color default to the product's first option.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartRequest {
    pub product_id: u32,
    pub size: Option<String>,
    pub color: Option<String>,
    pub quantity: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLineRequest {
    #[serde(flatten)]
    pub key: LineKey,
    pub quantity: u32,
}

pub async fn show(State(s): State<AppState>) -> Json<CartView> {
    Json(CartView::from(s.store().read().await.cart()))
}

#[instrument(skip(s))]
pub async fn add(State(s): State<AppState>, Json(r): Json<AddToCartRequest>) -> Result<Json<CartView>, AppError> {
    let product = s
        .catalog()
        .find(ProductId::new(r.product_id))
        .ok_or(AppError::Domain(StorefrontError::ProductNotFound))?;
    let (default_size, default_color) = product.default_variant();
    let size = r.size.as_deref().or(default_size).unwrap_or_default().to_string();
    let color = r.color.as_deref().or(default_color).unwrap_or_default().to_string();
    if !product.sizes.is_empty() && !product.offers_size(&size) {
        return Err(AppError::BadRequest(format!("size {size} is not offered for {}", product.title)));
    }
    if !product.colors.is_empty() && !product.offers_color(&color) {
        return Err(AppError::BadRequest(format!("color {color} is not offered for {}", product.title)));
    }

    let item = CartItem::new(product.clone(), size, color).with_quantity(r.quantity.unwrap_or(1));
    let mut store = s.store().write().await;
    store.add_to_cart(item);
    Ok(Json(CartView::from(store.cart())))
}

pub async fn clear(State(s): State<AppState>) -> Json<CartView> {
    let mut store = s.store().write().await;
    store.clear_cart();
    Json(CartView::from(store.cart()))
}

/// Drops every line of the product, whatever the size or color.
pub async fn remove_product(State(s): State<AppState>, Path(id): Path<u32>) -> Json<CartView> {
    let mut store = s.store().write().await;
    store.remove_from_cart(ProductId::new(id));
    Json(CartView::from(store.cart()))
}

pub async fn remove_line(State(s): State<AppState>, Json(key): Json<LineKey>) -> Result<Json<CartView>, AppError> {
    let mut store = s.store().write().await;
    store.remove_line(&key)?;
    Ok(Json(CartView::from(store.cart())))
}

pub async fn update_line(State(s): State<AppState>, Json(r): Json<UpdateLineRequest>) -> Result<Json<CartView>, AppError> {
    let mut store = s.store().write().await;
    store.update_quantity(&r.key, r.quantity)?;
    Ok(Json(CartView::from(store.cart())))
}
