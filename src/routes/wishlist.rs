use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;

use crate::domain::aggregates::Product;
use crate::domain::value_objects::ProductId;
use crate::error::AppError;
use crate::state::AppState;
use crate::StorefrontError;

#[derive(Debug, Serialize)]
pub struct WishlistToggled {
    pub wishlisted: bool,
    pub count: usize,
    pub items: Vec<Product>,
}

pub async fn show(State(s): State<AppState>) -> Json<Vec<Product>> {
    Json(s.store().read().await.wishlist().items().to_vec())
}

pub async fn toggle(State(s): State<AppState>, Path(id): Path<u32>) -> Result<Json<WishlistToggled>, AppError> {
    let product = s
        .catalog()
        .find(ProductId::new(id))
        .cloned()
        .ok_or(AppError::Domain(StorefrontError::ProductNotFound))?;
    let mut store = s.store().write().await;
    let wishlisted = store.toggle_wishlist(product);
    let wishlist = store.wishlist();
    Ok(Json(WishlistToggled { wishlisted, count: wishlist.len(), items: wishlist.items().to_vec() }))
}
