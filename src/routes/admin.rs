//! Admin panel routes. Every handler requires an admin session.

use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
    routing::{get, put},
    Json, Router,
};
use serde::Deserialize;
use tracing::info;

use crate::admin::{list_orders, stats};
use crate::domain::aggregates::{Order, OrderStatus, Product};
use crate::domain::value_objects::OrderId;
use crate::error::AppError;
use crate::routes::require_admin;
use crate::state::AppState;
use crate::StorefrontError;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/orders", get(orders))
        .route("/orders/:id/status", put(set_status))
        .route("/products", get(products))
        .route("/stats", get(dashboard))
}

#[derive(Debug, Default, Deserialize)]
pub struct OrdersQuery {
    /// `all` or a status name.
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct StatusUpdate {
    pub status: OrderStatus,
}

#[derive(Debug, Default, Deserialize)]
pub struct ProductsQuery {
    pub search: Option<String>,
    pub category: Option<String>,
}

async fn orders(State(s): State<AppState>, Query(q): Query<OrdersQuery>) -> Result<Response, AppError> {
    let store = s.store().read().await;
    require_admin(&store)?;
    let status = match q.status.as_deref() {
        None | Some("all") => None,
        Some(other) => Some(other.parse::<OrderStatus>()?),
    };
    Ok(Json(list_orders(store.orders(), status)).into_response())
}

async fn set_status(
    State(s): State<AppState>,
    Path(id): Path<String>,
    Json(update): Json<StatusUpdate>,
) -> Result<Json<Order>, AppError> {
    let mut store = s.store().write().await;
    let admin = require_admin(&store)?.email.clone();
    let order_id = OrderId::new(id);
    if !store.update_order_status(&order_id, update.status) {
        return Err(AppError::Domain(StorefrontError::OrderNotFound));
    }
    info!(%order_id, status = %update.status, %admin, "status changed from admin panel");
    store.order(&order_id).cloned().map(Json).ok_or(AppError::Domain(StorefrontError::OrderNotFound))
}

async fn products(State(s): State<AppState>, Query(q): Query<ProductsQuery>) -> Result<Json<Vec<Product>>, AppError> {
    let store = s.store().read().await;
    require_admin(&store)?;
    let found = s.catalog().search(q.search.as_deref().unwrap_or_default(), q.category.as_deref().unwrap_or("all"));
    Ok(Json(found.into_iter().cloned().collect()))
}

async fn dashboard(State(s): State<AppState>) -> Result<Response, AppError> {
    let store = s.store().read().await;
    require_admin(&store)?;
    Ok(Json(stats(store.orders(), s.catalog())).into_response())
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use crate::domain::aggregates::{CartItem, Order, OrderStatus, ShippingAddress};
    use crate::domain::value_objects::{OrderId, ProductId};
    use crate::pricing::price_lines;
    use crate::routes::test_support::{app, login, send};
    use crate::AppState;

    async fn place(state: &AppState, id: &str, user: &str) {
        let mut store = state.store().write().await;
        let product = state.catalog().find(ProductId::new(3)).unwrap().clone();
        let items = vec![CartItem::new(product, "M", "Black")];
        let pricing = price_lines(&items);
        store.add_order(Order::place(OrderId::new(id), user, items, pricing, ShippingAddress::default()));
    }

    #[tokio::test]
    async fn test_requires_admin() {
        let (app, _) = app();
        let (status, _) = send(&app, "GET", "/api/v1/admin/stats", None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        login(&app, "shopper@example.com").await;
        let (status, _) = send(&app, "GET", "/api/v1/admin/orders", None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        let (status, _) = send(&app, "GET", "/api/v1/admin/products?search=tee", None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_filter_and_update_orders() {
        let (app, state) = app();
        place(&state, "ORD1", "a@example.com").await;
        place(&state, "ORD2", "b@example.com").await;
        login(&app, "admin@shop.test").await;

        let (status, body) = send(&app, "PUT", "/api/v1/admin/orders/ORD2/status", Some(json!({"status": "shipped"}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "shipped");
        assert_eq!(state.store().read().await.order(&OrderId::new("ORD2")).unwrap().status(), OrderStatus::Shipped);

        let (_, body) = send(&app, "GET", "/api/v1/admin/orders?status=pending", None).await;
        assert_eq!(body["orders"].as_array().unwrap().len(), 1);
        assert_eq!(body["counts"]["shipped"], 1);
        assert_eq!(body["counts"]["pending"], 1);

        let (status, _) = send(&app, "GET", "/api/v1/admin/orders?status=lost", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_unknown_order_status_update() {
        let (app, _) = app();
        login(&app, "admin@shop.test").await;
        let (status, _) = send(&app, "PUT", "/api/v1/admin/orders/ORD404/status", Some(json!({"status": "shipped"}))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_stats_and_products() {
        let (app, state) = app();
        place(&state, "ORD1", "a@example.com").await;
        place(&state, "ORD2", "a@example.com").await;
        login(&app, "admin@shop.test").await;

        let (_, body) = send(&app, "GET", "/api/v1/admin/stats", None).await;
        assert_eq!(body["totalOrders"], 2);
        assert_eq!(body["totalUsers"], 1);
        assert_eq!(body["totalProducts"], 12);
        let revenue = body["totalRevenue"]["amount"].as_f64().unwrap();
        assert!((revenue - 14157.64).abs() < 1e-6);

        let (_, body) = send(&app, "GET", "/api/v1/admin/products?search=jacket&category=trending", None).await;
        assert_eq!(body.as_array().unwrap().len(), 1);
    }
}
