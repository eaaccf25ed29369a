//! HTTP routes.
//!
//! ```text
//! GET    /health
//!
//! GET    /api/v1/products                  ?search&category&min_price&max_price&tags
//! GET    /api/v1/products/:id
//! GET    /api/v1/categories/:category
//!
//! GET    /api/v1/cart
//! POST   /api/v1/cart                      add a line (merges same variant)
//! DELETE /api/v1/cart                      clear
//! DELETE /api/v1/cart/:id                  remove every line of a product
//! POST   /api/v1/cart/line/remove          remove one (id, size, color) line
//! PUT    /api/v1/cart/line                 set a line's quantity
//!
//! GET    /api/v1/wishlist
//! POST   /api/v1/wishlist/:id              toggle
//!
//! GET    /api/v1/checkout                  summary, or the empty-cart view
//! POST   /api/v1/checkout                  pay and receive the order payload
//! POST   /api/v1/order-success             confirm from a receipt
//! GET    /api/v1/order-success             confirm from ?orderId&orderData
//! GET    /api/v1/orders                    (signed in)
//!
//! POST   /api/v1/auth/login | signup | logout
//! POST   /api/v1/auth/forgot-password | verify-otp | reset-password
//! GET    /api/v1/profile                   (signed in)
//! PUT    /api/v1/profile                   (signed in)
//!
//! GET    /api/v1/admin/orders              ?status           (admin)
//! PUT    /api/v1/admin/orders/:id/status                     (admin)
//! GET    /api/v1/admin/products            ?search&category  (admin)
//! GET    /api/v1/admin/stats                                 (admin)
//! ```

pub mod account;
pub mod admin;
pub mod cart;
pub mod checkout;
pub mod products;
pub mod wishlist;

use axum::{
    routing::{get, post, put},
    Json, Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::domain::aggregates::User;
use crate::error::AppError;
use crate::state::AppState;
use crate::store::Store;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { Json(serde_json::json!({"status": "healthy", "service": "storefront"})) }))
        .nest("/api/v1", api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(products::list))
        .route("/products/:id", get(products::detail))
        .route("/categories/:category", get(products::category))
        .route("/cart", get(cart::show).post(cart::add).delete(cart::clear))
        .route("/cart/:id", axum::routing::delete(cart::remove_product))
        .route("/cart/line/remove", post(cart::remove_line))
        .route("/cart/line", put(cart::update_line))
        .route("/wishlist", get(wishlist::show))
        .route("/wishlist/:id", post(wishlist::toggle))
        .route("/checkout", get(checkout::summary).post(checkout::submit))
        .route("/order-success", get(checkout::confirm_from_query).post(checkout::confirm))
        .route("/orders", get(checkout::history))
        .nest("/auth", account::auth_routes())
        .route("/profile", get(account::profile).put(account::update_profile))
        .nest("/admin", admin::routes())
}

/// The signed-in user, or `Unauthorized`.
pub(crate) fn require_user(store: &Store) -> Result<&User, AppError> { store.user().ok_or(AppError::Unauthorized) }

pub(crate) fn require_admin(store: &Store) -> Result<&User, AppError> {
    let user = require_user(store)?;
    if user.is_admin() { Ok(user) } else { Err(AppError::Forbidden) }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::time::Duration;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::Router;
    use serde_json::Value;
    use tower::ServiceExt;

    use super::router;
    use crate::{AppState, Catalog, Store, StorefrontConfig};

    pub fn app() -> (Router, AppState) {
        let config = StorefrontConfig {
            payment_delay: Duration::ZERO,
            auth_delay: Duration::ZERO,
            admin_emails: vec!["admin@shop.test".into()],
            ..Default::default()
        };
        let state = AppState::new(config, Catalog::builtin().unwrap(), Store::new());
        (router(state.clone()), state)
    }

    pub async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                builder = builder.header("content-type", "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };
        let response = app.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), 1 << 20).await.unwrap();
        let json = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap() };
        (status, json)
    }

    pub async fn login(app: &Router, email: &str) {
        let (status, _) = send(app, "POST", "/api/v1/auth/login", Some(serde_json::json!({"email": email, "password": "pw"}))).await;
        assert_eq!(status, StatusCode::OK);
    }
}
