//! Checkout, confirmation and order history routes.

use axum::{
    extract::{RawQuery, State},
    Json,
};
use serde::Serialize;
use tracing::{info, instrument};

use crate::checkout::{confirm_order, CheckoutError, CheckoutForm, CheckoutReceipt, Confirmation, OrderPayload};
use crate::domain::aggregates::{CartItem, Order};
use crate::error::AppError;
use crate::pricing::PriceBreakdown;
use crate::routes::require_user;
use crate::state::AppState;

/// What the checkout page renders. An empty cart yields `empty: true` and
/// nothing else.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutSummary {
    pub empty: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<CartItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pricing: Option<PriceBreakdown>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResponse {
    #[serde(flatten)]
    pub receipt: CheckoutReceipt,
    /// Legacy hand-off location for the confirmation page.
    pub redirect: String,
}

pub async fn summary(State(s): State<AppState>) -> Json<CheckoutSummary> {
    let store = s.store().read().await;
    let cart = store.cart();
    if cart.is_empty() {
        return Json(CheckoutSummary { empty: true, items: Vec::new(), pricing: None, email: None });
    }
    Json(CheckoutSummary {
        empty: false,
        items: cart.items().to_vec(),
        pricing: Some(cart.pricing()),
        email: store.user().map(|u| u.email.clone()),
    })
}

/// Runs the simulated payment. The store lock is released before the delay,
/// and the payment task finishes even if the client goes away.
#[instrument(skip_all)]
pub async fn submit(State(s): State<AppState>, Json(form): Json<CheckoutForm>) -> Result<Json<SubmitResponse>, AppError> {
    let pending = {
        let mut flow = s.checkout().lock().await;
        let store = s.store().read().await;
        flow.submit(store.cart(), &form)?
    };

    let delay = s.config().payment_delay;
    let task_state = s.clone();
    let receipt = tokio::spawn(async move {
        let receipt = pending.process(delay).await;
        task_state.checkout().lock().await.complete(&receipt);
        receipt
    })
    .await
    .map_err(|e| AppError::Internal(format!("payment task failed: {e}")))?;

    let redirect = format!("/order-success?{}", receipt.payload.to_query(&receipt.order_id)?);
    Ok(Json(SubmitResponse { receipt, redirect }))
}

pub async fn confirm(State(s): State<AppState>, Json(receipt): Json<CheckoutReceipt>) -> Result<Json<Confirmation>, AppError> {
    Ok(Json(record(&s, receipt).await?))
}

/// Confirmation from the legacy `?orderId=..&orderData=..` hand-off.
pub async fn confirm_from_query(State(s): State<AppState>, RawQuery(query): RawQuery) -> Result<Json<Confirmation>, AppError> {
    let (order_id, payload) = OrderPayload::from_query(query.as_deref().unwrap_or_default())?;
    Ok(Json(record(&s, CheckoutReceipt { order_id, payload }).await?))
}

async fn record(s: &AppState, receipt: CheckoutReceipt) -> Result<Confirmation, CheckoutError> {
    let mut store = s.store().write().await;
    let confirmation = confirm_order(&mut store, receipt.order_id, receipt.payload)?;
    if let Confirmation::Recorded { order, .. } = &confirmation {
        info!(order_id = %order.id(), "order confirmed");
    }
    Ok(confirmation)
}

/// The signed-in user's orders, oldest first.
pub async fn history(State(s): State<AppState>) -> Result<Json<Vec<Order>>, AppError> {
    let store = s.store().read().await;
    let user = require_user(&store)?;
    Ok(Json(store.orders_for(&user.email).into_iter().cloned().collect()))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::{json, Value};

    use crate::checkout::CheckoutPhase;
    use crate::routes::test_support::{app, login, send};

    fn form() -> Value {
        json!({
            "fullName": "Asha Rao",
            "email": "asha@example.com",
            "phone": "9876543210",
            "address": "12 MG Road",
            "city": "Bengaluru",
            "state": "KA",
            "pincode": "560001",
            "cardNumber": "4111111111111111",
            "expiryDate": "12/30",
            "cvv": "123",
            "cardName": "Asha Rao"
        })
    }

    #[tokio::test]
    async fn test_empty_cart_cannot_check_out() {
        let (app, _) = app();
        let (_, summary) = send(&app, "GET", "/api/v1/checkout", None).await;
        assert_eq!(summary, json!({"empty": true}));

        let (status, _) = send(&app, "POST", "/api/v1/checkout", Some(form())).await;
        assert_eq!(status, StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_invalid_form_lists_fields() {
        let (app, _) = app();
        send(&app, "POST", "/api/v1/cart", Some(json!({"productId": 1}))).await;
        let mut bad = form();
        bad["pincode"] = json!("");
        let (status, body) = send(&app, "POST", "/api/v1/checkout", Some(bad)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["fields"]["pincode"][0], "pincode is required");
    }

    #[tokio::test]
    async fn test_signed_in_checkout_records_order() {
        let (app, state) = app();
        login(&app, "asha@example.com").await;
        send(&app, "POST", "/api/v1/cart", Some(json!({"productId": 3}))).await;

        let (_, summary) = send(&app, "GET", "/api/v1/checkout", None).await;
        assert_eq!(summary["email"], "asha@example.com");
        assert_eq!(summary["pricing"]["shipping"]["amount"], 0.0);

        let (status, receipt) = send(&app, "POST", "/api/v1/checkout", Some(form())).await;
        assert_eq!(status, StatusCode::OK);
        let order_id = receipt["orderId"].as_str().unwrap().to_string();
        assert!(order_id.starts_with("ORD"));
        assert!(receipt["redirect"].as_str().unwrap().starts_with("/order-success?orderId=ORD"));
        assert!(matches!(state.checkout().lock().await.phase(), CheckoutPhase::Success(_)));

        let (_, confirmation) = send(&app, "POST", "/api/v1/order-success", Some(receipt.clone())).await;
        assert_eq!(confirmation["outcome"], "recorded");
        assert_eq!(confirmation["order"]["status"], "pending");

        let (_, cart) = send(&app, "GET", "/api/v1/cart", None).await;
        assert_eq!(cart["empty"], true);
        let (_, orders) = send(&app, "GET", "/api/v1/orders", None).await;
        assert_eq!(orders[0]["id"], order_id.as_str());
    }

    #[tokio::test]
    async fn test_guest_confirmation_via_query_keeps_cart() {
        let (app, state) = app();
        send(&app, "POST", "/api/v1/cart", Some(json!({"productId": 1}))).await;
        let (_, receipt) = send(&app, "POST", "/api/v1/checkout", Some(form())).await;

        let redirect = receipt["redirect"].as_str().unwrap();
        let uri = format!("/api/v1{redirect}");
        let (status, confirmation) = send(&app, "GET", &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(confirmation["outcome"], "guestNotRecorded");
        assert_eq!(confirmation["orderId"], receipt["orderId"]);

        let store = state.store().read().await;
        assert!(store.orders().is_empty());
        assert_eq!(store.cart().line_count(), 1);
    }

    #[tokio::test]
    async fn test_query_confirmation_requires_order_id() {
        let (app, _) = app();
        let (status, _) = send(&app, "GET", "/api/v1/order-success?orderData=%7B%7D", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_query_with_plus_encoded_spaces() {
        let (app, state) = app();
        login(&app, "asha@example.com").await;
        send(&app, "POST", "/api/v1/cart", Some(json!({"productId": 1}))).await;
        let (_, receipt) = send(&app, "POST", "/api/v1/checkout", Some(form())).await;

        // URLSearchParams serializes spaces as `+`.
        let query = url::form_urlencoded::Serializer::new(String::new())
            .append_pair("orderId", receipt["orderId"].as_str().unwrap())
            .append_pair("orderData", &receipt["payload"].to_string())
            .finish();
        assert!(query.contains("Asha+Rao"));

        let (status, confirmation) = send(&app, "GET", &format!("/api/v1/order-success?{query}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(confirmation["order"]["shippingAddress"]["fullName"], "Asha Rao");
        assert_eq!(confirmation["order"]["shippingAddress"]["address"], "12 MG Road");
        assert_eq!(state.store().read().await.orders()[0].shipping_address().city, "Bengaluru");
    }

    #[tokio::test]
    async fn test_payload_without_items_is_rejected() {
        let (app, state) = app();
        login(&app, "asha@example.com").await;
        let receipt = json!({
            "orderId": "ORD1",
            "payload": {
                "items": [],
                "subtotal": 0.0,
                "gst": 0.0,
                "shipping": 199.0,
                "total": 199.0,
                "shippingAddress": {"fullName": "Asha Rao", "address": "12 MG Road", "city": "Bengaluru", "state": "KA", "pincode": "560001"}
            }
        });
        let (status, _) = send(&app, "POST", "/api/v1/order-success", Some(receipt)).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert!(state.store().read().await.orders().is_empty());
    }

    #[tokio::test]
    async fn test_history_requires_sign_in() {
        let (app, _) = app();
        let (status, _) = send(&app, "GET", "/api/v1/orders", None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
}
