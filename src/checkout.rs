//! Checkout: form validation, simulated payment and the order hand-off.
//!
//! A checkout moves `FormEntry -> Submitting -> Success`. Payment cannot
//! fail; it is a fixed delay. The result is an [`OrderPayload`] that the
//! confirmation step turns into an [`Order`]. The payload keeps the JSON
//! shape the storefront has always used and can still be carried in an
//! `orderId=..&orderData=..` query string.

use std::time::Duration;

use chrono::{DateTime, Days, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};
use url::form_urlencoded;
use validator::{Validate, ValidationErrors};

use crate::domain::aggregates::{Cart, CartItem, Order, ShippingAddress};
use crate::domain::value_objects::{Money, OrderId};
use crate::pricing::PriceBreakdown;
use crate::store::Store;

/// Days from confirmation to the estimated delivery date.
pub const DELIVERY_ESTIMATE_DAYS: u64 = 7;

#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("cart is empty")]
    EmptyCart,

    #[error("a payment is already being processed")]
    AlreadySubmitting,

    #[error("invalid checkout form: {0}")]
    Invalid(#[from] ValidationErrors),

    #[error("invalid order payload: {0}")]
    Payload(#[from] serde_json::Error),

    #[error("missing query parameter `{0}`")]
    MissingParam(&'static str),
}

/// Shipping and payment details entered at checkout. Card fields are only
/// checked for presence and are never stored.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutForm {
    #[validate(length(min = 1, message = "full name is required"))]
    pub full_name: String,
    #[validate(email(message = "a valid email is required"))]
    pub email: String,
    #[validate(length(min = 1, message = "phone is required"))]
    pub phone: String,
    #[validate(length(min = 1, message = "address is required"))]
    pub address: String,
    #[validate(length(min = 1, message = "city is required"))]
    pub city: String,
    #[validate(length(min = 1, message = "state is required"))]
    pub state: String,
    #[validate(length(min = 1, message = "pincode is required"))]
    pub pincode: String,
    #[validate(length(min = 1, message = "card number is required"))]
    pub card_number: String,
    #[validate(length(min = 1, message = "expiry date is required"))]
    pub expiry_date: String,
    #[validate(length(min = 1, message = "cvv is required"))]
    pub cvv: String,
    #[validate(length(min = 1, message = "name on card is required"))]
    pub card_name: String,
}

impl CheckoutForm {
    pub fn shipping_address(&self) -> ShippingAddress {
        ShippingAddress {
            full_name: self.full_name.clone(),
            address: self.address.clone(),
            city: self.city.clone(),
            state: self.state.clone(),
            pincode: self.pincode.clone(),
            phone: None,
        }
    }
}

/// Order details handed from checkout to confirmation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderPayload {
    pub items: Vec<CartItem>,
    #[serde(with = "rust_decimal::serde::float")]
    pub subtotal: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub gst: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub shipping: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
    pub shipping_address: ShippingAddress,
}

impl OrderPayload {
    pub fn new(items: Vec<CartItem>, pricing: &PriceBreakdown, shipping_address: ShippingAddress) -> Self {
        Self {
            items,
            subtotal: pricing.subtotal.amount(),
            gst: pricing.gst.amount(),
            shipping: pricing.shipping.amount(),
            total: pricing.total.amount(),
            shipping_address,
        }
    }

    pub fn pricing(&self) -> PriceBreakdown {
        PriceBreakdown {
            subtotal: Money::inr(self.subtotal),
            gst: Money::inr(self.gst),
            shipping: Money::inr(self.shipping),
            total: Money::inr(self.total),
        }
    }

    pub fn to_json(&self) -> Result<String, CheckoutError> { Ok(serde_json::to_string(self)?) }

    pub fn from_json(json: &str) -> Result<Self, CheckoutError> { Ok(serde_json::from_str(json)?) }

    /// `orderId=<id>&orderData=<percent-encoded JSON>`
    pub fn to_query(&self, order_id: &OrderId) -> Result<String, CheckoutError> {
        Ok(format!(
            "orderId={}&orderData={}",
            urlencoding::encode(order_id.as_str()),
            urlencoding::encode(&self.to_json()?)
        ))
    }

    /// Decodes as a browser's `URLSearchParams` does, so `+` is a space.
    pub fn from_query(query: &str) -> Result<(OrderId, Self), CheckoutError> {
        let mut order_id = None;
        let mut order_data = None;
        for (key, value) in form_urlencoded::parse(query.trim_start_matches('?').as_bytes()) {
            match key.as_ref() {
                "orderId" => order_id = Some(value.into_owned()),
                "orderData" => order_data = Some(value.into_owned()),
                _ => {}
            }
        }
        let order_id = order_id.filter(|id| !id.is_empty()).ok_or(CheckoutError::MissingParam("orderId"))?;
        let order_data = order_data.ok_or(CheckoutError::MissingParam("orderData"))?;
        Ok((OrderId::new(order_id), Self::from_json(&order_data)?))
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum CheckoutPhase {
    #[default]
    FormEntry,
    Submitting,
    Success(OrderId),
}

/// Tracks one shopper's checkout so a second submit is rejected while a
/// payment is in flight.
#[derive(Debug, Default)]
pub struct CheckoutFlow {
    phase: CheckoutPhase,
}

impl CheckoutFlow {
    pub fn new() -> Self { Self::default() }

    pub fn phase(&self) -> &CheckoutPhase { &self.phase }

    /// Validates the cart and form, snapshots the cart and enters
    /// `Submitting`.
    pub fn submit(&mut self, cart: &Cart, form: &CheckoutForm) -> Result<PendingPayment, CheckoutError> {
        if self.phase == CheckoutPhase::Submitting {
            return Err(CheckoutError::AlreadySubmitting);
        }
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }
        form.validate()?;
        self.phase = CheckoutPhase::Submitting;
        info!(lines = cart.line_count(), total = %cart.pricing().total, "payment started");
        Ok(PendingPayment {
            items: cart.items().to_vec(),
            pricing: cart.pricing(),
            shipping_address: form.shipping_address(),
        })
    }

    pub fn complete(&mut self, receipt: &CheckoutReceipt) {
        info!(order_id = %receipt.order_id, "payment completed");
        self.phase = CheckoutPhase::Success(receipt.order_id.clone());
    }
}

/// A submitted checkout waiting on the simulated payment.
#[derive(Debug)]
pub struct PendingPayment {
    items: Vec<CartItem>,
    pricing: PriceBreakdown,
    shipping_address: ShippingAddress,
}

impl PendingPayment {
    /// Waits out the payment delay, then issues the order id and payload.
    pub async fn process(self, delay: Duration) -> CheckoutReceipt {
        tokio::time::sleep(delay).await;
        CheckoutReceipt {
            order_id: OrderId::generate(Utc::now()),
            payload: OrderPayload::new(self.items, &self.pricing, self.shipping_address),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutReceipt {
    pub order_id: OrderId,
    pub payload: OrderPayload,
}

/// Outcome of the confirmation step.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Confirmation {
    Recorded { order: Order, estimated_delivery: DateTime<Utc> },
    /// No session: nothing recorded and the cart is left as it was.
    GuestNotRecorded { order_id: OrderId, estimated_delivery: DateTime<Utc> },
}

/// Records the order for the signed-in user and clears the cart. A payload
/// without items is rejected.
pub fn confirm_order(store: &mut Store, order_id: OrderId, payload: OrderPayload) -> Result<Confirmation, CheckoutError> {
    if payload.items.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }
    let estimated_delivery = Utc::now() + Days::new(DELIVERY_ESTIMATE_DAYS);
    let Some(user_id) = store.user().map(|u| u.email.clone()) else {
        warn!(%order_id, "order confirmed without a session; not recorded");
        return Ok(Confirmation::GuestNotRecorded { order_id, estimated_delivery });
    };
    let pricing = payload.pricing();
    let order = Order::place(order_id, user_id, payload.items, pricing, payload.shipping_address);
    store.add_order(order.clone());
    store.clear_cart();
    Ok(Confirmation::Recorded { order, estimated_delivery })
}
