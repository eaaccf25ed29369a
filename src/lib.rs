//! Storefront
//!
//! In-memory e-commerce storefront with no backing database.
//!
//! ## Features
//! - Static product catalog with search, category, price and tag filters
//! - Cart keyed by (product, size, color) and a wishlist
//! - Pricing with 18% GST and free shipping above ₹2,999
//! - Checkout with a simulated payment and order confirmation
//! - Order history and a minimal admin panel
//! - Mock sign-in and password reset
//!
//! All state lives in a [`Store`] that the application owns and passes
//! around; subscribers are notified of every change.

use thiserror::Error;

pub mod admin;
pub mod auth;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod domain;
pub mod error;
pub mod pricing;
pub mod routes;
pub mod state;
pub mod store;

pub use catalog::{Catalog, ProductFilter};
pub use checkout::{CheckoutFlow, CheckoutForm, OrderPayload};
pub use config::StorefrontConfig;
pub use domain::aggregates::{Cart, CartItem, LineKey, Order, OrderStatus, Product, User, Wishlist};
pub use domain::value_objects::{Money, OrderId, ProductId};
pub use pricing::PriceBreakdown;
pub use state::AppState;
pub use store::Store;

// =============================================================================
// Error Types
// =============================================================================

#[derive(Error, Debug)]
pub enum StorefrontError {
    #[error("Product not found")]
    ProductNotFound,

    #[error("Order not found")]
    OrderNotFound,

    #[error(transparent)]
    Cart(#[from] domain::aggregates::CartError),

    #[error(transparent)]
    Order(#[from] domain::aggregates::OrderError),

    #[error(transparent)]
    Checkout(#[from] checkout::CheckoutError),

    #[error(transparent)]
    Auth(#[from] auth::AuthError),

    #[error(transparent)]
    Catalog(#[from] catalog::CatalogError),

    #[error(transparent)]
    Config(#[from] config::ConfigError),
}

pub type Result<T> = std::result::Result<T, StorefrontError>;
