//! Aggregates module
pub mod product;
pub mod cart;
pub mod wishlist;
pub mod user;
pub mod order;

pub use product::Product;
pub use cart::{Cart, CartError, CartItem, LineKey};
pub use wishlist::Wishlist;
pub use user::{ProfileUpdate, Role, User};
pub use order::{Order, OrderError, OrderStatus, ShippingAddress};
