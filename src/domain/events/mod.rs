//! Store change notifications
use crate::domain::aggregates::{LineKey, OrderStatus};
use crate::domain::value_objects::{OrderId, ProductId};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StoreEvent {
    Cart(CartEvent),
    Wishlist(WishlistEvent),
    Session(SessionEvent),
    Order(OrderEvent),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CartEvent {
    LineAdded { key: LineKey },
    QuantityIncremented { key: LineKey, quantity: u32 },
    QuantityChanged { key: LineKey, quantity: u32 },
    ProductRemoved { product_id: ProductId, lines: usize },
    LineRemoved { key: LineKey },
    Cleared,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WishlistEvent {
    Added { product_id: ProductId },
    Removed { product_id: ProductId },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionEvent {
    SignedIn { email: String },
    SignedOut,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OrderEvent {
    Placed { order_id: OrderId, user_id: String },
    StatusChanged { order_id: OrderId, status: OrderStatus },
}
