//! The storefront state container.
//!
//! A [`Store`] owns the cart, wishlist, signed-in user and order history.
//! Every mutation is synchronous and, once applied, is announced on a
//! broadcast channel so views can re-render. There is no global instance;
//! callers construct a store and pass it where it is needed.

use chrono::Utc;
use serde::Serialize;
use tokio::sync::broadcast;
use tracing::{debug, info};

use crate::domain::aggregates::{
    Cart, CartError, CartItem, LineKey, Order, OrderStatus, Product, ProfileUpdate, User, Wishlist,
};
use crate::domain::events::{CartEvent, OrderEvent, SessionEvent, StoreEvent, WishlistEvent};
use crate::domain::value_objects::{OrderId, ProductId};

const EVENT_CAPACITY: usize = 64;

/// Point-in-time copy of everything the store holds.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct StoreState {
    pub cart: Cart,
    pub wishlist: Wishlist,
    pub user: Option<User>,
    pub orders: Vec<Order>,
}

#[derive(Debug)]
pub struct Store {
    state: StoreState,
    events: broadcast::Sender<StoreEvent>,
}

impl Default for Store {
    fn default() -> Self { Self::new() }
}

impl Store {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self { state: StoreState::default(), events }
    }

    /// Receives every event emitted after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> { self.events.subscribe() }

    pub fn snapshot(&self) -> StoreState { self.state.clone() }

    pub fn cart(&self) -> &Cart { &self.state.cart }
    pub fn wishlist(&self) -> &Wishlist { &self.state.wishlist }
    pub fn user(&self) -> Option<&User> { self.state.user.as_ref() }
    pub fn orders(&self) -> &[Order] { &self.state.orders }

    pub fn orders_for(&self, user_id: &str) -> Vec<&Order> {
        self.state.orders.iter().filter(|o| o.user_id() == user_id).collect()
    }

    pub fn order(&self, id: &OrderId) -> Option<&Order> { self.state.orders.iter().find(|o| o.id() == id) }

    pub fn is_wishlisted(&self, id: ProductId) -> bool { self.state.wishlist.contains(id) }

    pub fn add_to_cart(&mut self, item: CartItem) {
        let key = item.key();
        let before = self.state.cart.line_count();
        self.state.cart.add_item(item);
        let event = if self.state.cart.line_count() > before {
            CartEvent::LineAdded { key }
        } else {
            let quantity = self.state.cart.items().iter().find(|i| i.key() == key).map_or(0, |i| i.quantity);
            CartEvent::QuantityIncremented { key, quantity }
        };
        debug!(?event, "cart updated");
        self.emit(StoreEvent::Cart(event));
    }

    /// Removes every line of the product regardless of size or color.
    pub fn remove_from_cart(&mut self, product_id: ProductId) {
        let lines = self.state.cart.remove_product(product_id);
        debug!(%product_id, lines, "removed product from cart");
        self.emit(StoreEvent::Cart(CartEvent::ProductRemoved { product_id, lines }));
    }

    pub fn remove_line(&mut self, key: &LineKey) -> Result<(), CartError> {
        self.state.cart.remove_line(key)?;
        self.emit(StoreEvent::Cart(CartEvent::LineRemoved { key: key.clone() }));
        Ok(())
    }

    pub fn update_quantity(&mut self, key: &LineKey, quantity: u32) -> Result<(), CartError> {
        self.state.cart.update_quantity(key, quantity)?;
        let event = if quantity == 0 {
            CartEvent::LineRemoved { key: key.clone() }
        } else {
            CartEvent::QuantityChanged { key: key.clone(), quantity }
        };
        self.emit(StoreEvent::Cart(event));
        Ok(())
    }

    pub fn clear_cart(&mut self) {
        self.state.cart.clear();
        self.emit(StoreEvent::Cart(CartEvent::Cleared));
    }

    /// Returns whether the product is wishlisted afterwards.
    pub fn toggle_wishlist(&mut self, product: Product) -> bool {
        let product_id = product.id;
        let added = self.state.wishlist.toggle(product);
        let event = if added { WishlistEvent::Added { product_id } } else { WishlistEvent::Removed { product_id } };
        self.emit(StoreEvent::Wishlist(event));
        added
    }

    pub fn set_user(&mut self, user: Option<User>) {
        let event = match &user {
            Some(u) => SessionEvent::SignedIn { email: u.email.clone() },
            None => SessionEvent::SignedOut,
        };
        self.state.user = user;
        info!(?event, "session changed");
        self.emit(StoreEvent::Session(event));
    }

    /// Edits the signed-in user's profile. Returns the updated user, or
    /// `None` when nobody is signed in.
    pub fn update_profile(&mut self, update: ProfileUpdate) -> Option<&User> {
        let mut user = self.state.user.clone()?;
        user.apply(update);
        self.set_user(Some(user));
        self.state.user.as_ref()
    }

    /// Appends without checking for a duplicate id.
    pub fn add_order(&mut self, order: Order) {
        let event = OrderEvent::Placed { order_id: order.id().clone(), user_id: order.user_id().to_string() };
        info!(order_id = %order.id(), total = %order.total(), "order recorded");
        self.state.orders.push(order);
        self.emit(StoreEvent::Order(event));
    }

    /// Sets the status of the matching order. Unknown ids are ignored.
    pub fn update_order_status(&mut self, order_id: &OrderId, status: OrderStatus) -> bool {
        let Some(order) = self.state.orders.iter_mut().find(|o| o.id() == order_id) else {
            debug!(%order_id, "status update for unknown order ignored");
            return false;
        };
        order.set_status(status);
        info!(%order_id, %status, at = %Utc::now(), "order status updated");
        self.emit(StoreEvent::Order(OrderEvent::StatusChanged { order_id: order_id.clone(), status }));
        true
    }

    fn emit(&self, event: StoreEvent) {
        // No receivers is fine.
        let _ = self.events.send(event);
    }
}
