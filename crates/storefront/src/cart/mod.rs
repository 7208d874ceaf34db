//! Session shopping cart.
//!
//! - [`store`] - [`CartStore`], the cart bound to its persisted storage slot
//! - [`view`] - Display model with formatted prices and order totals

pub mod store;
pub mod view;

pub use store::{CartPersistError, CartStore, DEFAULT_CART_KEY};
pub use view::{CartItemView, CartView, shipping_for};
