//! Cart display model.
//!
//! Turns cart lines into the strings a cart page or summary renders:
//! formatted unit and line prices, subtotal, flat-rate shipping and total.

use rust_decimal::Decimal;
use serde::Serialize;

use shopfront_core::{Cart, CartLine, CurrencyCode, Price};

/// Cart item display data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartItemView {
    pub id: String,
    pub name: String,
    pub image: String,
    pub quantity: u32,
    pub price: String,
    pub line_price: String,
}

/// Cart display data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub item_count: u64,
    pub subtotal: String,
    pub shipping: String,
    pub total: String,
}

/// Shipping charged for a cart: the flat rate, or nothing when it is empty.
#[must_use]
pub fn shipping_for(cart: &Cart, flat_rate: Decimal) -> Decimal {
    if cart.is_empty() {
        Decimal::ZERO
    } else {
        flat_rate
    }
}

impl CartView {
    /// Create an empty cart view.
    #[must_use]
    pub fn empty() -> Self {
        let zero = Price::new(Decimal::ZERO, CurrencyCode::USD).to_string();
        Self {
            items: Vec::new(),
            item_count: 0,
            subtotal: zero.clone(),
            shipping: zero.clone(),
            total: zero,
        }
    }

    /// Build the view for a cart with the given flat shipping rate.
    #[must_use]
    pub fn build(cart: &Cart, flat_shipping: Decimal, currency: CurrencyCode) -> Self {
        let subtotal = cart.subtotal();
        let shipping = shipping_for(cart, flat_shipping);
        let total = subtotal.checked_add(shipping).unwrap_or(Decimal::MAX);
        let display = |amount| Price::new(amount, currency).to_string();

        Self {
            items: cart
                .lines()
                .iter()
                .map(|line| CartItemView::build(line, currency))
                .collect(),
            item_count: cart.item_count(),
            subtotal: display(subtotal),
            shipping: display(shipping),
            total: display(total),
        }
    }
}

impl CartItemView {
    fn build(line: &CartLine, currency: CurrencyCode) -> Self {
        Self {
            id: line.id.to_string(),
            name: line.name.clone(),
            image: line.image.clone(),
            quantity: line.quantity,
            price: Price::new(line.price, currency).to_string(),
            line_price: Price::new(line.line_total(), currency).to_string(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::indexing_slicing)]
mod tests {
    use shopfront_core::Product;

    use super::*;

    fn flat() -> Decimal {
        Decimal::new(599, 2)
    }

    #[test]
    fn test_empty_cart_has_no_shipping() {
        let view = CartView::build(&Cart::new(), flat(), CurrencyCode::USD);
        assert_eq!(view, CartView::empty());
        assert_eq!(view.total, "$0.00");
    }

    #[test]
    fn test_view_formats_lines_and_totals() {
        let mut cart = Cart::new();
        cart.add_item(
            &Product::new("1", "Premium T-Shirt", Decimal::new(2999, 2), "/tee.png"),
            2,
        );
        cart.add_item(
            &Product::new("3", "Leather Wallet", Decimal::new(4999, 2), "/wallet.png"),
            1,
        );

        let view = CartView::build(&cart, flat(), CurrencyCode::USD);

        assert_eq!(view.items.len(), 2);
        assert_eq!(view.items[0].price, "$29.99");
        assert_eq!(view.items[0].line_price, "$59.98");
        assert_eq!(view.item_count, 3);
        assert_eq!(view.subtotal, "$109.97");
        assert_eq!(view.shipping, "$5.99");
        assert_eq!(view.total, "$115.96");
    }

    #[test]
    fn test_total_saturates_when_shipping_overflows() {
        let mut cart = Cart::new();
        cart.add_item(&Product::new("1", "Everything", Decimal::MAX, "/all.png"), 1);

        let view = CartView::build(&cart, flat(), CurrencyCode::USD);

        assert_eq!(view.subtotal, view.total);
    }
}
