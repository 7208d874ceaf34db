//! Cart lines and the rules for mutating them.
//!
//! [`Cart`] is a pure state container: every operation mutates the in-memory
//! line list and reports what happened as a [`CartEvent`]. It never touches
//! storage; persisting the result is the caller's step.
//!
//! ## Rules
//!
//! - At most one line per product id; new lines append, preserving order.
//! - Every line has a quantity of at least 1.
//! - Adding an id that is already present increments its quantity and keeps
//!   the name, price and image captured by the first add.
//! - Setting a quantity below 1 is a no-op, it never removes the line.
//! - New lines never carry a negative price, and no mutation may push the
//!   subtotal past what a `Decimal` can hold.
//! - `item_count` and `subtotal` are computed on every read.

use std::collections::HashSet;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{Product, ProductId};

/// Errors raised when adopting a line list that breaks the cart rules.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CartError {
    /// Two lines share the same product id.
    #[error("duplicate cart line for product {0}")]
    DuplicateLine(ProductId),
    /// A line has a quantity of zero.
    #[error("cart line for product {0} has zero quantity")]
    ZeroQuantity(ProductId),
    /// A line has a negative unit price.
    #[error("cart line for product {0} has a negative price")]
    NegativePrice(ProductId),
    /// A line total, or the running subtotal, does not fit in a `Decimal`.
    #[error("cart line for product {0} overflows the cart total")]
    AmountOverflow(ProductId),
}

/// One purchasable product at a given quantity.
///
/// `name`, `price` and `image` are a snapshot taken when the product was
/// first added; later catalog changes do not reach existing lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub id: ProductId,
    pub name: String,
    /// Unit price at the time the line was created.
    pub price: Decimal,
    pub quantity: u32,
    pub image: String,
}

impl CartLine {
    /// Snapshot a product into a new line.
    #[must_use]
    pub fn from_product(product: &Product, quantity: u32) -> Self {
        Self {
            id: product.id.clone(),
            name: product.name.clone(),
            price: product.price,
            quantity,
            image: product.image.clone(),
        }
    }

    /// Unit price multiplied by quantity, or `None` if it overflows.
    #[must_use]
    pub fn checked_line_total(&self) -> Option<Decimal> {
        self.price.checked_mul(Decimal::from(self.quantity))
    }

    /// Unit price multiplied by quantity, saturating at `Decimal::MAX`.
    ///
    /// Lines held by a [`Cart`] never saturate.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.checked_line_total().unwrap_or(Decimal::MAX)
    }
}

fn is_negative(amount: Decimal) -> bool {
    amount.is_sign_negative() && !amount.is_zero()
}

/// Why a mutation left the cart untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// `add_item` was called with a quantity of zero.
    ZeroQuantity,
    /// `update_quantity` was called with a quantity below 1.
    QuantityBelowOne,
    /// No line matches the given product id.
    LineNotFound,
    /// `add_item` was called with a product whose price is negative.
    NegativePrice,
    /// The change would push the subtotal past what a `Decimal` can hold.
    AmountOverflow,
}

impl IgnoreReason {
    /// Short machine-readable label, used as a log field.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ZeroQuantity => "zero_quantity",
            Self::QuantityBelowOne => "quantity_below_one",
            Self::LineNotFound => "line_not_found",
            Self::NegativePrice => "negative_price",
            Self::AmountOverflow => "amount_overflow",
        }
    }
}

/// The effect of a single cart mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartEvent {
    /// A new line was appended.
    Added { id: ProductId, quantity: u32 },
    /// An existing line's quantity grew; `quantity` is the new total.
    Incremented { id: ProductId, quantity: u32 },
    /// A line was removed.
    Removed { id: ProductId },
    /// A line's quantity was set.
    QuantityUpdated { id: ProductId, quantity: u32 },
    /// Every line was dropped; `lines` is how many there were.
    Cleared { lines: usize },
    /// Nothing changed.
    Ignored(IgnoreReason),
}

impl CartEvent {
    /// Whether the mutation changed the line list.
    #[must_use]
    pub const fn changed(&self) -> bool {
        !matches!(self, Self::Ignored(_))
    }
}

/// Ordered, id-keyed list of cart lines.
///
/// Serializes as a plain JSON array of lines. Deserialization runs the same
/// checks as [`Cart::from_lines`], so a stored array that breaks the rules
/// fails to parse rather than producing an inconsistent cart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<CartLine>", into = "Vec<CartLine>")]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Adopt an existing line list, keeping its order.
    ///
    /// # Errors
    ///
    /// Returns `CartError` if two lines share an id, a line has zero
    /// quantity, a line has a negative price, or the subtotal overflows.
    pub fn from_lines(lines: Vec<CartLine>) -> Result<Self, CartError> {
        let mut seen = HashSet::with_capacity(lines.len());
        let mut subtotal = Decimal::ZERO;
        for line in &lines {
            if !seen.insert(&line.id) {
                return Err(CartError::DuplicateLine(line.id.clone()));
            }
            if line.quantity == 0 {
                return Err(CartError::ZeroQuantity(line.id.clone()));
            }
            if is_negative(line.price) {
                return Err(CartError::NegativePrice(line.id.clone()));
            }
            subtotal = line
                .checked_line_total()
                .and_then(|total| subtotal.checked_add(total))
                .ok_or_else(|| CartError::AmountOverflow(line.id.clone()))?;
        }
        Ok(Self { lines })
    }

    /// Lines in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Look up the line for a product.
    #[must_use]
    pub fn get(&self, id: &ProductId) -> Option<&CartLine> {
        self.lines.iter().find(|line| &line.id == id)
    }

    /// Number of distinct lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Add `quantity` of a product.
    ///
    /// Increments the existing line if the product is already in the cart,
    /// leaving its snapshot untouched; otherwise appends a new line. The
    /// increment saturates at `u32::MAX`. A new line with a negative price,
    /// or any add that would overflow the subtotal, is ignored.
    pub fn add_item(&mut self, product: &Product, quantity: u32) -> CartEvent {
        if quantity == 0 {
            return CartEvent::Ignored(IgnoreReason::ZeroQuantity);
        }

        let existing = self.get(&product.id).map(|line| (line.price, line.quantity));
        if let Some((price, current)) = existing {
            let new_quantity = current.saturating_add(quantity);
            if self.subtotal_with(&product.id, price, new_quantity).is_none() {
                return CartEvent::Ignored(IgnoreReason::AmountOverflow);
            }
            if let Some(line) = self.lines.iter_mut().find(|line| line.id == product.id) {
                line.quantity = new_quantity;
            }
            return CartEvent::Incremented {
                id: product.id.clone(),
                quantity: new_quantity,
            };
        }

        if is_negative(product.price) {
            return CartEvent::Ignored(IgnoreReason::NegativePrice);
        }
        if self.subtotal_with(&product.id, product.price, quantity).is_none() {
            return CartEvent::Ignored(IgnoreReason::AmountOverflow);
        }

        self.lines.push(CartLine::from_product(product, quantity));
        CartEvent::Added {
            id: product.id.clone(),
            quantity,
        }
    }

    /// Remove the line for a product, if present.
    pub fn remove_item(&mut self, id: &ProductId) -> CartEvent {
        let before = self.lines.len();
        self.lines.retain(|line| &line.id != id);
        if self.lines.len() == before {
            CartEvent::Ignored(IgnoreReason::LineNotFound)
        } else {
            CartEvent::Removed { id: id.clone() }
        }
    }

    /// Set the quantity of an existing line.
    ///
    /// A quantity below 1, or one that would overflow the subtotal, leaves
    /// the line exactly as it was.
    pub fn update_quantity(&mut self, id: &ProductId, quantity: u32) -> CartEvent {
        if quantity < 1 {
            return CartEvent::Ignored(IgnoreReason::QuantityBelowOne);
        }

        let Some(price) = self.get(id).map(|line| line.price) else {
            return CartEvent::Ignored(IgnoreReason::LineNotFound);
        };
        if self.subtotal_with(id, price, quantity).is_none() {
            return CartEvent::Ignored(IgnoreReason::AmountOverflow);
        }

        match self.lines.iter_mut().find(|line| &line.id == id) {
            Some(line) => {
                line.quantity = quantity;
                CartEvent::QuantityUpdated {
                    id: id.clone(),
                    quantity,
                }
            }
            None => CartEvent::Ignored(IgnoreReason::LineNotFound),
        }
    }

    /// Drop every line.
    pub fn clear(&mut self) -> CartEvent {
        let lines = self.lines.len();
        self.lines.clear();
        CartEvent::Cleared { lines }
    }

    /// Sum of all line quantities.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.quantity)).sum()
    }

    /// Sum of `price * quantity` over all lines.
    ///
    /// Every mutation keeps this representable, so it never saturates for a
    /// cart built through this API.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.lines
            .iter()
            .try_fold(Decimal::ZERO, |acc, line| {
                line.checked_line_total().and_then(|total| acc.checked_add(total))
            })
            .unwrap_or(Decimal::MAX)
    }

    /// Subtotal if the line for `id` had `price` and `quantity`, or `None`
    /// on overflow.
    fn subtotal_with(&self, id: &ProductId, price: Decimal, quantity: u32) -> Option<Decimal> {
        let changed = price.checked_mul(Decimal::from(quantity))?;
        self.lines
            .iter()
            .filter(|line| &line.id != id)
            .try_fold(changed, |acc, line| acc.checked_add(line.checked_line_total()?))
    }
}

impl TryFrom<Vec<CartLine>> for Cart {
    type Error = CartError;

    fn try_from(lines: Vec<CartLine>) -> Result<Self, Self::Error> {
        Self::from_lines(lines)
    }
}

impl From<Cart> for Vec<CartLine> {
    fn from(cart: Cart) -> Self {
        cart.lines
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn product(id: &str, price: i64) -> Product {
        Product::new(id, format!("Product {id}"), Decimal::new(price, 0), format!("/img/{id}.png"))
    }

    fn id(s: &str) -> ProductId {
        ProductId::new(s)
    }

    #[test]
    fn test_distinct_adds_create_one_line_each() {
        let mut cart = Cart::new();
        cart.add_item(&product("1", 10), 1);
        cart.add_item(&product("2", 5), 2);
        cart.add_item(&product("1", 10), 4);
        cart.add_item(&product("3", 1), 1);

        assert_eq!(cart.len(), 3);
        assert_eq!(cart.get(&id("1")).unwrap().quantity, 5);
        assert_eq!(cart.get(&id("2")).unwrap().quantity, 2);
        assert_eq!(cart.get(&id("3")).unwrap().quantity, 1);
    }

    #[test]
    fn test_new_lines_append_in_order() {
        let mut cart = Cart::new();
        cart.add_item(&product("b", 1), 1);
        cart.add_item(&product("a", 1), 1);
        cart.add_item(&product("b", 1), 1);

        let ids: Vec<&str> = cart.lines().iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, ["b", "a"]);
    }

    #[test]
    fn test_repeat_add_keeps_first_snapshot() {
        let mut cart = Cart::new();
        cart.add_item(&product("1", 10), 2);

        let mut repriced = product("1", 99);
        repriced.name = "Renamed".to_string();
        repriced.image = "/img/new.png".to_string();
        let event = cart.add_item(&repriced, 3);

        assert_eq!(
            event,
            CartEvent::Incremented {
                id: id("1"),
                quantity: 5
            }
        );
        let line = &cart.lines()[0];
        assert_eq!(cart.len(), 1);
        assert_eq!(line.quantity, 5);
        assert_eq!(line.name, "Product 1");
        assert_eq!(line.price, Decimal::new(10, 0));
        assert_eq!(line.image, "/img/1.png");
    }

    #[test]
    fn test_add_zero_quantity_is_ignored() {
        let mut cart = Cart::new();
        let event = cart.add_item(&product("1", 10), 0);
        assert_eq!(event, CartEvent::Ignored(IgnoreReason::ZeroQuantity));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_add_saturates_quantity() {
        let mut cart = Cart::new();
        cart.add_item(&product("1", 1), u32::MAX - 1);
        cart.add_item(&product("1", 1), 5);
        assert_eq!(cart.get(&id("1")).unwrap().quantity, u32::MAX);
    }

    #[test]
    fn test_update_quantity_zero_keeps_existing() {
        let mut cart = Cart::new();
        cart.add_item(&product("7", 3), 2);

        let event = cart.update_quantity(&id("7"), 0);

        assert_eq!(event, CartEvent::Ignored(IgnoreReason::QuantityBelowOne));
        assert!(!event.changed());
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.get(&id("7")).unwrap().quantity, 2);
    }

    #[test]
    fn test_update_quantity_sets_exact_value() {
        let mut cart = Cart::new();
        cart.add_item(&product("7", 3), 2);

        let event = cart.update_quantity(&id("7"), 5);

        assert!(event.changed());
        assert_eq!(cart.get(&id("7")).unwrap().quantity, 5);
    }

    #[test]
    fn test_update_quantity_unknown_id_is_ignored() {
        let mut cart = Cart::new();
        cart.add_item(&product("7", 3), 2);
        let before = cart.clone();

        let event = cart.update_quantity(&id("8"), 4);

        assert_eq!(event, CartEvent::Ignored(IgnoreReason::LineNotFound));
        assert_eq!(cart, before);
    }

    #[test]
    fn test_remove_unknown_id_leaves_cart_identical() {
        let mut cart = Cart::new();
        cart.add_item(&product("1", 10), 2);
        cart.add_item(&product("2", 5), 3);
        let before = cart.clone();

        let event = cart.remove_item(&id("missing"));

        assert_eq!(event, CartEvent::Ignored(IgnoreReason::LineNotFound));
        assert_eq!(cart, before);
    }

    #[test]
    fn test_remove_existing_line() {
        let mut cart = Cart::new();
        cart.add_item(&product("1", 10), 2);
        cart.add_item(&product("2", 5), 3);

        let event = cart.remove_item(&id("1"));

        assert_eq!(event, CartEvent::Removed { id: id("1") });
        assert_eq!(cart.len(), 1);
        assert!(cart.get(&id("1")).is_none());
    }

    #[test]
    fn test_derived_totals() {
        let mut cart = Cart::new();
        cart.add_item(&product("1", 10), 2);
        cart.add_item(&product("2", 5), 3);

        assert_eq!(cart.item_count(), 5);
        assert_eq!(cart.subtotal(), Decimal::new(35, 0));
    }

    #[test]
    fn test_subtotal_keeps_cents() {
        let mut cart = Cart::new();
        let tee = Product::new("1", "Premium T-Shirt", Decimal::new(2999, 2), "/tee.png");
        let wallet = Product::new("3", "Leather Wallet", Decimal::new(4999, 2), "/wallet.png");
        cart.add_item(&tee, 2);
        cart.add_item(&wallet, 1);

        assert_eq!(cart.subtotal(), Decimal::new(10_997, 2));
    }

    #[test]
    fn test_clear_zeroes_totals() {
        let mut cart = Cart::new();
        cart.add_item(&product("1", 10), 2);
        cart.add_item(&product("2", 5), 3);

        assert_eq!(cart.clear(), CartEvent::Cleared { lines: 2 });
        assert_eq!(cart.item_count(), 0);
        assert_eq!(cart.subtotal(), Decimal::ZERO);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_from_lines_rejects_duplicates() {
        let line = CartLine::from_product(&product("1", 10), 1);
        let result = Cart::from_lines(vec![line.clone(), line]);
        assert_eq!(result, Err(CartError::DuplicateLine(id("1"))));
    }

    #[test]
    fn test_from_lines_rejects_zero_quantity() {
        let line = CartLine::from_product(&product("1", 10), 0);
        assert_eq!(
            Cart::from_lines(vec![line]),
            Err(CartError::ZeroQuantity(id("1")))
        );
    }

    #[test]
    fn test_from_lines_rejects_negative_price() {
        let line = CartLine::from_product(&product("1", -10), 1);
        assert_eq!(
            Cart::from_lines(vec![line]),
            Err(CartError::NegativePrice(id("1")))
        );
    }

    #[test]
    fn test_add_negative_price_is_ignored() {
        let mut cart = Cart::new();
        cart.add_item(&product("1", 10), 2);

        let event = cart.add_item(&product("refund", -5), 1);

        assert_eq!(event, CartEvent::Ignored(IgnoreReason::NegativePrice));
        assert_eq!(cart.len(), 1);
        assert!(Cart::from_lines(cart.lines().to_vec()).is_ok());
    }

    #[test]
    fn test_add_that_overflows_subtotal_is_ignored() {
        let mut cart = Cart::new();
        let huge = Product::new("1", "Huge", Decimal::MAX, "");

        assert_eq!(
            cart.add_item(&huge, 2),
            CartEvent::Ignored(IgnoreReason::AmountOverflow)
        );
        assert!(cart.is_empty());

        assert!(cart.add_item(&huge, 1).changed());
        assert_eq!(
            cart.add_item(&huge, 1),
            CartEvent::Ignored(IgnoreReason::AmountOverflow)
        );
        assert_eq!(
            cart.add_item(&product("2", 1), 1),
            CartEvent::Ignored(IgnoreReason::AmountOverflow)
        );
        assert_eq!(cart.get(&id("1")).unwrap().quantity, 1);
        assert_eq!(cart.subtotal(), Decimal::MAX);
    }

    #[test]
    fn test_update_that_overflows_subtotal_is_ignored() {
        let mut cart = Cart::new();
        cart.add_item(&Product::new("1", "Huge", Decimal::MAX, ""), 1);

        let event = cart.update_quantity(&id("1"), 3);

        assert_eq!(event, CartEvent::Ignored(IgnoreReason::AmountOverflow));
        assert_eq!(cart.get(&id("1")).unwrap().quantity, 1);
    }

    #[test]
    fn test_from_lines_rejects_overflowing_line_total() {
        let line = CartLine::from_product(&Product::new("1", "x", Decimal::MAX, ""), 2);
        assert_eq!(
            Cart::from_lines(vec![line]),
            Err(CartError::AmountOverflow(id("1")))
        );
    }

    #[test]
    fn test_from_lines_rejects_overflowing_subtotal() {
        let first = CartLine::from_product(&Product::new("1", "x", Decimal::MAX, ""), 1);
        let second = CartLine::from_product(&product("2", 1), 1);
        assert_eq!(
            Cart::from_lines(vec![first, second]),
            Err(CartError::AmountOverflow(id("2")))
        );
    }

    #[test]
    fn test_deserialize_accepts_numeric_prices() {
        let raw = r#"[{"id":"1","name":"Tee","price":10,"quantity":2,"image":"/tee.png"}]"#;
        let cart: Cart = serde_json::from_str(raw).unwrap();
        assert_eq!(cart.subtotal(), Decimal::new(20, 0));
    }

    #[test]
    fn test_deserialize_rejects_invalid_lines() {
        let raw = r#"[{"id":"1","name":"Tee","price":"10","quantity":0,"image":""}]"#;
        assert!(serde_json::from_str::<Cart>(raw).is_err());
    }

    #[test]
    fn test_serializes_as_plain_array() {
        let mut cart = Cart::new();
        cart.add_item(&product("1", 10), 2);

        let value = serde_json::to_value(&cart).unwrap();
        let lines = value.as_array().unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0]["id"], "1");
        assert_eq!(lines[0]["quantity"], 2);
    }
}
