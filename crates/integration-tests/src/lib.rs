//! Integration tests for Shopfront.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p shopfront-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_persistence` - Cart store over a real file-backed slot
//! - `cart_properties` - Cart rules exercised through the store API
//!
//! Every test works in its own temporary directory; nothing outside it is
//! touched.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::Path;

use rust_decimal::Decimal;
use shopfront_core::Product;
use shopfront_storefront::{CartStore, FileStore};

/// Build a product with a price given in cents.
#[must_use]
pub fn product(id: &str, name: &str, price_cents: i64) -> Product {
    Product::new(id, name, Decimal::new(price_cents, 2), format!("/images/{id}.png"))
}

/// Open the default cart slot in `dir`.
#[must_use]
pub fn open_cart(dir: &Path) -> CartStore<FileStore> {
    CartStore::open_default(FileStore::new(dir))
}

/// Raw contents of the default cart slot in `dir`, if any.
#[must_use]
pub fn slot_contents(dir: &Path) -> Option<String> {
    std::fs::read_to_string(dir.join("cart.json")).ok()
}
