//! Cart commands.
//!
//! Each command opens the file-backed cart for the configured slot, applies
//! one operation and reports the outcome on stdout.

use std::io::{self, Write as _};

use rust_decimal::Decimal;
use tracing::info;

use shopfront_core::{CartEvent, IgnoreReason, Product, ProductId};
use shopfront_storefront::{AppError, CartStore, CartView, FileStore, StorefrontConfig};

/// Open the configured cart.
fn open(config: &StorefrontConfig) -> CartStore<FileStore> {
    info!(data_dir = %config.data_dir.display(), key = %config.cart_key, "Opening cart");
    CartStore::open(FileStore::new(&config.data_dir), &config.cart_key)
}

fn write_out(text: &str) -> Result<(), AppError> {
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{text}").map_err(|e| AppError::Internal(format!("write to stdout: {e}")))
}

/// Human-readable summary of a mutation.
fn describe(event: &CartEvent) -> String {
    match event {
        CartEvent::Added { id, quantity } => format!("added {id} x{quantity}"),
        CartEvent::Incremented { id, quantity } => format!("{id} now x{quantity}"),
        CartEvent::Removed { id } => format!("removed {id}"),
        CartEvent::QuantityUpdated { id, quantity } => format!("{id} set to x{quantity}"),
        CartEvent::Cleared { lines } => format!("cleared {lines} line(s)"),
        CartEvent::Ignored(IgnoreReason::ZeroQuantity) => {
            "nothing to add: quantity must be at least 1".to_string()
        }
        CartEvent::Ignored(IgnoreReason::QuantityBelowOne) => {
            "unchanged: quantity below 1 is ignored, use `remove` to drop a line".to_string()
        }
        CartEvent::Ignored(IgnoreReason::LineNotFound) => {
            "unchanged: no line for that product".to_string()
        }
        CartEvent::Ignored(IgnoreReason::NegativePrice) => {
            "nothing to add: price must not be negative".to_string()
        }
        CartEvent::Ignored(IgnoreReason::AmountOverflow) => {
            "unchanged: cart total would be too large".to_string()
        }
    }
}

/// Render the cart as a table with totals.
fn render(view: &CartView) -> String {
    if view.items.is_empty() {
        return "Your cart is empty.".to_string();
    }

    let mut out = String::new();
    for item in &view.items {
        out.push_str(&format!(
            "{:<12} {:<32} {:>4} x {:>10} = {:>10}\n",
            item.id, item.name, item.quantity, item.price, item.line_price
        ));
    }
    out.push_str(&format!("\nItems:    {}\n", view.item_count));
    out.push_str(&format!("Subtotal: {}\n", view.subtotal));
    out.push_str(&format!("Shipping: {}\n", view.shipping));
    out.push_str(&format!("Total:    {}", view.total));
    out
}

/// Show cart lines and totals.
///
/// # Errors
///
/// Returns an error if the output cannot be written or encoded.
pub fn show(config: &StorefrontConfig, json: bool) -> Result<(), AppError> {
    let store = open(config);
    let view = CartView::build(store.cart(), config.flat_shipping, config.currency);

    if json {
        let encoded = serde_json::to_string_pretty(&view)
            .map_err(|e| AppError::Internal(format!("encode cart view: {e}")))?;
        write_out(&encoded)
    } else {
        write_out(&render(&view))
    }
}

/// Add a product to the cart.
///
/// # Errors
///
/// Returns `AppError::BadRequest` for a negative price.
pub fn add(
    config: &StorefrontConfig,
    id: String,
    name: String,
    price: Decimal,
    image: String,
    quantity: u32,
) -> Result<(), AppError> {
    if price.is_sign_negative() && !price.is_zero() {
        return Err(AppError::BadRequest(format!("price must not be negative: {price}")));
    }

    let product = Product::new(id, name, price, image);
    let mut store = open(config);
    let event = store.add_item(&product, quantity);
    write_out(&describe(&event))
}

/// Remove a product's line.
///
/// # Errors
///
/// Returns an error if the output cannot be written.
pub fn remove(config: &StorefrontConfig, id: &str) -> Result<(), AppError> {
    let mut store = open(config);
    let event = store.remove_item(&ProductId::new(id));
    write_out(&describe(&event))
}

/// Set a line's quantity.
///
/// # Errors
///
/// Returns an error if the output cannot be written.
pub fn update(config: &StorefrontConfig, id: &str, quantity: u32) -> Result<(), AppError> {
    let mut store = open(config);
    let event = store.update_quantity(&ProductId::new(id), quantity);
    write_out(&describe(&event))
}

/// Empty the cart.
///
/// # Errors
///
/// Returns an error if the output cannot be written.
pub fn clear(config: &StorefrontConfig) -> Result<(), AppError> {
    let mut store = open(config);
    let event = store.clear_cart();
    write_out(&describe(&event))
}

/// Delete the cart's storage slot.
///
/// # Errors
///
/// Returns an error if the slot cannot be removed.
pub fn forget(config: &StorefrontConfig) -> Result<(), AppError> {
    let mut store = open(config);
    store.forget()?;
    write_out("cart slot removed")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use shopfront_core::{Cart, CurrencyCode};

    use super::*;

    #[test]
    fn test_render_empty_cart() {
        let view = CartView::build(&Cart::new(), Decimal::new(599, 2), CurrencyCode::USD);
        assert_eq!(render(&view), "Your cart is empty.");
    }

    #[test]
    fn test_render_includes_totals() {
        let mut cart = Cart::new();
        cart.add_item(&Product::new("1", "Tee", Decimal::new(10, 0), ""), 2);
        let view = CartView::build(&cart, Decimal::new(599, 2), CurrencyCode::USD);

        let rendered = render(&view);
        assert!(rendered.contains("Subtotal: $20.00"));
        assert!(rendered.contains("Shipping: $5.99"));
        assert!(rendered.contains("Total:    $25.99"));
    }

    #[test]
    fn test_describe_ignored_update() {
        let text = describe(&CartEvent::Ignored(IgnoreReason::QuantityBelowOne));
        assert!(text.starts_with("unchanged"));
    }

    #[test]
    fn test_describe_ignored_overflow() {
        let text = describe(&CartEvent::Ignored(IgnoreReason::AmountOverflow));
        assert!(text.starts_with("unchanged"));
    }

    #[test]
    fn test_add_rejects_negative_price_before_touching_storage() {
        let dir = tempfile::tempdir().unwrap();
        let config = StorefrontConfig {
            data_dir: dir.path().join("data"),
            ..StorefrontConfig::default()
        };

        let err = add(
            &config,
            "1".to_string(),
            "Refund".to_string(),
            Decimal::new(-500, 2),
            String::new(),
            1,
        )
        .unwrap_err();

        assert!(matches!(err, AppError::BadRequest(_)));
        assert_eq!(err.exit_code(), 2);
        assert!(!config.data_dir.exists());
    }
}
