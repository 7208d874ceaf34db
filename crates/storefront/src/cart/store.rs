//! Session cart store.
//!
//! [`CartStore`] pairs a [`Cart`] with the storage slot it is persisted to.
//! Opening a store rehydrates the cart; every mutation is applied through the
//! pure cart rules and then written back to the slot wholesale.
//!
//! Mutations never fail from the caller's point of view. A corrupt slot is
//! discarded on open, and a failed write after a mutation is logged while the
//! in-memory cart stays authoritative. Owners that need the write outcome
//! call [`CartStore::save`] directly.

use rust_decimal::Decimal;
use thiserror::Error;
use tracing::instrument;

use shopfront_core::{Cart, CartEvent, CartLine, Product, ProductId};

use crate::storage::{KeyValueStore, StorageError};

/// Default storage slot for the cart.
pub const DEFAULT_CART_KEY: &str = "cart";

/// Errors from an explicit save or forget.
#[derive(Debug, Error)]
pub enum CartPersistError {
    #[error("failed to encode cart: {0}")]
    Encode(#[from] serde_json::Error),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// A browsing session's cart, kept in sync with one storage slot.
#[derive(Debug)]
pub struct CartStore<S> {
    storage: S,
    key: String,
    cart: Cart,
}

impl<S: KeyValueStore> CartStore<S> {
    /// Open the cart stored under `key`.
    ///
    /// - A slot holding a valid line list is adopted as-is.
    /// - A slot holding anything else is deleted and the cart starts empty.
    /// - A missing slot, or one that cannot be read, starts empty.
    #[must_use]
    #[instrument(skip_all, fields(key = %key.as_ref()))]
    pub fn open(mut storage: S, key: impl AsRef<str>) -> Self {
        let key = key.as_ref().to_string();
        let cart = load(&mut storage, &key);
        tracing::debug!(lines = cart.len(), "cart opened");
        Self { storage, key, cart }
    }

    /// Open the cart stored under [`DEFAULT_CART_KEY`].
    #[must_use]
    pub fn open_default(storage: S) -> Self {
        Self::open(storage, DEFAULT_CART_KEY)
    }

    /// Add `quantity` of a product, merging with an existing line.
    #[instrument(skip_all, fields(product_id = %product.id, quantity = quantity))]
    pub fn add_item(&mut self, product: &Product, quantity: u32) -> CartEvent {
        let event = self.cart.add_item(product, quantity);
        self.commit(event)
    }

    /// Add a single unit of a product.
    pub fn add_one(&mut self, product: &Product) -> CartEvent {
        self.add_item(product, 1)
    }

    /// Remove the line for a product, if present.
    #[instrument(skip_all, fields(product_id = %id))]
    pub fn remove_item(&mut self, id: &ProductId) -> CartEvent {
        let event = self.cart.remove_item(id);
        self.commit(event)
    }

    /// Set a line's quantity. Values below 1 leave the line unchanged.
    #[instrument(skip_all, fields(product_id = %id, quantity = quantity))]
    pub fn update_quantity(&mut self, id: &ProductId, quantity: u32) -> CartEvent {
        let event = self.cart.update_quantity(id, quantity);
        self.commit(event)
    }

    /// Empty the cart.
    #[instrument(skip_all)]
    pub fn clear_cart(&mut self) -> CartEvent {
        let event = self.cart.clear();
        self.commit(event)
    }

    /// Sum of all line quantities.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.cart.item_count()
    }

    /// Sum of `price * quantity` over all lines.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.cart.subtotal()
    }

    /// Current lines in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        self.cart.lines()
    }

    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Storage slot this cart persists to.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    #[must_use]
    pub const fn storage(&self) -> &S {
        &self.storage
    }

    /// Close the session and hand back the storage backend.
    #[must_use]
    pub fn into_storage(self) -> S {
        self.storage
    }

    /// Write the current lines to the storage slot.
    ///
    /// # Errors
    ///
    /// Returns `CartPersistError` if encoding or the storage write fails.
    pub fn save(&mut self) -> Result<(), CartPersistError> {
        let encoded = serde_json::to_string(&self.cart)?;
        self.storage.set(&self.key, &encoded)?;
        Ok(())
    }

    /// Delete the storage slot and empty the in-memory cart.
    ///
    /// # Errors
    ///
    /// Returns `CartPersistError` if the storage backend fails. The
    /// in-memory cart is emptied either way.
    pub fn forget(&mut self) -> Result<(), CartPersistError> {
        self.cart.clear();
        self.storage.remove(&self.key)?;
        tracing::info!(key = %self.key, "cart slot removed");
        Ok(())
    }

    fn commit(&mut self, event: CartEvent) -> CartEvent {
        if let CartEvent::Ignored(reason) = &event {
            tracing::debug!(reason = reason.as_str(), "cart mutation ignored");
        } else {
            tracing::debug!(?event, item_count = self.cart.item_count(), "cart updated");
        }

        if let Err(e) = self.save() {
            tracing::error!(key = %self.key, error = %e, "Failed to persist cart");
        }
        event
    }
}

/// Read and validate the persisted cart, discarding a corrupt slot.
fn load<S: KeyValueStore>(storage: &mut S, key: &str) -> Cart {
    let raw = match storage.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Cart::new(),
        Err(e) => {
            tracing::warn!(key, error = %e, "Failed to read persisted cart, starting empty");
            return Cart::new();
        }
    };

    match serde_json::from_str::<Cart>(&raw) {
        Ok(cart) => cart,
        Err(e) => {
            tracing::warn!(key, error = %e, "Discarding corrupt persisted cart");
            if let Err(e) = storage.remove(key) {
                tracing::error!(key, error = %e, "Failed to remove corrupt cart slot");
            }
            Cart::new()
        }
    }
}
