//! Shopfront Storefront library.
//!
//! This crate owns the shopping cart of a browsing session: it rehydrates the
//! cart from a persisted storage slot, applies mutations through the pure
//! [`shopfront_core::Cart`] rules, and writes the result back after every
//! change.
//!
//! # Modules
//!
//! - [`cart`] - The session cart store and its display model
//! - [`storage`] - Key/value storage backends for the persisted slot
//! - [`config`] - Environment configuration
//! - [`telemetry`] - Tracing subscriber setup
//! - [`error`] - Unified application error

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod config;
pub mod error;
pub mod storage;
pub mod telemetry;

pub use cart::{CartItemView, CartStore, CartView};
pub use config::StorefrontConfig;
pub use error::AppError;
pub use storage::{FileStore, KeyValueStore, MemoryStore, StorageError};
