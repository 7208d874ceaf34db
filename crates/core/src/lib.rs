//! Shopfront Core - Shared types and cart logic.
//!
//! This crate provides the domain types used across all Shopfront components:
//! - `storefront` - The session cart store and its persistence
//! - `cli` - Command-line front end for a file-backed cart
//!
//! # Architecture
//!
//! The core crate contains only types and pure logic - no I/O, no storage
//! access, no logging. This keeps the cart rules testable on their own and
//! lets the storefront decide when and where state is persisted.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, prices and product descriptors
//! - [`cart`] - Cart lines and the mutation rules that keep them consistent

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod types;

pub use cart::{Cart, CartError, CartEvent, CartLine, IgnoreReason};
pub use types::*;
