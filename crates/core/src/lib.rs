//! RocketShoes Core - Shared types library.
//!
//! This crate provides the types used across all RocketShoes components:
//! - `storefront` - Cart store, stock client and the catalog API
//! - `cli` - Command-line cart front end
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no HTTP clients,
//! no persistence. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Type-safe IDs, prices, products and cart line items

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
