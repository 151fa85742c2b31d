//! Core types for RocketShoes.
//!
//! This module provides type-safe wrappers for the catalog and cart domain.

pub mod cart;
pub mod id;
pub mod price;
pub mod product;

pub use cart::{CartItems, LineItem};
pub use id::*;
pub use price::{CurrencyCode, CurrencyCodeError, Price};
pub use product::{Product, Stock};
