//! RocketShoes Storefront library.
//!
//! The shopping cart state container and its collaborators:
//!
//! - [`cart`] - `CartStore`: add, remove and set-quantity with stock checks
//! - [`stock`] - `StockService` trait and the HTTP stock API client
//! - [`storage`] - `PersistenceStore` trait with memory and file backends
//! - [`notify`] - User-facing failure notifications
//! - [`state`] - `AppState`, the provider that owns the session's cart
//! - [`catalog`] - The catalog REST API the stock client talks to
//! - [`config`] - Environment configuration

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod config;
pub mod error;
pub mod notify;
pub mod state;
pub mod stock;
pub mod storage;

pub use cart::{CART_STORAGE_KEY, CartStore, UpdateProductAmount};
pub use error::CartError;
