//! Stock API client.
//!
//! # Architecture
//!
//! - [`StockService`] is the seam the cart validates against; the cart only
//!   ever holds it as `Arc<dyn StockService>`
//! - [`HttpStockClient`] is the production implementation over `reqwest`
//! - Product metadata is cached in memory via `moka` (5 minute TTL); stock
//!   levels are never cached
//!
//! # Endpoints
//!
//! ```text
//! GET /stock/{id}     -> { "id": 1, "amount": 5 }
//! GET /products/{id}  -> { "id": 1, "title": "...", "price": 179.9, "image": "..." }
//! GET /products       -> [ ...products ]
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use rocketshoes_storefront::stock::{HttpStockClient, StockService};
//!
//! let client = HttpStockClient::new(&config.api)?;
//! let stock = client.stock(ProductId::new(1)).await?;
//! ```

mod client;

pub use client::HttpStockClient;

use async_trait::async_trait;
use rocketshoes_core::{Product, ProductId, Stock};
use thiserror::Error;

/// Source of stock levels and product metadata.
#[async_trait]
pub trait StockService: Send + Sync {
    /// Currently available quantity of `product_id`.
    async fn stock(&self, product_id: ProductId) -> Result<Stock, ApiError>;

    /// Full product record for `product_id`.
    async fn product(&self, product_id: ProductId) -> Result<Product, ApiError>;
}

/// Errors that can occur when talking to the stock API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("Unexpected status {status} from {path}")]
    Status {
        status: reqwest::StatusCode,
        path: String,
    },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Request URL could not be built.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),
}
