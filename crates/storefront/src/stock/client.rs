//! `reqwest` implementation of [`StockService`].
//!
//! Caches products using `moka` (5-minute TTL). Stock is always fetched fresh
//! because it is the value every cart mutation validates against.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;
use rocketshoes_core::{Product, ProductId, Stock};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;

use super::{ApiError, StockService};
use crate::config::ApiConfig;

/// `GET /stock/{id}` body. Only `amount` is required.
#[derive(Debug, Deserialize)]
struct StockResponse {
    amount: i64,
}

/// HTTP client for the stock API.
///
/// Cheaply cloneable; clones share the connection pool and product cache.
#[derive(Clone)]
pub struct HttpStockClient {
    inner: Arc<HttpStockClientInner>,
}

struct HttpStockClientInner {
    client: reqwest::Client,
    base_url: Url,
    products: Cache<ProductId, Product>,
}

impl HttpStockClient {
    /// Create a new stock API client.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Http` if the underlying HTTP client cannot be built.
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;

        let products = Cache::builder()
            .max_capacity(1000)
            .time_to_live(Duration::from_secs(300)) // 5 minutes
            .build();

        Ok(Self {
            inner: Arc::new(HttpStockClientInner {
                client,
                base_url: config.base_url.clone(),
                products,
            }),
        })
    }

    /// The base URL requests are resolved against.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// List the whole catalog (`GET /products`). Not cached.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport, status or parse failures.
    #[instrument(skip(self))]
    pub async fn list_products(&self) -> Result<Vec<Product>, ApiError> {
        self.get_json("products").await
    }

    /// GET `path` relative to the base URL and decode the JSON body.
    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = self.inner.base_url.join(path)?;

        let response = self.inner.client.get(url).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound(path.to_string()));
        }

        // Get response body as text first for better error diagnostics
        let response_text = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                path,
                body = %response_text.chars().take(500).collect::<String>(),
                "Stock API returned non-success status"
            );
            return Err(ApiError::Status {
                status,
                path: path.to_string(),
            });
        }

        serde_json::from_str(&response_text).map_err(|e| {
            tracing::error!(
                error = %e,
                path,
                body = %response_text.chars().take(500).collect::<String>(),
                "Failed to parse stock API response"
            );
            ApiError::Parse(e)
        })
    }
}

#[async_trait]
impl StockService for HttpStockClient {
    #[instrument(skip(self), fields(product_id = %product_id))]
    async fn stock(&self, product_id: ProductId) -> Result<Stock, ApiError> {
        let response: StockResponse = self.get_json(&format!("stock/{product_id}")).await?;
        debug!(amount = response.amount, "Fetched stock");

        Ok(Stock {
            id: product_id,
            amount: response.amount,
        })
    }

    #[instrument(skip(self), fields(product_id = %product_id))]
    async fn product(&self, product_id: ProductId) -> Result<Product, ApiError> {
        // Check cache
        if let Some(product) = self.inner.products.get(&product_id).await {
            debug!("Cache hit for product");
            return Ok(product);
        }

        let product: Product = self.get_json(&format!("products/{product_id}")).await?;

        self.inner.products.insert(product_id, product.clone()).await;

        Ok(product)
    }
}
