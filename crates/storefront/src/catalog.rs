//! Catalog API: the REST service the cart validates against.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health          - Health check
//! GET  /products        - All products
//! GET  /products/{id}   - Product detail
//! GET  /stock/{id}      - Available quantity
//! ```
//!
//! The catalog is read from a JSON file with the same layout the storefront's
//! development API has always used:
//!
//! ```json
//! {
//!   "products": [{ "id": 1, "title": "...", "price": 179.9, "image": "..." }],
//!   "stock": [{ "id": 1, "amount": 3 }]
//! }
//! ```

use std::path::Path;
use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path as UrlPath, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use rocketshoes_core::{Product, ProductId, Stock};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tower_http::trace::TraceLayer;
use tracing::instrument;

/// Errors loading a catalog file.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to read catalog {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse catalog {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Products and their stock levels.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub products: Vec<Product>,
    #[serde(default)]
    pub stock: Vec<Stock>,
}

impl Catalog {
    /// Load a catalog from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the file cannot be read or parsed.
    pub async fn from_file(path: &Path) -> Result<Self, CatalogError> {
        let display = path.display().to_string();
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| CatalogError::Io {
                path: display.clone(),
                source,
            })?;
        serde_json::from_str(&content).map_err(|source| CatalogError::Parse {
            path: display,
            source,
        })
    }

    #[must_use]
    pub fn product(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    #[must_use]
    pub fn stock(&self, id: ProductId) -> Option<&Stock> {
        self.stock.iter().find(|s| s.id == id)
    }
}

/// Error response for catalog routes.
#[derive(Debug, Error)]
pub enum CatalogApiError {
    #[error("{0} not found")]
    NotFound(String),
}

impl IntoResponse for CatalogApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
        };
        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}

/// Build the catalog router.
pub fn router(catalog: Arc<Catalog>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/products", get(list_products))
        .route("/products/{id}", get(show_product))
        .route("/stock/{id}", get(show_stock))
        .layer(TraceLayer::new_for_http())
        .with_state(catalog)
}

async fn health() -> &'static str {
    "ok"
}

#[instrument(skip(catalog))]
async fn list_products(State(catalog): State<Arc<Catalog>>) -> Json<Vec<Product>> {
    Json(catalog.products.clone())
}

#[instrument(skip(catalog))]
async fn show_product(
    State(catalog): State<Arc<Catalog>>,
    UrlPath(id): UrlPath<ProductId>,
) -> Result<Json<Product>, CatalogApiError> {
    catalog
        .product(id)
        .cloned()
        .map(Json)
        .ok_or_else(|| CatalogApiError::NotFound(format!("product {id}")))
}

#[instrument(skip(catalog))]
async fn show_stock(
    State(catalog): State<Arc<Catalog>>,
    UrlPath(id): UrlPath<ProductId>,
) -> Result<Json<Stock>, CatalogApiError> {
    catalog
        .stock(id)
        .copied()
        .map(Json)
        .ok_or_else(|| CatalogApiError::NotFound(format!("stock for product {id}")))
}
