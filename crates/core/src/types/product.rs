//! Catalog records served by the stock API.

use serde::{Deserialize, Serialize};

use super::{Price, ProductId};

/// A product as served by `GET /products/{id}`.
///
/// Unknown fields are ignored so catalog records can carry extra metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    #[serde(alias = "name")]
    pub title: String,
    pub price: Price,
    pub image: String,
}

/// Available quantity of a product, as served by `GET /stock/{id}`.
///
/// Signed: a negative amount is accepted as-is and covers no request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stock {
    pub id: ProductId,
    pub amount: i64,
}

impl Stock {
    /// Whether `requested` units can be taken from this stock.
    #[must_use]
    pub fn covers(&self, requested: i64) -> bool {
        requested <= self.amount
    }
}
