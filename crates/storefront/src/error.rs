//! Cart operation errors.
//!
//! Every cart operation returns `Result<(), CartError>` and also reports the
//! failure to the user through a [`Notification`](crate::notify::Notification).
//! Only [`CartError::OutOfStock`] has its own user-facing message; everything
//! else collapses into the operation's generic failure message.

use rocketshoes_core::ProductId;
use thiserror::Error;

use crate::notify::CartOperation;
use crate::stock::ApiError;

/// User-facing message for a request exceeding available stock.
pub const OUT_OF_STOCK_MESSAGE: &str = "Requested quantity is out of stock";

/// Error returned by a cart operation.
#[derive(Debug, Error)]
pub enum CartError {
    /// Requested amount exceeds what the stock API reports as available.
    #[error("Requested {requested} of product {product_id}, only {available} in stock")]
    OutOfStock {
        product_id: ProductId,
        requested: i64,
        available: i64,
    },

    /// The product is not in the cart.
    #[error("Product {0} is not in the cart")]
    NotFound(ProductId),

    /// Stock API call failed.
    #[error("Stock service error: {0}")]
    Stock(#[from] ApiError),

    /// The cart could not be serialized for persistence.
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl CartError {
    /// Message shown to the user when `operation` fails with this error.
    #[must_use]
    pub const fn user_message(&self, operation: CartOperation) -> &'static str {
        match self {
            Self::OutOfStock { .. } => OUT_OF_STOCK_MESSAGE,
            Self::NotFound(_) | Self::Stock(_) | Self::Serialize(_) => {
                operation.failure_message()
            }
        }
    }
}

/// Result type alias for `CartError`.
pub type Result<T> = std::result::Result<T, CartError>;
