//! Cart commands.
//!
//! # Usage
//!
//! ```bash
//! rs-cli cart show
//! rs-cli cart add 1
//! rs-cli cart update 1 3
//! rs-cli cart remove 1
//! ```
//!
//! # Environment Variables
//!
//! - `ROCKETSHOES_API_URL` - Stock API base URL
//! - `ROCKETSHOES_STORAGE_DIR` - Where the cart is persisted between runs

use rocketshoes_core::{CartItems, CurrencyCode, LineItem, ProductId};
use rocketshoes_storefront::state::AppState;
use rocketshoes_storefront::{CartError, UpdateProductAmount};
use tracing::info;

/// Log the cart contents, subtotals and total.
pub fn show(state: &AppState) {
    let cart = state.cart().cart();
    for line in render(&cart, state.config().currency) {
        info!("{line}");
    }
}

/// Add one unit of a product.
///
/// # Errors
///
/// Returns `CartError` if the product is out of stock or cannot be fetched.
pub async fn add(state: &AppState, product_id: ProductId) -> Result<(), CartError> {
    state.cart().add_product(product_id).await?;
    show(state);
    Ok(())
}

/// Remove a product.
///
/// # Errors
///
/// Returns `CartError::NotFound` if the product is not in the cart.
pub fn remove(state: &AppState, product_id: ProductId) -> Result<(), CartError> {
    state.cart().remove_product(product_id)?;
    show(state);
    Ok(())
}

/// Set the amount of a product in the cart.
///
/// # Errors
///
/// Returns `CartError` if the amount exceeds stock, the product is not in the
/// cart, or the stock API fails.
pub async fn update(
    state: &AppState,
    product_id: ProductId,
    amount: i64,
) -> Result<(), CartError> {
    state
        .cart()
        .update_product_amount(UpdateProductAmount { product_id, amount })
        .await?;
    show(state);
    Ok(())
}

/// Human-readable cart summary, one entry per output line.
fn render(items: &[LineItem], currency: CurrencyCode) -> Vec<String> {
    if items.is_empty() {
        return vec!["Cart is empty".to_string()];
    }

    let mut lines: Vec<String> = items
        .iter()
        .map(|item| {
            format!(
                "#{} {} - {} x {} = {}",
                item.product_id(),
                item.product.title,
                item.amount,
                item.product.price.format(currency),
                item.subtotal().format(currency)
            )
        })
        .collect();

    lines.push(format!(
        "{} item(s), total {}",
        items.size(),
        items.total().format(currency)
    ));
    lines
}
