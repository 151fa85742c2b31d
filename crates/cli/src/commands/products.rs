//! Catalog listing.

use rocketshoes_storefront::state::AppState;
use rocketshoes_storefront::stock::ApiError;
use tracing::info;

/// Log every product the stock API knows about.
///
/// # Errors
///
/// Returns `ApiError` if the catalog cannot be fetched.
pub async fn list(state: &AppState) -> Result<(), ApiError> {
    let products = state.stock().list_products().await?;
    let currency = state.config().currency;

    info!("{} product(s) from {}", products.len(), state.stock().base_url());
    for product in &products {
        info!(
            "#{} {} - {}",
            product.id,
            product.title,
            product.price.format(currency)
        );
    }

    Ok(())
}
