//! Application state shared across the UI.
//!
//! `AppState` plays the part of the cart provider: whatever constructs it owns
//! the one [`CartStore`] for the session, and any component holding a clone
//! reaches that cart through [`AppState::cart`].

use std::sync::Arc;

use crate::cart::CartStore;
use crate::config::StorefrontConfig;
use crate::notify::{Notifier, TracingNotifier};
use crate::stock::{ApiError, HttpStockClient};
use crate::storage::FileStore;

/// Application state shared across all UI components.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// the cart, the stock client and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    stock: HttpStockClient,
    cart: CartStore,
}

impl AppState {
    /// Create application state with the production collaborators.
    ///
    /// The cart is persisted under `config.storage_dir` and failures are
    /// rendered through `tracing`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the HTTP client cannot be built.
    pub fn new(config: StorefrontConfig) -> Result<Self, ApiError> {
        Self::with_notifier(config, Arc::new(TracingNotifier))
    }

    /// Create application state delivering notifications to `notifier`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the HTTP client cannot be built.
    pub fn with_notifier(
        config: StorefrontConfig,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self, ApiError> {
        let stock = HttpStockClient::new(&config.api)?;
        let storage = Arc::new(FileStore::new(&config.storage_dir));
        let cart = CartStore::load(Arc::new(stock.clone()), storage, notifier);

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                stock,
                cart,
            }),
        })
    }

    /// Get a reference to the configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the stock API client.
    #[must_use]
    pub fn stock(&self) -> &HttpStockClient {
        &self.inner.stock
    }

    /// Get a reference to the cart.
    #[must_use]
    pub fn cart(&self) -> &CartStore {
        &self.inner.cart
    }
}
