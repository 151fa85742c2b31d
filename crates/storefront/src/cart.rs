//! Cart state: the line items, their stock validation and persistence.
//!
//! # Flow
//!
//! ```text
//! UI event -> CartStore op -> StockService check -> replace snapshot -> persist
//!                                   |
//!                                   +-> failure: snapshot untouched, Notifier
//! ```
//!
//! The cart is held as an immutable `Arc<[LineItem]>` snapshot inside a
//! `watch` channel. Every successful mutation builds a new sequence from the
//! snapshot it read and replaces it wholesale, which both keeps readers
//! lock-free and lets UI tasks `subscribe()` to re-render on change.
//!
//! Operations capture their snapshot before awaiting the stock API. Two
//! overlapping operations are last-write-wins.

use std::sync::Arc;

use rocketshoes_core::{CartItems, LineItem, ProductId, Stock};
use serde::Deserialize;
use tokio::sync::watch;
use tracing::{debug, info, instrument, warn};

use crate::error::{CartError, Result};
use crate::notify::{CartOperation, Notification, Notifier};
use crate::stock::StockService;
use crate::storage::PersistenceStore;

/// Storage key holding the serialized cart.
pub const CART_STORAGE_KEY: &str = "@RocketShoes:cart";

/// Input for [`CartStore::update_product_amount`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductAmount {
    pub product_id: ProductId,
    /// Target quantity. Values `<= 0` are ignored.
    pub amount: i64,
}

/// Shared cart state.
///
/// Cheaply cloneable via `Arc`; every clone sees and mutates the same cart.
#[derive(Clone)]
pub struct CartStore {
    inner: Arc<CartStoreInner>,
}

struct CartStoreInner {
    items: watch::Sender<Arc<[LineItem]>>,
    stock: Arc<dyn StockService>,
    storage: Arc<dyn PersistenceStore>,
    notifier: Arc<dyn Notifier>,
}

impl CartStore {
    /// Build the store, reading the persisted cart once.
    ///
    /// A missing key yields an empty cart. So does an unreadable store or a
    /// value that is not a JSON array of line items; both are logged.
    pub fn load(
        stock: Arc<dyn StockService>,
        storage: Arc<dyn PersistenceStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let initial: Arc<[LineItem]> = Arc::from(restore(storage.as_ref()));
        info!(items = initial.len(), "Cart loaded");

        let (items, _) = watch::channel(initial);

        Self {
            inner: Arc::new(CartStoreInner {
                items,
                stock,
                storage,
                notifier,
            }),
        }
    }

    /// Current cart snapshot.
    #[must_use]
    pub fn cart(&self) -> Arc<[LineItem]> {
        self.inner.items.borrow().clone()
    }

    /// Receiver that observes every replaced snapshot.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Arc<[LineItem]>> {
        self.inner.items.subscribe()
    }

    /// Add one unit of `product_id`.
    ///
    /// A product already in the cart has its amount incremented; a new one is
    /// fetched from the stock API and appended with amount 1.
    ///
    /// # Errors
    ///
    /// - `CartError::OutOfStock` if the incremented amount exceeds stock
    /// - `CartError::Stock` if the stock API or product lookup fails
    ///
    /// The cart is unchanged on error and the user has been notified.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn add_product(&self, product_id: ProductId) -> Result<()> {
        let result = self.try_add_product(product_id).await;
        self.report(CartOperation::AddProduct, result)
    }

    /// Remove `product_id` from the cart.
    ///
    /// # Errors
    ///
    /// `CartError::NotFound` if the product is not in the cart. The cart is
    /// unchanged and the user has been notified.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub fn remove_product(&self, product_id: ProductId) -> Result<()> {
        let result = self.try_remove_product(product_id);
        self.report(CartOperation::RemoveProduct, result)
    }

    /// Set the amount of a product already in the cart.
    ///
    /// Amounts `<= 0` are a silent no-op: no stock call, no write, no
    /// notification.
    ///
    /// # Errors
    ///
    /// - `CartError::OutOfStock` if `amount` exceeds stock
    /// - `CartError::NotFound` if the product is not in the cart
    /// - `CartError::Stock` if the stock API fails
    ///
    /// The cart is unchanged on error and the user has been notified.
    #[instrument(skip(self, update), fields(product_id = %update.product_id, amount = update.amount))]
    pub async fn update_product_amount(&self, update: UpdateProductAmount) -> Result<()> {
        if update.amount <= 0 {
            debug!("Ignoring non-positive amount");
            return Ok(());
        }

        let result = self.try_update_product_amount(update).await;
        self.report(CartOperation::UpdateProductAmount, result)
    }

    async fn try_add_product(&self, product_id: ProductId) -> Result<()> {
        let mut items = self.cart().to_vec();
        let existing = items.position_of(product_id);

        let stock = self.inner.stock.stock(product_id).await?;

        let current = existing
            .and_then(|index| items.get(index))
            .map_or(0, |item| item.amount);
        let requested = i64::from(current) + 1;
        let amount = checked_amount(&stock, requested)?;

        match existing.and_then(|index| items.get_mut(index)) {
            Some(item) => item.amount = amount,
            None => {
                let product = self.inner.stock.product(product_id).await?;
                items.push(LineItem::new(product));
            }
        }

        self.commit(items)
    }

    fn try_remove_product(&self, product_id: ProductId) -> Result<()> {
        let mut items = self.cart().to_vec();
        let index = items
            .position_of(product_id)
            .ok_or(CartError::NotFound(product_id))?;

        items.remove(index);

        self.commit(items)
    }

    async fn try_update_product_amount(&self, update: UpdateProductAmount) -> Result<()> {
        let UpdateProductAmount { product_id, amount } = update;
        let mut items = self.cart().to_vec();

        let stock = self.inner.stock.stock(product_id).await?;
        let amount = checked_amount(&stock, amount)?;

        let item = items
            .iter_mut()
            .find(|item| item.product_id() == product_id)
            .ok_or(CartError::NotFound(product_id))?;
        item.amount = amount;

        self.commit(items)
    }

    /// Replace the snapshot with `items` and persist them.
    ///
    /// Serialization happens first so a failure leaves the snapshot intact.
    /// The storage write itself is fire-and-forget.
    fn commit(&self, items: Vec<LineItem>) -> Result<()> {
        let payload = serde_json::to_string(&items)?;

        self.inner.items.send_replace(Arc::from(items));

        if let Err(e) = self.inner.storage.set_item(CART_STORAGE_KEY, &payload) {
            warn!(error = %e, key = CART_STORAGE_KEY, "Failed to persist cart");
        }

        Ok(())
    }

    /// Notify the user about a failed operation and pass the result through.
    fn report(&self, operation: CartOperation, result: Result<()>) -> Result<()> {
        if let Err(e) = &result {
            match e {
                CartError::OutOfStock { .. } | CartError::NotFound(_) => {
                    info!(error = %e, ?operation, "Cart operation rejected");
                }
                CartError::Stock(_) | CartError::Serialize(_) => {
                    warn!(error = %e, ?operation, "Cart operation failed");
                }
            }
            self.inner
                .notifier
                .notify(Notification::error(operation, e.user_message(operation)));
        }
        result
    }
}

/// Validate `requested` against `stock` and narrow it to a line amount.
fn checked_amount(stock: &Stock, requested: i64) -> Result<u32> {
    let out_of_stock = || CartError::OutOfStock {
        product_id: stock.id,
        requested,
        available: stock.amount,
    };

    if !stock.covers(requested) {
        return Err(out_of_stock());
    }
    u32::try_from(requested).map_err(|_| out_of_stock())
}

/// Read the persisted cart, falling back to an empty one.
fn restore(storage: &dyn PersistenceStore) -> Vec<LineItem> {
    match storage.get_item(CART_STORAGE_KEY) {
        Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|e| {
            warn!(error = %e, key = CART_STORAGE_KEY, "Discarding unreadable persisted cart");
            Vec::new()
        }),
        Ok(None) => Vec::new(),
        Err(e) => {
            warn!(error = %e, key = CART_STORAGE_KEY, "Failed to read persisted cart");
            Vec::new()
        }
    }
}
