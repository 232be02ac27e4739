//! The cart manager.
//!
//! # Operations
//!
//! - [`CartManager::add_product`] - one more unit, or a new line with amount 1
//! - [`CartManager::remove_product`] - drop a line
//! - [`CartManager::update_product_amount`] - set a line's amount
//!
//! None of them return an error. Rejections and failures are reported through
//! the [`Notifier`] and leave the cart untouched.
//!
//! # Concurrency
//!
//! Mutations run one at a time behind an async mutex that is held across the
//! stock lookups, so two overlapping operations never compute from the same
//! stale snapshot. Readers only take the snapshot lock, which is never held
//! across an await.

use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, error, info, instrument, warn};

use rocket_shoes_core::{Cart, Notice, ProductId};

use crate::catalog::StockOracle;
use crate::error::{CartError, Result};
use crate::notice::Notifier;
use crate::storage::{CartStore, StorageError};

/// Arguments for [`CartManager::update_product_amount`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductAmount {
    /// Line to change.
    pub product_id: ProductId,
    /// New amount. Zero or less is ignored.
    pub amount: i64,
}

/// Owner of the shopping cart.
///
/// Cheap to clone; clones share the same cart.
#[derive(Clone)]
pub struct CartManager {
    inner: Arc<CartManagerInner>,
}

struct CartManagerInner {
    oracle: Arc<dyn StockOracle>,
    store: Arc<dyn CartStore>,
    notifier: Arc<dyn Notifier>,
    storage_key: String,
    cart: RwLock<Arc<Cart>>,
    writer: Mutex<()>,
}

impl std::fmt::Debug for CartManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartManager")
            .field("storage_key", &self.inner.storage_key)
            .field("items", &self.inner.cart.read().len())
            .finish_non_exhaustive()
    }
}

impl CartManager {
    /// Create a cart manager, loading the cart stored under `storage_key`.
    ///
    /// A missing, unreadable, or unparsable stored cart starts an empty one.
    pub fn new(
        oracle: Arc<dyn StockOracle>,
        store: Arc<dyn CartStore>,
        notifier: Arc<dyn Notifier>,
        storage_key: impl Into<String>,
    ) -> Self {
        let storage_key = storage_key.into();
        let cart = load_cart(store.as_ref(), &storage_key);
        info!(key = %storage_key, items = cart.len(), "Cart loaded");

        Self {
            inner: Arc::new(CartManagerInner {
                oracle,
                store,
                notifier,
                storage_key,
                cart: RwLock::new(Arc::new(cart)),
                writer: Mutex::new(()),
            }),
        }
    }

    /// The current cart snapshot.
    ///
    /// Snapshots are immutable; later operations swap in a new one.
    #[must_use]
    pub fn cart(&self) -> Arc<Cart> {
        Arc::clone(&*self.inner.cart.read())
    }

    /// Key the cart is stored under.
    #[must_use]
    pub fn storage_key(&self) -> &str {
        &self.inner.storage_key
    }

    /// Add one unit of a product.
    ///
    /// Increments the existing line, or fetches the product and appends it
    /// with an amount of 1. Shows [`Notice::OutOfStock`] if that would exceed
    /// the available stock and [`Notice::AddFailed`] on any other failure.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn add_product(&self, product_id: ProductId) {
        let _writer = self.inner.writer.lock().await;
        let current = self.cart();
        let result = self.try_add_product(&current, product_id).await;
        self.settle(&current, result, Notice::AddFailed).await;
    }

    /// Remove a product's line.
    ///
    /// Shows [`Notice::RemoveFailed`] if the product is not in the cart.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn remove_product(&self, product_id: ProductId) {
        let _writer = self.inner.writer.lock().await;
        let current = self.cart();
        let result = current
            .without(product_id)
            .map(Arc::new)
            .ok_or(CartError::NotInCart(product_id));
        self.settle(&current, result, Notice::RemoveFailed).await;
    }

    /// Set a product's amount.
    ///
    /// Amounts of zero or less are silently ignored. Shows
    /// [`Notice::OutOfStock`] if the amount exceeds the available stock and
    /// [`Notice::UpdateFailed`] on any other failure. Products not in the
    /// cart are left alone.
    #[instrument(skip(self), fields(product_id = %request.product_id, amount = request.amount))]
    pub async fn update_product_amount(&self, request: UpdateProductAmount) {
        if request.amount <= 0 {
            debug!("Ignoring non-positive amount");
            return;
        }

        let _writer = self.inner.writer.lock().await;
        let current = self.cart();
        let result = self
            .try_update_amount(&current, request.product_id, request.amount)
            .await;
        self.settle(&current, result, Notice::UpdateFailed).await;
    }

    async fn try_add_product(&self, cart: &Arc<Cart>, product_id: ProductId) -> Result<Arc<Cart>> {
        let stock = self.inner.oracle.stock(product_id).await?;

        let current_amount = cart.get(product_id).map_or(0, |item| i64::from(item.amount));
        if current_amount >= stock.amount || stock.amount <= 0 {
            return Err(CartError::OutOfStock {
                product_id,
                requested: current_amount + 1,
                available: stock.amount,
            });
        }

        if let Some(next) = cart.with_incremented(product_id) {
            return Ok(Arc::new(next));
        }

        let product = self.inner.oracle.product(product_id).await?;
        Ok(Arc::new(cart.with_appended(product.into_line_item())))
    }

    async fn try_update_amount(
        &self,
        cart: &Arc<Cart>,
        product_id: ProductId,
        amount: i64,
    ) -> Result<Arc<Cart>> {
        let stock = self.inner.oracle.stock(product_id).await?;
        let out_of_stock = || CartError::OutOfStock {
            product_id,
            requested: amount,
            available: stock.amount,
        };

        if amount > stock.amount {
            return Err(out_of_stock());
        }
        let amount = u32::try_from(amount).map_err(|_| out_of_stock())?;

        if !cart.contains(product_id) {
            // Nothing to change; keep the same snapshot
            return Ok(Arc::clone(cart));
        }

        Ok(Arc::new(cart.with_amount(product_id, amount)))
    }

    /// Apply an operation's outcome: swap in the new cart, or show a notice.
    async fn settle(&self, previous: &Arc<Cart>, result: Result<Arc<Cart>>, fallback: Notice) {
        match result {
            Ok(next) => self.replace(previous, next).await,
            Err(err) => {
                if err.is_unexpected() {
                    error!(error = %err, "Cart operation failed");
                } else {
                    debug!(reason = %err, "Cart operation rejected");
                }
                self.inner.notifier.notify(err.notice(fallback));
            }
        }
    }

    /// Swap in `next` and mirror it to the store, unless it is the very
    /// snapshot that was already current.
    async fn replace(&self, previous: &Arc<Cart>, next: Arc<Cart>) {
        if Arc::ptr_eq(previous, &next) {
            return;
        }

        *self.inner.cart.write() = Arc::clone(&next);
        debug!(items = next.len(), "Cart updated");
        self.persist(next).await;
    }

    /// Write the cart to the store. Failures are logged, never surfaced.
    ///
    /// The store is blocking, so the write runs on the blocking pool. The
    /// writer lock is still held, which keeps writes in mutation order.
    async fn persist(&self, cart: Arc<Cart>) {
        let store = Arc::clone(&self.inner.store);
        let key = self.inner.storage_key.clone();
        let write = tokio::task::spawn_blocking(move || {
            let json = cart.to_json().map_err(StorageError::from)?;
            store.set(&key, &json)
        });

        match write.await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => warn!(
                error = %e,
                key = %self.inner.storage_key,
                "Failed to persist cart"
            ),
            Err(e) => warn!(
                error = %e,
                key = %self.inner.storage_key,
                "Cart persist task failed"
            ),
        }
    }
}

/// Read the stored cart, falling back to an empty one.
fn load_cart(store: &dyn CartStore, key: &str) -> Cart {
    match store.get(key) {
        Ok(Some(json)) => Cart::from_json(&json).unwrap_or_else(|e| {
            warn!(error = %e, key = %key, "Stored cart is unparsable, starting empty");
            Cart::new()
        }),
        Ok(None) => Cart::new(),
        Err(e) => {
            warn!(error = %e, key = %key, "Failed to read stored cart, starting empty");
            Cart::new()
        }
    }
}
