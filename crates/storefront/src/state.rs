//! Application state: the scoped owner of the cart.
//!
//! Front ends create one `AppState` at startup and reach the cart through
//! [`AppState::cart`]. Dropping the last clone tears everything down.

use std::sync::Arc;

use crate::cart::CartManager;
use crate::catalog::{CatalogClient, CatalogError};
use crate::config::StorefrontConfig;
use crate::notice::Notifier;
use crate::storage::{CartStore, FileStore};

/// Application state shared across the front end.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// configuration, the catalog client, the store and the cart manager.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: CatalogClient,
    store: Arc<dyn CartStore>,
    cart: CartManager,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.inner.config)
            .field("cart", &self.inner.cart)
            .finish_non_exhaustive()
    }
}

impl AppState {
    /// Create application state backed by the configured file store.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog client cannot be built.
    pub fn new(
        config: StorefrontConfig,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self, CatalogError> {
        let store = Arc::new(FileStore::new(config.storage.path.clone()));
        Self::with_store(config, store, notifier)
    }

    /// Create application state backed by an arbitrary store.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog client cannot be built.
    pub fn with_store(
        config: StorefrontConfig,
        store: Arc<dyn CartStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self, CatalogError> {
        let catalog = CatalogClient::new(&config.catalog)?;
        let cart = CartManager::new(
            Arc::new(catalog.clone()),
            Arc::clone(&store),
            notifier,
            config.storage.cart_key.clone(),
        );

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog,
                store,
                cart,
            }),
        })
    }

    /// Get a reference to the configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the catalog API client.
    #[must_use]
    pub fn catalog(&self) -> &CatalogClient {
        &self.inner.catalog
    }

    /// Get a reference to the cart store.
    #[must_use]
    pub fn store(&self) -> &Arc<dyn CartStore> {
        &self.inner.store
    }

    /// Get a reference to the cart manager.
    #[must_use]
    pub fn cart(&self) -> &CartManager {
        &self.inner.cart
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use url::Url;

    use rocket_shoes_core::ProductId;

    use super::*;
    use crate::config::{CatalogConfig, StorageConfig};
    use crate::notice::NullNotifier;
    use crate::storage::MemoryStore;

    fn config(cart_key: &str) -> StorefrontConfig {
        StorefrontConfig {
            catalog: CatalogConfig::new(Url::parse("http://localhost:3333").unwrap()),
            storage: StorageConfig {
                cart_key: cart_key.to_string(),
                ..StorageConfig::default()
            },
            sentry_dsn: None,
            sentry_environment: None,
        }
    }

    #[test]
    fn test_with_store_loads_cart_under_configured_key() {
        let store = Arc::new(MemoryStore::with_entry(
            "shop:cart",
            r#"[{"id":3,"amount":2,"title":"Runner"}]"#,
        ));
        let state = AppState::with_store(config("shop:cart"), store, Arc::new(NullNotifier)).unwrap();

        assert_eq!(state.cart().storage_key(), "shop:cart");
        let cart = state.cart().cart();
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.get(ProductId::new(3)).unwrap().amount, 2);
    }

    #[test]
    fn test_clones_share_the_cart() {
        let state = AppState::with_store(
            config("@RocketShoes:cart"),
            Arc::new(MemoryStore::new()),
            Arc::new(NullNotifier),
        )
        .unwrap();
        let clone = state.clone();

        assert!(Arc::ptr_eq(&state.cart().cart(), &clone.cart().cart()));
        assert!(Arc::ptr_eq(state.store(), clone.store()));
        assert_eq!(clone.config().storage.cart_key, "@RocketShoes:cart");
    }
}
