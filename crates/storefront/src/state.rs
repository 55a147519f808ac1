//! Application state shared across handlers.

use std::sync::Arc;

use crate::cart::{CartContext, CartPersistence, FileStore};
use crate::catalog::{CatalogClient, CatalogError};
use crate::checkout::CheckoutClient;
use crate::config::StorefrontConfig;
use crate::notifications::Notifications;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`. The cart is built once here and is the only
/// instance the handlers ever touch.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: CatalogClient,
    checkout: CheckoutClient,
    cart: Arc<CartContext>,
    notifications: Notifications,
}

impl AppState {
    /// Create the application state, loading the persisted cart from
    /// `config.data_dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub async fn new(config: StorefrontConfig) -> Result<Self, CatalogError> {
        let persistence = CartPersistence::new(Arc::new(FileStore::new(config.data_dir.clone())));
        let cart = CartContext::load(persistence, config.shipping)
            .await
            .with_installments(config.installments);
        Self::with_cart(config, Arc::new(cart))
    }

    /// Create the application state around an already loaded cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn with_cart(config: StorefrontConfig, cart: Arc<CartContext>) -> Result<Self, CatalogError> {
        let catalog = CatalogClient::new(&config.catalog)?;
        let checkout = CheckoutClient::new(catalog.http().clone(), config.catalog.api_url.clone());
        let notifications = Notifications::new(cart.subscribe());

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog,
                checkout,
                cart,
                notifications,
            }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the catalog client.
    #[must_use]
    pub fn catalog(&self) -> &CatalogClient {
        &self.inner.catalog
    }

    /// Get a reference to the checkout client.
    #[must_use]
    pub fn checkout(&self) -> &CheckoutClient {
        &self.inner.checkout
    }

    /// Get a reference to the shopper's cart.
    #[must_use]
    pub fn cart(&self) -> &CartContext {
        &self.inner.cart
    }

    /// Get a reference to the toast queue.
    #[must_use]
    pub fn notifications(&self) -> &Notifications {
        &self.inner.notifications
    }
}
