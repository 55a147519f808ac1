//! Serialized form of the cart.
//!
//! The whole cart lives under one key as a JSON array, oldest item first:
//!
//! ```json
//! [
//!   {
//!     "itemId": "2f1c...",
//!     "productId": "62a0...",
//!     "snapshot": {
//!       "name": "Camiseta",
//!       "price": "100.00",
//!       "fileName": "camiseta.png",
//!       "description": "...",
//!       "summary": "..."
//!     }
//!   }
//! ]
//! ```

use std::collections::HashSet;
use std::sync::Arc;

use imagine_shop_core::{CartItemId, Product, ProductError, ProductId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::CartError;
use super::item::CartItem;
use super::storage::KeyValueStore;

/// Namespace key of the persisted cart.
pub const CART_STORAGE_KEY: &str = "imagine-shop.cart";

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredItem {
    item_id: CartItemId,
    product_id: ProductId,
    snapshot: StoredProduct,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredProduct {
    name: String,
    price: Decimal,
    #[serde(default)]
    file_name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    summary: String,
}

impl From<&CartItem> for StoredItem {
    fn from(item: &CartItem) -> Self {
        let product = &item.product;
        Self {
            item_id: item.item_id,
            product_id: product.id.clone(),
            snapshot: StoredProduct {
                name: product.name.clone(),
                price: product.price,
                file_name: product.file_name.clone(),
                description: product.description.clone(),
                summary: product.summary.clone(),
            },
        }
    }
}

impl From<StoredItem> for CartItem {
    fn from(stored: StoredItem) -> Self {
        Self {
            item_id: stored.item_id,
            product: Product {
                id: stored.product_id,
                name: stored.snapshot.name,
                price: stored.snapshot.price,
                file_name: stored.snapshot.file_name,
                description: stored.snapshot.description,
                summary: stored.snapshot.summary,
            },
        }
    }
}

/// Reason a stored cart was discarded.
#[derive(Debug, thiserror::Error)]
enum SchemaError {
    #[error("not a valid cart document: {0}")]
    Shape(#[from] serde_json::Error),
    #[error("item {item_id}: {source}")]
    InvalidProduct {
        item_id: CartItemId,
        source: ProductError,
    },
    #[error("item id {0} appears more than once")]
    DuplicateItemId(CartItemId),
}

fn decode(raw: &str) -> Result<Vec<CartItem>, SchemaError> {
    let stored: Vec<StoredItem> = serde_json::from_str(raw)?;
    let items: Vec<CartItem> = stored.into_iter().map(CartItem::from).collect();

    // Same rules CartStore::add_item applies before anything is saved.
    let mut seen = HashSet::with_capacity(items.len());
    for item in &items {
        item.product
            .validate()
            .map_err(|source| SchemaError::InvalidProduct {
                item_id: item.item_id,
                source,
            })?;
        if !seen.insert(item.item_id) {
            return Err(SchemaError::DuplicateItemId(item.item_id));
        }
    }

    Ok(items)
}

/// Reads and writes the cart under [`CART_STORAGE_KEY`].
#[derive(Debug)]
pub struct CartPersistence<S> {
    store: Arc<S>,
    key: String,
}

impl<S> Clone for CartPersistence<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            key: self.key.clone(),
        }
    }
}

impl<S: KeyValueStore> CartPersistence<S> {
    /// Persist under the default namespace key.
    #[must_use]
    pub fn new(store: Arc<S>) -> Self {
        Self::with_key(store, CART_STORAGE_KEY)
    }

    /// Persist under a custom key.
    #[must_use]
    pub fn with_key(store: Arc<S>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    /// The underlying store.
    #[must_use]
    pub const fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Load the persisted cart.
    ///
    /// Returns an empty cart when nothing is stored, when the stored value
    /// fails validation, or when the store cannot be read. Never fails.
    pub async fn load(&self) -> Vec<CartItem> {
        let raw = match self.store.get(&self.key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!(key = %self.key, "No persisted cart, starting empty");
                return Vec::new();
            }
            Err(e) => {
                warn!(key = %self.key, error = %e, "Failed to read persisted cart, starting empty");
                return Vec::new();
            }
        };

        match decode(&raw) {
            Ok(items) => {
                debug!(key = %self.key, items = items.len(), "Loaded persisted cart");
                items
            }
            Err(e) => {
                warn!(key = %self.key, error = %e, "Discarding malformed persisted cart");
                Vec::new()
            }
        }
    }

    /// Overwrite the persisted cart with `items`.
    ///
    /// # Errors
    ///
    /// Returns `CartError` if the cart cannot be encoded or the store
    /// rejects the write. The previous value is left intact in that case.
    pub async fn save(&self, items: &[CartItem]) -> Result<(), CartError> {
        let stored: Vec<StoredItem> = items.iter().map(StoredItem::from).collect();
        let raw = serde_json::to_string(&stored)?;
        self.store.set(&self.key, &raw).await?;
        Ok(())
    }
}
