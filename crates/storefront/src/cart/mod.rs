//! Shopping-cart state manager.
//!
//! # Layers
//!
//! ```text
//! CartContext ──► CartStore ──► CartPersistence ──► KeyValueStore
//!      │              │
//!      │              └──► broadcast::Sender<CartEvent>
//!      └──► pricing (DerivedTotals) ──► imagine_shop_core::format_brl
//! ```
//!
//! - [`CartContext`] is the one instance the UI talks to. It is built once at
//!   start-up and shared through `AppState`.
//! - [`CartStore`] is the only writer of cart state. Every mutation is
//!   persisted before it becomes visible in memory.
//! - [`CartPersistence`] maps the cart to a single namespaced entry of a
//!   [`KeyValueStore`] and never fails a load.
//! - [`pricing`] derives subtotal, shipping and grand total from a snapshot.

mod context;
mod item;
mod persistence;
pub mod pricing;
mod storage;
mod store;

pub use context::CartContext;
pub use item::{CartEvent, CartItem, CartSnapshot};
pub use persistence::{CART_STORAGE_KEY, CartPersistence};
pub use pricing::{DerivedTotals, ShippingPolicy};
pub use storage::{FileStore, KeyValueStore, MemoryStore, StorageError};
pub use store::CartStore;

use imagine_shop_core::ProductError;
use thiserror::Error;

/// Errors returned by cart mutations.
///
/// Loads never fail; only writes can.
#[derive(Debug, Error)]
pub enum CartError {
    /// The backing store rejected the write.
    #[error("Cart storage error: {0}")]
    Storage(#[from] StorageError),

    /// The cart could not be serialized.
    #[error("Cart encode error: {0}")]
    Encode(#[from] serde_json::Error),

    /// The product would not survive a reload.
    #[error("Cart rejected product: {0}")]
    InvalidProduct(#[from] ProductError),
}
