//! Cart entries, snapshots and change events.

use std::ops::Deref;
use std::sync::Arc;

use imagine_shop_core::{CartItemId, Product, ProductId};

/// One selected product with its own identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartItem {
    /// Identity of this entry, assigned when it was added.
    pub item_id: CartItemId,
    /// The product as it was when added.
    pub product: Product,
}

impl CartItem {
    /// Wrap `product` in a new entry with a fresh identity.
    #[must_use]
    pub fn new(product: Product) -> Self {
        Self {
            item_id: CartItemId::generate(),
            product,
        }
    }

    /// Catalog identifier of the wrapped product.
    #[must_use]
    pub const fn product_id(&self) -> &ProductId {
        &self.product.id
    }
}

/// Immutable copy of the cart at one point in time, oldest item first.
///
/// Cheap to clone. Later mutations of the cart never show through.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CartSnapshot(Arc<[CartItem]>);

impl CartSnapshot {
    /// Product identifiers in cart order, duplicates kept.
    #[must_use]
    pub fn product_ids(&self) -> Vec<ProductId> {
        self.0.iter().map(|item| item.product.id.clone()).collect()
    }
}

impl From<Vec<CartItem>> for CartSnapshot {
    fn from(items: Vec<CartItem>) -> Self {
        Self(items.into())
    }
}

impl From<&[CartItem]> for CartSnapshot {
    fn from(items: &[CartItem]) -> Self {
        Self(items.into())
    }
}

impl Deref for CartSnapshot {
    type Target = [CartItem];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Published by the cart store after a mutation has been persisted.
///
/// Subscribers receive the event and pull a fresh snapshot if they need the
/// contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartEvent {
    ItemAdded {
        item_id: CartItemId,
        product_id: ProductId,
    },
    ItemRemoved {
        item_id: CartItemId,
        product_id: ProductId,
    },
    Cleared,
}
