//! The only writer of cart state.

use imagine_shop_core::{CartItemId, Product};
use tokio::sync::broadcast;
use tracing::{debug, info};

use super::CartError;
use super::item::{CartEvent, CartItem, CartSnapshot};
use super::persistence::CartPersistence;
use super::storage::KeyValueStore;

/// Capacity of the change-event channel. Slow subscribers skip ahead.
pub(super) const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Ordered cart contents plus the persistence they are mirrored to.
///
/// Each mutation builds the next sequence, writes it, and only then swaps it
/// in. A failed write leaves memory unchanged, so memory and storage never
/// disagree once a call has returned.
#[derive(Debug)]
pub struct CartStore<S> {
    items: Vec<CartItem>,
    persistence: CartPersistence<S>,
    events: broadcast::Sender<CartEvent>,
}

impl<S: KeyValueStore> CartStore<S> {
    /// Rehydrate from `persistence`, starting empty if nothing usable is stored.
    pub async fn open(persistence: CartPersistence<S>) -> Self {
        let items = persistence.load().await;
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        info!(items = items.len(), "Cart store opened");
        Self {
            items,
            persistence,
            events,
        }
    }

    /// Sender side of the change-event channel.
    #[must_use]
    pub fn events(&self) -> broadcast::Sender<CartEvent> {
        self.events.clone()
    }

    /// Subscribe to change events.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<CartEvent> {
        self.events.subscribe()
    }

    /// Append `product` as a new entry at the end of the cart.
    ///
    /// # Errors
    ///
    /// Returns `CartError::InvalidProduct` if the product fails
    /// [`Product::validate`], or `CartError` if the write fails. The cart is
    /// unchanged in both cases.
    pub async fn add_item(&mut self, product: Product) -> Result<CartItem, CartError> {
        product.validate()?;
        let item = CartItem::new(product);
        let mut next = Vec::with_capacity(self.items.len() + 1);
        next.extend_from_slice(&self.items);
        next.push(item.clone());

        self.commit(
            next,
            CartEvent::ItemAdded {
                item_id: item.item_id,
                product_id: item.product.id.clone(),
            },
        )
        .await?;
        debug!(item_id = %item.item_id, product_id = %item.product.id, "Item added");
        Ok(item)
    }

    /// Remove the entry whose identity is `item_id`.
    ///
    /// Returns the removed entry, or `None` if there was no such entry. A
    /// miss is not an error and neither writes nor publishes anything.
    ///
    /// # Errors
    ///
    /// Returns `CartError` if the write fails; the cart is unchanged.
    pub async fn remove_item(
        &mut self,
        item_id: CartItemId,
    ) -> Result<Option<CartItem>, CartError> {
        let Some(position) = self.items.iter().position(|i| i.item_id == item_id) else {
            debug!(%item_id, "Remove ignored, item not in cart");
            return Ok(None);
        };

        let mut next = self.items.clone();
        let removed = next.remove(position);

        self.commit(
            next,
            CartEvent::ItemRemoved {
                item_id,
                product_id: removed.product.id.clone(),
            },
        )
        .await?;
        debug!(%item_id, "Item removed");
        Ok(Some(removed))
    }

    /// Empty the cart. Always writes, even if already empty.
    ///
    /// # Errors
    ///
    /// Returns `CartError` if the write fails; the cart is unchanged.
    pub async fn clear(&mut self) -> Result<(), CartError> {
        self.commit(Vec::new(), CartEvent::Cleared).await?;
        debug!("Cart cleared");
        Ok(())
    }

    /// Immutable copy of the current contents.
    #[must_use]
    pub fn snapshot(&self) -> CartSnapshot {
        CartSnapshot::from(self.items.as_slice())
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if the cart has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    async fn commit(&mut self, next: Vec<CartItem>, event: CartEvent) -> Result<(), CartError> {
        self.persistence.save(&next).await?;
        self.items = next;
        // No receivers is fine.
        let _ = self.events.send(event);
        Ok(())
    }
}
