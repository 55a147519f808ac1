//! Cart context provider: the single entry point the UI uses.

use std::num::NonZeroU32;

use imagine_shop_core::{CartItemId, DEFAULT_INSTALLMENTS, Product, format_brl, installment};
use tokio::sync::{Mutex, broadcast};
use tracing::instrument;

use super::CartError;
use super::item::{CartEvent, CartItem, CartSnapshot};
use super::persistence::CartPersistence;
use super::pricing::{DerivedTotals, ShippingPolicy};
use super::storage::{FileStore, KeyValueStore};
use super::store::CartStore;

/// Process-wide cart façade.
///
/// Built once at start-up and shared by `Arc`. Mutations are serialized by
/// an async mutex held across the persistence write, so each one runs to
/// completion before the next starts. Queries always recompute from the
/// current contents.
#[derive(Debug)]
pub struct CartContext<S = FileStore> {
    store: Mutex<CartStore<S>>,
    events: broadcast::Sender<CartEvent>,
    shipping: ShippingPolicy,
    installments: NonZeroU32,
}

impl<S: KeyValueStore> CartContext<S> {
    /// Rehydrate the cart from `persistence`.
    pub async fn load(persistence: CartPersistence<S>, shipping: ShippingPolicy) -> Self {
        let store = CartStore::open(persistence).await;
        let events = store.events();
        Self {
            store: Mutex::new(store),
            events,
            shipping,
            installments: DEFAULT_INSTALLMENTS,
        }
    }

    /// Override the number of installments shown with the total.
    #[must_use]
    pub fn with_installments(mut self, installments: NonZeroU32) -> Self {
        self.installments = installments;
        self
    }

    /// Subscribe to change events published after each persisted mutation.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<CartEvent> {
        self.events.subscribe()
    }

    /// Shipping rule used for totals.
    #[must_use]
    pub const fn shipping_policy(&self) -> &ShippingPolicy {
        &self.shipping
    }

    /// Number of installments the total is split into.
    #[must_use]
    pub const fn installment_count(&self) -> NonZeroU32 {
        self.installments
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Add `product` as a new cart entry.
    ///
    /// # Errors
    ///
    /// Returns `CartError` if the cart cannot be persisted.
    #[instrument(skip(self, product), fields(product_id = %product.id))]
    pub async fn add_product(&self, product: Product) -> Result<CartItem, CartError> {
        self.store.lock().await.add_item(product).await
    }

    /// Delete the entry `item_id`. Unknown ids are ignored.
    ///
    /// # Errors
    ///
    /// Returns `CartError` if the cart cannot be persisted.
    #[instrument(skip(self))]
    pub async fn delete_product(&self, item_id: CartItemId) -> Result<Option<CartItem>, CartError> {
        self.store.lock().await.remove_item(item_id).await
    }

    /// Empty the cart. Resolves once the empty cart has been written.
    ///
    /// # Errors
    ///
    /// Returns `CartError` if the cart cannot be persisted.
    #[instrument(skip(self))]
    pub async fn clear_all(&self) -> Result<(), CartError> {
        self.store.lock().await.clear().await
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Current contents, oldest first.
    pub async fn get_products(&self) -> CartSnapshot {
        self.store.lock().await.snapshot()
    }

    /// Number of entries.
    pub async fn len(&self) -> usize {
        self.store.lock().await.len()
    }

    /// Returns `true` if the cart is empty.
    pub async fn is_empty(&self) -> bool {
        self.store.lock().await.is_empty()
    }

    /// Subtotal, shipping and total from one snapshot.
    pub async fn totals(&self) -> DerivedTotals {
        DerivedTotals::compute(&self.get_products().await, &self.shipping)
    }

    /// Formatted subtotal.
    pub async fn get_total_products(&self) -> String {
        format_brl(self.totals().await.subtotal)
    }

    /// Formatted shipping fee.
    pub async fn get_shipping_value(&self) -> String {
        format_brl(self.totals().await.shipping)
    }

    /// Formatted grand total.
    pub async fn get_total_value(&self) -> String {
        format_brl(self.totals().await.total)
    }

    /// Formatted single installment of the grand total.
    pub async fn get_installment_value(&self) -> String {
        format_brl(installment(self.totals().await.total, self.installments))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::str::FromStr;
    use std::sync::Arc;

    use imagine_shop_core::ProductId;
    use rust_decimal::Decimal;

    use super::*;
    use crate::cart::persistence::CART_STORAGE_KEY;
    use crate::cart::storage::MemoryStore;

    fn product(id: &str, price: &str) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("Produto {id}"),
            price: Decimal::from_str(price).unwrap(),
            file_name: format!("{id}.png"),
            description: String::new(),
            summary: String::new(),
        }
    }

    async fn context() -> (CartContext<MemoryStore>, CartPersistence<MemoryStore>) {
        let persistence = CartPersistence::new(Arc::new(MemoryStore::new()));
        let cart = CartContext::load(persistence.clone(), ShippingPolicy::default()).await;
        (cart, persistence)
    }

    fn parse_brl(s: &str) -> Decimal {
        let digits = s
            .trim_start_matches("R$ ")
            .replace('.', "")
            .replace(',', ".");
        Decimal::from_str(&digits).unwrap()
    }

    #[tokio::test]
    async fn test_checkout_summary_scenario() {
        let (cart, _) = context().await;
        cart.add_product(product("a", "100.00")).await.unwrap();
        cart.add_product(product("b", "50.00")).await.unwrap();

        assert_eq!(cart.get_total_products().await, "R$ 150,00");
        assert_eq!(cart.get_shipping_value().await, "R$ 20,00");
        assert_eq!(cart.get_total_value().await, "R$ 170,00");
        assert_eq!(cart.get_installment_value().await, "R$ 17,00");
    }

    #[tokio::test]
    async fn test_formatted_totals_add_up() {
        let (cart, _) = context().await;
        for price in ["19.99", "0.01", "45.5", "120"] {
            cart.add_product(product(price, price)).await.unwrap();
            let subtotal = parse_brl(&cart.get_total_products().await);
            let shipping = parse_brl(&cart.get_shipping_value().await);
            let total = parse_brl(&cart.get_total_value().await);
            assert_eq!(total, subtotal + shipping);
        }
    }

    #[tokio::test]
    async fn test_length_tracks_adds_and_deletes() {
        let (cart, _) = context().await;
        let mut added = Vec::new();
        for i in 0..5 {
            added.push(cart.add_product(product(&i.to_string(), "1")).await.unwrap());
        }
        assert_eq!(cart.get_products().await.len(), 5);

        cart.delete_product(added[1].item_id).await.unwrap();
        cart.delete_product(added[3].item_id).await.unwrap();
        cart.delete_product(added[3].item_id).await.unwrap();
        assert_eq!(cart.get_products().await.len(), 3);

        cart.clear_all().await.unwrap();
        assert!(cart.get_products().await.is_empty());
    }

    #[tokio::test]
    async fn test_delete_unknown_leaves_cart_unchanged() {
        let (cart, _) = context().await;
        cart.add_product(product("a", "10")).await.unwrap();
        let before = cart.get_products().await;

        let removed = cart.delete_product(CartItemId::generate()).await.unwrap();
        assert!(removed.is_none());
        assert_eq!(cart.get_products().await, before);
    }

    #[tokio::test]
    async fn test_clear_survives_reload() {
        let (cart, persistence) = context().await;
        cart.add_product(product("a", "10")).await.unwrap();
        cart.clear_all().await.unwrap();

        assert!(cart.get_products().await.is_empty());
        assert!(persistence.load().await.is_empty());
        let reloaded = CartContext::load(persistence, ShippingPolicy::default()).await;
        assert!(reloaded.is_empty().await);
    }

    #[tokio::test]
    async fn test_rejected_product_keeps_reload_in_step() {
        let (cart, persistence) = context().await;
        cart.add_product(product("a", "100")).await.unwrap();

        let result = cart.add_product(product("b", "-0.01")).await;
        assert!(matches!(result, Err(CartError::InvalidProduct(_))));
        let result = cart.add_product(product("", "10")).await;
        assert!(matches!(result, Err(CartError::InvalidProduct(_))));

        let reloaded = CartContext::load(persistence, ShippingPolicy::default()).await;
        assert_eq!(reloaded.len().await, cart.len().await);
        assert_eq!(reloaded.get_products().await, cart.get_products().await);
    }

    #[tokio::test]
    async fn test_malformed_storage_starts_empty() {
        let store = Arc::new(MemoryStore::new());
        store.set(CART_STORAGE_KEY, "[{\"itemId\": 42}]").await.unwrap();
        let cart = CartContext::load(CartPersistence::new(store), ShippingPolicy::default()).await;

        assert!(cart.is_empty().await);
        assert_eq!(cart.get_total_value().await, "R$ 0,00");
    }

    #[tokio::test]
    async fn test_subscribers_see_mutations() {
        let (cart, _) = context().await;
        let mut events = cart.subscribe();
        let item = cart.add_product(product("a", "10")).await.unwrap();

        assert_eq!(
            events.recv().await.unwrap(),
            CartEvent::ItemAdded {
                item_id: item.item_id,
                product_id: ProductId::new("a"),
            }
        );
    }

    #[tokio::test]
    async fn test_custom_installments() {
        let persistence = CartPersistence::new(Arc::new(MemoryStore::new()));
        let cart = CartContext::load(persistence, ShippingPolicy::default())
            .await
            .with_installments(NonZeroU32::new(3).unwrap());
        cart.add_product(product("a", "280")).await.unwrap();

        assert_eq!(cart.installment_count().get(), 3);
        assert_eq!(cart.get_installment_value().await, "R$ 100,00");
    }
}
