//! Cart commands.
//!
//! # Usage
//!
//! ```bash
//! shop-cli cart show
//! shop-cli cart add <product-id>
//! shop-cli cart remove <item-id>
//! shop-cli cart clear
//! ```

use std::sync::Arc;

use imagine_shop_core::{CartItemId, ProductId, format_brl};
use imagine_shop_storefront::cart::{
    CartContext, CartEvent, CartPersistence, CartSnapshot, DerivedTotals, FileStore,
};
use imagine_shop_storefront::catalog::CatalogClient;
use imagine_shop_storefront::config::StorefrontConfig;
use imagine_shop_storefront::notifications::{ITEM_ADDED, ITEM_REMOVED};
use tokio::sync::broadcast;

use super::CommandError;

async fn open(config: &StorefrontConfig) -> CartContext {
    let persistence = CartPersistence::new(Arc::new(FileStore::new(config.data_dir.clone())));
    CartContext::load(persistence, config.shipping)
        .await
        .with_installments(config.installments)
}

/// Print the cart and its order summary.
pub async fn show(config: &StorefrontConfig) -> Result<(), CommandError> {
    let cart = open(config).await;
    let snapshot = cart.get_products().await;
    let totals = DerivedTotals::compute(&snapshot, cart.shipping_policy());
    print_lines(&render_cart(&snapshot, &totals));
    Ok(())
}

/// Fetch `product_id` from the catalog and add it.
pub async fn add(config: &StorefrontConfig, product_id: &str) -> Result<(), CommandError> {
    let catalog = CatalogClient::new(&config.catalog)?;
    let product = catalog.get_product(&ProductId::new(product_id)).await?;

    let cart = open(config).await;
    let mut events = cart.subscribe();
    let item = cart.add_product(product).await?;

    print_lines(&drain_messages(&mut events));
    print_lines(&[format!("{}  {}", item.item_id, item.product.name)]);
    Ok(())
}

/// Remove one entry. Unknown ids are reported, not treated as failures.
pub async fn remove(config: &StorefrontConfig, item_id: &str) -> Result<(), CommandError> {
    let item_id: CartItemId = item_id
        .parse()
        .map_err(|_| CommandError::InvalidItemId(item_id.to_string()))?;

    let cart = open(config).await;
    let mut events = cart.subscribe();
    if cart.delete_product(item_id).await?.is_none() {
        tracing::warn!(%item_id, "Item not in cart");
    }

    print_lines(&drain_messages(&mut events));
    Ok(())
}

/// Empty the cart.
pub async fn clear(config: &StorefrontConfig) -> Result<(), CommandError> {
    let cart = open(config).await;
    cart.clear_all().await?;
    print_lines(&["Carrinho vazio".to_string()]);
    Ok(())
}

/// One line per entry, then the order summary.
fn render_cart(items: &CartSnapshot, totals: &DerivedTotals) -> Vec<String> {
    if items.is_empty() {
        return vec!["Sem produto".to_string()];
    }

    let mut lines: Vec<String> = items
        .iter()
        .map(|item| {
            format!(
                "{}  {:<24}  {:<32}  {:>14}",
                item.item_id,
                item.product.id,
                item.product.name,
                format_brl(item.product.price)
            )
        })
        .collect();

    lines.push(String::new());
    lines.push(format!("{:<14}{:>14}", format!("{} Produtos", items.len()), format_brl(totals.subtotal)));
    lines.push(format!("{:<14}{:>14}", "Frete", format_brl(totals.shipping)));
    lines.push(format!("{:<14}{:>14}", "Total", format_brl(totals.total)));
    lines
}

/// Messages for the change events received so far.
fn drain_messages(events: &mut broadcast::Receiver<CartEvent>) -> Vec<String> {
    std::iter::from_fn(|| events.try_recv().ok())
        .filter_map(|event| match event {
            CartEvent::ItemAdded { .. } => Some(ITEM_ADDED.to_string()),
            CartEvent::ItemRemoved { .. } => Some(ITEM_REMOVED.to_string()),
            CartEvent::Cleared => None,
        })
        .collect()
}

#[allow(clippy::print_stdout)]
fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{line}");
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use imagine_shop_core::Product;
    use imagine_shop_storefront::cart::{CartItem, ShippingPolicy};
    use rust_decimal::Decimal;

    use super::*;

    fn item(id: &str, price: i64) -> CartItem {
        CartItem::new(Product {
            id: ProductId::new(id),
            name: format!("Produto {id}"),
            price: Decimal::from(price),
            file_name: String::new(),
            description: String::new(),
            summary: String::new(),
        })
    }

    #[test]
    fn test_render_empty_cart() {
        let lines = render_cart(&CartSnapshot::default(), &DerivedTotals::default());
        assert_eq!(lines, vec!["Sem produto".to_string()]);
    }

    #[test]
    fn test_render_cart_summary() {
        let snapshot = CartSnapshot::from(vec![item("a", 100), item("b", 50)]);
        let totals = DerivedTotals::compute(&snapshot, &ShippingPolicy::default());
        let lines = render_cart(&snapshot, &totals);

        assert_eq!(lines.len(), 6);
        assert!(lines[0].starts_with(&snapshot[0].item_id.to_string()));
        assert!(lines[3].starts_with("2 Produtos"));
        assert!(lines[3].ends_with("R$ 150,00"));
        assert!(lines[4].ends_with("R$ 20,00"));
        assert!(lines[5].ends_with("R$ 170,00"));
    }

    #[test]
    fn test_drain_messages() {
        let (tx, mut rx) = broadcast::channel(4);
        let added = item("a", 1);
        tx.send(CartEvent::ItemAdded {
            item_id: added.item_id,
            product_id: added.product.id.clone(),
        })
        .unwrap();
        tx.send(CartEvent::Cleared).unwrap();

        assert_eq!(drain_messages(&mut rx), vec![ITEM_ADDED.to_string()]);
        assert!(drain_messages(&mut rx).is_empty());
    }
}
