//! Catalog commands.

use std::num::NonZeroU32;

use imagine_shop_core::{Product, format_brl, installment};
use imagine_shop_storefront::catalog::CatalogClient;
use imagine_shop_storefront::config::StorefrontConfig;

use super::CommandError;

/// Print every catalog product with its price and installment.
#[allow(clippy::print_stdout)]
pub async fn list(config: &StorefrontConfig) -> Result<(), CommandError> {
    let catalog = CatalogClient::new(&config.catalog)?;
    let products = catalog.list_products().await?;

    for product in products.iter() {
        println!("{}", render_product(product, config.installments));
    }
    Ok(())
}

fn render_product(product: &Product, installments: NonZeroU32) -> String {
    format!(
        "{:<24}  {:<32}  {:>14}  ({}x de {} sem juros)",
        product.id,
        product.name,
        format_brl(product.price),
        installments,
        format_brl(installment(product.price, installments))
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use imagine_shop_core::ProductId;
    use rust_decimal::Decimal;

    use super::*;

    #[test]
    fn test_render_product() {
        let product = Product {
            id: ProductId::new("p1"),
            name: "Caneca".to_string(),
            price: Decimal::from(99),
            file_name: String::new(),
            description: String::new(),
            summary: String::new(),
        };
        let line = render_product(&product, NonZeroU32::new(10).unwrap());
        assert!(line.starts_with("p1"));
        assert!(line.contains("R$ 99,00"));
        assert!(line.ends_with("(10x de R$ 9,90 sem juros)"));
    }
}
