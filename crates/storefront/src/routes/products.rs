//! Product route handlers.

use std::num::NonZeroU32;

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect},
};
use imagine_shop_core::{Product, ProductId, format_brl, installment};
use tracing::instrument;

use super::PageChrome;
use crate::catalog::CatalogClient;
use crate::error::{Result, add_breadcrumb};
use crate::filters;
use crate::state::AppState;

/// Product display data for templates.
#[derive(Clone)]
pub struct ProductView {
    pub id: String,
    pub name: String,
    pub price: String,
    pub installment_price: String,
    pub installments: u32,
    pub image_url: String,
    pub description: String,
    pub summary: String,
}

impl ProductView {
    /// Format `product` for display with its price split into `installments`.
    #[must_use]
    pub fn new(product: &Product, catalog: &CatalogClient, installments: NonZeroU32) -> Self {
        Self {
            id: product.id.to_string(),
            name: product.name.clone(),
            price: format_brl(product.price),
            installment_price: format_brl(installment(product.price, installments)),
            installments: installments.get(),
            image_url: catalog.image_url(product),
            description: product.description.clone(),
            summary: product.summary.clone(),
        }
    }
}

/// Product detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/show.html")]
pub struct ProductShowTemplate {
    pub chrome: PageChrome,
    pub product: ProductView,
}

/// Display product detail page.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>, Path(id): Path<String>) -> Result<impl IntoResponse> {
    let product = state.catalog().get_product(&ProductId::new(id)).await?;

    Ok(ProductShowTemplate {
        product: ProductView::new(&product, state.catalog(), state.cart().installment_count()),
        chrome: PageChrome::load(&state).await,
    })
}

/// Add the product to the cart and go back to its page.
///
/// The cart entry snapshots the product as the catalog returns it now.
#[instrument(skip(state))]
pub async fn add_to_cart(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let product = state.catalog().get_product(&ProductId::new(id)).await?;
    let item = state.cart().add_product(product).await?;

    let item_id = item.item_id.to_string();
    add_breadcrumb(
        "cart",
        "Added product to cart",
        &[
            ("product_id", item.product.id.as_str()),
            ("item_id", item_id.as_str()),
        ],
    );

    Ok(Redirect::to(&format!("/products/{}", item.product.id)))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::str::FromStr;

    use rust_decimal::Decimal;
    use url::Url;

    use super::*;
    use crate::config::CatalogConfig;

    #[test]
    fn test_product_view_formats_prices() {
        let catalog = CatalogClient::new(&CatalogConfig::new(
            Url::parse("https://imagineschool.herokuapp.com").unwrap(),
        ))
        .unwrap();
        let product = Product {
            id: ProductId::new("p1"),
            name: "Caneca".to_string(),
            price: Decimal::from_str("1234.5").unwrap(),
            file_name: "caneca.jpg".to_string(),
            description: "Branca".to_string(),
            summary: "Porcelana".to_string(),
        };

        let view = ProductView::new(&product, &catalog, NonZeroU32::new(10).unwrap());
        assert_eq!(view.price, "R$ 1.234,50");
        assert_eq!(view.installment_price, "R$ 123,45");
        assert_eq!(view.installments, 10);
        assert_eq!(
            view.image_url,
            "https://imagineschool.herokuapp.com/uploads/caneca.jpg"
        );
    }
}
