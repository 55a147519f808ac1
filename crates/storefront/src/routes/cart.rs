//! Cart route handlers.
//!
//! The cart lives in the process-wide `CartContext`; every page reads a fresh
//! snapshot of it.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect},
};
use imagine_shop_core::{CartItemId, format_brl, installment};
use serde::Deserialize;
use tracing::instrument;

use super::PageChrome;
use crate::cart::{CartItem, DerivedTotals};
use crate::catalog::CatalogClient;
use crate::error::{AppError, Result, add_breadcrumb};
use crate::filters;
use crate::state::AppState;

/// Cart entry display data for templates.
#[derive(Clone)]
pub struct CartItemView {
    pub item_id: String,
    pub product_id: String,
    pub name: String,
    pub price: String,
    pub image_url: String,
}

impl CartItemView {
    fn new(item: &CartItem, catalog: &CatalogClient) -> Self {
        Self {
            item_id: item.item_id.to_string(),
            product_id: item.product.id.to_string(),
            name: item.product.name.clone(),
            price: format_brl(item.product.price),
            image_url: catalog.image_url(&item.product),
        }
    }
}

/// Order summary display data: "N Produtos", shipping and total.
#[derive(Clone)]
pub struct CartSummaryView {
    pub count: usize,
    pub subtotal: String,
    pub shipping: String,
    pub total: String,
    pub installments: u32,
    pub installment_price: String,
}

/// Cart display data for templates.
#[derive(Clone)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub summary: CartSummaryView,
}

impl CartView {
    /// Snapshot the shopper's cart. Every figure comes from the same snapshot.
    pub async fn load(state: &AppState) -> Self {
        let cart = state.cart();
        let snapshot = cart.get_products().await;
        let totals = DerivedTotals::compute(&snapshot, cart.shipping_policy());
        let installments = cart.installment_count();

        Self {
            items: snapshot
                .iter()
                .map(|item| CartItemView::new(item, state.catalog()))
                .collect(),
            summary: CartSummaryView {
                count: snapshot.len(),
                subtotal: format_brl(totals.subtotal),
                shipping: format_brl(totals.shipping),
                total: format_brl(totals.total),
                installments: installments.get(),
                installment_price: format_brl(installment(totals.total, installments)),
            },
        }
    }
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub item_id: String,
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub chrome: PageChrome,
    pub cart: CartView,
}

/// Cart count badge fragment template.
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: usize,
}

/// Display cart page.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>) -> impl IntoResponse {
    let cart = CartView::load(&state).await;
    CartShowTemplate {
        chrome: PageChrome::load(&state).await,
        cart,
    }
}

/// Remove one entry from the cart.
///
/// Removing an entry that is no longer in the cart is not an error.
#[instrument(skip(state))]
pub async fn remove(
    State(state): State<AppState>,
    Form(form): Form<RemoveFromCartForm>,
) -> Result<impl IntoResponse> {
    let item_id: CartItemId = form
        .item_id
        .parse()
        .map_err(|_| AppError::BadRequest(format!("invalid item id: {}", form.item_id)))?;

    if let Some(removed) = state.cart().delete_product(item_id).await? {
        add_breadcrumb(
            "cart",
            "Removed product from cart",
            &[("product_id", removed.product.id.as_str())],
        );
    }

    Ok(Redirect::to("/cart"))
}

/// Empty the cart.
#[instrument(skip(state))]
pub async fn clear(State(state): State<AppState>) -> Result<impl IntoResponse> {
    state.cart().clear_all().await?;
    Ok(Redirect::to("/cart"))
}

/// Cart count badge fragment.
pub async fn count(State(state): State<AppState>) -> impl IntoResponse {
    CartCountTemplate {
        count: state.cart().len().await,
    }
}
