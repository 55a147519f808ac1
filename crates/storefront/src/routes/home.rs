//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use tracing::instrument;

use super::PageChrome;
use super::products::ProductView;
use crate::error::Result;
use crate::filters;
use crate::state::AppState;

/// Home page template: banner plus the product grid.
#[derive(Template, WebTemplate)]
#[template(path = "index.html")]
pub struct HomeTemplate {
    pub chrome: PageChrome,
    pub products: Vec<ProductView>,
}

/// Display the home page.
#[instrument(skip(state))]
pub async fn home(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let installments = state.cart().installment_count();
    let products = state
        .catalog()
        .list_products()
        .await?
        .iter()
        .map(|product| ProductView::new(product, state.catalog(), installments))
        .collect();

    Ok(HomeTemplate {
        chrome: PageChrome::load(&state).await,
        products,
    })
}
