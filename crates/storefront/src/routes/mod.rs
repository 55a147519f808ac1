//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Product listing
//! GET  /health                 - Health check
//!
//! # Products
//! GET  /products/{id}          - Product detail
//! POST /products/{id}/cart     - Add to cart, redirect back to detail
//!
//! # Cart
//! GET  /cart                   - Cart page with order summary and login form
//! POST /cart/remove            - Remove one entry, redirect to cart
//! POST /cart/clear             - Empty the cart, redirect to cart
//! GET  /cart/count             - Cart count badge (fragment)
//!
//! # Checkout
//! POST /checkout               - Login, sell, clear; redirect to success
//! GET  /success                - Purchase confirmation
//! ```
//!
//! Mutating routes answer with a redirect (post/redirect/get); toasts queued
//! by the mutation show up on the page the browser lands on.

pub mod cart;
pub mod checkout;
pub mod home;
mod page;
pub mod products;

use axum::{
    Router,
    routing::{get, post},
};

pub use page::PageChrome;

use crate::state::AppState;

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/{id}", get(products::show))
        .route("/{id}/cart", post(products::add_to_cart))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/remove", post(cart::remove))
        .route("/clear", post(cart::clear))
        .route("/count", get(cart::count))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Home page
        .route("/", get(home::home))
        // Product routes
        .nest("/products", product_routes())
        // Cart routes
        .nest("/cart", cart_routes())
        // Checkout
        .route("/checkout", post(checkout::submit))
        .route("/success", get(checkout::success))
}
