//! Imagine Shop storefront library.
//!
//! This crate provides the storefront functionality as a library,
//! allowing it to be tested and reused by the CLI.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod error;
mod filters;
pub mod notifications;
pub mod routes;
pub mod state;

use axum::{Router, routing::get};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use state::AppState;

/// Directory served under `/static`.
pub const STATIC_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/static");

/// Build the full storefront router around `state`.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .merge(routes::routes())
        .nest_service("/static", ServeDir::new(STATIC_DIR))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        // Sentry layers (outermost for full request coverage)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction())
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;
    use url::Url;

    use super::*;
    use crate::cart::{CartContext, CartPersistence, FileStore, ShippingPolicy};
    use crate::config::{CatalogConfig, StorefrontConfig};

    async fn test_app(dir: &std::path::Path) -> Router {
        let config = StorefrontConfig {
            host: "127.0.0.1".parse().unwrap(),
            port: 0,
            data_dir: dir.to_path_buf(),
            // Nothing listens on the discard port; these tests never hit the catalog.
            catalog: CatalogConfig::new(Url::parse("http://127.0.0.1:9").unwrap()),
            shipping: ShippingPolicy::default(),
            installments: imagine_shop_core::DEFAULT_INSTALLMENTS,
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.0,
        };
        let persistence = CartPersistence::new(Arc::new(FileStore::new(dir)));
        let cart = CartContext::load(persistence, config.shipping).await;
        app(AppState::with_cart(config, Arc::new(cart)).unwrap())
    }

    async fn body_string(response: axum::response::Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let dir = tempfile::tempdir().unwrap();
        let response = test_app(dir.path())
            .await
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_string(response).await, "ok");
    }

    #[tokio::test]
    async fn test_empty_cart_page() {
        let dir = tempfile::tempdir().unwrap();
        let response = test_app(dir.path())
            .await
            .oneshot(Request::get("/cart").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_string(response).await;
        assert!(body.contains("Sem produto"));
        assert!(body.contains("Rua Miguel Daux, 129"));
    }

    #[tokio::test]
    async fn test_cart_count_fragment() {
        let dir = tempfile::tempdir().unwrap();
        let response = test_app(dir.path())
            .await
            .oneshot(Request::get("/cart/count").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_string(response).await.contains(">0</span>"));
    }

    #[tokio::test]
    async fn test_remove_rejects_malformed_item_id() {
        let dir = tempfile::tempdir().unwrap();
        let response = test_app(dir.path())
            .await
            .oneshot(
                Request::post("/cart/remove")
                    .header("content-type", "application/x-www-form-urlencoded")
                    .body(Body::from("item_id=not-a-uuid"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_stylesheet_is_served() {
        let dir = tempfile::tempdir().unwrap();
        let response = test_app(dir.path())
            .await
            .oneshot(Request::get("/static/css/main.css").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_banner_image_is_served() {
        let dir = tempfile::tempdir().unwrap();
        let response = test_app(dir.path())
            .await
            .oneshot(
                Request::get("/static/images/banner.svg")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }
}
