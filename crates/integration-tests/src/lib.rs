//! Integration tests for Imagine Shop.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p imagine-shop-integration-tests
//! ```
//!
//! No network access is needed: each test starts a [`FakeApi`] on an
//! ephemeral port that plays the catalog, login and sell endpoints, and
//! points the storefront at it.
//!
//! # Test Categories
//!
//! - `catalog` - Catalog client against the fake API
//! - `checkout` - Login, sell and cart clearing
//! - `storefront_routes` - Full router driven with `tower::ServiceExt::oneshot`

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicU16, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use axum::{
    Json, Router,
    extract::{Path, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use imagine_shop_storefront::cart::{CartContext, CartPersistence, FileStore, ShippingPolicy};
use imagine_shop_storefront::config::{CatalogConfig, StorefrontConfig};
use imagine_shop_storefront::state::AppState;
use serde_json::{Value, json};
use tempfile::TempDir;
use url::Url;

/// Credentials the fake login endpoint accepts.
pub const VALID_EMAIL: &str = "aluno@imagineschool.com.br";
pub const VALID_PASSWORD: &str = "imagine123";
/// Token the fake login endpoint issues.
pub const TOKEN: &str = "fake-jwt-token";

/// Catalog fixture: two products under the threshold, one above it.
#[must_use]
pub fn fixture_products() -> Vec<Value> {
    vec![
        json!({
            "id": "p-100",
            "name": "Camiseta Imagine",
            "price": 100.0,
            "fileName": "camiseta.png",
            "description": "Camiseta de algodão",
            "summary": "100% algodão"
        }),
        json!({
            "id": "p-50",
            "name": "Caneca Imagine",
            "price": 50.0,
            "fileName": "caneca.png",
            "description": "Caneca branca",
            "summary": "Porcelana"
        }),
        // Legacy field name for the identifier.
        json!({
            "_id": "p-legacy",
            "name": "Moletom Imagine",
            "price": 259.9,
            "fileName": "moletom.png",
            "description": "Moletom com capuz",
            "summary": "Tamanho único"
        }),
    ]
}

#[derive(Default)]
struct FakeApiState {
    products: Vec<Value>,
    login_status: AtomicU16,
    login_omits_token: AtomicBool,
    sell_status: AtomicU16,
    product_requests: AtomicUsize,
    sales: Mutex<Vec<Value>>,
}

/// In-process stand-in for the remote catalog, login and sell API.
pub struct FakeApi {
    addr: SocketAddr,
    state: Arc<FakeApiState>,
}

impl FakeApi {
    /// Start serving [`fixture_products`].
    pub async fn start() -> Self {
        Self::with_products(fixture_products()).await
    }

    /// Start serving `products`.
    pub async fn with_products(products: Vec<Value>) -> Self {
        let state = Arc::new(FakeApiState {
            products,
            login_status: AtomicU16::new(200),
            sell_status: AtomicU16::new(200),
            ..Default::default()
        });

        let app = Router::new()
            .route("/products", get(list_products))
            .route("/products/sell", post(sell))
            .route("/products/{id}", get(get_product))
            .route("/login", post(login))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { addr, state }
    }

    /// Base URL of the fake API.
    #[must_use]
    pub fn url(&self) -> Url {
        Url::parse(&format!("http://{}", self.addr)).unwrap()
    }

    /// Make every login answer with `status`.
    pub fn set_login_status(&self, status: u16) {
        self.state.login_status.store(status, Ordering::SeqCst);
    }

    /// Make successful logins answer `{}` instead of `{token}`.
    pub fn omit_login_token(&self) {
        self.state.login_omits_token.store(true, Ordering::SeqCst);
    }

    /// Make every sale answer with `status`.
    pub fn set_sell_status(&self, status: u16) {
        self.state.sell_status.store(status, Ordering::SeqCst);
    }

    /// Number of `GET /products` and `GET /products/{id}` requests served.
    #[must_use]
    pub fn product_requests(&self) -> usize {
        self.state.product_requests.load(Ordering::SeqCst)
    }

    /// Bodies of every accepted sale, oldest first.
    #[must_use]
    pub fn sales(&self) -> Vec<Value> {
        self.state
            .sales
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Storefront configuration pointing at this API and `data_dir`.
    #[must_use]
    pub fn config(&self, data_dir: &std::path::Path) -> StorefrontConfig {
        StorefrontConfig {
            host: "127.0.0.1".parse().unwrap(),
            port: 0,
            data_dir: data_dir.to_path_buf(),
            catalog: CatalogConfig::new(self.url()),
            shipping: ShippingPolicy::default(),
            installments: imagine_shop_core::DEFAULT_INSTALLMENTS,
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.0,
        }
    }
}

async fn list_products(State(state): State<Arc<FakeApiState>>) -> Json<Vec<Value>> {
    state.product_requests.fetch_add(1, Ordering::SeqCst);
    Json(state.products.clone())
}

async fn get_product(State(state): State<Arc<FakeApiState>>, Path(id): Path<String>) -> Response {
    state.product_requests.fetch_add(1, Ordering::SeqCst);
    state
        .products
        .iter()
        .find(|p| p["id"] == id.as_str() || p["_id"] == id.as_str())
        .map_or_else(
            || (StatusCode::NOT_FOUND, "Product not found").into_response(),
            |p| Json(p.clone()).into_response(),
        )
}

async fn login(State(state): State<Arc<FakeApiState>>, Json(body): Json<Value>) -> Response {
    let status = StatusCode::from_u16(state.login_status.load(Ordering::SeqCst)).unwrap();
    if status != StatusCode::OK {
        return (status, Json(json!({"message": "forced"}))).into_response();
    }
    if body["email"] != VALID_EMAIL || body["password"] != VALID_PASSWORD {
        return (StatusCode::UNAUTHORIZED, Json(json!({"message": "invalid"}))).into_response();
    }
    if state.login_omits_token.load(Ordering::SeqCst) {
        return Json(json!({})).into_response();
    }
    Json(json!({ "token": TOKEN })).into_response()
}

async fn sell(
    State(state): State<Arc<FakeApiState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> StatusCode {
    let authorized = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        == Some(format!("Bearer {TOKEN}").as_str());
    if !authorized {
        return StatusCode::UNAUTHORIZED;
    }

    let status = StatusCode::from_u16(state.sell_status.load(Ordering::SeqCst)).unwrap();
    if status == StatusCode::OK {
        state
            .sales
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(body);
    }
    status
}

/// A storefront wired to a [`FakeApi`] with its own data directory.
pub struct TestApp {
    pub api: FakeApi,
    pub state: AppState,
    pub data_dir: TempDir,
}

impl TestApp {
    /// Start a fake API and build the storefront state around it.
    pub async fn start() -> Self {
        let api = FakeApi::start().await;
        let data_dir = tempfile::tempdir().unwrap();
        let state = AppState::new(api.config(data_dir.path())).await.unwrap();
        Self {
            api,
            state,
            data_dir,
        }
    }

    /// The storefront router.
    #[must_use]
    pub fn router(&self) -> Router {
        imagine_shop_storefront::app(self.state.clone())
    }

    /// A second cart loaded from the same data directory, as after a restart.
    pub async fn reload_cart(&self) -> CartContext {
        let store = FileStore::new(self.data_dir.path());
        CartContext::load(CartPersistence::new(Arc::new(store)), ShippingPolicy::default()).await
    }
}
