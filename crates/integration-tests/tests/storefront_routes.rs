//! Integration tests for the storefront router.
//!
//! Requests are driven through the full router with `oneshot`; the catalog,
//! login and sell endpoints are served by the fake API.

#![allow(clippy::unwrap_used)]

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use axum::response::Response;
use imagine_shop_integration_tests::{TestApp, VALID_EMAIL, VALID_PASSWORD};
use tower::ServiceExt;

async fn get(router: Router, uri: &str) -> Response {
    router
        .oneshot(Request::get(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn post_form(router: Router, uri: &str, body: String) -> Response {
    router
        .oneshot(
            Request::post(uri)
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap()
}

async fn body_string(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn location(response: &Response) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .unwrap()
        .to_str()
        .unwrap()
}

fn login_form(email: &str, password: &str) -> String {
    format!("email={}&password={password}", email.replace('@', "%40"))
}

async fn add(app: &TestApp, product_id: &str) -> Response {
    post_form(app.router(), &format!("/products/{product_id}/cart"), String::new()).await
}

#[tokio::test]
async fn test_home_lists_products_with_installments() {
    let app = TestApp::start().await;
    let response = get(app.router(), "/").await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_string(response).await;
    assert!(body.contains("Camiseta Imagine"));
    assert!(body.contains("R$ 100,00"));
    assert!(body.contains("10x de R$ 10,00 sem juros"));
    assert!(body.contains("/uploads/camiseta.png"));
    assert!(body.contains("href=\"/products/p-legacy\""));
    assert!(body.contains("src=\"/static/images/banner.svg\""));
}

#[tokio::test]
async fn test_product_page() {
    let app = TestApp::start().await;
    let response = get(app.router(), "/products/p-50").await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_string(response).await;
    assert!(body.contains("Caneca Imagine"));
    assert!(body.contains("R$ 50,00"));
    assert!(body.contains("10x de R$ 5,00 sem juros"));
    assert!(body.contains("Adicionar ao carrinho"));
    assert!(body.contains("ormações do produto"));
    assert!(body.contains("Porcelana"));
    assert!(body.contains("src=\"/static/images/banner-product.svg\""));
}

#[tokio::test]
async fn test_unknown_product_is_404() {
    let app = TestApp::start().await;
    let response = get(app.router(), "/products/missing").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = add(&app, "missing").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(app.state.cart().is_empty().await);
}

#[tokio::test]
async fn test_add_to_cart_redirects_and_toasts() {
    let app = TestApp::start().await;
    let response = add(&app, "p-100").await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/products/p-100");
    assert_eq!(app.state.cart().len().await, 1);

    let body = body_string(get(app.router(), "/products/p-100").await).await;
    assert!(body.contains("Produto adicionado no carrinho"));
    assert!(body.contains("id=\"cart-count\">1</span>"));

    // Toasts are shown once.
    let body = body_string(get(app.router(), "/products/p-100").await).await;
    assert!(!body.contains("Produto adicionado no carrinho"));
}

#[tokio::test]
async fn test_cart_page_summary() {
    let app = TestApp::start().await;
    add(&app, "p-100").await;
    add(&app, "p-50").await;

    let body = body_string(get(app.router(), "/cart").await).await;
    assert!(body.contains("Meu Carrinho"));
    assert!(body.contains("2 Produtos"));
    assert!(body.contains("R$ 150,00"));
    assert!(body.contains("R$ 20,00"));
    assert!(body.contains("R$ 170,00"));
    assert!(body.contains("2. Login"));
}

#[tokio::test]
async fn test_free_shipping_above_threshold() {
    let app = TestApp::start().await;
    add(&app, "p-legacy").await;

    let body = body_string(get(app.router(), "/cart").await).await;
    assert!(body.contains("R$ 259,90"));
    assert!(body.contains("R$ 0,00"));
}

#[tokio::test]
async fn test_remove_from_cart() {
    let app = TestApp::start().await;
    add(&app, "p-100").await;
    add(&app, "p-100").await;
    let first = app.state.cart().get_products().await[0].item_id;

    let response = post_form(app.router(), "/cart/remove", format!("item_id={first}")).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/cart");

    let remaining = app.state.cart().get_products().await;
    assert_eq!(remaining.len(), 1);
    assert_ne!(remaining[0].item_id, first);

    let body = body_string(get(app.router(), "/cart").await).await;
    assert!(body.contains("Produto removido do carrinho"));
}

#[tokio::test]
async fn test_remove_missing_item_is_silent() {
    let app = TestApp::start().await;
    add(&app, "p-100").await;
    get(app.router(), "/cart").await;

    let response = post_form(
        app.router(),
        "/cart/remove",
        "item_id=6f1c7a52-8d0e-4b8e-9b7a-0c1d2e3f4a5b".to_string(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(app.state.cart().len().await, 1);

    let body = body_string(get(app.router(), "/cart").await).await;
    assert!(!body.contains("Produto removido do carrinho"));
}

#[tokio::test]
async fn test_clear_cart() {
    let app = TestApp::start().await;
    add(&app, "p-100").await;

    let response = post_form(app.router(), "/cart/clear", String::new()).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let body = body_string(get(app.router(), "/cart").await).await;
    assert!(body.contains("Sem produto"));
    assert!(app.reload_cart().await.is_empty().await);
}

#[tokio::test]
async fn test_checkout_success() {
    let app = TestApp::start().await;
    add(&app, "p-100").await;
    add(&app, "p-50").await;

    let response = post_form(
        app.router(),
        "/checkout",
        login_form(VALID_EMAIL, VALID_PASSWORD),
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/success");
    assert!(app.state.cart().is_empty().await);
    assert_eq!(app.api.sales().len(), 1);

    let response = get(app.router(), "/success").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_string(response).await.contains("id=\"cart-count\">0</span>"));
}

#[tokio::test]
async fn test_checkout_invalid_login() {
    let app = TestApp::start().await;
    add(&app, "p-100").await;
    get(app.router(), "/cart").await;

    let response = post_form(app.router(), "/checkout", login_form(VALID_EMAIL, "nope")).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/cart");

    let body = body_string(get(app.router(), "/cart").await).await;
    assert!(body.contains("Login inválido"));
    assert!(body.contains("Camiseta Imagine"));
    assert_eq!(app.state.cart().len().await, 1);
}

#[tokio::test]
async fn test_checkout_failed_sale_only_toasts() {
    let app = TestApp::start().await;
    app.api.set_sell_status(500);
    add(&app, "p-100").await;
    add(&app, "p-50").await;
    get(app.router(), "/cart").await;
    let before = app.state.cart().get_products().await;

    let response = post_form(
        app.router(),
        "/checkout",
        login_form(VALID_EMAIL, VALID_PASSWORD),
    )
    .await;
    assert_eq!(location(&response), "/cart");

    let toasts = app.state.notifications().drain();
    assert_eq!(toasts.len(), 1);
    assert_eq!(toasts[0].message, "Compra inválida");
    assert_eq!(app.state.cart().get_products().await, before);
    assert_eq!(app.reload_cart().await.len().await, 2);
}

#[tokio::test]
async fn test_cart_survives_restart() {
    let app = TestApp::start().await;
    add(&app, "p-100").await;
    add(&app, "p-50").await;

    let reloaded = app.reload_cart().await;
    assert_eq!(reloaded.get_products().await, app.state.cart().get_products().await);
    assert_eq!(reloaded.get_total_value().await, "R$ 170,00");
}
