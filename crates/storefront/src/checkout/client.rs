//! Login and sell endpoints.

use imagine_shop_core::ProductId;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};
use url::Url;

use super::CheckoutError;

/// Bearer token issued by the login endpoint. Redacted from `Debug`.
#[derive(Debug, Clone)]
pub struct AuthToken(SecretString);

impl AuthToken {
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(SecretString::from(token.into()))
    }

    fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct LoginResponse {
    #[serde(default)]
    token: Option<String>,
}

#[derive(Serialize)]
struct SellRequest<'a> {
    products: &'a [ProductId],
}

/// Client for `POST /login` and `POST /products/sell`.
#[derive(Debug, Clone)]
pub struct CheckoutClient {
    client: reqwest::Client,
    base_url: Url,
}

impl CheckoutClient {
    /// Talk to the API at `base_url` over `client`.
    #[must_use]
    pub const fn new(client: reqwest::Client, base_url: Url) -> Self {
        Self { client, base_url }
    }

    /// Exchange credentials for a token.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::Authentication` for any status other than 200
    /// or a 200 without a token, `CheckoutError::Http` if the request fails.
    #[instrument(skip(self, password))]
    pub async fn login(
        &self,
        email: &str,
        password: &SecretString,
    ) -> Result<AuthToken, CheckoutError> {
        let response = self
            .client
            .post(self.endpoint(&["login"]))
            .json(&LoginRequest {
                email,
                password: password.expose_secret(),
            })
            .send()
            .await?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            debug!(%status, "Login rejected");
            return Err(CheckoutError::Authentication);
        }

        let body = response.text().await?;
        match serde_json::from_str::<LoginResponse>(&body) {
            Ok(LoginResponse { token: Some(token) }) if !token.is_empty() => {
                Ok(AuthToken::new(token))
            }
            _ => {
                debug!("Login answered 200 without a token");
                Err(CheckoutError::Authentication)
            }
        }
    }

    /// Record a sale of `products`, duplicates included.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::Transaction` for any status other than 200,
    /// `CheckoutError::Http` if the request fails.
    #[instrument(skip(self, token, products), fields(items = products.len()))]
    pub async fn sell(&self, token: &AuthToken, products: &[ProductId]) -> Result<(), CheckoutError> {
        let response = self
            .client
            .post(self.endpoint(&["products", "sell"]))
            .bearer_auth(token.expose())
            .json(&SellRequest { products })
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::OK {
            Ok(())
        } else {
            debug!(%status, "Sale rejected");
            Err(CheckoutError::Transaction(status.as_u16()))
        }
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }
}
