//! Checkout: log in, sell the cart, empty it.
//!
//! The cart is only cleared once the sale has been accepted. A rejected
//! login or sale leaves it exactly as it was.

mod client;

pub use client::{AuthToken, CheckoutClient};

use imagine_shop_core::ProductId;
use secrecy::SecretString;
use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::cart::{CartContext, CartError, KeyValueStore};
use crate::notifications::{INVALID_LOGIN, INVALID_PURCHASE};

/// Errors that can occur during checkout.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Nothing to buy.
    #[error("Cart is empty")]
    EmptyCart,

    /// Login rejected the credentials.
    #[error("Authentication failed")]
    Authentication,

    /// Sell endpoint rejected the purchase.
    #[error("Transaction rejected with HTTP {0}")]
    Transaction(u16),

    /// Request never got an answer.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Sale went through but the cart could not be emptied.
    #[error("Cart error: {0}")]
    Cart(#[from] CartError),
}

impl CheckoutError {
    /// Toast text shown to the shopper, if this failure has one.
    #[must_use]
    pub const fn user_message(&self) -> Option<&'static str> {
        match self {
            Self::Authentication => Some(INVALID_LOGIN),
            Self::Transaction(_) | Self::Http(_) => Some(INVALID_PURCHASE),
            Self::EmptyCart | Self::Cart(_) => None,
        }
    }
}

/// Completed purchase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    /// Product ids sold, in cart order.
    pub products: Vec<ProductId>,
}

/// Buy everything in `cart` with the shopper's credentials.
///
/// Resolves after the emptied cart has been persisted.
///
/// # Errors
///
/// Returns `CheckoutError` if the cart is empty, the login or the sale is
/// rejected, or the cart cannot be cleared afterwards.
#[instrument(skip_all)]
pub async fn checkout<S: KeyValueStore>(
    cart: &CartContext<S>,
    client: &CheckoutClient,
    email: &str,
    password: &SecretString,
) -> Result<Receipt, CheckoutError> {
    let products = cart.get_products().await.product_ids();
    if products.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }

    let token = client.login(email, password).await.inspect_err(|e| {
        warn!(error = %e, "Checkout login failed");
    })?;

    client.sell(&token, &products).await.inspect_err(|e| {
        warn!(error = %e, items = products.len(), "Checkout sale failed");
    })?;

    cart.clear_all().await?;
    info!(items = products.len(), "Checkout completed");

    Ok(Receipt { products })
}
