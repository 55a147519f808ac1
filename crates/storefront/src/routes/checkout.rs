//! Checkout route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect},
};
use secrecy::SecretString;
use serde::Deserialize;
use tracing::instrument;

use super::PageChrome;
use crate::checkout::{CheckoutError, checkout};
use crate::error::{AppError, Result};
use crate::filters;
use crate::notifications::Toast;
use crate::state::AppState;

/// Login form submitted from the cart page.
#[derive(Deserialize)]
pub struct CheckoutForm {
    pub email: String,
    pub password: String,
}

/// Purchase confirmation template.
#[derive(Template, WebTemplate)]
#[template(path = "success.html")]
pub struct SuccessTemplate {
    pub chrome: PageChrome,
}

/// Log in, sell the cart and empty it.
///
/// On success the browser lands on `/success` only after the emptied cart
/// has been written. A rejected login or sale queues an error toast and
/// sends the shopper back to the cart, which is left untouched.
#[instrument(skip_all)]
pub async fn submit(
    State(state): State<AppState>,
    Form(form): Form<CheckoutForm>,
) -> Result<impl IntoResponse> {
    let password = SecretString::from(form.password);

    match checkout(state.cart(), state.checkout(), form.email.trim(), &password).await {
        Ok(_) => Ok(Redirect::to("/success")),
        Err(CheckoutError::Cart(e)) => Err(AppError::Cart(e)),
        Err(e) => {
            if let Some(message) = e.user_message() {
                state.notifications().push(Toast::error(message));
            }
            Ok(Redirect::to("/cart"))
        }
    }
}

/// Display the purchase confirmation.
pub async fn success(State(state): State<AppState>) -> impl IntoResponse {
    SuccessTemplate {
        chrome: PageChrome::load(&state).await,
    }
}
