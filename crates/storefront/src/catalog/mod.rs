//! Remote product catalog client.
//!
//! # Architecture
//!
//! - Plain JSON over HTTP with `reqwest`; the catalog is read-only here
//! - The catalog is source of truth - products are never stored locally
//!   except as the snapshot inside a cart entry
//! - In-memory caching via `moka` for listing and detail responses
//!
//! # Endpoints
//!
//! - `GET /products` - every product
//! - `GET /products/{id}` - one product
//! - `GET /uploads/{fileName}` - product images (linked, never fetched)

mod cache;
mod client;

pub use client::CatalogClient;

use imagine_shop_core::ProductError;
use thiserror::Error;

/// Errors that can occur when talking to the catalog API.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Catalog answered with a non-success status.
    #[error("Catalog returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// Product does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Response body was not the expected JSON.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Product parsed but cannot be sold.
    #[error("Invalid product: {0}")]
    Invalid(#[from] ProductError),
}
