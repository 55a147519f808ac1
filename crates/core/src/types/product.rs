//! Catalog product as served by the remote catalog API.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::id::ProductId;

/// A product that cannot be sold or stored in a cart.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProductError {
    /// Neither `id` nor `_id` was present.
    #[error("product has no id")]
    MissingId,

    /// The identifier is the empty string.
    #[error("product has an empty id")]
    EmptyId,

    /// The unit price is below zero.
    #[error("product {0} has a negative price")]
    NegativePrice(ProductId),
}

/// A product read from the remote catalog.
///
/// Immutable once fetched. Display strings (formatted price, image URL) are
/// derived on read and never stored on this type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawProduct")]
pub struct Product {
    /// Catalog identifier. Older catalog deployments call this field `_id`.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Unit price in reais.
    pub price: Decimal,
    /// Image file name, resolved against the catalog's `/uploads` path.
    pub file_name: String,
    /// Long free-text description.
    pub description: String,
    /// Short summary shown under "Informações do produto".
    pub summary: String,
}

impl Product {
    /// Check that the product can go into a cart and come back out of storage.
    ///
    /// # Errors
    ///
    /// Returns `ProductError` if the id is empty or the price is negative.
    pub fn validate(&self) -> Result<(), ProductError> {
        if self.id.is_empty() {
            return Err(ProductError::EmptyId);
        }
        if self.price.is_sign_negative() && !self.price.is_zero() {
            return Err(ProductError::NegativePrice(self.id.clone()));
        }
        Ok(())
    }
}

/// Wire shape, where `_id` is only consulted when `id` is absent.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawProduct {
    id: Option<ProductId>,
    #[serde(rename = "_id")]
    legacy_id: Option<ProductId>,
    name: String,
    price: Decimal,
    #[serde(default)]
    file_name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    summary: String,
}

impl TryFrom<RawProduct> for Product {
    type Error = ProductError;

    fn try_from(raw: RawProduct) -> Result<Self, Self::Error> {
        let id = raw.id.or(raw.legacy_id).ok_or(ProductError::MissingId)?;
        Ok(Self {
            id,
            name: raw.name,
            price: raw.price,
            file_name: raw.file_name,
            description: raw.description,
            summary: raw.summary,
        })
    }
}
